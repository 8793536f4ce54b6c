//! Keyset pagination over a date-descending post sequence, where the page
//! boundary is the id of the last post the client has already seen.

use serde::Deserialize;
use validator::Validate;

pub const MAX_PAGE_SIZE: usize = 100;

/// Query string of the wall and feed endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Zero or absent means no limit.
    #[validate(range(max = MAX_PAGE_SIZE, message = "Page size cannot exceed 100"))]
    pub page_size: Option<usize>,
    pub start_post_id: Option<i64>,
}

/// Returns the page that follows `start_after` in `items`.
///
/// `items` must already be in display order. Without a cursor the page starts
/// at the first item. A cursor that does not occur in `items` yields an empty
/// page. A `page_size` of zero returns everything after the cursor.
pub fn page_after<T>(items: Vec<T>, id_of: impl Fn(&T) -> i64, query: &PageQuery) -> Vec<T> {
    let start = match query.start_post_id {
        Some(cursor) => items
            .iter()
            .position(|item| id_of(item) == cursor)
            .map_or(items.len(), |index| index + 1),
        None => 0,
    };

    let remaining = items.into_iter().skip(start);
    match query.page_size.unwrap_or(0) {
        0 => remaining.collect(),
        page_size => remaining.take(page_size).collect(),
    }
}
