use crate::error::{AppError, AppResult};
use crate::models::users::{NewUser, ProfileUpdate, User};
use anyhow::anyhow;
use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, name, email, password_hash, phone_number, gender, \
     profile_image, profile_image_minified, cover_image, created_at";

pub async fn insert_user(conn: &mut SqliteConnection, new_user: &NewUser<'_>) -> AppResult<Uuid> {
    let user_id = Uuid::new_v4();

    let insert_user_result = sqlx::query(
        "INSERT INTO users (id, username, name, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(user_id)
    .bind(new_user.username)
    .bind(new_user.name)
    .bind(new_user.email)
    .bind(new_user.password_hash)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await;

    if let Err(e) = insert_user_result {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                let message = db_err.message();
                if message.contains("users.username") {
                    return Err(AppError::BadRequest(anyhow!("Username is already taken.")));
                }
                if message.contains("users.email") {
                    return Err(AppError::BadRequest(anyhow!("Email is already taken.")));
                }
            }
        }
        return Err(AppError::InternalServerError(anyhow!(
            "Failed to create user account: {}",
            e
        )));
    }

    Ok(user_id)
}

pub async fn find_user_by_id(conn: &mut SqliteConnection, user_id: Uuid) -> AppResult<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn find_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> AppResult<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

/// Same as [`find_user_by_username`] but an unknown name is a 404.
pub async fn get_user_by_username(conn: &mut SqliteConnection, username: &str) -> AppResult<User> {
    find_user_by_username(conn, username)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("User {} does not exist.", username)))
}

pub async fn get_user_by_id(conn: &mut SqliteConnection, user_id: Uuid) -> AppResult<User> {
    find_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(anyhow!("Invalid session token.")))
}

pub async fn find_user_id_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> AppResult<Option<Uuid>> {
    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(id)
}

pub async fn update_user_profile_by_id(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    profile: &ProfileUpdate<'_>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET name = $1, email = $2, phone_number = $3, gender = $4,
            profile_image = $5, profile_image_minified = $5, cover_image = $6
        WHERE id = $7
        "#,
    )
    .bind(profile.name)
    .bind(profile.email)
    .bind(profile.phone_number)
    .bind(profile.gender)
    .bind(profile.profile_image)
    .bind(profile.cover_image)
    .bind(user_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        AppError::InternalServerError(anyhow!("Failed to update user profile: {}", e))
    })?;

    Ok(())
}

pub async fn update_password_hash(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    password_hash: &str,
) -> AppResult<()> {
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
