use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use rand_core::OsRng;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{AuthUser, Capability},
    error::{AppError, Result},
    models::common::{ApiResponse, PaginationParams},
    models::user::{CreateUserRequest, UserProfile},
};

pub async fn list(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<UserProfile>>> {
    auth.require(Capability::ManageUsers)?;

    let rows = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, email, display_name, role, is_active
        FROM app_users
        ORDER BY display_name
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_one(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>> {
    if !auth.role.allows(Capability::ManageUsers) && auth.id != id {
        return Err(AppError::Forbidden);
    }

    let row = sqlx::query_as::<_, UserProfile>(
        "SELECT id, email, display_name, role, is_active FROM app_users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(row))
}

pub async fn create(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserProfile>>> {
    req.validate()?;
    auth.require(Capability::ManageUsers)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
        .to_string();

    let row = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO app_users (id, email, display_name, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, display_name, role, is_active
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.email)
    .bind(&req.display_name)
    .bind(&hash)
    .bind(req.role)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::ok(row))
}

/// Soft delete: the row stays for audit references, the login stops working.
pub async fn deactivate(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    auth.require(Capability::ManageUsers)?;

    if auth.id == id {
        return Err(AppError::BadRequest("Cannot deactivate your own account".into()));
    }

    let rows = sqlx::query("UPDATE app_users SET is_active = false, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(ApiResponse::ok_empty())
}
