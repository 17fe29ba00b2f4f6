use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{extract::State, Json};
use sqlx::PgPool;

use crate::{
    auth::{create_token, AuthUser},
    error::{AppError, Result},
    models::user::{AppUser, LoginRequest, LoginResponse, UserProfile},
    AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = sqlx::query_as::<_, AppUser>(
        r#"
        SELECT id, email, display_name, password_hash, role, is_active, created_at, updated_at
        FROM app_users
        WHERE email = $1 AND is_active = true
        "#,
    )
    .bind(&req.email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::Unauthorized)?;

    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid stored hash")))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized)?;

    let token = create_token(user.id, user.role, &state.jwt_secret, state.jwt_expiry_hours)
        .map_err(AppError::Internal)?;

    Ok(Json(LoginResponse {
        token,
        user: UserProfile {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            is_active: user.is_active,
        },
    }))
}

pub async fn me(State(pool): State<PgPool>, auth: AuthUser) -> Result<Json<UserProfile>> {
    let profile = sqlx::query_as::<_, UserProfile>(
        "SELECT id, email, display_name, role, is_active FROM app_users WHERE id = $1",
    )
    .bind(auth.id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(profile))
}
