//! Reference-integrity helpers.
//!
//! Every function verifies that a referenced lookup record exists and is
//! still active, and returns `AppError::NotFound` if it isn't. A booking
//! must never point at a deactivated nurse, intervention type, or place.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};

pub async fn verify_nurse(pool: &PgPool, nurse_id: Uuid) -> Result<()> {
    let ok: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM nurse_staff WHERE id = $1 AND is_active = true)",
    )
    .bind(nurse_id)
    .fetch_one(pool)
    .await?;

    if !ok {
        return Err(AppError::NotFound("Nurse not found".into()));
    }
    Ok(())
}

pub async fn verify_intervention_type(pool: &PgPool, type_id: Uuid) -> Result<()> {
    let ok: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM intervention_types WHERE id = $1 AND is_active = true)",
    )
    .bind(type_id)
    .fetch_one(pool)
    .await?;

    if !ok {
        return Err(AppError::NotFound("Intervention type not found".into()));
    }
    Ok(())
}

pub async fn verify_place(pool: &PgPool, place_id: Uuid) -> Result<()> {
    let ok: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM places WHERE id = $1 AND is_active = true)",
    )
    .bind(place_id)
    .fetch_one(pool)
    .await?;

    if !ok {
        return Err(AppError::NotFound("Place not found".into()));
    }
    Ok(())
}

/// Checks the optional reference fields of a booking payload in one go.
pub async fn verify_booking_refs(
    pool: &PgPool,
    nurse_id: Option<Uuid>,
    intervention_type_id: Option<Uuid>,
    place_id: Option<Uuid>,
) -> Result<()> {
    if let Some(id) = nurse_id {
        verify_nurse(pool, id).await?;
    }
    if let Some(id) = intervention_type_id {
        verify_intervention_type(pool, id).await?;
    }
    if let Some(id) = place_id {
        verify_place(pool, id).await?;
    }
    Ok(())
}
