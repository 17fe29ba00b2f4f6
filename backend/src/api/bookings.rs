use axum::{
    extract::{Path, Query, State},
    Json,
};
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{AuthUser, Capability},
    error::{AppError, Result},
    models::booking::{
        BookingFilters, BookingRow, BookingView, CreateBookingRequest, UpdateBookingRequest,
    },
    models::common::ApiResponse,
    ref_guard, schedule,
};

/// Booking joined with its lookup records. Shared by every read path so a
/// booking always comes back in the same shape.
const BOOKING_SELECT: &str = r#"
SELECT b.id, b.nurse_id, b.patient_name, b.patient_id_case_assess,
       b.booking_date, b.slot_time, b.intervention_type_id, b.place_id,
       b.outstanding_amount, b.paid_amount, b.payment_method, b.notes,
       b.status, b.created_by, b.updated_by, b.created_at, b.updated_at,
       n.name              AS nurse_name,
       n.color_code        AS nurse_color_code,
       it.name             AS intervention_type_name,
       it.duration_minutes AS intervention_duration_minutes,
       p.name              AS place_name
FROM nurse_bookings b
LEFT JOIN nurse_staff        n  ON n.id  = b.nurse_id
LEFT JOIN intervention_types it ON it.id = b.intervention_type_id
LEFT JOIN places             p  ON p.id  = b.place_id
"#;

pub async fn list(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<Vec<BookingView>>> {
    auth.require(Capability::ViewSchedule)?;

    let rows = sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        {BOOKING_SELECT}
        WHERE ($1::date IS NULL OR b.booking_date = $1)
          AND ($2::uuid IS NULL OR b.nurse_id = $2)
          AND ($3::uuid IS NULL OR b.intervention_type_id = $3)
          AND ($4::uuid IS NULL OR b.place_id = $4)
          AND ($5::booking_status IS NULL OR b.status = $5)
          AND ($6::payment_method IS NULL OR b.payment_method = $6)
        ORDER BY b.booking_date, b.slot_time
        "#
    ))
    .bind(filters.date)
    .bind(filters.nurse_id)
    .bind(filters.intervention_type_id)
    .bind(filters.place_id)
    .bind(filters.status)
    .bind(filters.payment_method)
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows.into_iter().map(BookingView::from).collect()))
}

pub async fn get_one(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>> {
    auth.require(Capability::ViewSchedule)?;

    let row = fetch_booking(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

    Ok(Json(row.into()))
}

pub async fn create(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingView>>> {
    req.validate()?;
    auth.require(Capability::ManageBookings)?;

    let slot_time = schedule::parse_slot_time(&req.slot_time)
        .ok_or_else(|| AppError::BadRequest("slot_time must be HH:MM or HH:MM:SS".into()))?;

    ref_guard::verify_booking_refs(&pool, req.nurse_id, req.intervention_type_id, req.place_id)
        .await?;

    let new_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO nurse_bookings
            (id, nurse_id, patient_name, patient_id_case_assess, booking_date, slot_time,
             intervention_type_id, place_id, outstanding_amount, paid_amount,
             payment_method, notes, created_by, updated_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
        "#,
    )
    .bind(new_id)
    .bind(req.nurse_id)
    .bind(&req.patient_name)
    .bind(&req.patient_id_case_assess)
    .bind(req.booking_date)
    .bind(slot_time)
    .bind(req.intervention_type_id)
    .bind(req.place_id)
    .bind(req.outstanding_amount)
    .bind(req.paid_amount)
    .bind(req.payment_method)
    .bind(&req.notes)
    .bind(auth.id)
    .execute(&pool)
    .await?;

    let row = fetch_booking(&pool, new_id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Created booking vanished")))?;

    Ok(ApiResponse::ok(row.into()))
}

pub async fn update(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<ApiResponse<BookingView>>> {
    req.validate()?;
    auth.require(Capability::ManageBookings)?;

    let slot_time = match &req.slot_time {
        Some(raw) => Some(schedule::parse_slot_time(raw).ok_or_else(|| {
            AppError::BadRequest("slot_time must be HH:MM or HH:MM:SS".into())
        })?),
        None => None,
    };

    ref_guard::verify_booking_refs(&pool, req.nurse_id, req.intervention_type_id, req.place_id)
        .await?;

    // Omitted keys keep the stored value: a sparse edit never clears a
    // foreign key or zeroes an amount.
    let rows = sqlx::query(
        r#"
        UPDATE nurse_bookings
        SET patient_name           = COALESCE($2, patient_name),
            patient_id_case_assess = COALESCE($3, patient_id_case_assess),
            booking_date           = COALESCE($4, booking_date),
            slot_time              = COALESCE($5, slot_time),
            nurse_id               = COALESCE($6, nurse_id),
            intervention_type_id   = COALESCE($7, intervention_type_id),
            place_id               = COALESCE($8, place_id),
            outstanding_amount     = COALESCE($9, outstanding_amount),
            paid_amount            = COALESCE($10, paid_amount),
            payment_method         = COALESCE($11, payment_method),
            notes                  = COALESCE($12, notes),
            status                 = COALESCE($13, status),
            updated_by             = $14,
            updated_at             = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&req.patient_name)
    .bind(&req.patient_id_case_assess)
    .bind(req.booking_date)
    .bind(slot_time)
    .bind(req.nurse_id)
    .bind(req.intervention_type_id)
    .bind(req.place_id)
    .bind(req.outstanding_amount)
    .bind(req.paid_amount)
    .bind(req.payment_method)
    .bind(&req.notes)
    .bind(req.status)
    .bind(auth.id)
    .execute(&pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(AppError::NotFound("Booking not found".into()));
    }

    let row = fetch_booking(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

    Ok(ApiResponse::ok(row.into()))
}

pub async fn remove(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    auth.require(Capability::ManageBookings)?;

    let rows = sqlx::query("DELETE FROM nurse_bookings WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(AppError::NotFound("Booking not found".into()));
    }

    Ok(ApiResponse::ok_empty())
}

async fn fetch_booking(pool: &PgPool, id: Uuid) -> Result<Option<BookingRow>> {
    let row = sqlx::query_as::<_, BookingRow>(&format!("{BOOKING_SELECT} WHERE b.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All bookings whose date falls in `[start, end]`, joined, in schedule
/// order. Used by the derived calendar and day views.
pub(crate) async fn bookings_between(
    pool: &PgPool,
    start: Date,
    end: Date,
) -> Result<Vec<BookingView>> {
    let rows = sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        {BOOKING_SELECT}
        WHERE b.booking_date BETWEEN $1 AND $2
        ORDER BY b.booking_date, b.slot_time
        "#
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(BookingView::from).collect())
}
