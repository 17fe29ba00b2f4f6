use axum::{
    extract::{Path, Query, State},
    Json,
};
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Capability},
    error::{AppError, Result},
    models::common::ApiResponse,
    models::oncall::{CallType, OncallRangeParams, OncallRow, OncallSlate, OncallView, SetOncallSlateRequest},
    ref_guard,
};

const ONCALL_SELECT: &str = r#"
SELECT o.id, o.nurse_id, o.oncall_date, o.call_type,
       o.created_by, o.created_at, o.updated_at,
       n.name       AS nurse_name,
       n.color_code AS nurse_color_code
FROM nurse_oncall o
LEFT JOIN nurse_staff n ON n.id = o.nurse_id
"#;

pub async fn list_range(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Query(params): Query<OncallRangeParams>,
) -> Result<Json<Vec<OncallView>>> {
    auth.require(Capability::ViewSchedule)?;

    if params.end_date < params.start_date {
        return Err(AppError::BadRequest("end_date must be >= start_date".into()));
    }
    if (params.end_date - params.start_date).whole_days() > 90 {
        return Err(AppError::BadRequest("Date range must not exceed 90 days".into()));
    }

    let assignments = oncall_between(&pool, params.start_date, params.end_date).await?;
    Ok(Json(assignments))
}

pub async fn day_slate(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(date): Path<Date>,
) -> Result<Json<OncallSlate>> {
    auth.require(Capability::ViewSchedule)?;

    let slate = fetch_slate(&pool, date).await?;
    Ok(Json(slate))
}

/// Replaces a day's on-call slate in one transaction: each provided role is
/// upserted, each omitted role is cleared. The unique (date, call_type)
/// constraint makes the upsert race-free, and the transaction means no
/// partially-applied slate is ever observable.
pub async fn set_day_slate(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(date): Path<Date>,
    Json(req): Json<SetOncallSlateRequest>,
) -> Result<Json<ApiResponse<OncallSlate>>> {
    auth.require(Capability::ManageOncall)?;

    for nurse_id in [req.first_call, req.second_call].into_iter().flatten() {
        ref_guard::verify_nurse(&pool, nurse_id).await?;
    }

    let mut tx = pool.begin().await?;

    let roles = [
        (CallType::FirstCall, req.first_call),
        (CallType::SecondCall, req.second_call),
    ];
    for (call_type, assignment) in roles {
        match assignment {
            Some(nurse_id) => {
                sqlx::query(
                    r#"
                    INSERT INTO nurse_oncall (id, nurse_id, oncall_date, call_type, created_by)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (oncall_date, call_type)
                    DO UPDATE SET nurse_id = EXCLUDED.nurse_id, updated_at = NOW()
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(nurse_id)
                .bind(date)
                .bind(call_type)
                .bind(auth.id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query("DELETE FROM nurse_oncall WHERE oncall_date = $1 AND call_type = $2")
                    .bind(date)
                    .bind(call_type)
                    .execute(&mut *tx)
                    .await?;
            }
        }
    }

    tx.commit().await?;

    let slate = fetch_slate(&pool, date).await?;
    Ok(ApiResponse::ok(slate))
}

pub async fn remove(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    auth.require(Capability::ManageOncall)?;

    let rows = sqlx::query("DELETE FROM nurse_oncall WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(AppError::NotFound("On-call assignment not found".into()));
    }

    Ok(ApiResponse::ok_empty())
}

async fn fetch_slate(pool: &PgPool, date: Date) -> Result<OncallSlate> {
    let assignments = oncall_between(pool, date, date).await?;
    Ok(OncallSlate::from_assignments(assignments))
}

/// All on-call assignments in `[start, end]`, nurse joined, in date order.
/// Used by the derived calendar and day views.
pub(crate) async fn oncall_between(
    pool: &PgPool,
    start: Date,
    end: Date,
) -> Result<Vec<OncallView>> {
    let rows = sqlx::query_as::<_, OncallRow>(&format!(
        r#"
        {ONCALL_SELECT}
        WHERE o.oncall_date BETWEEN $1 AND $2
        ORDER BY o.oncall_date, o.call_type
        "#
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(OncallView::from).collect())
}
