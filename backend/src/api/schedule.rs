use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use time::{Date, Month, OffsetDateTime};

use crate::{
    api::{bookings, oncall},
    auth::{AuthUser, Capability},
    error::{AppError, Result},
    schedule::{self, CalendarMonth, DaySchedule},
};

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u8,
}

/// Month grid for the requested month. Bookings and on-call rows are
/// fetched for the whole padded week range, so any month can be viewed
/// directly without a rolling client-side window.
pub async fn month_view(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Query(q): Query<MonthQuery>,
) -> Result<Json<CalendarMonth>> {
    auth.require(Capability::ViewSchedule)?;

    let month = Month::try_from(q.month)
        .map_err(|_| AppError::BadRequest("month must be between 1 and 12".into()))?;
    let reference = Date::from_calendar_date(q.year, month, 1)
        .map_err(|e| AppError::BadRequest(format!("Invalid month: {e}")))?;

    let (start, end) = schedule::grid_range(reference);
    let bookings = bookings::bookings_between(&pool, start, end).await?;
    let oncall = oncall::oncall_between(&pool, start, end).await?;

    let today = OffsetDateTime::now_utc().date();
    let days = schedule::month_grid(reference, today, &bookings, &oncall);

    Ok(Json(CalendarMonth {
        year: q.year,
        month: q.month,
        days,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Date,
}

/// Half-hour slot view for one day, with the day's on-call slate.
pub async fn day_view(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Query(q): Query<DayQuery>,
) -> Result<Json<DaySchedule>> {
    auth.require(Capability::ViewSchedule)?;

    let bookings = bookings::bookings_between(&pool, q.date, q.date).await?;
    let oncall = oncall::oncall_between(&pool, q.date, q.date).await?;

    Ok(Json(schedule::day_schedule(q.date, &bookings, &oncall)))
}
