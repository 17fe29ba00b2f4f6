use serde::Serialize;
use time::{Date, Duration};

use crate::models::booking::BookingView;
use crate::models::oncall::OncallView;

/// One cell of the month grid. `has_bookings` and `has_oncall` are
/// independent flags; a day can carry both.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: Date,
    pub day: u8,
    pub month: u8,
    pub year: i32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub booking_count: usize,
    pub bookings: Vec<BookingView>,
    pub oncall_assignments: Vec<OncallView>,
    pub has_bookings: bool,
    pub has_oncall: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u8,
    pub days: Vec<CalendarDay>,
}

/// The whole-week window around `reference`'s month: starts on the Sunday on
/// or before the 1st, ends on the Saturday on or after the last day.
pub fn grid_range(reference: Date) -> (Date, Date) {
    let first = reference.replace_day(1).unwrap_or(reference);
    let last = reference
        .replace_day(reference.month().length(reference.year()))
        .unwrap_or(first);

    let start = first - Duration::days(i64::from(first.weekday().number_days_from_sunday()));
    let end = last + Duration::days(i64::from(6 - last.weekday().number_days_from_sunday()));
    (start, end)
}

/// Computes the month grid for the month containing `reference`. Every cell
/// is rebuilt from the full collections on each call; nothing is cached.
pub fn month_grid(
    reference: Date,
    today: Date,
    bookings: &[BookingView],
    oncall: &[OncallView],
) -> Vec<CalendarDay> {
    let (start, end) = grid_range(reference);

    let mut days = Vec::with_capacity(42);
    let mut cursor = start;
    loop {
        let day_bookings: Vec<BookingView> = bookings
            .iter()
            .filter(|b| b.booking_date == cursor)
            .cloned()
            .collect();
        let day_oncall: Vec<OncallView> = oncall
            .iter()
            .filter(|o| o.oncall_date == cursor)
            .cloned()
            .collect();

        days.push(CalendarDay {
            date: cursor,
            day: cursor.day(),
            month: u8::from(cursor.month()),
            year: cursor.year(),
            is_current_month: cursor.month() == reference.month()
                && cursor.year() == reference.year(),
            is_today: cursor == today,
            booking_count: day_bookings.len(),
            has_bookings: !day_bookings.is_empty(),
            has_oncall: !day_oncall.is_empty(),
            bookings: day_bookings,
            oncall_assignments: day_oncall,
        });

        if cursor == end {
            break;
        }
        match cursor.next_day() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    days
}
