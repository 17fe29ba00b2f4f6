use serde::Serialize;
use time::macros::time;
use time::{Date, Time};

use crate::models::booking::BookingView;
use crate::models::oncall::{OncallSlate, OncallView};

/// The bookable half-hour grid for a service day: 08:00 through 17:00
/// inclusive, 19 slots.
pub const SERVICE_SLOTS: [Time; 19] = [
    time!(08:00),
    time!(08:30),
    time!(09:00),
    time!(09:30),
    time!(10:00),
    time!(10:30),
    time!(11:00),
    time!(11:30),
    time!(12:00),
    time!(12:30),
    time!(13:00),
    time!(13:30),
    time!(14:00),
    time!(14:30),
    time!(15:00),
    time!(15:30),
    time!(16:00),
    time!(16:30),
    time!(17:00),
];

/// Parses a slot time from client input. A stored time may carry a seconds
/// component (`HH:MM:SS`); comparison happens on the truncated `HH:MM`,
/// after trimming surrounding whitespace.
pub fn parse_slot_time(raw: &str) -> Option<Time> {
    let t = raw.trim();
    let t = if t.len() == 8 && t.as_bytes()[2] == b':' && t.as_bytes()[5] == b':' {
        &t[..5]
    } else {
        t
    };
    let (h, m) = t.split_once(':')?;
    let hour: u8 = h.parse().ok()?;
    let minute: u8 = m.parse().ok()?;
    Time::from_hms(hour, minute, 0).ok()
}

/// Drops seconds and sub-seconds so slot comparison works on `HH:MM`.
pub fn normalize_slot_time(t: Time) -> Time {
    Time::from_hms(t.hour(), t.minute(), 0).unwrap_or(t)
}

pub fn slot_label(t: Time) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotSchedule {
    /// Slot time as `HH:MM`.
    pub time: String,
    pub bookings: Vec<BookingView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySchedule {
    pub date: Date,
    pub booking_count: usize,
    pub slots: Vec<SlotSchedule>,
    pub oncall: OncallSlate,
}

/// Builds the day view for `date`: every matching booking lands in the slot
/// whose time equals its normalized `slot_time`. A slot holds any number of
/// bookings.
pub fn day_schedule(date: Date, bookings: &[BookingView], oncall: &[OncallView]) -> DaySchedule {
    let day_bookings: Vec<&BookingView> =
        bookings.iter().filter(|b| b.booking_date == date).collect();

    let slots = SERVICE_SLOTS
        .iter()
        .map(|&slot| SlotSchedule {
            time: slot_label(slot),
            bookings: day_bookings
                .iter()
                .filter(|b| normalize_slot_time(b.slot_time) == slot)
                .map(|b| (*b).clone())
                .collect(),
        })
        .collect();

    let day_oncall: Vec<OncallView> = oncall
        .iter()
        .filter(|o| o.oncall_date == date)
        .cloned()
        .collect();

    DaySchedule {
        date,
        booking_count: day_bookings.len(),
        slots,
        oncall: OncallSlate::from_assignments(day_oncall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::oncall::CallType;
    use crate::schedule::testutil;
    use time::macros::date;

    #[test]
    fn service_grid_is_19_half_hour_slots() {
        assert_eq!(SERVICE_SLOTS.len(), 19);
        assert_eq!(slot_label(SERVICE_SLOTS[0]), "08:00");
        assert_eq!(slot_label(SERVICE_SLOTS[18]), "17:00");
        for pair in SERVICE_SLOTS.windows(2) {
            assert_eq!(pair[1] - pair[0], time::Duration::minutes(30));
        }
    }

    #[test]
    fn seconds_component_is_truncated() {
        assert_eq!(parse_slot_time("08:00:00"), parse_slot_time("08:00"));
        assert_ne!(parse_slot_time("08:30"), parse_slot_time("08:00"));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(parse_slot_time("  09:30 "), parse_slot_time("09:30"));
        assert_eq!(parse_slot_time(" 09:30:15 "), parse_slot_time("09:30"));
    }

    #[test]
    fn invalid_times_are_rejected() {
        assert_eq!(parse_slot_time(""), None);
        assert_eq!(parse_slot_time("25:00"), None);
        assert_eq!(parse_slot_time("0830"), None);
        assert_eq!(parse_slot_time("whenever"), None);
    }

    #[test]
    fn multiple_bookings_share_one_slot() {
        let d = date!(2024 - 03 - 15);
        let bookings = vec![
            testutil::booking_named(d, "09:00", 50.0, 0.0, "Jane Doe"),
            testutil::booking_named(d, "09:00:00", 0.0, 0.0, "John Roe"),
            testutil::booking_named(d, "10:30", 0.0, 0.0, "Ann Poe"),
        ];

        let view = day_schedule(d, &bookings, &[]);
        assert_eq!(view.booking_count, 3);

        let nine = view.slots.iter().find(|s| s.time == "09:00").unwrap();
        assert_eq!(nine.bookings.len(), 2);

        let half_ten = view.slots.iter().find(|s| s.time == "10:30").unwrap();
        assert_eq!(half_ten.bookings.len(), 1);
        assert_eq!(half_ten.bookings[0].patient_name, "Ann Poe");
    }

    #[test]
    fn other_days_are_excluded() {
        let bookings = vec![
            testutil::booking(date!(2024 - 03 - 15), "09:00", 0.0, 0.0),
            testutil::booking(date!(2024 - 03 - 16), "09:00", 0.0, 0.0),
        ];

        let view = day_schedule(date!(2024 - 03 - 15), &bookings, &[]);
        assert_eq!(view.booking_count, 1);
    }

    #[test]
    fn oncall_slate_fills_roles_for_the_day() {
        let d = date!(2024 - 03 - 15);
        let oncall = vec![
            testutil::oncall(d, CallType::FirstCall),
            testutil::oncall(date!(2024 - 03 - 16), CallType::SecondCall),
        ];

        let view = day_schedule(d, &[], &oncall);
        assert!(view.oncall.first_call.is_some());
        assert!(view.oncall.second_call.is_none());
    }
}
