//! Derived scheduling views. Everything here is a pure projection over the
//! booking and on-call collections; nothing is persisted and every view is
//! recomputed in full from its inputs.

pub mod calendar;
pub mod slots;

pub use calendar::{grid_range, month_grid, CalendarDay, CalendarMonth};
pub use slots::{
    day_schedule, normalize_slot_time, parse_slot_time, slot_label, DaySchedule, SlotSchedule,
    SERVICE_SLOTS,
};

use crate::models::booking::PaymentStatus;

/// Classifies a booking's payment completeness. The rules form an
/// order-sensitive decision list: the first match wins.
pub fn payment_status(outstanding_amount: f64, paid_amount: f64) -> PaymentStatus {
    if outstanding_amount == 0.0 && paid_amount == 0.0 {
        PaymentStatus::NoPayment
    } else if paid_amount >= outstanding_amount {
        PaymentStatus::Paid
    } else if paid_amount > 0.0 {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Outstanding
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use time::{Date, OffsetDateTime, Time};
    use uuid::Uuid;

    use crate::models::booking::{BookingStatus, BookingView, PaymentMethod};
    use crate::models::oncall::{CallType, OncallView};
    use crate::schedule;

    pub fn booking(date: Date, slot: &str, outstanding: f64, paid: f64) -> BookingView {
        booking_named(date, slot, outstanding, paid, "Test Patient")
    }

    pub fn booking_named(
        date: Date,
        slot: &str,
        outstanding: f64,
        paid: f64,
        patient: &str,
    ) -> BookingView {
        let slot_time: Time =
            schedule::parse_slot_time(slot).expect("test slot times must parse");
        BookingView {
            id: Uuid::new_v4(),
            patient_name: patient.to_string(),
            patient_id_case_assess: None,
            booking_date: date,
            slot_time,
            outstanding_amount: outstanding,
            paid_amount: paid,
            payment_method: PaymentMethod::Pending,
            payment_status: schedule::payment_status(outstanding, paid),
            notes: None,
            status: BookingStatus::Scheduled,
            nurse: None,
            intervention_type: None,
            place: None,
            created_by: Uuid::new_v4(),
            updated_by: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    pub fn oncall(date: Date, call_type: CallType) -> OncallView {
        OncallView {
            id: Uuid::new_v4(),
            nurse_id: Uuid::new_v4(),
            oncall_date: date,
            call_type,
            created_by: Uuid::new_v4(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
            nurse: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::PaymentStatus;

    #[test]
    fn nothing_owed_and_nothing_paid_is_no_payment() {
        assert_eq!(payment_status(0.0, 0.0), PaymentStatus::NoPayment);
    }

    #[test]
    fn paid_in_full_is_paid() {
        assert_eq!(payment_status(100.0, 100.0), PaymentStatus::Paid);
    }

    #[test]
    fn overpayment_still_counts_as_paid() {
        assert_eq!(payment_status(100.0, 150.0), PaymentStatus::Paid);
    }

    #[test]
    fn partial_payment() {
        assert_eq!(payment_status(100.0, 40.0), PaymentStatus::Partial);
    }

    #[test]
    fn unpaid_balance_is_outstanding() {
        assert_eq!(payment_status(100.0, 0.0), PaymentStatus::Outstanding);
    }

    #[test]
    fn payment_with_no_balance_recorded_is_paid_not_no_payment() {
        // Only the both-zero case maps to no_payment; the decision list is
        // order-sensitive.
        assert_eq!(payment_status(0.0, 20.0), PaymentStatus::Paid);
    }
}
