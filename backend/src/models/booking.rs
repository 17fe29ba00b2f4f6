use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};
use uuid::Uuid;
use validator::Validate;

use crate::schedule;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    #[default]
    Pending,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

/// Derived payment completeness. Never stored; recomputed from the two
/// monetary fields on every read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    NoPayment,
    Paid,
    Partial,
    Outstanding,
}

/// Flat row shape of a booking joined with its lookup records.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub nurse_id: Option<Uuid>,
    pub patient_name: String,
    pub patient_id_case_assess: Option<String>,
    pub booking_date: Date,
    pub slot_time: Time,
    pub intervention_type_id: Option<Uuid>,
    pub place_id: Option<Uuid>,
    pub outstanding_amount: f64,
    pub paid_amount: f64,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub nurse_name: Option<String>,
    pub nurse_color_code: Option<String>,
    pub intervention_type_name: Option<String>,
    pub intervention_duration_minutes: Option<i32>,
    pub place_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NurseRef {
    pub id: Uuid,
    pub name: String,
    pub color_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterventionTypeRef {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceRef {
    pub id: Uuid,
    pub name: String,
}

/// Booking as exposed to clients: lookup references nested, payment status
/// derived. `slot_time` serializes as `HH:MM` and `booking_date` as
/// `yyyy-MM-dd`, the forms the scheduling views match on.
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub id: Uuid,
    pub patient_name: String,
    pub patient_id_case_assess: Option<String>,
    pub booking_date: Date,
    #[serde(serialize_with = "serialize_slot_time")]
    pub slot_time: Time,
    pub outstanding_amount: f64,
    pub paid_amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub nurse: Option<NurseRef>,
    pub intervention_type: Option<InterventionTypeRef>,
    pub place: Option<PlaceRef>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

fn serialize_slot_time<S: serde::Serializer>(t: &Time, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&schedule::slot_label(*t))
}

impl From<BookingRow> for BookingView {
    fn from(r: BookingRow) -> Self {
        let nurse = match (r.nurse_id, r.nurse_name, r.nurse_color_code) {
            (Some(id), Some(name), Some(color_code)) => Some(NurseRef {
                id,
                name,
                color_code,
            }),
            _ => None,
        };
        let intervention_type =
            match (r.intervention_type_id, r.intervention_type_name, r.intervention_duration_minutes) {
                (Some(id), Some(name), Some(duration_minutes)) => Some(InterventionTypeRef {
                    id,
                    name,
                    duration_minutes,
                }),
                _ => None,
            };
        let place = match (r.place_id, r.place_name) {
            (Some(id), Some(name)) => Some(PlaceRef { id, name }),
            _ => None,
        };

        BookingView {
            id: r.id,
            patient_name: r.patient_name,
            patient_id_case_assess: r.patient_id_case_assess,
            booking_date: r.booking_date,
            slot_time: schedule::normalize_slot_time(r.slot_time),
            outstanding_amount: r.outstanding_amount,
            paid_amount: r.paid_amount,
            payment_method: r.payment_method,
            payment_status: schedule::payment_status(r.outstanding_amount, r.paid_amount),
            notes: r.notes,
            status: r.status,
            nurse,
            intervention_type,
            place,
            created_by: r.created_by,
            updated_by: r.updated_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "patient_name is required"))]
    pub patient_name: String,
    pub patient_id_case_assess: Option<String>,
    pub booking_date: Date,
    /// `HH:MM` or `HH:MM:SS`; normalized to the half-hour slot grid.
    pub slot_time: String,
    pub nurse_id: Option<Uuid>,
    pub intervention_type_id: Option<Uuid>,
    pub place_id: Option<Uuid>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "outstanding_amount must not be negative"))]
    pub outstanding_amount: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "paid_amount must not be negative"))]
    pub paid_amount: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Partial update: omitted keys leave the stored value untouched, so a
/// sparse edit never clears a foreign key.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookingRequest {
    pub patient_name: Option<String>,
    pub patient_id_case_assess: Option<String>,
    pub booking_date: Option<Date>,
    pub slot_time: Option<String>,
    pub nurse_id: Option<Uuid>,
    pub intervention_type_id: Option<Uuid>,
    pub place_id: Option<Uuid>,
    #[validate(range(min = 0.0, message = "outstanding_amount must not be negative"))]
    pub outstanding_amount: Option<f64>,
    #[validate(range(min = 0.0, message = "paid_amount must not be negative"))]
    pub paid_amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
    pub status: Option<BookingStatus>,
}

/// Exact-match filters, AND-combined.
#[derive(Debug, Default, Deserialize)]
pub struct BookingFilters {
    pub date: Option<Date>,
    pub nurse_id: Option<Uuid>,
    pub intervention_type_id: Option<Uuid>,
    pub place_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
    pub payment_method: Option<PaymentMethod>,
}
