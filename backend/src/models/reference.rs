use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

/// A nurse who can be booked or placed on call. `color_code` is the stable
/// color used to tell nurses apart in calendar views.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NurseStaff {
    pub id: Uuid,
    pub name: String,
    pub professional_registration: Option<String>,
    pub specialization: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub color_code: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InterventionType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub facility_type: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Combined payload for the one-shot reference refresh. The three loads are
/// independent: a failed list comes back empty with its error recorded in
/// `errors` while the others still carry data.
#[derive(Debug, Serialize)]
pub struct ReferenceData {
    pub nurses: Vec<NurseStaff>,
    pub intervention_types: Vec<InterventionType>,
    pub places: Vec<Place>,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNurseRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub professional_registration: Option<String>,
    pub specialization: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub color_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNurseRequest {
    pub name: Option<String>,
    pub professional_registration: Option<String>,
    pub specialization: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub color_code: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInterventionTypeRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInterventionTypeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlaceRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub address: Option<String>,
    pub facility_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaceRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub facility_type: Option<String>,
    pub is_active: Option<bool>,
}
