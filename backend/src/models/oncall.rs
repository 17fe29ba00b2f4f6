use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::models::booking::NurseRef;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "call_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    FirstCall,
    SecondCall,
}

/// Flat row shape of an on-call assignment joined with its nurse.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OncallRow {
    pub id: Uuid,
    pub nurse_id: Uuid,
    pub oncall_date: Date,
    pub call_type: CallType,
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub nurse_name: Option<String>,
    pub nurse_color_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OncallView {
    pub id: Uuid,
    pub nurse_id: Uuid,
    pub oncall_date: Date,
    pub call_type: CallType,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub nurse: Option<NurseRef>,
}

impl From<OncallRow> for OncallView {
    fn from(r: OncallRow) -> Self {
        let nurse = match (r.nurse_name, r.nurse_color_code) {
            (Some(name), Some(color_code)) => Some(NurseRef {
                id: r.nurse_id,
                name,
                color_code,
            }),
            _ => None,
        };
        OncallView {
            id: r.id,
            nurse_id: r.nurse_id,
            oncall_date: r.oncall_date,
            call_type: r.call_type,
            created_by: r.created_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
            nurse,
        }
    }
}

/// A day's slate: at most one nurse per call role.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OncallSlate {
    pub first_call: Option<OncallView>,
    pub second_call: Option<OncallView>,
}

impl OncallSlate {
    pub fn from_assignments(assignments: Vec<OncallView>) -> Self {
        let mut slate = OncallSlate::default();
        for a in assignments {
            match a.call_type {
                CallType::FirstCall => slate.first_call = Some(a),
                CallType::SecondCall => slate.second_call = Some(a),
            }
        }
        slate
    }
}

/// Replaces the slate for one date. A `None` role clears any existing
/// assignment for that role; a `Some` role upserts it.
#[derive(Debug, Deserialize)]
pub struct SetOncallSlateRequest {
    pub first_call: Option<Uuid>,
    pub second_call: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct OncallRangeParams {
    pub start_date: Date,
    pub end_date: Date,
}
