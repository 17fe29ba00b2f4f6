use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{AuthUser, Capability},
    error::{AppError, Result},
    models::common::ApiResponse,
    models::reference::{
        CreateInterventionTypeRequest, CreateNurseRequest, CreatePlaceRequest, InterventionType,
        NurseStaff, Place, ReferenceData, UpdateInterventionTypeRequest, UpdateNurseRequest,
        UpdatePlaceRequest,
    },
};

const NURSE_COLUMNS: &str = "id, name, professional_registration, specialization, \
                             contact_number, email, color_code, is_active, created_at, updated_at";
const INTERVENTION_COLUMNS: &str =
    "id, name, description, duration_minutes, is_active, created_at, updated_at";
const PLACE_COLUMNS: &str = "id, name, address, facility_type, is_active, created_at, updated_at";

/// One-shot refresh of all three lookup lists. The loads run concurrently
/// and independently: a failed list comes back empty with its error
/// recorded, while the others still carry data.
pub async fn refresh(State(pool): State<PgPool>, auth: AuthUser) -> Result<Json<ReferenceData>> {
    auth.require(Capability::ViewSchedule)?;

    let (nurses, intervention_types, places) = tokio::join!(
        fetch_nurses(&pool),
        fetch_intervention_types(&pool),
        fetch_places(&pool)
    );

    let mut errors = Vec::new();
    let nurses = nurses.unwrap_or_else(|e| {
        tracing::warn!("Loading nurses failed: {}", e);
        errors.push(format!("nurses: {e}"));
        Vec::new()
    });
    let intervention_types = intervention_types.unwrap_or_else(|e| {
        tracing::warn!("Loading intervention types failed: {}", e);
        errors.push(format!("intervention_types: {e}"));
        Vec::new()
    });
    let places = places.unwrap_or_else(|e| {
        tracing::warn!("Loading places failed: {}", e);
        errors.push(format!("places: {e}"));
        Vec::new()
    });

    Ok(Json(ReferenceData {
        nurses,
        intervention_types,
        places,
        errors,
    }))
}

// -- Nurses --

pub async fn list_nurses(State(pool): State<PgPool>, auth: AuthUser) -> Result<Json<Vec<NurseStaff>>> {
    auth.require(Capability::ViewSchedule)?;
    Ok(Json(fetch_nurses(&pool).await?))
}

pub async fn create_nurse(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Json(req): Json<CreateNurseRequest>,
) -> Result<Json<ApiResponse<NurseStaff>>> {
    req.validate()?;
    auth.require(Capability::ManageReferenceData)?;

    let row = sqlx::query_as::<_, NurseStaff>(&format!(
        r#"
        INSERT INTO nurse_staff
            (id, name, professional_registration, specialization, contact_number, email, color_code)
        VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, '#6b7280'))
        RETURNING {NURSE_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(&req.professional_registration)
    .bind(&req.specialization)
    .bind(&req.contact_number)
    .bind(&req.email)
    .bind(&req.color_code)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::ok(row))
}

pub async fn update_nurse(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateNurseRequest>,
) -> Result<Json<ApiResponse<NurseStaff>>> {
    auth.require(Capability::ManageReferenceData)?;

    let row = sqlx::query_as::<_, NurseStaff>(&format!(
        r#"
        UPDATE nurse_staff
        SET name                      = COALESCE($2, name),
            professional_registration = COALESCE($3, professional_registration),
            specialization            = COALESCE($4, specialization),
            contact_number            = COALESCE($5, contact_number),
            email                     = COALESCE($6, email),
            color_code                = COALESCE($7, color_code),
            is_active                 = COALESCE($8, is_active),
            updated_at                = NOW()
        WHERE id = $1
        RETURNING {NURSE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&req.name)
    .bind(&req.professional_registration)
    .bind(&req.specialization)
    .bind(&req.contact_number)
    .bind(&req.email)
    .bind(&req.color_code)
    .bind(req.is_active)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Nurse not found".into()))?;

    Ok(ApiResponse::ok(row))
}

// -- Intervention types --

pub async fn list_intervention_types(
    State(pool): State<PgPool>,
    auth: AuthUser,
) -> Result<Json<Vec<InterventionType>>> {
    auth.require(Capability::ViewSchedule)?;
    Ok(Json(fetch_intervention_types(&pool).await?))
}

pub async fn create_intervention_type(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Json(req): Json<CreateInterventionTypeRequest>,
) -> Result<Json<ApiResponse<InterventionType>>> {
    req.validate()?;
    auth.require(Capability::ManageReferenceData)?;

    let row = sqlx::query_as::<_, InterventionType>(&format!(
        r#"
        INSERT INTO intervention_types (id, name, description, duration_minutes)
        VALUES ($1, $2, $3, COALESCE($4, 30))
        RETURNING {INTERVENTION_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.duration_minutes)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::ok(row))
}

pub async fn update_intervention_type(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateInterventionTypeRequest>,
) -> Result<Json<ApiResponse<InterventionType>>> {
    auth.require(Capability::ManageReferenceData)?;

    let row = sqlx::query_as::<_, InterventionType>(&format!(
        r#"
        UPDATE intervention_types
        SET name             = COALESCE($2, name),
            description      = COALESCE($3, description),
            duration_minutes = COALESCE($4, duration_minutes),
            is_active        = COALESCE($5, is_active),
            updated_at       = NOW()
        WHERE id = $1
        RETURNING {INTERVENTION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.duration_minutes)
    .bind(req.is_active)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Intervention type not found".into()))?;

    Ok(ApiResponse::ok(row))
}

// -- Places --

pub async fn list_places(State(pool): State<PgPool>, auth: AuthUser) -> Result<Json<Vec<Place>>> {
    auth.require(Capability::ViewSchedule)?;
    Ok(Json(fetch_places(&pool).await?))
}

pub async fn create_place(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Json(req): Json<CreatePlaceRequest>,
) -> Result<Json<ApiResponse<Place>>> {
    req.validate()?;
    auth.require(Capability::ManageReferenceData)?;

    let row = sqlx::query_as::<_, Place>(&format!(
        r#"
        INSERT INTO places (id, name, address, facility_type)
        VALUES ($1, $2, $3, $4)
        RETURNING {PLACE_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(&req.address)
    .bind(&req.facility_type)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::ok(row))
}

pub async fn update_place(
    State(pool): State<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePlaceRequest>,
) -> Result<Json<ApiResponse<Place>>> {
    auth.require(Capability::ManageReferenceData)?;

    let row = sqlx::query_as::<_, Place>(&format!(
        r#"
        UPDATE places
        SET name          = COALESCE($2, name),
            address       = COALESCE($3, address),
            facility_type = COALESCE($4, facility_type),
            is_active     = COALESCE($5, is_active),
            updated_at    = NOW()
        WHERE id = $1
        RETURNING {PLACE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&req.name)
    .bind(&req.address)
    .bind(&req.facility_type)
    .bind(req.is_active)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Place not found".into()))?;

    Ok(ApiResponse::ok(row))
}

// Active-only lists, name ascending, the order reference pickers display.

async fn fetch_nurses(pool: &PgPool) -> sqlx::Result<Vec<NurseStaff>> {
    sqlx::query_as::<_, NurseStaff>(&format!(
        "SELECT {NURSE_COLUMNS} FROM nurse_staff WHERE is_active = true ORDER BY name"
    ))
    .fetch_all(pool)
    .await
}

async fn fetch_intervention_types(pool: &PgPool) -> sqlx::Result<Vec<InterventionType>> {
    sqlx::query_as::<_, InterventionType>(&format!(
        "SELECT {INTERVENTION_COLUMNS} FROM intervention_types WHERE is_active = true ORDER BY name"
    ))
    .fetch_all(pool)
    .await
}

async fn fetch_places(pool: &PgPool) -> sqlx::Result<Vec<Place>> {
    sqlx::query_as::<_, Place>(&format!(
        "SELECT {PLACE_COLUMNS} FROM places WHERE is_active = true ORDER BY name"
    ))
    .fetch_all(pool)
    .await
}
