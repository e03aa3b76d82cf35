//! Donor endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::{Donor, DonorQuery, RegisterDonorRequest, UserRole};
use crate::services::DonorService;
use crate::utils::error::{AppError, AppResult};
use crate::AppState;

#[derive(Serialize)]
pub struct DonorResponse {
    pub message: String,
    pub donor: Donor,
}

#[derive(Serialize)]
pub struct DonorListResponse {
    pub donors: Vec<Donor>,
    pub count: usize,
}

fn donor_service(state: &AppState) -> DonorService {
    DonorService::new(state.db.clone(), state.config.donor.expiry_days)
}

/// POST /donors/register
///
/// Registers or renews the caller's donor profile. Only `donor` accounts may
/// publish one; a renewal overwrites every field and resets the expiry
/// window.
pub async fn register_donor(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<RegisterDonorRequest>,
) -> AppResult<(StatusCode, Json<DonorResponse>)> {
    if auth_user.role != UserRole::Donor {
        return Err(AppError::Forbidden(
            "Only donor accounts can register a donor profile".to_string(),
        ));
    }

    input.validate()?;

    let (donor, created) = donor_service(&state)
        .register_or_renew(auth_user.id, input)
        .await?;

    tracing::info!(
        donor_id = %donor.id,
        district = %donor.district,
        blood_group = %donor.blood_group,
        created,
        "Donor profile saved"
    );

    let (status, message) = if created {
        (StatusCode::CREATED, "Donor profile created")
    } else {
        (StatusCode::OK, "Donor profile renewed")
    };

    Ok((
        status,
        Json(DonorResponse {
            message: message.to_string(),
            donor,
        }),
    ))
}

/// POST /donors/deactivate
pub async fn deactivate_donor(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DonorResponse>> {
    let donor = donor_service(&state).deactivate(&auth_user.id).await?;

    tracing::info!(donor_id = %donor.id, "Donor deactivated");

    Ok(Json(DonorResponse {
        message: "Donor profile deactivated".to_string(),
        donor,
    }))
}

/// GET /donors/my-profile
pub async fn my_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Donor>> {
    let donor = donor_service(&state)
        .get_by_user(&auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Donor profile not found".to_string()))?;

    Ok(Json(donor))
}

/// GET /donors/all
pub async fn list_donors(
    State(state): State<AppState>,
    Query(query): Query<DonorQuery>,
) -> AppResult<Json<DonorListResponse>> {
    let donors = donor_service(&state).list(&query).await?;
    let count = donors.len();

    Ok(Json(DonorListResponse { donors, count }))
}

/// GET /donors/map
///
/// Available donors with coordinates, for map display.
pub async fn map_donors(
    State(state): State<AppState>,
    Query(query): Query<DonorQuery>,
) -> AppResult<Json<DonorListResponse>> {
    let donors = donor_service(&state)
        .find_matches_with_location(query.blood_group, query.district.as_deref())
        .await?;
    let count = donors.len();

    Ok(Json(DonorListResponse { donors, count }))
}

/// GET /donors/{id}
pub async fn get_donor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Donor>> {
    let donor = donor_service(&state)
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Donor not found".to_string()))?;

    Ok(Json(donor))
}
