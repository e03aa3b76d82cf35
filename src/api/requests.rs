//! Blood request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::{BloodRequest, CreateRequestRequest, Donor, RequestQuery};
use crate::services::{DonorService, RequestService};
use crate::utils::error::AppResult;
use crate::AppState;

#[derive(Serialize)]
pub struct CreateRequestResponse {
    pub message: String,
    pub request: BloodRequest,
    /// Number of available donors matching the request at creation time
    pub matching_donors_count: usize,
}

#[derive(Serialize)]
pub struct RequestResponse {
    pub message: String,
    pub request: BloodRequest,
}

#[derive(Serialize)]
pub struct RequestListResponse {
    pub requests: Vec<BloodRequest>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct MatchDonorsResponse {
    pub request_id: Uuid,
    pub donors: Vec<Donor>,
    pub count: usize,
}

fn donor_service(state: &AppState) -> DonorService {
    DonorService::new(state.db.clone(), state.config.donor.expiry_days)
}

/// POST /requests/create
pub async fn create_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateRequestRequest>,
) -> AppResult<(StatusCode, Json<CreateRequestResponse>)> {
    input.validate()?;

    let request = RequestService::new(state.db.clone())
        .create(auth_user.id, input)
        .await?;

    let matches = donor_service(&state)
        .find_matches_for_request(&request)
        .await?;

    tracing::info!(
        request_id = %request.id,
        blood_group = %request.blood_group,
        district = %request.district,
        urgency = %request.urgency,
        matching_donors = matches.len(),
        "Blood request created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateRequestResponse {
            message: "Blood request created".to_string(),
            request,
            matching_donors_count: matches.len(),
        }),
    ))
}

/// GET /requests/my-requests
pub async fn my_requests(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<RequestListResponse>> {
    let requests = RequestService::new(state.db.clone())
        .list_for_user(&auth_user.id)
        .await?;
    let count = requests.len();

    Ok(Json(RequestListResponse { requests, count }))
}

/// POST /requests/{id}/fulfill
pub async fn fulfill_request(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RequestResponse>> {
    let request = RequestService::new(state.db.clone()).fulfill(&id).await?;

    tracing::info!(request_id = %request.id, "Blood request fulfilled");

    Ok(Json(RequestResponse {
        message: "Request marked as fulfilled".to_string(),
        request,
    }))
}

/// GET /requests/all
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestQuery>,
) -> AppResult<Json<RequestListResponse>> {
    let requests = RequestService::new(state.db.clone()).list(&query).await?;
    let count = requests.len();

    Ok(Json(RequestListResponse { requests, count }))
}

/// GET /requests/{id}
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BloodRequest>> {
    let request = RequestService::new(state.db.clone())
        .get_required(&id)
        .await?;

    Ok(Json(request))
}

/// GET /requests/{id}/match-donors
///
/// The available donors that would be notified for this request.
pub async fn match_donors(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MatchDonorsResponse>> {
    let request = RequestService::new(state.db.clone())
        .get_required(&id)
        .await?;

    let donors = donor_service(&state)
        .find_matches_for_request(&request)
        .await?;
    let count = donors.len();

    Ok(Json(MatchDonorsResponse {
        request_id: request.id,
        donors,
        count,
    }))
}
