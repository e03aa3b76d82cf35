//! Notification endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::middleware::AuthUser;
use crate::models::{ContactDonorRequest, DeliveryRecord, Donor, NotifyDonorsRequest};
use crate::services::{dispatch::dispatch_summary, DispatchService};
use crate::utils::error::AppResult;
use crate::AppState;

#[derive(Serialize)]
pub struct NotifyDonorsResponse {
    pub message: String,
    pub total_matched: usize,
    pub delivered: usize,
    pub notifications: Vec<DeliveryRecord>,
}

#[derive(Serialize)]
pub struct ContactDonorResponse {
    pub message: String,
    pub donor: Donor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_sent: Option<bool>,
}

fn dispatch_service(state: &AppState) -> DispatchService {
    DispatchService::new(
        state.db.clone(),
        state.config.donor.expiry_days,
        state.sms.clone(),
    )
}

/// POST /notify/request-donors
///
/// Fan an SMS alert out to every available donor matching the request. Zero
/// matches is a success; per-donor failures are reported in the records.
pub async fn request_donors(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Json(input): Json<NotifyDonorsRequest>,
) -> AppResult<Json<NotifyDonorsResponse>> {
    let result = dispatch_service(&state)
        .notify_for_request(&input.request_id)
        .await?;

    Ok(Json(NotifyDonorsResponse {
        message: dispatch_summary(&result),
        total_matched: result.total_matched,
        delivered: result.delivered,
        notifications: result.notifications,
    }))
}

/// POST /notify/contact-donor
///
/// With a message body this relays one SMS to the donor; without one it only
/// returns the donor's contact details.
pub async fn contact_donor(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ContactDonorRequest>,
) -> AppResult<Json<ContactDonorResponse>> {
    let result = dispatch_service(&state)
        .contact_donor(&auth_user, &input.donor_id, input.message)
        .await?;

    let message = match result.sms_sent {
        Some(true) => "Message sent to donor",
        Some(false) => "Message could not be delivered",
        None => "Donor contact details",
    };

    Ok(Json(ContactDonorResponse {
        message: message.to_string(),
        donor: result.donor,
        sms_sent: result.sms_sent,
    }))
}
