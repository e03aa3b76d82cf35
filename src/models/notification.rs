//! Notification dispatch models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Donor;

/// Per-donor delivery record produced by a dispatch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub donor_id: Uuid,
    pub donor_name: String,
    pub phone: String,
    pub delivered: bool,
}

/// Aggregate result of notifying all donors matched to a request
///
/// Zero matched donors is a success with `delivered == 0`, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResult {
    pub total_matched: usize,
    pub delivered: usize,
    pub notifications: Vec<DeliveryRecord>,
}

impl DispatchResult {
    pub fn empty() -> Self {
        Self {
            total_matched: 0,
            delivered: 0,
            notifications: Vec::new(),
        }
    }
}

/// Result of contacting a single donor
///
/// `sms_sent` is `None` when no message body was supplied and the call was a
/// pure contact-info read; the two branches are distinct behaviors.
#[derive(Debug, Clone, Serialize)]
pub struct ContactResult {
    pub donor: Donor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_sent: Option<bool>,
}

/// Body for POST /notify/request-donors
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyDonorsRequest {
    pub request_id: Uuid,
}

/// Body for POST /notify/contact-donor
#[derive(Debug, Clone, Deserialize)]
pub struct ContactDonorRequest {
    pub donor_id: Uuid,
    #[serde(default)]
    pub message: Option<String>,
}
