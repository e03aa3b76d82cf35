//! Blood request model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::BloodGroup;
use crate::utils::validation::{validate_district, validate_name, validate_phone};

/// Urgency tier of a blood request
///
/// Unknown values deserialize to `Normal`: an out-of-range urgency only
/// affects message wording, never request acceptance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Critical,
    // serde requires the catch-all variant to be declared last
    #[default]
    #[serde(other)]
    Normal,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::Normal => write!(f, "normal"),
            Urgency::Urgent => write!(f, "urgent"),
            Urgency::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Urgency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "urgent" => Urgency::Urgent,
            "critical" => Urgency::Critical,
            _ => Urgency::Normal,
        })
    }
}

/// Lifecycle status of a blood request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Fulfilled,
    Cancelled,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Fulfilled => write!(f, "fulfilled"),
            RequestStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "fulfilled" => Ok(RequestStatus::Fulfilled),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

/// Blood request entity
///
/// `fulfilled_at` is set if and only if `status == Fulfilled`; the only
/// mutation is the one-way pending -> fulfilled transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub requester_name: String,
    pub blood_group: BloodGroup,
    pub district: String,
    pub hospital: String,
    pub phone: String,
    pub urgency: Urgency,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub fulfilled_at: Option<DateTime<Utc>>,
}

impl BloodRequest {
    pub fn new(user_id: Uuid, input: CreateRequestRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            requester_name: input.requester_name,
            blood_group: input.blood_group,
            district: input.district,
            hospital: input.hospital,
            phone: input.phone,
            urgency: input.urgency.unwrap_or_default(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            fulfilled_at: None,
        }
    }
}

/// Request body for creating a blood request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRequestRequest {
    #[validate(custom(function = validate_name))]
    pub requester_name: String,
    pub blood_group: BloodGroup,
    #[validate(custom(function = validate_district))]
    pub district: String,
    #[validate(custom(function = validate_name))]
    pub hospital: String,
    #[validate(custom(function = validate_phone))]
    pub phone: String,
    pub urgency: Option<Urgency>,
}

/// Query parameters for request listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RequestQuery {
    pub status: Option<RequestStatus>,
    pub district: Option<String>,
    pub blood_group: Option<BloodGroup>,
}
