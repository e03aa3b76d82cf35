//! Donor profile model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_district, validate_name, validate_phone};

/// Number of days a donor profile stays available after (re-)registration
/// unless renewed. Configurable via the `donor` config section.
pub const DEFAULT_EXPIRY_DAYS: i64 = 14;

/// ABO/Rh blood group
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APos,
    #[serde(rename = "A-")]
    ANeg,
    #[serde(rename = "B+")]
    BPos,
    #[serde(rename = "B-")]
    BNeg,
    #[serde(rename = "AB+")]
    AbPos,
    #[serde(rename = "AB-")]
    AbNeg,
    #[serde(rename = "O+")]
    OPos,
    #[serde(rename = "O-")]
    ONeg,
}

impl BloodGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APos => "A+",
            BloodGroup::ANeg => "A-",
            BloodGroup::BPos => "B+",
            BloodGroup::BNeg => "B-",
            BloodGroup::AbPos => "AB+",
            BloodGroup::AbNeg => "AB-",
            BloodGroup::OPos => "O+",
            BloodGroup::ONeg => "O-",
        }
    }
}

impl std::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BloodGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A+" => Ok(BloodGroup::APos),
            "A-" => Ok(BloodGroup::ANeg),
            "B+" => Ok(BloodGroup::BPos),
            "B-" => Ok(BloodGroup::BNeg),
            "AB+" => Ok(BloodGroup::AbPos),
            "AB-" => Ok(BloodGroup::AbNeg),
            "O+" => Ok(BloodGroup::OPos),
            "O-" => Ok(BloodGroup::ONeg),
            _ => Err(format!("Invalid blood group: {}", s)),
        }
    }
}

/// Donor profile entity
///
/// Belongs to exactly one user. Never hard-deleted: expiry and deactivation
/// only flip `is_available`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub district: String,
    pub hospital: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_available: bool,
    pub registered_at: DateTime<Utc>,
    pub auto_remove_date: DateTime<Utc>,
}

impl Donor {
    /// Create a fresh profile for a user. `auto_remove_date` is always
    /// `registered_at + expiry_days` exactly.
    pub fn new(user_id: Uuid, input: RegisterDonorRequest, expiry_days: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: input.name,
            blood_group: input.blood_group,
            phone: input.phone,
            district: input.district,
            hospital: input.hospital,
            latitude: input.latitude,
            longitude: input.longitude,
            is_available: true,
            registered_at: now,
            auto_remove_date: now + Duration::days(expiry_days),
        }
    }

    /// Whether the profile has passed its expiry window at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.auto_remove_date < now
    }
}

/// Request body for donor registration or renewal
///
/// Every re-registration is a full overwrite; there is no partial update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterDonorRequest {
    #[validate(custom(function = validate_name))]
    pub name: String,
    pub blood_group: BloodGroup,
    #[validate(custom(function = validate_phone))]
    pub phone: String,
    #[validate(custom(function = validate_district))]
    pub district: String,
    #[validate(custom(function = validate_name))]
    pub hospital: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Query parameters for donor listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DonorQuery {
    /// Defaults to true: listings only show available donors unless asked
    pub available_only: Option<bool>,
    pub blood_group: Option<BloodGroup>,
    pub district: Option<String>,
}
