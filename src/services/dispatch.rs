//! Notification dispatch
//!
//! Fans an alert out to every donor matched to a blood request, and handles
//! one-off requester-to-donor contact. A single failed delivery never aborts
//! the run, and a missing SMS configuration degrades to recording every
//! delivery as failed rather than erroring.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::middleware::AuthUser;
use crate::models::{BloodRequest, ContactResult, DeliveryRecord, DispatchResult, Urgency};
use crate::services::{DonorService, RequestService, SmsClient};
use crate::utils::error::{AppError, AppResult};

/// Notification dispatch service
pub struct DispatchService {
    donors: DonorService,
    requests: RequestService,
    sms: Option<Arc<SmsClient>>,
}

impl DispatchService {
    pub fn new(pool: DbPool, expiry_days: i64, sms: Option<Arc<SmsClient>>) -> Self {
        Self {
            donors: DonorService::new(pool.clone(), expiry_days),
            requests: RequestService::new(pool),
            sms,
        }
    }

    /// Notify every available donor matched to a request
    ///
    /// Zero matched donors is a success with an empty result. Individual
    /// delivery failures are recorded per donor and do not abort the run.
    pub async fn notify_for_request(&self, request_id: &Uuid) -> AppResult<DispatchResult> {
        let request = self.requests.get_required(request_id).await?;
        let matches = self.donors.find_matches_for_request(&request).await?;

        if matches.is_empty() {
            info!(request_id = %request_id, "No matching donors to notify");
            return Ok(DispatchResult::empty());
        }

        let body = alert_message(&request);
        let mut notifications = Vec::with_capacity(matches.len());
        let mut delivered = 0usize;

        for donor in &matches {
            let sent = self.deliver(&donor.phone, &body).await;
            if sent {
                delivered += 1;
            }
            notifications.push(DeliveryRecord {
                donor_id: donor.id,
                donor_name: donor.name.clone(),
                phone: donor.phone.clone(),
                delivered: sent,
            });
        }

        info!(
            request_id = %request_id,
            matched = matches.len(),
            delivered,
            "Dispatch run finished"
        );

        Ok(DispatchResult {
            total_matched: matches.len(),
            delivered,
            notifications,
        })
    }

    /// Contact a single donor on behalf of a requester
    ///
    /// With a message body this sends one SMS and reports the outcome in
    /// `sms_sent`; without one it is a pure contact-info read and no delivery
    /// is attempted. A whitespace-only message counts as absent.
    pub async fn contact_donor(
        &self,
        caller: &AuthUser,
        donor_id: &Uuid,
        message: Option<String>,
    ) -> AppResult<ContactResult> {
        let donor = self
            .donors
            .get_by_id(donor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Donor not found".to_string()))?;

        if !donor.is_available {
            return Err(AppError::Conflict(
                "Donor is not currently available".to_string(),
            ));
        }

        let message = message.filter(|m| !m.trim().is_empty());

        let sms_sent = match message {
            Some(text) => {
                let body = contact_message(&text, &caller.phone);
                Some(self.deliver(&donor.phone, &body).await)
            }
            None => None,
        };

        Ok(ContactResult { donor, sms_sent })
    }

    async fn deliver(&self, phone: &str, body: &str) -> bool {
        match &self.sms {
            Some(client) => match client.send(phone, body).await {
                Ok(_) => true,
                Err(e) => {
                    warn!(phone = %phone, error = %e, "SMS delivery failed");
                    false
                }
            },
            None => {
                warn!(phone = %phone, "SMS service not configured, skipping delivery");
                false
            }
        }
    }
}

/// Alert text sent to each matched donor
fn alert_message(request: &BloodRequest) -> String {
    let prefix = match request.urgency {
        Urgency::Normal => "Blood",
        Urgency::Urgent => "URGENT Blood",
        Urgency::Critical => "CRITICAL Blood",
    };

    format!(
        "{} needed: {} required at {}, {}. Contact: {} - {}. From BloodLink",
        prefix,
        request.blood_group,
        request.hospital,
        request.district,
        request.requester_name,
        request.phone
    )
}

fn contact_message(text: &str, requester_phone: &str) -> String {
    format!(
        "BloodLink: {} Requester contact: {}",
        text.trim(),
        requester_phone
    )
}

/// Human-readable summary for a finished dispatch run
pub fn dispatch_summary(result: &DispatchResult) -> String {
    format!(
        "Notifications sent to {} out of {} donors",
        result.delivered, result.total_matched
    )
}
