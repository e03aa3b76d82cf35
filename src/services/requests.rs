//! Blood request lifecycle
//!
//! Creation and the one-way pending -> fulfilled transition.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{
    BloodGroup, BloodRequest, CreateRequestRequest, RequestQuery, RequestStatus, Urgency,
};
use crate::services::auth::{parse_timestamp, parse_uuid};
use crate::utils::error::{AppError, AppResult};

const REQUEST_COLUMNS: &str = "id, user_id, requester_name, blood_group, district, hospital, \
                               phone, urgency, status, created_at, fulfilled_at";

/// Blood request service
pub struct RequestService {
    pool: DbPool,
}

impl RequestService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record a new blood request
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateRequestRequest,
    ) -> AppResult<BloodRequest> {
        let request = BloodRequest::new(user_id, input);

        sqlx::query(
            "INSERT INTO requests (id, user_id, requester_name, blood_group, district, \
             hospital, phone, urgency, status, created_at, fulfilled_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)",
        )
        .bind(request.id.to_string())
        .bind(request.user_id.to_string())
        .bind(&request.requester_name)
        .bind(request.blood_group.as_str())
        .bind(&request.district)
        .bind(&request.hospital)
        .bind(&request.phone)
        .bind(request.urgency.to_string())
        .bind(request.status.to_string())
        .bind(request.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(request)
    }

    /// Get a request by ID
    pub async fn get(&self, id: &Uuid) -> AppResult<Option<BloodRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM requests WHERE id = ?",
            REQUEST_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_request(&r)).transpose()
    }

    /// Get a request by ID, failing with NotFound when absent
    pub async fn get_required(&self, id: &Uuid) -> AppResult<BloodRequest> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blood request not found".to_string()))
    }

    /// List requests with optional filters, newest first
    pub async fn list(&self, query: &RequestQuery) -> AppResult<Vec<BloodRequest>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM requests WHERE 1 = 1", REQUEST_COLUMNS));

        if let Some(status) = query.status {
            builder.push(" AND status = ");
            builder.push_bind(status.to_string());
        }
        if let Some(bg) = query.blood_group {
            builder.push(" AND blood_group = ");
            builder.push_bind(bg.as_str());
        }
        if let Some(ref district) = query.district {
            builder.push(" AND district = ");
            builder.push_bind(district.clone());
        }
        builder.push(" ORDER BY created_at DESC, id ASC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_request).collect()
    }

    /// List the requests created by a user, newest first
    pub async fn list_for_user(&self, user_id: &Uuid) -> AppResult<Vec<BloodRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM requests WHERE user_id = ? ORDER BY created_at DESC, id ASC",
            REQUEST_COLUMNS
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_request).collect()
    }

    /// Mark a pending request fulfilled
    ///
    /// The status guard in the UPDATE makes the transition one-way: a second
    /// fulfill attempt matches no rows and reports Conflict, leaving
    /// `fulfilled_at` at its original value.
    pub async fn fulfill(&self, id: &Uuid) -> AppResult<BloodRequest> {
        let existing = self.get_required(id).await?;

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE requests SET status = 'fulfilled', fulfilled_at = ? \
             WHERE id = ? AND status = 'pending'",
        )
        .bind(now.to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "Request is already {}",
                existing.status
            )));
        }

        Ok(BloodRequest {
            status: RequestStatus::Fulfilled,
            fulfilled_at: Some(now),
            ..existing
        })
    }

    /// Total number of requests
    pub async fn count_total(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requests")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of fulfilled requests
    pub async fn count_fulfilled(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM requests WHERE status = 'fulfilled'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Number of pending requests
    ///
    /// Counted by status rather than derived from the other counters, so
    /// cancelled requests are never reported as pending.
    pub async fn count_pending(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM requests WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

fn row_to_request(row: &SqliteRow) -> AppResult<BloodRequest> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let blood_group: String = row.get("blood_group");
    let urgency: String = row.get("urgency");
    let status: String = row.get("status");
    let created_at: String = row.get("created_at");
    let fulfilled_at: Option<String> = row.get("fulfilled_at");

    Ok(BloodRequest {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        requester_name: row.get("requester_name"),
        blood_group: blood_group
            .parse::<BloodGroup>()
            .map_err(AppError::Database)?,
        district: row.get("district"),
        hospital: row.get("hospital"),
        phone: row.get("phone"),
        urgency: urgency.parse::<Urgency>().unwrap_or_default(),
        status: status.parse::<RequestStatus>().map_err(AppError::Database)?,
        created_at: parse_timestamp(&created_at)?,
        fulfilled_at: fulfilled_at.as_deref().map(parse_timestamp).transpose()?,
    })
}
