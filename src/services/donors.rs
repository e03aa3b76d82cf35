//! Donor lifecycle and matching
//!
//! Owns the donor profile's availability state and time-based expiry, plus
//! the equality matching used to pair donors with blood requests.

use chrono::{DateTime, Duration, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{BloodGroup, BloodRequest, Donor, DonorQuery, RegisterDonorRequest};
use crate::services::auth::{parse_timestamp, parse_uuid};
use crate::utils::error::{AppError, AppResult};

const DONOR_COLUMNS: &str = "id, user_id, name, blood_group, phone, district, hospital, \
                             latitude, longitude, is_available, registered_at, auto_remove_date";

/// Donor profile service
pub struct DonorService {
    pool: DbPool,
    expiry_days: i64,
}

impl DonorService {
    pub fn new(pool: DbPool, expiry_days: i64) -> Self {
        Self { pool, expiry_days }
    }

    /// Register a donor profile, or renew it if one exists for the user
    ///
    /// Renewal is a full overwrite of every mutable field and always resets
    /// availability and the expiry window: `auto_remove_date` becomes
    /// `registered_at + expiry_days` exactly. Returns the profile and whether
    /// it was newly created.
    pub async fn register_or_renew(
        &self,
        user_id: Uuid,
        input: RegisterDonorRequest,
    ) -> AppResult<(Donor, bool)> {
        match self.get_by_user(&user_id).await? {
            Some(existing) => {
                let now = Utc::now();
                let auto_remove = now + Duration::days(self.expiry_days);

                sqlx::query(
                    "UPDATE donors SET name = ?, blood_group = ?, phone = ?, district = ?, \
                     hospital = ?, latitude = ?, longitude = ?, is_available = 1, \
                     registered_at = ?, auto_remove_date = ? WHERE id = ?",
                )
                .bind(&input.name)
                .bind(input.blood_group.as_str())
                .bind(&input.phone)
                .bind(&input.district)
                .bind(&input.hospital)
                .bind(input.latitude)
                .bind(input.longitude)
                .bind(now.to_rfc3339())
                .bind(auto_remove.to_rfc3339())
                .bind(existing.id.to_string())
                .execute(&self.pool)
                .await?;

                let donor = Donor {
                    name: input.name,
                    blood_group: input.blood_group,
                    phone: input.phone,
                    district: input.district,
                    hospital: input.hospital,
                    latitude: input.latitude,
                    longitude: input.longitude,
                    is_available: true,
                    registered_at: now,
                    auto_remove_date: auto_remove,
                    ..existing
                };
                Ok((donor, false))
            }
            None => {
                let donor = Donor::new(user_id, input, self.expiry_days);

                sqlx::query(
                    "INSERT INTO donors (id, user_id, name, blood_group, phone, district, \
                     hospital, latitude, longitude, is_available, registered_at, auto_remove_date) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
                )
                .bind(donor.id.to_string())
                .bind(donor.user_id.to_string())
                .bind(&donor.name)
                .bind(donor.blood_group.as_str())
                .bind(&donor.phone)
                .bind(&donor.district)
                .bind(&donor.hospital)
                .bind(donor.latitude)
                .bind(donor.longitude)
                .bind(donor.registered_at.to_rfc3339())
                .bind(donor.auto_remove_date.to_rfc3339())
                .execute(&self.pool)
                .await?;

                Ok((donor, true))
            }
        }
    }

    /// Mark the user's own profile unavailable
    pub async fn deactivate(&self, user_id: &Uuid) -> AppResult<Donor> {
        let donor = self
            .get_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Donor profile not found".to_string()))?;

        sqlx::query("UPDATE donors SET is_available = 0 WHERE id = ?")
            .bind(donor.id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(Donor {
            is_available: false,
            ..donor
        })
    }

    /// Flip every expired-but-still-available donor to unavailable
    ///
    /// Runs as a single UPDATE so each donor's flip is atomic with respect to
    /// concurrent reads. Idempotent: an immediate rerun affects 0 rows.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE donors SET is_available = 0 \
             WHERE auto_remove_date < ? AND is_available = 1",
        )
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Get a donor profile by its ID
    pub async fn get_by_id(&self, id: &Uuid) -> AppResult<Option<Donor>> {
        let row = sqlx::query(&format!("SELECT {} FROM donors WHERE id = ?", DONOR_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_donor(&r)).transpose()
    }

    /// Get the donor profile belonging to a user
    pub async fn get_by_user(&self, user_id: &Uuid) -> AppResult<Option<Donor>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM donors WHERE user_id = ?",
            DONOR_COLUMNS
        ))
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_donor(&r)).transpose()
    }

    /// List donor profiles with optional filters
    ///
    /// `available_only` defaults to true when unset.
    pub async fn list(&self, query: &DonorQuery) -> AppResult<Vec<Donor>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM donors WHERE 1 = 1", DONOR_COLUMNS));

        if query.available_only.unwrap_or(true) {
            builder.push(" AND is_available = 1");
        }
        if let Some(bg) = query.blood_group {
            builder.push(" AND blood_group = ");
            builder.push_bind(bg.as_str());
        }
        if let Some(ref district) = query.district {
            builder.push(" AND district = ");
            builder.push_bind(district.clone());
        }
        builder.push(" ORDER BY registered_at ASC, id ASC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_donor).collect()
    }

    /// Find donors eligible for a (blood group, district) pair
    ///
    /// Matching is exact equality on both fields, case-sensitive; no
    /// blood-type compatibility substitution is applied. Results are ordered
    /// by registration time ascending, then id.
    pub async fn find_matches(
        &self,
        blood_group: BloodGroup,
        district: &str,
        available_only: bool,
    ) -> AppResult<Vec<Donor>> {
        let sql = format!(
            "SELECT {} FROM donors WHERE blood_group = ? AND district = ?{} \
             ORDER BY registered_at ASC, id ASC",
            DONOR_COLUMNS,
            if available_only {
                " AND is_available = 1"
            } else {
                ""
            }
        );

        let rows = sqlx::query(&sql)
            .bind(blood_group.as_str())
            .bind(district)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_donor).collect()
    }

    /// Find available donors matching a blood request
    pub async fn find_matches_for_request(&self, request: &BloodRequest) -> AppResult<Vec<Donor>> {
        self.find_matches(request.blood_group, &request.district, true)
            .await
    }

    /// Map-oriented variant: available donors with known coordinates only
    pub async fn find_matches_with_location(
        &self,
        blood_group: Option<BloodGroup>,
        district: Option<&str>,
    ) -> AppResult<Vec<Donor>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM donors WHERE is_available = 1 \
             AND latitude IS NOT NULL AND longitude IS NOT NULL",
            DONOR_COLUMNS
        ));

        if let Some(bg) = blood_group {
            builder.push(" AND blood_group = ");
            builder.push_bind(bg.as_str());
        }
        if let Some(district) = district {
            builder.push(" AND district = ");
            builder.push_bind(district.to_string());
        }
        builder.push(" ORDER BY registered_at ASC, id ASC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_donor).collect()
    }

    /// Total number of donor profiles
    pub async fn count_total(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of currently available donors
    pub async fn count_available(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM donors WHERE is_available = 1")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

fn row_to_donor(row: &SqliteRow) -> AppResult<Donor> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let blood_group: String = row.get("blood_group");
    let registered_at: String = row.get("registered_at");
    let auto_remove_date: String = row.get("auto_remove_date");

    Ok(Donor {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        name: row.get("name"),
        blood_group: blood_group
            .parse::<BloodGroup>()
            .map_err(AppError::Database)?,
        phone: row.get("phone"),
        district: row.get("district"),
        hospital: row.get("hospital"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        is_available: row.get::<i64, _>("is_available") != 0,
        registered_at: parse_timestamp(&registered_at)?,
        auto_remove_date: parse_timestamp(&auto_remove_date)?,
    })
}
