use crate::core::{sanitize_updates, ConstraintError, Schema};
use crate::models::{Client, FieldUpdates, Listing, PreferenceProfile, Vendor};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Client not found: {0}")]
    ClientNotFound(i64),

    #[error("Invalid preference value: {0}")]
    InvalidPreference(#[from] ConstraintError),

    #[error("Stored profile could not be decoded: {0}")]
    ProfileDecode(#[from] serde_json::Error),
}

/// PostgreSQL client for the marketplace tables.
///
/// Owns the preference-profile store (merge-upsert semantics), the candidate
/// pool query and the client/vendor lookups the result assembler needs.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL with URL: {}", url);

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Underlying connection pool, for ad-hoc queries in tooling and tests.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fetch a client's public profile.
    pub async fn get_client(&self, client_id: i64) -> Result<Option<Client>, PostgresError> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT client_id, username, email FROM clients WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Delete a client. The preference profile row cascades away with it.
    pub async fn delete_client(&self, client_id: i64) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM clients WHERE client_id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch a vendor's public profile.
    pub async fn get_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, PostgresError> {
        let vendor = sqlx::query_as::<_, Vendor>(
            "SELECT vendor_id, username, email FROM vendors WHERE vendor_id = $1",
        )
        .bind(vendor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vendor)
    }

    /// Batch vendor lookup for result assembly. Ids without a vendor row are
    /// simply absent from the map; the assembler drops their listings.
    pub async fn vendors_by_ids(
        &self,
        vendor_ids: &[i64],
    ) -> Result<HashMap<i64, Vendor>, PostgresError> {
        if vendor_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let vendors = sqlx::query_as::<_, Vendor>(
            "SELECT vendor_id, username, email FROM vendors WHERE vendor_id = ANY($1)",
        )
        .bind(vendor_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(vendors.into_iter().map(|v| (v.vendor_id, v)).collect())
    }

    /// The candidate pool: every listing still on the market. The status
    /// filter lives in SQL so sold and rented rows never leave the database.
    pub async fn available_listings(&self) -> Result<Vec<Listing>, PostgresError> {
        let listings = sqlx::query_as::<_, Listing>(
            "SELECT * FROM vendor_houses WHERE status = 'available' ORDER BY house_id",
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!("candidate pool holds {} available listings", listings.len());

        Ok(listings)
    }

    /// Delete a listing.
    pub async fn delete_listing(&self, house_id: i64) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM vendor_houses WHERE house_id = $1")
            .bind(house_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch a client's stored preference profile, if any.
    pub async fn get_preferences(
        &self,
        client_id: i64,
    ) -> Result<Option<PreferenceProfile>, PostgresError> {
        let row = sqlx::query("SELECT fields FROM client_preferences WHERE client_id = $1")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let fields: serde_json::Value = row.get("fields");
                Ok(Some(PreferenceProfile {
                    client_id,
                    fields: serde_json::from_value(fields)?,
                }))
            }
            None => Ok(None),
        }
    }

    /// Create or merge a client's preference profile.
    ///
    /// Updates are validated against the attribute schema first; a
    /// wrong-typed value is rejected before anything is written. The upsert
    /// is a single statement, so two requests racing on first submission
    /// cannot insert duplicate rows: the unique constraint on `client_id`
    /// routes the loser onto the merge path.
    ///
    /// Merge semantics: keys in the update overwrite stored keys, keys
    /// mapped to JSON null are removed (`jsonb_strip_nulls`), and everything
    /// else is left untouched.
    pub async fn upsert_preferences(
        &self,
        schema: &Schema,
        client_id: i64,
        updates: &FieldUpdates,
    ) -> Result<PreferenceProfile, PostgresError> {
        let accepted = sanitize_updates(schema, updates)?;
        let payload = serde_json::to_value(&accepted)?;

        let query = r#"
            INSERT INTO client_preferences (client_id, fields)
            VALUES ($1, jsonb_strip_nulls($2::jsonb))
            ON CONFLICT (client_id) DO UPDATE SET
                fields = jsonb_strip_nulls(client_preferences.fields || $2::jsonb),
                updated_at = NOW()
            RETURNING fields
        "#;

        let row = sqlx::query(query)
            .bind(client_id)
            .bind(&payload)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    PostgresError::ClientNotFound(client_id)
                } else {
                    PostgresError::SqlxError(e)
                }
            })?;

        let fields: serde_json::Value = row.get("fields");

        tracing::debug!("upserted preferences for client {}", client_id);

        Ok(PreferenceProfile {
            client_id,
            fields: serde_json::from_value(fields)?,
        })
    }

    /// Remove a client's preference profile. Returns whether a row existed.
    pub async fn delete_preferences(&self, client_id: i64) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM client_preferences WHERE client_id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23503"),
        _ => false,
    }
}
