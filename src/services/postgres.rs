use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::time::Duration;
use crate::models::{taxonomy_list, MatchEdge, MatchId, MatchStatus, Profile, ProfileDraft, ProfileId, TaxonomyOption};
use crate::services::store::{ProfileStore, RelationshipGraph, StoreError, TaxonomySource};

/// Match status as stored in the `match_status` enum column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
pub enum StatusColumn {
    Pending,
    Accepted,
    Rejected,
}

impl From<MatchStatus> for StatusColumn {
    fn from(value: MatchStatus) -> Self {
        match value {
            MatchStatus::Pending => StatusColumn::Pending,
            MatchStatus::Accepted => StatusColumn::Accepted,
            MatchStatus::Rejected => StatusColumn::Rejected,
        }
    }
}

impl From<StatusColumn> for MatchStatus {
    fn from(value: StatusColumn) -> Self {
        match value {
            StatusColumn::Pending => MatchStatus::Pending,
            StatusColumn::Accepted => MatchStatus::Accepted,
            StatusColumn::Rejected => MatchStatus::Rejected,
        }
    }
}

const PROFILE_COLUMNS: &str = "id, owner_id, alias, bio, age_range, contact_method, contact_value, \
     profession, goal, interests, hobbies, is_public, created_at, updated_at";

const MATCH_COLUMNS: &str = "id, initiator_id, receiver_id, status, created_at, responded_at";

/// PostgreSQL-backed profile store, relationship graph and taxonomy source
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
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
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    async fn edge_status(&self, id: MatchId) -> Result<Option<MatchStatus>, StoreError> {
        let row = sqlx::query("SELECT status FROM matches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get::<StatusColumn, _>("status").into()))
    }
}

/// Read a JSONB taxonomy column, accepting legacy scalar values
fn taxonomy_column(row: &PgRow, column: &str) -> Result<Vec<String>, StoreError> {
    let value: Option<serde_json::Value> = row.try_get(column)?;
    Ok(taxonomy_list(value.unwrap_or(serde_json::Value::Null))?)
}

fn profile_from_row(row: &PgRow) -> Result<Profile, StoreError> {
    Ok(Profile {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        alias: row.try_get("alias")?,
        bio: row.try_get("bio")?,
        age_range: row.try_get("age_range")?,
        contact_method: row.try_get("contact_method")?,
        contact_value: row.try_get("contact_value")?,
        profession: taxonomy_column(row, "profession")?,
        goal: taxonomy_column(row, "goal")?,
        interests: taxonomy_column(row, "interests")?,
        hobbies: taxonomy_column(row, "hobbies")?,
        is_public: row.try_get("is_public")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn edge_from_row(row: &PgRow) -> Result<MatchEdge, StoreError> {
    Ok(MatchEdge {
        id: row.try_get("id")?,
        initiator_id: row.try_get("initiator_id")?,
        receiver_id: row.try_get("receiver_id")?,
        status: row.try_get::<StatusColumn, _>("status")?.into(),
        created_at: row.try_get("created_at")?,
        responded_at: row.try_get("responded_at")?,
    })
}

fn option_from_row(row: &PgRow) -> Result<TaxonomyOption, StoreError> {
    Ok(TaxonomyOption {
        category: row.try_get("category")?,
        key: row.try_get("key")?,
        label: row.try_get("label")?,
        is_custom: row.try_get("is_custom")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl ProfileStore for PostgresClient {
    async fn get_by_id(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);

        sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(profile_from_row)
            .transpose()
    }

    async fn get_by_owner(&self, owner_id: &str) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {} FROM profiles WHERE owner_id = $1", PROFILE_COLUMNS);

        sqlx::query(&query)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(profile_from_row)
            .transpose()
    }

    async fn list_excluding(&self, ids: &HashSet<ProfileId>) -> Result<Vec<Profile>, StoreError> {
        let query = format!(
            "SELECT {} FROM profiles WHERE is_public AND NOT (id = ANY($1)) ORDER BY id",
            PROFILE_COLUMNS
        );
        let excluded: Vec<ProfileId> = ids.iter().copied().collect();

        let rows = sqlx::query(&query)
            .bind(&excluded)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Listed {} candidate profiles ({} excluded)", rows.len(), excluded.len());

        rows.iter().map(profile_from_row).collect()
    }

    /// Uses INSERT ... ON CONFLICT so the owner keeps a single profile row
    async fn upsert_for_owner(&self, owner_id: &str, draft: &ProfileDraft) -> Result<Profile, StoreError> {
        let query = format!(
            r#"
            INSERT INTO profiles (owner_id, alias, bio, age_range, contact_method, contact_value,
                                  profession, goal, interests, hobbies, is_public, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW())
            ON CONFLICT (owner_id)
            DO UPDATE SET
                alias = EXCLUDED.alias,
                bio = EXCLUDED.bio,
                age_range = EXCLUDED.age_range,
                contact_method = EXCLUDED.contact_method,
                contact_value = EXCLUDED.contact_value,
                profession = EXCLUDED.profession,
                goal = EXCLUDED.goal,
                interests = EXCLUDED.interests,
                hobbies = EXCLUDED.hobbies,
                is_public = EXCLUDED.is_public,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(owner_id)
            .bind(&draft.alias)
            .bind(&draft.bio)
            .bind(&draft.age_range)
            .bind(&draft.contact_method)
            .bind(&draft.contact_value)
            .bind(Json(&draft.profession))
            .bind(Json(&draft.goal))
            .bind(Json(&draft.interests))
            .bind(Json(&draft.hobbies))
            .bind(draft.is_public)
            .fetch_one(&self.pool)
            .await?;

        let profile = profile_from_row(&row)?;
        tracing::debug!("Saved profile {} for owner {}", profile.id, owner_id);
        Ok(profile)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl RelationshipGraph for PostgresClient {
    async fn edges_touching(&self, profile_id: ProfileId) -> Result<Vec<MatchEdge>, StoreError> {
        let query = format!(
            "SELECT {} FROM matches WHERE initiator_id = $1 OR receiver_id = $1 ORDER BY id",
            MATCH_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(edge_from_row).collect()
    }

    async fn get_edge(&self, id: MatchId) -> Result<Option<MatchEdge>, StoreError> {
        let query = format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS);

        sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(edge_from_row)
            .transpose()
    }

    /// The partial unique index on active pairs rejects duplicates, including
    /// simultaneous A->B and B->A requests.
    async fn create_edge(&self, initiator_id: ProfileId, receiver_id: ProfileId) -> Result<MatchEdge, StoreError> {
        let query = format!(
            r#"
            INSERT INTO matches (initiator_id, receiver_id, status, created_at)
            VALUES ($1, $2, 'pending', NOW())
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(initiator_id)
            .bind(receiver_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict(format!(
                        "Active match already exists between {} and {}",
                        initiator_id, receiver_id
                    ))
                } else {
                    StoreError::from(e)
                }
            })?;

        edge_from_row(&row)
    }

    async fn set_status(&self, id: MatchId, status: MatchStatus) -> Result<MatchEdge, StoreError> {
        let query = format!(
            r#"
            UPDATE matches
            SET status = $2, responded_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .bind(StatusColumn::from(status))
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => edge_from_row(&row),
            None => match self.edge_status(id).await? {
                Some(current) => Err(StoreError::Conflict(format!(
                    "Match {} is already {}",
                    id,
                    current.as_str()
                ))),
                None => Err(StoreError::NotFound(format!("Match {} not found", id))),
            },
        }
    }
}

#[async_trait]
impl TaxonomySource for PostgresClient {
    async fn list_options(&self) -> Result<Vec<TaxonomyOption>, StoreError> {
        let rows = sqlx::query(
            "SELECT category, key, label, is_custom FROM taxonomy_options ORDER BY category, label",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(option_from_row).collect()
    }

    async fn add_custom_option(&self, category: &str, key: &str, label: &str) -> Result<TaxonomyOption, StoreError> {
        let query = r#"
            INSERT INTO taxonomy_options (category, key, label, is_custom)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (category, key) DO UPDATE SET category = EXCLUDED.category
            RETURNING category, key, label, is_custom
        "#;

        let row = sqlx::query(query)
            .bind(category)
            .bind(key)
            .bind(label)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Recorded custom {} option: {}", category, key);

        option_from_row(&row)
    }
}
