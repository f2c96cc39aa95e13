use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::error::conflict_on_unique;
use crate::pkg::internal::adaptors::rankings::spec::RankingEntry;
use crate::prelude::Result;

pub struct RankingMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> RankingMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        RankingMutator { pool }
    }

    /// Adds a candidate to a process. New rankings always start unranked.
    pub async fn create(&mut self, candidate_id: i32, process_id: i32) -> Result<RankingEntry> {
        let row = sqlx::query_as::<_, RankingEntry>(
            r#"
            INSERT INTO rankings (candidate_id, process_id)
            VALUES ($1, $2)
            RETURNING id, candidate_id, process_id, tier, tier_order, notes, evaluated_at, created_at, updated_at
            "#,
        )
        .bind(candidate_id)
        .bind(process_id)
        .fetch_one(&mut *self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "this candidate is already part of the process"))?;
        Ok(row)
    }

    pub async fn set_tier(
        &mut self,
        id: i32,
        tier: Option<&str>,
        tier_order: i32,
        evaluated_at: Option<DateTime<Utc>>,
    ) -> Result<Option<RankingEntry>> {
        let row = sqlx::query_as::<_, RankingEntry>(
            r#"
            UPDATE rankings
            SET tier = $2, tier_order = $3, evaluated_at = $4, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING id, candidate_id, process_id, tier, tier_order, notes, evaluated_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(tier)
        .bind(tier_order)
        .bind(evaluated_at)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn set_notes(&mut self, id: i32, notes: Option<&str>) -> Result<Option<RankingEntry>> {
        let row = sqlx::query_as::<_, RankingEntry>(
            r#"
            UPDATE rankings
            SET notes = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING id, candidate_id, process_id, tier, tier_order, notes, evaluated_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(notes)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rankings WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
