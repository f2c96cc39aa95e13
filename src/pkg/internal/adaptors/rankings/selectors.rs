use sqlx::PgConnection;

use crate::pkg::internal::adaptors::rankings::spec::{RankingEntry, RankingWithCandidate};
use crate::prelude::Result;

pub struct RankingSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> RankingSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        RankingSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<RankingEntry>> {
        let row = sqlx::query_as::<_, RankingEntry>(
            "SELECT id, candidate_id, process_id, tier, tier_order, notes, evaluated_at, created_at, updated_at
             FROM rankings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;

        Ok(row)
    }

    /// Board rows for a process, sorted by tier, then manual order, then
    /// most recently evaluated. The tier partition preserves this order
    /// inside each bucket.
    pub async fn list_for_process(&mut self, process_id: i32) -> Result<Vec<RankingWithCandidate>> {
        let rows = sqlx::query_as::<_, RankingWithCandidate>(
            r#"
            SELECT r.id, r.candidate_id, r.process_id, r.tier, r.tier_order, r.notes, r.evaluated_at,
                   c.name AS candidate_name, c.email AS candidate_email,
                   (c.document_path IS NOT NULL) AS has_document
            FROM rankings r
            JOIN candidates c ON c.id = r.candidate_id
            WHERE r.process_id = $1
            ORDER BY r.tier ASC NULLS LAST, r.tier_order ASC, r.evaluated_at DESC NULLS LAST, r.id ASC
            "#,
        )
        .bind(process_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_pending(&mut self) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rankings WHERE tier IS NULL")
                .fetch_one(&mut *self.pool)
                .await?;
        Ok(count)
    }

    pub async fn count_evaluated(&mut self) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rankings WHERE tier IS NOT NULL")
                .fetch_one(&mut *self.pool)
                .await?;
        Ok(count)
    }
}
