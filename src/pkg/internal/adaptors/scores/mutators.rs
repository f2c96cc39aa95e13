use sqlx::PgConnection;

use crate::pkg::internal::adaptors::scores::spec::ScoreEntry;
use crate::prelude::Result;

pub struct ScoreMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ScoreMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ScoreMutator { pool }
    }

    /// Records a score for a (ranking, criterion) pair, replacing any
    /// previous value. Last write wins.
    pub async fn upsert(
        &mut self,
        ranking_id: i32,
        criterion_id: i32,
        score: f64,
        note: Option<&str>,
    ) -> Result<ScoreEntry> {
        let row = sqlx::query_as::<_, ScoreEntry>(
            r#"
            INSERT INTO criterion_scores (ranking_id, criterion_id, score, note)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (ranking_id, criterion_id)
            DO UPDATE SET score = $3, note = $4, updated_at = CURRENT_TIMESTAMP
            RETURNING id, ranking_id, criterion_id, score, note, created_at, updated_at
            "#,
        )
        .bind(ranking_id)
        .bind(criterion_id)
        .bind(score)
        .bind(note)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
