use sqlx::PgConnection;

use crate::pkg::internal::adaptors::scores::spec::{ProcessScoreRow, ScoreEntry};
use crate::pkg::internal::scoring::ScoreWithWeight;
use crate::prelude::Result;

pub struct ScoreSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ScoreSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ScoreSelector { pool }
    }

    pub async fn list_for_ranking(&mut self, ranking_id: i32) -> Result<Vec<ScoreEntry>> {
        let rows = sqlx::query_as::<_, ScoreEntry>(
            r#"
            SELECT s.id, s.ranking_id, s.criterion_id, s.score, s.note, s.created_at, s.updated_at
            FROM criterion_scores s
            JOIN criteria c ON c.id = s.criterion_id
            WHERE s.ranking_id = $1
            ORDER BY c.display_order, c.name
            "#,
        )
        .bind(ranking_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn weighted_for_ranking(&mut self, ranking_id: i32) -> Result<Vec<ScoreWithWeight>> {
        let rows = sqlx::query_as::<_, ScoreWithWeight>(
            r#"
            SELECT s.criterion_id, s.score, c.weight
            FROM criterion_scores s
            JOIN criteria c ON c.id = s.criterion_id
            WHERE s.ranking_id = $1
            ORDER BY c.display_order, c.name
            "#,
        )
        .bind(ranking_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn weighted_for_process(&mut self, process_id: i32) -> Result<Vec<ProcessScoreRow>> {
        let rows = sqlx::query_as::<_, ProcessScoreRow>(
            r#"
            SELECT s.ranking_id, s.criterion_id, s.score, c.weight
            FROM criterion_scores s
            JOIN criteria c ON c.id = s.criterion_id
            JOIN rankings r ON r.id = s.ranking_id
            WHERE r.process_id = $1
            ORDER BY s.ranking_id, c.display_order, c.name
            "#,
        )
        .bind(process_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
