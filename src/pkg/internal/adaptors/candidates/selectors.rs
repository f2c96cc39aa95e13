use sqlx::PgConnection;

use crate::pkg::internal::adaptors::candidates::spec::CandidateEntry;
use crate::prelude::Result;

pub struct CandidateSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        CandidateSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<CandidateEntry>> {
        let row = sqlx::query_as::<_, CandidateEntry>(
            "SELECT id, name, email, phone, profile_url, document_path, document_name, document_mime, notes, created_at, updated_at
             FROM candidates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_all(&mut self) -> Result<Vec<CandidateEntry>> {
        let rows = sqlx::query_as::<_, CandidateEntry>(
            "SELECT id, name, email, phone, profile_url, document_path, document_name, document_mime, notes, created_at, updated_at
             FROM candidates ORDER BY name",
        )
        .fetch_all(&mut *self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM candidates")
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(count)
    }
}
