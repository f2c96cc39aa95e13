use sqlx::PgConnection;

use crate::pkg::internal::adaptors::processes::spec::ProcessEntry;
use crate::prelude::Result;

pub struct ProcessSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ProcessSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ProcessSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<ProcessEntry>> {
        let row = sqlx::query_as::<_, ProcessEntry>(
            "SELECT id, title, description, job_title, department, status, start_date, end_date, created_at, updated_at
             FROM selection_processes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_all(&mut self) -> Result<Vec<ProcessEntry>> {
        let rows = sqlx::query_as::<_, ProcessEntry>(
            "SELECT id, title, description, job_title, department, status, start_date, end_date, created_at, updated_at
             FROM selection_processes ORDER BY start_date DESC",
        )
        .fetch_all(&mut *self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_by_status(&mut self, status: &str) -> Result<Vec<ProcessEntry>> {
        let rows = sqlx::query_as::<_, ProcessEntry>(
            "SELECT id, title, description, job_title, department, status, start_date, end_date, created_at, updated_at
             FROM selection_processes WHERE status = $1 ORDER BY start_date DESC",
        )
        .bind(status)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn recent(&mut self, limit: i64) -> Result<Vec<ProcessEntry>> {
        let rows = sqlx::query_as::<_, ProcessEntry>(
            "SELECT id, title, description, job_title, department, status, start_date, end_date, created_at, updated_at
             FROM selection_processes ORDER BY start_date DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_active(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM selection_processes WHERE status IN ('open', 'in_progress')",
        )
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count)
    }
}
