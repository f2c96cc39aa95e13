use sqlx::PgConnection;

use crate::pkg::internal::adaptors::processes::spec::ProcessEntry;
use crate::pkg::server::handlers::processes::{NewProcess, ProcessPatch};
use crate::prelude::Result;

pub struct ProcessMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ProcessMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ProcessMutator { pool }
    }

    pub async fn create(&mut self, process: &NewProcess) -> Result<ProcessEntry> {
        let row = sqlx::query_as::<_, ProcessEntry>(
            r#"
            INSERT INTO selection_processes (title, description, job_title, department, status, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, job_title, department, status, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(&process.title)
        .bind(&process.description)
        .bind(&process.job_title)
        .bind(&process.department)
        .bind(process.status.as_str())
        .bind(process.start_date)
        .bind(process.end_date)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: i32, patch: ProcessPatch) -> Result<Option<ProcessEntry>> {
        let mut query =
            String::from("UPDATE selection_processes SET updated_at = CURRENT_TIMESTAMP");
        let mut param_count = 1;

        if patch.title.is_some() {
            param_count += 1;
            query.push_str(&format!(", title = ${}", param_count));
        }
        if patch.description.is_some() {
            param_count += 1;
            query.push_str(&format!(", description = ${}", param_count));
        }
        if patch.job_title.is_some() {
            param_count += 1;
            query.push_str(&format!(", job_title = ${}", param_count));
        }
        if patch.department.is_some() {
            param_count += 1;
            query.push_str(&format!(", department = ${}", param_count));
        }
        if patch.status.is_some() {
            param_count += 1;
            query.push_str(&format!(", status = ${}", param_count));
        }
        if patch.start_date.is_some() {
            param_count += 1;
            query.push_str(&format!(", start_date = ${}", param_count));
        }
        if patch.end_date.is_some() {
            param_count += 1;
            query.push_str(&format!(", end_date = ${}", param_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, job_title, department, status, start_date, end_date, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, ProcessEntry>(&query).bind(id);

        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(description) = patch.description {
            q = q.bind(description);
        }
        if let Some(job_title) = patch.job_title {
            q = q.bind(job_title);
        }
        if let Some(department) = patch.department {
            q = q.bind(department);
        }
        if let Some(status) = patch.status {
            q = q.bind(status.as_str().to_string());
        }
        if let Some(start_date) = patch.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = patch.end_date {
            q = q.bind(end_date);
        }
        let row = q.fetch_optional(&mut *self.pool).await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM selection_processes WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
