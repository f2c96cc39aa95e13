use sqlx::PgConnection;

use crate::pkg::internal::adaptors::criteria::spec::CriterionEntry;
use crate::prelude::Result;

pub struct CriterionSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> CriterionSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        CriterionSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<CriterionEntry>> {
        let row = sqlx::query_as::<_, CriterionEntry>(
            "SELECT id, process_id, name, description, weight, display_order, created_at, updated_at
             FROM criteria WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_for_process(&mut self, process_id: i32) -> Result<Vec<CriterionEntry>> {
        let rows = sqlx::query_as::<_, CriterionEntry>(
            "SELECT id, process_id, name, description, weight, display_order, created_at, updated_at
             FROM criteria WHERE process_id = $1 ORDER BY display_order, name",
        )
        .bind(process_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
