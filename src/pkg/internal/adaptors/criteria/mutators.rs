use sqlx::PgConnection;

use crate::error::conflict_on_unique;
use crate::pkg::internal::adaptors::criteria::spec::CriterionEntry;
use crate::pkg::server::handlers::criteria::CriterionFields;
use crate::prelude::Result;

pub struct CriterionMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> CriterionMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        CriterionMutator { pool }
    }

    pub async fn create(
        &mut self,
        process_id: i32,
        fields: &CriterionFields,
    ) -> Result<CriterionEntry> {
        let row = sqlx::query_as::<_, CriterionEntry>(
            r#"
            INSERT INTO criteria (process_id, name, description, weight, display_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, process_id, name, description, weight, display_order, created_at, updated_at
            "#,
        )
        .bind(process_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.weight)
        .bind(fields.display_order)
        .fetch_one(&mut *self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "this process already has a criterion with that name"))?;
        Ok(row)
    }

    pub async fn update(
        &mut self,
        id: i32,
        fields: &CriterionFields,
    ) -> Result<Option<CriterionEntry>> {
        let row = sqlx::query_as::<_, CriterionEntry>(
            r#"
            UPDATE criteria
            SET name = $2, description = $3, weight = $4, display_order = $5, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING id, process_id, name, description, weight, display_order, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.weight)
        .bind(fields.display_order)
        .fetch_optional(&mut *self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "this process already has a criterion with that name"))?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM criteria WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
