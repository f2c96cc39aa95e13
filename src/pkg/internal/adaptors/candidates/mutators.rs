use sqlx::PgConnection;

use crate::error::conflict_on_unique;
use crate::pkg::internal::adaptors::candidates::spec::CandidateEntry;
use crate::pkg::internal::documents::StoredDocument;
use crate::pkg::server::handlers::candidates::{CandidateFields, CandidatePatch};
use crate::prelude::Result;

pub struct CandidateMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> CandidateMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        CandidateMutator { pool }
    }

    pub async fn create(
        &mut self,
        fields: &CandidateFields,
        document: Option<&StoredDocument>,
    ) -> Result<CandidateEntry> {
        let row = sqlx::query_as::<_, CandidateEntry>(
            r#"
            INSERT INTO candidates (name, email, phone, profile_url, document_path, document_name, document_mime, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, email, phone, profile_url, document_path, document_name, document_mime, notes, created_at, updated_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.profile_url)
        .bind(document.map(|d| d.path.clone()))
        .bind(document.map(|d| d.original_name.clone()))
        .bind(document.map(|d| d.mime.clone()))
        .bind(&fields.notes)
        .fetch_one(&mut *self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "a candidate with this email already exists"))?;
        Ok(row)
    }

    pub async fn update(
        &mut self,
        id: i32,
        patch: CandidatePatch,
    ) -> Result<Option<CandidateEntry>> {
        let mut query = String::from("UPDATE candidates SET updated_at = CURRENT_TIMESTAMP");
        let mut param_count = 1;

        if patch.name.is_some() {
            param_count += 1;
            query.push_str(&format!(", name = ${}", param_count));
        }
        if patch.email.is_some() {
            param_count += 1;
            query.push_str(&format!(", email = ${}", param_count));
        }
        if patch.phone.is_some() {
            param_count += 1;
            query.push_str(&format!(", phone = ${}", param_count));
        }
        if patch.profile_url.is_some() {
            param_count += 1;
            query.push_str(&format!(", profile_url = ${}", param_count));
        }
        if patch.notes.is_some() {
            param_count += 1;
            query.push_str(&format!(", notes = ${}", param_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, email, phone, profile_url, document_path, document_name, document_mime, notes, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, CandidateEntry>(&query).bind(id);

        if let Some(name) = patch.name {
            q = q.bind(name);
        }
        if let Some(email) = patch.email {
            q = q.bind(email);
        }
        if let Some(phone) = patch.phone {
            q = q.bind(phone);
        }
        if let Some(profile_url) = patch.profile_url {
            q = q.bind(profile_url);
        }
        if let Some(notes) = patch.notes {
            q = q.bind(notes);
        }
        let row = q
            .fetch_optional(&mut *self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "a candidate with this email already exists"))?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
