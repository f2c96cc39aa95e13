use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateEntry {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_url: Option<String>,
    pub document_path: Option<String>,
    pub document_name: Option<String>,
    pub document_mime: Option<String>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
