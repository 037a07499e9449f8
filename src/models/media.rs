use serde::Serialize;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MediaRecord {
    pub id: i64,
    pub user_id: i64,
    /// Generated blob name; also the last segment of the public URL.
    pub filename: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    /// Name the client uploaded the file under.
    pub media_name: String,
}

/// Listing entry; deliberately leaves out the blob name and URL.
#[derive(Serialize, Debug, Clone)]
pub struct MediaSummary {
    pub id: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub media_name: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct MediaDetail {
    pub id: i64,
    pub filename: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub media_name: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct UploadedMedia {
    pub media_id: i64,
    pub filename: String,
    pub mime_type: String,
    pub url: String,
    pub media_name: String,
}

impl From<MediaRecord> for MediaSummary {
    fn from(m: MediaRecord) -> Self {
        Self { id: m.id, mime_type: m.mime_type, created_at: m.created_at, media_name: m.media_name }
    }
}

impl MediaRecord {
    pub fn into_detail(self, url: String) -> MediaDetail {
        MediaDetail {
            id: self.id,
            filename: self.filename,
            mime_type: self.mime_type,
            created_at: self.created_at,
            url,
            media_name: self.media_name,
        }
    }
}
