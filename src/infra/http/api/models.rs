use serde::{Deserialize, Serialize};

use crate::domain::entities::CommentRecord;

// Request fields are optional so that missing values surface as the
// endpoint's own validation message rather than a deserialization failure.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SlugQuery {
    pub slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LikesQuery {
    pub slug: Option<String>,
    pub visitor_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatsQuery {
    pub slug: Option<String>,
    pub slugs: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LikeRequest {
    pub slug: Option<String>,
    pub visitor_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewRequest {
    pub slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentRequest {
    pub slug: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewsletterRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub slug: String,
    pub likes: u64,
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct CommentCreatedResponse {
    pub success: bool,
    pub comment: CommentRecord,
}

#[derive(Debug, Serialize)]
pub struct ViewRecordedResponse {
    pub success: bool,
    pub slug: String,
    pub views: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
