use serde::{Deserialize, Serialize};

/// Server-assigned article identifier; the sole handshake between the page shell and the client.
pub type ArticleId = i64;

/// A user shown in the likes summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

/// Read-mostly projection of a feed article.
///
/// `/api/feed` may omit the interaction fields; they default to an
/// article nobody has touched yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub liked_by_users: Vec<UserRef>,
    #[serde(default)]
    pub user_has_liked: bool,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub happiness_average: u8,
    #[serde(default)]
    pub happiness_count: u32,
    #[serde(default)]
    pub user_happiness_rating: Option<u8>,
}

impl Article {
    /// The description, if present and non-blank.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// The publication date line, if present; the server sends `""` for unknown dates.
    pub fn published_at(&self) -> Option<&str> {
        self.published_at.as_deref().filter(|d| !d.is_empty())
    }

    /// The image URL, if present and non-empty.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Authoritative like state returned by the like endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LikeSummary {
    pub like_count: u32,
    #[serde(default)]
    pub liked_by_users: Vec<UserRef>,
    #[serde(default)]
    pub user_has_liked: Option<bool>,
}

/// Authoritative happiness state returned by the happiness endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HappinessSummary {
    pub happiness_average: u8,
    pub happiness_count: u32,
    #[serde(default)]
    pub user_happiness_rating: Option<u8>,
}
