// Input records as emitted by the profile, post and comment scrapers.
//
// Every field is optional in the wild. A key that is missing or null
// deserializes to the field's default so the pipelines never see holes.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Treat an explicit `null` the same as a missing key.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A scraped account profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    #[serde(deserialize_with = "null_default")]
    pub username: String,
    #[serde(deserialize_with = "null_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_default")]
    pub biography: String,
    #[serde(deserialize_with = "null_default")]
    pub external_url: String,
    #[serde(deserialize_with = "null_default")]
    pub followers_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub follows_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub posts_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub has_profile_pic: bool,
    #[serde(deserialize_with = "null_default")]
    pub is_private: bool,
    pub profile_pic_url: Option<String>,
    #[serde(rename = "profilePicUrlHD")]
    pub profile_pic_url_hd: Option<String>,
}

impl Profile {
    /// The HD picture when available, otherwise the standard one.
    /// Empty strings count as unavailable.
    pub fn best_profile_pic_url(&self) -> Option<String> {
        self.profile_pic_url_hd
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.profile_pic_url.as_deref().filter(|u| !u.is_empty()))
            .map(str::to_string)
    }
}

/// A scraped post with its most recent comments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    /// Passed through untouched, whatever type the scraper used
    pub id: Option<Value>,
    pub short_code: Option<String>,
    pub url: Option<String>,
    pub display_url: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub alt: String,
    #[serde(deserialize_with = "null_default")]
    pub caption: String,
    #[serde(deserialize_with = "null_default")]
    pub hashtags: Vec<String>,
    /// Signed: scrapers report -1 when likes are hidden
    #[serde(deserialize_with = "null_default")]
    pub likes_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub comments_count: i64,
    pub timestamp: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub latest_comments: Vec<LatestComment>,
}

/// A comment embedded in a post record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LatestComment {
    #[serde(deserialize_with = "null_default")]
    pub text: String,
    pub owner_username: Option<String>,
    pub owner_profile_pic_url: Option<String>,
}

/// A comment from the standalone comment scraper.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScrapedComment {
    #[serde(deserialize_with = "null_default")]
    pub text: String,
    #[serde(deserialize_with = "null_default")]
    pub owner: CommentOwner,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentOwner {
    pub username: Option<String>,
    pub profile_pic_url: Option<String>,
}
