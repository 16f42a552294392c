// Tabular features for the bot classifier.
//
// The order and meaning of each column must match what the classifier was
// fitted on. Lengths are counted in characters, not bytes.

use serde::Serialize;

use crate::instagram::models::Profile;

/// Number of columns the classifier expects.
pub const FEATURE_COUNT: usize = 11;

/// Column names in model order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "profile_pic",
    "nums_length_username",
    "fullname_words",
    "nums_length_fullname",
    "name_length",
    "description_length",
    "external_url",
    "private",
    "posts",
    "followers",
    "follows",
];

/// The eleven profile features fed to the bot classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileFeatures {
    pub profile_pic: f64,
    pub nums_length_username: f64,
    pub fullname_words: f64,
    pub nums_length_fullname: f64,
    pub name_length: f64,
    pub description_length: f64,
    pub external_url: f64,
    pub private: f64,
    pub posts: f64,
    pub followers: f64,
    pub follows: f64,
}

impl ProfileFeatures {
    /// Derive the feature vector from a profile. Missing fields have
    /// already been defaulted by deserialization.
    pub fn from_profile(profile: &Profile) -> Self {
        let username_len = profile.username.chars().count() as f64;
        Self {
            profile_pic: flag(profile.has_profile_pic),
            nums_length_username: username_len,
            fullname_words: profile.full_name.split_whitespace().count() as f64,
            nums_length_fullname: profile.full_name.chars().count() as f64,
            name_length: username_len,
            description_length: profile.biography.chars().count() as f64,
            external_url: flag(!profile.external_url.is_empty()),
            private: flag(profile.is_private),
            posts: profile.posts_count as f64,
            followers: profile.followers_count as f64,
            follows: profile.follows_count as f64,
        }
    }

    /// Features as a row in `FEATURE_NAMES` order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.profile_pic,
            self.nums_length_username,
            self.fullname_words,
            self.nums_length_fullname,
            self.name_length,
            self.description_length,
            self.external_url,
            self.private,
            self.posts,
            self.followers,
            self.follows,
        ]
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
