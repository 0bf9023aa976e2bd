use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::ContentKind;

// The feed payload sends `null` for absent values as often as it omits them
mod null_as_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// Post identity as issued by the backend: numeric or string, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Numeric(id) => write!(f, "{}", id),
            PostId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        PostId::Numeric(id)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        PostId::Text(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Macro breakdown attached to a meal post, in grams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealMacros {
    pub name: String,
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub sets: u32,
    /// Free-form, e.g. "8-10" or "30s on / 30s off"
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub reps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub user: String,
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub when: String,
}

/// A feed post. Everything except the like fields is fixed once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author: Author,
    /// Display string; may be RFC3339 or already relative ("2h ago")
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub created_at: String,
    #[serde(rename = "type", default)]
    pub kind: ContentKind,
    /// Single media reference from before multi-image galleries existed
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub images: Vec<GalleryImage>,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub content: String,
    #[serde(default)]
    pub meal: Option<MealMacros>,
    #[serde(default)]
    pub workout: Option<WorkoutSummary>,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub liked: bool,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub favorited: bool,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub like_count: u32,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub comments: Vec<Comment>,
}

/// What the media panel of a card shows, resolved from the variant tag and
/// whichever media fields the payload carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaPanel<'a> {
    Video { url: Option<&'a str> },
    Gallery(&'a [GalleryImage]),
    /// A lone `mediaUrl`, shown as a one-element gallery
    LegacyImage(&'a str),
    Text(&'a str),
}

impl MediaPanel<'_> {
    /// Number of pages the gallery navigator should track.
    pub fn gallery_len(&self) -> usize {
        match self {
            MediaPanel::Gallery(images) => images.len(),
            MediaPanel::LegacyImage(_) => 1,
            MediaPanel::Video { .. } | MediaPanel::Text(_) => 0,
        }
    }

    /// Only galleries with something to page between get dots and scroll capture.
    pub fn is_pageable(&self) -> bool {
        self.gallery_len() > 1
    }
}

impl Post {
    pub fn like_state(&self) -> LikeState {
        LikeState {
            liked: self.liked,
            like_count: self.like_count,
        }
    }

    pub fn media(&self) -> MediaPanel<'_> {
        match self.kind {
            ContentKind::Video => MediaPanel::Video {
                url: self
                    .media_url
                    .as_deref()
                    .or_else(|| self.images.first().map(|img| img.url.as_str())),
            },
            ContentKind::Text => MediaPanel::Text(&self.content),
            ContentKind::Image => {
                if !self.images.is_empty() {
                    MediaPanel::Gallery(&self.images)
                } else if let Some(url) = self.media_url.as_deref() {
                    MediaPanel::LegacyImage(url)
                } else {
                    MediaPanel::Text(&self.content)
                }
            }
        }
    }

    /// Parsed creation time, when the payload carried an RFC3339 timestamp.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.parse::<DateTime<Utc>>().ok()
    }
}

/// Parse the serialized feed payload (a JSON array of posts).
pub fn parse_feed_payload(payload: &str) -> serde_json::Result<Vec<Post>> {
    serde_json::from_str(payload)
}

/// The like fields of a post, as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: u32,
}

impl LikeState {
    /// Optimistic guess for a toggle: count moves by one, never below zero.
    pub fn toggled_to(self, liked: bool) -> Self {
        let like_count = if liked {
            self.like_count.saturating_add(1)
        } else {
            self.like_count.saturating_sub(1)
        };
        Self { liked, like_count }
    }
}

/// Body returned by the like endpoint on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub count: u32,
}

impl From<LikeResponse> for LikeState {
    fn from(response: LikeResponse) -> Self {
        Self {
            liked: response.liked,
            like_count: response.count,
        }
    }
}
