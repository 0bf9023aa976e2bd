use repdeck_types::{parse_feed_payload, Post};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::logging::targets;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read payload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Failed to fetch posts: {0}")]
    Api(#[from] ApiError),
}

/// Where the feed's posts come from at mount.
#[derive(Clone)]
pub enum InitialDataSource {
    /// A serialized payload handed over with the view
    Embedded(String),
    /// A payload file written alongside the client
    EmbeddedFile(PathBuf),
    /// One read-only fetch from the backend
    Remote(ApiClient),
}

impl InitialDataSource {
    pub fn describe(&self) -> String {
        match self {
            InitialDataSource::Embedded(_) => "embedded payload".to_string(),
            InitialDataSource::EmbeddedFile(path) => format!("payload file {}", path.display()),
            InitialDataSource::Remote(client) => client.base_url().to_string(),
        }
    }

    pub async fn try_load(&self) -> Result<Vec<Post>, LoadError> {
        let posts = match self {
            InitialDataSource::Embedded(payload) => parse_feed_payload(payload)?,
            InitialDataSource::EmbeddedFile(path) => {
                let payload = tokio::fs::read_to_string(path).await?;
                parse_feed_payload(&payload)?
            }
            InitialDataSource::Remote(client) => client.get_posts().await?,
        };
        Ok(dedup_by_id(posts))
    }

    /// Load the posts, degrading to an empty feed on any failure.
    pub async fn load(&self) -> Vec<Post> {
        match self.try_load().await {
            Ok(posts) => {
                log::info!("Loaded {} posts from {}", posts.len(), self.describe());
                posts
            }
            Err(e) => {
                log::error!("Failed to load initial posts from {}: {}", self.describe(), e);
                Vec::new()
            }
        }
    }
}

/// Keep the first occurrence of each post id.
fn dedup_by_id(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::new();
    let before = posts.len();
    let posts: Vec<Post> = posts.into_iter().filter(|post| seen.insert(post.id.clone())).collect();
    if posts.len() != before {
        log::warn!(target: targets::API_CALLS, "dropped {} duplicate posts", before - posts.len());
    }
    posts
}
