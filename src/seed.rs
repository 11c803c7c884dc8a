use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::posts::{NewPost, PostError, PostStore, ADMIN};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One post as it appears in the seed file. File ids are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPost {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    pub content: String,
    pub author: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub posts: Vec<SeedPost>,
}

impl SeedData {
    /// Distinct author names, sorted
    pub fn authors(&self) -> Vec<&str> {
        self.posts
            .iter()
            .map(|p| p.author.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub created: usize,
    pub rejected: Vec<(String, PostError)>,
}

pub fn load_seed_file(path: impl AsRef<Path>) -> Result<SeedData, SeedError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_seed(&raw).map_err(|source| SeedError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn parse_seed(raw: &str) -> Result<SeedData, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Feed seed posts through the ordinary admin create path, in file order.
pub async fn seed_store(store: &PostStore, data: &SeedData) -> SeedReport {
    let mut report = SeedReport::default();

    for post in &data.posts {
        let new_post = NewPost::new(post.title.clone(), post.content.clone(), post.author.clone());
        match store.create(ADMIN, new_post).await {
            Ok(_) => report.created += 1,
            Err(e) => {
                warn!("Rejected seed post '{}' by '{}': {}", post.title, post.author, e);
                report.rejected.push((post.title.clone(), e));
            }
        }
    }

    info!("Seeded {} posts ({} rejected)", report.created, report.rejected.len());
    report
}
