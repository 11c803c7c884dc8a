use std::sync::Arc;

use crate::authors::AuthorDirectory;
use crate::posts::PostStore;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostStore>,
    pub authors: Arc<AuthorDirectory>,
}

impl AppState {
    pub fn new(store: PostStore, authors: AuthorDirectory) -> Self {
        Self {
            store: Arc::new(store),
            authors: Arc::new(authors),
        }
    }
}
