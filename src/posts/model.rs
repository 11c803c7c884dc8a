use serde::Serialize;

/// A blog entry. `id` is only unique within the author's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author: String,
}

/// Input for creating a post; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: author.into(),
        }
    }
}

/// Replacement title and content for an existing post.
///
/// `author` names the target namespace. Owners may omit it; an admin that omits it
/// updates the first post with the id in any namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePost {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
}

impl UpdatePost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: None,
        }
    }

    pub fn for_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}
