use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::access::{self, Access};
use super::error::{PostError, PostResult};
use super::model::{NewPost, Post, UpdatePost};
use super::validation::ValidationRules;

/// Which namespaces a by-id lookup may search
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    /// Every namespace in ascending author order, first match wins (admin only)
    Any,
    Author(&'a str),
}

impl<'a> Scope<'a> {
    fn new(caller: &'a str, author: Option<&'a str>) -> Self {
        match author {
            None if access::is_admin(caller) => Scope::Any,
            Some(author) => Scope::Author(author),
            None => Scope::Author(caller),
        }
    }
}

/// author -> (id -> post), plus the last id handed out per author
#[derive(Debug, Default)]
struct Namespaces {
    posts: BTreeMap<String, BTreeMap<u64, Post>>,
    last_id: HashMap<String, u64>,
}

impl Namespaces {
    fn next_id(&mut self, author: &str) -> u64 {
        let last = self.last_id.entry(author.to_string()).or_insert(0);
        *last += 1;
        *last
    }

    fn has_title(&self, author: &str, title: &str) -> bool {
        self.posts
            .get(author)
            .map_or(false, |ns| ns.values().any(|p| p.title == title))
    }

    fn find(&self, id: u64, scope: Scope<'_>) -> Option<&Post> {
        match scope {
            Scope::Any => self.posts.values().find_map(|ns| ns.get(&id)),
            Scope::Author(author) => self.posts.get(author)?.get(&id),
        }
    }

    fn find_mut(&mut self, id: u64, scope: Scope<'_>) -> Option<&mut Post> {
        match scope {
            Scope::Any => self.posts.values_mut().find_map(|ns| ns.get_mut(&id)),
            Scope::Author(author) => self.posts.get_mut(author)?.get_mut(&id),
        }
    }
}

/// In-memory, author-scoped post store.
///
/// Every mutation holds the write guard from the uniqueness check through the
/// insert, so concurrent creates can neither race on the id counter nor both
/// claim the same title. Reads copy their result out under the read guard.
#[derive(Debug, Default)]
pub struct PostStore {
    state: RwLock<Namespaces>,
    rules: ValidationRules,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: ValidationRules) -> Self {
        Self {
            state: RwLock::new(Namespaces::default()),
            rules,
        }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Create a post under `post.author`. Owners may bootstrap their own namespace.
    pub async fn create(&self, caller: &str, post: NewPost) -> PostResult<Post> {
        access::authorize_write(caller, &post.author)?;

        let mut state = self.state.write().await;
        if state.has_title(&post.author, &post.title) {
            return Err(PostError::UniqueTitle);
        }
        self.rules.validate_post(&post.title, &post.content, &post.author)?;

        let id = state.next_id(&post.author);
        let created = Post {
            id,
            title: post.title,
            content: post.content,
            author: post.author,
        };
        state
            .posts
            .entry(created.author.clone())
            .or_default()
            .insert(id, created.clone());

        info!("Post {} created for '{}' by '{}'", id, created.author, caller);
        Ok(created)
    }

    /// All posts visible to the caller.
    ///
    /// An admin without `author` gets every post ordered by id, then author name.
    /// Otherwise one namespace ordered by id; a missing or empty namespace is
    /// `AuthorNotFound`.
    pub async fn list(&self, caller: &str, author: Option<&str>) -> PostResult<Vec<Post>> {
        let state = self.state.read().await;

        if author.is_none() && access::is_admin(caller) {
            let mut all: Vec<Post> = state
                .posts
                .values()
                .flat_map(|ns| ns.values().cloned())
                .collect();
            all.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.author.cmp(&b.author)));
            debug!("Listed {} posts across all authors", all.len());
            return Ok(all);
        }

        let target = author.unwrap_or(caller);
        access::authorize_read(caller, target)?;

        match state.posts.get(target) {
            Some(ns) if !ns.is_empty() => Ok(ns.values().cloned().collect()),
            _ => Err(PostError::AuthorNotFound),
        }
    }

    /// Fetch one post. An admin without `author` gets the first match by id in
    /// ascending author order.
    pub async fn get(&self, caller: &str, id: u64, author: Option<&str>) -> PostResult<Post> {
        access::authorize_read(caller, author.unwrap_or(caller))?;

        let state = self.state.read().await;
        state
            .find(id, Scope::new(caller, author))
            .cloned()
            .ok_or(PostError::PostNotFound)
    }

    /// Replace title and content of an existing post, keeping id and author.
    ///
    /// Titles are not re-checked for uniqueness here.
    pub async fn update(&self, caller: &str, id: u64, update: UpdatePost) -> PostResult<Post> {
        let target = update.author.as_deref().unwrap_or(caller);
        let access = access::authorize_write(caller, target)?;
        let scope = Scope::new(caller, update.author.as_deref());

        let mut state = self.state.write().await;
        if access == Access::Owner && !state.posts.contains_key(target) {
            return Err(PostError::AuthorNotFound);
        }
        // An admin without an author is validated against the owner of the matched post
        let owner = match scope {
            Scope::Author(author) => Some(author.to_string()),
            Scope::Any => state.find(id, scope).map(|p| p.author.clone()),
        };
        match owner.as_deref() {
            Some(owner) => self.rules.validate_post(&update.title, &update.content, owner)?,
            None => {
                self.rules.validate_title(&update.title)?;
                self.rules.validate_content(&update.content)?;
            }
        }

        let post = state.find_mut(id, scope).ok_or(PostError::PostNotFound)?;
        if access == Access::Owner && post.author != caller {
            return Err(PostError::AuthorNotAllowed);
        }
        post.title = update.title;
        post.content = update.content;

        info!("Post {} of '{}' updated by '{}'", id, post.author, caller);
        Ok(post.clone())
    }

    /// Remove a post. Ids are never handed out again.
    pub async fn delete(&self, caller: &str, id: u64, author: Option<&str>) -> PostResult<Post> {
        access::authorize_write(caller, author.unwrap_or(caller))?;

        let mut state = self.state.write().await;
        let owner = state
            .find(id, Scope::new(caller, author))
            .map(|p| p.author.clone())
            .ok_or(PostError::PostNotFound)?;
        let removed = state
            .posts
            .get_mut(&owner)
            .and_then(|ns| ns.remove(&id))
            .ok_or(PostError::PostNotFound)?;

        info!("Post {} of '{}' deleted by '{}'", id, owner, caller);
        Ok(removed)
    }

    /// Total number of posts across all authors
    pub async fn count(&self) -> usize {
        let state = self.state.read().await;
        state.posts.values().map(BTreeMap::len).sum()
    }
}
