use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, Query, State,
    },
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthAuthor};
use crate::posts::{NewPost, Post, UpdatePost};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AuthorQuery {
    /// Target author namespace. Defaults to the caller; admins may name anyone.
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author: Option<String>,
}

/// GET /api/posts - List posts visible to the caller
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthAuthor>,
    Query(query): Query<AuthorQuery>,
) -> ApiResult<Vec<Post>> {
    let posts = state.store.list(&caller.name, query.author.as_deref()).await?;
    tracing::debug!("'{}' listed {} posts", caller.name, posts.len());
    Ok(ApiResponse::success(posts))
}

/// POST /api/posts - Create a post
///
/// The target author comes from the body or the `author` query parameter and
/// defaults to the caller.
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthAuthor>,
    Query(query): Query<AuthorQuery>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<Post> {
    let Json(request) = payload?;
    let author = target_author(request.author, query.author)?.unwrap_or_else(|| caller.name.clone());

    let post = state
        .store
        .create(&caller.name, NewPost::new(request.title, request.content, author))
        .await?;
    Ok(ApiResponse::created(post))
}

/// GET /api/posts/:id - Fetch one post
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthAuthor>,
    path: Result<Path<u64>, PathRejection>,
    Query(query): Query<AuthorQuery>,
) -> ApiResult<Post> {
    let Path(id) = path?;
    let post = state.store.get(&caller.name, id, query.author.as_deref()).await?;
    Ok(ApiResponse::success(post))
}

/// PUT /api/posts/:id - Replace title and content of a post
///
/// The body id must match the path id. The target author comes from the body or
/// the `author` query parameter; both may be given only if they agree.
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthAuthor>,
    path: Result<Path<u64>, PathRejection>,
    Query(query): Query<AuthorQuery>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> ApiResult<Post> {
    let Path(id) = path?;
    let Json(request) = payload?;

    if request.id != id {
        return Err(ApiError::bad_request("mismatching ids in request and url"));
    }

    let author = target_author(request.author, query.author)?;

    let update = UpdatePost {
        title: request.title,
        content: request.content,
        author,
    };
    let post = state.store.update(&caller.name, id, update).await?;
    Ok(ApiResponse::accepted(post))
}

/// DELETE /api/posts/:id - Remove a post, returning it
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthAuthor>,
    path: Result<Path<u64>, PathRejection>,
    Query(query): Query<AuthorQuery>,
) -> ApiResult<Post> {
    let Path(id) = path?;
    let post = state.store.delete(&caller.name, id, query.author.as_deref()).await?;
    Ok(ApiResponse::accepted(post))
}

// Body and query may both name the author only if they agree
fn target_author(body: Option<String>, url: Option<String>) -> Result<Option<String>, ApiError> {
    match (body, url) {
        (Some(body), Some(url)) if body != url => {
            Err(ApiError::bad_request("mismatching authors in request and url"))
        }
        (body, url) => Ok(body.or(url)),
    }
}
