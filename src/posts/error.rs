use thiserror::Error;

use super::validation::ValidationError;

/// Errors returned by the post store. Validation failures pass through unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("post not found")]
    PostNotFound,

    #[error("author not found")]
    AuthorNotFound,

    #[error("author not allowed to access this resource")]
    AuthorNotAllowed,

    #[error("title already exists")]
    UniqueTitle,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type PostResult<T> = Result<T, PostError>;
