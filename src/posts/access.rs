use super::error::{PostError, PostResult};

/// Reserved identity that bypasses per-author ownership checks
pub const ADMIN: &str = "admin";

/// How a permitted caller reached the target namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Admin,
    Owner,
}

pub fn is_admin(caller: &str) -> bool {
    caller == ADMIN
}

/// Permission for create, update and delete against `target`.
pub fn authorize_write(caller: &str, target: &str) -> PostResult<Access> {
    if is_admin(caller) {
        Ok(Access::Admin)
    } else if caller == target {
        Ok(Access::Owner)
    } else {
        Err(PostError::AuthorNotAllowed)
    }
}

/// Permission for reads against `target`. Non-owned namespaces look missing.
pub fn authorize_read(caller: &str, target: &str) -> PostResult<Access> {
    authorize_write(caller, target).map_err(|_| PostError::AuthorNotFound)
}
