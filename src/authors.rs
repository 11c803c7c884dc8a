use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::posts::access::ADMIN;
use crate::posts::validation::{validate_author_name, ValidationError};

/// Known authors and the SHA-256 digest of their secret
#[derive(Debug, Default, Clone)]
pub struct AuthorDirectory {
    credentials: HashMap<String, [u8; 32]>,
}

impl AuthorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory for the given authors plus `admin`.
    ///
    /// Seeded authors get the derived credential from [`seed_password`].
    pub fn seeded<'a, I>(authors: I, admin_password: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut directory = Self::new();
        for author in authors {
            if let Err(e) = directory.register(author, &seed_password(author)) {
                tracing::warn!("Skipping seed author '{}': {}", author, e);
            }
        }
        if admin_password.is_empty() {
            tracing::warn!("Admin password not configured; admin login disabled");
        } else {
            directory.credentials.insert(ADMIN.to_string(), digest(admin_password));
        }
        directory
    }

    pub fn register(&mut self, name: &str, secret: &str) -> Result<(), ValidationError> {
        validate_author_name(name)?;
        self.credentials.insert(name.to_string(), digest(secret));
        Ok(())
    }

    /// True when `name` is known and `secret` matches
    pub fn valid_author(&self, name: &str, secret: &str) -> bool {
        self.credentials
            .get(name)
            .map_or(false, |stored| *stored == digest(secret))
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

/// Credential handed to authors created from seed data: the first
/// `"Author "` in the name becomes `"password"`, so `Author 1` logs in with `password1`.
pub fn seed_password(author: &str) -> String {
    author.replacen("Author ", "password", 1)
}

fn digest(secret: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(secret.as_bytes()));
    out
}
