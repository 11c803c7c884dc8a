pub mod access;
pub mod error;
pub mod model;
pub mod store;
pub mod validation;

pub use access::{is_admin, Access, ADMIN};
pub use error::{PostError, PostResult};
pub use model::{NewPost, Post, UpdatePost};
pub use store::PostStore;
pub use validation::{ValidationError, ValidationRules};
