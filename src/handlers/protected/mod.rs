// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /api/*
// Middleware: JWT validation, which injects AuthAuthor into request extensions
pub mod posts;

// Re-export handler functions for use in routing
pub use posts::create as posts_create;
pub use posts::delete as posts_delete;
pub use posts::get as posts_get;
pub use posts::list as posts_list;
pub use posts::update as posts_update;
