pub mod auth;
pub mod authors;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod posts;
pub mod router;
pub mod seed;
pub mod state;
