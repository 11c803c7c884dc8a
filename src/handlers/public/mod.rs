pub mod login;
pub mod system;

// Re-export handler functions for use in routing
pub use login::login;
pub use system::health;
pub use system::root;
