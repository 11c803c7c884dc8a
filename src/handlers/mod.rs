// handlers/mod.rs - two security tiers
//
// Public (no auth): /, /health, /login
// Protected (JWT auth): /api/*
pub mod protected;
pub mod public;
