// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth, /health and /api/auth/*) → Protected (bearer token, /api/todos*)
pub mod protected;
pub mod public;
