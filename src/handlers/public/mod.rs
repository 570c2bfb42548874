// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Paths listed in `security.public_paths` bypass the JWT gate. By default that is
// only the two token acquisition endpoints.

pub mod auth;

pub use auth::*;
