// handlers/mod.rs - 2-Tier Handler Architecture
//
// Public (no auth) → Protected (JWT auth)
pub mod public; // Tier 1: token acquisition (/login, /register)
pub mod protected; // Tier 2: everything else
