// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route in this tier sits behind `jwt_auth_middleware`. Handlers that need the
// caller's identity take `Extension<AuthUser>`.
//
// Resource handlers are generic over `resource::Resource`; the per-entity modules only
// declare fields, messages and which repository to use.

pub mod category;
pub mod customers;
pub mod methods;
pub mod payments;
pub mod reference;
pub mod resource;
pub mod service;

pub use resource::{Activatable, Resource};
