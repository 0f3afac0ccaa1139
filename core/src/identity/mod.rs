//! Actor identity resolution

mod resolver;


pub use resolver::{ActorId, INVALID_IDENTITY, IdentityResolver, ResolvedTick};
