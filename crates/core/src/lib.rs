//! `medstock-core` — shared building blocks for the document-store domain.
//!
//! This crate contains **pure** primitives (no IO): identifiers, references
//! between documents, and the domain error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod reference;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, MembershipId, TeamId, UserId};
pub use reference::Reference;
