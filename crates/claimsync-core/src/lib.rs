//! # claimsync-core
//!
//! Core types, collaborator traits, and error types for claimsync.
//!
//! This crate provides the foundational types shared across all claimsync crates:
//! - Identity claims asserted by the federation for one authentication event
//! - Organization matches, role sets, and user catalogue records
//! - The attribute delta written back to the identity provider
//! - Async traits for the external collaborators (organization directory,
//!   user catalogue, provider attribute writer, new-user notifier)
//! - Cross-cutting and collaborator error types

pub mod attributes;
pub mod claims;
pub mod errors;
pub mod organization;
pub mod roles;
pub mod traits;
pub mod user;

pub use attributes::{Attribute, AttributeDelta};
pub use claims::IdentityClaims;
pub use errors::{CatalogueError, CoreError, DirectoryError, NotifyError, ProviderError};
pub use organization::OrganizationMatch;
pub use roles::{Role, RoleSet};
pub use traits::{AttributeWriter, CustomerDirectory, UserCatalogue, UserCreatedNotifier};
pub use user::{UserCreatedNotice, UserRecord};
