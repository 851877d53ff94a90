//! # claimsync-clients
//!
//! HTTP implementations of the claimsync collaborator traits:
//! - [`CustomerApiClient`]: organization number → institution lookup
//! - [`UserApiClient`]: user catalogue read/create/update, 409 → conflict
//! - [`HttpAttributeWriter`]: identity-provider admin attribute overwrite
//! - [`HttpUserCreatedNotifier`]: acknowledged new-user notification with
//!   bounded retry, and [`NoopNotifier`] when notification is disabled
//!
//! Every client owns a `reqwest::Client` built with an explicit per-request
//! timeout. Transport and status failures are mapped onto the per-collaborator
//! error enums from `claimsync-core`.

pub mod customer;
pub mod notifier;
pub mod provider;
pub mod users;

mod error;
mod http;

pub use customer::CustomerApiClient;
pub use error::ClientError;
pub use notifier::{HttpUserCreatedNotifier, NoopNotifier, RetryPolicy};
pub use provider::HttpAttributeWriter;
pub use users::UserApiClient;
