//! autopub-core - release models, validation, and the Play publishing transaction.
//!
//! The entry point is [`publisher::PlayPublisher`], which drives the
//! open-edit / upload / track-update / commit sequence against a
//! [`remote::PublishService`] implementation.

pub mod credentials;
pub mod error;
pub mod http;
pub mod notes;
pub mod publisher;
pub mod remote;
pub mod types;
pub mod validate;

pub use error::{ConfigError, PublishError, RemoteError, Step, ValidationError};
pub use publisher::PlayPublisher;
pub use remote::PublishService;

/// User Agent string sent with every remote API request
pub const USER_AGENT: &str = concat!("autopub/", env!("CARGO_PKG_VERSION"));
