//! Core logic for the security-group janitor.
//!
//! This crate provides:
//! - Description codec: the `"<marker>-<epoch_seconds>"` tag convention that
//!   marks an ingress rule as managed by this tool
//! - Expiry policy: the pure decision of whether a tagged rule has outlived
//!   its configured TTL
//!
//! No I/O, no clock reads — callers inject `now` and wire the cloud side
//! through `janitor-ec2`.

pub mod expiry;
pub mod tag;

pub use expiry::ExpiryPolicy;
pub use tag::{DecodeError, DescriptionCodec, RuleTag, DEFAULT_MARKER};
