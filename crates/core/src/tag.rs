//! Rule description codec.
//!
//! Managed rules carry their whole state in the rule description attached to
//! the CIDR entry: `"<marker>-<epoch_seconds>"`. The codec is the only gate
//! between arbitrary operator-written descriptions and the expiry logic, so
//! matching is strict: a description either conforms exactly (marker, one
//! dash, canonical ASCII digits) or it is not ours. No trimming, no case
//! folding, no leading zeros.

use chrono::{DateTime, Utc};

/// Default marker identifying rules created by this tool.
pub const DEFAULT_MARKER: &str = "auto-rule";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from decoding a rule description.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The description does not start with `"<marker>-"`.
    #[error("description {description:?} does not carry marker {marker:?}")]
    MissingMarker {
        marker: String,
        description: String,
    },

    /// The part after the marker is not a representable epoch-seconds value.
    #[error("invalid timestamp {value:?} in rule description")]
    BadTimestamp { value: String },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Decoded payload of a managed rule description.
///
/// Read-only: tags are written once by whatever creates the rule and are
/// never edited in place — expiry removes the whole rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTag {
    /// Marker the description carried (always the codec's configured marker).
    pub marker: String,
    /// When the rule was added, at second precision.
    pub created_at: DateTime<Utc>,
}

/// Bidirectional mapping between free-text rule descriptions and [`RuleTag`].
#[derive(Debug, Clone)]
pub struct DescriptionCodec {
    marker: String,
}

impl Default for DescriptionCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl DescriptionCodec {
    /// Create a codec expecting the given marker.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The marker this codec expects.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Returns `true` iff the description fully conforms to the tag format
    /// and carries the expected marker.
    ///
    /// Never fails on arbitrary text — empty strings, human-written
    /// descriptions, and tags from other tools all return `false`. This is
    /// the caller's gate before [`parse`](Self::parse).
    pub fn matches(&self, description: &str) -> bool {
        self.parse(description).is_ok()
    }

    /// Decode a conforming description into a [`RuleTag`].
    ///
    /// Performs full validation itself: called on non-conforming input it
    /// fails with [`DecodeError`] rather than returning garbage.
    pub fn parse(&self, description: &str) -> Result<RuleTag, DecodeError> {
        let rest = description
            .strip_prefix(self.marker.as_str())
            .and_then(|r| r.strip_prefix('-'))
            .ok_or_else(|| DecodeError::MissingMarker {
                marker: self.marker.clone(),
                description: description.to_string(),
            })?;

        // Digits only: rejects empty, signs, whitespace, and trailing junk
        // before any numeric parse happens.
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DecodeError::BadTimestamp {
                value: rest.to_string(),
            });
        }

        // Canonical digits only: encode never emits leading zeros, so a
        // description carrying them is a look-alike, not ours.
        if rest.len() > 1 && rest.starts_with('0') {
            return Err(DecodeError::BadTimestamp {
                value: rest.to_string(),
            });
        }

        let secs: i64 = rest.parse().map_err(|_| DecodeError::BadTimestamp {
            value: rest.to_string(),
        })?;

        let created_at =
            DateTime::from_timestamp(secs, 0).ok_or_else(|| DecodeError::BadTimestamp {
                value: rest.to_string(),
            })?;

        Ok(RuleTag {
            marker: self.marker.clone(),
            created_at,
        })
    }

    /// Produce the description string for a rule created at `created_at`.
    ///
    /// Inverse of [`parse`](Self::parse): `parse(&encode(t))` round-trips for
    /// every post-epoch `t` at second precision.
    pub fn encode(&self, created_at: DateTime<Utc>) -> String {
        format!("{}-{}", self.marker, created_at.timestamp())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
