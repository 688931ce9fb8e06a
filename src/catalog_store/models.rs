//! Catalog records and scan primitives.

use crate::error::StoreError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Track
// =============================================================================

/// Release year of a track.
///
/// Ingested data carries the year either as a number or as a string.
/// Storage keeps only the canonical text, so the variant is normalized on
/// read: text that is a plain integer (`"1999"`) comes back as
/// `Number(1999)`, anything else (`"0042"`, `"c. 1999"`) stays `Text`.
/// Comparisons go through [`TrackYear::as_text`] and are unaffected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackYear {
    Number(i64),
    Text(String),
}

impl TrackYear {
    /// Canonical textual form, used for storage and equality matching.
    pub fn as_text(&self) -> String {
        match self {
            TrackYear::Number(n) => n.to_string(),
            TrackYear::Text(s) => s.clone(),
        }
    }

    /// Rebuilds a year from its stored text. Text that round-trips through
    /// an integer is reported as a number.
    pub fn from_stored(text: String) -> Self {
        match text.parse::<i64>() {
            Ok(n) if n.to_string() == text => TrackYear::Number(n),
            _ => TrackYear::Text(text),
        }
    }
}

impl fmt::Display for TrackYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackYear::Number(n) => write!(f, "{}", n),
            TrackYear::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TrackYear {
    fn from(value: i64) -> Self {
        TrackYear::Number(value)
    }
}

impl From<&str> for TrackYear {
    fn from(value: &str) -> Self {
        TrackYear::Text(value.to_string())
    }
}

/// Immutable catalog record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(alias = "music_id")]
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Normalized on storage, see [`TrackYear`].
    pub year: TrackYear,
    #[serde(default, alias = "web_url")]
    pub media_url: String,
    #[serde(default, alias = "img_url")]
    pub image_url: String,
}

// =============================================================================
// Scanning
// =============================================================================

/// Opaque cursor returned by a bounded scan.
///
/// Holds the encoded key of the last record the scan evaluated; the next
/// scan resumes strictly after it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn after_key(key: &str) -> Self {
        ContinuationToken(URL_SAFE_NO_PAD.encode(key.as_bytes()))
    }

    /// Wraps a token received from a caller. It is only checked when used.
    pub fn from_encoded<S: Into<String>>(encoded: S) -> Self {
        ContinuationToken(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn last_key(&self) -> Result<String, StoreError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(self.0.as_bytes())
            .map_err(|_| StoreError::InvalidContinuationToken)?;
        String::from_utf8(bytes).map_err(|_| StoreError::InvalidContinuationToken)
    }
}

/// Outcome of one bounded scan.
#[derive(Debug, Default)]
pub struct ScanPage {
    /// Records of the scanned window accepted by the predicate.
    pub items: Vec<Track>,
    /// Raw records evaluated, matched or not.
    pub scanned_count: usize,
    /// `None` once the end of the collection has been reached.
    pub continuation: Option<ContinuationToken>,
}
