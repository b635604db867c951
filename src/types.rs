//! Shared domain types
//!
//! The multi-valued property map lives in [`crate::store`]; the GEOB record
//! and its codec live in [`crate::geob`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Binary-channel surface: GEOB frame description mapped to the
/// base64-encoded transport form of the frame's serialized record.
pub type ChannelMap = BTreeMap<String, String>;

/// Technical stream properties reported by the tag library
///
/// Fields mirror the host-facing JSON shape (`sampleRate` etc.); missing
/// information is reported as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioProperties {
    /// Audio bitrate in kb/s
    pub bitrate: u32,
    /// Channel count
    pub channels: u8,
    /// Stream length in whole seconds
    pub length: u64,
    /// Sample rate in Hz
    pub sample_rate: u32,
}
