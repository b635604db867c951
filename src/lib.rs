//! tagbridge - Audio Tag Read/Write Bridge
//!
//! A bridge between a calling application and an audio file's embedded
//! metadata: reads the generic multi-valued property map, writes it back
//! under full-replacement merge semantics, and smuggles arbitrary binary
//! key/value blobs through ID3v2 GEOB frames via a delimited record codec.
//!
//! # Architecture
//!
//! - `store`: the in-memory property store and its merge policy
//! - `gateway`: the tag-metadata library boundary (open, extract, save)
//! - `geob`: the binary side channel and its record codec
//! - `executor`: background task execution with exactly-once delivery
//! - `bridge`: the operation surface, blocking and task-based
//! - `config`: CLI parsing and host-boundary payload validation
//!
//! # Example
//!
//! ```no_run
//! use tagbridge::{bridge, PropertyKey, PropertyStore};
//!
//! # fn main() -> tagbridge::Result<()> {
//! let mut incoming = PropertyStore::new();
//! incoming.set(PropertyKey::new("ARTIST")?, vec!["C".to_string()]);
//! bridge::write_tags("track.mp3", incoming)?;
//!
//! let tags = bridge::read_tags("track.mp3")?;
//! println!("{} properties", tags.len());
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod geob;
pub mod store;
pub mod types;

// Re-export key types at crate root
pub use error::{Result, TagbridgeError};
pub use executor::{TaskExecutor, TaskHandle, TaskOutcome};
pub use geob::GeobRecord;
pub use store::{merge, PropertyKey, PropertyStore};
pub use types::{AudioProperties, ChannelMap};
