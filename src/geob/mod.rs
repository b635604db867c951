//! GEOB binary channel
//!
//! Repurposes ID3v2 "general encapsulated object" frames to carry arbitrary
//! keyed blobs through a text-oriented tag container. The channel only exists
//! for the MPEG container family; on any other container a read resolves to
//! an empty map and a write is a logged no-op, never an error.
//!
//! Invariant maintained by the write path: at most one GEOB frame per
//! description exists in the file after a save.

pub mod codec;

pub use codec::GeobRecord;

use crate::error::{Result, TagbridgeError};
use crate::gateway;
use crate::types::ChannelMap;
use id3::frame::{Content, EncapsulatedObject, Frame};
use id3::{TagLike, Version};
use lofty::FileType;
use std::path::Path;
use tracing::{debug, warn};

/// Whether the container family exposes a named-binary-frame list
pub fn supports_binary_frames(file_type: FileType) -> bool {
    matches!(file_type, FileType::Mpeg)
}

/// Read every GEOB frame as `description -> transport-encoded record`
pub fn read_channel(path: &Path) -> Result<ChannelMap> {
    let file_type = gateway::file_type(path)?;
    if !supports_binary_frames(file_type) {
        debug!(
            "{:?} container has no binary frame list, returning empty channel for {}",
            file_type,
            path.display()
        );
        return Ok(ChannelMap::new());
    }

    let tag = read_id3(path)?;
    let mut channel = ChannelMap::new();

    for object in geob_objects(&tag) {
        let record = GeobRecord {
            mime_type: object.mime_type.clone(),
            file_name: object.filename.clone(),
            description: object.description.clone(),
            payload: object.data.clone(),
        };

        match codec::encode_record(&record) {
            Ok(bytes) => {
                channel.insert(object.description.clone(), codec::to_transport(&bytes));
            }
            Err(e) => {
                // A frame written by other tooling may carry text the
                // single-byte encoding cannot express; skip it rather than
                // failing the whole read.
                warn!(
                    "skipping unreadable GEOB frame '{}' in {}: {}",
                    object.description,
                    path.display(),
                    e
                );
            }
        }
    }

    Ok(channel)
}

/// Apply `description -> transport-encoded record` entries to the file.
///
/// For each entry any existing frame with a matching description is removed;
/// an empty value means delete only, otherwise the decoded record is inserted
/// as a fresh frame. Returns whether the file was saved (`false` on an
/// unsupported container).
pub fn write_channel(path: &Path, entries: &ChannelMap) -> Result<bool> {
    // Decode every payload up front so a malformed entry cannot leave the
    // file partially mutated.
    let mut replacements: Vec<(&str, Option<GeobRecord>)> = Vec::with_capacity(entries.len());
    for (description, value) in entries {
        if value.is_empty() {
            replacements.push((description, None));
        } else {
            let bytes = codec::from_transport(value)?;
            replacements.push((description, Some(codec::decode_record(&bytes)?)));
        }
    }

    let file_type = gateway::file_type(path)?;
    if !supports_binary_frames(file_type) {
        debug!(
            "{:?} container has no binary frame list, skipping channel write for {}",
            file_type,
            path.display()
        );
        return Ok(false);
    }

    let mut tag = read_id3(path)?;
    let mut objects: Vec<EncapsulatedObject> = geob_objects(&tag).cloned().collect();

    for (description, record) in replacements {
        objects.retain(|existing| existing.description != description);

        if let Some(record) = record {
            objects.push(EncapsulatedObject {
                mime_type: record.mime_type,
                filename: record.file_name,
                description: record.description,
                data: record.payload,
            });
        }
    }

    let _ = tag.remove("GEOB");
    for object in objects {
        let _ = tag.add_frame(Frame::with_content("GEOB", Content::EncapsulatedObject(object)));
    }

    // Normalize to a single canonical tag version and drop the legacy
    // trailer so the two cannot drift out of sync.
    tag.write_to_path(path, Version::Id3v24)
        .map_err(|e| TagbridgeError::save_failed(path, e))?;
    strip_id3v1(path);

    Ok(true)
}

/// Load the file's ID3v2 tag, treating "no tag yet" as an empty tag
pub(crate) fn read_id3(path: &Path) -> Result<id3::Tag> {
    match id3::Tag::read_from_path(path) {
        Ok(tag) => Ok(tag),
        Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => Ok(id3::Tag::new()),
        Err(e) => Err(TagbridgeError::unparsable(path, e)),
    }
}

fn geob_objects(tag: &id3::Tag) -> impl Iterator<Item = &EncapsulatedObject> {
    tag.frames().filter_map(|frame| match frame.content() {
        Content::EncapsulatedObject(object) => Some(object),
        _ => None,
    })
}

fn strip_id3v1(path: &Path) {
    match id3::v1::Tag::remove_from_path(path) {
        Ok(true) => debug!("removed trailing ID3v1 tag from {}", path.display()),
        Ok(false) => {}
        Err(e) => warn!("could not strip ID3v1 tag from {}: {}", path.display(), e),
    }
}
