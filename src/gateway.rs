//! File gateway over the tag metadata library
//!
//! Opening a file by path, projecting its tag into a [`PropertyStore`],
//! pushing a merged store back, and reading technical stream properties.
//! Keys are normalized through the Vorbis-comment naming table, which matches
//! the uppercase property names the host surface expects (`ARTIST`,
//! `ALBUMARTIST`, `TRACKNUMBER`, ...).
//!
//! Saving through lofty rebuilds an ID3v2 tag wholesale, so on MPEG files two
//! things are handled at the frame level instead: GEOB frames are carried
//! around the save, and keys without a native ID3v2 frame are persisted as
//! TXXX user-defined text frames (and read back from them).
//!
//! A file handle is opened, used, and dropped entirely within one operation;
//! no parsed state is cached across calls.

use crate::error::{Result, TagbridgeError};
use crate::geob::read_id3;
use crate::store::{PropertyKey, PropertyStore};
use crate::types::AudioProperties;
use id3::frame::{Content, ExtendedText, Frame};
use id3::{TagLike, Version};
use lofty::{
    AudioFile, FileType, ItemKey, ItemValue, Probe, Tag, TagExt, TagItem, TagType, TaggedFile,
    TaggedFileExt,
};
use std::path::Path;
use tracing::{debug, warn};

/// ID3v2.4 separator for multiple values inside one text frame
const VALUE_SEPARATOR: &str = "\u{0}";

/// Check that the path resolves to a readable regular file (symlinks to
/// regular files pass, as `fs::metadata` follows them).
pub fn ensure_readable_file(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(TagbridgeError::PathNotAccessible(path.to_path_buf())),
    }
}

/// Open and parse a file through the tag library
pub fn open(path: &Path) -> Result<TaggedFile> {
    ensure_readable_file(path)?;

    Probe::open(path)
        .map_err(|e| TagbridgeError::unparsable(path, e))?
        .read()
        .map_err(|e| TagbridgeError::unparsable(path, e))
}

/// Determine the container family without fully parsing the file
pub fn file_type(path: &Path) -> Result<FileType> {
    ensure_readable_file(path)?;

    let probe = Probe::open(path)
        .map_err(|e| TagbridgeError::unparsable(path, e))?
        .guess_file_type()
        .map_err(|e| TagbridgeError::unparsable(path, e))?;

    probe
        .file_type()
        .ok_or_else(|| TagbridgeError::unparsable(path, "unrecognized container format"))
}

/// Project the file's tag into a fresh property store
///
/// Binary items are skipped; only textual values flow through the generic
/// map. A file without any tag yields an empty store.
pub fn read_store(path: &Path, file: &TaggedFile) -> Result<PropertyStore> {
    let mut store = PropertyStore::new();
    let id3_backed = matches!(file.file_type(), FileType::Mpeg);

    if let Some(tag) = file.primary_tag().or_else(|| file.first_tag()) {
        for item in tag.items() {
            // On ID3v2 an unmapped key lives in a TXXX frame; the frame-level
            // pass below is authoritative for those.
            if id3_backed && matches!(item.key(), ItemKey::Unknown(_)) {
                continue;
            }
            let Some(raw_key) = item.key().map_key(TagType::VorbisComments, true) else {
                continue;
            };
            let Ok(key) = PropertyKey::new(raw_key) else {
                continue;
            };

            match item.value() {
                ItemValue::Text(text) | ItemValue::Locator(text) => store.push(key, text.clone()),
                ItemValue::Binary(_) => {}
            }
        }
    }

    if id3_backed {
        read_user_defined(path, &mut store)?;
    }

    Ok(store)
}

/// Merge TXXX user-defined text frames into the store.
///
/// These carry the keys ID3v2 has no native frame for. A description that
/// collides with a key already read from a native frame loses; the native
/// frame wins.
fn read_user_defined(path: &Path, store: &mut PropertyStore) -> Result<()> {
    let tag = read_id3(path)?;

    for frame in tag.frames() {
        let Content::ExtendedText(text) = frame.content() else {
            continue;
        };
        let Ok(key) = PropertyKey::new(&text.description) else {
            continue;
        };
        if store.contains(&key) {
            continue;
        }
        store.set(
            key,
            text.value.split(VALUE_SEPARATOR).map(str::to_string).collect(),
        );
    }

    Ok(())
}

/// Push a merged property store into the file and save it.
///
/// The tag is rebuilt from scratch so that stale multi-values cannot linger
/// next to replacement values; pictures already present in the file are
/// carried over since the generic map only holds text. On MPEG files the
/// save replaces the whole ID3v2 tag, so GEOB frames are captured first and
/// re-applied afterwards, together with TXXX frames for any key the
/// container has no native frame for.
pub fn write_store(path: &Path, file: &TaggedFile, store: &PropertyStore) -> Result<()> {
    let existing = file.primary_tag().or_else(|| file.first_tag());
    let tag_type = existing
        .map(Tag::tag_type)
        .unwrap_or_else(|| file.primary_tag_type());
    let id3_backed = matches!(file.file_type(), FileType::Mpeg);

    let carried = if id3_backed {
        binary_frames(path)?
    } else {
        Vec::new()
    };

    let mut tag = Tag::new(tag_type);
    let mut user_defined: Vec<(&PropertyKey, &[String])> = Vec::new();
    for (key, values) in store.iter() {
        let item_key = ItemKey::from_key(TagType::VorbisComments, key.as_str());
        if id3_backed && matches!(item_key, ItemKey::Unknown(_)) {
            // No native ID3v2 frame for this key; it becomes a TXXX frame
            // after the save.
            user_defined.push((key, values));
            continue;
        }
        for value in values {
            let pushed = tag.push(TagItem::new(
                item_key.clone(),
                ItemValue::Text(value.clone()),
            ));
            if !pushed {
                warn!("{:?} does not accept property {}, dropping it", tag_type, key);
            }
        }
    }

    if let Some(existing) = existing {
        for picture in existing.pictures() {
            tag.push_picture(picture.clone());
        }
    }

    debug!(
        "saving {} properties ({:?}) to {}",
        store.len(),
        tag_type,
        path.display()
    );

    tag.save_to_path(path)
        .map_err(|e| TagbridgeError::save_failed(path, e))?;

    if !carried.is_empty() || !user_defined.is_empty() {
        write_id3_extras(path, carried, &user_defined)?;
    }

    Ok(())
}

/// Collect the GEOB frames the generic map cannot express, so a property
/// save does not destroy the binary channel
fn binary_frames(path: &Path) -> Result<Vec<Frame>> {
    let tag = read_id3(path)?;
    Ok(tag
        .frames()
        .filter(|frame| frame.id() == "GEOB")
        .cloned()
        .collect())
}

/// Re-apply carried binary frames and persist unmapped keys as TXXX frames,
/// on top of the tag lofty just saved
fn write_id3_extras(
    path: &Path,
    carried: Vec<Frame>,
    user_defined: &[(&PropertyKey, &[String])],
) -> Result<()> {
    let mut tag = read_id3(path)?;

    for frame in carried {
        let _ = tag.add_frame(frame);
    }
    for (key, values) in user_defined {
        let text = ExtendedText {
            description: key.to_string(),
            value: values.join(VALUE_SEPARATOR),
        };
        let _ = tag.add_frame(Frame::with_content("TXXX", Content::ExtendedText(text)));
    }

    tag.write_to_path(path, Version::Id3v24)
        .map_err(|e| TagbridgeError::save_failed(path, e))
}

/// Read technical stream properties, defaulting missing fields to zero
pub fn read_properties(file: &TaggedFile) -> AudioProperties {
    let props = file.properties();

    AudioProperties {
        bitrate: props.audio_bitrate().unwrap_or(0),
        channels: props.channels().unwrap_or(0),
        length: props.duration().as_secs(),
        sample_rate: props.sample_rate().unwrap_or(0),
    }
}
