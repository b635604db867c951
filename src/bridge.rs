//! The operation surface: read/write tags, the binary channel, and audio
//! properties, each in a blocking and a task-based form
//!
//! Every operation opens the file, works on a fresh in-memory view, and
//! closes it before returning; nothing is cached between calls. The task
//! forms validate arguments synchronously, then hand the whole body (open,
//! extract/merge/codec, save) to the [`TaskExecutor`]. Two tasks targeting
//! the same path are not ordered against each other; callers needing that
//! serialization must provide it themselves.

use crate::error::{Result, TagbridgeError};
use crate::executor::{TaskExecutor, TaskHandle};
use crate::store::{self, PropertyStore};
use crate::types::{AudioProperties, ChannelMap};
use crate::{gateway, geob};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reject an empty path before any I/O is attempted
fn validated_path(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(TagbridgeError::invalid_argument(
            "expected a path to an audio file",
        ));
    }
    Ok(path.to_path_buf())
}

/// Read the file's generic property map
pub fn read_tags(path: impl AsRef<Path>) -> Result<PropertyStore> {
    let path = validated_path(path.as_ref())?;
    let file = gateway::open(&path)?;
    let store = gateway::read_store(&path, &file)?;
    debug!("read {} properties from {}", store.len(), path.display());
    Ok(store)
}

/// Merge `incoming` into the file's property map and save.
///
/// Returns whether a save happened: an empty merged store is a deliberate
/// no-op that leaves the file's bytes untouched.
pub fn write_tags(path: impl AsRef<Path>, incoming: PropertyStore) -> Result<bool> {
    let path = validated_path(path.as_ref())?;
    let file = gateway::open(&path)?;

    let existing = gateway::read_store(&path, &file)?;
    let merged = store::merge(existing, incoming);

    if merged.is_empty() {
        debug!(
            "merged property store is empty, skipping save for {}",
            path.display()
        );
        return Ok(false);
    }

    gateway::write_store(&path, &file, &merged)?;
    Ok(true)
}

/// Read the GEOB binary channel as `description -> transport text`.
///
/// Containers without a binary frame list yield an empty map.
pub fn read_binary_channel(path: impl AsRef<Path>) -> Result<ChannelMap> {
    let path = validated_path(path.as_ref())?;
    geob::read_channel(&path)
}

/// Apply binary-channel entries to the file; empty values delete.
///
/// Returns whether a save happened (`false` on an unsupported container).
pub fn write_binary_channel(path: impl AsRef<Path>, entries: ChannelMap) -> Result<bool> {
    let path = validated_path(path.as_ref())?;
    geob::write_channel(&path, &entries)
}

/// Read technical stream properties
pub fn read_audio_properties(path: impl AsRef<Path>) -> Result<AudioProperties> {
    let path = validated_path(path.as_ref())?;
    let file = gateway::open(&path)?;
    Ok(gateway::read_properties(&file))
}

/// Non-blocking form of [`read_tags`]
pub fn read_tags_task(
    executor: &TaskExecutor,
    path: impl AsRef<Path>,
) -> Result<TaskHandle<PropertyStore>> {
    let path = validated_path(path.as_ref())?;
    Ok(executor.spawn(move || read_tags(path)))
}

/// Non-blocking form of [`write_tags`]
pub fn write_tags_task(
    executor: &TaskExecutor,
    path: impl AsRef<Path>,
    incoming: PropertyStore,
) -> Result<TaskHandle<bool>> {
    let path = validated_path(path.as_ref())?;
    Ok(executor.spawn(move || write_tags(path, incoming)))
}

/// Non-blocking form of [`read_binary_channel`]
pub fn read_binary_channel_task(
    executor: &TaskExecutor,
    path: impl AsRef<Path>,
) -> Result<TaskHandle<ChannelMap>> {
    let path = validated_path(path.as_ref())?;
    Ok(executor.spawn(move || read_binary_channel(path)))
}

/// Non-blocking form of [`write_binary_channel`]
pub fn write_binary_channel_task(
    executor: &TaskExecutor,
    path: impl AsRef<Path>,
    entries: ChannelMap,
) -> Result<TaskHandle<bool>> {
    let path = validated_path(path.as_ref())?;
    Ok(executor.spawn(move || write_binary_channel(path, entries)))
}

/// Non-blocking form of [`read_audio_properties`]
pub fn read_audio_properties_task(
    executor: &TaskExecutor,
    path: impl AsRef<Path>,
) -> Result<TaskHandle<AudioProperties>> {
    let path = validated_path(path.as_ref())?;
    Ok(executor.spawn(move || read_audio_properties(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_rejected_before_io() {
        assert!(matches!(
            read_tags(""),
            Err(TagbridgeError::InvalidArgument(_))
        ));
        assert!(matches!(
            write_tags("", PropertyStore::new()),
            Err(TagbridgeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty_path_is_rejected_synchronously_for_task_forms() {
        let executor = TaskExecutor::new(1);
        // The error comes back directly, not through a task handle.
        assert!(matches!(
            read_tags_task(&executor, ""),
            Err(TagbridgeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn missing_file_is_path_not_accessible() {
        assert!(matches!(
            read_tags("/nonexistent/track.mp3"),
            Err(TagbridgeError::PathNotAccessible(_))
        ));
    }
}
