//! Media snapshot mapping: live media rows to value-copied snapshot items
//! and back.
//!
//! Pure and stateless. Invoked once per update/restore -- the live media
//! list is always replaced wholesale, never patched, so there is no
//! incremental mapping.

use khub_db::models::media::{CreateMedia, Media};

use crate::store::MediaSnapshotItem;

/// Capture an article's live media list as value copies.
///
/// The result carries no reference to the live rows; live media may later be
/// edited or deleted without affecting the snapshot. Input order (the
/// attachment order) is preserved.
pub fn snapshot_media(live: &[Media]) -> Vec<MediaSnapshotItem> {
    live.iter()
        .map(|m| MediaSnapshotItem {
            url: m.url.clone(),
            media_type: m.media_type.clone(),
            description: m.description.clone(),
        })
        .collect()
}

/// Turn a version's media snapshot into fresh live rows for re-attachment
/// during restore.
///
/// Snapshot items are value copies, so restoring materializes new rows
/// rather than re-linking old ones.
pub fn materialize_media(snapshot: &[MediaSnapshotItem]) -> Vec<CreateMedia> {
    snapshot
        .iter()
        .enumerate()
        .map(|(position, item)| CreateMedia {
            url: item.url.clone(),
            media_type: item.media_type.clone(),
            description: item.description.clone(),
            position: position as i32,
        })
        .collect()
}
