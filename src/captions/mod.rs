//! Timed caption segments and point-in-time lookup.

/// Shared, snapshot-readable caption handle.
pub mod live;
/// Caption entity.
pub mod model;
/// SubRip (`.srt`) import and export.
pub mod srt;
/// Ordered caption collection.
pub mod store;
