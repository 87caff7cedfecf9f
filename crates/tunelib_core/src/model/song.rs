//! Song and audio variant records.
//!
//! # Invariants
//! - `song_id` is unique in the shared `song` table.
//! - An audio variant is identified by `(song_id, format, kbps, url)`; a
//!   missing url is stored as the empty string.

use super::{ItemKind, LibraryEntity};
use serde::{Deserialize, Serialize};

/// One playable variant of a song (a bitrate or a source).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Audio {
    /// Container/codec label, e.g. `mp3` or `flac`.
    pub format: String,
    pub kbps: u32,
    /// Size in bytes when known.
    pub size: Option<i64>,
    pub url: Option<String>,
    /// Local file path for downloaded variants.
    pub path: Option<String>,
}

impl Audio {
    pub fn new(format: impl Into<String>, kbps: u32) -> Self {
        Self {
            format: format.into(),
            kbps,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Song {
    pub song_id: String,
    pub song_name: Option<String>,
    pub sub_title: Option<String>,
    pub album_id: Option<String>,
    pub album_name: Option<String>,
    pub album_cover_url: Option<String>,
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
    /// Catalog the song was fetched from.
    pub origin: Option<String>,
    pub genres: Vec<String>,
    pub track: Option<i64>,
    /// Milliseconds.
    pub duration: Option<i64>,
    /// Unix epoch milliseconds.
    pub release_date: Option<i64>,
    pub play_count: Option<i64>,
    /// Not a `song` column; persisted in the `audio` table.
    pub audios: Vec<Audio>,
}

impl Song {
    /// Creates a song carrying only its identity and display name.
    pub fn new(song_id: impl Into<String>, song_name: impl Into<String>) -> Self {
        Self {
            song_id: song_id.into(),
            song_name: Some(song_name.into()),
            ..Self::default()
        }
    }

    /// Identifier-only reference, as stored in album/collection song lists.
    pub fn reference(song_id: impl Into<String>) -> Self {
        Self {
            song_id: song_id.into(),
            ..Self::default()
        }
    }
}

impl LibraryEntity for Song {
    const KIND: ItemKind = ItemKind::Song;

    fn natural_id(&self) -> &str {
        &self.song_id
    }
}
