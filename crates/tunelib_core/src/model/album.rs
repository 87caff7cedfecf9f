//! Album record.

use super::song::Song;
use super::{ItemKind, LibraryEntity};
use serde::{Deserialize, Serialize};

/// An album and its ordered track list.
///
/// When read back from the library, `songs` only carries identifier
/// references; resolve them with `LibraryDatabase::library_album_songs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Album {
    pub album_id: String,
    pub album_name: Option<String>,
    pub sub_title: Option<String>,
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
    pub origin: Option<String>,
    pub genres: Vec<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<i64>,
    pub song_count: Option<i64>,
    pub songs: Vec<Song>,
}

impl Album {
    pub fn new(album_id: impl Into<String>, album_name: impl Into<String>) -> Self {
        Self {
            album_id: album_id.into(),
            album_name: Some(album_name.into()),
            ..Self::default()
        }
    }

    pub fn song_ids(&self) -> Vec<String> {
        self.songs.iter().map(|song| song.song_id.clone()).collect()
    }
}

impl LibraryEntity for Album {
    const KIND: ItemKind = ItemKind::Album;

    fn natural_id(&self) -> &str {
        &self.album_id
    }
}
