//! Artist record.

use super::album::Album;
use super::song::Song;
use super::{ItemKind, LibraryEntity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Artist {
    pub artist_id: String,
    pub artist_name: Option<String>,
    pub artist_alias: Vec<String>,
    pub origin: Option<String>,
    pub genres: Vec<String>,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub song_count: Option<i64>,
    pub album_count: Option<i64>,
    /// Never persisted.
    pub songs: Vec<Song>,
    /// Never persisted.
    pub albums: Vec<Album>,
}

impl Artist {
    pub fn new(artist_id: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            artist_id: artist_id.into(),
            artist_name: Some(artist_name.into()),
            ..Self::default()
        }
    }
}

impl LibraryEntity for Artist {
    const KIND: ItemKind = ItemKind::Artist;

    fn natural_id(&self) -> &str {
        &self.artist_id
    }
}
