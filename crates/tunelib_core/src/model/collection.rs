//! Collection (playlist) record.

use super::song::Song;
use super::{ItemKind, LibraryEntity};
use serde::{Deserialize, Serialize};

/// A user-curated song list. Songs are stored like album tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collection {
    pub collection_id: String,
    pub collection_name: Option<String>,
    /// Owner of the collection.
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub origin: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<i64>,
    pub play_count: Option<i64>,
    pub like_count: Option<i64>,
    pub song_count: Option<i64>,
    pub songs: Vec<Song>,
}

impl Collection {
    pub fn new(collection_id: impl Into<String>, collection_name: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            collection_name: Some(collection_name.into()),
            ..Self::default()
        }
    }

    pub fn song_ids(&self) -> Vec<String> {
        self.songs.iter().map(|song| song.song_id.clone()).collect()
    }
}

impl LibraryEntity for Collection {
    const KIND: ItemKind = ItemKind::Collection;

    fn natural_id(&self) -> &str {
        &self.collection_id
    }
}
