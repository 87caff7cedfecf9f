//! Library entries and keyset page requests.
//!
//! # Invariants
//! - `id` is the surrogate key of the library join row, scoped to its table.
//! - Pages are ordered by `id` descending; `last_id` is an exclusive bound.

use super::album::Album;
use super::artist::Artist;
use super::collection::Collection;
use super::song::Song;
use super::user_profile::UserProfile;

/// A catalog entity saved into the personal library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryItem<T> {
    /// Surrogate id of the library row, used as pagination cursor.
    pub id: i64,
    /// Insertion time supplied by the caller, epoch milliseconds.
    pub add_at: i64,
    pub item: T,
}

pub type LibrarySong = LibraryItem<Song>;
pub type LibraryAlbum = LibraryItem<Album>;
pub type LibraryArtist = LibraryItem<Artist>;
pub type LibraryCollection = LibraryItem<Collection>;
pub type LibraryUserProfile = LibraryItem<UserProfile>;

/// Keyset page request shared by every `library_*` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryQuery {
    /// Only rows with `id < last_id` are returned.
    pub last_id: i64,
    /// Maximum rows to return.
    pub size: u32,
    /// Substring filter; blank keywords are ignored.
    pub keyword: Option<String>,
}

impl LibraryQuery {
    pub fn new(last_id: i64, size: u32) -> Self {
        Self {
            last_id,
            size,
            keyword: None,
        }
    }

    /// Page starting from the newest entry.
    pub fn first_page(size: u32) -> Self {
        Self::new(i64::MAX, size)
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Request for the page following `items`, or `None` when it was the last.
    pub fn next_page<T>(&self, items: &[LibraryItem<T>]) -> Option<Self> {
        let oldest = items.iter().map(|entry| entry.id).min()?;
        Some(Self {
            last_id: oldest,
            ..self.clone()
        })
    }

    /// `LIKE` pattern for the keyword, `None` when no filter applies.
    pub(crate) fn like_pattern(&self) -> Option<String> {
        match self.keyword.as_deref() {
            Some(keyword) if !keyword.is_empty() => Some(format!("%{keyword}%")),
            _ => None,
        }
    }
}
