//! Domain records persisted by the library store.
//!
//! # Responsibility
//! - Define fixed field-set types for catalog entities and library entries.
//! - Own the kind -> table registry used by existence checks.
//!
//! # Invariants
//! - Every addable entity is identified by a stable, catalog-provided id.
//! - Field names serialize in camelCase and match storage column names.

pub mod album;
pub mod artist;
pub mod collection;
pub mod library;
pub mod song;
pub mod user_profile;

/// The five entity kinds that can be added to the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Song,
    Album,
    Artist,
    Collection,
    UserProfile,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Song,
        ItemKind::Album,
        ItemKind::Artist,
        ItemKind::Collection,
        ItemKind::UserProfile,
    ];

    /// Library table holding entries of this kind.
    pub fn table(self) -> &'static str {
        match self {
            Self::Song => "library_song",
            Self::Album => "library_album",
            Self::Artist => "library_artist",
            Self::Collection => "library_collection",
            Self::UserProfile => "library_user_profile",
        }
    }

    /// Natural identifier column. `userProfile` is keyed by `userId`.
    pub fn id_column(self) -> &'static str {
        match self {
            Self::Song => "songId",
            Self::Album => "albumId",
            Self::Artist => "artistId",
            Self::Collection => "collectionId",
            Self::UserProfile => "userId",
        }
    }
}

/// Implemented by every entity that can be added to the library.
pub trait LibraryEntity {
    const KIND: ItemKind;

    /// Catalog identifier stored in [`ItemKind::id_column`].
    fn natural_id(&self) -> &str;
}
