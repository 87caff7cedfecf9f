//! Core persistence for a personal music library.
//! Maps songs, albums, artists, collections and user profiles onto a local
//! SQLite store and back.

pub mod db;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod repo;

pub use db::{DbError, DbOptions, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::album::Album;
pub use model::artist::Artist;
pub use model::collection::Collection;
pub use model::library::{
    LibraryAlbum, LibraryArtist, LibraryCollection, LibraryItem, LibraryQuery, LibrarySong,
    LibraryUserProfile,
};
pub use model::song::{Audio, Song};
pub use model::user_profile::UserProfile;
pub use model::{ItemKind, LibraryEntity};
pub use repo::library_db::{LibraryDatabase, LibraryError, LibraryResult};
