//! Row mapper between domain records and flat storage rows.
//!
//! # Responsibility
//! - Normalize domain records into insertable column/value rows.
//! - Rebuild domain records from rows, tolerating missing or extra columns.
//!
//! # Invariants
//! - Write and read pipelines are symmetric for every persisted field.
//! - Functions here never touch the database connection.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod entity;
pub mod normalize;
pub mod row;

pub use entity::{
    album_to_row, artist_to_row, audio_to_row, collection_to_row, make_album, make_artist,
    make_audio, make_collection, make_song, make_user_profile, song_ids_from_row, song_to_row,
    user_profile_to_row,
};
pub use normalize::{json_dump_value, json_load_value, remove_empty_attributes, to_number};
pub use row::StorageRow;

pub type MapResult<T> = Result<T, MapError>;

#[derive(Debug)]
pub enum MapError {
    Json(serde_json::Error),
    InvalidData(String),
}

impl Display for MapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid library row: {message}"),
        }
    }
}

impl Error for MapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<serde_json::Error> for MapError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
