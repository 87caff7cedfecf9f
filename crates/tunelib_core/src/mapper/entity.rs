//! Per-entity write (`*_to_row`) and read (`make_*`) pipelines.
//!
//! Write: serialize, strip non-persisted fields, `remove_empty_attributes`,
//! `to_number`, `json_dump_value`. Read: drop `null`s and join-row
//! metadata, `json_load_value`, deserialize with field defaults.

use super::normalize::{json_dump_value, json_load_value, remove_empty_attributes, to_number};
use super::row::StorageRow;
use super::{MapError, MapResult};
use crate::model::album::Album;
use crate::model::artist::Artist;
use crate::model::collection::Collection;
use crate::model::song::{Audio, Song};
use crate::model::user_profile::UserProfile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

const AUDIO_NUMERIC_COLUMNS: &[&str] = &["kbps", "size"];

const SONG_NUMERIC_COLUMNS: &[&str] = &["track", "duration", "releaseDate", "playCount"];
const SONG_JSON_COLUMNS: &[&str] = &["genres"];

const ALBUM_NUMERIC_COLUMNS: &[&str] = &["releaseDate", "songCount"];
const ALBUM_JSON_COLUMNS: &[&str] = &["genres", "songs"];

const ARTIST_NUMERIC_COLUMNS: &[&str] = &["songCount", "albumCount"];
const ARTIST_JSON_COLUMNS: &[&str] = &["artistAlias", "genres"];
const ARTIST_DETACHED_FIELDS: &[&str] = &["songs", "albums"];

const COLLECTION_NUMERIC_COLUMNS: &[&str] =
    &["releaseDate", "playCount", "likeCount", "songCount"];
const COLLECTION_JSON_COLUMNS: &[&str] = &["tags", "songs"];

const USER_PROFILE_NUMERIC_COLUMNS: &[&str] = &["followerCount", "followingCount"];
const USER_PROFILE_DETACHED_FIELDS: &[&str] = &[
    "songs",
    "artists",
    "albums",
    "favoriteCollections",
    "createdCollections",
    "followings",
    "followers",
];

const SONG_LIST_COLUMN: &str = "songs";
const ADD_AT_COLUMN: &str = "addAt";

/// Builds an `audio` row tagged with its owning song.
pub fn audio_to_row(audio: &Audio, song_id: &str) -> MapResult<StorageRow> {
    let mut row = to_object(audio)?;
    row.insert("songId".to_string(), Value::from(song_id));
    normalize(&mut row, AUDIO_NUMERIC_COLUMNS);
    Ok(row)
}

/// Builds a `song` row. Audios are stored separately and never included.
pub fn song_to_row(song: &Song) -> MapResult<StorageRow> {
    let mut row = to_object(song)?;
    row.remove("audios");
    normalize(&mut row, SONG_NUMERIC_COLUMNS);
    Ok(row)
}

/// Builds a `library_album` row; tracks are reduced to their ids.
pub fn album_to_row(album: &Album, add_at: i64) -> MapResult<StorageRow> {
    let mut row = to_object(album)?;
    row.insert(SONG_LIST_COLUMN.to_string(), json!(album.song_ids()));
    normalize(&mut row, ALBUM_NUMERIC_COLUMNS);
    row.insert(ADD_AT_COLUMN.to_string(), Value::from(add_at));
    Ok(row)
}

/// Builds a `library_artist` row without song/album associations.
pub fn artist_to_row(artist: &Artist, add_at: i64) -> MapResult<StorageRow> {
    let mut row = to_object(artist)?;
    detach(&mut row, ARTIST_DETACHED_FIELDS);
    normalize(&mut row, ARTIST_NUMERIC_COLUMNS);
    row.insert(ADD_AT_COLUMN.to_string(), Value::from(add_at));
    Ok(row)
}

/// Builds a `library_collection` row; songs are reduced to their ids.
pub fn collection_to_row(collection: &Collection, add_at: i64) -> MapResult<StorageRow> {
    let mut row = to_object(collection)?;
    row.insert(SONG_LIST_COLUMN.to_string(), json!(collection.song_ids()));
    normalize(&mut row, COLLECTION_NUMERIC_COLUMNS);
    row.insert(ADD_AT_COLUMN.to_string(), Value::from(add_at));
    Ok(row)
}

/// Builds a `library_user_profile` row holding scalar attributes only.
pub fn user_profile_to_row(user_profile: &UserProfile, add_at: i64) -> MapResult<StorageRow> {
    let mut row = to_object(user_profile)?;
    detach(&mut row, USER_PROFILE_DETACHED_FIELDS);
    normalize(&mut row, USER_PROFILE_NUMERIC_COLUMNS);
    row.insert(ADD_AT_COLUMN.to_string(), Value::from(add_at));
    Ok(row)
}

/// Rebuilds an audio variant. The stored `''` url reads back as `None`.
pub fn make_audio(mut row: StorageRow) -> MapResult<Audio> {
    remove_empty_attributes(&mut row);
    decode(row, &[])
}

/// Rebuilds a song; `audios` stays empty until filled from the `audio` table.
pub fn make_song(row: StorageRow) -> MapResult<Song> {
    decode(row, SONG_JSON_COLUMNS)
}

/// Rebuilds an album whose `songs` are identifier-only references.
pub fn make_album(row: StorageRow) -> MapResult<Album> {
    decode(expand_song_references(row, ALBUM_JSON_COLUMNS)?, &[])
}

pub fn make_artist(row: StorageRow) -> MapResult<Artist> {
    decode(row, ARTIST_JSON_COLUMNS)
}

/// Rebuilds a collection whose `songs` are identifier-only references.
pub fn make_collection(row: StorageRow) -> MapResult<Collection> {
    decode(expand_song_references(row, COLLECTION_JSON_COLUMNS)?, &[])
}

pub fn make_user_profile(row: StorageRow) -> MapResult<UserProfile> {
    decode(row, &[])
}

/// Reads the serialized song-id list of an album/collection row.
///
/// Missing or `null` lists yield no ids.
pub fn song_ids_from_row(row: &StorageRow) -> MapResult<Vec<String>> {
    match row.get(SONG_LIST_COLUMN) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(text)) => Ok(serde_json::from_str(text)?),
        Some(other) => Err(MapError::InvalidData(format!(
            "column `{SONG_LIST_COLUMN}` holds non-text value {other}"
        ))),
    }
}

fn to_object<T: Serialize>(value: &T) -> MapResult<StorageRow> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(MapError::InvalidData(format!(
            "expected a record, serialized to {other}"
        ))),
    }
}

fn detach(row: &mut StorageRow, fields: &[&str]) {
    for field in fields {
        row.remove(*field);
    }
}

fn normalize(row: &mut StorageRow, numeric_columns: &[&str]) {
    remove_empty_attributes(row);
    to_number(row, numeric_columns);
    json_dump_value(row);
}

fn decode<T: DeserializeOwned>(mut row: StorageRow, json_columns: &[&str]) -> MapResult<T> {
    row.remove("id");
    row.remove(ADD_AT_COLUMN);
    row.retain(|_, value| !value.is_null());
    json_load_value(&mut row, json_columns)?;
    Ok(serde_json::from_value(Value::Object(row))?)
}

fn expand_song_references(mut row: StorageRow, json_columns: &[&str]) -> MapResult<StorageRow> {
    row.retain(|_, value| !value.is_null());
    json_load_value(&mut row, json_columns)?;

    match row.remove(SONG_LIST_COLUMN) {
        Some(Value::Array(items)) => {
            let references = items
                .into_iter()
                .map(|item| match item {
                    Value::String(song_id) => json!({ "songId": song_id }),
                    other => other,
                })
                .collect();
            row.insert(SONG_LIST_COLUMN.to_string(), Value::Array(references));
        }
        Some(other) => {
            row.insert(SONG_LIST_COLUMN.to_string(), other);
        }
        None => {}
    }

    Ok(row)
}
