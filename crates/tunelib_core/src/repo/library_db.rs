//! `LibraryDatabase`: the façade over the library store.
//!
//! # Responsibility
//! - Map songs, albums, artists, collections and user profiles to rows.
//! - Maintain the shared `song` table across library, album and collection
//!   ownership.
//!
//! # Invariants
//! - Every insert is `INSERT OR IGNORE`: the first writer of an id wins.
//! - Constituents are written first: audios before their song, songs
//!   before the album/collection that lists them.
//! - `remove_song` only consults `library_song`. Songs still listed by an
//!   album or collection are deleted anyway once their library row is gone.
//! - Multi-statement operations are not wrapped in a transaction.

use crate::db::{
    migrations::apply_migrations, open_db, open_db_in_memory, open_db_with, DbError, DbOptions,
};
use crate::mapper::row::{from_sql_row, to_sql_value};
use crate::mapper::{
    album_to_row, artist_to_row, audio_to_row, collection_to_row, make_album, make_artist,
    make_audio, make_collection, make_song, make_user_profile, song_ids_from_row, song_to_row,
    user_profile_to_row, MapError, StorageRow,
};
use crate::model::album::Album;
use crate::model::artist::Artist;
use crate::model::collection::Collection;
use crate::model::library::{
    LibraryAlbum, LibraryArtist, LibraryCollection, LibraryItem, LibraryQuery, LibrarySong,
    LibraryUserProfile,
};
use crate::model::song::{Audio, Song};
use crate::model::user_profile::UserProfile;
use crate::model::{ItemKind, LibraryEntity};
use log::debug;
use rusqlite::{named_params, params, params_from_iter, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Upper bound of `?` placeholders per `IN (...)` batch.
const SONGS_BATCH_SIZE: usize = 500;

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Error raised by library façade operations.
#[derive(Debug)]
pub enum LibraryError {
    /// Failure reported by the storage engine, carried unchanged.
    Db(DbError),
    Json(serde_json::Error),
    /// Persisted row cannot be mapped back to its record type.
    InvalidData(String),
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "library value serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted library data: {message}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for LibraryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for LibraryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<MapError> for LibraryError {
    fn from(value: MapError) -> Self {
        match value {
            MapError::Json(err) => Self::Json(err),
            MapError::InvalidData(message) => Self::InvalidData(message),
        }
    }
}

/// Statement shape of one `library_*` listing.
struct Listing {
    /// `SELECT ... FROM ...` without filter or ordering.
    select: &'static str,
    /// Surrogate id column used as the keyset cursor.
    cursor_column: &'static str,
    /// Text columns matched by the keyword filter.
    search_columns: &'static [&'static str],
}

const SONG_LISTING: Listing = Listing {
    select: "SELECT song.*, library_song.id AS id, library_song.addAt AS addAt
             FROM library_song
             INNER JOIN song ON library_song.songId = song.songId",
    cursor_column: "library_song.id",
    search_columns: &[
        "song.songName",
        "song.subTitle",
        "song.albumName",
        "song.artistName",
        "song.genres",
    ],
};

const ALBUM_LISTING: Listing = Listing {
    select: "SELECT * FROM library_album",
    cursor_column: "id",
    search_columns: &["subTitle", "albumName", "artistName", "genres"],
};

const ARTIST_LISTING: Listing = Listing {
    select: "SELECT * FROM library_artist",
    cursor_column: "id",
    search_columns: &["artistName", "genres"],
};

const COLLECTION_LISTING: Listing = Listing {
    select: "SELECT * FROM library_collection",
    cursor_column: "id",
    search_columns: &["collectionName", "tags"],
};

const USER_PROFILE_LISTING: Listing = Listing {
    select: "SELECT * FROM library_user_profile",
    cursor_column: "id",
    search_columns: &["userName"],
};

impl Listing {
    fn sql(&self, with_keyword: bool) -> String {
        let mut sql = format!("{} WHERE {} < :last_id", self.select, self.cursor_column);
        if with_keyword {
            let condition = self
                .search_columns
                .iter()
                .map(|column| format!("({column} LIKE :kw)"))
                .collect::<Vec<_>>()
                .join(" OR ");
            sql.push_str(&format!(" AND ({condition})"));
        }
        sql.push_str(&format!(" ORDER BY {} DESC LIMIT :size", self.cursor_column));
        sql
    }
}

/// Library store façade owning a single SQLite connection.
#[derive(Debug)]
pub struct LibraryDatabase {
    conn: Connection,
}

impl LibraryDatabase {
    /// Opens (or creates) the library database at `path`.
    pub fn open(path: impl AsRef<Path>) -> LibraryResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_with(path: impl AsRef<Path>, options: &DbOptions) -> LibraryResult<Self> {
        Ok(Self {
            conn: open_db_with(path, options)?,
        })
    }

    pub fn open_in_memory() -> LibraryResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps a caller-opened connection, creating the schema if needed.
    pub fn from_connection(mut conn: Connection) -> LibraryResult<Self> {
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Underlying connection handle.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Stored credential hash of the single local user, if any.
    #[deprecated(note = "legacy credential storage; not a supported authentication path")]
    pub fn get_encrypted_password(&self) -> LibraryResult<Option<String>> {
        let password = self
            .conn
            .query_row("SELECT encrypted_password FROM user LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(password)
    }

    /// Every audio variant stored for `song_id`, in insertion order.
    pub fn audio(&self, song_id: &str) -> LibraryResult<Vec<Audio>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT * FROM audio WHERE songId = ?1 ORDER BY rowid")?;
        let mut rows = stmt.query([song_id])?;
        let mut audios = Vec::new();

        while let Some(row) = rows.next()? {
            audios.push(make_audio(from_sql_row(row)?)?);
        }

        Ok(audios)
    }

    /// Looks up songs by id with their audios populated.
    ///
    /// Results follow the first occurrence of each id in `song_ids`; ids
    /// without a `song` row are skipped. Audios are fetched with one query
    /// per song.
    pub fn songs<S: AsRef<str>>(&self, song_ids: &[S]) -> LibraryResult<Vec<Song>> {
        if song_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut found: HashMap<String, Song> = HashMap::new();
        for chunk in song_ids.chunks(SONGS_BATCH_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!("SELECT * FROM song WHERE songId IN ({placeholders})");
            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(chunk.iter().map(|id| id.as_ref())))?;

            while let Some(row) = rows.next()? {
                let song = make_song(from_sql_row(row)?)?;
                found.insert(song.song_id.clone(), song);
            }
        }

        let mut songs = Vec::with_capacity(found.len());
        for song_id in song_ids {
            if let Some(mut song) = found.remove(song_id.as_ref()) {
                song.audios = self.audio(&song.song_id)?;
                songs.push(song);
            }
        }

        Ok(songs)
    }

    /// Keyset page over one library table, newest first.
    fn library_item(
        &self,
        listing: &Listing,
        query: &LibraryQuery,
    ) -> LibraryResult<Vec<StorageRow>> {
        let pattern = query.like_pattern();
        let size = i64::from(query.size);
        let mut stmt = self.conn.prepare(&listing.sql(pattern.is_some()))?;

        let mut rows = match pattern.as_deref() {
            Some(kw) => stmt.query(named_params! {
                ":last_id": query.last_id,
                ":kw": kw,
                ":size": size,
            })?,
            None => stmt.query(named_params! {
                ":last_id": query.last_id,
                ":size": size,
            })?,
        };

        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(from_sql_row(row)?);
        }

        Ok(items)
    }

    pub fn library_songs(&self, query: &LibraryQuery) -> LibraryResult<Vec<LibrarySong>> {
        let mut entries = Vec::new();
        for row in self.library_item(&SONG_LISTING, query)? {
            let (id, add_at) = entry_meta(&row)?;
            let mut song = make_song(row)?;
            song.audios = self.audio(&song.song_id)?;
            entries.push(LibraryItem {
                id,
                add_at,
                item: song,
            });
        }
        Ok(entries)
    }

    pub fn library_albums(&self, query: &LibraryQuery) -> LibraryResult<Vec<LibraryAlbum>> {
        self.library_item(&ALBUM_LISTING, query)?
            .into_iter()
            .map(|row| into_entry(row, make_album))
            .collect()
    }

    pub fn library_artists(&self, query: &LibraryQuery) -> LibraryResult<Vec<LibraryArtist>> {
        self.library_item(&ARTIST_LISTING, query)?
            .into_iter()
            .map(|row| into_entry(row, make_artist))
            .collect()
    }

    pub fn library_collections(
        &self,
        query: &LibraryQuery,
    ) -> LibraryResult<Vec<LibraryCollection>> {
        self.library_item(&COLLECTION_LISTING, query)?
            .into_iter()
            .map(|row| into_entry(row, make_collection))
            .collect()
    }

    pub fn library_user_profiles(
        &self,
        query: &LibraryQuery,
    ) -> LibraryResult<Vec<LibraryUserProfile>> {
        self.library_item(&USER_PROFILE_LISTING, query)?
            .into_iter()
            .map(|row| into_entry(row, make_user_profile))
            .collect()
    }

    /// Full songs of a library album, in album order.
    ///
    /// Returns an empty list when the album is not in the library. Listed
    /// ids without a `song` row are skipped.
    pub fn library_album_songs(&self, album_id: &str) -> LibraryResult<Vec<Song>> {
        self.listed_songs(ItemKind::Album, album_id)
    }

    /// Full songs of a library collection, in collection order.
    pub fn library_collection_songs(&self, collection_id: &str) -> LibraryResult<Vec<Song>> {
        self.listed_songs(ItemKind::Collection, collection_id)
    }

    fn listed_songs(&self, kind: ItemKind, natural_id: &str) -> LibraryResult<Vec<Song>> {
        let sql = format!(
            "SELECT songs FROM {} WHERE {} = ?1",
            kind.table(),
            kind.id_column()
        );
        let row = self
            .conn
            .query_row(&sql, [natural_id], from_sql_row)
            .optional()?;

        match row {
            Some(row) => self.songs(&song_ids_from_row(&row)?),
            None => Ok(Vec::new()),
        }
    }

    /// Whether `item` currently has a row in its library table.
    pub fn exists<T: LibraryEntity>(&self, item: &T) -> LibraryResult<bool> {
        let sql = format!(
            "SELECT 1 FROM {} WHERE {} = ?1 LIMIT 1",
            T::KIND.table(),
            T::KIND.id_column()
        );
        let found = self
            .conn
            .query_row(&sql, [item.natural_id()], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Inserts one audio variant of `song_id`; existing variants are kept.
    pub fn store_audio(&self, audio: &Audio, song_id: &str) -> LibraryResult<()> {
        self.insert_or_ignore("audio", &audio_to_row(audio, song_id)?)?;
        Ok(())
    }

    /// Writes a song and its audios to the shared tables without adding it
    /// to the library.
    pub fn store_song(&self, song: &Song) -> LibraryResult<()> {
        for audio in &song.audios {
            self.store_audio(audio, &song.song_id)?;
        }
        self.insert_or_ignore("song", &song_to_row(song)?)?;
        Ok(())
    }

    #[deprecated(note = "legacy credential storage; not a supported authentication path")]
    pub fn add_user(&self, username: &str, encrypted_password: &str) -> LibraryResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO user (username, encrypted_password) VALUES (?1, ?2)",
            params![username, encrypted_password],
        )?;
        Ok(())
    }

    /// Stores `song` and records it in the library.
    ///
    /// When the song is already in the library nothing changes and `id` is
    /// the connection's last successful insert rowid, which may belong to
    /// another row or table.
    pub fn add_song(&self, song: Song, add_at: i64) -> LibraryResult<LibrarySong> {
        self.store_song(&song)?;
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO library_song (songId, addAt) VALUES (?1, ?2)",
            params![song.song_id, add_at],
        )?;
        Ok(self.entry(song, add_at, changed))
    }

    /// Stores every track, then records the album with its track ids.
    pub fn add_album(&self, album: Album, add_at: i64) -> LibraryResult<LibraryAlbum> {
        for song in &album.songs {
            self.store_song(song)?;
        }
        let changed =
            self.insert_or_ignore(ItemKind::Album.table(), &album_to_row(&album, add_at)?)?;
        Ok(self.entry(album, add_at, changed))
    }

    /// Records the artist; its song/album associations are not persisted.
    pub fn add_artist(&self, artist: Artist, add_at: i64) -> LibraryResult<LibraryArtist> {
        let changed =
            self.insert_or_ignore(ItemKind::Artist.table(), &artist_to_row(&artist, add_at)?)?;
        Ok(self.entry(artist, add_at, changed))
    }

    /// Stores every song, then records the collection with its song ids.
    pub fn add_collection(
        &self,
        collection: Collection,
        add_at: i64,
    ) -> LibraryResult<LibraryCollection> {
        for song in &collection.songs {
            self.store_song(song)?;
        }
        let changed = self.insert_or_ignore(
            ItemKind::Collection.table(),
            &collection_to_row(&collection, add_at)?,
        )?;
        Ok(self.entry(collection, add_at, changed))
    }

    /// Records the profile's scalar attributes only.
    pub fn add_user_profile(
        &self,
        user_profile: UserProfile,
        add_at: i64,
    ) -> LibraryResult<LibraryUserProfile> {
        let changed = self.insert_or_ignore(
            ItemKind::UserProfile.table(),
            &user_profile_to_row(&user_profile, add_at)?,
        )?;
        Ok(self.entry(user_profile, add_at, changed))
    }

    /// Deletes the shared `song` row unless `library_song` still references
    /// it. Album and collection song lists are not consulted.
    pub fn remove_song(&self, song: &Song) -> LibraryResult<()> {
        let deleted = self.conn.execute(
            "DELETE FROM song
             WHERE songId = ?1
               AND songId NOT IN (SELECT songId FROM library_song WHERE songId = ?1)",
            [song.song_id.as_str()],
        )?;
        debug!(
            "event=song_remove module=library status=ok song_id={} deleted={}",
            song.song_id,
            deleted > 0
        );
        Ok(())
    }

    /// Removes the song from the library only; the shared `song` row stays
    /// for albums and collections that list it.
    pub fn delete_song(&self, song: &Song) -> LibraryResult<()> {
        self.delete_entry(song)
    }

    /// Removes the album, then tries `remove_song` on each of its tracks.
    pub fn delete_album(&self, album: &Album) -> LibraryResult<()> {
        self.delete_entry(album)?;
        for song in &album.songs {
            self.remove_song(song)?;
        }
        Ok(())
    }

    pub fn delete_artist(&self, artist: &Artist) -> LibraryResult<()> {
        self.delete_entry(artist)
    }

    /// Removes the collection, then tries `remove_song` on each of its songs.
    pub fn delete_collection(&self, collection: &Collection) -> LibraryResult<()> {
        self.delete_entry(collection)?;
        for song in &collection.songs {
            self.remove_song(song)?;
        }
        Ok(())
    }

    pub fn delete_user_profile(&self, user_profile: &UserProfile) -> LibraryResult<()> {
        self.delete_entry(user_profile)
    }

    fn insert_or_ignore(&self, table: &str, row: &StorageRow) -> LibraryResult<usize> {
        if row.is_empty() {
            return Err(LibraryError::InvalidData(format!(
                "refusing to insert an empty row into `{table}`"
            )));
        }

        let columns = row
            .keys()
            .map(|column| format!("\"{column}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=row.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("INSERT OR IGNORE INTO {table} ({columns}) VALUES ({placeholders})");

        let changed = self
            .conn
            .prepare_cached(&sql)?
            .execute(params_from_iter(row.values().map(to_sql_value)))?;
        Ok(changed)
    }

    fn delete_entry<T: LibraryEntity>(&self, item: &T) -> LibraryResult<()> {
        let kind = T::KIND;
        let sql = format!("DELETE FROM {} WHERE {} = ?1", kind.table(), kind.id_column());
        let deleted = self.conn.execute(&sql, [item.natural_id()])?;
        debug!(
            "event=library_delete module=library status=ok kind={:?} item_id={} deleted={}",
            kind,
            item.natural_id(),
            deleted
        );
        Ok(())
    }

    fn entry<T: LibraryEntity>(&self, item: T, add_at: i64, changed: usize) -> LibraryItem<T> {
        let id = self.conn.last_insert_rowid();
        let status = if changed == 0 { "ignored" } else { "ok" };
        debug!(
            "event=library_add module=library status={status} kind={:?} item_id={} row_id={id}",
            T::KIND,
            item.natural_id()
        );
        LibraryItem { id, add_at, item }
    }
}

fn entry_meta(row: &StorageRow) -> LibraryResult<(i64, i64)> {
    let column = |name: &str| {
        row.get(name).and_then(|value| value.as_i64()).ok_or_else(|| {
            LibraryError::InvalidData(format!("library row without integer `{name}`"))
        })
    };
    Ok((column("id")?, column("addAt")?))
}

fn into_entry<T>(
    row: StorageRow,
    make: impl FnOnce(StorageRow) -> Result<T, MapError>,
) -> LibraryResult<LibraryItem<T>> {
    let (id, add_at) = entry_meta(&row)?;
    Ok(LibraryItem {
        id,
        add_at,
        item: make(row)?,
    })
}
