use std::collections::HashSet;
use tunelib_core::{Audio, LibraryDatabase, LibraryQuery, Song};

fn audio(format: &str, kbps: u32) -> Audio {
    Audio {
        format: format.to_string(),
        kbps,
        size: Some(i64::from(kbps) * 1000),
        url: Some(format!("https://cdn.example/{format}/{kbps}")),
        path: None,
    }
}

fn song(id: &str, name: &str) -> Song {
    Song {
        song_id: id.to_string(),
        song_name: Some(name.to_string()),
        album_name: Some("Album".to_string()),
        artist_name: Some("Artist".to_string()),
        origin: Some("local".to_string()),
        genres: vec!["ambient".to_string()],
        duration: Some(180_000),
        audios: vec![audio("mp3", 128), audio("mp3", 320)],
        ..Song::default()
    }
}

fn count(db: &LibraryDatabase, sql: &str) -> i64 {
    db.connection()
        .query_row(sql, [], |row| row.get(0))
        .unwrap()
}

#[test]
fn adding_the_same_song_twice_keeps_one_row_per_table() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    let track = song("s1", "Intro");

    db.add_song(track.clone(), 1_000).unwrap();
    db.add_song(track.clone(), 2_000).unwrap();

    assert_eq!(count(&db, "SELECT COUNT(*) FROM song WHERE songId = 's1'"), 1);
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM library_song WHERE songId = 's1'"),
        1
    );
    assert_eq!(count(&db, "SELECT COUNT(*) FROM audio WHERE songId = 's1'"), 2);
    assert_eq!(
        count(&db, "SELECT addAt FROM library_song WHERE songId = 's1'"),
        1_000
    );
}

#[test]
fn first_writer_wins_for_shared_song_rows() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    db.store_song(&song("s1", "Original")).unwrap();
    db.store_song(&song("s1", "Renamed")).unwrap();

    let stored = db.songs(&["s1"]).unwrap();
    assert_eq!(stored[0].song_name.as_deref(), Some("Original"));
}

#[test]
fn store_song_then_audio_returns_every_variant() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    let mut track = song("s1", "Variants");
    track.audios = vec![
        audio("mp3", 128),
        audio("mp3", 320),
        Audio {
            path: Some("/music/s1.flac".to_string()),
            url: None,
            ..audio("flac", 1411)
        },
    ];

    db.store_song(&track).unwrap();

    assert_eq!(db.audio("s1").unwrap(), track.audios);
    assert!(db.audio("unknown").unwrap().is_empty());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM library_song"), 0);
}

#[test]
fn audio_inserts_are_idempotent() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    let variant = audio("aac", 256);
    let local = Audio {
        url: None,
        path: Some("/music/s1.aac".to_string()),
        ..audio("aac", 128)
    };

    for _ in 0..2 {
        db.store_audio(&variant, "s1").unwrap();
        db.store_audio(&local, "s1").unwrap();
    }

    assert_eq!(db.audio("s1").unwrap(), vec![variant, local]);
}

#[test]
fn same_bitrate_from_two_sources_keeps_both_variants() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    let mut track = song("s1", "Mirrored");
    track.audios = vec![
        Audio {
            url: Some("https://a.example/s1.mp3".to_string()),
            ..audio("mp3", 320)
        },
        Audio {
            url: Some("https://b.example/s1.mp3".to_string()),
            ..audio("mp3", 320)
        },
    ];

    db.store_song(&track).unwrap();
    db.store_song(&track).unwrap();

    assert_eq!(db.audio("s1").unwrap(), track.audios);
    assert_eq!(db.songs(&["s1"]).unwrap()[0].audios.len(), 2);
}

#[test]
fn library_songs_returns_full_songs_with_entry_metadata() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    let track = song("s1", "Complete");

    let added = db.add_song(track.clone(), 1_700_000_000_000).unwrap();
    let listed = db.library_songs(&LibraryQuery::first_page(10)).unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, added.id);
    assert_eq!(listed[0].add_at, 1_700_000_000_000);
    assert_eq!(listed[0].item, track);
    assert_eq!(added.item, track);
}

#[test]
fn ignored_insert_reports_the_last_successful_rowid() {
    let db = LibraryDatabase::open_in_memory().unwrap();

    let first = db.add_song(Song::new("a", "A"), 1).unwrap();
    let second = db.add_song(Song::new("b", "B"), 2).unwrap();
    let again = db.add_song(Song::new("a", "A"), 3).unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    // No row was inserted, so the id is the one from the previous insert.
    assert_eq!(again.id, second.id);
    assert_ne!(again.id, first.id);
    assert_eq!(again.add_at, 3);

    let listed = db.library_songs(&LibraryQuery::first_page(10)).unwrap();
    let stored_a = listed.iter().find(|entry| entry.item.song_id == "a").unwrap();
    assert_eq!(stored_a.id, 1);
    assert_eq!(stored_a.add_at, 1);
}

#[test]
fn keyset_pagination_walks_entries_newest_first() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    let mut ids = Vec::new();
    for index in 0..5 {
        let added = db
            .add_song(song(&format!("s{index}"), "Track"), 1_000 + index)
            .unwrap();
        ids.push(added.id);
    }
    let max_id = *ids.iter().max().unwrap();

    let all = db.library_songs(&LibraryQuery::new(max_id + 1, 5)).unwrap();
    let listed_ids = all.iter().map(|entry| entry.id).collect::<Vec<_>>();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(listed_ids, expected);
    assert_eq!(all[0].item.song_id, "s4");
    assert_eq!(all[0].add_at, 1_004);

    let smallest = *listed_ids.iter().min().unwrap();
    let after_last = db.library_songs(&LibraryQuery::new(smallest, 5)).unwrap();
    assert!(after_last.is_empty());
}

#[test]
fn next_page_cursor_covers_every_entry_once() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    for index in 0..5 {
        db.add_song(song(&format!("s{index}"), "Track"), index).unwrap();
    }

    let mut query = LibraryQuery::first_page(2);
    let mut seen = Vec::new();
    let mut pages = 0;
    loop {
        let page = db.library_songs(&query).unwrap();
        if page.is_empty() {
            break;
        }
        pages += 1;
        assert!(page.len() <= 2);
        seen.extend(page.iter().map(|entry| entry.item.song_id.clone()));
        query = query.next_page(&page).unwrap();
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, vec!["s4", "s3", "s2", "s1", "s0"]);
}

#[test]
fn keyword_matches_name_subtitle_album_artist_and_genres() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    let plain = |id: &str| Song {
        song_id: id.to_string(),
        song_name: Some("Plain".to_string()),
        ..Song::default()
    };

    db.add_song(
        Song {
            song_name: Some("foo bar".to_string()),
            ..plain("by_name")
        },
        1,
    )
    .unwrap();
    db.add_song(
        Song {
            sub_title: Some("(foo remix)".to_string()),
            ..plain("by_subtitle")
        },
        2,
    )
    .unwrap();
    db.add_song(
        Song {
            album_name: Some("Foods".to_string()),
            ..plain("by_album")
        },
        3,
    )
    .unwrap();
    db.add_song(
        Song {
            artist_name: Some("Kung Foo".to_string()),
            ..plain("by_artist")
        },
        4,
    )
    .unwrap();
    db.add_song(
        Song {
            genres: vec!["foo-core".to_string()],
            ..plain("by_genre")
        },
        5,
    )
    .unwrap();
    db.add_song(plain("unrelated"), 6).unwrap();

    let hits = db
        .library_songs(&LibraryQuery::first_page(20).with_keyword("foo"))
        .unwrap()
        .into_iter()
        .map(|entry| entry.item.song_id)
        .collect::<HashSet<_>>();

    let expected = ["by_name", "by_subtitle", "by_album", "by_artist", "by_genre"]
        .into_iter()
        .map(str::to_string)
        .collect::<HashSet<_>>();
    assert_eq!(hits, expected);

    let unfiltered = db
        .library_songs(&LibraryQuery::first_page(20).with_keyword(""))
        .unwrap();
    assert_eq!(unfiltered.len(), 6);
}

#[test]
fn keyword_filter_follows_sqlite_ascii_case_folding() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    db.add_song(Song::new("upper", "FOO FIGHTING"), 1).unwrap();

    let hits = db
        .library_songs(&LibraryQuery::first_page(5).with_keyword("foo"))
        .unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn songs_with_no_ids_returns_empty_list() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    db.store_song(&song("s1", "Present")).unwrap();

    let none: [&str; 0] = [];
    assert!(db.songs(&none).unwrap().is_empty());
}

#[test]
fn songs_follow_requested_order_and_skip_unknown_ids() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    db.store_song(&song("s1", "One")).unwrap();
    db.store_song(&song("s2", "Two")).unwrap();

    let found = db.songs(&["s2", "missing", "s1", "s2"]).unwrap();
    let ids = found.iter().map(|s| s.song_id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["s2", "s1"]);
    assert!(found.iter().all(|s| s.audios.len() == 2));
}

#[test]
fn songs_handles_batches_larger_than_one_statement() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    let ids = (0..1_200).map(|index| format!("s{index}")).collect::<Vec<_>>();
    for id in &ids {
        db.store_song(&Song::new(id.as_str(), "Bulk")).unwrap();
    }

    let found = db.songs(&ids).unwrap();
    assert_eq!(found.len(), ids.len());
    assert_eq!(found[0].song_id, "s0");
    assert_eq!(found[1_199].song_id, "s1199");
}

#[test]
fn delete_song_keeps_shared_row_until_remove_song() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    let track = song("s1", "Shared");

    db.add_song(track.clone(), 1).unwrap();
    assert!(db.exists(&track).unwrap());

    db.delete_song(&track).unwrap();
    assert!(!db.exists(&track).unwrap());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM song WHERE songId = 's1'"), 1);

    db.remove_song(&track).unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM song WHERE songId = 's1'"), 0);
    assert!(!db.exists(&track).unwrap());

    // Audio rows are append-only and survive song removal.
    assert_eq!(db.audio("s1").unwrap().len(), 2);
}

#[test]
fn remove_song_keeps_songs_still_in_library() {
    let db = LibraryDatabase::open_in_memory().unwrap();
    let track = song("s1", "Kept");
    db.add_song(track.clone(), 1).unwrap();

    db.remove_song(&track).unwrap();

    assert_eq!(db.songs(&["s1"]).unwrap().len(), 1);
    assert!(db.exists(&track).unwrap());
}
