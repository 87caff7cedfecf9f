//! User profile record.
//!
//! # Invariants
//! - Only scalar profile attributes are persisted; social and ownership
//!   lists are dropped before storage and read back empty.

use super::album::Album;
use super::artist::Artist;
use super::collection::Collection;
use super::song::Song;
use super::{ItemKind, LibraryEntity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub user_id: String,
    pub user_name: Option<String>,
    pub origin: Option<String>,
    pub avatar_url: Option<String>,
    pub description: Option<String>,
    pub follower_count: Option<i64>,
    pub following_count: Option<i64>,
    pub songs: Vec<Song>,
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub favorite_collections: Vec<Collection>,
    pub created_collections: Vec<Collection>,
    pub followings: Vec<UserProfile>,
    pub followers: Vec<UserProfile>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: Some(user_name.into()),
            ..Self::default()
        }
    }
}

impl LibraryEntity for UserProfile {
    const KIND: ItemKind = ItemKind::UserProfile;

    fn natural_id(&self) -> &str {
        &self.user_id
    }
}
