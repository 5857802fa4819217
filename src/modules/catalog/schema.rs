use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArtistEntity {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AlbumEntity {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub artist_id: String,
    pub release_date: Option<String>,
    pub total_tracks: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrackEntity {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub duration_ms: Option<i32>,
    pub artist_id: String,
    pub album_id: Option<String>,
}
