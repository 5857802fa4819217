use serde::{Deserialize, Serialize};

use crate::modules::catalog::schema::{AlbumEntity, ArtistEntity, TrackEntity};

/// A catalog entity as it arrives on the wire, discriminated by an explicit
/// `kind` tag rather than by sniffing which optional fields are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogItem {
    Artist {
        id: String,
        name: String,
        image_url: Option<String>,
        #[serde(default)]
        genres: Vec<String>,
    },
    Album {
        id: String,
        name: String,
        image_url: Option<String>,
        artist_id: String,
        artist_name: Option<String>,
        release_date: Option<String>,
        total_tracks: Option<i32>,
    },
    Track {
        id: String,
        name: String,
        image_url: Option<String>,
        duration_ms: Option<i32>,
        artist_id: String,
        artist_name: Option<String>,
        album_id: Option<String>,
    },
}

impl CatalogItem {
    pub fn id(&self) -> &str {
        match self {
            CatalogItem::Artist { id, .. }
            | CatalogItem::Album { id, .. }
            | CatalogItem::Track { id, .. } => id,
        }
    }
}

/// Entity rows implied by a batch of wire items, deduplicated by id.
/// Albums and tracks also contribute a stub row for their artist so the
/// display joins always resolve, mirroring how saves denormalize metadata.
#[derive(Debug, Default)]
pub struct CatalogBatch {
    pub artists: Vec<ArtistEntity>,
    pub albums: Vec<AlbumEntity>,
    pub tracks: Vec<TrackEntity>,
}

impl CatalogBatch {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a CatalogItem>) -> Self {
        let mut artists: Vec<ArtistEntity> = Vec::new();
        let mut albums: Vec<AlbumEntity> = Vec::new();
        let mut tracks: Vec<TrackEntity> = Vec::new();

        let push_artist = |artists: &mut Vec<ArtistEntity>, artist: ArtistEntity| {
            if !artists.iter().any(|a| a.id == artist.id) {
                artists.push(artist);
            }
        };

        for item in items {
            match item {
                CatalogItem::Artist { id, name, image_url, genres } => {
                    push_artist(
                        &mut artists,
                        ArtistEntity {
                            id: id.clone(),
                            name: name.clone(),
                            image_url: image_url.clone(),
                            genres: genres.clone(),
                        },
                    );
                }
                CatalogItem::Album {
                    id,
                    name,
                    image_url,
                    artist_id,
                    artist_name,
                    release_date,
                    total_tracks,
                } => {
                    if !albums.iter().any(|a| a.id == *id) {
                        albums.push(AlbumEntity {
                            id: id.clone(),
                            name: name.clone(),
                            image_url: image_url.clone(),
                            artist_id: artist_id.clone(),
                            release_date: release_date.clone(),
                            total_tracks: *total_tracks,
                        });
                    }
                    if let Some(artist_name) = artist_name {
                        push_artist(
                            &mut artists,
                            ArtistEntity {
                                id: artist_id.clone(),
                                name: artist_name.clone(),
                                image_url: None,
                                genres: Vec::new(),
                            },
                        );
                    }
                }
                CatalogItem::Track {
                    id,
                    name,
                    image_url,
                    duration_ms,
                    artist_id,
                    artist_name,
                    album_id,
                } => {
                    if !tracks.iter().any(|t| t.id == *id) {
                        tracks.push(TrackEntity {
                            id: id.clone(),
                            name: name.clone(),
                            image_url: image_url.clone(),
                            duration_ms: *duration_ms,
                            artist_id: artist_id.clone(),
                            album_id: album_id.clone(),
                        });
                    }
                    if let Some(artist_name) = artist_name {
                        push_artist(
                            &mut artists,
                            ArtistEntity {
                                id: artist_id.clone(),
                                name: artist_name.clone(),
                                image_url: None,
                                genres: Vec::new(),
                            },
                        );
                    }
                }
            }
        }

        CatalogBatch { artists, albums, tracks }
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.albums.is_empty() && self.tracks.is_empty()
    }
}

/// Resolved display metadata for one ranked item, keyed back by id.
#[derive(Debug, Clone, Serialize)]
pub struct ItemMeta {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
}
