use crate::{
    api::error,
    modules::catalog::{
        model::CatalogBatch,
        repository::CatalogRepository,
        schema::{AlbumEntity, ArtistEntity, TrackEntity},
    },
};

#[derive(Clone)]
pub struct CatalogRepositoryPg {
    pool: sqlx::PgPool,
}

impl CatalogRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogRepository for CatalogRepositoryPg {
    async fn upsert_batch(&self, batch: &CatalogBatch) -> Result<(), error::SystemError> {
        for artist in &batch.artists {
            sqlx::query(
                r#"
                INSERT INTO artists (id, name, image_url, genres)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE SET
                    name      = EXCLUDED.name,
                    image_url = COALESCE(EXCLUDED.image_url, artists.image_url),
                    genres    = CASE WHEN EXCLUDED.genres = '{}' THEN artists.genres
                                     ELSE EXCLUDED.genres END
                "#,
            )
            .bind(&artist.id)
            .bind(&artist.name)
            .bind(&artist.image_url)
            .bind(&artist.genres)
            .execute(&self.pool)
            .await?;
        }

        for album in &batch.albums {
            sqlx::query(
                r#"
                INSERT INTO albums (id, name, image_url, artist_id, release_date, total_tracks)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO UPDATE SET
                    name         = EXCLUDED.name,
                    image_url    = COALESCE(EXCLUDED.image_url, albums.image_url),
                    artist_id    = EXCLUDED.artist_id,
                    release_date = COALESCE(EXCLUDED.release_date, albums.release_date),
                    total_tracks = COALESCE(EXCLUDED.total_tracks, albums.total_tracks)
                "#,
            )
            .bind(&album.id)
            .bind(&album.name)
            .bind(&album.image_url)
            .bind(&album.artist_id)
            .bind(&album.release_date)
            .bind(album.total_tracks)
            .execute(&self.pool)
            .await?;
        }

        for track in &batch.tracks {
            sqlx::query(
                r#"
                INSERT INTO tracks (id, name, image_url, duration_ms, artist_id, album_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO UPDATE SET
                    name        = EXCLUDED.name,
                    image_url   = COALESCE(EXCLUDED.image_url, tracks.image_url),
                    duration_ms = COALESCE(EXCLUDED.duration_ms, tracks.duration_ms),
                    artist_id   = EXCLUDED.artist_id,
                    album_id    = COALESCE(EXCLUDED.album_id, tracks.album_id)
                "#,
            )
            .bind(&track.id)
            .bind(&track.name)
            .bind(&track.image_url)
            .bind(track.duration_ms)
            .bind(&track.artist_id)
            .bind(&track.album_id)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn find_artists(&self, ids: &[String]) -> Result<Vec<ArtistEntity>, error::SystemError> {
        let artists =
            sqlx::query_as::<_, ArtistEntity>("SELECT * FROM artists WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(artists)
    }

    async fn find_albums(&self, ids: &[String]) -> Result<Vec<AlbumEntity>, error::SystemError> {
        let albums = sqlx::query_as::<_, AlbumEntity>("SELECT * FROM albums WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(albums)
    }

    async fn find_tracks(&self, ids: &[String]) -> Result<Vec<TrackEntity>, error::SystemError> {
        let tracks = sqlx::query_as::<_, TrackEntity>("SELECT * FROM tracks WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(tracks)
    }
}
