use crate::api::error;
use crate::modules::catalog::model::CatalogBatch;
use crate::modules::catalog::schema::{AlbumEntity, ArtistEntity, TrackEntity};

/// Local join targets for catalog metadata. Rows are never authoritative and
/// never invalidated; staleness is resolved only by the next upsert.
#[async_trait::async_trait]
pub trait CatalogRepository {
    async fn upsert_batch(&self, batch: &CatalogBatch) -> Result<(), error::SystemError>;

    async fn find_artists(&self, ids: &[String]) -> Result<Vec<ArtistEntity>, error::SystemError>;

    async fn find_albums(&self, ids: &[String]) -> Result<Vec<AlbumEntity>, error::SystemError>;

    async fn find_tracks(&self, ids: &[String]) -> Result<Vec<TrackEntity>, error::SystemError>;
}
