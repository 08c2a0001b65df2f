//! PostgreSQL-backed `PhotoRepository` implementation using Diesel ORM.
//!
//! Writes referencing a missing landmark surface as foreign key violations
//! and map to `RepositoryError::ForeignKey`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PhotoRepository, RepositoryError};
use crate::domain::{LandmarkId, Photo, PhotoDraft, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPhotoRow, PhotoRow, PhotoRowUpdate};
use super::pool::DbPool;
use super::schema::photos;

/// Diesel-backed implementation of the `PhotoRepository` port.
#[derive(Clone)]
pub struct DieselPhotoRepository {
    pool: DbPool,
}

impl DieselPhotoRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoRepository for DieselPhotoRepository {
    async fn insert(
        &self,
        owner: UserId,
        draft: &PhotoDraft,
    ) -> Result<Photo, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewPhotoRow {
            image_url: draft.image_url(),
            user_id: owner.value(),
            landmark_id: draft.landmark_id.value(),
        };

        let row: PhotoRow = diesel::insert_into(photos::table)
            .values(&new_row)
            .returning(PhotoRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Photo>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PhotoRow> = photos::table
            .order(photos::id.asc())
            .select(PhotoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Photo>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PhotoRow> = photos::table
            .find(id)
            .select(PhotoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_by_user(&self, user: UserId) -> Result<Vec<Photo>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PhotoRow> = photos::table
            .filter(photos::user_id.eq(user.value()))
            .order(photos::id.asc())
            .select(PhotoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_landmark(
        &self,
        landmark: LandmarkId,
    ) -> Result<Vec<Photo>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PhotoRow> = photos::table
            .filter(photos::landmark_id.eq(landmark.value()))
            .order(photos::id.asc())
            .select(PhotoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: i32,
        draft: &PhotoDraft,
    ) -> Result<Option<Photo>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = PhotoRowUpdate {
            image_url: draft.image_url(),
            landmark_id: draft.landmark_id.value(),
        };

        let row: Option<PhotoRow> = diesel::update(photos::table.find(id))
            .set(&changeset)
            .returning(PhotoRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(photos::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
