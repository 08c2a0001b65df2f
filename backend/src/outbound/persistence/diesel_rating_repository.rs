//! PostgreSQL-backed `RatingRepository` implementation using Diesel ORM.
//!
//! The score range is validated by the domain before a draft reaches this
//! adapter; the table's CHECK constraint is the final backstop. Rows read
//! back re-validate through [`crate::domain::Score`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RatingRepository, RepositoryError};
use crate::domain::{LandmarkId, Rating, RatingDraft, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewRatingRow, RatingRow, RatingRowUpdate};
use super::pool::DbPool;
use super::schema::ratings;

/// Diesel-backed implementation of the `RatingRepository` port.
#[derive(Clone)]
pub struct DieselRatingRepository {
    pool: DbPool,
}

impl DieselRatingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_domain(row: RatingRow) -> Result<Rating, RepositoryError> {
    row.into_domain()
        .map_err(|err| RepositoryError::query(format!("corrupt rating row: {err}")))
}

fn rows_into_domain(rows: Vec<RatingRow>) -> Result<Vec<Rating>, RepositoryError> {
    rows.into_iter().map(into_domain).collect()
}

#[async_trait]
impl RatingRepository for DieselRatingRepository {
    async fn insert(
        &self,
        owner: UserId,
        draft: &RatingDraft,
    ) -> Result<Rating, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewRatingRow {
            score: draft.score.value(),
            user_id: owner.value(),
            landmark_id: draft.landmark_id.value(),
        };

        let row: RatingRow = diesel::insert_into(ratings::table)
            .values(&new_row)
            .returning(RatingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_domain(row)
    }

    async fn list(&self) -> Result<Vec<Rating>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RatingRow> = ratings::table
            .order(ratings::id.asc())
            .select(RatingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_into_domain(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Rating>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RatingRow> = ratings::table
            .find(id)
            .select(RatingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(into_domain).transpose()
    }

    async fn list_by_user(&self, user: UserId) -> Result<Vec<Rating>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RatingRow> = ratings::table
            .filter(ratings::user_id.eq(user.value()))
            .order(ratings::id.asc())
            .select(RatingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_into_domain(rows)
    }

    async fn list_by_landmark(
        &self,
        landmark: LandmarkId,
    ) -> Result<Vec<Rating>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RatingRow> = ratings::table
            .filter(ratings::landmark_id.eq(landmark.value()))
            .order(ratings::id.asc())
            .select(RatingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_into_domain(rows)
    }

    async fn update(
        &self,
        id: i32,
        draft: &RatingDraft,
    ) -> Result<Option<Rating>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = RatingRowUpdate {
            score: draft.score.value(),
            landmark_id: draft.landmark_id.value(),
        };

        let row: Option<RatingRow> = diesel::update(ratings::table.find(id))
            .set(&changeset)
            .returning(RatingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(into_domain).transpose()
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(ratings::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
