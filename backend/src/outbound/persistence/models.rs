//! Internal Diesel row structs.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Conversions into domain aggregates live next to each struct.

use diesel::prelude::*;

use crate::domain::{Landmark, LandmarkId, Photo, Rating, Score, User, UserId};

use super::schema::{landmarks, photos, ratings, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Changeset for replacing profile fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserRowUpdate<'a> {
    pub username: &'a str,
    pub email: &'a str,
}

/// Row struct for reading from the landmarks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = landmarks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LandmarkRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub image_url: String,
    pub user_id: i32,
}

impl From<LandmarkRow> for Landmark {
    fn from(row: LandmarkRow) -> Self {
        Self {
            id: LandmarkId::new(row.id),
            name: row.name,
            description: row.description,
            location: row.location,
            country: row.country,
            image_url: row.image_url,
            user_id: UserId::new(row.user_id),
        }
    }
}

/// Insertable struct for creating new landmarks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = landmarks)]
pub(crate) struct NewLandmarkRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub country: &'a str,
    pub image_url: &'a str,
    pub user_id: i32,
}

/// Changeset for replacing landmark fields; the owner column is untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = landmarks)]
pub(crate) struct LandmarkRowUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub country: &'a str,
    pub image_url: &'a str,
}

/// Row struct for reading from the photos table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PhotoRow {
    pub id: i32,
    pub image_url: String,
    pub user_id: i32,
    pub landmark_id: i32,
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Self {
            id: row.id,
            image_url: row.image_url,
            user_id: UserId::new(row.user_id),
            landmark_id: LandmarkId::new(row.landmark_id),
        }
    }
}

/// Insertable struct for creating new photos.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = photos)]
pub(crate) struct NewPhotoRow<'a> {
    pub image_url: &'a str,
    pub user_id: i32,
    pub landmark_id: i32,
}

/// Changeset for replacing photo fields; the owner column is untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = photos)]
pub(crate) struct PhotoRowUpdate<'a> {
    pub image_url: &'a str,
    pub landmark_id: i32,
}

/// Row struct for reading from the ratings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RatingRow {
    pub id: i32,
    pub score: i32,
    pub user_id: i32,
    pub landmark_id: i32,
}

impl RatingRow {
    /// Convert to the domain aggregate, re-validating the CHECK-constrained
    /// score so a corrupted row surfaces as an error instead of a panic.
    pub(crate) fn into_domain(self) -> Result<Rating, crate::domain::RatingValidationError> {
        Ok(Rating {
            id: self.id,
            score: Score::new(self.score)?,
            user_id: UserId::new(self.user_id),
            landmark_id: LandmarkId::new(self.landmark_id),
        })
    }
}

/// Insertable struct for creating new ratings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ratings)]
pub(crate) struct NewRatingRow {
    pub score: i32,
    pub user_id: i32,
    pub landmark_id: i32,
}

/// Changeset for replacing rating fields; the owner column is untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = ratings)]
pub(crate) struct RatingRowUpdate {
    pub score: i32,
    pub landmark_id: i32,
}
