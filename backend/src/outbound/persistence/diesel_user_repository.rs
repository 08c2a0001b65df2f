//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Cascade deletion of a user's landmarks, photos and ratings is delegated to
//! the `ON DELETE CASCADE` foreign keys declared in the migrations, so a
//! single `DELETE` statement is the whole commit/rollback unit.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, UserRepository};
use crate::domain::{NewUser, User, UserId, UserUpdate};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow, UserRowUpdate};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            username: &user.username,
            email: &user.email,
            password_hash: &user.password_hash,
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.value())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::username.eq(username))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn first_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn update(
        &self,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = UserRowUpdate {
            username: &update.username,
            email: &update.email,
        };

        let row: Option<UserRow> = diesel::update(users::table.find(id.value()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(id.value()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
