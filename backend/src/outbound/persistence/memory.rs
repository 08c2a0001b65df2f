//! In-memory repository adapter.
//!
//! One shared store implements all four repository ports so cross-entity
//! invariants hold without a database: foreign keys are checked on write and
//! deletes cascade exactly like the PostgreSQL schema. Used by the server
//! when no `DATABASE_URL` is configured and by the integration tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    LandmarkRepository, PhotoRepository, RatingRepository, RepositoryError, UserRepository,
};
use crate::domain::{
    Landmark, LandmarkDraft, LandmarkId, NewUser, Photo, PhotoDraft, Rating, RatingDraft,
    User, UserId, UserUpdate,
};

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i32, User>,
    landmarks: BTreeMap<i32, Landmark>,
    photos: BTreeMap<i32, Photo>,
    ratings: BTreeMap<i32, Rating>,
    next_id: i32,
}

impl Inner {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn landmark_exists(&self, id: LandmarkId) -> Result<(), RepositoryError> {
        if self.landmarks.contains_key(&id.value()) {
            Ok(())
        } else {
            Err(RepositoryError::foreign_key("landmark does not exist"))
        }
    }

    fn drop_landmark_children(&mut self, landmark: LandmarkId) {
        self.photos.retain(|_, p| p.landmark_id != landmark);
        self.ratings.retain(|_, r| r.landmark_id != landmark);
    }
}

/// Shared in-memory store implementing every repository port.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means another request panicked mid-write;
        // the map itself is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut inner = self.lock();
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::conflict("email is already taken"));
        }
        let id = inner.next_id();
        let user = User {
            id: UserId::new(id),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().users.get(&id.value()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .filter(|u| u.username == username)
            .cloned()
            .collect())
    }

    async fn first_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update(
        &self,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let mut inner = self.lock();
        if inner
            .users
            .values()
            .any(|u| u.id != id && u.email == update.email)
        {
            return Err(RepositoryError::conflict("email is already taken"));
        }
        let Some(user) = inner.users.get_mut(&id.value()) else {
            return Ok(None);
        };
        user.username = update.username.clone();
        user.email = update.email.clone();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let mut inner = self.lock();
        if inner.users.remove(&id.value()).is_none() {
            return Ok(false);
        }
        // Mirror ON DELETE CASCADE: landmarks first, then anything owned by
        // the user or attached to a removed landmark.
        let owned: Vec<LandmarkId> = inner
            .landmarks
            .values()
            .filter(|l| l.user_id == id)
            .map(|l| l.id)
            .collect();
        inner.landmarks.retain(|_, l| l.user_id != id);
        for landmark in owned {
            inner.drop_landmark_children(landmark);
        }
        inner.photos.retain(|_, p| p.user_id != id);
        inner.ratings.retain(|_, r| r.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl LandmarkRepository for MemoryStore {
    async fn insert(
        &self,
        owner: UserId,
        draft: &LandmarkDraft,
    ) -> Result<Landmark, RepositoryError> {
        let mut inner = self.lock();
        if !inner.users.contains_key(&owner.value()) {
            return Err(RepositoryError::foreign_key("user does not exist"));
        }
        let id = inner.next_id();
        let landmark = Landmark {
            id: LandmarkId::new(id),
            name: draft.name().to_owned(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            country: draft.country.clone(),
            image_url: draft.image_url.clone(),
            user_id: owner,
        };
        inner.landmarks.insert(id, landmark.clone());
        Ok(landmark)
    }

    async fn list(&self) -> Result<Vec<Landmark>, RepositoryError> {
        Ok(self.lock().landmarks.values().cloned().collect())
    }

    async fn find_by_id(&self, id: LandmarkId) -> Result<Option<Landmark>, RepositoryError> {
        Ok(self.lock().landmarks.get(&id.value()).cloned())
    }

    async fn list_by_user(&self, user: UserId) -> Result<Vec<Landmark>, RepositoryError> {
        Ok(self
            .lock()
            .landmarks
            .values()
            .filter(|l| l.user_id == user)
            .cloned()
            .collect())
    }

    async fn list_by_country(
        &self,
        country: &str,
    ) -> Result<Vec<Landmark>, RepositoryError> {
        Ok(self
            .lock()
            .landmarks
            .values()
            .filter(|l| l.country == country)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: LandmarkId,
        draft: &LandmarkDraft,
    ) -> Result<Option<Landmark>, RepositoryError> {
        let mut inner = self.lock();
        let Some(landmark) = inner.landmarks.get_mut(&id.value()) else {
            return Ok(None);
        };
        landmark.name = draft.name().to_owned();
        landmark.description = draft.description.clone();
        landmark.location = draft.location.clone();
        landmark.country = draft.country.clone();
        landmark.image_url = draft.image_url.clone();
        Ok(Some(landmark.clone()))
    }

    async fn delete(&self, id: LandmarkId) -> Result<bool, RepositoryError> {
        let mut inner = self.lock();
        if inner.landmarks.remove(&id.value()).is_none() {
            return Ok(false);
        }
        inner.drop_landmark_children(id);
        Ok(true)
    }
}

#[async_trait]
impl PhotoRepository for MemoryStore {
    async fn insert(
        &self,
        owner: UserId,
        draft: &PhotoDraft,
    ) -> Result<Photo, RepositoryError> {
        let mut inner = self.lock();
        inner.landmark_exists(draft.landmark_id)?;
        let id = inner.next_id();
        let photo = Photo {
            id,
            image_url: draft.image_url().to_owned(),
            user_id: owner,
            landmark_id: draft.landmark_id,
        };
        inner.photos.insert(id, photo.clone());
        Ok(photo)
    }

    async fn list(&self) -> Result<Vec<Photo>, RepositoryError> {
        Ok(self.lock().photos.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Photo>, RepositoryError> {
        Ok(self.lock().photos.get(&id).cloned())
    }

    async fn list_by_user(&self, user: UserId) -> Result<Vec<Photo>, RepositoryError> {
        Ok(self
            .lock()
            .photos
            .values()
            .filter(|p| p.user_id == user)
            .cloned()
            .collect())
    }

    async fn list_by_landmark(
        &self,
        landmark: LandmarkId,
    ) -> Result<Vec<Photo>, RepositoryError> {
        Ok(self
            .lock()
            .photos
            .values()
            .filter(|p| p.landmark_id == landmark)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: i32,
        draft: &PhotoDraft,
    ) -> Result<Option<Photo>, RepositoryError> {
        let mut inner = self.lock();
        if !inner.photos.contains_key(&id) {
            return Ok(None);
        }
        inner.landmark_exists(draft.landmark_id)?;
        let Some(photo) = inner.photos.get_mut(&id) else {
            return Ok(None);
        };
        photo.image_url = draft.image_url().to_owned();
        photo.landmark_id = draft.landmark_id;
        Ok(Some(photo.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        Ok(self.lock().photos.remove(&id).is_some())
    }
}

#[async_trait]
impl RatingRepository for MemoryStore {
    async fn insert(
        &self,
        owner: UserId,
        draft: &RatingDraft,
    ) -> Result<Rating, RepositoryError> {
        let mut inner = self.lock();
        inner.landmark_exists(draft.landmark_id)?;
        let id = inner.next_id();
        let rating = Rating {
            id,
            score: draft.score,
            user_id: owner,
            landmark_id: draft.landmark_id,
        };
        inner.ratings.insert(id, rating.clone());
        Ok(rating)
    }

    async fn list(&self) -> Result<Vec<Rating>, RepositoryError> {
        Ok(self.lock().ratings.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Rating>, RepositoryError> {
        Ok(self.lock().ratings.get(&id).cloned())
    }

    async fn list_by_user(&self, user: UserId) -> Result<Vec<Rating>, RepositoryError> {
        Ok(self
            .lock()
            .ratings
            .values()
            .filter(|r| r.user_id == user)
            .cloned()
            .collect())
    }

    async fn list_by_landmark(
        &self,
        landmark: LandmarkId,
    ) -> Result<Vec<Rating>, RepositoryError> {
        Ok(self
            .lock()
            .ratings
            .values()
            .filter(|r| r.landmark_id == landmark)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: i32,
        draft: &RatingDraft,
    ) -> Result<Option<Rating>, RepositoryError> {
        let mut inner = self.lock();
        if !inner.ratings.contains_key(&id) {
            return Ok(None);
        }
        inner.landmark_exists(draft.landmark_id)?;
        let Some(rating) = inner.ratings.get_mut(&id) else {
            return Ok(None);
        };
        rating.score = draft.score;
        rating.landmark_id = draft.landmark_id;
        Ok(Some(rating.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        Ok(self.lock().ratings.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Score;
    use std::sync::Arc;

    async fn seeded_user(store: &MemoryStore, name: &str) -> User {
        UserRepository::insert(
            store,
            &NewUser {
                username: name.to_owned(),
                email: format!("{name}@example.com"),
                password_hash: "phc".to_owned(),
            },
        )
        .await
        .expect("user inserts")
    }

    async fn seeded_landmark(store: &MemoryStore, owner: UserId) -> Landmark {
        let draft =
            LandmarkDraft::new("Eiffel Tower", "iron", "Paris", "France", "url").expect("draft");
        LandmarkRepository::insert(store, owner, &draft)
            .await
            .expect("landmark inserts")
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        seeded_user(&store, "alice").await;
        let err = UserRepository::insert(
            &store,
            &NewUser {
                username: "other".to_owned(),
                email: "alice@example.com".to_owned(),
                password_hash: "phc".to_owned(),
            },
        )
        .await
        .expect_err("duplicate email must conflict");
        assert!(matches!(err, RepositoryError::Conflict { .. }));
    }

    #[tokio::test]
    async fn photo_requires_existing_landmark() {
        let store = MemoryStore::new();
        let alice = seeded_user(&store, "alice").await;
        let draft = PhotoDraft::new("url", LandmarkId::new(999)).expect("draft");
        let err = PhotoRepository::insert(&store, alice.id, &draft)
            .await
            .expect_err("missing landmark must fail");
        assert!(matches!(err, RepositoryError::ForeignKey { .. }));
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_everything_owned() {
        let store = Arc::new(MemoryStore::new());
        let alice = seeded_user(&store, "alice").await;
        let bob = seeded_user(&store, "bob").await;
        let landmark = seeded_landmark(&store, alice.id).await;

        let photo_draft = PhotoDraft::new("url", landmark.id).expect("draft");
        PhotoRepository::insert(store.as_ref(), alice.id, &photo_draft)
            .await
            .expect("photo inserts");
        // Bob's rating hangs off Alice's landmark, so it goes too.
        let rating_draft = RatingDraft {
            score: Score::new(5).expect("in range"),
            landmark_id: landmark.id,
        };
        RatingRepository::insert(store.as_ref(), bob.id, &rating_draft)
            .await
            .expect("rating inserts");

        assert!(UserRepository::delete(store.as_ref(), alice.id)
            .await
            .expect("delete succeeds"));

        assert!(LandmarkRepository::list(store.as_ref())
            .await
            .expect("list")
            .is_empty());
        assert!(PhotoRepository::list(store.as_ref())
            .await
            .expect("list")
            .is_empty());
        assert!(RatingRepository::list(store.as_ref())
            .await
            .expect("list")
            .is_empty());
        // Bob himself survives.
        assert!(UserRepository::find_by_id(store.as_ref(), bob.id)
            .await
            .expect("find")
            .is_some());
    }

    #[tokio::test]
    async fn deleting_a_landmark_cascades_to_children_only() {
        let store = MemoryStore::new();
        let alice = seeded_user(&store, "alice").await;
        let landmark = seeded_landmark(&store, alice.id).await;
        let keeper = seeded_landmark(&store, alice.id).await;

        let draft = PhotoDraft::new("url", landmark.id).expect("draft");
        PhotoRepository::insert(&store, alice.id, &draft)
            .await
            .expect("photo inserts");
        let kept_draft = PhotoDraft::new("url2", keeper.id).expect("draft");
        let kept = PhotoRepository::insert(&store, alice.id, &kept_draft)
            .await
            .expect("photo inserts");

        assert!(LandmarkRepository::delete(&store, landmark.id)
            .await
            .expect("delete succeeds"));

        let photos = PhotoRepository::list(&store).await.expect("list");
        assert_eq!(photos, vec![kept]);
    }

    #[tokio::test]
    async fn update_missing_rows_return_none() {
        let store = MemoryStore::new();
        seeded_user(&store, "alice").await;
        let draft =
            LandmarkDraft::new("name", "d", "l", "c", "u").expect("draft");
        let updated = LandmarkRepository::update(&store, LandmarkId::new(42), &draft)
            .await
            .expect("update runs");
        assert!(updated.is_none());
    }
}
