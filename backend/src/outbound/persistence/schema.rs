//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the migrations exactly; regenerate with
//! `diesel print-schema` when a migration changes the shape.

diesel::table! {
    /// Registered accounts. Email is unique; username is not.
    users (id) {
        id -> Int4,
        #[max_length = 30]
        username -> Varchar,
        #[max_length = 100]
        email -> Varchar,
        #[max_length = 255]
        password_hash -> Varchar,
    }
}

diesel::table! {
    /// Landmarks owned by users.
    landmarks (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        description -> Text,
        #[max_length = 100]
        location -> Varchar,
        #[max_length = 50]
        country -> Varchar,
        #[max_length = 200]
        image_url -> Varchar,
        user_id -> Int4,
    }
}

diesel::table! {
    /// Photos attached to a landmark, owned by the uploading user.
    photos (id) {
        id -> Int4,
        #[max_length = 200]
        image_url -> Varchar,
        user_id -> Int4,
        landmark_id -> Int4,
    }
}

diesel::table! {
    /// Scores in [1, 5]; the range is enforced by a CHECK constraint.
    ratings (id) {
        id -> Int4,
        score -> Int4,
        user_id -> Int4,
        landmark_id -> Int4,
    }
}

diesel::joinable!(landmarks -> users (user_id));
diesel::joinable!(photos -> users (user_id));
diesel::joinable!(photos -> landmarks (landmark_id));
diesel::joinable!(ratings -> users (user_id));
diesel::joinable!(ratings -> landmarks (landmark_id));

diesel::allow_tables_to_appear_in_same_query!(users, landmarks, photos, ratings);
