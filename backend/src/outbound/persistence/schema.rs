//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! Regenerate with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users.
    users (id) {
        id -> Int4,
        email -> Text,
        /// At most 64 characters.
        firstname -> Varchar,
        /// At most 64 characters.
        lastname -> Varchar,
        age -> Int4,
        password_hash -> Varchar,
        verified -> Bool,
        verification_token -> Varchar,
    }
}

diesel::table! {
    associations (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    /// Roster join table; rows cascade with either side.
    association_members (association_id, user_id) {
        association_id -> Int4,
        user_id -> Int4,
    }
}

diesel::table! {
    /// Role rows keyed by (user, association), without foreign keys.
    roles (user_id, association_id) {
        user_id -> Int4,
        association_id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    minutes (id) {
        id -> Int4,
        association_id -> Int4,
        content -> Text,
        meeting_date -> Date,
    }
}

diesel::table! {
    minute_voters (minute_id, user_id) {
        minute_id -> Int4,
        user_id -> Int4,
    }
}

diesel::table! {
    events (id) {
        id -> Int4,
        name -> Text,
        starts_at -> Timestamptz,
        ends_at -> Timestamptz,
        association_id -> Int4,
    }
}

diesel::joinable!(association_members -> associations (association_id));
diesel::joinable!(association_members -> users (user_id));
diesel::joinable!(minute_voters -> minutes (minute_id));
diesel::joinable!(minute_voters -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    associations,
    association_members,
    roles,
    minutes,
    minute_voters,
    events,
);
