//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `migrations/` exactly; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Registered accounts. `username` and `email` carry unique constraints.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Text,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only mood samples.
    mood_entries (id) {
        id -> Uuid,
        user_id -> Uuid,
        mood -> Int4,
        /// Client-supplied date string, stored verbatim.
        date -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Challenge attempts; `status` is `started` or `completed`.
    challenge_instances (id) {
        id -> Uuid,
        user_id -> Uuid,
        challenge_id -> Int4,
        status -> Text,
        started_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Points awarded per completion.
    progress_records (id) {
        id -> Uuid,
        user_id -> Uuid,
        challenge_id -> Int4,
        completed_at -> Timestamptz,
        points -> Int4,
    }
}

diesel::joinable!(mood_entries -> users (user_id));
diesel::joinable!(challenge_instances -> users (user_id));
diesel::joinable!(progress_records -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    mood_entries,
    challenge_instances,
    progress_records,
);
