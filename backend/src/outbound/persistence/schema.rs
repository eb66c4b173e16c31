//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. Regenerate with `diesel print-schema` after changing them.

diesel::table! {
    /// User accounts shared by every role.
    users (id) {
        id -> Int8,
        /// Unique login handle (max 150 characters).
        username -> Varchar,
        /// Unique contact address (max 254 characters).
        email -> Varchar,
        /// PHC-formatted credential hash.
        password_hash -> Text,
        /// Role tag: `ADMIN`, `STUDENT` or `TEACHER`.
        role -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One profile per student user.
    student_profiles (id) {
        id -> Int8,
        /// Unique back-reference to `users.id`.
        user_id -> Int8,
        /// Unique student number; defaults from `student_identifier_seq`.
        student_id -> Int4,
        programme -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// One profile per teacher user.
    teacher_profiles (id) {
        id -> Int8,
        /// Unique back-reference to `users.id`.
        user_id -> Int8,
        /// Unique staff number; defaults from `teacher_identifier_seq`.
        teacher_id -> Int4,
        department -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Code snippets; removed with their owner.
    snippets (id) {
        id -> Int8,
        created_at -> Timestamptz,
        /// At most 100 characters.
        title -> Varchar,
        code -> Text,
        lineos -> Bool,
        /// `python` or `javascript`.
        language -> Varchar,
        /// `friendly` or `monokai`.
        style -> Varchar,
        owner_id -> Int8,
    }
}

diesel::joinable!(student_profiles -> users (user_id));
diesel::joinable!(teacher_profiles -> users (user_id));
diesel::joinable!(snippets -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    student_profiles,
    teacher_profiles,
    snippets
);
