//! Diesel table definitions matching `migrations/`.

diesel::table! {
    /// Registered accounts. `email` carries a unique index.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Lower-cased login email (max 254 characters).
        email -> Varchar,
        /// Display name (max 64 characters).
        display_name -> Varchar,
        /// bcrypt hash string.
        password_hash -> Varchar,
        /// Inactive accounts are refused by the session gate.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}
