//! Diesel schema for card lifecycle persistence.

diesel::table! {
    /// Clarification card records.
    cards (id) {
        /// Card identifier.
        id -> Uuid,
        /// Short card title.
        #[max_length = 120]
        title -> Varchar,
        /// Problem statement; empty until clarified.
        problem -> Text,
        /// Success criteria; empty until clarified.
        success_criteria -> Text,
        /// Optional out-of-scope notes.
        out_of_scope -> Nullable<Text>,
        /// Optional stakeholder notes.
        stakeholders -> Nullable<Text>,
        /// Optional risk notes.
        risks -> Nullable<Text>,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Optimistic concurrency version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
        /// Soft-deletion timestamp; null while the card is visible.
        deleted_at -> Nullable<Timestamptz>,
    }
}
