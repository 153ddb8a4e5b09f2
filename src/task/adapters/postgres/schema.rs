//! Diesel schema for task persistence.

diesel::table! {
    /// Action items saved from meeting minutes.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Uuid,
        /// Owning user identifier.
        owner_id -> Text,
        /// Task description.
        description -> Text,
        /// Free-form assignee name.
        assignee -> Text,
        /// Deadline as phrased in the source text.
        deadline -> Text,
        /// Priority tier (`P1`, `P2` or `P3`).
        #[max_length = 2]
        priority -> Varchar,
        /// Completion flag.
        completed -> Bool,
        /// Store-assigned creation timestamp.
        created_at -> Timestamptz,
        /// Insertion sequence used to order records created in the same instant.
        sequence -> Int8,
    }
}
