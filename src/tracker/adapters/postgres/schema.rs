//! Diesel schema for issue and todo persistence.

diesel::table! {
    /// Issue records.
    issues (id) {
        /// Issue identifier.
        id -> Uuid,
        /// Issue title.
        #[max_length = 200]
        title -> Varchar,
        /// Optional long-form description.
        description -> Nullable<Text>,
        /// Priority wire value.
        #[max_length = 20]
        priority -> Varchar,
        /// Planning horizon wire value.
        #[max_length = 20]
        issue_type -> Varchar,
        /// Lifecycle status wire value.
        #[max_length = 20]
        status -> Varchar,
        /// Creator attribution.
        created_by -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// First resolution timestamp.
        resolved_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Todo records. `originating_issue` is a plain reference; deleting an
    /// issue removes its todos through the service, not a foreign key.
    todos (id) {
        /// Todo identifier.
        id -> Uuid,
        /// Todo title.
        #[max_length = 200]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Assignee.
        assigned_to -> Text,
        /// Assigner.
        assigned_by -> Text,
        /// Due date.
        due_date -> Timestamptz,
        /// Status wire value as last written.
        #[max_length = 20]
        status -> Varchar,
        /// Referenced issue identifier.
        originating_issue -> Uuid,
        /// First completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
