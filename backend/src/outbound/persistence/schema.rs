//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation. Regenerate with
//! `diesel print-schema` when migrations change.

diesel::table! {
    /// Installation businesses using the system.
    teams (id) {
        id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership rows linking users to teams with a role.
    team_members (team_id, user_id) {
        team_id -> Uuid,
        user_id -> Uuid,
        /// One of `admin`, `member`, `installer`, `viewer`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sub-tenants within a team; leads and prices hang off these.
    installer_groups (id) {
        id -> Uuid,
        team_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sales leads moving through the pipeline.
    leads (id) {
        id -> Uuid,
        team_id -> Uuid,
        installer_group_id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        phone -> Varchar,
        address -> Varchar,
        /// Pipeline stage code; see the domain's stage table.
        status -> Int2,
        /// `manual` or `import`.
        source -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Follow-up tasks attached to leads.
    lead_tasks (id) {
        id -> Uuid,
        lead_id -> Uuid,
        title -> Varchar,
        due_at -> Nullable<Timestamptz>,
        done -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Free-form notes attached to leads.
    lead_notes (id) {
        id -> Uuid,
        lead_id -> Uuid,
        author_user_id -> Uuid,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Installation estimates, one per lead.
    estimates (lead_id) {
        lead_id -> Uuid,
        panel_count -> Int4,
        roof_type -> Varchar,
        annual_consumption_kwh -> Float8,
        system_size_kw -> Float8,
        quoted_total -> Float8,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Configured cost rows, keyed by (group, category, name).
    price_items (installer_group_id, category, name) {
        installer_group_id -> Uuid,
        category -> Varchar,
        name -> Varchar,
        cost -> Float8,
        markup_percent -> Float8,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cached OAuth credentials for each user's mailbox.
    email_accounts (user_id) {
        user_id -> Uuid,
        address -> Varchar,
        access_token -> Text,
        refresh_token -> Text,
        expires_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Local archive of messages sent through the mail gateway.
    email_messages (id) {
        id -> Uuid,
        lead_id -> Uuid,
        graph_message_id -> Varchar,
        internet_message_id -> Varchar,
        subject -> Varchar,
        sent_at -> Timestamptz,
    }
}

diesel::table! {
    /// Each user's current workspace, one row per user.
    workspace_selections (user_id) {
        user_id -> Uuid,
        team_id -> Uuid,
        installer_group_id -> Nullable<Uuid>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued bearer tokens. A token authenticates until revoked.
    api_tokens (token) {
        token -> Varchar,
        user_id -> Uuid,
        created_at -> Timestamptz,
        revoked_at -> Nullable<Timestamptz>,
    }
}
