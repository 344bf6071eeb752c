//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Analytics aggregates
//! are written as raw SQL and do not depend on this file; the attendance and
//! admin adapters use the typed DSL.

diesel::table! {
    /// Enrolled students. Rows are soft-deleted via `deleted_at`.
    students (id) {
        id -> Int8,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        matric_number -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Teaching staff. Rows are soft-deleted via `deleted_at`.
    lecturers (id) {
        id -> Int8,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        staff_id -> Varchar,
        department -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Administrators.
    admins (id) {
        id -> Int8,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        department -> Varchar,
        is_super_admin -> Bool,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Class sessions. `qr_code_token` is unique and never rewritten.
    events (id) {
        id -> Int8,
        course_code -> Varchar,
        course_name -> Varchar,
        department -> Varchar,
        venue -> Varchar,
        start_time -> Timestamptz,
        end_time -> Timestamptz,
        lecturer_id -> Nullable<Int8>,
        qr_code_token -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Check-ins. At most one row per `(event_id, student_id)`.
    user_attendances (id) {
        id -> Int8,
        event_id -> Int8,
        student_id -> Int8,
        status -> Varchar,
        marked_time -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only record of administrative mutations.
    audit_logs (id) {
        id -> Int8,
        timestamp -> Timestamptz,
        user_type -> Varchar,
        user_id -> Int8,
        user_email -> Varchar,
        action -> Varchar,
        resource_type -> Varchar,
        resource_id -> Varchar,
        details -> Jsonb,
        ip_address -> Nullable<Varchar>,
        user_agent -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(events -> lecturers (lecturer_id));
diesel::joinable!(user_attendances -> events (event_id));
diesel::joinable!(user_attendances -> students (student_id));

diesel::allow_tables_to_appear_in_same_query!(
    admins,
    audit_logs,
    events,
    lecturers,
    students,
    user_attendances,
);
