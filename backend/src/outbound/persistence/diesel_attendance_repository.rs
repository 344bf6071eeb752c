//! PostgreSQL-backed `AttendanceRepository` implementation using Diesel ORM.
//!
//! Sessions and check-ins go through the typed DSL. The two unique
//! constraints on the write path are translated into their dedicated port
//! errors so the service can answer with a conflict instead of a 500.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AttendanceRepository, AttendanceRepositoryError};
use crate::domain::{
    AttendanceRecord, AttendanceStatus, Event, HistoryEntry, NewAttendance, NewEvent, RosterEntry,
    SessionToken, StudentProfile,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, violated_unique_constraint,
};
use super::models::{
    AttendanceRow, EventRow, NewAttendanceRow, NewEventRow, RowConversionError, StudentRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{events, students, user_attendances};

const ATTENDANCE_PAIR_CONSTRAINT: &str = "user_attendances_event_student_key";
const EVENT_TOKEN_CONSTRAINT: &str = "events_qr_code_token_key";

/// Diesel-backed implementation of the attendance repository port.
#[derive(Clone)]
pub struct DieselAttendanceRepository {
    pool: DbPool,
}

impl DieselAttendanceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AttendanceRepositoryError {
    map_basic_pool_error(error, AttendanceRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AttendanceRepositoryError {
    match violated_unique_constraint(&error) {
        Some(ATTENDANCE_PAIR_CONSTRAINT) => AttendanceRepositoryError::already_recorded(),
        Some(EVENT_TOKEN_CONSTRAINT) => AttendanceRepositoryError::duplicate_token(),
        _ => map_basic_diesel_error(
            error,
            AttendanceRepositoryError::query,
            AttendanceRepositoryError::connection,
        ),
    }
}

fn map_row_error(error: RowConversionError) -> AttendanceRepositoryError {
    AttendanceRepositoryError::query(error.to_string())
}

fn parse_status(raw: &str) -> Result<AttendanceStatus, AttendanceRepositoryError> {
    raw.parse::<AttendanceStatus>()
        .map_err(|err| AttendanceRepositoryError::query(err.to_string()))
}

type RosterRow = (AttendanceRow, Option<(String, String, String)>);
type HistoryRow = (AttendanceRow, (String, String, String));

fn roster_entry(row: RosterRow) -> Result<RosterEntry, AttendanceRepositoryError> {
    let (attendance, student) = row;
    let (student_name, matric_number) = student
        .map(|(first, last, matric)| (format!("{first} {last}"), matric))
        .unwrap_or_default();
    Ok(RosterEntry {
        id: attendance.id,
        student_id: attendance.student_id,
        student_name,
        matric_number,
        status: parse_status(&attendance.status)?,
        marked_time: attendance.marked_time,
    })
}

fn history_entry(row: HistoryRow) -> Result<HistoryEntry, AttendanceRepositoryError> {
    let (attendance, (course_code, course_name, venue)) = row;
    Ok(HistoryEntry {
        id: attendance.id,
        event_id: attendance.event_id,
        course_code,
        course_name,
        venue,
        status: parse_status(&attendance.status)?,
        marked_time: attendance.marked_time,
    })
}

#[async_trait]
impl AttendanceRepository for DieselAttendanceRepository {
    async fn create_event(&self, event: &NewEvent) -> Result<Event, AttendanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let draft = &event.draft;
        let new_row = NewEventRow {
            course_code: draft.course_code(),
            course_name: draft.course_name(),
            department: draft.department(),
            venue: draft.venue(),
            start_time: draft.start_time(),
            end_time: draft.end_time(),
            lecturer_id: Some(event.lecturer_id),
            qr_code_token: event.token.as_str(),
            created_at: event.created_at,
            updated_at: event.created_at,
        };

        let row: EventRow = diesel::insert_into(events::table)
            .values(&new_row)
            .returning(EventRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Event::try_from(row).map_err(map_row_error)
    }

    async fn find_event_by_token(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Event>, AttendanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EventRow> = events::table
            .filter(events::qr_code_token.eq(token.as_str()))
            .filter(events::deleted_at.is_null())
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Event::try_from).transpose().map_err(map_row_error)
    }

    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, AttendanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EventRow> = events::table
            .filter(events::id.eq(event_id))
            .filter(events::deleted_at.is_null())
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Event::try_from).transpose().map_err(map_row_error)
    }

    async fn attendance_exists(
        &self,
        event_id: i64,
        student_id: i64,
    ) -> Result<bool, AttendanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(exists(
            user_attendances::table
                .filter(user_attendances::event_id.eq(event_id))
                .filter(user_attendances::student_id.eq(student_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn record_attendance(
        &self,
        attendance: &NewAttendance,
    ) -> Result<AttendanceRecord, AttendanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewAttendanceRow {
            event_id: attendance.event_id,
            student_id: attendance.student_id,
            status: attendance.status.as_str(),
            marked_time: attendance.marked_time,
            created_at: attendance.marked_time,
        };

        let row: AttendanceRow = diesel::insert_into(user_attendances::table)
            .values(&new_row)
            .returning(AttendanceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        AttendanceRecord::try_from(row).map_err(map_row_error)
    }

    async fn find_student(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentProfile>, AttendanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<StudentRow> = students::table
            .filter(students::id.eq(student_id))
            .filter(students::deleted_at.is_null())
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(StudentProfile::from))
    }

    async fn event_roster(
        &self,
        event_id: i64,
    ) -> Result<Vec<RosterEntry>, AttendanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RosterRow> = user_attendances::table
            .left_join(
                students::table.on(students::id
                    .eq(user_attendances::student_id)
                    .and(students::deleted_at.is_null())),
            )
            .filter(user_attendances::event_id.eq(event_id))
            .order((
                user_attendances::marked_time.asc(),
                user_attendances::id.asc(),
            ))
            .select((
                AttendanceRow::as_select(),
                (
                    students::first_name,
                    students::last_name,
                    students::matric_number,
                )
                    .nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(roster_entry).collect()
    }

    async fn student_history(
        &self,
        student_id: i64,
    ) -> Result<Vec<HistoryEntry>, AttendanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<HistoryRow> = user_attendances::table
            .inner_join(events::table)
            .filter(user_attendances::student_id.eq(student_id))
            .order((
                user_attendances::marked_time.desc(),
                user_attendances::id.desc(),
            ))
            .select((
                AttendanceRow::as_select(),
                (events::course_code, events::course_name, events::venue),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(history_entry).collect()
    }
}
