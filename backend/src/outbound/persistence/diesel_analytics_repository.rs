//! PostgreSQL-backed `AnalyticsRepository` implementation.
//!
//! Identity lookups use the typed DSL. Aggregates are raw SQL with
//! `FILTER` clauses and `to_char` bucketing, which the DSL cannot express.
//! Every attendance aggregate shares one scope predicate over `$1..$6`;
//! query-specific parameters start at `$7`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Date, Double, Integer, Nullable, Text, Timestamptz};
use diesel_async::RunQueryDsl;

use crate::domain::StudentProfile;
use crate::domain::analytics::{
    AttendanceScope, AttendanceTally, CourseIdentity, CourseTally, DailyActivity,
    DepartmentTally, DuplicateCheckin, EventScope, EventTally, Granularity, HeatmapTally,
    InstitutionCounts, LecturerProfile, PeriodTally, PresentDates, StudentTally,
};
use crate::domain::ports::{AnalyticsRepository, AnalyticsRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{LecturerRow, StudentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{events, lecturers, students};

const SCOPED_ROWS: &str = r#"
FROM user_attendances ua
JOIN events e ON e.id = ua.event_id
WHERE e.deleted_at IS NULL
  AND ($1::BIGINT IS NULL OR ua.student_id = $1)
  AND ($2::BIGINT IS NULL OR e.lecturer_id = $2)
  AND ($3::TEXT IS NULL OR e.course_code = $3)
  AND ($4::TEXT IS NULL OR e.department = $4)
  AND ($5::TIMESTAMPTZ IS NULL OR ua.marked_time >= $5)
  AND ($6::TIMESTAMPTZ IS NULL OR ua.marked_time < $6)
"#;

const DELAY_SECONDS: &str = "EXTRACT(EPOCH FROM (ua.marked_time - e.start_time))::DOUBLE PRECISION";

const PRESENT_COUNT: &str = "COUNT(*) FILTER (WHERE ua.status = 'present')::BIGINT";

fn attendance_tally_sql() -> String {
    format!(
        "SELECT COUNT(*)::BIGINT AS total, {PRESENT_COUNT} AS present, \
         COUNT(*) FILTER (WHERE {DELAY_SECONDS} > $7)::BIGINT AS late, \
         COALESCE(AVG({DELAY_SECONDS}) / 60.0, 0)::DOUBLE PRECISION AS average_delay_minutes \
         {SCOPED_ROWS}"
    )
}

fn course_tallies_sql() -> String {
    format!(
        "SELECT e.course_code, MAX(e.course_name) AS course_name, \
         MAX(e.department) AS department, COUNT(*)::BIGINT AS total, \
         {PRESENT_COUNT} AS present, \
         COUNT(DISTINCT ua.student_id)::BIGINT AS enrolled, \
         COUNT(DISTINCT ua.student_id) FILTER (WHERE ua.status = 'present')::BIGINT AS attended \
         {SCOPED_ROWS} GROUP BY e.course_code ORDER BY e.course_code"
    )
}

fn student_tallies_sql() -> String {
    let scoped = SCOPED_ROWS.replacen(
        "JOIN events e ON e.id = ua.event_id",
        "JOIN events e ON e.id = ua.event_id \
         LEFT JOIN students s ON s.id = ua.student_id AND s.deleted_at IS NULL",
        1,
    );
    format!(
        "SELECT ua.student_id, \
         COALESCE(MAX(s.first_name || ' ' || s.last_name), '') AS student_name, \
         COUNT(*)::BIGINT AS total, {PRESENT_COUNT} AS present \
         {scoped} GROUP BY ua.student_id ORDER BY ua.student_id"
    )
}

fn period_tallies_sql() -> String {
    format!(
        "SELECT to_char(ua.marked_time AT TIME ZONE 'UTC', $7) AS period, \
         COUNT(*)::BIGINT AS total, {PRESENT_COUNT} AS present, \
         COALESCE(AVG({DELAY_SECONDS}) / 60.0, 0)::DOUBLE PRECISION AS average_delay_minutes \
         {SCOPED_ROWS} GROUP BY 1 ORDER BY 1"
    )
}

fn heatmap_tallies_sql() -> String {
    format!(
        "SELECT EXTRACT(ISODOW FROM ua.marked_time AT TIME ZONE 'UTC')::INT AS weekday, \
         EXTRACT(HOUR FROM ua.marked_time AT TIME ZONE 'UTC')::INT AS hour, \
         COUNT(*)::BIGINT AS total, {PRESENT_COUNT} AS present, \
         COUNT(DISTINCT ua.event_id)::BIGINT AS sessions, \
         COALESCE(AVG({DELAY_SECONDS}) / 60.0, 0)::DOUBLE PRECISION AS average_delay_minutes \
         {SCOPED_ROWS} GROUP BY 1, 2 ORDER BY 1, 2"
    )
}

const PRESENT_DATES_SQL: &str = r#"
SELECT DISTINCT (ua.marked_time AT TIME ZONE 'UTC')::DATE AS day
FROM user_attendances ua
WHERE ua.student_id = $1 AND ua.status = 'present'
ORDER BY day DESC
"#;

const EVENT_TALLIES_SQL: &str = r#"
SELECT e.id AS event_id, e.course_code, e.course_name, e.department, e.venue,
       COALESCE(l.first_name || ' ' || l.last_name, '') AS lecturer_name,
       e.start_time, e.end_time, e.created_at,
       COUNT(ua.id)::BIGINT AS total,
       COUNT(ua.id) FILTER (WHERE ua.status = 'present')::BIGINT AS present,
       COUNT(DISTINCT ua.student_id)::BIGINT AS distinct_students
FROM events e
LEFT JOIN lecturers l ON l.id = e.lecturer_id AND l.deleted_at IS NULL
LEFT JOIN user_attendances ua ON ua.event_id = e.id
WHERE e.deleted_at IS NULL
  AND ($1::BIGINT IS NULL OR e.lecturer_id = $1)
  AND ($2::TEXT IS NULL OR e.course_code = $2)
  AND ($3::TEXT IS NULL OR e.department = $3)
  AND ($4::TIMESTAMPTZ IS NULL OR (e.start_time <= $4 AND e.end_time >= $4))
GROUP BY e.id, l.first_name, l.last_name
ORDER BY e.created_at DESC, e.id DESC
"#;

const INSTITUTION_COUNTS_SQL: &str = r#"
SELECT
    (SELECT COUNT(*) FROM students WHERE deleted_at IS NULL)::BIGINT AS students,
    (SELECT COUNT(*) FROM lecturers WHERE deleted_at IS NULL)::BIGINT AS lecturers,
    (SELECT COUNT(*) FROM (
        SELECT department FROM events WHERE deleted_at IS NULL AND department <> ''
        UNION
        SELECT department FROM lecturers WHERE deleted_at IS NULL AND department <> ''
    ) d)::BIGINT AS departments,
    (SELECT COUNT(*) FROM events WHERE deleted_at IS NULL)::BIGINT AS events
"#;

const LECTURER_COUNT_SQL: &str = r#"
SELECT COUNT(*)::BIGINT AS count
FROM lecturers
WHERE deleted_at IS NULL AND ($1::TEXT IS NULL OR department = $1)
"#;

const ACTIVITY_SINCE_SQL: &str = r#"
SELECT
    (SELECT COUNT(*) FROM events
        WHERE deleted_at IS NULL AND created_at >= $1)::BIGINT AS events_created,
    (SELECT COUNT(*) FROM user_attendances WHERE marked_time >= $1)::BIGINT AS checkins,
    (SELECT COUNT(*) FROM events
        WHERE deleted_at IS NULL AND start_time <= $2 AND end_time >= $2)::BIGINT
        AS active_sessions,
    (SELECT MAX(marked_time) FROM user_attendances) AS last_check_in
"#;

const DEPARTMENT_TALLIES_SQL: &str = r#"
SELECT e.department,
       COUNT(DISTINCT e.id)::BIGINT AS event_count,
       COUNT(DISTINCT e.course_code)::BIGINT AS course_count,
       COUNT(DISTINCT ua.student_id)::BIGINT AS student_count,
       (SELECT COUNT(*) FROM lecturers l
            WHERE l.deleted_at IS NULL AND l.department = e.department)::BIGINT
            AS lecturer_count,
       COUNT(ua.id)::BIGINT AS total,
       COUNT(ua.id) FILTER (WHERE ua.status = 'present')::BIGINT AS present
FROM events e
LEFT JOIN user_attendances ua ON ua.event_id = e.id
WHERE e.deleted_at IS NULL AND e.department <> ''
GROUP BY e.department
ORDER BY event_count DESC, e.department
"#;

const DUPLICATE_CHECKINS_SQL: &str = r#"
SELECT ua1.student_id,
       COALESCE(s.first_name || ' ' || s.last_name, '') AS student_name,
       ua1.event_id, e.course_name,
       ua1.marked_time AS first_marked, ua2.marked_time AS second_marked
FROM user_attendances ua1
JOIN user_attendances ua2
  ON ua2.student_id = ua1.student_id
 AND ua2.event_id = ua1.event_id
 AND ua2.id > ua1.id
JOIN events e ON e.id = ua1.event_id
LEFT JOIN students s ON s.id = ua1.student_id AND s.deleted_at IS NULL
WHERE ABS(EXTRACT(EPOCH FROM (ua2.marked_time - ua1.marked_time))::DOUBLE PRECISION) < $1
ORDER BY ua1.event_id, ua1.student_id
"#;

/// `to_char` pattern for a trend bucket.
fn period_format(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Weekly => "IYYY-IW",
        Granularity::Monthly => "YYYY-MM",
    }
}

/// Bind an [`AttendanceScope`] to `$1..$6` of [`SCOPED_ROWS`].
macro_rules! bind_scope {
    ($query:expr, $scope:expr) => {{
        let scope: &AttendanceScope = $scope;
        $query
            .bind::<Nullable<BigInt>, _>(scope.student_id)
            .bind::<Nullable<BigInt>, _>(scope.lecturer_id)
            .bind::<Nullable<Text>, _>(scope.course_code.clone())
            .bind::<Nullable<Text>, _>(scope.department.clone())
            .bind::<Nullable<Timestamptz>, _>(scope.marked_from)
            .bind::<Nullable<Timestamptz>, _>(scope.marked_before)
    }};
}

#[derive(QueryableByName)]
struct TallyRow {
    #[diesel(sql_type = BigInt)]
    total: i64,
    #[diesel(sql_type = BigInt)]
    present: i64,
    #[diesel(sql_type = BigInt)]
    late: i64,
    #[diesel(sql_type = Double)]
    average_delay_minutes: f64,
}

#[derive(QueryableByName)]
struct DateRow {
    #[diesel(sql_type = Date)]
    day: NaiveDate,
}

#[derive(QueryableByName)]
struct CourseTallyRow {
    #[diesel(sql_type = Text)]
    course_code: String,
    #[diesel(sql_type = Text)]
    course_name: String,
    #[diesel(sql_type = Text)]
    department: String,
    #[diesel(sql_type = BigInt)]
    total: i64,
    #[diesel(sql_type = BigInt)]
    present: i64,
    #[diesel(sql_type = BigInt)]
    enrolled: i64,
    #[diesel(sql_type = BigInt)]
    attended: i64,
}

#[derive(QueryableByName)]
struct StudentTallyRow {
    #[diesel(sql_type = BigInt)]
    student_id: i64,
    #[diesel(sql_type = Text)]
    student_name: String,
    #[diesel(sql_type = BigInt)]
    total: i64,
    #[diesel(sql_type = BigInt)]
    present: i64,
}

#[derive(QueryableByName)]
struct PeriodTallyRow {
    #[diesel(sql_type = Text)]
    period: String,
    #[diesel(sql_type = BigInt)]
    total: i64,
    #[diesel(sql_type = BigInt)]
    present: i64,
    #[diesel(sql_type = Double)]
    average_delay_minutes: f64,
}

#[derive(QueryableByName)]
struct HeatmapTallyRow {
    #[diesel(sql_type = Integer)]
    weekday: i32,
    #[diesel(sql_type = Integer)]
    hour: i32,
    #[diesel(sql_type = BigInt)]
    total: i64,
    #[diesel(sql_type = BigInt)]
    present: i64,
    #[diesel(sql_type = BigInt)]
    sessions: i64,
    #[diesel(sql_type = Double)]
    average_delay_minutes: f64,
}

#[derive(QueryableByName)]
struct EventTallyRow {
    #[diesel(sql_type = BigInt)]
    event_id: i64,
    #[diesel(sql_type = Text)]
    course_code: String,
    #[diesel(sql_type = Text)]
    course_name: String,
    #[diesel(sql_type = Text)]
    department: String,
    #[diesel(sql_type = Text)]
    venue: String,
    #[diesel(sql_type = Text)]
    lecturer_name: String,
    #[diesel(sql_type = Timestamptz)]
    start_time: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    end_time: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    created_at: DateTime<Utc>,
    #[diesel(sql_type = BigInt)]
    total: i64,
    #[diesel(sql_type = BigInt)]
    present: i64,
    #[diesel(sql_type = BigInt)]
    distinct_students: i64,
}

#[derive(QueryableByName)]
struct InstitutionCountsRow {
    #[diesel(sql_type = BigInt)]
    students: i64,
    #[diesel(sql_type = BigInt)]
    lecturers: i64,
    #[diesel(sql_type = BigInt)]
    departments: i64,
    #[diesel(sql_type = BigInt)]
    events: i64,
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName)]
struct ActivityRow {
    #[diesel(sql_type = BigInt)]
    events_created: i64,
    #[diesel(sql_type = BigInt)]
    checkins: i64,
    #[diesel(sql_type = BigInt)]
    active_sessions: i64,
    #[diesel(sql_type = Nullable<Timestamptz>)]
    last_check_in: Option<DateTime<Utc>>,
}

#[derive(QueryableByName)]
struct DepartmentTallyRow {
    #[diesel(sql_type = Text)]
    department: String,
    #[diesel(sql_type = BigInt)]
    event_count: i64,
    #[diesel(sql_type = BigInt)]
    course_count: i64,
    #[diesel(sql_type = BigInt)]
    student_count: i64,
    #[diesel(sql_type = BigInt)]
    lecturer_count: i64,
    #[diesel(sql_type = BigInt)]
    total: i64,
    #[diesel(sql_type = BigInt)]
    present: i64,
}

#[derive(QueryableByName)]
struct DuplicateRow {
    #[diesel(sql_type = BigInt)]
    student_id: i64,
    #[diesel(sql_type = Text)]
    student_name: String,
    #[diesel(sql_type = BigInt)]
    event_id: i64,
    #[diesel(sql_type = Text)]
    course_name: String,
    #[diesel(sql_type = Timestamptz)]
    first_marked: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    second_marked: DateTime<Utc>,
}

/// Diesel-backed implementation of the analytics repository port.
#[derive(Clone)]
pub struct DieselAnalyticsRepository {
    pool: DbPool,
}

impl DieselAnalyticsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AnalyticsRepositoryError {
    map_basic_pool_error(error, AnalyticsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AnalyticsRepositoryError {
    map_basic_diesel_error(
        error,
        AnalyticsRepositoryError::query,
        AnalyticsRepositoryError::connection,
    )
}

#[async_trait]
impl AnalyticsRepository for DieselAnalyticsRepository {
    async fn find_student(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentProfile>, AnalyticsRepositoryError> {
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

    async fn find_lecturer(
        &self,
        lecturer_id: i64,
    ) -> Result<Option<LecturerProfile>, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LecturerRow> = lecturers::table
            .filter(lecturers::id.eq(lecturer_id))
            .filter(lecturers::deleted_at.is_null())
            .select(LecturerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(LecturerProfile::from))
    }

    async fn find_course(
        &self,
        course_code: &str,
    ) -> Result<Option<CourseIdentity>, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(String, String)> = events::table
            .filter(events::course_code.eq(course_code))
            .filter(events::deleted_at.is_null())
            .order(events::created_at.desc())
            .select((events::course_code, events::course_name))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|(course_code, course_name)| CourseIdentity {
            course_code,
            course_name,
        }))
    }

    async fn attendance_tally(
        &self,
        scope: &AttendanceScope,
        late_after_seconds: f64,
    ) -> Result<AttendanceTally, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: TallyRow = bind_scope!(sql_query(attendance_tally_sql()), scope)
            .bind::<Double, _>(late_after_seconds)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(AttendanceTally {
            total: row.total,
            present: row.present,
            late: row.late,
            average_delay_minutes: row.average_delay_minutes,
        })
    }

    async fn present_dates(
        &self,
        student_id: i64,
    ) -> Result<PresentDates, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DateRow> = sql_query(PRESENT_DATES_SQL)
            .bind::<BigInt, _>(student_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(|row| row.day).collect())
    }

    async fn course_tallies(
        &self,
        scope: &AttendanceScope,
    ) -> Result<Vec<CourseTally>, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CourseTallyRow> = bind_scope!(sql_query(course_tallies_sql()), scope)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CourseTally {
                course_code: row.course_code,
                course_name: row.course_name,
                department: row.department,
                total: row.total,
                present: row.present,
                enrolled: row.enrolled,
                attended: row.attended,
            })
            .collect())
    }

    async fn student_tallies(
        &self,
        scope: &AttendanceScope,
    ) -> Result<Vec<StudentTally>, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<StudentTallyRow> = bind_scope!(sql_query(student_tallies_sql()), scope)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| StudentTally {
                student_id: row.student_id,
                student_name: row.student_name,
                total: row.total,
                present: row.present,
            })
            .collect())
    }

    async fn period_tallies(
        &self,
        scope: &AttendanceScope,
        granularity: Granularity,
    ) -> Result<Vec<PeriodTally>, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PeriodTallyRow> = bind_scope!(sql_query(period_tallies_sql()), scope)
            .bind::<Text, _>(period_format(granularity))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| PeriodTally {
                period: row.period,
                total: row.total,
                present: row.present,
                average_delay_minutes: row.average_delay_minutes,
            })
            .collect())
    }

    async fn heatmap_tallies(
        &self,
        scope: &AttendanceScope,
    ) -> Result<Vec<HeatmapTally>, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<HeatmapTallyRow> = bind_scope!(sql_query(heatmap_tallies_sql()), scope)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| {
                let weekday = u32::try_from(row.weekday).map_err(|_| {
                    AnalyticsRepositoryError::query(format!("weekday {} out of range", row.weekday))
                })?;
                let hour = u32::try_from(row.hour).map_err(|_| {
                    AnalyticsRepositoryError::query(format!("hour {} out of range", row.hour))
                })?;
                Ok(HeatmapTally {
                    weekday,
                    hour,
                    total: row.total,
                    present: row.present,
                    sessions: row.sessions,
                    average_delay_minutes: row.average_delay_minutes,
                })
            })
            .collect()
    }

    async fn event_tallies(
        &self,
        scope: &EventScope,
    ) -> Result<Vec<EventTally>, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<EventTallyRow> = sql_query(EVENT_TALLIES_SQL)
            .bind::<Nullable<BigInt>, _>(scope.lecturer_id)
            .bind::<Nullable<Text>, _>(scope.course_code.clone())
            .bind::<Nullable<Text>, _>(scope.department.clone())
            .bind::<Nullable<Timestamptz>, _>(scope.active_at)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| EventTally {
                event_id: row.event_id,
                course_code: row.course_code,
                course_name: row.course_name,
                department: row.department,
                venue: row.venue,
                lecturer_name: row.lecturer_name,
                start_time: row.start_time,
                end_time: row.end_time,
                created_at: row.created_at,
                total: row.total,
                present: row.present,
                distinct_students: row.distinct_students,
            })
            .collect())
    }

    async fn institution_counts(&self) -> Result<InstitutionCounts, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: InstitutionCountsRow = sql_query(INSTITUTION_COUNTS_SQL)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(InstitutionCounts {
            students: row.students,
            lecturers: row.lecturers,
            departments: row.departments,
            events: row.events,
        })
    }

    async fn lecturer_count(
        &self,
        department: Option<String>,
    ) -> Result<i64, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: CountRow = sql_query(LECTURER_COUNT_SQL)
            .bind::<Nullable<Text>, _>(department)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row.count)
    }

    async fn activity_since(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<DailyActivity, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: ActivityRow = sql_query(ACTIVITY_SINCE_SQL)
            .bind::<Timestamptz, _>(since)
            .bind::<Timestamptz, _>(now)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(DailyActivity {
            events_created: row.events_created,
            checkins: row.checkins,
            active_sessions: row.active_sessions,
            last_check_in: row.last_check_in,
        })
    }

    async fn department_tallies(&self) -> Result<Vec<DepartmentTally>, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DepartmentTallyRow> = sql_query(DEPARTMENT_TALLIES_SQL)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| DepartmentTally {
                department: row.department,
                event_count: row.event_count,
                course_count: row.course_count,
                student_count: row.student_count,
                lecturer_count: row.lecturer_count,
                total: row.total,
                present: row.present,
            })
            .collect())
    }

    async fn duplicate_checkins(
        &self,
        window_seconds: f64,
    ) -> Result<Vec<DuplicateCheckin>, AnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DuplicateRow> = sql_query(DUPLICATE_CHECKINS_SQL)
            .bind::<Double, _>(window_seconds)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| DuplicateCheckin {
                student_id: row.student_id,
                student_name: row.student_name,
                event_id: row.event_id,
                course_name: row.course_name,
                first_marked: row.first_marked,
                second_marked: row.second_marked,
            })
            .collect())
    }
}
