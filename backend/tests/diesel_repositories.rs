//! Diesel adapters against a live PostgreSQL database.
//!
//! Set `ATTENDANCE_TEST_DATABASE_URL` to a disposable database to run these
//! checks; they are skipped otherwise. Migrations are applied on entry and
//! every row created here uses run-unique identifiers.

use chrono::{Duration, DurationRound, Utc};
use diesel::QueryableByName;
use diesel::sql_types::{BigInt, Text};
use diesel_async::RunQueryDsl;
use serde_json::json;
use uuid::Uuid;

use attendance::domain::ports::{
    AdminRepository, AnalyticsRepository, AttendanceRepository, AttendanceRepositoryError,
    AuditEntry,
};
use attendance::domain::{
    AttendanceScope, AttendanceStatus, EventDraft, EventFields, NewAttendance, NewEvent, Role,
    SessionToken,
};
use attendance::outbound::persistence::{
    DbPool, DieselAdminRepository, DieselAnalyticsRepository, DieselAttendanceRepository,
    PoolConfig, run_pending_migrations,
};

const DATABASE_URL_ENV: &str = "ATTENDANCE_TEST_DATABASE_URL";

#[derive(QueryableByName)]
struct InsertedId {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

#[derive(QueryableByName)]
struct IndexName {
    #[diesel(sql_type = Text)]
    indexname: String,
}

struct Fixture {
    pool: DbPool,
    lecturer_id: i64,
    student_id: i64,
}

async fn insert_returning_id(pool: &DbPool, sql: &str, binds: [String; 3]) -> i64 {
    let mut conn = pool.get().await.expect("connection");
    let [first, second, third] = binds;
    let row: InsertedId = diesel::sql_query(sql)
        .bind::<Text, _>(first)
        .bind::<Text, _>(second)
        .bind::<Text, _>(third)
        .get_result(&mut conn)
        .await
        .expect("insert");
    row.id
}

async fn fixture(database_url: &str) -> Fixture {
    run_pending_migrations(database_url)
        .await
        .expect("migrations apply");
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(4))
        .await
        .expect("pool");
    let run = Uuid::new_v4().simple().to_string();

    let lecturer_id = insert_returning_id(
        &pool,
        "INSERT INTO lecturers (first_name, last_name, email, staff_id, department, password_hash) \
         VALUES ('Grace', 'Okafor', $1, $2, $3, 'x') RETURNING id",
        [
            format!("lecturer-{run}@uni.edu"),
            format!("STF-{run}"),
            format!("Dept {run}"),
        ],
    )
    .await;
    let student_id = insert_returning_id(
        &pool,
        "INSERT INTO students (first_name, last_name, email, matric_number, password_hash) \
         VALUES ($1, 'Obi', $2, $3, 'x') RETURNING id",
        [
            "Ada".to_owned(),
            format!("student-{run}@uni.edu"),
            format!("CSC/{run}"),
        ],
    )
    .await;

    Fixture {
        pool,
        lecturer_id,
        student_id,
    }
}

fn new_event(lecturer_id: i64) -> NewEvent {
    let start = Utc::now()
        .duration_trunc(Duration::seconds(1))
        .expect("truncates");
    let draft = EventDraft::new(EventFields {
        course_code: "CSC301".to_owned(),
        course_name: "Compiler Construction".to_owned(),
        department: "Computer Science".to_owned(),
        venue: "LT1".to_owned(),
        start_time: start,
        end_time: start + Duration::hours(1),
    })
    .expect("valid draft");
    NewEvent {
        draft,
        lecturer_id,
        token: SessionToken::mint(),
        created_at: start,
    }
}

#[tokio::test]
async fn diesel_adapters_honour_the_port_contracts() {
    let Ok(database_url) = std::env::var(DATABASE_URL_ENV) else {
        eprintln!("{DATABASE_URL_ENV} unset; skipping PostgreSQL adapter checks");
        return;
    };
    let fx = fixture(&database_url).await;
    let attendance = DieselAttendanceRepository::new(fx.pool.clone());
    let analytics = DieselAnalyticsRepository::new(fx.pool.clone());
    let admin = DieselAdminRepository::new(fx.pool.clone());

    // Active-session lookups filter on both window bounds.
    let mut conn = fx.pool.get().await.expect("connection");
    let indexes: Vec<IndexName> =
        diesel::sql_query("SELECT indexname FROM pg_indexes WHERE tablename = 'events'")
            .load(&mut conn)
            .await
            .expect("index listing");
    drop(conn);
    let names: Vec<&str> = indexes.iter().map(|row| row.indexname.as_str()).collect();
    assert!(names.contains(&"idx_events_start_time"));
    assert!(names.contains(&"idx_events_end_time"));

    // Sessions round-trip through their token.
    let draft = new_event(fx.lecturer_id);
    let event = attendance.create_event(&draft).await.expect("event stored");
    let found = attendance
        .find_event_by_token(&draft.token)
        .await
        .expect("lookup")
        .expect("event found");
    assert_eq!(found, event);
    assert_eq!(found.lecturer_id, Some(fx.lecturer_id));

    // A reused token violates the unique constraint.
    let clash = NewEvent {
        token: draft.token.clone(),
        ..new_event(fx.lecturer_id)
    };
    assert_eq!(
        attendance.create_event(&clash).await,
        Err(AttendanceRepositoryError::DuplicateToken)
    );

    // The (event, student) constraint is what rejects a second row.
    let row = NewAttendance {
        event_id: event.id,
        student_id: fx.student_id,
        status: AttendanceStatus::Present,
        marked_time: event.start_time + Duration::minutes(5),
    };
    let recorded = attendance.record_attendance(&row).await.expect("recorded");
    assert_eq!(recorded.status, AttendanceStatus::Present);
    assert_eq!(
        attendance.record_attendance(&row).await,
        Err(AttendanceRepositoryError::AlreadyRecorded)
    );
    assert!(
        attendance
            .attendance_exists(event.id, fx.student_id)
            .await
            .expect("probe")
    );

    let roster = attendance.event_roster(event.id).await.expect("roster");
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].student_name, "Ada Obi");

    let tally = analytics
        .attendance_tally(&AttendanceScope::all().student(fx.student_id), 900.0)
        .await
        .expect("tally");
    assert_eq!((tally.total, tally.present, tally.late), (1, 1, 0));
    assert!((tally.average_delay_minutes - 5.0).abs() < 1e-9);

    // Deletion cascades and writes exactly one audit row.
    let audit = AuditEntry {
        timestamp: Utc::now(),
        user_type: Role::Admin,
        user_id: 1,
        user_email: "admin@uni.edu".to_owned(),
        action: "delete_event".to_owned(),
        resource_type: "event".to_owned(),
        resource_id: event.id.to_string(),
        details: json!({ "course_code": "CSC301" }),
        ip_address: Some("127.0.0.1".to_owned()),
        user_agent: None,
    };
    assert_eq!(
        admin.delete_event(event.id, &audit).await.expect("delete"),
        Some(1)
    );
    assert_eq!(attendance.find_event(event.id).await.expect("lookup"), None);
    assert!(
        attendance
            .student_history(fx.student_id)
            .await
            .expect("history")
            .is_empty()
    );
    assert_eq!(
        admin.delete_event(event.id, &audit).await.expect("delete"),
        None
    );
}
