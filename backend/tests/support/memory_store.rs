//! In-memory implementation of every driven repository port.
//!
//! Rows live behind one mutex so the `(event, student)` uniqueness check and
//! the insert happen atomically, matching the database constraint.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use attendance::domain::analytics::{
    AttendanceScope, AttendanceTally, CourseIdentity, CourseTally, DailyActivity,
    DepartmentTally, DuplicateCheckin, EventScope, EventTally, Granularity, HeatmapTally,
    InstitutionCounts, LecturerProfile, PeriodTally, PresentDates, StudentTally,
};
use attendance::domain::ports::{
    AdminRepository, AdminRepositoryError, AnalyticsRepository, AnalyticsRepositoryError,
    AttendanceRepository, AttendanceRepositoryError, AuditEntry,
};
use attendance::domain::{
    AttendanceRecord, AttendanceStatus, Event, HistoryEntry, NewAttendance, NewEvent, RosterEntry,
    SessionToken, StudentProfile,
};

#[derive(Debug, Clone)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub matric_number: String,
}

#[derive(Debug, Clone)]
pub struct Lecturer {
    pub id: i64,
    pub name: String,
    pub department: String,
}

#[derive(Default)]
struct State {
    students: BTreeMap<i64, Student>,
    lecturers: BTreeMap<i64, Lecturer>,
    events: BTreeMap<i64, Event>,
    attendances: BTreeMap<i64, AttendanceRecord>,
    audit: Vec<AuditEntry>,
    next_event_id: i64,
    next_attendance_id: i64,
}

impl State {
    fn in_scope(&self, row: &AttendanceRecord, scope: &AttendanceScope) -> Option<&Event> {
        let event = self.events.get(&row.event_id)?;
        let keep = scope.student_id.is_none_or(|id| row.student_id == id)
            && scope.lecturer_id.is_none_or(|id| event.lecturer_id == Some(id))
            && scope
                .course_code
                .as_deref()
                .is_none_or(|code| event.course_code == code)
            && scope
                .department
                .as_deref()
                .is_none_or(|department| event.department == department)
            && scope.marked_from.is_none_or(|from| row.marked_time >= from)
            && scope.marked_before.is_none_or(|before| row.marked_time < before);
        keep.then_some(event)
    }

    fn scoped<'a>(
        &'a self,
        scope: &'a AttendanceScope,
    ) -> impl Iterator<Item = (&'a AttendanceRecord, &'a Event)> + 'a {
        self.attendances
            .values()
            .filter_map(move |row| self.in_scope(row, scope).map(|event| (row, event)))
    }

    fn student_name(&self, student_id: i64) -> String {
        self.students
            .get(&student_id)
            .map(|student| student.name.clone())
            .unwrap_or_default()
    }
}

fn delay_seconds(row: &AttendanceRecord, event: &Event) -> f64 {
    (row.marked_time - event.start_time).num_seconds() as f64
}

fn present(row: &AttendanceRecord) -> bool {
    row.status == AttendanceStatus::Present
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// Shared in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_student(&self, id: i64, name: &str, matric_number: &str) {
        self.lock().students.insert(
            id,
            Student {
                id,
                name: name.to_owned(),
                matric_number: matric_number.to_owned(),
            },
        );
    }

    pub fn add_lecturer(&self, id: i64, name: &str, department: &str) {
        self.lock().lecturers.insert(
            id,
            Lecturer {
                id,
                name: name.to_owned(),
                department: department.to_owned(),
            },
        );
    }

    /// Start event ids at `next` so scenarios can name them.
    pub fn set_next_event_id(&self, next: i64) {
        self.lock().next_event_id = next - 1;
    }

    /// Insert a past event with a row for `student_id` in the given state.
    pub fn seed_attendance(
        &self,
        lecturer_id: i64,
        course_code: &str,
        start_time: DateTime<Utc>,
        student_id: i64,
        status: AttendanceStatus,
    ) {
        let mut state = self.lock();
        state.next_event_id += 1;
        let event_id = state.next_event_id;
        let department = state
            .lecturers
            .get(&lecturer_id)
            .map(|lecturer| lecturer.department.clone())
            .unwrap_or_default();
        state.events.insert(
            event_id,
            Event {
                id: event_id,
                course_code: course_code.to_owned(),
                course_name: format!("{course_code} lecture"),
                department,
                venue: "LT1".to_owned(),
                start_time,
                end_time: start_time + chrono::Duration::hours(1),
                lecturer_id: Some(lecturer_id),
                token: SessionToken::mint(),
                created_at: start_time,
            },
        );
        state.next_attendance_id += 1;
        let id = state.next_attendance_id;
        state.attendances.insert(
            id,
            AttendanceRecord {
                id,
                event_id,
                student_id,
                status,
                marked_time: start_time + chrono::Duration::minutes(2),
            },
        );
    }

    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.lock().audit.clone()
    }

    pub fn attendance_rows(&self, event_id: i64) -> usize {
        self.lock()
            .attendances
            .values()
            .filter(|row| row.event_id == event_id)
            .count()
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn create_event(&self, event: &NewEvent) -> Result<Event, AttendanceRepositoryError> {
        let mut state = self.lock();
        if state.events.values().any(|existing| existing.token == event.token) {
            return Err(AttendanceRepositoryError::duplicate_token());
        }
        state.next_event_id += 1;
        let id = state.next_event_id;
        let department = event.draft.department().to_owned();
        let created = Event {
            id,
            course_code: event.draft.course_code().to_owned(),
            course_name: event.draft.course_name().to_owned(),
            department,
            venue: event.draft.venue().to_owned(),
            start_time: event.draft.start_time(),
            end_time: event.draft.end_time(),
            lecturer_id: Some(event.lecturer_id),
            token: event.token.clone(),
            created_at: event.created_at,
        };
        state.events.insert(id, created.clone());
        Ok(created)
    }

    async fn find_event_by_token(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Event>, AttendanceRepositoryError> {
        Ok(self
            .lock()
            .events
            .values()
            .find(|event| &event.token == token)
            .cloned())
    }

    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, AttendanceRepositoryError> {
        Ok(self.lock().events.get(&event_id).cloned())
    }

    async fn attendance_exists(
        &self,
        event_id: i64,
        student_id: i64,
    ) -> Result<bool, AttendanceRepositoryError> {
        Ok(self
            .lock()
            .attendances
            .values()
            .any(|row| row.event_id == event_id && row.student_id == student_id))
    }

    async fn record_attendance(
        &self,
        attendance: &NewAttendance,
    ) -> Result<AttendanceRecord, AttendanceRepositoryError> {
        let mut state = self.lock();
        if state.attendances.values().any(|row| {
            row.event_id == attendance.event_id && row.student_id == attendance.student_id
        }) {
            return Err(AttendanceRepositoryError::already_recorded());
        }
        state.next_attendance_id += 1;
        let record = AttendanceRecord {
            id: state.next_attendance_id,
            event_id: attendance.event_id,
            student_id: attendance.student_id,
            status: attendance.status,
            marked_time: attendance.marked_time,
        };
        state.attendances.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_student(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentProfile>, AttendanceRepositoryError> {
        Ok(self.lock().students.get(&student_id).map(|student| StudentProfile {
            id: student.id,
            name: student.name.clone(),
            matric_number: student.matric_number.clone(),
        }))
    }

    async fn event_roster(
        &self,
        event_id: i64,
    ) -> Result<Vec<RosterEntry>, AttendanceRepositoryError> {
        let state = self.lock();
        let mut rows: Vec<RosterEntry> = state
            .attendances
            .values()
            .filter(|row| row.event_id == event_id)
            .map(|row| {
                let student = state.students.get(&row.student_id);
                RosterEntry {
                    id: row.id,
                    student_id: row.student_id,
                    student_name: student.map(|s| s.name.clone()).unwrap_or_default(),
                    matric_number: student.map(|s| s.matric_number.clone()).unwrap_or_default(),
                    status: row.status,
                    marked_time: row.marked_time,
                }
            })
            .collect();
        rows.sort_by_key(|row| row.marked_time);
        Ok(rows)
    }

    async fn student_history(
        &self,
        student_id: i64,
    ) -> Result<Vec<HistoryEntry>, AttendanceRepositoryError> {
        let state = self.lock();
        let mut rows: Vec<HistoryEntry> = state
            .attendances
            .values()
            .filter(|row| row.student_id == student_id)
            .filter_map(|row| {
                let event = state.events.get(&row.event_id)?;
                Some(HistoryEntry {
                    id: row.id,
                    event_id: row.event_id,
                    course_code: event.course_code.clone(),
                    course_name: event.course_name.clone(),
                    venue: event.venue.clone(),
                    status: row.status,
                    marked_time: row.marked_time,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.marked_time.cmp(&a.marked_time));
        Ok(rows)
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn delete_event(
        &self,
        event_id: i64,
        audit: &AuditEntry,
    ) -> Result<Option<i64>, AdminRepositoryError> {
        let mut state = self.lock();
        if state.events.remove(&event_id).is_none() {
            return Ok(None);
        }
        let before = state.attendances.len();
        state.attendances.retain(|_, row| row.event_id != event_id);
        let removed = count(before - state.attendances.len());
        state.audit.push(audit.clone());
        Ok(Some(removed))
    }
}

#[async_trait]
impl AnalyticsRepository for MemoryStore {
    async fn find_student(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentProfile>, AnalyticsRepositoryError> {
        Ok(self.lock().students.get(&student_id).map(|student| StudentProfile {
            id: student.id,
            name: student.name.clone(),
            matric_number: student.matric_number.clone(),
        }))
    }

    async fn find_lecturer(
        &self,
        lecturer_id: i64,
    ) -> Result<Option<LecturerProfile>, AnalyticsRepositoryError> {
        Ok(self.lock().lecturers.get(&lecturer_id).map(|lecturer| LecturerProfile {
            id: lecturer.id,
            name: lecturer.name.clone(),
            department: lecturer.department.clone(),
        }))
    }

    async fn find_course(
        &self,
        course_code: &str,
    ) -> Result<Option<CourseIdentity>, AnalyticsRepositoryError> {
        Ok(self
            .lock()
            .events
            .values()
            .find(|event| event.course_code == course_code)
            .map(|event| CourseIdentity {
                course_code: event.course_code.clone(),
                course_name: event.course_name.clone(),
            }))
    }

    async fn attendance_tally(
        &self,
        scope: &AttendanceScope,
        late_after_seconds: f64,
    ) -> Result<AttendanceTally, AnalyticsRepositoryError> {
        let state = self.lock();
        let rows: Vec<_> = state.scoped(scope).collect();
        let delays: Vec<f64> = rows.iter().map(|(row, event)| delay_seconds(row, event)).collect();
        Ok(AttendanceTally {
            total: count(rows.len()),
            present: count(rows.iter().filter(|(row, _)| present(row)).count()),
            late: count(delays.iter().filter(|delay| **delay > late_after_seconds).count()),
            average_delay_minutes: average(&delays) / 60.0,
        })
    }

    async fn present_dates(
        &self,
        student_id: i64,
    ) -> Result<PresentDates, AnalyticsRepositoryError> {
        let state = self.lock();
        let days: BTreeSet<NaiveDate> = state
            .attendances
            .values()
            .filter(|row| row.student_id == student_id && present(row))
            .map(|row| row.marked_time.date_naive())
            .collect();
        Ok(days.into_iter().rev().collect())
    }

    async fn course_tallies(
        &self,
        scope: &AttendanceScope,
    ) -> Result<Vec<CourseTally>, AnalyticsRepositoryError> {
        let state = self.lock();
        let mut courses: BTreeMap<String, (CourseTally, BTreeSet<i64>, BTreeSet<i64>)> =
            BTreeMap::new();
        for (row, event) in state.scoped(scope) {
            let entry = courses.entry(event.course_code.clone()).or_insert_with(|| {
                (
                    CourseTally {
                        course_code: event.course_code.clone(),
                        course_name: event.course_name.clone(),
                        department: event.department.clone(),
                        total: 0,
                        present: 0,
                        enrolled: 0,
                        attended: 0,
                    },
                    BTreeSet::new(),
                    BTreeSet::new(),
                )
            });
            entry.0.total += 1;
            entry.1.insert(row.student_id);
            if present(row) {
                entry.0.present += 1;
                entry.2.insert(row.student_id);
            }
        }
        Ok(courses
            .into_values()
            .map(|(mut tally, enrolled, attended)| {
                tally.enrolled = count(enrolled.len());
                tally.attended = count(attended.len());
                tally
            })
            .collect())
    }

    async fn student_tallies(
        &self,
        scope: &AttendanceScope,
    ) -> Result<Vec<StudentTally>, AnalyticsRepositoryError> {
        let state = self.lock();
        let mut students: BTreeMap<i64, StudentTally> = BTreeMap::new();
        for (row, _) in state.scoped(scope) {
            let entry = students.entry(row.student_id).or_insert_with(|| StudentTally {
                student_id: row.student_id,
                student_name: state.student_name(row.student_id),
                total: 0,
                present: 0,
            });
            entry.total += 1;
            if present(row) {
                entry.present += 1;
            }
        }
        Ok(students.into_values().collect())
    }

    async fn period_tallies(
        &self,
        scope: &AttendanceScope,
        granularity: Granularity,
    ) -> Result<Vec<PeriodTally>, AnalyticsRepositoryError> {
        let pattern = match granularity {
            Granularity::Weekly => "%G-%V",
            Granularity::Monthly => "%Y-%m",
        };
        let state = self.lock();
        let mut periods: BTreeMap<String, (i64, i64, Vec<f64>)> = BTreeMap::new();
        for (row, event) in state.scoped(scope) {
            let entry = periods
                .entry(row.marked_time.format(pattern).to_string())
                .or_default();
            entry.0 += 1;
            if present(row) {
                entry.1 += 1;
            }
            entry.2.push(delay_seconds(row, event));
        }
        Ok(periods
            .into_iter()
            .map(|(period, (total, present, delays))| PeriodTally {
                period,
                total,
                present,
                average_delay_minutes: average(&delays) / 60.0,
            })
            .collect())
    }

    async fn heatmap_tallies(
        &self,
        _scope: &AttendanceScope,
    ) -> Result<Vec<HeatmapTally>, AnalyticsRepositoryError> {
        Ok(Vec::new())
    }

    async fn event_tallies(
        &self,
        scope: &EventScope,
    ) -> Result<Vec<EventTally>, AnalyticsRepositoryError> {
        let state = self.lock();
        Ok(state
            .events
            .values()
            .filter(|event| {
                scope.lecturer_id.is_none_or(|id| event.lecturer_id == Some(id))
                    && scope
                        .course_code
                        .as_deref()
                        .is_none_or(|code| event.course_code == code)
                    && scope
                        .department
                        .as_deref()
                        .is_none_or(|department| event.department == department)
                    && scope
                        .active_at
                        .is_none_or(|now| event.start_time <= now && now <= event.end_time)
            })
            .map(|event| {
                let rows: Vec<&AttendanceRecord> = state
                    .attendances
                    .values()
                    .filter(|row| row.event_id == event.id)
                    .collect();
                let distinct: BTreeSet<i64> = rows.iter().map(|row| row.student_id).collect();
                EventTally {
                    event_id: event.id,
                    course_code: event.course_code.clone(),
                    course_name: event.course_name.clone(),
                    department: event.department.clone(),
                    venue: event.venue.clone(),
                    lecturer_name: event
                        .lecturer_id
                        .and_then(|id| state.lecturers.get(&id))
                        .map(|lecturer| lecturer.name.clone())
                        .unwrap_or_default(),
                    start_time: event.start_time,
                    end_time: event.end_time,
                    created_at: event.created_at,
                    total: count(rows.len()),
                    present: count(rows.iter().filter(|row| present(row)).count()),
                    distinct_students: count(distinct.len()),
                }
            })
            .collect())
    }

    async fn institution_counts(&self) -> Result<InstitutionCounts, AnalyticsRepositoryError> {
        let state = self.lock();
        let departments: BTreeSet<&str> = state
            .events
            .values()
            .map(|event| event.department.as_str())
            .chain(state.lecturers.values().map(|l| l.department.as_str()))
            .filter(|department| !department.is_empty())
            .collect();
        Ok(InstitutionCounts {
            students: count(state.students.len()),
            lecturers: count(state.lecturers.len()),
            departments: count(departments.len()),
            events: count(state.events.len()),
        })
    }

    async fn lecturer_count(
        &self,
        department: Option<String>,
    ) -> Result<i64, AnalyticsRepositoryError> {
        Ok(count(
            self.lock()
                .lecturers
                .values()
                .filter(|lecturer| {
                    department
                        .as_deref()
                        .is_none_or(|department| lecturer.department == department)
                })
                .count(),
        ))
    }

    async fn activity_since(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<DailyActivity, AnalyticsRepositoryError> {
        let state = self.lock();
        Ok(DailyActivity {
            events_created: count(
                state
                    .events
                    .values()
                    .filter(|event| event.created_at >= since)
                    .count(),
            ),
            checkins: count(
                state
                    .attendances
                    .values()
                    .filter(|row| row.marked_time >= since)
                    .count(),
            ),
            active_sessions: count(
                state
                    .events
                    .values()
                    .filter(|event| event.start_time <= now && now <= event.end_time)
                    .count(),
            ),
            last_check_in: state.attendances.values().map(|row| row.marked_time).max(),
        })
    }

    async fn department_tallies(&self) -> Result<Vec<DepartmentTally>, AnalyticsRepositoryError> {
        Ok(Vec::new())
    }

    async fn duplicate_checkins(
        &self,
        _window_seconds: f64,
    ) -> Result<Vec<DuplicateCheckin>, AnalyticsRepositoryError> {
        // The uniqueness check in `record_attendance` rules duplicates out.
        Ok(Vec::new())
    }
}
