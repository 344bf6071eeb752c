//! Analytics domain service.
//!
//! [`AnalyticsService`] turns repository tallies into reports. Failures of a
//! report's primary query propagate; secondary sections (trends, streaks,
//! peer comparisons) fall back to empty values and log a warning.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::warn;

use crate::domain::analytics::{
    AdminOverviewReport, AnalyticsPolicy, AnomalyReport, AttendanceDistribution, AttendanceScope,
    AttendanceTally, BenchmarkReport, ChartKind, ChartReport, CourseIdentity,
    CoursePerformanceReport, DepartmentDeepDiveReport, DepartmentStat, DepartmentsReport,
    EntityId, EntityType, EventScope, Granularity, GoalTracking, HistoricalComparison,
    InsightReport, LecturerCoursesReport, LecturerInsightInput, LecturerProfile,
    LecturerSummaryReport, PredictionReport, RealtimeReport, StudentMetricsReport, StudentTally,
    SystemHealth, SystemUsageStats, TemporalReport, TrendPoint, attendance_rate,
    attendance_streak, bar_chart, course_enrollment, course_metrics, course_rates, day_of_week,
    duplicate_anomalies, engagement_score, heatmap, is_at_risk, lecturer_events,
    lecturer_insights, line_chart, mean, mean_event_rate, most_attended_course,
    ongoing_sessions, peer_standing, percentile_rank, period_change, punctuality_score, round2,
    std_dev, student_insights, trend_points, venue_utilization,
};
use crate::domain::ports::{
    AnalyticsEntity, AnalyticsQuery, AnalyticsRepository, AnalyticsRepositoryError,
    TemporalRequest,
};
use crate::domain::{Error, StudentProfile};

fn map_repository_error(error: AnalyticsRepositoryError) -> Error {
    match error {
        AnalyticsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("analytics repository unavailable: {message}"))
        }
        AnalyticsRepositoryError::Query { message } => {
            Error::internal(format!("analytics repository error: {message}"))
        }
    }
}

/// Unwrap a secondary section, logging and defaulting on failure.
fn degrade<T: Default>(section: &'static str, result: Result<T, AnalyticsRepositoryError>) -> T {
    result.unwrap_or_else(|err| {
        warn!(section, error = %err, "analytics section degraded");
        T::default()
    })
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    day_start(today) - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

fn count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// Analytics service implementing [`AnalyticsQuery`].
#[derive(Clone)]
pub struct AnalyticsService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    policy: AnalyticsPolicy,
    started_at: DateTime<Utc>,
}

impl<R> AnalyticsService<R> {
    /// Create a service with the default [`AnalyticsPolicy`].
    ///
    /// The clock's current reading is taken as the process start for uptime
    /// reporting.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        let started_at = clock.utc();
        Self {
            repo,
            clock,
            policy: AnalyticsPolicy::default(),
            started_at,
        }
    }

    /// Replace the thresholds and windows.
    #[must_use]
    pub fn with_policy(mut self, policy: AnalyticsPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

impl<R> AnalyticsService<R>
where
    R: AnalyticsRepository,
{
    async fn student_profile(&self, student_id: i64) -> Result<StudentProfile, Error> {
        self.repo
            .find_student(student_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("student {student_id} not found")))
    }

    async fn lecturer_profile(&self, lecturer_id: i64) -> Result<LecturerProfile, Error> {
        self.repo
            .find_lecturer(lecturer_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("lecturer {lecturer_id} not found")))
    }

    async fn course_identity(&self, course_code: &str) -> Result<CourseIdentity, Error> {
        self.repo
            .find_course(course_code)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("course {course_code} not found")))
    }

    async fn tally(&self, scope: &AttendanceScope) -> Result<AttendanceTally, Error> {
        self.repo
            .attendance_tally(scope, self.policy.late_after_seconds())
            .await
            .map_err(map_repository_error)
    }

    async fn weekly_trend(
        &self,
        scope: AttendanceScope,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendPoint>, AnalyticsRepositoryError> {
        let periods = self
            .repo
            .period_tallies(&scope.marked_from(now - window), Granularity::Weekly)
            .await?;
        Ok(trend_points(&periods))
    }

    async fn students_reached(&self, scope: &AttendanceScope) -> i64 {
        count(degrade("total_students_reached", self.repo.student_tallies(scope).await).len())
    }

    /// Rate over the prediction window; zero when nothing was marked in it.
    async fn forecast(&self, scope: AttendanceScope, now: DateTime<Utc>) -> Result<f64, Error> {
        let recent = self
            .tally(&scope.marked_from(now - self.policy.prediction_window))
            .await?;
        Ok(recent.rate())
    }

    fn prediction(
        &self,
        entity_type: EntityType,
        entity_id: EntityId,
        entity_name: String,
        rate: f64,
        now: DateTime<Utc>,
    ) -> PredictionReport {
        let mut risk_factors = Vec::new();
        let mut recommended_actions = Vec::new();
        if rate < self.policy.at_risk_threshold {
            risk_factors.push(format!(
                "Attendance below {}% threshold",
                self.policy.at_risk_threshold
            ));
            recommended_actions.push("Schedule an academic advising session".to_owned());
        }
        if rate < self.policy.critical_threshold {
            risk_factors.push(format!(
                "Critically low attendance (below {}%)",
                self.policy.critical_threshold
            ));
            recommended_actions
                .push("Escalate to the department for immediate intervention".to_owned());
        }
        if recommended_actions.is_empty() {
            recommended_actions.push("Maintain current attendance pattern".to_owned());
        }

        PredictionReport {
            entity_type: entity_type.as_str().to_owned(),
            entity_id,
            entity_name,
            forecasted_attendance: round2(rate),
            current_attendance: round2(rate),
            confidence_level: self.policy.prediction_confidence,
            risk_factors,
            recommended_actions,
            generated_at: now,
        }
    }

    async fn historical_comparison(
        &self,
        scope: &AttendanceScope,
        now: DateTime<Utc>,
    ) -> HistoricalComparison {
        let period = self.policy.comparison_period;
        let late = self.policy.late_after_seconds();
        let current = degrade(
            "historical_comparison",
            self.repo
                .attendance_tally(&scope.clone().marked_from(now - period), late)
                .await,
        );
        let previous = degrade(
            "historical_comparison",
            self.repo
                .attendance_tally(
                    &scope
                        .clone()
                        .marked_from(now - period - period)
                        .marked_before(now - period),
                    late,
                )
                .await,
        );
        let (change_percent, trend_direction) = period_change(current.rate(), previous.rate());
        HistoricalComparison {
            current_period: current.rate(),
            previous_period: previous.rate(),
            change_percent,
            trend_direction,
        }
    }

    async fn benchmark_against(
        &self,
        entity_type: EntityType,
        entity_id: EntityId,
        entity_name: String,
        scope: AttendanceScope,
        peer_rates: &[f64],
    ) -> Result<BenchmarkReport, Error> {
        let now = self.now();
        let value = self.tally(&scope).await?.rate();
        let peer_average = round2(mean(peer_rates));
        let target = self.policy.at_risk_threshold;

        Ok(BenchmarkReport {
            entity_type: entity_type.as_str().to_owned(),
            entity_id,
            entity_name,
            performance_value: value,
            peer_average,
            peer_std_dev: round2(std_dev(peer_rates)),
            percentile_rank: percentile_rank(value, peer_average),
            performance_vs_peers: peer_standing(value, peer_average),
            historical_comparison: self.historical_comparison(&scope, now).await,
            goal_tracking: GoalTracking {
                target_attendance: target,
                actual_attendance: value,
                goal_met_status: if value >= target { "on_track" } else { "at_risk" }.to_owned(),
            },
            generated_at: now,
        })
    }
}

#[async_trait]
impl<R> AnalyticsQuery for AnalyticsService<R>
where
    R: AnalyticsRepository,
{
    async fn student_metrics(&self, student_id: i64) -> Result<StudentMetricsReport, Error> {
        let now = self.now();
        let student = self.student_profile(student_id).await?;
        let scope = AttendanceScope::all().student(student_id);
        let tally = self.tally(&scope).await?;
        let rate = tally.rate();

        let present_dates = degrade(
            "attendance_streak",
            self.repo.present_dates(student_id).await,
        );
        let courses = degrade("per_course_rates", self.repo.course_tallies(&scope).await);
        let peers = degrade(
            "class_average_comparison",
            self.repo.student_tallies(&AttendanceScope::all()).await,
        );
        let trend = degrade(
            "attendance_trend",
            self.weekly_trend(scope, self.policy.student_trend_window, now)
                .await,
        );

        let class_average_comparison = if peers.is_empty() {
            0.0
        } else {
            let peer_rates: Vec<f64> = peers.iter().map(StudentTally::rate).collect();
            round2(rate - mean(&peer_rates))
        };
        let punctuality = punctuality_score(tally.late, tally.total);

        Ok(StudentMetricsReport {
            student_id,
            student_name: student.name,
            matric_number: student.matric_number,
            overall_attendance_rate: rate,
            total_sessions: tally.total,
            total_present: tally.present,
            total_absent: tally.total - tally.present,
            total_late: tally.late,
            attendance_streak: attendance_streak(&present_dates, now.date_naive()),
            late_checkin_frequency: tally.late,
            class_average_comparison,
            at_risk_status: is_at_risk(rate, &self.policy),
            engagement_score: engagement_score(rate, punctuality, &self.policy),
            per_course_rates: course_rates(&courses),
            attendance_trend: trend,
            generated_at: now,
        })
    }

    async fn student_insights(&self, student_id: i64) -> Result<InsightReport, Error> {
        let metrics = self.student_metrics(student_id).await?;
        Ok(student_insights(&metrics, &self.policy, self.now()))
    }

    async fn lecturer_courses(&self, lecturer_id: i64) -> Result<LecturerCoursesReport, Error> {
        let now = self.now();
        let lecturer = self.lecturer_profile(lecturer_id).await?;
        let events = self
            .repo
            .event_tallies(&EventScope::all().lecturer(lecturer_id))
            .await
            .map_err(map_repository_error)?;
        let scope = AttendanceScope::all().lecturer(lecturer_id);
        let total_students_reached = self.students_reached(&scope).await;
        let trend = degrade(
            "attendance_trend",
            self.weekly_trend(scope, self.policy.lecturer_trend_window, now)
                .await,
        );

        Ok(LecturerCoursesReport {
            lecturer_id,
            lecturer_name: lecturer.name,
            department: lecturer.department,
            total_events: count(events.len()),
            total_students_reached,
            average_attendance_rate: mean_event_rate(&events),
            most_attended_course: most_attended_course(&events),
            course_metrics: course_metrics(&events),
            attendance_trend: trend,
            events: lecturer_events(&events, now),
            generated_at: now,
        })
    }

    async fn lecturer_summary(&self, lecturer_id: i64) -> Result<LecturerSummaryReport, Error> {
        let now = self.now();
        let lecturer = self.lecturer_profile(lecturer_id).await?;
        let events = self
            .repo
            .event_tallies(&EventScope::all().lecturer(lecturer_id))
            .await
            .map_err(map_repository_error)?;
        let scope = AttendanceScope::all().lecturer(lecturer_id);
        let total_students_reached = self.students_reached(&scope).await;
        let trend = degrade(
            "attendance_trend",
            self.weekly_trend(scope, self.policy.lecturer_trend_window, now)
                .await,
        );

        let week_from = week_start(now);
        let week_until = week_from + Duration::weeks(1);
        let today = now.date_naive();
        let sessions_this_week = events
            .iter()
            .filter(|e| e.start_time >= week_from && e.start_time < week_until)
            .count();
        let sessions_today = events
            .iter()
            .filter(|e| e.start_time.date_naive() == today)
            .count();
        let average_attendance_rate = mean_event_rate(&events);
        let insights = lecturer_insights(
            &LecturerInsightInput {
                lecturer_id,
                lecturer_name: &lecturer.name,
                average_attendance: average_attendance_rate,
                total_courses: count(course_metrics(&events).len()),
                sessions_created: count(events.len()),
            },
            now,
        );

        Ok(LecturerSummaryReport {
            lecturer_id,
            lecturer_name: lecturer.name,
            total_events_created: count(events.len()),
            total_students_reached,
            average_attendance_rate,
            sessions_this_week: count(sessions_this_week),
            sessions_today: count(sessions_today),
            most_attended_course: most_attended_course(&events),
            attendance_trend: trend,
            insights,
            generated_at: now,
        })
    }

    async fn course_performance(
        &self,
        lecturer_id: i64,
        course_code: String,
    ) -> Result<CoursePerformanceReport, Error> {
        let now = self.now();
        let lecturer = self.lecturer_profile(lecturer_id).await?;
        let events = self
            .repo
            .event_tallies(
                &EventScope::all()
                    .lecturer(lecturer_id)
                    .course(course_code.clone()),
            )
            .await
            .map_err(map_repository_error)?;
        let Some(first) = events.first() else {
            return Err(Error::not_found(format!(
                "no sessions found for course {course_code}"
            )));
        };

        let scope = AttendanceScope::all()
            .lecturer(lecturer_id)
            .course(course_code.clone());
        let tally = self.tally(&scope).await?;
        let students = degrade(
            "attendance_distribution",
            self.repo.student_tallies(&scope).await,
        );
        let rates: Vec<f64> = students.iter().map(StudentTally::rate).collect();
        let students_at_risk = rates
            .iter()
            .filter(|rate| is_at_risk(**rate, &self.policy))
            .count();

        Ok(CoursePerformanceReport {
            course_name: first.course_name.clone(),
            department: first.department.clone(),
            course_code,
            lecturer_name: lecturer.name,
            session_count: count(events.len()),
            student_count: count(students.len()),
            overall_attendance_rate: tally.rate(),
            attendance_distribution: AttendanceDistribution::from_rates(rates),
            students_at_risk: count(students_at_risk),
            average_checkin_delay_minutes: tally.average_delay_minutes.round() as i64,
            late_arrivals_count: tally.late,
            generated_at: now,
        })
    }

    async fn admin_overview(&self) -> Result<AdminOverviewReport, Error> {
        let now = self.now();
        let counts = self
            .repo
            .institution_counts()
            .await
            .map_err(map_repository_error)?;
        let events = self
            .repo
            .event_tallies(&EventScope::all())
            .await
            .map_err(map_repository_error)?;

        let (database_status, activity) =
            match self.repo.activity_since(day_start(now.date_naive()), now).await {
                Ok(activity) => ("healthy", activity),
                Err(err) => {
                    warn!(section = "system_health", error = %err, "analytics section degraded");
                    ("degraded", Default::default())
                }
            };
        let uptime_seconds = (now - self.started_at).num_seconds().max(0);

        Ok(AdminOverviewReport {
            overall_attendance_rate: mean_event_rate(&events),
            total_active_sessions: activity.active_sessions,
            total_students: counts.students,
            total_lecturers: counts.lecturers,
            total_departments: counts.departments,
            total_events: counts.events,
            events_created_today: activity.events_created,
            total_checkins_today: activity.checkins,
            system_health: SystemHealth {
                database_status: database_status.to_owned(),
                last_check_in: activity.last_check_in,
                uptime_hours: round2(uptime_seconds as f64 / 3600.0),
            },
            generated_at: now,
        })
    }

    async fn departments(&self) -> Result<DepartmentsReport, Error> {
        let rows = self
            .repo
            .department_tallies()
            .await
            .map_err(map_repository_error)?;
        let departments = rows
            .into_iter()
            .map(|row| DepartmentStat {
                average_attendance_rate: attendance_rate(row.present, row.total),
                department: row.department,
                total_students: row.student_count,
                total_lecturers: row.lecturer_count,
                total_events: row.event_count,
                total_courses: row.course_count,
                total_check_ins: row.total,
            })
            .collect();
        Ok(DepartmentsReport {
            departments,
            generated_at: self.now(),
        })
    }

    async fn department_deep_dive(
        &self,
        department: String,
    ) -> Result<DepartmentDeepDiveReport, Error> {
        let now = self.now();
        let department = department.trim().to_owned();
        if department.is_empty() {
            return Err(Error::invalid_request("department is required")
                .with_details(json!({ "field": "department", "code": "missing_field" })));
        }

        let events = self
            .repo
            .event_tallies(&EventScope::all().department(department.clone()))
            .await
            .map_err(map_repository_error)?;
        let lecturer_count = degrade(
            "lecturer_count",
            self.repo.lecturer_count(Some(department.clone())).await,
        );
        if events.is_empty() && lecturer_count == 0 {
            return Err(Error::not_found(format!(
                "department {department} not found"
            )));
        }

        let scope = AttendanceScope::all().department(department.clone());
        let tally = self.tally(&scope).await?;
        let courses = degrade(
            "course_enrollment_vs_attendance",
            self.repo.course_tallies(&scope).await,
        );
        let student_count = self.students_reached(&scope).await;
        let trend = degrade(
            "attendance_trend",
            self.weekly_trend(scope, self.policy.department_trend_window, now)
                .await,
        );
        let course_count = events
            .iter()
            .map(|e| e.course_code.as_str())
            .collect::<HashSet<_>>()
            .len();

        Ok(DepartmentDeepDiveReport {
            department_name: department,
            overall_attendance_rate: tally.rate(),
            student_count,
            lecturer_count,
            course_count: count(course_count),
            event_count: count(events.len()),
            attendance_trend: trend,
            course_enrollment_vs_attendance: course_enrollment(&courses),
            venue_utilization: venue_utilization(&events),
            generated_at: now,
        })
    }

    async fn realtime(&self) -> Result<RealtimeReport, Error> {
        let now = self.now();
        let midnight = day_start(now.date_naive());
        let live = self
            .repo
            .event_tallies(&EventScope::all().active_at(now))
            .await
            .map_err(map_repository_error)?;
        let activity = degrade(
            "system_usage_stats",
            self.repo.activity_since(midnight, now).await,
        );
        let today = degrade(
            "average_attendance_today",
            self.repo
                .attendance_tally(
                    &AttendanceScope::all().marked_from(midnight),
                    self.policy.late_after_seconds(),
                )
                .await,
        );

        Ok(RealtimeReport {
            active_sessions_now: count(live.len()),
            total_checkins_today: activity.checkins,
            average_attendance_today: today.rate(),
            ongoing_sessions: ongoing_sessions(&live),
            system_usage_stats: SystemUsageStats {
                qr_codes_generated_today: activity.events_created,
                checkins_processed_today: activity.checkins,
            },
            generated_at: now,
        })
    }

    async fn temporal(&self, request: TemporalRequest) -> Result<TemporalReport, Error> {
        let now = self.now();
        let end = request.end.unwrap_or_else(|| now.date_naive());
        let start = request
            .start
            .unwrap_or_else(|| end - self.policy.temporal_default_window);
        if end < start {
            return Err(Error::invalid_request("end must not be before start")
                .with_details(json!({ "field": "end", "code": "end_before_start" })));
        }

        let scope = AttendanceScope::all()
            .marked_from(day_start(start))
            .marked_before(day_start(end.succ_opt().unwrap_or(end)));
        let cells = self
            .repo
            .heatmap_tallies(&scope)
            .await
            .map_err(map_repository_error)?;
        let periods = degrade(
            "seasonal_trends",
            self.repo.period_tallies(&scope, request.granularity).await,
        );

        Ok(TemporalReport {
            granularity: request.granularity.as_str().to_owned(),
            start_date: start,
            end_date: end,
            attendance_heatmap: heatmap(&cells),
            seasonal_trends: trend_points(&periods),
            day_of_week_analysis: day_of_week(&cells),
            holiday_impact: Vec::new(),
            generated_at: now,
        })
    }

    async fn anomalies(&self) -> Result<AnomalyReport, Error> {
        let now = self.now();
        let window_seconds = self.policy.duplicate_window.num_milliseconds() as f64 / 1000.0;
        let hits = self
            .repo
            .duplicate_checkins(window_seconds)
            .await
            .map_err(map_repository_error)?;
        let anomalies = duplicate_anomalies(&hits, now);
        let critical = anomalies.iter().filter(|a| a.severity == "high").count();

        Ok(AnomalyReport {
            anomaly_count: count(anomalies.len()),
            critical_anomalies: count(critical),
            anomalies,
            generated_at: now,
        })
    }

    async fn predict_student(&self, student_id: i64) -> Result<PredictionReport, Error> {
        let now = self.now();
        let student = self.student_profile(student_id).await?;
        let rate = self
            .forecast(AttendanceScope::all().student(student_id), now)
            .await?;
        Ok(self.prediction(
            EntityType::Student,
            EntityId::Numeric(student_id),
            student.name,
            rate,
            now,
        ))
    }

    async fn predict_course(&self, course_code: String) -> Result<PredictionReport, Error> {
        let now = self.now();
        let course = self.course_identity(&course_code).await?;
        let rate = self
            .forecast(AttendanceScope::all().course(course.course_code.clone()), now)
            .await?;
        Ok(self.prediction(
            EntityType::Course,
            EntityId::Code(course.course_code),
            course.course_name,
            rate,
            now,
        ))
    }

    async fn benchmark(&self, entity: AnalyticsEntity) -> Result<BenchmarkReport, Error> {
        match entity {
            AnalyticsEntity::Student(student_id) => {
                let student = self.student_profile(student_id).await?;
                let peers = self
                    .repo
                    .student_tallies(&AttendanceScope::all())
                    .await
                    .map_err(map_repository_error)?;
                let peer_rates: Vec<f64> = peers.iter().map(StudentTally::rate).collect();
                self.benchmark_against(
                    EntityType::Student,
                    EntityId::Numeric(student_id),
                    student.name,
                    AttendanceScope::all().student(student_id),
                    &peer_rates,
                )
                .await
            }
            AnalyticsEntity::Course(course_code) => {
                let course = self.course_identity(&course_code).await?;
                let peers = self
                    .repo
                    .course_tallies(&AttendanceScope::all())
                    .await
                    .map_err(map_repository_error)?;
                let peer_rates: Vec<f64> = peers.iter().map(|c| c.rate()).collect();
                self.benchmark_against(
                    EntityType::Course,
                    EntityId::Code(course.course_code.clone()),
                    course.course_name,
                    AttendanceScope::all().course(course.course_code),
                    &peer_rates,
                )
                .await
            }
            AnalyticsEntity::Lecturer(_) => Err(Error::invalid_request(
                "benchmark supports entity_type student or course",
            )
            .with_details(json!({ "field": "entity_type", "code": "unsupported" }))),
        }
    }

    async fn chart(
        &self,
        kind: ChartKind,
        entity: AnalyticsEntity,
    ) -> Result<ChartReport, Error> {
        let now = self.now();
        match (kind, entity) {
            (ChartKind::Line, AnalyticsEntity::Student(student_id)) => {
                self.student_profile(student_id).await?;
                let trend = self
                    .weekly_trend(
                        AttendanceScope::all().student(student_id),
                        self.policy.student_trend_window,
                        now,
                    )
                    .await
                    .map_err(map_repository_error)?;
                Ok(line_chart(&trend, now))
            }
            (ChartKind::Bar, AnalyticsEntity::Student(student_id)) => {
                self.student_profile(student_id).await?;
                let courses = self
                    .repo
                    .course_tallies(&AttendanceScope::all().student(student_id))
                    .await
                    .map_err(map_repository_error)?;
                Ok(bar_chart(&course_rates(&courses), now))
            }
            (ChartKind::Line, AnalyticsEntity::Course(course_code)) => {
                let course = self.course_identity(&course_code).await?;
                let trend = self
                    .weekly_trend(
                        AttendanceScope::all().course(course.course_code),
                        self.policy.student_trend_window,
                        now,
                    )
                    .await
                    .map_err(map_repository_error)?;
                Ok(line_chart(&trend, now))
            }
            (ChartKind::Bar, AnalyticsEntity::Lecturer(lecturer_id)) => {
                self.lecturer_profile(lecturer_id).await?;
                let courses = self
                    .repo
                    .course_tallies(&AttendanceScope::all().lecturer(lecturer_id))
                    .await
                    .map_err(map_repository_error)?;
                Ok(bar_chart(&course_rates(&courses), now))
            }
            (kind, entity) => Err(Error::invalid_request(format!(
                "{} chart is not available for entity_type {}",
                kind.as_str(),
                entity.entity_type().as_str()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "analytics_service_tests.rs"]
mod tests;
