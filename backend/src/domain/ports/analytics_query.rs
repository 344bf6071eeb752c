//! Driving port for analytics reports.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::Error;
use crate::domain::analytics::{
    AdminOverviewReport, AnomalyReport, BenchmarkReport, ChartKind, ChartReport,
    CoursePerformanceReport, DepartmentDeepDiveReport, DepartmentsReport, EntityType,
    Granularity, InsightReport, LecturerCoursesReport, LecturerSummaryReport, PredictionReport,
    RealtimeReport, StudentMetricsReport, TemporalReport,
};

/// Entity a benchmark or chart is computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsEntity {
    /// Student by id.
    Student(i64),
    /// Course by code.
    Course(String),
    /// Lecturer by id.
    Lecturer(i64),
}

impl AnalyticsEntity {
    /// Build an entity from its type and raw identifier.
    ///
    /// # Examples
    /// ```
    /// use attendance::domain::analytics::EntityType;
    /// use attendance::domain::ports::AnalyticsEntity;
    ///
    /// let entity = AnalyticsEntity::parse(EntityType::Course, "CSC301").unwrap();
    /// assert_eq!(entity, AnalyticsEntity::Course("CSC301".into()));
    /// assert!(AnalyticsEntity::parse(EntityType::Student, "abc").is_err());
    /// ```
    pub fn parse(entity_type: EntityType, raw_id: &str) -> Result<Self, Error> {
        let raw_id = raw_id.trim();
        if raw_id.is_empty() {
            return Err(Error::invalid_request("entity_id is required"));
        }
        let numeric = || {
            raw_id
                .parse::<i64>()
                .map_err(|_| Error::invalid_request("entity_id must be an integer"))
        };
        Ok(match entity_type {
            EntityType::Student => Self::Student(numeric()?),
            EntityType::Lecturer => Self::Lecturer(numeric()?),
            EntityType::Course => Self::Course(raw_id.to_owned()),
        })
    }

    /// Kind of this entity.
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Student(_) => EntityType::Student,
            Self::Course(_) => EntityType::Course,
            Self::Lecturer(_) => EntityType::Lecturer,
        }
    }
}

/// Window and bucketing for temporal analytics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporalRequest {
    /// First day included; defaults to the policy window before `end`.
    pub start: Option<NaiveDate>,
    /// Last day included; defaults to today.
    pub end: Option<NaiveDate>,
    /// Trend bucketing.
    pub granularity: Granularity,
}

/// Driving port for every analytics report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsQuery: Send + Sync {
    /// Metrics for one student.
    async fn student_metrics(&self, student_id: i64) -> Result<StudentMetricsReport, Error>;

    /// Templated insight for one student.
    async fn student_insights(&self, student_id: i64) -> Result<InsightReport, Error>;

    /// A lecturer's own metrics and events.
    async fn lecturer_courses(&self, lecturer_id: i64) -> Result<LecturerCoursesReport, Error>;

    /// A lecturer's dashboard summary.
    async fn lecturer_summary(&self, lecturer_id: i64) -> Result<LecturerSummaryReport, Error>;

    /// Performance of one course taught by a lecturer.
    async fn course_performance(
        &self,
        lecturer_id: i64,
        course_code: String,
    ) -> Result<CoursePerformanceReport, Error>;

    /// Institution-wide overview.
    async fn admin_overview(&self) -> Result<AdminOverviewReport, Error>;

    /// Per-department breakdown.
    async fn departments(&self) -> Result<DepartmentsReport, Error>;

    /// Deep dive into one department.
    async fn department_deep_dive(
        &self,
        department: String,
    ) -> Result<DepartmentDeepDiveReport, Error>;

    /// Live dashboard.
    async fn realtime(&self) -> Result<RealtimeReport, Error>;

    /// Heatmap, weekday and seasonal rollups.
    async fn temporal(&self, request: TemporalRequest) -> Result<TemporalReport, Error>;

    /// Duplicate check-in scan.
    async fn anomalies(&self) -> Result<AnomalyReport, Error>;

    /// Naive forecast for one student.
    async fn predict_student(&self, student_id: i64) -> Result<PredictionReport, Error>;

    /// Naive forecast for one course.
    async fn predict_course(&self, course_code: String) -> Result<PredictionReport, Error>;

    /// Peer comparison for a student or course.
    async fn benchmark(&self, entity: AnalyticsEntity) -> Result<BenchmarkReport, Error>;

    /// Chart-ready data for an entity.
    async fn chart(&self, kind: ChartKind, entity: AnalyticsEntity)
    -> Result<ChartReport, Error>;
}
