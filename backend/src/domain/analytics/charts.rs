//! Chart-ready shapes for trend and per-course comparison.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::reports::{ChartData, ChartDataset, ChartReport, CourseRate, TrendPoint};

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Weekly trend line.
    Line,
    /// Per-course comparison bars.
    Bar,
}

impl ChartKind {
    /// Canonical path segment.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

/// Error returned for an unsupported chart kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported chart type: {0}")]
pub struct UnknownChartKind(pub String);

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "line" | "line_trend" => Ok(Self::Line),
            "bar" | "bar_comparison" => Ok(Self::Bar),
            other => Err(UnknownChartKind(other.to_owned())),
        }
    }
}

/// Build a trend line chart.
pub fn line_chart(trend: &[TrendPoint], now: DateTime<Utc>) -> ChartReport {
    let labels: Vec<String> = trend.iter().map(|p| p.period.clone()).collect();
    let data = trend.iter().map(|p| p.attendance_rate).collect();
    chart(
        ChartKind::Line,
        "Attendance Trend",
        "Attendance rate over time",
        labels,
        ChartDataset {
            label: "Attendance Rate".to_owned(),
            data,
            color: "#2ecc71".to_owned(),
        },
        now,
    )
}

/// Build a per-course comparison bar chart.
pub fn bar_chart(courses: &[CourseRate], now: DateTime<Utc>) -> ChartReport {
    let labels: Vec<String> = courses.iter().map(|c| c.course_name.clone()).collect();
    let data = courses.iter().map(|c| c.attendance_rate).collect();
    chart(
        ChartKind::Bar,
        "Course Comparison",
        "Attendance rates across courses",
        labels,
        ChartDataset {
            label: "Attendance %".to_owned(),
            data,
            color: "#3498db".to_owned(),
        },
        now,
    )
}

fn chart(
    kind: ChartKind,
    title: &str,
    description: &str,
    labels: Vec<String>,
    dataset: ChartDataset,
    now: DateTime<Utc>,
) -> ChartReport {
    ChartReport {
        chart_type: kind.as_str().to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        data_points: ChartData {
            labels: labels.clone(),
            datasets: vec![dataset],
        },
        labels,
        generated_at: now,
    }
}
