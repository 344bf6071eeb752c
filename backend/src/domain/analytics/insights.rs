//! Thresholded prose templates over computed metrics.

use chrono::{DateTime, Utc};

use super::AnalyticsPolicy;
use super::reports::{
    EntityId, InsightReport, Recommendation, StudentMetricsReport, TrendExplanation,
};

const EXCELLENT_STUDENT_RATE: f64 = 80.0;
const EXCELLENT_LECTURER_RATE: f64 = 80.0;
const ACCEPTABLE_LECTURER_RATE: f64 = 70.0;

fn recommendation(action: &str, priority: &str, impact: &str, timeframe: &str) -> Recommendation {
    Recommendation {
        action: action.to_owned(),
        priority: priority.to_owned(),
        expected_impact: impact.to_owned(),
        timeframe: timeframe.to_owned(),
    }
}

fn trend(trend: &str, explanation: impl Into<String>, timeframe: &str) -> TrendExplanation {
    TrendExplanation {
        trend: trend.to_owned(),
        explanation: explanation.into(),
        timeframe: timeframe.to_owned(),
    }
}

/// Build the insight for one student's metrics.
///
/// # Examples
/// ```
/// use attendance::domain::analytics::{student_insights, StudentMetricsReport};
/// use attendance::domain::AnalyticsPolicy;
/// use chrono::Utc;
///
/// let metrics = StudentMetricsReport {
///     student_id: 3,
///     student_name: "Ada Obi".into(),
///     matric_number: "U2021/003".into(),
///     overall_attendance_rate: 60.0,
///     total_sessions: 5,
///     total_present: 3,
///     total_absent: 2,
///     total_late: 0,
///     attendance_streak: 0,
///     late_checkin_frequency: 0,
///     class_average_comparison: 0.0,
///     at_risk_status: true,
///     engagement_score: 0.0,
///     per_course_rates: vec![],
///     attendance_trend: vec![],
///     generated_at: Utc::now(),
/// };
/// let insight = student_insights(&metrics, &AnalyticsPolicy::default(), Utc::now());
/// assert!(insight.summary.contains("below the 75% threshold"));
/// ```
pub fn student_insights(
    metrics: &StudentMetricsReport,
    policy: &AnalyticsPolicy,
    now: DateTime<Utc>,
) -> InsightReport {
    let name = metrics.student_name.as_str();
    let rate = metrics.overall_attendance_rate;
    let mut key_takeaways = Vec::new();
    let mut trends = Vec::new();
    let mut recommendations = Vec::new();

    let summary = if rate >= EXCELLENT_STUDENT_RATE {
        key_takeaways.push("Excellent attendance record".to_owned());
        key_takeaways.push("High engagement score".to_owned());
        format!(
            "{name} has excellent attendance at {rate:.1}%. Keep up the consistency and engagement with courses."
        )
    } else if rate >= policy.at_risk_threshold {
        key_takeaways.push("Attendance is acceptable".to_owned());
        format!(
            "{name} has good attendance at {rate:.1}%. Continue to maintain consistency throughout the semester."
        )
    } else {
        key_takeaways.push("Attendance is at-risk".to_owned());
        recommendations.push(recommendation(
            "Attend more classes regularly",
            "high",
            "Improve overall attendance and engagement",
            "immediate",
        ));
        format!(
            "{name} has attendance at {rate:.1}%, which is below the {:.0}% threshold. Immediate action is recommended.",
            policy.at_risk_threshold
        )
    };

    if let [.., previous, last] = metrics.attendance_trend.as_slice() {
        if last.attendance_rate > previous.attendance_rate {
            trends.push(trend(
                "Attendance improving",
                "Recent weeks show improvement in attendance rates",
                "past 4 weeks",
            ));
        } else if last.attendance_rate < previous.attendance_rate {
            trends.push(trend(
                "Attendance declining",
                "Recent weeks show a decline in attendance",
                "past 4 weeks",
            ));
            recommendations.push(recommendation(
                "Investigate reasons for declining attendance",
                "high",
                "Reverse downward trend",
                "this week",
            ));
        }
    }

    if metrics.late_checkin_frequency > policy.frequent_late_count {
        trends.push(trend(
            "Frequent late arrivals",
            format!(
                "Student has {} late check-ins, indicating time management issues",
                metrics.late_checkin_frequency
            ),
            "this semester",
        ));
        recommendations.push(recommendation(
            "Arrive on time for classes",
            "medium",
            "Improve punctuality and class engagement",
            "ongoing",
        ));
    }

    InsightReport {
        entity_type: "student".to_owned(),
        entity_id: EntityId::Numeric(metrics.student_id),
        entity_name: metrics.student_name.clone(),
        summary,
        key_takeaways,
        trends,
        recommendations,
        generated_at: now,
    }
}

/// Inputs to the lecturer insight template.
#[derive(Debug, Clone, PartialEq)]
pub struct LecturerInsightInput<'a> {
    /// Lecturer id.
    pub lecturer_id: i64,
    /// Display name.
    pub lecturer_name: &'a str,
    /// Mean per-event rate.
    pub average_attendance: f64,
    /// Distinct course codes taught.
    pub total_courses: i64,
    /// Sessions (QR codes) generated.
    pub sessions_created: i64,
}

/// Build the insight for a lecturer's dashboard.
pub fn lecturer_insights(input: &LecturerInsightInput<'_>, now: DateTime<Utc>) -> InsightReport {
    let name = input.lecturer_name;
    let rate = input.average_attendance;
    let mut key_takeaways = Vec::new();
    let mut recommendations = Vec::new();

    let summary = if rate >= EXCELLENT_LECTURER_RATE {
        key_takeaways.push("High average class attendance".to_owned());
        key_takeaways.push(format!("Generated {} QR codes", input.sessions_created));
        format!(
            "{name} maintains excellent class attendance at {rate:.1}% across all courses. Classes are well-attended and engaging."
        )
    } else if rate >= ACCEPTABLE_LECTURER_RATE {
        recommendations.push(recommendation(
            "Consider strategies to improve student engagement",
            "medium",
            "Increase class attendance rates",
            "this month",
        ));
        format!(
            "{name} has acceptable class attendance at {rate:.1}%. There may be opportunities to improve student engagement."
        )
    } else {
        recommendations.push(recommendation(
            "Review teaching strategies and student engagement methods",
            "high",
            "Improve overall course attendance",
            "immediate",
        ));
        format!(
            "{name} has lower than desired class attendance at {rate:.1}%. Action to improve engagement is recommended."
        )
    };

    InsightReport {
        entity_type: "lecturer".to_owned(),
        entity_id: EntityId::Numeric(input.lecturer_id),
        entity_name: name.to_owned(),
        summary,
        key_takeaways,
        trends: vec![trend(
            &format!("Managing {} courses", input.total_courses),
            format!("Average attendance across all courses: {rate:.1}%"),
            "current semester",
        )],
        recommendations,
        generated_at: now,
    }
}
