//! Folding raw tallies into report sections.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use super::metrics::{attendance_rate, mean, round2};
use super::reports::{
    Anomaly, CourseEnrollment, CourseMetrics, CourseRate, DayOfWeekMetrics, HeatmapCell,
    LecturerEventSummary, MostAttendedCourse, OngoingSession, TimeSlotMetrics, TrendPoint,
    VenueUtilization,
};
use super::tallies::{CourseTally, DuplicateCheckin, EventTally, HeatmapTally, PeriodTally};
use crate::domain::WindowPosition;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn weekday_name(iso_weekday: u32) -> &'static str {
    let index = iso_weekday.clamp(1, 7) - 1;
    WEEKDAYS[index as usize]
}

fn time_slot(hour: u32) -> String {
    format!("{hour:02}:00")
}

/// Trend points in period order.
pub fn trend_points(periods: &[PeriodTally]) -> Vec<TrendPoint> {
    periods
        .iter()
        .map(|p| TrendPoint {
            period: p.period.clone(),
            attendance_rate: attendance_rate(p.present, p.total),
            sessions_attended: p.present,
            total_sessions: p.total,
            average_checkin_delay_minutes: p.average_delay_minutes.round() as i64,
        })
        .collect()
}

/// Per-course rates in course-code order.
pub fn course_rates(courses: &[CourseTally]) -> Vec<CourseRate> {
    courses
        .iter()
        .map(|c| CourseRate {
            course_code: c.course_code.clone(),
            course_name: c.course_name.clone(),
            department: c.department.clone(),
            attendance_rate: c.rate(),
            sessions_attended: c.present,
            total_sessions: c.total,
        })
        .collect()
}

/// Enrolment against attendance per course.
pub fn course_enrollment(courses: &[CourseTally]) -> Vec<CourseEnrollment> {
    courses
        .iter()
        .map(|c| CourseEnrollment {
            course_code: c.course_code.clone(),
            course_name: c.course_name.clone(),
            enrolled: c.enrolled,
            actual_attended: c.attended,
            attendance_rate: attendance_rate(c.attended, c.enrolled),
        })
        .collect()
}

/// Mean of per-event rates over events that have attendance rows.
pub fn mean_event_rate(events: &[EventTally]) -> f64 {
    let rates: Vec<f64> = events
        .iter()
        .filter(|e| e.total > 0)
        .map(EventTally::rate)
        .collect();
    round2(mean(&rates))
}

/// Per-course rollup of event tallies, best mean rate first.
pub fn course_metrics(events: &[EventTally]) -> Vec<CourseMetrics> {
    let mut grouped: BTreeMap<&str, Vec<&EventTally>> = BTreeMap::new();
    for event in events.iter().filter(|e| !e.course_code.is_empty()) {
        grouped.entry(event.course_code.as_str()).or_default().push(event);
    }

    let mut metrics: Vec<CourseMetrics> = grouped
        .into_iter()
        .map(|(code, events)| {
            let rates: Vec<f64> = events.iter().map(|e| e.rate()).collect();
            CourseMetrics {
                course_code: code.to_owned(),
                course_name: events
                    .first()
                    .map(|e| e.course_name.clone())
                    .unwrap_or_default(),
                attendance_average: round2(mean(&rates)),
                session_count: events.len() as i64,
                student_count: events.iter().map(|e| e.distinct_students).sum(),
            }
        })
        .collect();
    metrics.sort_by(|a, b| {
        b.attendance_average
            .total_cmp(&a.attendance_average)
            .then_with(|| a.course_code.cmp(&b.course_code))
    });
    metrics
}

/// Course with the highest mean per-event rate.
pub fn most_attended_course(events: &[EventTally]) -> Option<MostAttendedCourse> {
    course_metrics(events)
        .into_iter()
        .next()
        .map(|c| MostAttendedCourse {
            course_code: c.course_code,
            course_name: c.course_name,
            avg_attendance: c.attendance_average,
        })
}

/// Event list with `active`/`expired` status at `now`.
pub fn lecturer_events(events: &[EventTally], now: DateTime<Utc>) -> Vec<LecturerEventSummary> {
    events
        .iter()
        .map(|e| LecturerEventSummary {
            event_id: e.event_id,
            course_name: e.course_name.clone(),
            course_code: e.course_code.clone(),
            department: e.department.clone(),
            venue: e.venue.clone(),
            start_time: e.start_time,
            end_time: e.end_time,
            status: match WindowPosition::of(e.start_time, e.end_time, now) {
                WindowPosition::AfterEnd => "expired",
                WindowPosition::BeforeStart | WindowPosition::Open => "active",
            }
            .to_owned(),
            total_attendance: e.distinct_students,
            created_at: e.created_at,
        })
        .collect()
}

/// Sessions and mean present count per venue.
pub fn venue_utilization(events: &[EventTally]) -> Vec<VenueUtilization> {
    let mut grouped: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
    for event in events {
        let entry = grouped.entry(event.venue.as_str()).or_default();
        entry.0 += 1;
        entry.1 += event.present;
    }
    grouped
        .into_iter()
        .map(|(venue, (sessions, present))| VenueUtilization {
            venue: venue.to_owned(),
            sessions_held: sessions,
            average_attendance: if sessions > 0 { present / sessions } else { 0 },
        })
        .collect()
}

/// Sessions open now.
pub fn ongoing_sessions(events: &[EventTally]) -> Vec<OngoingSession> {
    events
        .iter()
        .map(|e| OngoingSession {
            event_id: e.event_id,
            course_code: e.course_code.clone(),
            course_name: e.course_name.clone(),
            lecturer: e.lecturer_name.clone(),
            venue: e.venue.clone(),
            start_time: e.start_time,
            end_time: e.end_time,
            checkins_count: e.total,
        })
        .collect()
}

/// Heatmap cells in (weekday, hour) order.
pub fn heatmap(cells: &[HeatmapTally]) -> Vec<HeatmapCell> {
    cells
        .iter()
        .map(|c| HeatmapCell {
            day_of_week: weekday_name(c.weekday).to_owned(),
            time_slot: time_slot(c.hour),
            attendance_rate: attendance_rate(c.present, c.total),
            session_count: c.sessions,
            avg_checkin_time_minutes: c.average_delay_minutes.round() as i64,
        })
        .collect()
}

/// Weekday rollups of heatmap cells, Monday first.
pub fn day_of_week(cells: &[HeatmapTally]) -> Vec<DayOfWeekMetrics> {
    let mut grouped: BTreeMap<u32, Vec<&HeatmapTally>> = BTreeMap::new();
    for cell in cells {
        grouped.entry(cell.weekday).or_default().push(cell);
    }
    grouped
        .into_iter()
        .map(|(weekday, cells)| {
            let total: i64 = cells.iter().map(|c| c.total).sum();
            let present: i64 = cells.iter().map(|c| c.present).sum();
            let sessions: i64 = cells.iter().map(|c| c.sessions).sum();
            DayOfWeekMetrics {
                day_of_week: weekday_name(weekday).to_owned(),
                attendance_rate: attendance_rate(present, total),
                session_count: sessions,
                average_present: if sessions > 0 { present / sessions } else { 0 },
                time_slots: cells
                    .iter()
                    .map(|c| TimeSlotMetrics {
                        time_slot: time_slot(c.hour),
                        attendance_rate: attendance_rate(c.present, c.total),
                        session_count: c.sessions,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// One anomaly per (student, event) pair, in first-seen order.
pub fn duplicate_anomalies(hits: &[DuplicateCheckin], now: DateTime<Utc>) -> Vec<Anomaly> {
    let mut seen = HashSet::new();
    hits.iter()
        .filter(|hit| seen.insert((hit.event_id, hit.student_id)))
        .map(|hit| Anomaly {
            id: format!("dup-{}-{}", hit.event_id, hit.student_id),
            anomaly_type: "duplicate_checkin".to_owned(),
            severity: "high".to_owned(),
            description: "Multiple check-ins detected for this event".to_owned(),
            student_id: hit.student_id,
            student_name: hit.student_name.clone(),
            event_id: hit.event_id,
            course_name: hit.course_name.clone(),
            detection_time: now,
            recommended_action: "Review for possible QR code sharing or technical glitch"
                .to_owned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for tally rollups.
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 27, h, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    fn event(id: i64, code: &str, venue: &str, total: i64, present: i64) -> EventTally {
        EventTally {
            event_id: id,
            course_code: code.into(),
            course_name: format!("{code} name"),
            department: "Computer Science".into(),
            venue: venue.into(),
            lecturer_name: "Dr Eze".into(),
            start_time: at(10),
            end_time: at(11),
            created_at: at(9),
            total,
            present,
            distinct_students: total,
        }
    }

    #[rstest]
    fn mean_event_rate_skips_empty_events() {
        let events = vec![
            event(1, "CSC301", "LT1", 4, 2),
            event(2, "CSC301", "LT1", 2, 2),
            event(3, "CSC302", "LT2", 0, 0),
        ];
        assert_eq!(mean_event_rate(&events), 75.0);
    }

    #[rstest]
    fn most_attended_course_picks_best_mean() {
        let events = vec![
            event(1, "CSC301", "LT1", 4, 2),
            event(2, "CSC302", "LT1", 2, 2),
        ];
        let top = most_attended_course(&events).expect("one course");
        assert_eq!(top.course_code, "CSC302");
        assert_eq!(top.avg_attendance, 100.0);
    }

    #[rstest]
    fn lecturer_events_are_marked_expired_after_window() {
        let events = vec![event(1, "CSC301", "LT1", 0, 0)];
        let open = lecturer_events(&events, at(10));
        let closed = lecturer_events(&events, at(11) + Duration::seconds(1));
        assert_eq!(open[0].status, "active");
        assert_eq!(closed[0].status, "expired");
    }

    #[rstest]
    #[case(at(9), "active")]
    #[case(at(11), "active")]
    #[case(at(11) + Duration::milliseconds(900), "active")]
    #[case(at(11) + Duration::seconds(1), "expired")]
    fn lecturer_event_status_follows_the_check_in_window(
        #[case] now: DateTime<Utc>,
        #[case] expected: &str,
    ) {
        let events = vec![event(1, "CSC301", "LT1", 0, 0)];
        assert_eq!(lecturer_events(&events, now)[0].status, expected);
    }

    #[rstest]
    fn venue_utilization_averages_present_counts() {
        let events = vec![
            event(1, "CSC301", "LT1", 10, 8),
            event(2, "CSC302", "LT1", 6, 4),
            event(3, "CSC303", "LT2", 0, 0),
        ];
        let venues = venue_utilization(&events);
        assert_eq!(venues.len(), 2);
        assert_eq!(venues[0].venue, "LT1");
        assert_eq!(venues[0].sessions_held, 2);
        assert_eq!(venues[0].average_attendance, 6);
    }

    #[rstest]
    fn weekday_rollup_names_days_and_slots() {
        let cells = vec![
            HeatmapTally {
                weekday: 1,
                hour: 9,
                total: 4,
                present: 3,
                sessions: 1,
                average_delay_minutes: 2.4,
            },
            HeatmapTally {
                weekday: 1,
                hour: 14,
                total: 4,
                present: 1,
                sessions: 1,
                average_delay_minutes: 7.6,
            },
        ];
        let days = day_of_week(&cells);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day_of_week, "Monday");
        assert_eq!(days[0].attendance_rate, 50.0);
        assert_eq!(days[0].time_slots[1].time_slot, "14:00");
        assert_eq!(heatmap(&cells)[1].avg_checkin_time_minutes, 8);
    }

    #[rstest]
    fn duplicate_hits_collapse_per_pair() {
        let hit = DuplicateCheckin {
            student_id: 5,
            student_name: "Ada Obi".into(),
            event_id: 42,
            course_name: "Compilers".into(),
            first_marked: at(10),
            second_marked: at(10) + Duration::seconds(20),
        };
        let anomalies = duplicate_anomalies(&[hit.clone(), hit], at(12));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].id, "dup-42-5");
        assert_eq!(anomalies[0].severity, "high");
    }
}
