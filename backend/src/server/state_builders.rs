//! Wiring from Diesel repositories to the HTTP handler state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use attendance::domain::{AdminService, AnalyticsService, AttendanceService};
use attendance::inbound::http::state::{HttpState, HttpStatePorts};
use attendance::outbound::jwt::JwtCodec;
use attendance::outbound::persistence::{
    DbPool, DieselAdminRepository, DieselAnalyticsRepository, DieselAttendanceRepository,
};
use attendance::outbound::qr::PngQrEncoder;

/// Build every driving port over `pool` with the system clock.
pub(crate) fn build_http_state(pool: &DbPool, credentials: JwtCodec) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let attendance = Arc::new(AttendanceService::new(
        Arc::new(DieselAttendanceRepository::new(pool.clone())),
        Arc::new(PngQrEncoder::new()),
        Arc::clone(&clock),
    ));
    let analytics = AnalyticsService::new(
        Arc::new(DieselAnalyticsRepository::new(pool.clone())),
        Arc::clone(&clock),
    );
    let admin = AdminService::new(
        Arc::new(DieselAdminRepository::new(pool.clone())),
        clock,
    );

    HttpState::new(HttpStatePorts {
        attendance: attendance.clone(),
        attendance_query: attendance,
        analytics: Arc::new(analytics),
        admin: Arc::new(admin),
        credentials: Arc::new(credentials),
    })
}
