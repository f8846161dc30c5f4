use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::core::config::AttendanceSettings;
use crate::core::time::to_primitive_utc;
use crate::db::models::{AttendanceCode, Student};
use crate::repositories;
use crate::services::session_window::{self, SessionWindow};

#[derive(Debug, Error)]
pub(crate) enum CheckInError {
    #[error("no attendance codes are set")]
    CodesUnset,
    #[error("check-in window is closed")]
    WindowClosed,
    #[error("attendance code does not match")]
    CodeMismatch,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// The current window strictly selects which code is accepted; outside both
/// windows every code is rejected.
pub(crate) fn verify_code(
    window: SessionWindow,
    codes: &AttendanceCode,
    code: &str,
) -> Result<(), CheckInError> {
    let expected = match window {
        SessionWindow::Morning => codes.morning_code.as_deref(),
        SessionWindow::Afternoon => codes.afternoon_code.as_deref(),
        SessionWindow::Closed => return Err(CheckInError::WindowClosed),
    };

    match expected {
        Some(expected) if expected == code => Ok(()),
        _ => Err(CheckInError::CodeMismatch),
    }
}

/// Seat + code login. A valid code provisions a bare student row on first use
/// of a seat, or refreshes the existing row (status=online, attendance
/// stamped). The upsert is a single statement so concurrent logins for one
/// seat cannot create two rows.
pub(crate) async fn code_login(
    pool: &PgPool,
    rules: &AttendanceSettings,
    now: OffsetDateTime,
    seat_number: i32,
    code: &str,
) -> Result<Student, CheckInError> {
    let stored = repositories::attendance_codes::get(pool).await?.ok_or(CheckInError::CodesUnset)?;

    verify_code(session_window::classify(now, rules), &stored, code)?;

    let student = repositories::students::upsert_check_in(
        pool,
        &Uuid::new_v4().to_string(),
        seat_number,
        to_primitive_utc(now),
    )
    .await?;

    Ok(student)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::types::StudentStatus;
    use crate::test_support;
    use time::macros::datetime;

    fn codes(morning: Option<&str>, afternoon: Option<&str>) -> AttendanceCode {
        AttendanceCode {
            id: "default".to_string(),
            morning_code: morning.map(str::to_string),
            afternoon_code: afternoon.map(str::to_string),
            updated_at: primitive_now_utc(),
        }
    }

    #[test]
    fn morning_window_accepts_only_morning_code() {
        let stored = codes(Some("1234"), Some("5678"));
        assert!(verify_code(SessionWindow::Morning, &stored, "1234").is_ok());
        assert!(matches!(
            verify_code(SessionWindow::Morning, &stored, "5678"),
            Err(CheckInError::CodeMismatch)
        ));
        assert!(matches!(
            verify_code(SessionWindow::Morning, &stored, "9999"),
            Err(CheckInError::CodeMismatch)
        ));
    }

    #[test]
    fn afternoon_window_accepts_only_afternoon_code() {
        let stored = codes(Some("1234"), Some("5678"));
        assert!(verify_code(SessionWindow::Afternoon, &stored, "5678").is_ok());
        assert!(matches!(
            verify_code(SessionWindow::Afternoon, &stored, "1234"),
            Err(CheckInError::CodeMismatch)
        ));
    }

    #[test]
    fn closed_window_rejects_correct_codes() {
        let stored = codes(Some("1234"), Some("5678"));
        assert!(matches!(
            verify_code(SessionWindow::Closed, &stored, "1234"),
            Err(CheckInError::WindowClosed)
        ));
        assert!(matches!(
            verify_code(SessionWindow::Closed, &stored, "5678"),
            Err(CheckInError::WindowClosed)
        ));
    }

    #[test]
    fn unset_code_never_matches() {
        let stored = codes(None, Some("5678"));
        assert!(matches!(
            verify_code(SessionWindow::Morning, &stored, "1234"),
            Err(CheckInError::CodeMismatch)
        ));
    }

    #[tokio::test]
    async fn code_login_provisions_and_refreshes_by_seat() {
        let ctx = test_support::setup_test_context().await;
        test_support::seed_codes(ctx.state.db(), Some("1234"), Some("5678")).await;
        let rules = *ctx.state.settings().attendance();

        // 01:00 UTC is 10:00 local, morning window.
        let first_login = datetime!(2025-06-02 01:00 UTC);
        let student =
            code_login(ctx.state.db(), &rules, first_login, 5, "1234").await.expect("login");
        assert_eq!(student.seat_number, 5);
        assert_eq!(student.status, StudentStatus::Online);
        assert!(student.email.is_none());
        assert_eq!(student.last_active, to_primitive_utc(first_login));
        assert_eq!(student.attendance_verified, Some(to_primitive_utc(first_login)));

        // A later afternoon login refreshes the same row instead of
        // creating a second one for the seat.
        let second_login = datetime!(2025-06-02 05:00 UTC);
        let refreshed =
            code_login(ctx.state.db(), &rules, second_login, 5, "5678").await.expect("login");
        assert_eq!(refreshed.id, student.id);
        assert_eq!(refreshed.attendance_verified, Some(to_primitive_utc(second_login)));
    }
}
