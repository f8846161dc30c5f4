use time::{Date, OffsetDateTime, UtcOffset};

use crate::core::config::AttendanceSettings;

/// Time-of-day classification deciding which attendance code is accepted.
/// Pure function of the supplied instant; callers inject `now` so tests never
/// depend on the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionWindow {
    Morning,
    Afternoon,
    /// After the afternoon cutoff and before the next morning no code is
    /// accepted at all.
    Closed,
}

impl SessionWindow {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SessionWindow::Morning => "morning",
            SessionWindow::Afternoon => "afternoon",
            SessionWindow::Closed => "afternoon",
        }
    }

    pub(crate) fn is_open(self) -> bool {
        !matches!(self, SessionWindow::Closed)
    }
}

pub(crate) fn classify(now: OffsetDateTime, rules: &AttendanceSettings) -> SessionWindow {
    let hour = local(now, rules).hour();

    if hour < rules.morning_end_hour {
        SessionWindow::Morning
    } else if hour < rules.afternoon_end_hour {
        SessionWindow::Afternoon
    } else {
        SessionWindow::Closed
    }
}

/// Calendar date in classroom-local time, used for the "verified today" check.
pub(crate) fn local_date(now: OffsetDateTime, rules: &AttendanceSettings) -> Date {
    local(now, rules).date()
}

fn local(now: OffsetDateTime, rules: &AttendanceSettings) -> OffsetDateTime {
    let offset = UtcOffset::from_hms(rules.utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC);
    now.to_offset(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn kst_rules() -> AttendanceSettings {
        AttendanceSettings { utc_offset_hours: 9, morning_end_hour: 13, afternoon_end_hour: 21 }
    }

    #[test]
    fn morning_before_cutoff() {
        // 01:00 UTC is 10:00 local
        let now = datetime!(2025-06-02 01:00 UTC);
        assert_eq!(classify(now, &kst_rules()), SessionWindow::Morning);
    }

    #[test]
    fn afternoon_starts_at_cutoff() {
        // 04:00 UTC is 13:00 local
        let now = datetime!(2025-06-02 04:00 UTC);
        assert_eq!(classify(now, &kst_rules()), SessionWindow::Afternoon);
    }

    #[test]
    fn closed_from_evening_cutoff() {
        // 12:00 UTC is 21:00 local
        let now = datetime!(2025-06-02 12:00 UTC);
        assert_eq!(classify(now, &kst_rules()), SessionWindow::Closed);

        // 13:00 UTC is 22:00 local
        let later = datetime!(2025-06-02 13:00 UTC);
        assert_eq!(classify(later, &kst_rules()), SessionWindow::Closed);
    }

    #[test]
    fn offset_wraps_past_midnight() {
        // 16:00 UTC is 01:00 local next day
        let now = datetime!(2025-06-02 16:00 UTC);
        assert_eq!(classify(now, &kst_rules()), SessionWindow::Morning);
        assert_eq!(local_date(now, &kst_rules()), datetime!(2025-06-03 01:00 UTC).date());
    }

    #[test]
    fn closed_window_is_not_open() {
        assert!(SessionWindow::Morning.is_open());
        assert!(SessionWindow::Afternoon.is_open());
        assert!(!SessionWindow::Closed.is_open());
    }
}
