use time::{format_description::well_known::Rfc3339, Date, OffsetDateTime, PrimitiveDateTime};

/// Source of "now" for window classification. Handlers read the clock from
/// application state so tests can pin it to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Clock {
    fixed: Option<OffsetDateTime>,
}

impl Clock {
    pub(crate) fn system() -> Self {
        Self { fixed: None }
    }

    #[cfg(test)]
    pub(crate) fn fixed(at: OffsetDateTime) -> Self {
        Self { fixed: Some(at) }
    }

    pub(crate) fn now_utc(&self) -> OffsetDateTime {
        self.fixed.unwrap_or_else(OffsetDateTime::now_utc)
    }
}

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn to_primitive_utc(value: OffsetDateTime) -> PrimitiveDateTime {
    let utc = value.to_offset(time::UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

pub(crate) fn format_date(value: Date) -> String {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    value.format(&format).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Time};

    #[test]
    fn format_primitive_outputs_utc_z() {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        let value = PrimitiveDateTime::new(date, time);
        assert_eq!(format_primitive(value), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn format_date_is_calendar_only() {
        let date = Date::from_calendar_date(2025, time::Month::June, 3).unwrap();
        assert_eq!(format_date(date), "2025-06-03");
    }

    #[test]
    fn fixed_clock_overrides_wall_time() {
        let at = time::macros::datetime!(2025-06-02 01:00 UTC);
        assert_eq!(Clock::fixed(at).now_utc(), at);
    }
}
