//! Wall-clock time source
//!
//! The gauge measures charge duration in milliseconds of wall time, and the
//! ranking table labels runs with a calendar date.

use std::cell::Cell;

pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> f64;
    /// Calendar date for ranking entries
    fn date_label(&self) -> String;
}

/// Native clock based on `SystemTime`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    fn unix_ms() -> f64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        Self::unix_ms()
    }

    fn date_label(&self) -> String {
        let days = (Self::unix_ms() / 86_400_000.0).floor() as i64;
        format_civil_date(days)
    }
}

/// Browser clock backed by `Date`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct JsClock;

#[cfg(target_arch = "wasm32")]
impl Clock for JsClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn date_label(&self) -> String {
        js_sys::Date::new_0()
            .to_locale_date_string("default", &wasm_bindgen::JsValue::UNDEFINED)
            .into()
    }
}

/// Clock driven by hand (demo autopilot, tests)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
    date: String,
}

impl ManualClock {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            now: Cell::new(0.0),
            date: date.into(),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn date_label(&self) -> String {
        self.date.clone()
    }
}

/// Format days since 1970-01-01 as `YYYY-MM-DD` (proleptic Gregorian)
pub fn format_civil_date(days: i64) -> String {
    // Shift the epoch to 0000-03-01 so leap days fall at the end of a year
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_dates() {
        assert_eq!(format_civil_date(0), "1970-01-01");
        assert_eq!(format_civil_date(59), "1970-03-01");
        assert_eq!(format_civil_date(11_016), "2000-02-29");
        assert_eq!(format_civil_date(19_723), "2024-01-01");
        assert_eq!(format_civil_date(-1), "1969-12-31");
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new("2026-01-01");
        assert_eq!(clock.now_ms(), 0.0);
        clock.advance(16.5);
        clock.advance(16.5);
        assert_eq!(clock.now_ms(), 33.0);
        assert_eq!(clock.date_label(), "2026-01-01");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_system_clock_date_shape() {
        let label = SystemClock.date_label();
        assert_eq!(label.len(), 10);
        assert_eq!(&label[4..5], "-");
    }
}
