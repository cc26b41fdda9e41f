//! Display Formatting
//!
//! Pure conversions from raw document values into display strings. Number
//! rounding follows fixed-point "half away from zero" so `1.25` renders as
//! `1.3`, the way browsers print it.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use crate::document::KRX_MARKET;

/// Currency symbol prefixed to KRX prices
pub const KRW_SYMBOL: &str = "₩";

/// Text shown for timestamps that cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

/// Format a price for the given market.
///
/// KRX prices are whole won with thousands separators; every other market
/// gets exactly two decimals. Missing or non-finite prices render as `0.00`.
pub fn format_price(price: Option<f64>, market: &str) -> String {
    let Some(price) = price.filter(|p| p.is_finite()) else {
        return "0.00".to_string();
    };

    if market == KRX_MARKET {
        format!("{}{}", KRW_SYMBOL, group_thousands(round_half_away(price, 0) as i64))
    } else {
        fixed(price, 2)
    }
}

/// Abbreviate a share volume (`1.5K`, `2.5M`), grouping small values
pub fn format_volume(volume: Option<f64>) -> String {
    let Some(volume) = volume.filter(|v| v.is_finite()) else {
        return "0".to_string();
    };

    if volume >= 1_000_000.0 {
        format!("{}M", fixed(volume / 1_000_000.0, 1))
    } else if volume >= 1_000.0 {
        format!("{}K", fixed(volume / 1_000.0, 1))
    } else {
        format_grouped(volume)
    }
}

/// Success rate as a percentage string, `0%` when absent
pub fn format_percent(rate: Option<f64>) -> String {
    let rate = rate.filter(|r| r.is_finite()).unwrap_or(0.0);
    format!("{}%", number_text(rate))
}

/// A counter target as a whole number, `0` when absent or negative
pub fn count_value(value: Option<f64>) -> i64 {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.round() as i64)
        .unwrap_or(0)
}

/// Group an integer with comma thousands separators
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(",");

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Grouped number with up to three fraction digits, trailing zeros trimmed
pub fn format_grouped(value: f64) -> String {
    let rounded = round_half_away(value, 3);
    let int_part = rounded.trunc() as i64;
    let frac = fixed(rounded.abs().fract(), 3);
    let frac = frac.trim_start_matches('0').trim_end_matches('0');

    let sign = if rounded < 0.0 && int_part == 0 { "-" } else { "" };
    if frac == "." || frac.is_empty() {
        format!("{}{}", sign, group_thousands(int_part))
    } else {
        format!("{}{}{}", sign, group_thousands(int_part), frac)
    }
}

/// Fixed-point text with half-away-from-zero rounding
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, round_half_away(value, decimals as i32))
}

/// Plain number text: integral values print without a decimal point
pub fn number_text(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn round_half_away(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// A parsed document timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moment {
    /// A calendar date without a time of day (`2024-01-15`)
    Date(NaiveDate),
    /// A point in time
    Instant(DateTime<Utc>),
}

/// Date and time formatting in a fixed display zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    offset: FixedOffset,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::utc()
    }
}

impl Formatter {
    /// Format in the given zone
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Format in UTC
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Format in the host's current local offset
    pub fn local() -> Self {
        Self::new(*Local::now().offset())
    }

    /// Build from a configured offset, falling back to local time
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        match minutes
            .and_then(|m| m.checked_mul(60))
            .and_then(FixedOffset::east_opt)
        {
            Some(offset) => Self::new(offset),
            None => Self::local(),
        }
    }

    /// The display zone
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parse a document timestamp.
    ///
    /// Accepts RFC 3339, naive ISO date-times (read in the display zone),
    /// bare dates, and integer epoch milliseconds.
    pub fn parse(&self, raw: &str) -> Option<Moment> {
        let raw = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Moment::Instant(dt.with_timezone(&Utc)));
        }

        for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
                return self
                    .offset
                    .from_local_datetime(&naive)
                    .single()
                    .map(|dt| Moment::Instant(dt.with_timezone(&Utc)));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(Moment::Date(date));
        }

        raw.parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(Moment::Instant)
    }

    /// Short date, e.g. `Jan 15, 2024`
    pub fn format_date(&self, raw: Option<&str>) -> String {
        match raw.and_then(|r| self.parse(r)) {
            Some(Moment::Date(date)) => date.format("%b %-d, %Y").to_string(),
            Some(Moment::Instant(dt)) => dt
                .with_timezone(&self.offset)
                .format("%b %-d, %Y")
                .to_string(),
            None => INVALID_DATE.to_string(),
        }
    }

    /// Month, day and 12-hour time, e.g. `Jan 15, 9:30 PM`
    pub fn format_date_time(&self, raw: &str) -> String {
        match self.parse(raw) {
            Some(moment) => self
                .in_zone(moment)
                .format("%b %-d, %-I:%M %p")
                .to_string(),
            None => INVALID_DATE.to_string(),
        }
    }

    /// Full-precision text for tooltips, e.g. `1/15/2024, 9:30:00 PM`
    pub fn format_full(&self, raw: &str) -> String {
        match self.parse(raw) {
            Some(moment) => self
                .in_zone(moment)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string(),
            None => INVALID_DATE.to_string(),
        }
    }

    fn in_zone(&self, moment: Moment) -> DateTime<FixedOffset> {
        match moment {
            Moment::Instant(dt) => dt.with_timezone(&self.offset),
            Moment::Date(date) => {
                let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
                Utc.from_utc_datetime(&midnight).with_timezone(&self.offset)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_krx() {
        assert_eq!(format_price(Some(71500.0), "KRX"), "₩71,500");
        assert_eq!(format_price(Some(1234567.4), "KRX"), "₩1,234,567");
        assert_eq!(format_price(Some(950.0), "KRX"), "₩950");
    }

    #[test]
    fn test_price_other_markets() {
        assert_eq!(format_price(Some(189.5), "US"), "189.50");
        assert_eq!(format_price(Some(1234.567), "NASDAQ"), "1234.57");
        assert_eq!(format_price(Some(0.005), "US"), "0.01");
        assert!(!format_price(Some(1234.0), "US").contains(','));
    }

    #[test]
    fn test_price_non_numeric() {
        assert_eq!(format_price(None, "US"), "0.00");
        assert_eq!(format_price(None, "KRX"), "0.00");
        assert_eq!(format_price(Some(f64::NAN), "US"), "0.00");
    }

    #[test]
    fn test_volume_thresholds() {
        assert_eq!(format_volume(Some(999.0)), "999");
        assert_eq!(format_volume(Some(1_500.0)), "1.5K");
        assert_eq!(format_volume(Some(2_500_000.0)), "2.5M");
        assert_eq!(format_volume(Some(1_000.0)), "1.0K");
        assert_eq!(format_volume(Some(1_250.0)), "1.3K");
        assert_eq!(format_volume(Some(0.0)), "0");
        assert_eq!(format_volume(None), "0");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
        assert_eq!(format_grouped(12.5), "12.5");
        assert_eq!(format_grouped(12.0), "12");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(Some(99.9)), "99.9%");
        assert_eq!(format_percent(Some(100.0)), "100%");
        assert_eq!(format_percent(None), "0%");
    }

    #[test]
    fn test_count_value() {
        assert_eq!(count_value(Some(1200.0)), 1200);
        assert_eq!(count_value(None), 0);
        assert_eq!(count_value(Some(-3.0)), 0);
    }

    #[test]
    fn test_parse_variants() {
        let fmt = Formatter::utc();
        assert!(matches!(fmt.parse("2024-01-15"), Some(Moment::Date(_))));
        assert!(matches!(
            fmt.parse("2024-01-15T21:30:00.123456Z"),
            Some(Moment::Instant(_))
        ));
        assert!(matches!(
            fmt.parse("2024-01-15T21:30:00"),
            Some(Moment::Instant(_))
        ));
        assert!(matches!(fmt.parse("1705354200000"), Some(Moment::Instant(_))));
        assert!(fmt.parse("yesterday").is_none());
    }

    #[test]
    fn test_format_dates_utc() {
        let fmt = Formatter::utc();
        assert_eq!(fmt.format_date(Some("2024-01-15")), "Jan 15, 2024");
        assert_eq!(
            fmt.format_date_time("2024-01-15T21:30:00Z"),
            "Jan 15, 9:30 PM"
        );
        assert_eq!(
            fmt.format_full("2024-01-15T21:30:00Z"),
            "1/15/2024, 9:30:00 PM"
        );
        assert_eq!(fmt.format_date(None), INVALID_DATE);
        assert_eq!(fmt.format_date_time("garbage"), INVALID_DATE);
    }

    #[test]
    fn test_format_in_offset_zone() {
        let seoul = Formatter::from_offset_minutes(Some(9 * 60));
        assert_eq!(
            seoul.format_date_time("2024-01-15T21:30:00Z"),
            "Jan 16, 6:30 AM"
        );
        // Calendar dates do not shift with the zone
        assert_eq!(seoul.format_date(Some("2024-01-15")), "Jan 15, 2024");
    }
}
