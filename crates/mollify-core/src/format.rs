//! Formatting utilities for sizes, timestamps and transfer rates.

use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};

use crate::texts::Texts;

/// Format of timestamps sent by the backend (`20240102030405`).
pub const INTERNAL_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Used when the localized date format is not a valid strftime pattern.
const FALLBACK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a backend timestamp.
pub fn parse_internal_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), INTERNAL_TIME_FORMAT).ok()
}

/// Backend timestamp as a sortable number; unparseable values count as 0.
pub fn internal_time_key(value: Option<&str>) -> u64 {
    value
        .map(str::trim)
        .filter(|v| v.len() == 14)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

// =============================================================================
// Number
// =============================================================================

/// Fixed-precision number with an optional unit.
///
/// Values are truncated (not rounded) to the precision.
#[derive(Clone, Debug)]
pub struct NumberFormat {
    precision: u32,
    unit: Option<String>,
    decimal_separator: String,
}

impl NumberFormat {
    pub fn new(precision: u32, unit: Option<String>, decimal_separator: impl Into<String>) -> Self {
        Self {
            precision,
            unit,
            decimal_separator: decimal_separator.into(),
        }
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return String::new();
        }
        let scale = 10f64.powi(self.precision as i32);
        let truncated = (value * scale).floor() / scale;
        let mut text = truncated.to_string();
        if self.decimal_separator != "." {
            text = text.replace('.', &self.decimal_separator);
        }
        match &self.unit {
            Some(unit) => format!("{} {}", text, unit),
            None => text,
        }
    }
}

// =============================================================================
// Byte Size
// =============================================================================

const KILOBYTE: u64 = 1024;
const MEGABYTE: u64 = KILOBYTE * 1024;
const GIGABYTE: u64 = MEGABYTE * 1024;

/// Human-readable byte sizes ("1 byte", "12.5 kB", "3.07 MB").
#[derive(Clone, Debug)]
pub struct ByteSizeFormat {
    number: NumberFormat,
    texts: Texts,
}

impl ByteSizeFormat {
    pub fn new(texts: &Texts) -> Self {
        Self {
            number: NumberFormat::new(2, None, texts.get("decimalSeparator")),
            texts: texts.clone(),
        }
    }

    pub fn format(&self, bytes: u64) -> String {
        if bytes < KILOBYTE {
            return if bytes == 1 {
                self.texts.get("sizeOneByte")
            } else {
                self.texts
                    .get_with("sizeInBytes", &[&self.number.format(bytes as f64)])
            };
        }
        if bytes < MEGABYTE {
            if bytes == KILOBYTE {
                return self.texts.get("sizeOneKilobyte");
            }
            let kb = bytes as f64 / KILOBYTE as f64;
            return self
                .texts
                .get_with("sizeInKilobytes", &[&self.number.format(kb)]);
        }
        if bytes < GIGABYTE {
            let mb = bytes as f64 / MEGABYTE as f64;
            return self
                .texts
                .get_with("sizeInMegabytes", &[&self.number.format(mb)]);
        }
        let gb = bytes as f64 / GIGABYTE as f64;
        self.texts
            .get_with("sizeInGigabytes", &[&self.number.format(gb)])
    }
}

// =============================================================================
// Timestamp
// =============================================================================

/// Date/time display using a strftime pattern.
#[derive(Clone, Debug)]
pub struct TimestampFormat {
    pattern: String,
}

impl TimestampFormat {
    /// Invalid patterns fall back to `%Y-%m-%d %H:%M`.
    pub fn new(pattern: &str) -> Self {
        let valid = !pattern.is_empty()
            && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error));
        if !valid {
            log::warn!("Invalid date format '{}', using default", pattern);
        }
        Self {
            pattern: if valid { pattern } else { FALLBACK_TIME_FORMAT }.to_string(),
        }
    }

    pub fn format(&self, time: &NaiveDateTime) -> String {
        time.format(&self.pattern).to_string()
    }

    /// Format a backend timestamp; empty for unparseable input.
    pub fn format_internal(&self, value: &str) -> String {
        parse_internal_time(value)
            .map(|t| self.format(&t))
            .unwrap_or_default()
    }
}

// =============================================================================
// Formatters
// =============================================================================

/// The formatters shared by columns, widgets and the upload indicator.
#[derive(Clone, Debug)]
pub struct Formatters {
    pub byte_size: ByteSizeFormat,
    pub timestamp: TimestampFormat,
    /// Transfer rate in kB/s with one decimal.
    pub upload_speed: NumberFormat,
}

impl Formatters {
    pub fn new(texts: &Texts) -> Self {
        Self {
            byte_size: ByteSizeFormat::new(texts),
            timestamp: TimestampFormat::new(&texts.get("shortDateTimeFormat")),
            upload_speed: NumberFormat::new(
                1,
                Some(texts.get("dataRateKbps")),
                texts.get("decimalSeparator"),
            ),
        }
    }

    /// Upload rate label from bytes per second; empty while no rate is known.
    pub fn speed(&self, bytes_per_second: f64) -> String {
        if bytes_per_second <= 0.0 {
            return String::new();
        }
        self.upload_speed.format(bytes_per_second / 1024.0)
    }
}

impl Default for Formatters {
    fn default() -> Self {
        Self::new(&Texts::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_truncates() {
        let nf = NumberFormat::new(2, None, ",");
        assert_eq!(nf.format(1.239), "1,23");
        assert_eq!(nf.format(2.0), "2");
        let with_unit = NumberFormat::new(1, Some("kB/s".into()), ".");
        assert_eq!(with_unit.format(12.56), "12.5 kB/s");
    }

    #[test]
    fn test_byte_size() {
        let f = ByteSizeFormat::new(&Texts::default());
        assert_eq!(f.format(0), "0 bytes");
        assert_eq!(f.format(1), "1 byte");
        assert_eq!(f.format(1023), "1023 bytes");
        assert_eq!(f.format(1024), "1 kilobyte");
        assert_eq!(f.format(1536), "1.5 kB");
        assert_eq!(f.format(3 * 1024 * 1024), "3 MB");
        assert_eq!(f.format(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn test_timestamp() {
        let f = TimestampFormat::new("%Y-%m-%d %H:%M");
        assert_eq!(f.format_internal("20240102030405"), "2024-01-02 03:04");
        assert_eq!(f.format_internal("garbage"), "");
    }

    #[test]
    fn test_invalid_pattern_falls_back() {
        let f = TimestampFormat::new("%Q");
        assert_eq!(f.format_internal("20240102030405"), "2024-01-02 03:04");
    }

    #[test]
    fn test_internal_time_key() {
        assert_eq!(internal_time_key(Some("20240102030405")), 20240102030405);
        assert_eq!(internal_time_key(Some("x")), 0);
        assert_eq!(internal_time_key(None), 0);
    }

    #[test]
    fn test_upload_speed() {
        let f = Formatters::default();
        assert_eq!(f.speed(2048.0 + 512.0), "2.5 kB/s");
        assert_eq!(f.speed(0.0), "");
    }
}
