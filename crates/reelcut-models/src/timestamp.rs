//! Timestamp parsing utilities.
//!
//! Supports the formats the highlight log uses for `start_time`:
//! bare seconds (`90`, `90.5`), `MM:SS`, and `HH:MM:SS`, each with an
//! optional fractional seconds part.

use thiserror::Error;

/// Maximum reasonable video offset (24 hours in seconds).
pub const MAX_VIDEO_OFFSET_SECS: f64 = 86400.0;

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("timestamp cannot be empty")]
    Empty,

    #[error("timestamp cannot be negative")]
    Negative,

    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),

    #[error("invalid timestamp format '{0}'; use seconds, MM:SS, or HH:MM:SS")]
    InvalidFormat(String),

    #[error("timestamp exceeds maximum offset ({0} seconds)")]
    ExceedsMaxOffset(f64),
}

/// Parse a timestamp string to total seconds.
///
/// # Examples
/// ```
/// use reelcut_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("01:30:00").unwrap(), 5400.0);
/// assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
/// assert_eq!(parse_timestamp("90").unwrap(), 90.0);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    let total = match parts.len() {
        1 => {
            let seconds = parse_component("seconds", parts[0])?;
            if seconds < 0.0 {
                return Err(TimestampError::Negative);
            }
            seconds
        }
        2 => {
            let minutes = parse_component("minutes", parts[0])?;
            let seconds = parse_component("seconds", parts[1])?;
            if minutes < 0.0 || seconds < 0.0 {
                return Err(TimestampError::Negative);
            }
            minutes * 60.0 + seconds
        }
        3 => {
            let hours = parse_component("hours", parts[0])?;
            let minutes = parse_component("minutes", parts[1])?;
            let seconds = parse_component("seconds", parts[2])?;
            if hours < 0.0 || minutes < 0.0 || seconds < 0.0 {
                return Err(TimestampError::Negative);
            }
            hours * 3600.0 + minutes * 60.0 + seconds
        }
        _ => return Err(TimestampError::InvalidFormat(ts.to_string())),
    };

    if total > MAX_VIDEO_OFFSET_SECS {
        return Err(TimestampError::ExceedsMaxOffset(MAX_VIDEO_OFFSET_SECS));
    }

    Ok(total)
}

/// Parse one timestamp component. `f64::from_str` accepts "NaN" and "inf",
/// which are meaningless as offsets and would poison every later
/// comparison, so only finite values pass.
fn parse_component(name: &'static str, raw: &str) -> Result<f64, TimestampError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| TimestampError::InvalidValue(name, raw.to_string()))?;
    if !value.is_finite() {
        return Err(TimestampError::InvalidValue(name, raw.to_string()));
    }
    Ok(value)
}

/// Format seconds into an HH:MM:SS or HH:MM:SS.mmm string for logging.
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_hh_mm_ss() {
        assert_eq!(parse_timestamp("00:00:00").unwrap(), 0.0);
        assert_eq!(parse_timestamp("00:01:00").unwrap(), 60.0);
        assert_eq!(parse_timestamp("01:00:00").unwrap(), 3600.0);
        assert_eq!(parse_timestamp("01:30:45").unwrap(), 5445.0);
    }

    #[test]
    fn test_parse_timestamp_mm_ss() {
        assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
        assert_eq!(parse_timestamp("53:53").unwrap(), 3233.0);
    }

    #[test]
    fn test_parse_timestamp_bare_seconds() {
        assert_eq!(parse_timestamp("90").unwrap(), 90.0);
        assert_eq!(parse_timestamp("0").unwrap(), 0.0);
        assert!((parse_timestamp("12.25").unwrap() - 12.25).abs() < 0.001);
    }

    #[test]
    fn test_parse_timestamp_with_milliseconds() {
        let result = parse_timestamp("00:00:30.500").unwrap();
        assert!((result - 30.5).abs() < 0.001);
    }

    #[test]
    fn test_parse_timestamp_errors() {
        assert!(matches!(parse_timestamp(""), Err(TimestampError::Empty)));
        assert!(matches!(parse_timestamp("  "), Err(TimestampError::Empty)));
        assert!(matches!(
            parse_timestamp("abc"),
            Err(TimestampError::InvalidValue(_, _))
        ));
        assert!(matches!(
            parse_timestamp("1:2:3:4"),
            Err(TimestampError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_timestamp("-5"),
            Err(TimestampError::Negative)
        ));
        assert!(matches!(
            parse_timestamp("999999"),
            Err(TimestampError::ExceedsMaxOffset(_))
        ));
    }

    #[test]
    fn test_non_finite_components_rejected() {
        for bad in ["NaN", "nan", "inf", "-inf", "infinity", "1e400"] {
            assert!(
                matches!(parse_timestamp(bad), Err(TimestampError::InvalidValue(_, _))),
                "'{bad}' should not parse as a timestamp"
            );
        }
        assert!(matches!(
            parse_timestamp("00:NaN:00"),
            Err(TimestampError::InvalidValue("minutes", _))
        ));
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "00:00:00");
        assert_eq!(format_seconds(90.0), "00:01:30");
        assert_eq!(format_seconds(3661.0), "01:01:01");
        assert_eq!(format_seconds(30.5), "00:00:30.500");
    }
}
