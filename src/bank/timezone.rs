use std::fmt;
use std::str::FromStr;

use chrono::Duration;

use super::error::{FormatViolation, ValidationError};

const NAME_FIELD: &str = "Timezone \"name\"";
const MAX_NAME_LEN: usize = 5;
const MAX_OFFSET_MINUTES: i32 = 59;
const MIN_OFFSET_HOURS: i64 = -12;
const MAX_OFFSET_HOURS: i64 = 14;

/// A named, fixed UTC offset.
///
/// The offset is stored as separate hour and minute components whose signs
/// are independent of each other, `TimeZone::new(-1, 30, "ABC")` is -00:30.
/// Only the combined duration is bounded to `[-12:00, +14:00]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeZone {
    name: String,
    offset_hours: i32,
    offset_minutes: i32,
}

impl TimeZone {
    /// Builds a validated time zone.
    pub fn new(offset_hours: i32, offset_minutes: i32, name: &str) -> Result<Self, ValidationError> {
        validate_name(name)?;
        validate_offset(offset_hours, offset_minutes)?;
        Ok(Self {
            name: name.to_owned(),
            offset_hours,
            offset_minutes,
        })
    }

    /// `TimeZone(name='UTC', offset_hours=0, offset_minutes=0)`
    pub fn utc() -> Self {
        Self {
            name: "UTC".to_owned(),
            offset_hours: 0,
            offset_minutes: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset_hours(&self) -> i32 {
        self.offset_hours
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// Combined hours and minutes as a single duration.
    pub fn offset(&self) -> Duration {
        combined_offset(self.offset_hours, self.offset_minutes)
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimeZone(name='{}', offset_hours={}, offset_minutes={})",
            self.name, self.offset_hours, self.offset_minutes
        )
    }
}

/// Parses the `Display` form back into a `TimeZone`.
///
/// Keyword arguments may come in any order. Checks run in the same order as
/// the constructor, with the name checked before either offset is parsed.
impl FromStr for TimeZone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let args = s
            .trim()
            .strip_prefix("TimeZone(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ValidationError::malformed(s, "expected TimeZone(...)"))?;

        let mut name = None;
        let mut hours = None;
        let mut minutes = None;
        for arg in args.split(',').map(str::trim).filter(|arg| !arg.is_empty()) {
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| ValidationError::malformed(s, "expected keyword=value arguments"))?;
            let slot = match key.trim() {
                "name" => &mut name,
                "offset_hours" => &mut hours,
                "offset_minutes" => &mut minutes,
                _ => return Err(ValidationError::malformed(s, "unknown keyword argument")),
            };
            *slot = Some(value.trim());
        }

        let name = match name {
            None | Some("None") => return Err(ValidationError::MissingArgument { field: NAME_FIELD }),
            Some("") => "",
            Some(raw) => unquote(raw).ok_or_else(|| ValidationError::TypeMismatch {
                field: NAME_FIELD,
                expected: "alphabetic string",
                found: raw.to_owned(),
            })?,
        };
        validate_name(name)?;

        let offset_hours = parse_integer("offset_hours", hours)?;
        let offset_minutes = parse_integer("offset_minutes", minutes)?;
        validate_offset(offset_hours, offset_minutes)?;

        Ok(Self {
            name: name.to_owned(),
            offset_hours,
            offset_minutes,
        })
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let violation = if name.is_empty() {
        Some(FormatViolation::Empty)
    } else if !name.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(FormatViolation::Pattern)
    } else if name.len() > MAX_NAME_LEN {
        Some(FormatViolation::Length { max: MAX_NAME_LEN })
    } else {
        None
    };
    match violation {
        Some(violation) => Err(ValidationError::InvalidFormat {
            field: NAME_FIELD,
            violation,
        }),
        None => Ok(()),
    }
}

fn validate_offset(offset_hours: i32, offset_minutes: i32) -> Result<(), ValidationError> {
    if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&offset_minutes) {
        return Err(ValidationError::out_of_range(
            "offset_minutes",
            offset_minutes,
            "[-59, 59]",
        ));
    }
    let offset = combined_offset(offset_hours, offset_minutes);
    if offset < Duration::hours(MIN_OFFSET_HOURS) || offset > Duration::hours(MAX_OFFSET_HOURS) {
        return Err(ValidationError::out_of_range(
            "offset",
            format!("{offset_hours}h{offset_minutes}m"),
            "[-12:00, +14:00]",
        ));
    }
    Ok(())
}

fn combined_offset(offset_hours: i32, offset_minutes: i32) -> Duration {
    Duration::hours(i64::from(offset_hours)) + Duration::minutes(i64::from(offset_minutes))
}

fn unquote(raw: &str) -> Option<&str> {
    raw.strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .or_else(|| raw.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')))
}

fn parse_integer(field: &'static str, raw: Option<&str>) -> Result<i32, ValidationError> {
    let raw = raw.ok_or(ValidationError::MissingArgument { field })?;
    raw.parse().map_err(|_| ValidationError::InvalidType {
        field,
        found: raw.to_owned(),
    })
}
