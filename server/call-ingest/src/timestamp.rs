//! Timestamp resolution: optional ISO-8601 input -> canonical `YYYY-MM-DD HH:MM:SS`.

use chrono::{Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::IngestError;

/// Format of the `Date` column.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const INVALID_TIMESTAMP: &str = "Invalid timestamp format. Expected ISO 8601 string.";

/// Extended (`2024-01-15`) or basic (`20240115`) date, then an optional time in
/// extended (`10:30:00`) or basic (`103000`) form. Hours alone are allowed, a
/// fraction only after seconds, an offset only after a time.
static ISO_8601: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"(?x)^
      (?P<year>\d{4})
      (?: -(?P<month>\d{2})-(?P<day>\d{2}) | (?P<bmonth>\d{2})(?P<bday>\d{2}) )
      (?:
        [T\ ]
        (?P<time>
            \d{2} (?: :\d{2} (?: :\d{2} (?:[.,]\d{1,9})? )? )?
          | \d{2} (?: \d{2} (?: \d{2} (?:[.,]\d{1,9})? )? )?
        )
        (?P<offset> Z | [+-]\d{2} (?: :?\d{2} )? )?
      )?
    $",
  )
  .expect("ISO-8601 pattern is valid")
});

/// Resolve the row date. `None` means "now" in local time; anything else must
/// be ISO-8601. Offsets and sub-second precision are dropped, the wall-clock
/// fields are kept as written.
pub fn resolve_timestamp(raw: Option<&str>) -> Result<String, IngestError> {
  match raw {
    None => Ok(now_canonical()),
    Some(s) => parse_iso8601(s)
      .map(|dt| dt.format(CANONICAL_FORMAT).to_string())
      .ok_or_else(|| IngestError::validation(INVALID_TIMESTAMP)),
  }
}

/// Current local time in canonical form.
pub fn now_canonical() -> String {
  Local::now().format(CANONICAL_FORMAT).to_string()
}

fn parse_iso8601(s: &str) -> Option<NaiveDateTime> {
  let caps = ISO_8601.captures(s)?;
  let num = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());

  let year = caps.name("year")?.as_str().parse::<i32>().ok()?;
  let month = num("month").or_else(|| num("bmonth"))?;
  let day = num("day").or_else(|| num("bday"))?;
  let date = NaiveDate::from_ymd_opt(year, month, day)?;

  let Some(time) = caps.name("time") else {
    return date.and_hms_opt(0, 0, 0);
  };
  if let Some(offset) = caps.name("offset") {
    if !valid_offset(offset.as_str()) {
      return None;
    }
  }

  // Fraction is dropped; only the HH[MM[SS]] digits matter.
  let digits: String = time
    .as_str()
    .split(&['.', ','][..])
    .next()?
    .chars()
    .filter(char::is_ascii_digit)
    .collect();
  let field = |i: usize| digits.get(i..i + 2).map_or(Some(0), |d| d.parse::<u32>().ok());
  date.and_hms_opt(field(0)?, field(2)?, field(4)?)
}

fn valid_offset(offset: &str) -> bool {
  if offset == "Z" {
    return true;
  }
  let digits: String = offset.chars().filter(char::is_ascii_digit).collect();
  let hours = digits.get(0..2).and_then(|d| d.parse::<u32>().ok());
  let minutes = digits.get(2..4).map_or(Some(0), |d| d.parse::<u32>().ok());
  matches!((hours, minutes), (Some(h), Some(m)) if h < 24 && m < 60)
}
