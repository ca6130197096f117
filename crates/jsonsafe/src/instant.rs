use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};
use serde::{Serialize, Serializer};

/// Largest distance from the Unix epoch, in milliseconds, a date value may carry.
pub const MAX_EPOCH_MILLIS: f64 = 8.64e15;

// Newtype name the value builder uses to recognise instants.
pub(crate) const INSTANT_TOKEN: &str = "$jsonsafe::private::Instant";

/// A single point in time, or an invalid date.
///
/// Invalid instants are ordinary values: they come out of failed parses and
/// out-of-range timestamps instead of errors, and sanitize to null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instant(Option<DateTime<Utc>>);

impl Instant {
    pub fn new(dt: DateTime<Utc>) -> Self {
        Instant(Some(dt))
    }

    pub const fn invalid() -> Self {
        Instant(None)
    }

    /// Parse a date string. Accepts RFC 3339, expanded-year ISO strings
    /// (`+010000-01-01T00:00:00.000Z`), offset-less date-times (read as UTC)
    /// and bare `YYYY-MM-DD` dates. Anything else is an invalid instant.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Instant(Some(dt.with_timezone(&Utc)));
        }
        if let Some(dt) = parse_expanded_year(s) {
            return Instant(Some(dt));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Instant(Some(naive.and_utc()));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map_or(Instant::invalid(), |naive| Instant(Some(naive.and_utc())))
    }

    /// Milliseconds since the Unix epoch. Fractions are truncated toward zero;
    /// NaN, infinities and anything past ±8.64e15 give an invalid instant.
    pub fn from_millis(ms: f64) -> Self {
        if !ms.is_finite() || ms.abs() > MAX_EPOCH_MILLIS {
            return Instant::invalid();
        }
        DateTime::from_timestamp_millis(ms.trunc() as i64)
            .map_or(Instant::invalid(), |dt| Instant(Some(dt)))
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        self.0.as_ref()
    }

    pub fn timestamp_millis(&self) -> Option<i64> {
        self.0.map(|dt| dt.timestamp_millis())
    }

    /// ISO 8601 text with millisecond precision and a `Z` designator, or
    /// `None` for an invalid instant.
    pub fn to_iso_string(&self) -> Option<String> {
        let dt = self.0?;
        let year = dt.year();
        if (0..=9999).contains(&year) {
            return Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        let sign = if year < 0 { '-' } else { '+' };
        Some(format!(
            "{sign}{:06}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            year.unsigned_abs(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
            (dt.nanosecond() / 1_000_000).min(999),
        ))
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(dt: DateTime<Utc>) -> Self {
        Instant::new(dt)
    }
}

impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_iso_string() {
            Some(s) => serializer.serialize_newtype_struct(INSTANT_TOKEN, &s),
            None => serializer.serialize_newtype_struct(INSTANT_TOKEN, &()),
        }
    }
}

// `±YYYYYY-MM-DDTHH:MM:SS.sssZ`: swap in a four-digit placeholder year so
// the RFC 3339 parser handles the rest, then restore the real year on the
// local date-time before applying the offset.
fn parse_expanded_year(s: &str) -> Option<DateTime<Utc>> {
    let (negative, rest) = match s.as_bytes().first()? {
        b'+' => (false, &s[1..]),
        b'-' => (true, &s[1..]),
        _ => return None,
    };
    let bytes = rest.as_bytes();
    if bytes.len() < 7 || bytes[6] != b'-' || !bytes[..6].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let year: i32 = rest[..6].parse().ok()?;
    let placeholder = DateTime::parse_from_rfc3339(&format!("2000{}", &rest[6..])).ok()?;
    let local = placeholder.naive_local();
    let date = NaiveDate::from_ymd_opt(if negative { -year } else { year }, local.month(), local.day())?;
    placeholder
        .offset()
        .from_local_datetime(&date.and_time(local.time()))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
