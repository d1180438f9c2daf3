//! Calendar primitives shared by the whole engine.
//!
//! All time arithmetic is done in whole **minutes since midnight** through the
//! [`TimeOfDay`] newtype; the `"HH:MM:SS"` string form only exists at the
//! serialisation boundary.  Weekdays are a small closed enum so occupancy can
//! be keyed by `(resource_id, Weekday)` instead of ad hoc string keys.
//!
//! | Type | Role |
//! |---|---|
//! | [`Weekday`] | teaching day, `Mon` … `Sat` |
//! | [`TimeOfDay`] | instant within a day, minute resolution |
//! | [`OperatingWindow`] | `[open, close)` bounds of a room |

pub mod parse;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Minutes in one day.  `24:00:00` is a valid *end* time, nothing later is.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

// ── Weekday ───────────────────────────────────────────────────────────────────

/// A teaching day.
///
/// Sunday is deliberately absent: the occupancy model covers Monday through
/// Saturday only, and room day lists mentioning any other code are reported
/// and ignored by [`parse::parse_weekdays`].
///
/// The derived `Ord` follows calendar order, which is also the order in which
/// slot search walks the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// Every teaching day in calendar order.
    pub const ALL: [Weekday; 6] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Three-letter code as persisted in schedule rows (`"Mon"`, `"Tue"`, …).
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }

    /// Parse a weekday code.
    ///
    /// Matching is case-insensitive and only looks at the first three
    /// letters, so `"mon"`, `"Mon"` and `"Monday"` are all accepted.
    /// Returns `None` for anything else (including Sunday).
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        let prefix = code.get(..3)?;
        Weekday::ALL
            .iter()
            .copied()
            .find(|d| d.code().eq_ignore_ascii_case(prefix))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ── TimeOfDay ─────────────────────────────────────────────────────────────────

/// Time of day with minute resolution, stored as minutes since midnight.
///
/// Valid values are `0 ..= MINUTES_PER_DAY`; the upper bound represents
/// `24:00:00` so a room may close at midnight.  Serialises as `"HH:MM:SS"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build from hour and minute.  Returns `None` when out of range.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour.checked_mul(60)?.checked_add(minute)?)
    }

    /// Build from minutes since midnight.  Returns `None` past `24:00`.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(TimeOfDay(minutes))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// `self + minutes`, or `None` if the result would pass `24:00`.
    pub fn checked_add_minutes(self, minutes: u16) -> Option<Self> {
        Self::from_minutes(self.0.checked_add(minutes)?)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:00", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse::parse_time_of_day(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day '{raw}'")))
    }
}

// ── OperatingWindow ───────────────────────────────────────────────────────────

/// Half-open daily window `[open, close)` during which a room can host
/// sessions.  A session fits when `open <= start` and `end <= close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingWindow {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
}

impl OperatingWindow {
    /// Fallback window used for rooms with missing or malformed hours.
    pub const DEFAULT: OperatingWindow = OperatingWindow {
        open: TimeOfDay(8 * 60),
        close: TimeOfDay(18 * 60),
    };

    /// Returns `None` unless `open < close`.
    pub fn new(open: TimeOfDay, close: TimeOfDay) -> Option<Self> {
        (open < close).then_some(Self { open, close })
    }

    /// `true` if `[start, end)` lies entirely inside the window.
    pub fn contains(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.open <= start && end <= self.close && start < end
    }

    /// Window length in minutes.
    pub fn span_minutes(&self) -> u16 {
        self.close.minutes() - self.open.minutes()
    }
}

impl Default for OperatingWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for OperatingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.open, self.close)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
