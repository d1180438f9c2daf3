/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core data structures for the Timetable-O generator.
//!
//! Two distinct groups of types model the two sides of the scheduling
//! pipeline:
//!
//! ```text
//! data layer ──► Catalog (Program, Section, Course, Room) ──(scheduler)──► Timetable ──► data layer
//!                 ↑ input, read-only                                        ↑ output (ScheduleEntry, ConflictRecord)
//! ```
//!
//! # Ownership model
//! The [`Catalog`] is shared read-only (`Arc<Catalog>`) with the scheduler for
//! the duration of one run.  Output rows are created exclusively by course
//! placement and are never mutated afterwards; the driver only appends them
//! to the [`Timetable`].

use std::collections::HashSet;
use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::clock::parse::{parse_weekdays, resolve_window};
use crate::clock::{OperatingWindow, TimeOfDay, Weekday};
use crate::scheduler::error::ConflictReason;

// ── Identifiers ───────────────────────────────────────────────────────────────

pub type ProgramId = u32;
pub type SectionId = u32;
pub type CourseId = u32;
pub type RoomId = u32;

// ── Session-shape constants ───────────────────────────────────────────────────

/// Session length for a pure lecture course with no `hours_lecture` value.
pub const DEFAULT_LECTURE_HOURS: f64 = 4.0;

/// Session length for the lecture half of a leclab course with no
/// `hours_lecture` value.
pub const DEFAULT_LECLAB_LECTURE_HOURS: f64 = 2.67;

/// Session length for any laboratory component with no `hours_lab` value.
pub const DEFAULT_LAB_HOURS: f64 = 4.0;

/// Highest year level that still meets twice a week.
const TWICE_WEEKLY_MAX_YEAR: u8 = 2;

// ── Program ───────────────────────────────────────────────────────────────────

/// Degree programme (`"BSCS"`, `"BSIS"`, `"BSIT"`, …).  Immutable reference
/// data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub code: String,
    #[serde(default)]
    pub name: String,
}

// ── Section ───────────────────────────────────────────────────────────────────

/// One block of students of a programme and year level (`BSCS 1A`, `1B`, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub program_id: ProgramId,
    pub year_level: u8,
    /// Sequential letter: `"A"`, `"B"`, …
    pub letter: String,
    #[serde(default)]
    pub student_count: u32,
}

impl Section {
    /// Human-readable label, e.g. `"BSCS1A"`.
    pub fn label(&self, program_code: &str) -> String {
        format!("{}{}{}", program_code, self.year_level, self.letter)
    }
}

// ── Course ────────────────────────────────────────────────────────────────────

/// Course delivery type.
///
/// Declaration order is **not** the processing priority; see
/// [`priority`](crate::scheduler::priority) for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseType {
    /// Lecture sessions only.
    Lecture,
    /// Laboratory sessions only.
    Laboratory,
    /// A lecture component and a laboratory component scheduled as an
    /// atomic pair.
    Leclab,
}

impl fmt::Display for CourseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CourseType::Lecture => "lecture",
            CourseType::Laboratory => "laboratory",
            CourseType::Leclab => "leclab",
        })
    }
}

/// Academic term.  Serialised as `"TERM 1"`, `"TERM 2"`, `"TERM 3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    #[serde(rename = "TERM 1")]
    One,
    #[serde(rename = "TERM 2")]
    Two,
    #[serde(rename = "TERM 3")]
    Three,
}

impl Term {
    /// Terms in processing order.
    pub const ALL: [Term; 3] = [Term::One, Term::Two, Term::Three];
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Term::One => "TERM 1",
            Term::Two => "TERM 2",
            Term::Three => "TERM 3",
        })
    }
}

/// A course offered to every section of one programme and year level in one
/// term.  Read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub program_id: ProgramId,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub year_level: u8,
    pub term: Term,
    /// Lecture hours per session (fractional, e.g. `2.67`).
    #[serde(default)]
    pub hours_lecture: f64,
    /// Laboratory hours per session.
    #[serde(default)]
    pub hours_lab: f64,
}

impl Course {
    /// Number of weekly sessions for each component of this course.
    ///
    /// Years 1–2 meet twice a week, upper years once.
    pub fn sessions_per_component(&self) -> usize {
        if self.year_level <= TWICE_WEEKLY_MAX_YEAR {
            2
        } else {
            1
        }
    }

    /// Lecture session length in hours, with the type-specific default when
    /// `hours_lecture` is not positive.
    pub fn lecture_hours(&self) -> f64 {
        if self.hours_lecture > 0.0 {
            self.hours_lecture
        } else if self.course_type == CourseType::Leclab {
            DEFAULT_LECLAB_LECTURE_HOURS
        } else {
            DEFAULT_LECTURE_HOURS
        }
    }

    /// Laboratory session length in hours, defaulting when `hours_lab` is not
    /// positive.
    pub fn lab_hours(&self) -> f64 {
        if self.hours_lab > 0.0 {
            self.hours_lab
        } else {
            DEFAULT_LAB_HOURS
        }
    }
}

// ── Room ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Lecture,
    Laboratory,
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoomType::Lecture => "lecture",
            RoomType::Laboratory => "laboratory",
        })
    }
}

/// A physical room.
///
/// `start_time` / `end_time` are kept as raw strings: they come from loosely
/// validated storage, and a malformed value must degrade to the default
/// window instead of failing the whole run (see [`Room::operating_window`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    /// Days the room can be booked.  Accepts a YAML list or the
    /// comma-separated string form; defaults to Monday–Saturday.
    #[serde(default = "all_weekdays", deserialize_with = "deserialize_weekdays")]
    pub available_days: Vec<Weekday>,
}

impl Room {
    /// Resolved `[open, close)` window, plus whether `default` had to be used
    /// for either bound.
    pub fn operating_window(&self, default: OperatingWindow) -> (OperatingWindow, bool) {
        resolve_window(self.start_time.as_deref(), self.end_time.as_deref(), default)
    }

    pub fn is_available_on(&self, day: Weekday) -> bool {
        self.available_days.contains(&day)
    }
}

fn all_weekdays() -> Vec<Weekday> {
    Weekday::ALL.to_vec()
}

/// `available_days` as it may appear in a dataset.
#[derive(Deserialize)]
#[serde(untagged)]
enum DaysField {
    List(Vec<String>),
    Csv(String),
    Other(IgnoredAny),
}

fn deserialize_weekdays<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Weekday>, D::Error> {
    let field = DaysField::deserialize(deserializer)?;
    let (days, unknown) = match &field {
        DaysField::List(items) => parse_weekdays(items.iter().map(String::as_str)),
        DaysField::Csv(raw) => parse_weekdays(raw.split(',')),
        DaysField::Other(_) => {
            warn!("available_days is neither a list nor a string, using Mon–Sat");
            return Ok(all_weekdays());
        }
    };
    if !unknown.is_empty() {
        warn!(unknown = ?unknown, "ignoring unrecognised room weekday codes");
    }
    Ok(days)
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// The full in-memory input of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub programs: Vec<Program>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

/// Categories of catalog problems reported by [`Catalog::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogIssueKind {
    /// Two entities of the same collection share an id.
    DuplicateId,
    /// A section or course points at a programme that is not in the catalog.
    UnknownProgram,
    /// Year level outside `1..=4`.
    YearLevelOutOfRange,
    /// A room that no session could ever use (no days).
    UnusableRoom,
}

/// One catalog problem.  Issues are advisory: the run still proceeds.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogIssue {
    pub kind: CatalogIssueKind,
    pub message: String,
}

impl CatalogIssue {
    fn new(kind: CatalogIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Catalog {
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Structural checks over the whole catalog.
    ///
    /// Checks:
    /// 1. No duplicate ids within programs, sections, courses, rooms
    /// 2. Every section and course references a known programme
    /// 3. Year levels lie in `1..=4`
    /// 4. Every room has at least one available day
    ///
    /// Returns every problem found; an empty vector means the catalog is
    /// clean.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        duplicate_ids(&mut issues, "program", self.programs.iter().map(|p| p.id));
        duplicate_ids(&mut issues, "section", self.sections.iter().map(|s| s.id));
        duplicate_ids(&mut issues, "course", self.courses.iter().map(|c| c.id));
        duplicate_ids(&mut issues, "room", self.rooms.iter().map(|r| r.id));

        let program_ids: HashSet<ProgramId> = self.programs.iter().map(|p| p.id).collect();

        for section in &self.sections {
            if !program_ids.contains(&section.program_id) {
                issues.push(CatalogIssue::new(
                    CatalogIssueKind::UnknownProgram,
                    format!(
                        "section {} references unknown program {}",
                        section.id, section.program_id
                    ),
                ));
            }
            if !(1..=4).contains(&section.year_level) {
                issues.push(CatalogIssue::new(
                    CatalogIssueKind::YearLevelOutOfRange,
                    format!("section {} has year level {}", section.id, section.year_level),
                ));
            }
        }

        for course in &self.courses {
            if !program_ids.contains(&course.program_id) {
                issues.push(CatalogIssue::new(
                    CatalogIssueKind::UnknownProgram,
                    format!(
                        "course '{}' references unknown program {}",
                        course.code, course.program_id
                    ),
                ));
            }
            if !(1..=4).contains(&course.year_level) {
                issues.push(CatalogIssue::new(
                    CatalogIssueKind::YearLevelOutOfRange,
                    format!("course '{}' has year level {}", course.code, course.year_level),
                ));
            }
        }

        for room in &self.rooms {
            if room.available_days.is_empty() {
                issues.push(CatalogIssue::new(
                    CatalogIssueKind::UnusableRoom,
                    format!("room '{}' has no available days", room.name),
                ));
            }
        }

        issues
    }
}

fn duplicate_ids(issues: &mut Vec<CatalogIssue>, what: &str, ids: impl Iterator<Item = u32>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            issues.push(CatalogIssue::new(
                CatalogIssueKind::DuplicateId,
                format!("duplicate {what} id {id}"),
            ));
        }
    }
}

// ── Output rows ───────────────────────────────────────────────────────────────

/// Which component of a course a schedule row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Lecture,
    Lab,
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScheduleType::Lecture => "lecture",
            ScheduleType::Lab => "lab",
        })
    }
}

/// One placed session: persisted verbatim as one schedule row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub section_id: SectionId,
    pub course_id: CourseId,
    pub room_id: RoomId,
    pub day: Weekday,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub schedule_type: ScheduleType,
}

/// A `(course, section)` pair that could not be placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictRecord {
    /// Course code.
    pub course: String,
    /// Section label, e.g. `"BSIT2B"`.
    pub section: String,
    pub reason: ConflictReason,
    /// Programme code of the bucket.
    pub program: String,
    pub term: Term,
    pub course_type: CourseType,
    pub course_name: String,
}

/// Result of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timetable {
    pub schedules: Vec<ScheduleEntry>,
    pub conflicts: Vec<ConflictRecord>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
