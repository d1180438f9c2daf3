/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Post-run audit of a generated [`Timetable`].
//!
//! The audit is **computed and logged** after every run; it never changes
//! the timetable.  A correct engine produces no violations, so any hit here
//! points at a bug or at catalog data that changed mid-run.
//!
//! Checked properties:
//!
//! 1. No two rows of one `(program, term)` bucket sharing a room and weekday
//!    overlap.
//! 2. No two rows of one bucket sharing a section and weekday overlap.
//! 3. Every row's day is a day its room is open, and `[start, end)` lies
//!    within the room's operating window.
//! 4. Every leclab `(course, section)` has both lecture and lab rows, or
//!    neither.
//! 5. Each `(course, section, component)` has the year-derived session count,
//!    all on distinct weekdays.
//!
//! Overlaps are only checked inside a bucket: every bucket is scheduled
//! against its own empty occupancy, so two buckets may hold the same room
//! slot or the same section slot.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::catalog::{
    Catalog, Course, CourseId, CourseType, ProgramId, RoomId, ScheduleEntry, ScheduleType, SectionId, Term, Timetable,
};
use crate::clock::{OperatingWindow, TimeOfDay, Weekday};

// ── Violation ─────────────────────────────────────────────────────────────────

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("room {room} double-booked on {day}: {first_start}-{first_end} overlaps {second_start}-{second_end}")]
    RoomOverlap {
        room: RoomId,
        day: Weekday,
        first_start: TimeOfDay,
        first_end: TimeOfDay,
        second_start: TimeOfDay,
        second_end: TimeOfDay,
    },

    #[error("section {section} double-booked on {day}: {first_start}-{first_end} overlaps {second_start}-{second_end}")]
    SectionOverlap {
        section: SectionId,
        day: Weekday,
        first_start: TimeOfDay,
        first_end: TimeOfDay,
        second_start: TimeOfDay,
        second_end: TimeOfDay,
    },

    #[error("row references room {room} which is not in the catalog")]
    UnknownRoom { room: RoomId },

    #[error("room {room} is not available on {day}")]
    RoomClosed { room: RoomId, day: Weekday },

    #[error("room {room} session {start}-{end} on {day} is outside its hours")]
    OutsideRoomHours {
        room: RoomId,
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
    },

    #[error("leclab course {course} for section {section} has only its {present} component")]
    PartialLeclab {
        course: CourseId,
        section: SectionId,
        present: ScheduleType,
    },

    #[error("course {course} section {section} {component}: expected {expected} session(s), found {found}")]
    WrongSessionCount {
        course: CourseId,
        section: SectionId,
        component: ScheduleType,
        expected: usize,
        found: usize,
    },

    #[error("course {course} section {section} {component}: two sessions on {day}")]
    RepeatedWeekday {
        course: CourseId,
        section: SectionId,
        component: ScheduleType,
        day: Weekday,
    },
}

// ── Audit ─────────────────────────────────────────────────────────────────────

/// Audit `timetable` against `catalog`.
///
/// `default_window` must be the window the run used for rooms with missing
/// or malformed hours.
pub fn audit(catalog: &Catalog, timetable: &Timetable, default_window: OperatingWindow) -> Vec<Violation> {
    let courses: HashMap<CourseId, &Course> = catalog.courses.iter().map(|c| (c.id, c)).collect();

    let mut violations = Vec::new();
    check_overlaps(&courses, &timetable.schedules, &mut violations);
    check_room_bounds(catalog, &timetable.schedules, default_window, &mut violations);
    check_components(&courses, &timetable.schedules, &mut violations);
    violations
}

/// Occupancy scope of a row: the `(program, term)` bucket of its course.
/// Rows of unknown courses share one scope of their own.
type Scope = Option<(ProgramId, Term)>;

fn scope_of(courses: &HashMap<CourseId, &Course>, row: &ScheduleEntry) -> Scope {
    courses.get(&row.course_id).map(|c| (c.program_id, c.term))
}

fn check_overlaps(courses: &HashMap<CourseId, &Course>, rows: &[ScheduleEntry], out: &mut Vec<Violation>) {
    let mut by_room: BTreeMap<(Scope, RoomId, Weekday), Vec<&ScheduleEntry>> = BTreeMap::new();
    let mut by_section: BTreeMap<(Scope, SectionId, Weekday), Vec<&ScheduleEntry>> = BTreeMap::new();
    for row in rows {
        let scope = scope_of(courses, row);
        by_room.entry((scope, row.room_id, row.day)).or_default().push(row);
        by_section.entry((scope, row.section_id, row.day)).or_default().push(row);
    }

    // Sorted by start, a set is overlap-free iff every adjacent pair is.
    for ((_, room, day), mut group) in by_room {
        group.sort_by_key(|r| (r.start_time, r.end_time));
        for pair in group.windows(2) {
            if pair[0].end_time > pair[1].start_time {
                out.push(Violation::RoomOverlap {
                    room,
                    day,
                    first_start: pair[0].start_time,
                    first_end: pair[0].end_time,
                    second_start: pair[1].start_time,
                    second_end: pair[1].end_time,
                });
            }
        }
    }

    for ((_, section, day), mut group) in by_section {
        group.sort_by_key(|r| (r.start_time, r.end_time));
        for pair in group.windows(2) {
            if pair[0].end_time > pair[1].start_time {
                out.push(Violation::SectionOverlap {
                    section,
                    day,
                    first_start: pair[0].start_time,
                    first_end: pair[0].end_time,
                    second_start: pair[1].start_time,
                    second_end: pair[1].end_time,
                });
            }
        }
    }
}

fn check_room_bounds(
    catalog: &Catalog,
    rows: &[ScheduleEntry],
    default_window: OperatingWindow,
    out: &mut Vec<Violation>,
) {
    for row in rows {
        let Some(room) = catalog.room(row.room_id) else {
            out.push(Violation::UnknownRoom { room: row.room_id });
            continue;
        };
        if !room.is_available_on(row.day) {
            out.push(Violation::RoomClosed {
                room: room.id,
                day: row.day,
            });
        }
        let (window, _) = room.operating_window(default_window);
        if !window.contains(row.start_time, row.end_time) {
            out.push(Violation::OutsideRoomHours {
                room: room.id,
                day: row.day,
                start: row.start_time,
                end: row.end_time,
            });
        }
    }
}

fn check_components(courses: &HashMap<CourseId, &Course>, rows: &[ScheduleEntry], out: &mut Vec<Violation>) {
    let mut groups: BTreeMap<(CourseId, SectionId), Vec<&ScheduleEntry>> = BTreeMap::new();
    for row in rows {
        groups.entry((row.course_id, row.section_id)).or_default().push(row);
    }

    for ((course_id, section_id), group) in groups {
        let lecture: Vec<&ScheduleEntry> = group
            .iter()
            .copied()
            .filter(|r| r.schedule_type == ScheduleType::Lecture)
            .collect();
        let lab: Vec<&ScheduleEntry> = group
            .iter()
            .copied()
            .filter(|r| r.schedule_type == ScheduleType::Lab)
            .collect();

        let Some(course) = courses.get(&course_id) else {
            continue;
        };

        if course.course_type == CourseType::Leclab && (lecture.is_empty() != lab.is_empty()) {
            out.push(Violation::PartialLeclab {
                course: course_id,
                section: section_id,
                present: if lecture.is_empty() {
                    ScheduleType::Lab
                } else {
                    ScheduleType::Lecture
                },
            });
        }

        let expected = course.sessions_per_component();
        for (component, component_rows) in [(ScheduleType::Lecture, &lecture), (ScheduleType::Lab, &lab)] {
            if component_rows.is_empty() {
                continue;
            }
            if component_rows.len() != expected {
                out.push(Violation::WrongSessionCount {
                    course: course_id,
                    section: section_id,
                    component,
                    expected,
                    found: component_rows.len(),
                });
            }
            let mut days: Vec<Weekday> = component_rows.iter().map(|r| r.day).collect();
            days.sort_unstable();
            for pair in days.windows(2) {
                if pair[0] == pair[1] {
                    out.push(Violation::RepeatedWeekday {
                        course: course_id,
                        section: section_id,
                        component,
                        day: pair[0],
                    });
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
