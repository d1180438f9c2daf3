/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Course placement: turn one `(course, section)` pair into schedule rows.
//!
//! | Course type | Rooms tried | On failure |
//! |---|---|---|
//! | `lecture` | lecture pool | [`ConflictReason::NoLectureRoomSlots`] |
//! | `laboratory` | laboratory pool | [`ConflictReason::NoLabRoomSlots`] |
//! | `leclab` | lecture pool, then laboratory pool | `…ForLeclab` variants, nothing committed |
//!
//! Rooms of a pool are tried in catalog order and the first room that yields
//! every session wins, so the committed room is always the room that
//! produced the sessions.
//!
//! # Leclab atomicity
//! The lecture is searched against the real [`Occupancy`].  The lab is then
//! searched against a **clone** that already holds the lecture, so it avoids
//! the freshly chosen lecture slots without touching the real indices.  Only
//! when both succeed are both written through; otherwise the real indices are
//! exactly as they were before the call.

use tracing::debug;

use crate::catalog::{Course, CourseId, CourseType, RoomId, ScheduleEntry, ScheduleType, Section, SectionId};

use super::error::ConflictReason;
use super::occupancy::Occupancy;
use super::search::{find_sessions, RoomProfile, Session};

// ── Room pools ────────────────────────────────────────────────────────────────

/// Candidate rooms split by type, each list in catalog order.
#[derive(Debug, Clone, Default)]
pub struct RoomPools<'a> {
    pub lecture: Vec<RoomProfile<'a>>,
    pub laboratory: Vec<RoomProfile<'a>>,
}

// ── Component plan ────────────────────────────────────────────────────────────

/// Sessions found for one component, not yet committed.
#[derive(Debug, Clone)]
struct ComponentPlan {
    room: RoomId,
    schedule_type: ScheduleType,
    sessions: Vec<Session>,
}

impl ComponentPlan {
    fn commit(&self, section: SectionId, occupancy: &mut Occupancy) {
        for s in &self.sessions {
            occupancy.reserve(self.room, section, s.day, s.interval);
        }
    }

    fn into_entries(self, course: CourseId, section: SectionId) -> impl Iterator<Item = ScheduleEntry> {
        let Self {
            room,
            schedule_type,
            sessions,
        } = self;
        sessions.into_iter().map(move |s| ScheduleEntry {
            section_id: section,
            course_id: course,
            room_id: room,
            day: s.day,
            start_time: s.interval.start,
            end_time: s.interval.end,
            schedule_type,
        })
    }
}

/// Try every room of `pool` in order; the first one that yields all
/// `sessions_needed` sessions wins.
fn plan_component(
    pool: &[RoomProfile<'_>],
    section: SectionId,
    hours: f64,
    sessions_needed: usize,
    occupancy: &Occupancy,
    step_minutes: u16,
    schedule_type: ScheduleType,
) -> Option<ComponentPlan> {
    pool.iter().find_map(|room| {
        find_sessions(room, section, hours, sessions_needed, occupancy, step_minutes).map(
            |sessions| ComponentPlan {
                room: room.id(),
                schedule_type,
                sessions,
            },
        )
    })
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Place every session of `course` for `section`, committing them into
/// `occupancy` on success.
///
/// # Errors
/// Returns the [`ConflictReason`] for the first component that could not be
/// placed.  On error `occupancy` is left unchanged.
pub fn place_course(
    course: &Course,
    section: &Section,
    rooms: &RoomPools<'_>,
    occupancy: &mut Occupancy,
    step_minutes: u16,
) -> Result<Vec<ScheduleEntry>, ConflictReason> {
    let n = course.sessions_per_component();

    match course.course_type {
        CourseType::Lecture => {
            let lecture = plan_component(
                &rooms.lecture,
                section.id,
                course.lecture_hours(),
                n,
                occupancy,
                step_minutes,
                ScheduleType::Lecture,
            )
            .ok_or(ConflictReason::NoLectureRoomSlots)?;

            lecture.commit(section.id, occupancy);
            Ok(lecture.into_entries(course.id, section.id).collect())
        }

        CourseType::Laboratory => {
            let lab = plan_component(
                &rooms.laboratory,
                section.id,
                course.lab_hours(),
                n,
                occupancy,
                step_minutes,
                ScheduleType::Lab,
            )
            .ok_or(ConflictReason::NoLabRoomSlots)?;

            lab.commit(section.id, occupancy);
            Ok(lab.into_entries(course.id, section.id).collect())
        }

        CourseType::Leclab => {
            let lecture = plan_component(
                &rooms.lecture,
                section.id,
                course.lecture_hours(),
                n,
                occupancy,
                step_minutes,
                ScheduleType::Lecture,
            )
            .ok_or(ConflictReason::NoLectureRoomSlotsForLeclab)?;

            // Lab is searched against a scratch copy holding the lecture.
            let mut scratch = occupancy.clone();
            lecture.commit(section.id, &mut scratch);

            let lab = plan_component(
                &rooms.laboratory,
                section.id,
                course.lab_hours(),
                n,
                &scratch,
                step_minutes,
                ScheduleType::Lab,
            )
            .ok_or_else(|| {
                debug!(
                    course = %course.code,
                    section = section.id,
                    lecture_room = lecture.room,
                    "lab did not fit, dropping provisional lecture"
                );
                ConflictReason::NoLabRoomSlotsForLeclab
            })?;

            lecture.commit(section.id, occupancy);
            lab.commit(section.id, occupancy);

            let mut entries: Vec<ScheduleEntry> = lecture.into_entries(course.id, section.id).collect();
            entries.extend(lab.into_entries(course.id, section.id));
            Ok(entries)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
