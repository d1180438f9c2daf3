/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Slot search: find `n` sessions of a fixed length for one section in one
//! room, each on a different weekday.
//!
//! The search is strictly read-only with respect to [`Occupancy`]: it only
//! proposes sessions, and the caller decides whether to commit them.
//!
//! # Algorithm
//! ```text
//! for day in room.days (calendar order):
//!     for start in open, open+step, open+2·step, … while start+duration ≤ close:
//!         if room and section are both free on [start, start+duration):
//!             take it, move on to the next day
//!     stop as soon as n sessions are collected
//! fail unless exactly n were collected
//! ```
//! Taking at most one slot per day is what guarantees that the sessions of
//! one course component land on distinct weekdays.

use tracing::debug;

use crate::catalog::{Room, RoomId, SectionId};
use crate::clock::parse::hours_to_minutes;
use crate::clock::{OperatingWindow, TimeOfDay, Weekday};

use super::occupancy::{Interval, Occupancy};

/// Granularity of candidate start times when nothing else is configured.
pub const DEFAULT_SLOT_STEP_MINUTES: u16 = 30;

// ── RoomProfile ───────────────────────────────────────────────────────────────

/// A room with its operating window and day list resolved once per run.
#[derive(Debug, Clone)]
pub struct RoomProfile<'a> {
    pub room: &'a Room,
    pub window: OperatingWindow,
}

impl<'a> RoomProfile<'a> {
    pub fn new(room: &'a Room, window: OperatingWindow) -> Self {
        Self { room, window }
    }

    pub fn id(&self) -> RoomId {
        self.room.id
    }

    /// Bookable days in calendar order.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL
            .into_iter()
            .filter(|d| self.room.is_available_on(*d))
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One proposed `(day, [start, end))` placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub day: Weekday,
    pub interval: Interval,
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Find `sessions_needed` sessions of `hours_per_session` hours for
/// `section` in `room`.
///
/// Returns `None` (and proposes nothing) if fewer than `sessions_needed`
/// weekdays can host a session, or if the duration rounds to zero minutes.
pub fn find_sessions(
    room: &RoomProfile<'_>,
    section: SectionId,
    hours_per_session: f64,
    sessions_needed: usize,
    occupancy: &Occupancy,
    step_minutes: u16,
) -> Option<Vec<Session>> {
    let duration = hours_to_minutes(hours_per_session);
    if duration == 0 || sessions_needed == 0 {
        return None;
    }
    let step = step_minutes.max(1);

    let mut found = Vec::with_capacity(sessions_needed);
    for day in room.days() {
        if let Some(interval) = first_fit(room, section, day, duration, occupancy, step) {
            found.push(Session { day, interval });
            if found.len() == sessions_needed {
                debug!(
                    room = %room.room.name,
                    section,
                    duration_min = duration,
                    days = ?found.iter().map(|s| s.day).collect::<Vec<_>>(),
                    "sessions found"
                );
                return Some(found);
            }
        }
    }

    None
}

/// Earliest free `[start, start + duration)` on `day`, trying starts from the
/// room's opening time in `step`-minute increments.
fn first_fit(
    room: &RoomProfile<'_>,
    section: SectionId,
    day: Weekday,
    duration: u16,
    occupancy: &Occupancy,
    step: u16,
) -> Option<Interval> {
    candidate_starts(room.window, duration, step)
        .filter_map(|start| {
            let end = start.checked_add_minutes(duration)?;
            Some(Interval::new(start, end))
        })
        .find(|interval| occupancy.is_free(room.id(), section, day, *interval))
}

/// Every start time `open + k·step` whose session still ends by `close`.
fn candidate_starts(
    window: OperatingWindow,
    duration: u16,
    step: u16,
) -> impl Iterator<Item = TimeOfDay> {
    let open = window.open.minutes();
    let close = window.close.minutes();
    let last_start = close.checked_sub(duration);

    (0u16..)
        .map_while(move |k| {
            let start = open.checked_add(k.checked_mul(step)?)?;
            match last_start {
                Some(last) if start <= last => Some(start),
                _ => None,
            }
        })
        .filter_map(TimeOfDay::from_minutes)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
