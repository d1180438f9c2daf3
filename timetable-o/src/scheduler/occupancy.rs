/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Occupancy index: which time intervals are already taken, per resource and
//! weekday.
//!
//! One [`OccupancyIndex`] tracks rooms and another tracks sections; the pair
//! travels together as [`Occupancy`].  Both are owned by a single bucket run
//! and dropped when it ends; nothing here is global or shared between
//! buckets.
//!
//! Intervals are half-open `[start, end)` in minutes since midnight, so two
//! back-to-back sessions (`08:00–12:00`, `12:00–16:00`) do not collide.

use std::collections::HashMap;

use crate::catalog::{RoomId, SectionId};
use crate::clock::{TimeOfDay, Weekday};

/// Id of whatever an index tracks (a room id or a section id).
pub type ResourceId = u32;

// ── Interval ──────────────────────────────────────────────────────────────────

/// Half-open busy interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Interval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        debug_assert!(start < end, "empty or inverted interval {start}..{end}");
        Self { start, end }
    }

    /// `start1 < end2 && start2 < end1`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }
}

// ── OccupancyIndex ────────────────────────────────────────────────────────────

/// Per-resource, per-weekday list of busy intervals, kept sorted by start.
#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    busy: HashMap<(ResourceId, Weekday), Vec<Interval>>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index with an empty entry for every `resource × weekday`.
    ///
    /// Pre-seeding is not required for correctness (absent keys are free),
    /// but it sizes the map once up front for the whole bucket.
    pub fn with_resources<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ResourceId>,
    {
        let mut busy = HashMap::new();
        for id in ids {
            for day in Weekday::ALL {
                busy.insert((id, day), Vec::new());
            }
        }
        Self { busy }
    }

    /// `true` iff nothing stored for `(id, day)` overlaps `interval`.
    pub fn is_free(&self, id: ResourceId, day: Weekday, interval: Interval) -> bool {
        self.busy(id, day).iter().all(|b| !b.overlaps(&interval))
    }

    /// Record `interval` as busy.  Does not check for overlap; callers test
    /// with [`is_free`](Self::is_free) first.
    pub fn reserve(&mut self, id: ResourceId, day: Weekday, interval: Interval) {
        let slots = self.busy.entry((id, day)).or_default();
        let pos = slots.partition_point(|b| b.start <= interval.start);
        slots.insert(pos, interval);
    }

    /// Remove one interval exactly equal to `interval`.
    ///
    /// Returns `false` if no such reservation exists.
    pub fn release(&mut self, id: ResourceId, day: Weekday, interval: Interval) -> bool {
        let Some(slots) = self.busy.get_mut(&(id, day)) else {
            return false;
        };
        match slots.iter().position(|b| *b == interval) {
            Some(pos) => {
                slots.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Busy intervals for `(id, day)` in start order.
    pub fn busy(&self, id: ResourceId, day: Weekday) -> &[Interval] {
        self.busy.get(&(id, day)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of stored reservations.
    pub fn reservation_count(&self) -> usize {
        self.busy.values().map(Vec::len).sum()
    }
}

// ── Occupancy (room + section pair) ───────────────────────────────────────────

/// The room index and the section index of one bucket.
///
/// `Clone` is the speculative-placement mechanism: dependent components are
/// tried against a clone, and only written to the real value once every
/// component has succeeded.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    pub rooms: OccupancyIndex,
    pub sections: OccupancyIndex,
}

impl Occupancy {
    /// Empty indices pre-seeded for the given rooms and sections.
    pub fn fresh<R, S>(rooms: R, sections: S) -> Self
    where
        R: IntoIterator<Item = RoomId>,
        S: IntoIterator<Item = SectionId>,
    {
        Self {
            rooms: OccupancyIndex::with_resources(rooms),
            sections: OccupancyIndex::with_resources(sections),
        }
    }

    /// `true` iff both the room and the section are free.
    pub fn is_free(&self, room: RoomId, section: SectionId, day: Weekday, interval: Interval) -> bool {
        self.rooms.is_free(room, day, interval) && self.sections.is_free(section, day, interval)
    }

    /// Reserve `interval` for both the room and the section.
    pub fn reserve(&mut self, room: RoomId, section: SectionId, day: Weekday, interval: Interval) {
        self.rooms.reserve(room, day, interval);
        self.sections.reserve(section, day, interval);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start_h: u16, start_m: u16, end_h: u16, end_m: u16) -> Interval {
        Interval::new(
            TimeOfDay::from_hm(start_h, start_m).unwrap(),
            TimeOfDay::from_hm(end_h, end_m).unwrap(),
        )
    }

    // ── Interval ──────────────────────────────────────────────────────────────

    #[test]
    fn overlap_is_half_open() {
        assert!(iv(8, 0, 12, 0).overlaps(&iv(11, 30, 13, 0)));
        assert!(iv(8, 0, 12, 0).overlaps(&iv(9, 0, 10, 0)));
        assert!(!iv(8, 0, 12, 0).overlaps(&iv(12, 0, 13, 0)), "touching is not overlapping");
        assert!(!iv(12, 0, 13, 0).overlaps(&iv(8, 0, 12, 0)));
    }

    #[test]
    fn duration_is_in_minutes() {
        assert_eq!(iv(7, 0, 9, 40).duration_minutes(), 160);
    }

    // ── OccupancyIndex ────────────────────────────────────────────────────────

    #[test]
    fn fresh_index_is_free_everywhere() {
        let idx = OccupancyIndex::with_resources([1, 2]);
        for day in Weekday::ALL {
            assert!(idx.is_free(1, day, iv(0, 0, 23, 0)));
        }
        assert_eq!(idx.reservation_count(), 0);
    }

    #[test]
    fn reserve_blocks_overlaps_only_for_same_resource_and_day() {
        let mut idx = OccupancyIndex::new();
        idx.reserve(1, Weekday::Mon, iv(8, 0, 12, 0));

        assert!(!idx.is_free(1, Weekday::Mon, iv(10, 0, 11, 0)));
        assert!(idx.is_free(1, Weekday::Mon, iv(12, 0, 14, 0)));
        assert!(idx.is_free(1, Weekday::Tue, iv(10, 0, 11, 0)));
        assert!(idx.is_free(2, Weekday::Mon, iv(10, 0, 11, 0)));
    }

    #[test]
    fn busy_intervals_stay_sorted_by_start() {
        let mut idx = OccupancyIndex::new();
        idx.reserve(1, Weekday::Wed, iv(13, 0, 14, 0));
        idx.reserve(1, Weekday::Wed, iv(8, 0, 9, 0));
        idx.reserve(1, Weekday::Wed, iv(10, 0, 11, 0));

        let starts: Vec<u16> = idx.busy(1, Weekday::Wed).iter().map(|b| b.start.hour()).collect();
        assert_eq!(starts, vec![8, 10, 13]);
    }

    #[test]
    fn release_removes_exact_match_only() {
        let mut idx = OccupancyIndex::new();
        idx.reserve(1, Weekday::Fri, iv(8, 0, 10, 0));

        assert!(!idx.release(1, Weekday::Fri, iv(8, 0, 9, 0)));
        assert!(!idx.release(1, Weekday::Thu, iv(8, 0, 10, 0)));
        assert!(!idx.is_free(1, Weekday::Fri, iv(8, 0, 9, 0)));

        assert!(idx.release(1, Weekday::Fri, iv(8, 0, 10, 0)));
        assert!(idx.is_free(1, Weekday::Fri, iv(8, 0, 9, 0)));
        assert_eq!(idx.reservation_count(), 0);
    }

    // ── Occupancy ─────────────────────────────────────────────────────────────

    #[test]
    fn pair_requires_room_and_section_to_be_free() {
        let mut occ = Occupancy::fresh([10], [20, 21]);
        occ.reserve(10, 20, Weekday::Mon, iv(8, 0, 12, 0));

        // room busy
        assert!(!occ.is_free(10, 21, Weekday::Mon, iv(9, 0, 10, 0)));
        // section busy
        assert!(!occ.is_free(11, 20, Weekday::Mon, iv(9, 0, 10, 0)));
        // both free
        assert!(occ.is_free(11, 21, Weekday::Mon, iv(9, 0, 10, 0)));
    }

    #[test]
    fn clone_is_independent_of_original() {
        let occ = Occupancy::fresh([1], [1]);
        let mut scratch = occ.clone();
        scratch.reserve(1, 1, Weekday::Sat, iv(8, 0, 9, 0));

        assert!(occ.is_free(1, 1, Weekday::Sat, iv(8, 0, 9, 0)));
        assert!(!scratch.is_free(1, 1, Weekday::Sat, iv(8, 0, 9, 0)));
    }
}
