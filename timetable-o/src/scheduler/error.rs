/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the Timetable-O generator.
//!
//! Two types model the two failure layers:
//!
//! * [`ConflictReason`]: why one `(course, section)` pair could not be
//!   placed.  This is an expected, ordinary outcome: it is carried as data in
//!   a [`ConflictRecord`](crate::catalog::ConflictRecord), never raised.
//! * [`SchedulerError`]: the request around a run could not be served at all
//!   (missing input collections, deadline, worker failure).
//!
//! **Do not** turn `ConflictReason` into an error path: a run with conflicts
//! is still a successful run.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

// ── Placement failure ─────────────────────────────────────────────────────────

/// Closed set of reasons a course could not be placed for a section.
///
/// The `Display` strings are part of the output contract and are shown to end
/// users verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictReason {
    /// Pure lecture course: no lecture room yielded enough sessions.
    NoLectureRoomSlots,

    /// Pure laboratory course: no laboratory room yielded enough sessions.
    NoLabRoomSlots,

    /// Leclab course: the lecture component could not be placed, so the lab
    /// was never attempted.
    NoLectureRoomSlotsForLeclab,

    /// Leclab course: the lecture fitted but the lab did not; nothing was
    /// committed.
    NoLabRoomSlotsForLeclab,
}

impl ConflictReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictReason::NoLectureRoomSlots => "no available lecture room slots",
            ConflictReason::NoLabRoomSlots => "no available lab room slots",
            ConflictReason::NoLectureRoomSlotsForLeclab => {
                "no available lecture room slots for leclab"
            }
            ConflictReason::NoLabRoomSlotsForLeclab => "no available lab room slots for leclab",
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConflictReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ── Request-level errors ──────────────────────────────────────────────────────

/// Error returned by [`request::generate()`](crate::request::generate).
///
/// | Variant | Meaning for the caller |
/// |---|---|
/// | `MissingData` | bad request: configure the collection first |
/// | `DeadlineExceeded` | the run took longer than allowed; nothing to persist |
/// | `Worker` | the engine worker panicked or was cancelled |
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A required input collection is empty.
    #[error("missing required data: no {collection} configured, please ensure sections, courses, and rooms are configured")]
    MissingData { collection: &'static str },

    /// The run did not finish within the requested deadline.
    #[error("timetable generation exceeded the {deadline:?} deadline")]
    DeadlineExceeded { deadline: Duration },

    /// The blocking worker running the engine failed.
    #[error("timetable worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_reasons_render_contract_strings() {
        assert_eq!(
            ConflictReason::NoLectureRoomSlots.to_string(),
            "no available lecture room slots"
        );
        assert_eq!(ConflictReason::NoLabRoomSlots.to_string(), "no available lab room slots");
        assert_eq!(
            ConflictReason::NoLectureRoomSlotsForLeclab.to_string(),
            "no available lecture room slots for leclab"
        );
        assert_eq!(
            ConflictReason::NoLabRoomSlotsForLeclab.to_string(),
            "no available lab room slots for leclab"
        );
    }

    #[test]
    fn conflict_reason_serialises_as_plain_string() {
        let json = serde_json::to_string(&ConflictReason::NoLabRoomSlotsForLeclab).unwrap();
        assert_eq!(json, "\"no available lab room slots for leclab\"");
    }

    #[test]
    fn missing_data_names_the_collection() {
        let err = SchedulerError::MissingData { collection: "rooms" };
        assert!(err.to_string().contains("no rooms configured"));
    }
}
