/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Request boundary around one generation run.
//!
//! The engine itself is synchronous and CPU-bound.  [`generate()`] checks the
//! input collections, runs [`TimetableScheduler::generate`] once on a
//! blocking worker and shapes the summary a caller hands back to its client.
//!
//! ```text
//! caller ──► check_preconditions ──► spawn_blocking(generate) ──► GenerateOutcome
//!                 │                        │
//!                 └─ MissingData           └─ DeadlineExceeded / Worker
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::catalog::{Catalog, ConflictRecord, ScheduleEntry};
use crate::config::EngineSettings;
use crate::scheduler::{SchedulerError, TimetableScheduler};

// ── Response types ────────────────────────────────────────────────────────────

/// Summary returned to the client after a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub schedules_generated: usize,
    pub conflicts: Vec<ConflictRecord>,
}

/// Everything a run produced: the client summary plus the rows to persist.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub response: GenerateResponse,
    pub schedules: Vec<ScheduleEntry>,
}

// ── Preconditions ─────────────────────────────────────────────────────────────

/// Refuse a run when sections, courses or rooms are empty.
///
/// Programmes are not required: courses without a known programme are simply
/// skipped by the scheduler.
pub fn check_preconditions(catalog: &Catalog) -> Result<(), SchedulerError> {
    let missing = [
        ("sections", catalog.sections.is_empty()),
        ("courses", catalog.courses.is_empty()),
        ("rooms", catalog.rooms.is_empty()),
    ]
    .into_iter()
    .find_map(|(name, empty)| empty.then_some(name));

    match missing {
        Some(collection) => Err(SchedulerError::MissingData { collection }),
        None => Ok(()),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run the engine once for `catalog`.
///
/// With `deadline = Some(d)` the call gives up after `d`.  The worker thread
/// cannot be interrupted and finishes in the background; its output is
/// dropped.
///
/// # Errors
/// * [`SchedulerError::MissingData`] if a required collection is empty
/// * [`SchedulerError::DeadlineExceeded`] if the deadline elapsed
/// * [`SchedulerError::Worker`] if the worker panicked
pub async fn generate(
    catalog: Arc<Catalog>,
    settings: EngineSettings,
    deadline: Option<Duration>,
) -> Result<GenerateOutcome, SchedulerError> {
    check_preconditions(&catalog)?;

    let scheduler = TimetableScheduler::with_settings(catalog, settings);
    let worker = tokio::task::spawn_blocking(move || scheduler.generate());
    let timetable = join_within(worker, deadline).await?;

    info!(
        schedules = timetable.schedules.len(),
        conflicts = timetable.conflicts.len(),
        "generation request served"
    );

    Ok(GenerateOutcome {
        response: GenerateResponse {
            success: true,
            schedules_generated: timetable.schedules.len(),
            conflicts: timetable.conflicts,
        },
        schedules: timetable.schedules,
    })
}

/// Await a blocking worker, giving up once `deadline` has elapsed.
async fn join_within<T>(worker: JoinHandle<T>, deadline: Option<Duration>) -> Result<T, SchedulerError> {
    let Some(limit) = deadline else {
        return Ok(worker.await?);
    };
    match tokio::time::timeout(limit, worker).await {
        Ok(joined) => Ok(joined?),
        Err(_) => {
            warn!(deadline_ms = limit.as_millis() as u64, "generation deadline exceeded");
            Err(SchedulerError::DeadlineExceeded { deadline: limit })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Course, CourseType, Program, Room, RoomType, Section, Term};
    use crate::clock::Weekday;

    fn catalog() -> Catalog {
        Catalog {
            programs: vec![Program {
                id: 1,
                code: "BSCS".into(),
                name: "Computer Science".into(),
            }],
            sections: vec![Section {
                id: 1,
                program_id: 1,
                year_level: 3,
                letter: "A".into(),
                student_count: 30,
            }],
            courses: vec![Course {
                id: 1,
                program_id: 1,
                code: "CS301".into(),
                name: "Algorithms".into(),
                course_type: CourseType::Lecture,
                year_level: 3,
                term: Term::One,
                hours_lecture: 3.0,
                hours_lab: 0.0,
            }],
            rooms: vec![Room {
                id: 1,
                name: "LEC-1".into(),
                room_type: RoomType::Lecture,
                start_time: Some("08:00".into()),
                end_time: Some("18:00".into()),
                available_days: Weekday::ALL.to_vec(),
            }],
        }
    }

    #[test]
    fn preconditions_name_the_first_missing_collection() {
        let mut cat = catalog();
        assert!(check_preconditions(&cat).is_ok());

        cat.rooms.clear();
        assert!(matches!(
            check_preconditions(&cat),
            Err(SchedulerError::MissingData { collection: "rooms" })
        ));

        cat.sections.clear();
        assert!(matches!(
            check_preconditions(&cat),
            Err(SchedulerError::MissingData { collection: "sections" })
        ));
    }

    #[test]
    fn empty_programs_are_not_a_precondition_failure() {
        let mut cat = catalog();
        cat.programs.clear();
        assert!(check_preconditions(&cat).is_ok());
    }

    #[tokio::test]
    async fn generate_reports_row_count_and_conflicts() {
        let outcome = generate(Arc::new(catalog()), EngineSettings::default(), None)
            .await
            .unwrap();
        assert!(outcome.response.success);
        assert_eq!(outcome.response.schedules_generated, 1);
        assert_eq!(outcome.schedules.len(), 1);
        assert!(outcome.response.conflicts.is_empty());
    }

    #[tokio::test]
    async fn generate_refuses_missing_courses_without_running() {
        let mut cat = catalog();
        cat.courses.clear();
        let err = generate(Arc::new(cat), EngineSettings::default(), Some(Duration::from_secs(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::MissingData { collection: "courses" }));
    }

    #[tokio::test]
    async fn generous_deadline_does_not_interfere() {
        let outcome = generate(
            Arc::new(catalog()),
            EngineSettings::default(),
            Some(Duration::from_secs(30)),
        )
        .await
        .unwrap();
        assert_eq!(outcome.response.schedules_generated, 1);
    }

    #[tokio::test]
    async fn slow_worker_hits_the_deadline() {
        let worker = tokio::task::spawn_blocking(|| {
            std::thread::sleep(Duration::from_millis(300));
            42
        });
        let err = join_within(worker, Some(Duration::from_millis(10))).await.unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::DeadlineExceeded { deadline } if deadline == Duration::from_millis(10)
        ));
    }

    #[tokio::test]
    async fn worker_within_deadline_returns_its_value() {
        let worker = tokio::task::spawn_blocking(|| 7);
        assert_eq!(join_within(worker, Some(Duration::from_secs(5))).await.unwrap(), 7);
        let worker = tokio::task::spawn_blocking(|| 8);
        assert_eq!(join_within(worker, None).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn panicking_worker_is_reported() {
        let worker = tokio::task::spawn_blocking(|| -> u32 { panic!("engine blew up") });
        let err = join_within(worker, None).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Worker(_)));
    }

    #[test]
    fn response_serialises_with_camel_case_keys() {
        let response = GenerateResponse {
            success: true,
            schedules_generated: 12,
            conflicts: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "schedulesGenerated": 12, "conflicts": [] })
        );
    }
}
