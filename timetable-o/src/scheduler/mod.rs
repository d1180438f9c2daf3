//! Timetable generator for Timetable-O.
//!
//! [`TimetableScheduler`] assigns every course of a [`Catalog`] to rooms and
//! weekly time slots for each matching section.  The result is a
//! [`Timetable`]: one flat list of [`ScheduleEntry`](crate::catalog::ScheduleEntry) rows and one flat list
//! of [`ConflictRecord`]s for the pairs that could not be placed.
//!
//! # Pipeline
//!
//! ```text
//! generate()
//!  └─ priority::partition        (program, term) buckets, courses in priority order
//!      └─ run_bucket             fresh Occupancy per bucket
//!          └─ placement::place_course   per (course, section)
//!              └─ search::find_sessions  per candidate room
//!                  └─ occupancy           read, then commit on success
//! ```
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | State | Stateless `generate()`: all occupancy is local to one bucket |
//! | Failure | A course that does not fit is a [`ConflictRecord`], never an `Err` |
//! | Combined courses | Copy-then-commit, no rollback path exists |
//! | Ordering | Fixed priority, no backtracking across courses |
//! | Determinism | Same catalog ⇒ identical output, row for row |
//! | Thread safety | `Send + Sync` (no interior mutability) |
//!
//! # Example
//! ```rust,ignore
//! let scheduler = TimetableScheduler::new(Arc::new(catalog));
//! let timetable: Timetable = scheduler.generate();
//! ```

pub mod error;
pub mod occupancy;
pub mod placement;
pub mod priority;
pub mod search;
pub mod verify;

pub use error::{ConflictReason, SchedulerError};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, ConflictRecord, RoomType, Section, Timetable};
use crate::config::EngineSettings;

use occupancy::Occupancy;
use placement::{place_course, RoomPools};
use priority::{orphan_courses, partition, Bucket};
use search::RoomProfile;
use verify::audit;

// ── TimetableScheduler ────────────────────────────────────────────────────────

/// The Timetable-O generator.
///
/// Holds a shared reference to the catalog.  All per-run state (occupancy
/// indices, room profiles) is allocated inside [`generate()`](Self::generate)
/// and dropped at the end of the call.
pub struct TimetableScheduler {
    catalog: Arc<Catalog>,
    settings: EngineSettings,
}

impl TimetableScheduler {
    /// Create a scheduler with default [`EngineSettings`].
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_settings(catalog, EngineSettings::default())
    }

    pub fn with_settings(catalog: Arc<Catalog>, settings: EngineSettings) -> Self {
        Self { catalog, settings }
    }

    // ── Public entry point ────────────────────────────────────────────────────

    /// Run the whole catalog once and return every placed session and every
    /// conflict.
    ///
    /// Pure with respect to the catalog: calling it twice yields identical
    /// timetables.
    pub fn generate(&self) -> Timetable {
        let catalog = &*self.catalog;
        let rooms = self.build_room_pools();

        info!(
            programs = catalog.programs.len(),
            sections = catalog.sections.len(),
            courses = catalog.courses.len(),
            lecture_rooms = rooms.lecture.len(),
            lab_rooms = rooms.laboratory.len(),
            "=== TimetableScheduler::generate() ==="
        );

        for course in orphan_courses(&catalog.programs, &catalog.courses) {
            warn!(
                course = %course.code,
                program_id = course.program_id,
                "course references an unknown program, skipping"
            );
        }

        let mut timetable = Timetable::default();
        for bucket in partition(&catalog.programs, &catalog.courses) {
            self.run_bucket(&bucket, &rooms, &mut timetable);
        }

        self.run_audit(&timetable);

        info!(
            schedules = timetable.schedules.len(),
            conflicts = timetable.conflicts.len(),
            "=== Generation complete ==="
        );

        timetable
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bucket driver
    // ─────────────────────────────────────────────────────────────────────────

    /// Place every course of `bucket` for every matching section, starting
    /// from empty occupancy.
    fn run_bucket(&self, bucket: &Bucket<'_>, rooms: &RoomPools<'_>, timetable: &mut Timetable) {
        let program = bucket.program;
        let sections = self.sections_of(program.id);

        let mut occupancy = Occupancy::fresh(
            self.catalog.rooms.iter().map(|r| r.id),
            sections.iter().map(|s| s.id),
        );

        info!(
            program = %program.code,
            term = %bucket.term,
            courses = bucket.courses.len(),
            sections = sections.len(),
            "bucket started"
        );

        let mut placed = 0usize;
        let mut failed = 0usize;

        for course in &bucket.courses {
            for section in sections.iter().filter(|s| s.year_level == course.year_level) {
                let label = section.label(&program.code);

                match place_course(
                    course,
                    section,
                    rooms,
                    &mut occupancy,
                    self.settings.slot_step_minutes,
                ) {
                    Ok(entries) => {
                        placed += 1;
                        debug!(
                            course  = %course.code,
                            section = %label,
                            rows    = entries.len(),
                            "✓ placed"
                        );
                        timetable.schedules.extend(entries);
                    }
                    Err(reason) => {
                        failed += 1;
                        warn!(
                            course  = %course.code,
                            section = %label,
                            kind    = %course.course_type,
                            %reason,
                            "✗ conflict"
                        );
                        timetable.conflicts.push(ConflictRecord {
                            course: course.code.clone(),
                            section: label,
                            reason,
                            program: program.code.clone(),
                            term: bucket.term,
                            course_type: course.course_type,
                            course_name: course.name.clone(),
                        });
                    }
                }
            }
        }

        info!(
            program = %program.code,
            term = %bucket.term,
            placed,
            failed,
            reservations = occupancy.rooms.reservation_count(),
            "bucket done"
        );
    }

    /// Sections of `program_id` in a stable order (year, then letter, then id).
    fn sections_of(&self, program_id: u32) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self
            .catalog
            .sections
            .iter()
            .filter(|s| s.program_id == program_id)
            .collect();
        sections.sort_by(|a, b| {
            a.year_level
                .cmp(&b.year_level)
                .then_with(|| a.letter.cmp(&b.letter))
                .then_with(|| a.id.cmp(&b.id))
        });
        sections
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Initialisation helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve every room's window once and split rooms by type, keeping
    /// catalog order inside each pool.
    fn build_room_pools(&self) -> RoomPools<'_> {
        let mut pools = RoomPools::default();
        for room in &self.catalog.rooms {
            let (window, defaulted) = room.operating_window(self.settings.default_window);
            if defaulted {
                debug!(room = %room.name, %window, "using default operating window");
            }
            let profile = RoomProfile::new(room, window);
            match room.room_type {
                RoomType::Lecture => pools.lecture.push(profile),
                RoomType::Laboratory => pools.laboratory.push(profile),
            }
        }
        pools
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Post-run helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Audit the finished timetable and emit `warn!` per violation.
    fn run_audit(&self, timetable: &Timetable) {
        let violations = audit(&self.catalog, timetable, self.settings.default_window);
        for violation in &violations {
            warn!(%violation, "timetable invariant violated");
        }
        if violations.is_empty() {
            debug!("timetable audit clean");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
