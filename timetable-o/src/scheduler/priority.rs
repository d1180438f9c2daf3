/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Processing order: bucket partitioning and course priority.
//!
//! A run is split into independent `(program, term)` buckets.  Each bucket
//! starts from empty occupancy, so rooms and sections booked in one bucket
//! are free again in the next.
//!
//! | Level | Order |
//! |---|---|
//! | programs | `BSCS`, `BSIS`, `BSIT`, then any other code alphabetically |
//! | terms | `TERM 1`, `TERM 2`, `TERM 3` |
//! | courses | year level ↑, type (`leclab` < `lecture` < `laboratory`), name, id |

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::catalog::{Course, CourseType, Program, ProgramId, Term};

/// Programmes scheduled first, in this order.
pub const PROGRAM_PRIORITY: [&str; 3] = ["BSCS", "BSIS", "BSIT"];

// ── Ranking helpers ───────────────────────────────────────────────────────────

/// Position of `code` in [`PROGRAM_PRIORITY`]; unknown codes rank after all
/// of them.
pub fn program_rank(code: &str) -> usize {
    PROGRAM_PRIORITY
        .iter()
        .position(|p| p.eq_ignore_ascii_case(code.trim()))
        .unwrap_or(PROGRAM_PRIORITY.len())
}

/// Combined courses first: they need two rooms at once and are the hardest
/// to fit once the week fills up.
pub fn course_type_rank(course_type: CourseType) -> u8 {
    match course_type {
        CourseType::Leclab => 0,
        CourseType::Lecture => 1,
        CourseType::Laboratory => 2,
    }
}

/// Total order used inside a bucket.
pub fn compare_courses(a: &Course, b: &Course) -> Ordering {
    a.year_level
        .cmp(&b.year_level)
        .then_with(|| course_type_rank(a.course_type).cmp(&course_type_rank(b.course_type)))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

// ── Buckets ───────────────────────────────────────────────────────────────────

/// Courses of one `(program, term)` pair, already in processing order.
#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    pub program: &'a Program,
    pub term: Term,
    pub courses: Vec<&'a Course>,
}

/// Split `courses` into buckets, ordered by programme priority then term.
///
/// Empty buckets are omitted.  Courses whose `program_id` matches no
/// programme belong to no bucket (see [`orphan_courses`]).  If two programmes
/// share an id only the first is used.
pub fn partition<'a>(programs: &'a [Program], courses: &'a [Course]) -> Vec<Bucket<'a>> {
    let mut ordered: Vec<&Program> = Vec::with_capacity(programs.len());
    let mut seen: HashSet<ProgramId> = HashSet::new();
    for program in programs {
        if seen.insert(program.id) {
            ordered.push(program);
        }
    }
    ordered.sort_by(|a, b| {
        program_rank(&a.code)
            .cmp(&program_rank(&b.code))
            .then_with(|| a.code.cmp(&b.code))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut buckets = Vec::new();
    for program in ordered {
        for term in Term::ALL {
            let mut bucket_courses: Vec<&Course> = courses
                .iter()
                .filter(|c| c.program_id == program.id && c.term == term)
                .collect();
            if bucket_courses.is_empty() {
                continue;
            }
            bucket_courses.sort_by(|a, b| compare_courses(a, b));
            buckets.push(Bucket {
                program,
                term,
                courses: bucket_courses,
            });
        }
    }
    buckets
}

/// Courses that reference no known programme.
pub fn orphan_courses<'a>(programs: &[Program], courses: &'a [Course]) -> Vec<&'a Course> {
    let ids: HashSet<ProgramId> = programs.iter().map(|p| p.id).collect();
    courses.iter().filter(|c| !ids.contains(&c.program_id)).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
