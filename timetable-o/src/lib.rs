/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Timetable-O: greedy weekly timetable generator
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── catalog         – programs, sections, courses, rooms, output rows
//! ├── clock/          – weekdays, times of day, operating windows, parsing
//! ├── config/         – YAML catalog + engine settings loader
//! ├── scheduler/      – bucket driver, slot search, placement, audit
//! └── request         – precondition check + async run boundary
//! ```

pub mod catalog;
pub mod clock;
pub mod config;
pub mod request;
pub mod scheduler;
