//! Catalog dataset loading and engine settings.
//!
//! The data-access layer hands the engine one YAML document holding every
//! input collection plus optional tuning knobs:
//!
//! ```yaml
//! settings:
//!   slot_step_minutes: 30
//!   default_open: "08:00"
//!   default_close: "18:00"
//! programs:
//!   - { id: 1, code: BSCS, name: "BS Computer Science" }
//! sections:
//!   - { id: 1, program_id: 1, year_level: 1, letter: A, student_count: 40 }
//! courses:
//!   - { id: 1, program_id: 1, code: CS101, name: "Intro to Computing",
//!       type: lecture, year_level: 1, term: "TERM 1", hours_lecture: 4, hours_lab: 0 }
//! rooms:
//!   - { id: 1, name: "LEC-101", type: lecture, start_time: "07:00:00",
//!       end_time: "21:00:00", available_days: "Mon,Tue,Wed,Thu,Fri,Sat" }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Course, Program, Room, Section};
use crate::clock::parse::parse_time_of_day;
use crate::clock::OperatingWindow;
use crate::scheduler::search::DEFAULT_SLOT_STEP_MINUTES;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    settings: SettingsEntry,
    #[serde(default)]
    programs: Vec<Program>,
    #[serde(default)]
    sections: Vec<Section>,
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    rooms: Vec<Room>,
}

/// Settings as they appear in the YAML file.  Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct SettingsEntry {
    slot_step_minutes: Option<u16>,
    default_open: Option<String>,
    default_close: Option<String>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Tuning knobs for one engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Granularity of candidate start times, in minutes.
    pub slot_step_minutes: u16,

    /// Window for rooms whose hours are missing or malformed.
    pub default_window: OperatingWindow,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            default_window: OperatingWindow::DEFAULT,
        }
    }
}

impl EngineSettings {
    /// Build settings from the raw YAML entry, falling back field by field.
    fn from_entry(entry: SettingsEntry) -> Self {
        let mut settings = Self::default();

        match entry.slot_step_minutes {
            Some(0) => warn!("slot_step_minutes must be positive, using {}", settings.slot_step_minutes),
            Some(step) => settings.slot_step_minutes = step,
            None => {}
        }

        let open = entry.default_open.as_deref().map(|raw| (raw, parse_time_of_day(raw)));
        let close = entry.default_close.as_deref().map(|raw| (raw, parse_time_of_day(raw)));
        for (field, value) in [("default_open", &open), ("default_close", &close)] {
            if let Some((raw, None)) = value {
                warn!(field, value = %raw, "malformed time in settings, keeping default");
            }
        }

        let open = open.and_then(|(_, t)| t).unwrap_or(settings.default_window.open);
        let close = close.and_then(|(_, t)| t).unwrap_or(settings.default_window.close);
        match OperatingWindow::new(open, close) {
            Some(window) => settings.default_window = window,
            None => warn!(%open, %close, "default window is empty or inverted, keeping 08:00–18:00"),
        }

        settings
    }
}

// ── CatalogManager ────────────────────────────────────────────────────────────

/// Loads and holds the catalog dataset and engine settings.
#[derive(Debug, Default)]
pub struct CatalogManager {
    catalog: Catalog,
    settings: EngineSettings,

    /// Set to `true` after a successful load.
    loaded: bool,
}

impl CatalogManager {
    /// Creates a new, empty `CatalogManager`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `path` and replaces the current catalog and settings.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or if the YAML is
    /// structurally invalid.  Catalog *content* problems (duplicate ids,
    /// dangling program references, …) are logged as warnings, not errors.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading catalog from: {}", path.display());

        self.reset();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open catalog file: {}", path.display()))?;

        self.load_from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))
    }

    /// Same as [`load_from_file`](Self::load_from_file) for an in-memory
    /// document.
    pub fn load_from_str(&mut self, content: &str) -> Result<()> {
        self.reset();

        let file: CatalogFile = serde_yaml::from_str(content)?;

        self.settings = EngineSettings::from_entry(file.settings);
        self.catalog = Catalog {
            programs: file.programs,
            sections: file.sections,
            courses: file.courses,
            rooms: file.rooms,
        };

        for room in &self.catalog.rooms {
            let (window, defaulted) = room.operating_window(self.settings.default_window);
            debug!(
                room = %room.name,
                kind = %room.room_type,
                %window,
                days = ?room.available_days,
                "room loaded"
            );
            if defaulted {
                warn!(
                    room = %room.name,
                    start_time = ?room.start_time,
                    end_time = ?room.end_time,
                    %window,
                    "room hours missing or malformed, using default window"
                );
            }
        }

        for issue in self.catalog.validate() {
            warn!("catalog issue: {issue}");
        }

        self.loaded = true;

        info!(
            programs = self.catalog.programs.len(),
            sections = self.catalog.sections.len(),
            courses = self.catalog.courses.len(),
            rooms = self.catalog.rooms.len(),
            slot_step_minutes = self.settings.slot_step_minutes,
            default_window = %self.settings.default_window,
            "Catalog loaded"
        );

        Ok(())
    }

    fn reset(&mut self) {
        self.catalog = Catalog::default();
        self.settings = EngineSettings::default();
        self.loaded = false;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Move the catalog out, leaving an empty one behind.
    pub fn take_catalog(&mut self) -> Catalog {
        self.loaded = false;
        std::mem::take(&mut self.catalog)
    }

    /// Returns `true` after a successful load.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CourseType, RoomType, Term};
    use crate::clock::{TimeOfDay, Weekday};
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const EXAMPLE: &str = r#"
programs:
  - { id: 1, code: BSCS, name: "BS Computer Science" }
  - { id: 2, code: BSIT, name: "BS Information Technology" }
sections:
  - { id: 1, program_id: 1, year_level: 1, letter: A, student_count: 40 }
  - { id: 2, program_id: 1, year_level: 1, letter: B, student_count: 39 }
courses:
  - { id: 1, program_id: 1, code: CS101, name: "Intro to Computing", type: lecture,
      year_level: 1, term: "TERM 1", hours_lecture: 4, hours_lab: 0 }
  - { id: 2, program_id: 1, code: CS102, name: "Programming 1", type: leclab,
      year_level: 1, term: "TERM 1", hours_lecture: 2.67, hours_lab: 4 }
rooms:
  - { id: 1, name: "LEC-101", type: lecture, start_time: "07:00:00",
      end_time: "21:00:00", available_days: "Mon,Tue,Wed,Thu,Fri,Sat" }
  - { id: 2, name: "LAB-1", type: laboratory, available_days: [Mon, Wed, Fri] }
"#;

    // ── EngineSettings ────────────────────────────────────────────────────────

    #[test]
    fn default_settings_use_thirty_minute_steps_and_eight_to_six() {
        let s = EngineSettings::default();
        assert_eq!(s.slot_step_minutes, 30);
        assert_eq!(s.default_window, OperatingWindow::DEFAULT);
    }

    // ── CatalogManager: load_from_file ────────────────────────────────────────

    #[test]
    fn load_example_yaml() {
        let f = yaml_tempfile(EXAMPLE);
        let mut mgr = CatalogManager::new();
        mgr.load_from_file(f.path()).unwrap();

        assert!(mgr.is_loaded());
        let cat = mgr.catalog();
        assert_eq!(cat.programs.len(), 2);
        assert_eq!(cat.sections.len(), 2);
        assert_eq!(cat.courses.len(), 2);
        assert_eq!(cat.rooms.len(), 2);

        assert_eq!(cat.courses[1].course_type, CourseType::Leclab);
        assert_eq!(cat.courses[1].term, Term::One);
        assert_eq!(cat.rooms[0].available_days.len(), 6);
        assert_eq!(cat.rooms[1].room_type, RoomType::Laboratory);
        assert_eq!(
            cat.rooms[1].available_days,
            vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]
        );
        assert_eq!(mgr.settings(), EngineSettings::default());
    }

    #[test]
    fn settings_section_overrides_defaults() {
        let yaml = r#"
settings:
  slot_step_minutes: 20
  default_open: "07:30"
  default_close: "20:00:00"
"#;
        let mut mgr = CatalogManager::new();
        mgr.load_from_str(yaml).unwrap();

        let s = mgr.settings();
        assert_eq!(s.slot_step_minutes, 20);
        assert_eq!(s.default_window.open, TimeOfDay::from_hm(7, 30).unwrap());
        assert_eq!(s.default_window.close, TimeOfDay::from_hm(20, 0).unwrap());
    }

    #[test]
    fn bad_settings_fall_back_instead_of_failing() {
        let yaml = r#"
settings:
  slot_step_minutes: 0
  default_open: "soon"
  default_close: "06:00"
"#;
        let mut mgr = CatalogManager::new();
        mgr.load_from_str(yaml).unwrap();

        // step 0 rejected; open falls back to 08:00, making 08:00–06:00 inverted
        assert_eq!(mgr.settings(), EngineSettings::default());
    }

    #[test]
    fn empty_document_loads_empty_catalog() {
        let mut mgr = CatalogManager::new();
        mgr.load_from_str("{}\n").unwrap();
        assert!(mgr.is_loaded());
        assert!(mgr.catalog().rooms.is_empty());
    }

    #[test]
    fn missing_file_returns_error() {
        let mut mgr = CatalogManager::new();
        let result = mgr.load_from_file(Path::new("/nonexistent/path/catalog.yaml"));
        assert!(result.is_err());
        assert!(!mgr.is_loaded());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        let mut mgr = CatalogManager::new();
        assert!(mgr.load_from_file(f.path()).is_err());
        assert!(!mgr.is_loaded());
    }

    #[test]
    fn unknown_course_type_is_a_parse_error() {
        let yaml = r#"
courses:
  - { id: 1, program_id: 1, code: X, name: X, type: seminar, year_level: 1, term: "TERM 1" }
"#;
        let mut mgr = CatalogManager::new();
        assert!(mgr.load_from_str(yaml).is_err());
    }

    // ── CatalogManager: reload ────────────────────────────────────────────────

    #[test]
    fn reload_replaces_previous_catalog() {
        let mut mgr = CatalogManager::new();
        mgr.load_from_str(EXAMPLE).unwrap();
        assert_eq!(mgr.catalog().rooms.len(), 2);

        mgr.load_from_str("rooms:\n  - { id: 9, name: R9, type: lecture }\n").unwrap();
        assert_eq!(mgr.catalog().rooms.len(), 1);
        assert!(mgr.catalog().programs.is_empty(), "old programs must be gone");
    }

    #[test]
    fn take_catalog_moves_data_out() {
        let mut mgr = CatalogManager::new();
        mgr.load_from_str(EXAMPLE).unwrap();
        let cat = mgr.take_catalog();
        assert_eq!(cat.courses.len(), 2);
        assert!(mgr.catalog().courses.is_empty());
        assert!(!mgr.is_loaded());
    }
}
