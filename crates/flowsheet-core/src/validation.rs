//! # Catalog Validation
//!
//! Load-time checks run once by the host before a catalog is shared.
//!
//! ## Errors (catalog rejected)
//!
//! 1. Duplicate program ids
//! 2. Duplicate track ids within the Minor or Honors pool
//! 3. Duplicate course ids inside one track
//! 4. Duplicate slot ids, or duplicate option ids, within a program
//! 5. A slot id equal to an option id or a track course id
//! 6. A prerequisite cycle
//!
//! ## Warnings (catalog accepted)
//!
//! - `linked_slot_id` naming no elective slot
//! - `linked_option_id` missing from the linked slot's options
//! - Track slot index beyond the end of some track
//! - Prerequisite naming no known id
//!
//! An option id may legitimately equal a track course id: the same concrete
//! course reachable two ways is what the conflict engine exists for.

use crate::catalog::{Catalog, Program, Slot};
use crate::{CourseId, FlowsheetError, ProgramId, SlotId, TrackId, TrackKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// =============================================================================
// WARNINGS
// =============================================================================

/// A data-quality problem that does not prevent loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum CatalogWarning {
    DanglingLinkedSlot {
        program: ProgramId,
        slot: SlotId,
        linked_slot: SlotId,
    },
    DanglingLinkedOption {
        program: ProgramId,
        slot: SlotId,
        option: CourseId,
        linked_option: CourseId,
    },
    TrackIndexOutOfRange {
        program: ProgramId,
        slot: SlotId,
        kind: TrackKind,
        track: TrackId,
        index: usize,
        len: usize,
    },
    UnknownPrerequisite {
        owner: String,
        course: CourseId,
        prereq: CourseId,
    },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::DanglingLinkedSlot {
                program,
                slot,
                linked_slot,
            } => write!(
                f,
                "{program}: slot {slot} links to {linked_slot}, which is not an elective slot"
            ),
            CatalogWarning::DanglingLinkedOption {
                program,
                slot,
                option,
                linked_option,
            } => write!(
                f,
                "{program}: option {option} in {slot} links to unknown option {linked_option}"
            ),
            CatalogWarning::TrackIndexOutOfRange {
                program,
                slot,
                kind,
                track,
                index,
                len,
            } => write!(
                f,
                "{program}: {kind} slot {slot} index {index} is out of range \
                 for {track} ({len} courses)"
            ),
            CatalogWarning::UnknownPrerequisite {
                owner,
                course,
                prereq,
            } => write!(f, "{owner}: {course} requires unknown id {prereq}"),
        }
    }
}

// =============================================================================
// VALIDATOR
// =============================================================================

/// Structural checks over a parsed catalog.
pub struct CatalogValidator;

impl CatalogValidator {
    /// Validate the whole catalog.
    ///
    /// Returns the warnings on success and the first structural error
    /// otherwise.
    pub fn validate(catalog: &Catalog) -> Result<Vec<CatalogWarning>, FlowsheetError> {
        Self::check_unique(
            catalog.programs.iter().map(|p| p.id.as_str()),
            "program id",
            "catalog",
        )?;
        for kind in [TrackKind::Minor, TrackKind::Honors] {
            let pool = catalog.tracks(kind);
            Self::check_unique(pool.iter().map(|t| t.id.as_str()), "track id", kind.as_str())?;
            for track in pool {
                Self::check_unique(
                    track.courses.iter().map(|c| c.id.as_str()),
                    "course id",
                    track.id.as_str(),
                )?;
            }
        }

        let mut warnings = Vec::new();
        for program in &catalog.programs {
            Self::check_namespace(catalog, program)?;
            Self::check_acyclic(catalog, program)?;
            Self::collect_link_warnings(program, &mut warnings);
            Self::collect_index_warnings(catalog, program, &mut warnings);
            Self::collect_program_prereq_warnings(catalog, program, &mut warnings);
        }
        Self::collect_track_prereq_warnings(catalog, &mut warnings);

        Ok(warnings)
    }

    fn check_unique<'a>(
        ids: impl IntoIterator<Item = &'a str>,
        what: &str,
        scope: &str,
    ) -> Result<(), FlowsheetError> {
        let mut seen = BTreeSet::new();
        for id in ids {
            if !seen.insert(id) {
                return Err(FlowsheetError::InvalidCatalog(format!(
                    "duplicate {what} '{id}' in {scope}"
                )));
            }
        }
        Ok(())
    }

    fn check_namespace(catalog: &Catalog, program: &Program) -> Result<(), FlowsheetError> {
        let scope = program.id.as_str();
        Self::check_unique(program.slots().map(|s| s.id().as_str()), "slot id", scope)?;

        let option_ids: Vec<&CourseId> = program
            .slots()
            .filter_map(Slot::as_elective)
            .flat_map(|e| e.options.iter().map(|o| &o.id))
            .collect();
        Self::check_unique(option_ids.iter().map(|id| id.as_str()), "option id", scope)?;

        let mut courses: BTreeSet<&CourseId> = option_ids.into_iter().collect();
        courses.extend(Self::all_track_courses(catalog));

        if let Some(slot) = program.slots().find(|s| courses.contains(s.id())) {
            return Err(FlowsheetError::InvalidCatalog(format!(
                "slot id '{}' in {scope} collides with a course id",
                slot.id()
            )));
        }
        Ok(())
    }

    fn all_track_courses(catalog: &Catalog) -> impl Iterator<Item = &CourseId> {
        catalog
            .minors
            .iter()
            .chain(catalog.honors.iter())
            .flat_map(|t| t.courses.iter().map(|c| &c.id))
    }

    // =========================================================================
    // CYCLES
    // =========================================================================

    /// Dependency graph over slot ids and concrete course ids.
    ///
    /// A core slot depends on its prerequisites; an elective or track slot
    /// depends on every course that can fill it; a concrete course depends
    /// on its prerequisites.
    fn dependency_graph(
        catalog: &Catalog,
        program: &Program,
    ) -> BTreeMap<CourseId, BTreeSet<CourseId>> {
        let mut graph: BTreeMap<CourseId, BTreeSet<CourseId>> = BTreeMap::new();

        for track in catalog.minors.iter().chain(catalog.honors.iter()) {
            for course in &track.courses {
                graph
                    .entry(course.id.clone())
                    .or_default()
                    .extend(course.prereqs.iter().cloned());
            }
        }

        for slot in program.slots() {
            let deps = graph.entry(slot.id().clone()).or_default();
            match slot {
                Slot::Core(course) => deps.extend(course.prereqs.iter().cloned()),
                Slot::Elective(elective) => {
                    deps.extend(elective.options.iter().map(|o| o.id.clone()))
                }
                Slot::Minor(t) | Slot::Honors(t) => {
                    if let (Some((kind, _)), Some(index)) = (slot.as_track_slot(), t.index) {
                        deps.extend(
                            catalog
                                .tracks(kind)
                                .iter()
                                .filter_map(|track| track.course_at(index))
                                .map(|c| c.id.clone()),
                        );
                    }
                }
            }

            if let Slot::Elective(elective) = slot {
                for option in &elective.options {
                    graph
                        .entry(option.id.clone())
                        .or_default()
                        .extend(option.prereqs.iter().cloned());
                }
            }
        }

        graph
    }

    fn check_acyclic(catalog: &Catalog, program: &Program) -> Result<(), FlowsheetError> {
        let graph = Self::dependency_graph(catalog, program);
        let mut state: BTreeMap<&CourseId, Visit> = BTreeMap::new();
        let mut path: Vec<&CourseId> = Vec::new();

        for node in graph.keys() {
            if let Some(cycle) = Self::visit(node, &graph, &mut state, &mut path) {
                return Err(FlowsheetError::PrerequisiteCycle {
                    program: program.id.clone(),
                    cycle,
                });
            }
        }
        Ok(())
    }

    fn visit<'g>(
        node: &'g CourseId,
        graph: &'g BTreeMap<CourseId, BTreeSet<CourseId>>,
        state: &mut BTreeMap<&'g CourseId, Visit>,
        path: &mut Vec<&'g CourseId>,
    ) -> Option<Vec<CourseId>> {
        match state.get(node) {
            Some(Visit::Done) => return None,
            Some(Visit::OnPath) => {
                let start = path.iter().position(|n| *n == node).unwrap_or(0);
                let mut cycle: Vec<CourseId> = path[start..].iter().map(|n| (*n).clone()).collect();
                cycle.push(node.clone());
                return Some(cycle);
            }
            None => {}
        }

        state.insert(node, Visit::OnPath);
        path.push(node);
        if let Some(deps) = graph.get(node) {
            for dep in deps {
                // Unknown ids are leaves; they surface as warnings instead.
                let Some((key, _)) = graph.get_key_value(dep) else {
                    continue;
                };
                if let Some(cycle) = Self::visit(key, graph, state, path) {
                    return Some(cycle);
                }
            }
        }
        path.pop();
        state.insert(node, Visit::Done);
        None
    }

    // =========================================================================
    // WARNINGS
    // =========================================================================

    fn collect_link_warnings(program: &Program, warnings: &mut Vec<CatalogWarning>) {
        for elective in program.slots().filter_map(Slot::as_elective) {
            let Some(linked_slot) = &elective.linked_slot_id else {
                continue;
            };
            let Some(target) = program.slot(linked_slot).and_then(Slot::as_elective) else {
                warnings.push(CatalogWarning::DanglingLinkedSlot {
                    program: program.id.clone(),
                    slot: elective.id.clone(),
                    linked_slot: linked_slot.clone(),
                });
                continue;
            };
            for option in &elective.options {
                if let Some(linked_option) = &option.linked_option_id
                    && target.option(linked_option).is_none()
                {
                    warnings.push(CatalogWarning::DanglingLinkedOption {
                        program: program.id.clone(),
                        slot: elective.id.clone(),
                        option: option.id.clone(),
                        linked_option: linked_option.clone(),
                    });
                }
            }
        }
    }

    fn collect_index_warnings(
        catalog: &Catalog,
        program: &Program,
        warnings: &mut Vec<CatalogWarning>,
    ) {
        for slot in program.slots() {
            let Some((kind, track_slot)) = slot.as_track_slot() else {
                continue;
            };
            let Some(index) = track_slot.index else {
                continue;
            };
            for track in catalog.tracks(kind) {
                if index >= track.courses.len() {
                    warnings.push(CatalogWarning::TrackIndexOutOfRange {
                        program: program.id.clone(),
                        slot: track_slot.id.clone(),
                        kind,
                        track: track.id.clone(),
                        index,
                        len: track.courses.len(),
                    });
                }
            }
        }
    }

    fn collect_program_prereq_warnings(
        catalog: &Catalog,
        program: &Program,
        warnings: &mut Vec<CatalogWarning>,
    ) {
        let mut known: BTreeSet<&CourseId> = program.slots().map(Slot::id).collect();
        for elective in program.slots().filter_map(Slot::as_elective) {
            known.extend(elective.options.iter().map(|o| &o.id));
        }
        known.extend(Self::all_track_courses(catalog));

        let mut report = |course: &CourseId, prereqs: &[CourseId]| {
            for prereq in prereqs.iter().filter(|p| !known.contains(p)) {
                warnings.push(CatalogWarning::UnknownPrerequisite {
                    owner: program.id.to_string(),
                    course: course.clone(),
                    prereq: prereq.clone(),
                });
            }
        };

        for slot in program.slots() {
            match slot {
                Slot::Core(course) => report(&course.id, &course.prereqs),
                Slot::Elective(elective) => {
                    for option in &elective.options {
                        report(&option.id, &option.prereqs);
                    }
                }
                Slot::Minor(_) | Slot::Honors(_) => {}
            }
        }
    }

    /// Track course prerequisites may name any course of any program.
    fn collect_track_prereq_warnings(catalog: &Catalog, warnings: &mut Vec<CatalogWarning>) {
        let mut known: BTreeSet<&CourseId> = Self::all_track_courses(catalog).collect();
        for program in &catalog.programs {
            known.extend(program.slots().map(Slot::id));
            for elective in program.slots().filter_map(Slot::as_elective) {
                known.extend(elective.options.iter().map(|o| &o.id));
            }
        }

        for track in catalog.minors.iter().chain(catalog.honors.iter()) {
            for course in &track.courses {
                for prereq in course.prereqs.iter().filter(|p| !known.contains(p)) {
                    warnings.push(CatalogWarning::UnknownPrerequisite {
                        owner: track.id.to_string(),
                        course: course.id.clone(),
                        prereq: prereq.clone(),
                    });
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    OnPath,
    Done,
}

// =============================================================================
// TESTS
// =============================================================================
