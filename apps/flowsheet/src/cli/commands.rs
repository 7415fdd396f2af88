//! # CLI Command Implementations
//!
//! Each command rebuilds a [`Session`] from the catalog and the state file,
//! so consecutive invocations behave like one interactive session.

use crate::api;
use crate::loader::{load_catalog, validate_file_path, validate_file_size};
use flowsheet_core::{
    CourseId, CourseStatus, FlowsheetError, ProgramId, Session, SlotId, Track, TrackId, TrackKind,
    primitives::MAX_SNAPSHOT_SIZE, resolve_slot, snapshot_from_bytes, snapshot_to_bytes,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Paths and output mode shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub catalog: PathBuf,
    pub state: PathBuf,
    pub json_mode: bool,
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// STATE FILE
// =============================================================================

/// Validate the state file's directory; the file itself may not exist yet.
fn validate_output_path(path: &Path) -> Result<PathBuf, FlowsheetError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let canonical_parent = parent.canonicalize().map_err(|e| {
        FlowsheetError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(FlowsheetError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| FlowsheetError::IoError("State path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Load the catalog and restore the selection state, if a state file exists.
pub fn load_session(ctx: &CommandContext) -> Result<Session, FlowsheetError> {
    let loaded = load_catalog(&ctx.catalog)?;
    let mut session = Session::new(loaded.catalog);

    if ctx.state.exists() {
        let path = validate_file_path(&ctx.state)?;
        validate_file_size(&path, MAX_SNAPSHOT_SIZE as u64)?;
        let data = std::fs::read(&path)
            .map_err(|e| FlowsheetError::IoError(format!("Read state: {}", e)))?;
        session.restore(snapshot_from_bytes(&data)?)?;
    }

    Ok(session)
}

/// Write the session's selection state to the state file.
pub fn save_session(session: &Session, state: &Path) -> Result<(), FlowsheetError> {
    let path = validate_output_path(state)?;
    let data = snapshot_to_bytes(&session.snapshot())?;
    std::fs::write(&path, &data)
        .map_err(|e| FlowsheetError::IoError(format!("Write state: {}", e)))?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "state saved");
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server on the restored session.
pub async fn cmd_server(
    ctx: &CommandContext,
    host: &str,
    port: u16,
) -> Result<(), FlowsheetError> {
    let session = load_session(ctx)?;

    println!("Flowsheet Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:    {}", host);
    println!("  Port:    {}", port);
    println!("  Catalog: {:?}", ctx.catalog);
    if let Some(program) = session.program_id() {
        println!("  Program: {}", program);
    }
    println!();
    println!("Endpoints:");
    println!("  GET  /health    - Health check");
    println!("  GET  /programs  - List programs and tracks");
    println!("  POST /program   - Open a program");
    println!("  GET  /flowsheet - Resolved grid and overlays");
    println!("  POST /choice    - Choose or clear an elective option");
    println!("  POST /minor     - Select or clear the minor");
    println!("  POST /honors    - Select or clear the honors track");
    println!("  POST /reset     - Drop every selection");
    println!("  POST /hover     - Set the hovered slot");
    println!("  POST /focus     - Toggle the focused slot");
    println!("  GET  /snapshot  - Export selections");
    println!("  POST /snapshot  - Restore selections");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, session).await
}

// =============================================================================
// PROGRAMS COMMAND
// =============================================================================

/// List programs by department, then the track pools.
pub fn cmd_programs(ctx: &CommandContext) -> Result<(), FlowsheetError> {
    let catalog = load_catalog(&ctx.catalog)?.catalog;

    if ctx.json_mode {
        let departments: Vec<_> = catalog
            .programs_by_department()
            .into_iter()
            .map(|(department, programs)| {
                serde_json::json!({
                    "department": department,
                    "programs": programs
                        .iter()
                        .map(|p| serde_json::json!({
                            "id": p.id,
                            "name": p.name,
                            "slot_count": p.slot_count(),
                        }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        let summary = |tracks: &[Track]| -> Vec<serde_json::Value> {
            tracks
                .iter()
                .map(|t| {
                    serde_json::json!({"id": t.id, "name": t.name, "department": t.department})
                })
                .collect()
        };
        print_json(&serde_json::json!({
            "departments": departments,
            "minors": summary(&catalog.minors),
            "honors": summary(&catalog.honors),
        }));
        return Ok(());
    }

    println!("Programs");
    println!("========");
    for (department, programs) in catalog.programs_by_department() {
        println!();
        println!("{}", department);
        for program in programs {
            println!(
                "  {:<12} {} ({} slots)",
                program.id.as_str(),
                program.name,
                program.slot_count()
            );
        }
    }
    for (title, tracks) in [("Minors", &catalog.minors), ("Honors", &catalog.honors)] {
        println!();
        println!("{}", title);
        for track in tracks {
            println!("  {:<12} {} [{}]", track.id.as_str(), track.name, track.department);
        }
    }

    Ok(())
}

// =============================================================================
// TRANSITION COMMANDS
// =============================================================================

fn report_transition(ctx: &CommandContext, session: &Session, action: &str, applied: bool) {
    if ctx.json_mode {
        print_json(&serde_json::json!({
            "action": action,
            "applied": applied,
            "version": session.selections().version(),
        }));
    } else if applied {
        println!("{} (version {})", action, session.selections().version());
    } else {
        println!("{}: not applied", action);
    }
}

/// Open a program, discarding previous selections.
pub fn cmd_open(ctx: &CommandContext, program: &str) -> Result<(), FlowsheetError> {
    let mut session = load_session(ctx)?;
    session.open_program(&ProgramId::from(program))?;
    save_session(&session, &ctx.state)?;
    report_transition(ctx, &session, &format!("Opened {}", program), true);
    Ok(())
}

/// Choose an elective option, or clear the slot when `option` is `None`.
///
/// A refused choice (unknown or disabled option) is an error; clearing an
/// empty slot is not.
pub fn cmd_choose(
    ctx: &CommandContext,
    slot: &str,
    option: Option<&str>,
) -> Result<(), FlowsheetError> {
    let mut session = load_session(ctx)?;
    let slot_id = SlotId::from(slot);

    let (action, applied) = match option {
        Some(option) => {
            let action = format!("Chose {} for {}", option, slot);
            if !session.apply_choice(&slot_id, &CourseId::from(option))? {
                return Err(FlowsheetError::Rejected(action));
            }
            (action, true)
        }
        None => (format!("Cleared {}", slot), session.clear_choice(&slot_id)?),
    };

    if applied {
        save_session(&session, &ctx.state)?;
    }
    report_transition(ctx, &session, &action, applied);
    Ok(())
}

/// Select, clear or list the tracks of one kind.
pub fn cmd_track(
    ctx: &CommandContext,
    kind: TrackKind,
    id: Option<&str>,
    clear: bool,
) -> Result<(), FlowsheetError> {
    let mut session = load_session(ctx)?;

    if id.is_none() && !clear {
        return print_tracks(ctx, &session, kind);
    }

    let applied = session.select_track(kind, id.map(TrackId::from))?;
    let action = match id {
        Some(id) => format!("Selected {} {}", kind, id),
        None => format!("Cleared {}", kind),
    };
    if !applied {
        return Err(FlowsheetError::Rejected(action));
    }

    save_session(&session, &ctx.state)?;
    report_transition(ctx, &session, &action, true);
    Ok(())
}

/// Drop every choice and track but keep the program open.
pub fn cmd_reset(ctx: &CommandContext) -> Result<(), FlowsheetError> {
    let mut session = load_session(ctx)?;
    session.require_program()?;
    session.reset_selections();
    save_session(&session, &ctx.state)?;
    report_transition(ctx, &session, "Reset selections", true);
    Ok(())
}

fn print_tracks(
    ctx: &CommandContext,
    session: &Session,
    kind: TrackKind,
) -> Result<(), FlowsheetError> {
    session.require_program()?;
    let disabled = match kind {
        TrackKind::Minor => session.disabled_minors(),
        TrackKind::Honors => session.disabled_honors(),
    };
    let active = session.selections().track(kind);
    let tracks = session.catalog().tracks(kind);

    if ctx.json_mode {
        let list: Vec<_> = tracks
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "name": t.name,
                    "department": t.department,
                    "active": active == Some(&t.id),
                    "disabled": disabled.contains(&t.id),
                })
            })
            .collect();
        print_json(&serde_json::json!({ "kind": kind, "tracks": list }));
        return Ok(());
    }

    for track in tracks {
        let marker = if active == Some(&track.id) {
            "*"
        } else if disabled.contains(&track.id) {
            "x"
        } else {
            " "
        };
        println!(
            "{} {:<12} {} [{}]",
            marker,
            track.id.as_str(),
            track.name,
            track.department
        );
    }
    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

fn status_marker(status: CourseStatus) -> &'static str {
    match status {
        CourseStatus::Default => " ",
        CourseStatus::Active => "*",
        CourseStatus::Prereq => "<",
        CourseStatus::Postreq => ">",
    }
}

/// Print the resolved grid, optionally pivoted on one slot.
pub fn cmd_show(ctx: &CommandContext, focus: Option<&str>) -> Result<(), FlowsheetError> {
    let mut session = load_session(ctx)?;
    if let Some(slot) = focus {
        session.toggle_focus(SlotId::from(slot));
    }
    let view = session.view()?;

    if ctx.json_mode {
        print_json(&serde_json::to_value(&view).unwrap_or_default());
        return Ok(());
    }

    let title = format!("{} ({})", view.program_name, view.program);
    println!("{}", title);
    println!("{}", "=".repeat(title.chars().count()));
    println!(
        "Minor: {}   Honors: {}   Version: {}",
        view.minor.as_ref().map_or("-", TrackId::as_str),
        view.honors.as_ref().map_or("-", TrackId::as_str),
        view.version
    );

    for semester in &view.metrics.semesters {
        println!();
        println!(
            "{} ({} credits, {} core)",
            semester.label, semester.credits, semester.core_credits
        );
        for entry in view.courses.iter().filter(|c| c.semester_id == semester.semester_id) {
            let course = &entry.course;
            let title = course.course().map_or("", |c| c.title.as_str());
            println!(
                "  {} {:<9} {:<10} {:<36} {}",
                status_marker(entry.status),
                course.kind.as_str(),
                course.id.as_str(),
                format!("{} {}", course.display_code(), title).trim_end(),
                course.credits()
            );
        }
    }

    println!();
    println!(
        "Resolved {}/{} slots, {} credits",
        view.metrics.resolved_count, view.metrics.slot_count, view.metrics.total_credits
    );
    Ok(())
}

// =============================================================================
// CONFLICTS COMMAND
// =============================================================================

/// Print every disabled option and track.
pub fn cmd_conflicts(ctx: &CommandContext) -> Result<(), FlowsheetError> {
    let session = load_session(ctx)?;
    let view = session.view()?;

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "taken": view.taken,
            "disabled_options": view.disabled_options,
            "disabled_minors": view.disabled_minors,
            "disabled_honors": view.disabled_honors,
        }));
        return Ok(());
    }

    let print_set = |title: &str, ids: Vec<&str>| {
        println!("{}:", title);
        if ids.is_empty() {
            println!("  (none)");
        }
        for id in ids {
            println!("  {}", id);
        }
    };

    println!("Conflicts");
    println!("=========");
    print_set(
        "Disabled options",
        view.disabled_options.iter().map(CourseId::as_str).collect(),
    );
    print_set(
        "Disabled minors",
        view.disabled_minors.iter().map(TrackId::as_str).collect(),
    );
    print_set(
        "Disabled honors",
        view.disabled_honors.iter().map(TrackId::as_str).collect(),
    );
    Ok(())
}

// =============================================================================
// RELATIONS COMMAND
// =============================================================================

/// Prerequisites and postrequisites of one slot.
pub fn cmd_relations(ctx: &CommandContext, slot: &str) -> Result<(), FlowsheetError> {
    let mut session = load_session(ctx)?;
    session.require_program()?;
    session.toggle_focus(SlotId::from(slot));

    let effective = session.effective_courses();
    let rel = session.relationships();
    let connections = session.connections();

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "slot": slot,
            "prereq_ids": rel.prereq_ids,
            "postreq_ids": rel.postreq_ids,
            "connections": connections,
        }));
        return Ok(());
    }

    let describe = |ids: &BTreeSet<CourseId>| -> Vec<String> {
        ids.iter()
            .map(|id| match resolve_slot(id, &effective) {
                Some(course) if &course.id == id => id.to_string(),
                Some(course) => format!("{} (in {})", id, course.id),
                None => format!("{} (not on the grid)", id),
            })
            .collect()
    };

    println!("Relations of {}", slot);
    println!("=============={}", "=".repeat(slot.len()));
    println!("Prerequisites:  {}", describe(&rel.prereq_ids).join(", "));
    println!("Postrequisites: {}", describe(&rel.postreq_ids).join(", "));
    println!();
    println!("Connections:");
    for c in &connections {
        println!("  {} -> {} ({:?})", c.from, c.to, c.kind);
    }
    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Validate the catalog and print its warnings.
pub fn cmd_validate(ctx: &CommandContext) -> Result<(), FlowsheetError> {
    let loaded = load_catalog(&ctx.catalog)?;

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "valid": true,
            "programs": loaded.catalog.programs.len(),
            "minors": loaded.catalog.minors.len(),
            "honors": loaded.catalog.honors.len(),
            "warnings": loaded.warnings,
        }));
        return Ok(());
    }

    println!("Catalog {:?} is valid", ctx.catalog);
    println!(
        "  {} programs, {} minors, {} honors tracks",
        loaded.catalog.programs.len(),
        loaded.catalog.minors.len(),
        loaded.catalog.honors.len()
    );
    if !loaded.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &loaded.warnings {
            println!("  {}", warning);
        }
    }
    Ok(())
}
