//! # Flowsheet CLI Module
//!
//! Every command loads the catalog, restores the selection state from the
//! state file, applies at most one transition and writes the state back.
//!
//! ## Available Commands
//!
//! - `programs` - List programs by department, plus the Minor and Honors pools
//! - `open` - Open a program (discards previous selections)
//! - `choose` - Choose or clear an elective option
//! - `minor` / `honors` - Select, clear or list tracks
//! - `reset` - Drop every choice, keep the program
//! - `show` - Print the resolved grid
//! - `conflicts` - Print disabled options and tracks
//! - `relations` - Prerequisites and postrequisites of one slot
//! - `validate` - Check the catalog and print warnings
//! - `server` - Start the HTTP server

mod commands;

use clap::{Parser, Subcommand};
use flowsheet_core::{FlowsheetError, TrackKind};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Flowsheet - Curriculum Browser
///
/// Resolve elective, minor and honors slots of a degree program and explore
/// the prerequisite graph that results.
#[derive(Parser, Debug)]
#[command(name = "flowsheet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the catalog document (TOML or JSON)
    #[arg(short = 'C', long, global = true, default_value = "catalogs/demo.toml")]
    pub catalog: PathBuf,

    /// Path to the selection state file
    #[arg(short = 'S', long, global = true, default_value = "flowsheet.state")]
    pub state: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List programs and tracks
    Programs,

    /// Open a program, discarding all selections
    Open {
        /// Program id
        program: String,
    },

    /// Choose an elective option, or clear the slot when no option is given
    Choose {
        /// Elective slot id
        slot: String,

        /// Option id
        option: Option<String>,
    },

    /// Select a minor; lists minors when no id is given
    Minor {
        /// Minor id
        id: Option<String>,

        /// Clear the active minor
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },

    /// Select an honors track; lists tracks when no id is given
    Honors {
        /// Honors track id
        id: Option<String>,

        /// Clear the active honors track
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },

    /// Drop every choice and track, keeping the program open
    Reset,

    /// Show the resolved flowsheet
    Show {
        /// Slot to use as the active slot
        #[arg(short, long)]
        focus: Option<String>,
    },

    /// Show disabled options, minors and honors tracks
    Conflicts,

    /// Show prerequisites and postrequisites of a slot
    Relations {
        /// Slot id
        slot: String,
    },

    /// Validate the catalog
    Validate,

    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), FlowsheetError> {
    let ctx = CommandContext {
        catalog: cli.catalog,
        state: cli.state,
        json_mode: cli.json_mode,
    };

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&ctx, &host, port).await,
        Some(Commands::Programs) | None => cmd_programs(&ctx),
        Some(Commands::Open { program }) => cmd_open(&ctx, &program),
        Some(Commands::Choose { slot, option }) => cmd_choose(&ctx, &slot, option.as_deref()),
        Some(Commands::Minor { id, clear }) => {
            cmd_track(&ctx, TrackKind::Minor, id.as_deref(), clear)
        }
        Some(Commands::Honors { id, clear }) => {
            cmd_track(&ctx, TrackKind::Honors, id.as_deref(), clear)
        }
        Some(Commands::Reset) => cmd_reset(&ctx),
        Some(Commands::Show { focus }) => cmd_show(&ctx, focus.as_deref()),
        Some(Commands::Conflicts) => cmd_conflicts(&ctx),
        Some(Commands::Relations { slot }) => cmd_relations(&ctx, &slot),
        Some(Commands::Validate) => cmd_validate(&ctx),
    }
}

// =============================================================================
// TESTS
// =============================================================================
