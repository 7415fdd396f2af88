//! # flowsheet
//!
//! Host application for `flowsheet-core`: catalog loading, a CLI that keeps
//! its selection state in a snapshot file, and an HTTP API over one shared
//! session.

pub mod api;
pub mod cli;
pub mod loader;
