//! # Catalog Loader
//!
//! Reads a catalog document from disk, parses it by extension and runs the
//! load-time validation before anything else sees it.
//!
//! - `.toml` is parsed with `toml`, everything else (`.json`) with `serde_json`
//! - Structural errors reject the file; warnings are logged and returned

use flowsheet_core::{Catalog, CatalogValidator, CatalogWarning, FlowsheetError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum catalog file size (16 MB).
pub const MAX_CATALOG_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Document formats a catalog can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    /// Pick the format from the file extension; JSON unless it says TOML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => CatalogFormat::Toml,
            _ => CatalogFormat::Json,
        }
    }
}

/// A parsed, validated catalog.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Arc<Catalog>,
    pub warnings: Vec<CatalogWarning>,
}

/// Validate file size before reading.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), FlowsheetError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| FlowsheetError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(FlowsheetError::DeserializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and make sure it is a regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, FlowsheetError> {
    let canonical = path.canonicalize().map_err(|e| {
        FlowsheetError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(FlowsheetError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Parse catalog text without validating it.
pub fn parse_catalog(text: &str, format: CatalogFormat) -> Result<Catalog, FlowsheetError> {
    match format {
        CatalogFormat::Toml => toml::from_str(text)
            .map_err(|e| FlowsheetError::DeserializationError(format!("TOML catalog: {}", e))),
        CatalogFormat::Json => serde_json::from_str(text)
            .map_err(|e| FlowsheetError::DeserializationError(format!("JSON catalog: {}", e))),
    }
}

/// Parse and validate catalog text.
pub fn load_catalog_str(
    text: &str,
    format: CatalogFormat,
) -> Result<LoadedCatalog, FlowsheetError> {
    let catalog = parse_catalog(text, format)?;
    let warnings = CatalogValidator::validate(&catalog)?;
    for warning in &warnings {
        tracing::warn!("catalog: {}", warning);
    }
    tracing::debug!(
        programs = catalog.programs.len(),
        minors = catalog.minors.len(),
        honors = catalog.honors.len(),
        "catalog loaded"
    );
    Ok(LoadedCatalog {
        catalog: Arc::new(catalog),
        warnings,
    })
}

/// Read, parse and validate a catalog file.
pub fn load_catalog(path: &Path) -> Result<LoadedCatalog, FlowsheetError> {
    let canonical = validate_file_path(path)?;
    validate_file_size(&canonical, MAX_CATALOG_FILE_SIZE)?;

    let text = std::fs::read_to_string(&canonical)
        .map_err(|e| FlowsheetError::IoError(format!("Read catalog: {}", e)))?;

    load_catalog_str(&text, CatalogFormat::from_path(&canonical))
}

// =============================================================================
// TESTS
// =============================================================================
