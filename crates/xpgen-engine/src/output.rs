//! Idempotent output writing
//!
//! Generated documents land at `<outDir>/<key>.yaml`, prefixed with an
//! autogeneration header. A file whose parsed content already equals
//! the generated document is left untouched, so repeated runs with
//! unchanged inputs modify nothing.

use chrono::Local;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

const AUTOGEN_HEADER: &str = "## WARNING: This file was autogenerated!\n\
                              ## Manual modifications will be overwritten\n\
                              ## unless ignore: true is set in generate.yaml!\n\
                              ## Last Modification: {timestamp}.\n\n";

const TIMESTAMP_FORMAT: &str = "%H:%M:%S on %m-%d-%Y";

/// Outcome of writing one resource's documents.
#[derive(Debug, Default)]
pub struct WriteSummary {
    /// Files created or overwritten
    pub written: Vec<PathBuf>,
    /// Files skipped because their content was unchanged
    pub skipped: Vec<PathBuf>,
    /// Per-key failures; other keys proceed regardless
    pub failed: Vec<(PathBuf, EngineError)>,
}

impl WriteSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Materialize all documents of one resource under `out_dir`.
///
/// A failing key is recorded and does not stop the remaining keys;
/// earlier writes are never rolled back.
pub fn write_documents(
    documents: &IndexMap<String, serde_json::Value>,
    out_dir: &Path,
) -> WriteSummary {
    let mut summary = WriteSummary::default();

    for (key, document) in documents {
        let path = out_dir.join(format!("{key}.yaml"));
        match write_document(&path, document) {
            Ok(true) => summary.written.push(path),
            Ok(false) => summary.skipped.push(path),
            Err(err) => summary.failed.push((path, err)),
        }
    }

    summary
}

/// Write one document, returning `false` when the existing file was
/// already semantically equal and nothing was touched.
fn write_document(path: &Path, document: &serde_json::Value) -> Result<bool> {
    if path.exists() {
        let existing = std::fs::read_to_string(path)?;
        // Header comments are ignored by the YAML parser, so the
        // comparison sees only the document content. An unparseable
        // file is simply regenerated.
        if let Ok(parsed) = serde_yaml::from_str::<serde_json::Value>(&existing) {
            if &parsed == document {
                return Ok(false);
            }
        }
    }

    let yaml = serde_yaml::to_string(document)?;
    let header = AUTOGEN_HEADER.replace(
        "{timestamp}",
        &Local::now().format(TIMESTAMP_FORMAT).to_string(),
    );

    std::fs::write(path, format!("{header}{yaml}"))?;
    Ok(true)
}
