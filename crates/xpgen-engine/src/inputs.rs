//! The external-input contract between xpgen and the templates
//!
//! Everything a generation script can see is assembled into one
//! serializable record and handed to the engine in a single step, so
//! the engine-input contract stays auditable and testable without
//! running the engine itself.

use serde::Serialize;
use std::collections::BTreeMap;

use xpgen_core::{GLOBAL_LABELS, Generator, GeneratorConfig};
use xpgen_crd::{CrdDocument, TagSchema};

use crate::error::Result;

/// Named inputs exposed to the generation script as its template
/// context. Lists and maps default to empty rather than null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalInputs {
    /// The full resolved per-resource configuration
    pub config: serde_json::Value,
    /// The CRD document as opaque JSON
    pub crd: serde_json::Value,
    /// Built-in labels every composition receives
    pub global_labels: Vec<String>,
    /// Resolved `tags.fromLabels`
    pub tag_list: Vec<String>,
    /// Resolved `tags.common`
    pub common_tags: BTreeMap<String, String>,
    /// Resolved `labels.fromCRD`
    pub label_list: Vec<String>,
    /// Resolved `labels.common`
    pub common_labels: BTreeMap<String, String>,
    /// Detected tag encoding (e.g. "keyValueArray")
    pub tag_type: String,
    /// Property the tags live under ("tag" or "tagSet")
    pub tag_property: String,
    /// Identifier stamped into every composition
    pub composition_identifier: String,
}

impl ExternalInputs {
    /// Assemble the inputs for one resource from its resolved
    /// configuration, the fetched CRD, and the detection result.
    pub fn assemble(
        generator: &Generator,
        global: &GeneratorConfig,
        crd: &CrdDocument,
        tag_schema: TagSchema,
    ) -> Result<Self> {
        Ok(Self {
            config: serde_json::to_value(generator)?,
            crd: crd.as_json().clone(),
            global_labels: GLOBAL_LABELS.iter().map(|s| s.to_string()).collect(),
            tag_list: generator.tags.from_labels.clone(),
            common_tags: generator.tags.common.clone(),
            label_list: generator.labels.from_crd.clone(),
            common_labels: generator.labels.common.clone(),
            tag_type: tag_schema.encoding.as_str().to_string(),
            tag_property: tag_schema
                .property
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            composition_identifier: global.composition_identifier.clone(),
        })
    }
}
