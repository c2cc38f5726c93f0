//! Generator configuration model
//!
//! Two layers of configuration drive a generation run: one global
//! `GeneratorConfig` (loaded once, immutable) and one `Generator` per
//! discovered resource definition file. The local layer extends the
//! global shape with a per-field `globalHandling` policy that controls
//! how the two layers are combined (see `resolve`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Labels every composition receives regardless of configuration.
///
/// `tags.fromLabels` entries may always reference these.
pub const GLOBAL_LABELS: [&str; 4] = [
    "crossplane.io/claim-name",
    "crossplane.io/claim-namespace",
    "crossplane.io/composite",
    "external-name",
];

/// How a local configuration field combines with its global counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalHandling {
    /// Keep the local value and ignore the global one entirely.
    Replace,
    /// Merge the local value over the global one.
    Append,
}

/// A single field override applied by the template to the composition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverrideField {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_value: Option<serde_json::Value>,
    pub ignore: bool,
}

/// One composition to emit for the resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Composition {
    pub name: String,
    pub provider: String,
    pub default: bool,
}

/// Tag configuration shared by the global and local layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagConfig {
    pub from_labels: Vec<String>,
    pub common: BTreeMap<String, String>,
}

/// Label configuration shared by the global and local layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelConfig {
    pub from_crd: Vec<String>,
    pub common: BTreeMap<String, String>,
}

/// Per-sub-field merge policy for the local tag block.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalHandlingTags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_labels: Option<GlobalHandling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common: Option<GlobalHandling>,
}

/// Per-sub-field merge policy for the local label block.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalHandlingLabels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_crd: Option<GlobalHandling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common: Option<GlobalHandling>,
}

/// Local tag block: the global shape plus merge policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalTagConfig {
    pub from_labels: Vec<String>,
    pub common: BTreeMap<String, String>,
    pub global_handling: GlobalHandlingTags,
}

/// Local label block: the global shape plus merge policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalLabelConfig {
    pub from_crd: Vec<String>,
    pub common: BTreeMap<String, String>,
    pub global_handling: GlobalHandlingLabels,
}

/// Which CRD file to fetch and which schema version to inspect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrdConfig {
    pub file: String,
    pub version: String,
}

/// Provider descriptor shared by the global and local layers.
///
/// `base_url` is optional so "unset" (inherit) stays distinct from an
/// explicit override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalProviderConfig {
    pub name: String,
    pub version: String,
    #[serde(rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Local provider block: the global descriptor plus the CRD reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    pub name: String,
    pub version: String,
    #[serde(rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub crd: CrdConfig,
}

/// Process-wide generator configuration, loaded once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    pub composition_identifier: String,
    pub provider: GlobalProviderConfig,
    pub tags: TagConfig,
    pub labels: LabelConfig,
}

impl GeneratorConfig {
    /// Load the global configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Per-resource generator configuration.
///
/// Parsed from one discovered resource definition file and mutated in
/// place by the resolution step. Lives for one generation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Generator {
    pub group: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_secret_keys: Option<Vec<String>>,
    pub ignore: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_external_name: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid_field_path: Option<String>,
    pub override_fields: Vec<OverrideField>,
    pub compositions: Vec<Composition>,
    pub tags: LocalTagConfig,
    pub labels: LocalLabelConfig,
    pub provider: ProviderConfig,

    /// Directory the definition file was loaded from. Default output
    /// location for generated manifests.
    #[serde(skip)]
    pub source_dir: PathBuf,
}

impl Generator {
    /// Load a per-resource configuration from a YAML file.
    ///
    /// A malformed or unreadable file is an error; the caller skips the
    /// resource rather than proceeding with an empty configuration.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut generator: Generator = serde_yaml::from_str(&content)?;
        generator.source_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        Ok(generator)
    }

    /// Version to inspect in the CRD schema: the explicit CRD version
    /// when set, else the resource's own API version.
    pub fn crd_version(&self) -> &str {
        if self.provider.crd.version.is_empty() {
            &self.version
        } else {
            &self.provider.crd.version
        }
    }
}
