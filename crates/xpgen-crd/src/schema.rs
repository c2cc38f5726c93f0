//! Structured CRD schema representation
//!
//! A simplified view of a CustomResourceDefinition, focused on the
//! pieces tag-encoding detection needs: the version list and the
//! OpenAPI property tree under each version.

use std::collections::BTreeMap;

/// A parsed CustomResourceDefinition.
#[derive(Debug, Clone, PartialEq)]
pub struct CrdSchema {
    /// Full CRD name (e.g., "buckets.s3.aws.upbound.io")
    pub name: String,
    /// API group (e.g., "s3.aws.upbound.io")
    pub group: String,
    /// API versions with their schemas
    pub versions: Vec<CrdVersionSchema>,
}

impl CrdSchema {
    /// Look up a version entry by name. Version names are unique within
    /// one CRD, so the first match is the only match.
    pub fn version(&self, name: &str) -> Option<&CrdVersionSchema> {
        self.versions.iter().find(|v| v.name == name)
    }
}

/// A single API version of a CRD.
#[derive(Debug, Clone, PartialEq)]
pub struct CrdVersionSchema {
    /// Version name (e.g., "v1", "v1beta1")
    pub name: String,
    /// Whether this version is served by the API server
    pub served: bool,
    /// Whether this is the storage version
    pub storage: bool,
    /// OpenAPI v3 schema for validation
    pub schema: Option<OpenApiSchema>,
}

/// OpenAPI v3 schema attached to one CRD version.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpenApiSchema {
    /// Root properties (typically: apiVersion, kind, metadata, spec, status)
    pub properties: BTreeMap<String, SchemaProperty>,
}

/// Schema for a single property.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaProperty {
    /// Property type
    pub type_: PropertyType,
    /// Nested object properties
    pub properties: Option<BTreeMap<String, SchemaProperty>>,
    /// Array item schema
    pub items: Option<Box<SchemaProperty>>,
    /// Additional properties for objects
    pub additional_properties: Option<AdditionalProperties>,
}

impl SchemaProperty {
    /// Get a direct child property by name. Missing nesting levels are
    /// treated as absent, never as an error.
    pub fn property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.as_ref()?.get(name)
    }

    /// Check whether a direct child property exists.
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }
}

/// Property type in an OpenAPI schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    #[default]
    Object,
    /// Unknown or unspecified type
    Unknown(String),
}

impl PropertyType {
    /// Parse from the string representation used in CRD manifests.
    /// Detection is case-sensitive, matching the API server's behavior.
    pub fn parse(s: &str) -> Self {
        match s {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Additional-properties configuration for objects.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdditionalProperties {
    /// Additional properties are allowed (any type)
    #[default]
    Allowed,
    /// Additional properties are not allowed
    Denied,
    /// Additional properties must match a schema
    Schema(Box<SchemaProperty>),
}
