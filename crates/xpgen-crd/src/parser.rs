//! CRD YAML parser
//!
//! Parses CustomResourceDefinition manifests into a structured
//! `CrdSchema` for tag-encoding detection, keeping the raw JSON value
//! alongside: the templating engine receives the CRD as opaque JSON.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{CrdError, Result};
use crate::schema::{
    AdditionalProperties, CrdSchema, CrdVersionSchema, OpenApiSchema, PropertyType, SchemaProperty,
};

/// A fetched and parsed CRD, valid for one generation pass.
#[derive(Debug, Clone)]
pub struct CrdDocument {
    /// Structured schema used for tag detection
    pub schema: CrdSchema,
    json: Value,
}

impl CrdDocument {
    /// Parse a CRD YAML manifest.
    pub fn parse(yaml: &str) -> Result<Self> {
        let json: Value = serde_yaml::from_str(yaml)?;
        let schema = parse_value(&json)?;
        Ok(Self { schema, json })
    }

    /// The raw CRD as JSON, passed through to the templating engine.
    pub fn as_json(&self) -> &Value {
        &self.json
    }
}

fn parse_value(value: &Value) -> Result<CrdSchema> {
    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| CrdError::InvalidCrd {
            message: "Missing 'kind' field".to_string(),
        })?;

    if kind != "CustomResourceDefinition" {
        return Err(CrdError::InvalidCrd {
            message: format!("Expected CustomResourceDefinition, got {kind}"),
        });
    }

    let name = value
        .get("metadata")
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| CrdError::InvalidCrd {
            message: "Missing 'metadata.name' field".to_string(),
        })?
        .to_string();

    let spec = value.get("spec").ok_or_else(|| CrdError::InvalidCrd {
        message: "Missing 'spec' field".to_string(),
    })?;

    let group = spec
        .get("group")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let versions = spec
        .get("versions")
        .and_then(Value::as_array)
        .ok_or_else(|| CrdError::InvalidCrd {
            message: "Missing 'spec.versions' array".to_string(),
        })?
        .iter()
        .map(parse_version)
        .collect::<Result<Vec<_>>>()?;

    Ok(CrdSchema {
        name,
        group,
        versions,
    })
}

fn parse_version(version: &Value) -> Result<CrdVersionSchema> {
    let name = version
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| CrdError::InvalidCrd {
            message: "Version missing 'name' field".to_string(),
        })?
        .to_string();

    let served = version
        .get("served")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let storage = version
        .get("storage")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let schema = version
        .get("schema")
        .and_then(|s| s.get("openAPIV3Schema"))
        .map(parse_openapi_schema);

    Ok(CrdVersionSchema {
        name,
        served,
        storage,
        schema,
    })
}

fn parse_openapi_schema(schema: &Value) -> OpenApiSchema {
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(parse_property_map)
        .unwrap_or_default();

    OpenApiSchema { properties }
}

fn parse_property_map(
    obj: &serde_json::Map<String, Value>,
) -> BTreeMap<String, SchemaProperty> {
    obj.iter()
        .map(|(k, v)| (k.clone(), parse_schema_property(v)))
        .collect()
}

fn parse_schema_property(prop: &Value) -> SchemaProperty {
    let type_ = prop
        .get("type")
        .and_then(Value::as_str)
        .map(PropertyType::parse)
        .unwrap_or_default();

    let properties = prop
        .get("properties")
        .and_then(Value::as_object)
        .map(parse_property_map);

    let items = prop
        .get("items")
        .map(|v| Box::new(parse_schema_property(v)));

    let additional_properties = prop.get("additionalProperties").map(|v| {
        if let Some(allowed) = v.as_bool() {
            if allowed {
                AdditionalProperties::Allowed
            } else {
                AdditionalProperties::Denied
            }
        } else {
            AdditionalProperties::Schema(Box::new(parse_schema_property(v)))
        }
    });

    SchemaProperty {
        type_,
        properties,
        items,
        additional_properties,
    }
}
