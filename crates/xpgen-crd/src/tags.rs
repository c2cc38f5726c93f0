//! Tag-encoding detection
//!
//! Providers encode key/value tags in different schema shapes. The
//! template needs to know which one a CRD uses, so the detector walks
//! `spec.properties.forProvider` of the requested schema version and
//! classifies the `tags` (or `tagging.tagSet`) property.

use serde::{Deserialize, Serialize};

use crate::schema::{AdditionalProperties, CrdSchema, PropertyType, SchemaProperty};

/// The schema shape a provider uses for tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagEncoding {
    /// Array of objects with `key`/`value` properties
    KeyValueArray,
    /// Array of objects with `tagKey`/`tagValue` properties
    TagKeyValueArray,
    /// Object mapping string to string
    StringObject,
    /// Detection failed; the resource must be skipped
    Unknown,
}

impl TagEncoding {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyValueArray => "keyValueArray",
            Self::TagKeyValueArray => "tagKeyValueArray",
            Self::StringObject => "stringObject",
            Self::Unknown => "",
        }
    }
}

/// Which property the tags were found under, needed for output shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagProperty {
    #[serde(rename = "tag")]
    Tag,
    #[serde(rename = "tagSet")]
    TagSet,
}

impl TagProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::TagSet => "tagSet",
        }
    }
}

/// Detection result, computed once per resource and cached for the
/// duration of generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSchema {
    pub encoding: TagEncoding,
    pub property: Option<TagProperty>,
}

impl TagSchema {
    fn unknown() -> Self {
        Self {
            encoding: TagEncoding::Unknown,
            property: None,
        }
    }
}

/// Classify the tag encoding of `crd` at the given schema version.
///
/// An absent version, a missing `tags`/`tagging.tagSet` property, or an
/// unrecognized shape all yield `TagEncoding::Unknown`.
pub fn detect(crd: &CrdSchema, version: &str) -> TagSchema {
    let Some((tags, property)) = find_tags_property(crd, version) else {
        return TagSchema::unknown();
    };

    TagSchema {
        encoding: classify(tags),
        property: Some(property),
    }
}

/// Locate the tags schema node under `spec.properties.forProvider`.
fn find_tags_property<'a>(
    crd: &'a CrdSchema,
    version: &str,
) -> Option<(&'a SchemaProperty, TagProperty)> {
    let openapi = crd.version(version)?.schema.as_ref()?;
    let for_provider = openapi.properties.get("spec")?.property("forProvider")?;

    if let Some(tags) = for_provider.property("tags") {
        return Some((tags, TagProperty::Tag));
    }
    if let Some(tag_set) = for_provider.property("tagging")?.property("tagSet") {
        return Some((tag_set, TagProperty::TagSet));
    }
    None
}

fn classify(tags: &SchemaProperty) -> TagEncoding {
    match tags.type_ {
        PropertyType::Array => {
            let Some(items) = tags.items.as_deref() else {
                return TagEncoding::Unknown;
            };
            if items.type_ != PropertyType::Object {
                return TagEncoding::Unknown;
            }
            if items.has_property("key") && items.has_property("value") {
                TagEncoding::KeyValueArray
            } else if items.has_property("tagKey") && items.has_property("tagValue") {
                TagEncoding::TagKeyValueArray
            } else {
                TagEncoding::Unknown
            }
        }
        PropertyType::Object => match tags.additional_properties.as_ref() {
            Some(AdditionalProperties::Schema(inner)) if inner.type_ == PropertyType::String => {
                TagEncoding::StringObject
            }
            _ => TagEncoding::Unknown,
        },
        _ => TagEncoding::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CrdDocument;

    fn crd_with_tags(tags_schema: &str) -> CrdSchema {
        let yaml = format!(
            r#"
kind: CustomResourceDefinition
metadata:
  name: tests.example.com
spec:
  group: example.com
  versions:
    - name: v1beta1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                forProvider:
                  type: object
                  properties:
{tags_schema}
"#
        );
        CrdDocument::parse(&yaml).unwrap().schema
    }

    #[test]
    fn test_detect_key_value_array() {
        let crd = crd_with_tags(
            r#"
                    tags:
                      type: array
                      items:
                        type: object
                        properties:
                          key:
                            type: string
                          value:
                            type: string
"#,
        );

        let tag_schema = detect(&crd, "v1beta1");
        assert_eq!(tag_schema.encoding, TagEncoding::KeyValueArray);
        assert_eq!(tag_schema.property, Some(TagProperty::Tag));
    }

    #[test]
    fn test_detect_tag_key_value_array() {
        let crd = crd_with_tags(
            r#"
                    tags:
                      type: array
                      items:
                        type: object
                        properties:
                          tagKey:
                            type: string
                          tagValue:
                            type: string
"#,
        );

        assert_eq!(detect(&crd, "v1beta1").encoding, TagEncoding::TagKeyValueArray);
    }

    #[test]
    fn test_detect_string_object() {
        let crd = crd_with_tags(
            r#"
                    tags:
                      type: object
                      additionalProperties:
                        type: string
"#,
        );

        assert_eq!(detect(&crd, "v1beta1").encoding, TagEncoding::StringObject);
    }

    #[test]
    fn test_detect_tag_set() {
        let crd = crd_with_tags(
            r#"
                    tagging:
                      type: object
                      properties:
                        tagSet:
                          type: array
                          items:
                            type: object
                            properties:
                              key:
                                type: string
                              value:
                                type: string
"#,
        );

        let tag_schema = detect(&crd, "v1beta1");
        assert_eq!(tag_schema.encoding, TagEncoding::KeyValueArray);
        assert_eq!(tag_schema.property, Some(TagProperty::TagSet));
    }

    #[test]
    fn test_detect_unknown_shape() {
        let crd = crd_with_tags(
            r#"
                    tags:
                      type: array
                      items:
                        type: string
"#,
        );

        let tag_schema = detect(&crd, "v1beta1");
        assert!(tag_schema.encoding.is_unknown());
        // the property itself was still found
        assert_eq!(tag_schema.property, Some(TagProperty::Tag));
    }

    #[test]
    fn test_detect_missing_version() {
        let crd = crd_with_tags(
            r#"
                    tags:
                      type: object
                      additionalProperties:
                        type: string
"#,
        );

        let tag_schema = detect(&crd, "v2");
        assert!(tag_schema.encoding.is_unknown());
        assert!(tag_schema.property.is_none());
    }

    #[test]
    fn test_detect_no_tags_property() {
        let crd = crd_with_tags(
            r#"
                    region:
                      type: string
"#,
        );

        assert!(detect(&crd, "v1beta1").encoding.is_unknown());
    }

    #[test]
    fn test_serialized_forms() {
        assert_eq!(
            serde_json::to_value(TagEncoding::KeyValueArray).unwrap(),
            "keyValueArray"
        );
        assert_eq!(
            serde_json::to_value(TagProperty::TagSet).unwrap(),
            "tagSet"
        );
        assert_eq!(TagEncoding::StringObject.as_str(), "stringObject");
    }
}
