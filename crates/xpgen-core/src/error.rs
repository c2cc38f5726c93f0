//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error(
        "Not all tags.fromLabels entries exist in labels.fromCRD, labels.common, or the built-in global labels: [{}]",
        fields.join(", ")
    )]
    UnresolvedTagLabels { fields: Vec<String> },
}

pub type Result<T> = std::result::Result<T, CoreError>;
