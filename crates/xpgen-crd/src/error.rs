//! CRD error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrdError {
    #[error("Failed to retrieve CRD from {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("CRD at {location} is empty")]
    Empty { location: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CRD YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid CRD: {message}")]
    InvalidCrd { message: String },

    #[error("No provider {field} given for CRD {file}")]
    MissingProviderField { field: String, file: String },
}

pub type Result<T> = std::result::Result<T, CrdError>;
