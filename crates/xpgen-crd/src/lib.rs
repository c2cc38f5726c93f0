//! xpgen CRD - CustomResourceDefinition handling for the composition generator
//!
//! Retrieval of provider CRD manifests (remote or local), structured
//! schema parsing, and classification of the tag encoding a provider
//! uses under `spec.forProvider`.

pub mod error;
pub mod fetch;
pub mod parser;
pub mod schema;
pub mod tags;

pub use error::{CrdError, Result};
pub use fetch::{CrdFetcher, DEFAULT_BASE_URL, crd_url};
pub use parser::CrdDocument;
pub use schema::{CrdSchema, CrdVersionSchema, OpenApiSchema, PropertyType, SchemaProperty};
pub use tags::{TagEncoding, TagProperty, TagSchema, detect};
