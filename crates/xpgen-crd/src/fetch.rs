//! CRD retrieval
//!
//! Resolves the CRD location from the provider configuration (local
//! override, else global, else the built-in base URL) and fetches it.
//! Remote locations are downloaded over HTTPS into a scoped temporary
//! directory that is removed on every exit path; anything without an
//! http(s) scheme is read as a local file.

use xpgen_core::{Generator, GeneratorConfig};

use crate::error::{CrdError, Result};
use crate::parser::CrdDocument;

/// Where crossplane-contrib providers publish their CRD manifests.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/crossplane-contrib/{provider}/{version}/package/crds/{file}";

/// Substitute provider name, version and file name into a URL template.
pub fn crd_url(base: &str, provider: &str, version: &str, file: &str) -> String {
    base.replace("{provider}", provider)
        .replace("{version}", version)
        .replace("{file}", file)
}

/// Blocking CRD retrieval client.
pub struct CrdFetcher {
    client: reqwest::blocking::Client,
}

impl Default for CrdFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CrdFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Fetch and parse the CRD a generator refers to.
    ///
    /// Provider name, version and base URL each fall back from the
    /// local provider block to the global one; name and version must be
    /// non-empty after the fallback.
    pub fn load_for(&self, generator: &Generator, global: &GeneratorConfig) -> Result<CrdDocument> {
        let location = resolve_location(generator, global)?;
        tracing::debug!(location, "retrieving CRD");

        let content = self.fetch(&location)?;
        CrdDocument::parse(&content)
    }

    /// Fetch raw CRD content from a URL or a local path.
    pub fn fetch(&self, location: &str) -> Result<String> {
        let content = if location.starts_with("http://") || location.starts_with("https://") {
            self.fetch_remote(location)?
        } else {
            std::fs::read_to_string(location)?
        };

        if content.trim().is_empty() {
            return Err(CrdError::Empty {
                location: location.to_string(),
            });
        }
        Ok(content)
    }

    fn fetch_remote(&self, url: &str) -> Result<String> {
        // Download into scoped temp storage; the directory is removed
        // when `dir` drops, on success and on error alike.
        let dir = tempfile::tempdir()?;
        let dest = dir.path().join("crd.yaml");

        let body = self
            .client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(|resp| resp.bytes())
            .map_err(|source| CrdError::Fetch {
                location: url.to_string(),
                source,
            })?;

        std::fs::write(&dest, &body)?;
        Ok(std::fs::read_to_string(&dest)?)
    }
}

/// Resolve the effective CRD location for a generator.
fn resolve_location(generator: &Generator, global: &GeneratorConfig) -> Result<String> {
    let file = &generator.provider.crd.file;

    let base_url = generator
        .provider
        .base_url
        .as_deref()
        .or(global.provider.base_url.as_deref())
        .unwrap_or(DEFAULT_BASE_URL);

    let name = if generator.provider.name.is_empty() {
        &global.provider.name
    } else {
        &generator.provider.name
    };
    let version = if generator.provider.version.is_empty() {
        &global.provider.version
    } else {
        &generator.provider.version
    };

    if name.is_empty() {
        return Err(CrdError::MissingProviderField {
            field: "name".to_string(),
            file: file.clone(),
        });
    }
    if version.is_empty() {
        return Err(CrdError::MissingProviderField {
            field: "version".to_string(),
            file: file.clone(),
        });
    }

    Ok(crd_url(base_url, name, version, file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator_with_file(file: &str) -> Generator {
        let mut generator = Generator::default();
        generator.provider.crd.file = file.to_string();
        generator
    }

    fn global() -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        config.provider.name = "provider-aws".to_string();
        config.provider.version = "v1.21.0".to_string();
        config
    }

    #[test]
    fn test_crd_url_substitution() {
        let url = crd_url(DEFAULT_BASE_URL, "provider-aws", "v1.21.0", "buckets.yaml");
        assert_eq!(
            url,
            "https://raw.githubusercontent.com/crossplane-contrib/provider-aws/v1.21.0/package/crds/buckets.yaml"
        );
    }

    #[test]
    fn test_local_provider_overrides_global() {
        let mut generator = generator_with_file("crd.yaml");
        generator.provider.name = "provider-gcp".to_string();
        generator.provider.base_url = Some("/crds/{provider}/{version}/{file}".to_string());

        let location = resolve_location(&generator, &global()).unwrap();
        // version falls back to the global one independently of name
        assert_eq!(location, "/crds/provider-gcp/v1.21.0/crd.yaml");
    }

    #[test]
    fn test_missing_provider_name_is_an_error() {
        let generator = generator_with_file("crd.yaml");
        let err = resolve_location(&generator, &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, CrdError::MissingProviderField { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_fetch_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crd.yaml");
        std::fs::write(&path, "kind: CustomResourceDefinition\n").unwrap();

        let fetcher = CrdFetcher::new();
        let content = fetcher.fetch(path.to_str().unwrap()).unwrap();
        assert!(content.contains("CustomResourceDefinition"));
    }

    #[test]
    fn test_fetch_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crd.yaml");
        std::fs::write(&path, "  \n").unwrap();

        let fetcher = CrdFetcher::new();
        let err = fetcher.fetch(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CrdError::Empty { .. }));
    }

    #[test]
    fn test_load_for_local_crd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("buckets.yaml"),
            r#"
kind: CustomResourceDefinition
metadata:
  name: buckets.s3.aws.upbound.io
spec:
  group: s3.aws.upbound.io
  versions:
    - name: v1beta1
      served: true
      storage: true
"#,
        )
        .unwrap();

        let mut generator = generator_with_file("buckets.yaml");
        generator.provider.base_url =
            Some(format!("{}/{{file}}", dir.path().display()));

        let doc = CrdFetcher::new().load_for(&generator, &global()).unwrap();
        assert_eq!(doc.schema.name, "buckets.s3.aws.upbound.io");
    }
}
