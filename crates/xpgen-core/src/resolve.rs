//! Configuration resolution and validation
//!
//! Folds the global configuration into a per-resource `Generator`
//! according to the `globalHandling` policy, evaluated independently
//! for each of the four governed sub-fields:
//!
//! - `append`: merge local over global (local entries always kept)
//! - `replace`, or local already has explicit entries: keep local as-is
//! - otherwise: inherit the global value wholesale

use crate::config::{GLOBAL_LABELS, Generator, GeneratorConfig, GlobalHandling};
use crate::error::{CoreError, Result};
use crate::merge::{merge_lists, merge_maps};

/// Apply the global configuration to a local generator in place.
pub fn resolve(generator: &mut Generator, global: &GeneratorConfig) {
    match generator.labels.global_handling.from_crd {
        Some(GlobalHandling::Append) => {
            generator.labels.from_crd =
                merge_lists(&global.labels.from_crd, &generator.labels.from_crd);
        }
        Some(GlobalHandling::Replace) => {}
        None => {
            if generator.labels.from_crd.is_empty() {
                generator.labels.from_crd = global.labels.from_crd.clone();
            }
        }
    }

    match generator.labels.global_handling.common {
        Some(GlobalHandling::Append) => {
            generator.labels.common =
                merge_maps(&global.labels.common, &generator.labels.common);
        }
        Some(GlobalHandling::Replace) => {}
        None => {
            if generator.labels.common.is_empty() {
                generator.labels.common = global.labels.common.clone();
            }
        }
    }

    match generator.tags.global_handling.from_labels {
        Some(GlobalHandling::Append) => {
            generator.tags.from_labels =
                merge_lists(&global.tags.from_labels, &generator.tags.from_labels);
        }
        Some(GlobalHandling::Replace) => {}
        None => {
            if generator.tags.from_labels.is_empty() {
                generator.tags.from_labels = global.tags.from_labels.clone();
            }
        }
    }

    match generator.tags.global_handling.common {
        Some(GlobalHandling::Append) => {
            generator.tags.common = merge_maps(&global.tags.common, &generator.tags.common);
        }
        Some(GlobalHandling::Replace) => {}
        None => {
            if generator.tags.common.is_empty() {
                generator.tags.common = global.tags.common.clone();
            }
        }
    }
}

/// Validate a resolved generator against the global configuration.
///
/// Every `tags.fromLabels` entry must resolve to a label value: a key
/// of the global `labels.common`, an entry of the generator's own
/// `labels.fromCRD`, or one of the built-in global labels. The error
/// names every offending entry.
pub fn validate(generator: &Generator, global: &GeneratorConfig) -> Result<()> {
    check_from_labels(
        &generator.tags.from_labels,
        global,
        &generator.labels.from_crd,
    )
}

/// Self-check of the global configuration, run once at startup.
///
/// Same invariant as `validate`, without the local layer. A failure
/// here is fatal to the whole run.
pub fn validate_global(global: &GeneratorConfig) -> Result<()> {
    check_from_labels(&global.tags.from_labels, global, &global.labels.from_crd)
}

fn check_from_labels(
    from_labels: &[String],
    global: &GeneratorConfig,
    from_crd: &[String],
) -> Result<()> {
    let offending: Vec<String> = from_labels
        .iter()
        .filter(|tag| {
            !global.labels.common.contains_key(*tag)
                && !from_crd.contains(tag)
                && !GLOBAL_LABELS.contains(&tag.as_str())
        })
        .cloned()
        .collect();

    if offending.is_empty() {
        Ok(())
    } else {
        Err(CoreError::UnresolvedTagLabels { fields: offending })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobalHandling;

    fn global_with(tags_from_labels: &[&str], labels_from_crd: &[&str]) -> GeneratorConfig {
        let mut global = GeneratorConfig::default();
        global.tags.from_labels = tags_from_labels.iter().map(|s| s.to_string()).collect();
        global.labels.from_crd = labels_from_crd.iter().map(|s| s.to_string()).collect();
        global
    }

    #[test]
    fn test_append_policy_dedups() {
        let mut generator = Generator::default();
        generator.labels.from_crd = vec!["a".to_string()];
        generator.labels.global_handling.from_crd = Some(GlobalHandling::Append);

        let global = global_with(&[], &["a", "b"]);
        resolve(&mut generator, &global);

        assert_eq!(generator.labels.from_crd, vec!["a", "b"]);
    }

    #[test]
    fn test_default_inherits_global() {
        let mut generator = Generator::default();
        let mut global = GeneratorConfig::default();
        global.tags.from_labels = vec!["team".to_string()];
        global
            .tags
            .common
            .insert("billing".to_string(), "infra".to_string());

        resolve(&mut generator, &global);

        assert_eq!(generator.tags.from_labels, vec!["team"]);
        assert_eq!(
            generator.tags.common.get("billing").map(String::as_str),
            Some("infra")
        );
    }

    #[test]
    fn test_explicit_local_wins_without_policy() {
        let mut generator = Generator::default();
        generator.tags.from_labels = vec!["owner".to_string()];

        let global = global_with(&["team"], &[]);
        resolve(&mut generator, &global);

        assert_eq!(generator.tags.from_labels, vec!["owner"]);
    }

    #[test]
    fn test_replace_policy_keeps_empty_local() {
        let mut generator = Generator::default();
        generator.tags.global_handling.from_labels = Some(GlobalHandling::Replace);
        generator.labels.global_handling.common = Some(GlobalHandling::Replace);

        let mut global = global_with(&["team"], &[]);
        global
            .labels
            .common
            .insert("team".to_string(), "platform".to_string());

        resolve(&mut generator, &global);

        assert!(generator.tags.from_labels.is_empty());
        assert!(generator.labels.common.is_empty());
    }

    #[test]
    fn test_policies_are_independent_per_subfield() {
        let mut generator = Generator::default();
        generator.labels.from_crd = vec!["spec.forProvider.region".to_string()];
        generator.labels.global_handling.from_crd = Some(GlobalHandling::Append);
        generator.tags.global_handling.from_labels = Some(GlobalHandling::Replace);
        generator
            .tags
            .common
            .insert("local".to_string(), "yes".to_string());

        let mut global = global_with(&["team"], &["metadata.name"]);
        global
            .tags
            .common
            .insert("billing".to_string(), "infra".to_string());

        resolve(&mut generator, &global);

        // append: global first, local entries kept
        assert_eq!(
            generator.labels.from_crd,
            vec!["metadata.name", "spec.forProvider.region"]
        );
        // replace: global ignored
        assert!(generator.tags.from_labels.is_empty());
        // explicit local entries kept without a policy
        assert_eq!(generator.tags.common.len(), 1);
    }

    #[test]
    fn test_validate_accepts_builtin_global_labels() {
        let mut generator = Generator::default();
        generator.tags.from_labels = vec!["crossplane.io/claim-name".to_string()];

        assert!(validate(&generator, &GeneratorConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_names_every_offending_entry() {
        let mut generator = Generator::default();
        generator.tags.from_labels = vec![
            "missing-one".to_string(),
            "external-name".to_string(),
            "missing-two".to_string(),
        ];

        let err = validate(&generator, &GeneratorConfig::default()).unwrap_err();
        match err {
            CoreError::UnresolvedTagLabels { fields } => {
                assert_eq!(fields, vec!["missing-one", "missing-two"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_accepts_global_common_labels() {
        let mut global = GeneratorConfig::default();
        global
            .labels
            .common
            .insert("team".to_string(), "x".to_string());

        let mut generator = Generator::default();
        generator.tags.from_labels = vec!["team".to_string()];

        assert!(validate(&generator, &global).is_ok());
    }

    #[test]
    fn test_validate_global_self_check() {
        let mut global = GeneratorConfig::default();
        global.tags.from_labels = vec!["nowhere".to_string()];
        assert!(validate_global(&global).is_err());

        global.labels.from_crd = vec!["nowhere".to_string()];
        assert!(validate_global(&global).is_ok());
    }

    #[test]
    fn test_inherited_from_labels_validate_against_global_common() {
        // Global declares labels.common={"team": "x"}; the local config
        // inherits tags.fromLabels=["team"] and must validate.
        let mut global = GeneratorConfig::default();
        global.tags.from_labels = vec!["team".to_string()];
        global
            .labels
            .common
            .insert("team".to_string(), "x".to_string());

        let mut generator = Generator::default();
        resolve(&mut generator, &global);

        assert_eq!(generator.tags.from_labels, vec!["team"]);
        assert!(validate(&generator, &global).is_ok());
    }
}
