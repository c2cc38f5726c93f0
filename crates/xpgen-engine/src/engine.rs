//! Template engine based on MiniJinja
//!
//! A generation script receives the `ExternalInputs` record as its
//! template context and must render a single JSON object mapping
//! output key to manifest document.

use indexmap::IndexMap;
use minijinja::Environment;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};
use crate::filters;
use crate::inputs::ExternalInputs;

/// Script executed when neither the CLI nor the resource names one.
pub const DEFAULT_SCRIPT: &str = "generate.j2";

/// Resolve which script file to run for a resource.
///
/// Precedence: explicit CLI override, else the resource's own
/// `scriptFile`, else the default name; always joined to `script_dir`.
pub fn resolve_script(
    script_dir: &Path,
    cli_override: Option<&str>,
    resource_script: Option<&str>,
) -> PathBuf {
    let name = cli_override
        .or(resource_script)
        .unwrap_or(DEFAULT_SCRIPT);
    script_dir.join(name)
}

/// The template engine
pub struct Engine;

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Create a configured MiniJinja environment
    fn create_environment(&self) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);

        env.add_filter("tojson", filters::tojson);
        env.add_filter("toyaml", filters::toyaml);

        env
    }

    /// Execute a generation script and parse its output.
    ///
    /// The rendered text must be one JSON object; its keys become
    /// output file names (insertion order preserved), its values the
    /// documents to materialize.
    pub fn execute(
        &self,
        script: &Path,
        inputs: &ExternalInputs,
    ) -> Result<IndexMap<String, serde_json::Value>> {
        let source = std::fs::read_to_string(script)?;
        let name = script
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_SCRIPT.to_string());

        let mut env = self.create_environment();
        env.add_template_owned(name.clone(), source)
            .map_err(|e| EngineError::template(script, &e))?;

        let tmpl = env
            .get_template(&name)
            .map_err(|e| EngineError::template(script, &e))?;

        let rendered = tmpl
            .render(minijinja::Value::from_serialize(inputs))
            .map_err(|e| EngineError::template(script, &e))?;

        serde_json::from_str(&rendered).map_err(EngineError::OutputParse)
    }
}
