//! Generation run orchestration
//!
//! Loads and validates the global configuration (fatal on failure),
//! then drives each discovered resource through fetch, detection,
//! resolution, templating and output. Per-resource failures are logged
//! and isolated; they never terminate the batch.

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use std::path::{Path, PathBuf};

use xpgen_core::{Generator, GeneratorConfig, resolve, validate, validate_global};
use xpgen_crd::CrdFetcher;
use xpgen_engine::{Engine, ExternalInputs, resolve_script, write_documents};

use crate::discovery::discover;

pub struct Options {
    pub input_name: String,
    pub input_path: PathBuf,
    pub script_name: Option<String>,
    pub script_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub config_file: PathBuf,
    pub debug: bool,
}

pub fn run(opts: &Options) -> Result<()> {
    let global = GeneratorConfig::from_file(&opts.config_file)
        .into_diagnostic()
        .wrap_err_with(|| {
            format!(
                "Could not load generator config from {}",
                opts.config_file.display()
            )
        })?;

    validate_global(&global)
        .into_diagnostic()
        .wrap_err("Generator config not valid")?;

    let candidates = discover(&opts.input_path, &opts.input_name)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to search {}", opts.input_path.display()))?;

    if candidates.is_empty() {
        println!(
            "{} no {} files found under {}",
            style("warning").yellow(),
            opts.input_name,
            opts.input_path.display()
        );
        return Ok(());
    }

    if opts.debug {
        eprintln!(
            "{} discovered {} resource definition file(s)",
            style("DEBUG").dim(),
            candidates.len()
        );
    }

    let fetcher = CrdFetcher::new();
    let engine = Engine::new();

    for path in &candidates {
        if let Err(err) = process_resource(path, &global, &fetcher, &engine, opts) {
            eprintln!(
                "{} {}: {:?}",
                style("skipped").red().bold(),
                path.display(),
                err
            );
        }
    }

    Ok(())
}

/// Run one resource end to end. Any error here skips this resource only.
fn process_resource(
    path: &Path,
    global: &GeneratorConfig,
    fetcher: &CrdFetcher,
    engine: &Engine,
    opts: &Options,
) -> Result<()> {
    let mut generator = Generator::from_file(path)
        .into_diagnostic()
        .wrap_err("Failed to load resource definition")?;

    if generator.ignore {
        println!(
            "{} generator for {} asks to be ignored",
            style("skipped").yellow(),
            generator.name
        );
        return Ok(());
    }

    let crd = fetcher
        .load_for(&generator, global)
        .into_diagnostic()
        .wrap_err("Failed to load CRD")?;

    let tag_schema = xpgen_crd::detect(&crd.schema, generator.crd_version());
    if tag_schema.encoding.is_unknown() {
        return Err(miette!(
            "could not classify tag schema of {} at version {}",
            crd.schema.name,
            generator.crd_version()
        ));
    }

    resolve(&mut generator, global);
    validate(&generator, global).into_diagnostic()?;

    let inputs = ExternalInputs::assemble(&generator, global, &crd, tag_schema)
        .into_diagnostic()
        .wrap_err("Failed to assemble engine inputs")?;

    let script = resolve_script(
        &opts.script_path,
        opts.script_name.as_deref(),
        generator.script_file.as_deref(),
    );
    if opts.debug {
        eprintln!(
            "{} executing {} for {}",
            style("DEBUG").dim(),
            script.display(),
            generator.name
        );
    }

    let documents = engine.execute(&script, &inputs).into_diagnostic()?;

    let out_dir = opts
        .output_path
        .clone()
        .unwrap_or_else(|| generator.source_dir.clone());

    let summary = write_documents(&documents, &out_dir);

    for written in &summary.written {
        println!("{} {}", style("wrote").green(), written.display());
    }
    for skipped in &summary.skipped {
        if opts.debug {
            eprintln!(
                "{} {} unchanged",
                style("DEBUG").dim(),
                skipped.display()
            );
        }
    }
    for (failed, err) in &summary.failed {
        eprintln!(
            "{} {}: {}",
            style("error").red().bold(),
            failed.display(),
            err
        );
    }

    Ok(())
}
