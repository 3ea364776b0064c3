use anyhow::{Context, Result, bail};
use errl_ir::{EmptyTargets, TargetProvider, validate_handle};
use ffdc_pel::{AggregateOptions, FfdcFileList, RawDataDecoder, process_sbe_ffdc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct ConvertOptions {
    pub targets: Option<PathBuf>,
    pub attachments_dir: Option<PathBuf>,
    pub aggregate: AggregateOptions,
}

/// Load the target tree, or a provider that resolves nothing.
pub fn load_targets(path: Option<&Path>) -> Result<Box<dyn TargetProvider>> {
    let Some(path) = path else {
        log::info!("No target tree given; callout targets will not resolve");
        return Ok(Box::new(EmptyTargets));
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let tree = target_tree::parse_tree(&text)
        .with_context(|| format!("parsing target tree {}", path.display()))?;
    log::info!("Loaded {} targets from {}", tree.len(), path.display());
    Ok(Box::new(tree))
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map_or_else(|| "response".to_string(), |s| s.to_string_lossy().into_owned())
}

/// Name of the JSON written for `input` in batch mode.
pub fn output_name(input: &Path) -> String {
    format!("{}.json", file_stem(input))
}

pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    targets: &dyn TargetProvider,
    options: &ConvertOptions,
) -> Result<()> {
    let start = Instant::now();
    let buf = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;

    let processed = process_sbe_ffdc(&buf, &RawDataDecoder, targets, &options.aggregate)
        .with_context(|| format!("processing {}", input.display()))?;
    log::info!(
        "{}: status {:?}/{:?}, {} entries",
        input.display(),
        processed.primary_status,
        processed.secondary_status,
        processed.handle.len()
    );

    if let Err(errors) = validate_handle(&processed.handle) {
        for e in &errors {
            log::warn!("Validation: {e}");
        }
    }

    if let Some(dir) = &options.attachments_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating attachment directory {}", dir.display()))?;
        let files = FfdcFileList::create_in(&processed.handle, dir)
            .with_context(|| format!("writing attachments for {}", input.display()))?;
        for path in files.persist_all(dir, &file_stem(input))? {
            log::info!("Attachment: {}", path.display());
        }
    }

    let json = serde_json::to_string_pretty(&processed.handle).context("serializing entries")?;
    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Converted {} -> {}", input.display(), path.display());
        }
        None => println!("{json}"),
    }

    log::debug!(
        "{}: done in {:.1}ms",
        input.display(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

/// Batch outputs and attachment files are named by input stem, so two
/// inputs with the same stem would overwrite each other.
pub fn check_unique_stems(inputs: &[PathBuf]) -> Result<()> {
    let mut seen: HashMap<String, &PathBuf> = HashMap::new();
    for input in inputs {
        if let Some(first) = seen.insert(file_stem(input), input) {
            bail!(
                "{} and {} would both be written as {}",
                first.display(),
                input.display(),
                output_name(input)
            );
        }
    }
    Ok(())
}

pub fn run_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<()> {
    use rayon::prelude::*;

    let targets = load_targets(options.targets.as_deref())?;

    if let [input] = inputs {
        return convert_file(input, output, targets.as_ref(), options);
    }

    let Some(output_dir) = output else {
        bail!("--output <DIR> is required when converting several inputs");
    };
    check_unique_stems(inputs)?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let results: Vec<(&PathBuf, Result<()>)> = inputs
        .par_iter()
        .map(|input| {
            let out_path = output_dir.join(output_name(input));
            let result = convert_file(input, Some(&out_path), targets.as_ref(), options);
            (input, result)
        })
        .collect();

    let mut failed = 0;
    for (input, result) in &results {
        if let Err(e) = result {
            eprintln!("FAILED {}: {e:#}", input.display());
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} responses failed to convert", inputs.len());
    }

    println!(
        "Batch complete: {} responses converted to {}",
        inputs.len(),
        output_dir.display()
    );
    Ok(())
}
