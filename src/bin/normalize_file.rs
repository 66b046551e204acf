//! Demo: normalize local files, directories or URLs and print one line per document.
//!
//! Usage: `normalize_file [--stem] [--tokens] <path|dir|url>...`

use anyhow::{bail, Result};
use doc_normalizer::config::AppConfig;
use doc_normalizer::ingest::sources::{FileSource, HttpSource};
use doc_normalizer::ingest::{collect_locators, process_batch};
use doc_normalizer::ingest::types::DocumentSource;
use doc_normalizer::{init_tracing, LexicalResources, OutputMode, StemMode};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("warn");

    let mut config = AppConfig::load_default()?;
    let mut inputs = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--stem" => config.pipeline.stem_mode = StemMode::LemmatizeThenStem,
            "--tokens" => config.pipeline.output = OutputMode::Tokens,
            _ => inputs.push(arg),
        }
    }
    if inputs.is_empty() {
        bail!("usage: normalize_file [--stem] [--tokens] <path|dir|url>...");
    }

    let resources =
        LexicalResources::load_configured(config.resources_dir.as_deref(), &config.language)?;

    let (urls, paths): (Vec<String>, Vec<String>) = inputs
        .into_iter()
        .partition(|s| s.starts_with("http://") || s.starts_with("https://"));

    let mut files = Vec::new();
    for p in paths {
        let path = Path::new(&p);
        if path.is_dir() {
            files.extend(
                collect_locators(path)?
                    .into_iter()
                    .map(|f| f.display().to_string()),
            );
        } else {
            files.push(p);
        }
    }

    let disk = FileSource::new();
    // URLs come from the command line, so the service allowlist does not apply.
    let http = HttpSource::new(&config.fetch)?.allow_any_host();
    let batches: [(&dyn DocumentSource, Vec<String>); 2] = [(&disk, files), (&http, urls)];

    let mut failed = 0usize;
    for (source, locators) in batches {
        if locators.is_empty() {
            continue;
        }
        let report = process_batch(
            source,
            &locators,
            &resources,
            &config.pipeline,
            &config.extract,
        )
        .await;
        for doc in report.documents {
            println!("{}\t{}", doc.locator, serde_json::to_string(&doc.output)?);
        }
        for f in &report.failures {
            eprintln!("{}\tERROR {}", f.locator, f.message);
        }
        failed += report.failures.len();
    }

    if failed > 0 {
        eprintln!("{failed} document(s) failed");
    }
    Ok(())
}
