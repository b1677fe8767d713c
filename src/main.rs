mod cli;

use crate::cli::{Cli, Command};
use anyhow::{Context, Result};
use bible_verse_store::{
    canon, BackendError, DiagnosticLogger, ModuleConfig, Passage, RawFileBackend,
    ReferenceSystemRegistry, Verse,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const KEEP_SESSIONS: usize = 10;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Modules { dir } = &cli.command {
        return list_modules(dir);
    }

    let logger = Arc::new(match &cli.log_dir {
        Some(dir) => DiagnosticLogger::new(dir).context("Failed to create DiagnosticLogger")?,
        None => DiagnosticLogger::in_memory(),
    });
    let backend = open_backend(&cli)?.with_logger(logger.clone());
    logger.info(
        "Running command",
        Some(serde_json::json!({
            "command": format!("{:?}", cli.command),
            "data_path": backend.data_path(),
            "versification": backend.versification().name(),
        })),
    );

    match &cli.command {
        Command::Create => {
            println!("Creating store under {:?}...", backend.data_path());
            backend.create().context("Failed to create store")?;
            println!(
                "Created {} slots for {}",
                backend.versification().total_verse_count(),
                backend.versification().name()
            );
        }
        Command::Import { input } => {
            let stored = import(&backend, input)?;
            backend.flush().context("Failed to flush store")?;
            println!("Imported {} verse(s) from {:?}", stored, input);
        }
        Command::Alias { alias, canonical } => {
            let alias = single_verse(&backend, alias)?;
            let canonical = single_verse(&backend, canonical)?;
            backend
                .set_alias(&alias, &canonical)
                .with_context(|| format!("Failed to alias {} to {}", alias, canonical))?;
            backend.flush().context("Failed to flush store")?;
            println!("{} now shares the text of {}", alias, canonical);
        }
        Command::Lookup {
            passage,
            skip_missing,
        } => {
            let passage = Passage::parse(passage, backend.versification())
                .with_context(|| format!("Failed to parse passage {:?}", passage))?;
            for verse in passage.verses() {
                match backend.get_text(&verse) {
                    Ok(text) => println!("{}\t{}", verse, text),
                    Err(BackendError::NotFound(_)) if *skip_missing => continue,
                    Err(e) => {
                        return Err(anyhow::Error::new(e).context(format!("Failed to read {}", verse)))
                    }
                }
            }
        }
        Command::Info => {
            let stats = backend.stats().context("Failed to read store statistics")?;
            let report = logger.generate_report(stats)?;
            println!("{}", serde_json::to_string_pretty(&report.summary)?);
        }
        Command::Modules { .. } => {}
    }

    logger.info("Command finished", None);
    if cli.log_dir.is_some() {
        logger.rotate_logs(KEEP_SESSIONS)?;
    }
    Ok(())
}

fn open_backend(cli: &Cli) -> Result<RawFileBackend> {
    let registry = ReferenceSystemRegistry::global();
    if let Some(conf) = &cli.conf {
        let config = ModuleConfig::load(conf).with_context(|| format!("Failed to load {:?}", conf))?;
        return RawFileBackend::from_config(&config, &cli.module_root, registry)
            .with_context(|| format!("Module {} cannot be opened", config.name));
    }

    let data_path = cli
        .data_path
        .as_ref()
        .context("Either --conf or --data-path is required")?;
    let v11n = canon::lookup(registry, &cli.versification)
        .with_context(|| format!("Unknown versification {:?}", cli.versification))?;
    Ok(RawFileBackend::new(data_path, v11n))
}

fn single_verse(backend: &RawFileBackend, text: &str) -> Result<Verse> {
    let passage = Passage::parse(text, backend.versification())
        .with_context(|| format!("Failed to parse reference {:?}", text))?;
    let mut verses = passage.verses();
    match (verses.next(), verses.next()) {
        (Some(verse), None) => Ok(verse),
        _ => Err(anyhow::anyhow!("{:?} must name exactly one verse", text)),
    }
}

/// Each line is `<reference>\t<text>`. A reference naming several verses
/// stores the text once and aliases the rest to it.
fn import(backend: &RawFileBackend, input: &Path) -> Result<usize> {
    let content =
        fs::read_to_string(input).with_context(|| format!("Failed to read input: {:?}", input))?;

    let mut stored = 0;
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let (reference, text) = line
            .split_once('\t')
            .with_context(|| format!("Line {}: expected <reference>\\t<text>", idx + 1))?;
        let passage = Passage::parse(reference, backend.versification())
            .with_context(|| format!("Line {}: bad reference {:?}", idx + 1, reference))?;

        let mut verses = passage.verses();
        let Some(first) = verses.next() else {
            continue;
        };
        backend
            .set_raw_text(&first, text.as_bytes())
            .with_context(|| format!("Line {}: failed to store {}", idx + 1, first))?;
        stored += 1;
        for verse in verses {
            backend
                .set_alias(&verse, &first)
                .with_context(|| format!("Line {}: failed to alias {}", idx + 1, verse))?;
            stored += 1;
        }
    }
    Ok(stored)
}

fn list_modules(dir: &Path) -> Result<()> {
    let found = ModuleConfig::discover(dir).with_context(|| format!("Failed to scan {:?}", dir))?;
    for (path, config) in &found {
        let note = if config.is_raw_files() { "" } else { " (unsupported driver)" };
        println!(
            "{}\t{}\t{}\t{:?}{}",
            config.name,
            config.driver,
            config.versification,
            path,
            note
        );
    }
    println!("Found {} module(s)", found.len());
    Ok(())
}
