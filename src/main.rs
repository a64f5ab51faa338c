//! ladoc: read doc comments from source files and dump the symbol tree.
//!
//! `ladoc src/ lib/*.php -o tree.json`
//!
//! Prints diagnostics to stderr as `warning: file:line: message` and writes
//! `{ "tree": ..., "diagnostics": [...] }` as JSON to stdout or `--output`.

use anyhow::{Context, Result};
use clap::Parser;
use ladoc::{Documentor, SourceFile, TagGrammar};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ladoc",
    version,
    about = "Extract doc-comment metadata from source files into a symbol tree"
)]
struct Cli {
    /// Input files, directories (scanned recursively) or glob patterns.
    #[arg(required = true)]
    files: Vec<String>,

    /// JSON tag grammar overriding or extending the built-in table
    #[arg(short = 'g', long)]
    grammar: Option<PathBuf>,

    /// Write the JSON dump to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// File extensions picked up when scanning directories
    #[arg(short = 'e', long = "ext", value_delimiter = ',', default_value = "php,md")]
    extensions: Vec<String>,

    /// Exit with an error when any diagnostic was produced
    #[arg(long)]
    deny_warnings: bool,

    /// Do not print diagnostics
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Debug logging (overridden by LADOC_LOG)
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let grammar = match cli.grammar {
        Some(ref path) => ladoc::load_grammar(path)?,
        None => TagGrammar::default(),
    };

    let paths = expand_inputs(&cli.files, &cli.extensions)?;
    let files = read_sources(&paths)?;
    tracing::debug!(files = files.len(), "sources loaded");

    let doc = Documentor::new(grammar).document(&files);

    if !cli.quiet {
        for diagnostic in &doc.diagnostics {
            eprintln!("warning: {}", diagnostic);
        }
    }

    let json = serde_json::to_string_pretty(&doc).context("failed to serialize symbol tree")?;
    match cli.output {
        Some(ref path) => fs::write(path, format!("{json}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => writeln!(io::stdout().lock(), "{json}").context("failed to write stdout")?,
    }

    if cli.deny_warnings && !doc.diagnostics.is_empty() {
        anyhow::bail!(
            "{} diagnostic(s) reported and --deny-warnings is set",
            doc.diagnostics.len()
        );
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "ladoc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LADOC_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Expand files, directories and glob patterns into a sorted file list.
fn expand_inputs(patterns: &[String], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            for ext in extensions {
                let dir_pattern = format!("{}/**/*.{}", pattern.trim_end_matches('/'), ext);
                files.extend(glob_files(&dir_pattern)?);
            }
            continue;
        }
        let matches = glob_files(pattern)?;
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Fold order follows file order, keep it deterministic
    files.sort();
    files.dedup();
    Ok(files)
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>> {
    Ok(glob::glob(pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect())
}

fn read_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(SourceFile::new(source_id(path), &content))
        })
        .collect()
}

/// Stable identifier: the path with `/` separators and no leading `./`.
fn source_id(path: &Path) -> String {
    let id = path.to_string_lossy().replace('\\', "/");
    id.strip_prefix("./").unwrap_or(&id).to_string()
}
