//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::cli::progress::{
    print_error, print_header, print_info, print_success, print_warning, ScanProgress,
};
use crate::cli::{Args, Commands};
use crate::core::config::{get_config_path, init_config, open_config_in_editor, Config};
use crate::core::metadata;
use crate::core::report::ArchiveReport;
use crate::duplicate::{DuplicateScan, HashAlgorithm};
use crate::organize::{GroupField, Organizer};
use anyhow::Result;
use log::info;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Run the appropriate command based on CLI arguments
pub fn run_command(args: &Args, config: &Config, shutdown_flag: Arc<AtomicBool>) -> Result<()> {
    match &args.command {
        Commands::Dedup {
            root,
            delete,
            algorithm,
            json,
        } => {
            let algorithm_name = algorithm.as_deref().unwrap_or(&config.dedup.algorithm);
            let delete = *delete || config.dedup.delete_duplicates;
            run_dedup(root.clone(), algorithm_name, delete, *json, shutdown_flag)?;
        }
        Commands::Organize { root, group_by } => {
            let field_name = group_by.as_deref().unwrap_or(&config.organize.group_by);
            run_organize(root.clone(), field_name, shutdown_flag)?;
        }
        Commands::Metadata { path, json } => {
            show_metadata(path.clone(), *json)?;
        }
        Commands::Report {
            root,
            output,
            top,
            json,
        } => {
            let top_n = top.unwrap_or(config.report.top_n);
            let output = output
                .clone()
                .unwrap_or_else(|| config.report.output_file.clone());
            run_report(root.clone(), output, top_n, *json)?;
        }
        Commands::Config { path, reset } => {
            handle_config_command(*path, *reset)?;
        }
        Commands::GenerateConfig { output } => {
            generate_config_file(output.clone())?;
        }
        Commands::ShowConfig => {
            show_config(config)?;
        }
    }
    Ok(())
}

fn run_dedup(
    root: PathBuf,
    algorithm_name: &str,
    delete: bool,
    json: bool,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<()> {
    let algorithm = HashAlgorithm::from_str(algorithm_name)?;

    if !json {
        print_header("Duplicate Scan");
        print_info(&format!("Root: {}", root.display()));
        print_info(&format!("Algorithm: {}", algorithm));
        if delete {
            print_warning("Duplicates will be deleted (first-seen copies are kept)");
        }
        println!();
    }

    let scan = DuplicateScan::new(root)
        .with_algorithm(algorithm)
        .with_delete_duplicates(delete)
        .with_cancel_flag(shutdown_flag);

    let outcome = if json {
        scan.run()?
    } else {
        let progress = ScanProgress::new("Hashing");
        let outcome = scan.run_with_progress(|_| progress.tick_file())?;
        progress.finish(&format!(
            "{} files hashed, {} duplicate pairs",
            outcome.files_hashed,
            outcome.pairs.len()
        ));
        outcome
    };

    if json {
        let value = json!({
            "pairs": outcome.pairs.iter().map(|p| json!({
                "original": p.original.display().to_string(),
                "duplicate": p.duplicate.display().to_string(),
            })).collect::<Vec<_>>(),
            "failures": outcome.failures.iter().map(|f| json!({
                "path": f.path.display().to_string(),
                "reason": &f.reason,
            })).collect::<Vec<_>>(),
            "files_hashed": outcome.files_hashed,
            "bytes_hashed": outcome.bytes_hashed,
            "files_deleted": outcome.files_deleted,
            "interrupted": outcome.interrupted,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    if outcome.pairs.is_empty() {
        print_success("No duplicate files found");
    } else {
        print_info(&format!("{} duplicate pair(s):", outcome.pairs.len()));
        for pair in &outcome.pairs {
            println!(
                "    {}  ==  {}",
                pair.original.display(),
                pair.duplicate.display()
            );
        }
        if delete {
            print_success(&format!("{} duplicate(s) deleted", outcome.files_deleted));
        }
    }

    for failure in &outcome.failures {
        print_warning(&format!("Skipped {}: {}", failure.path.display(), failure.reason));
    }
    if outcome.interrupted {
        print_warning("Scan was interrupted; results are partial");
    }

    Ok(())
}

fn run_organize(root: PathBuf, field_name: &str, shutdown_flag: Arc<AtomicBool>) -> Result<()> {
    let field = GroupField::from_str(field_name)?;

    print_header("Organize Archive");
    print_info(&format!("Root: {}", root.display()));
    print_info(&format!("Grouping by: {}", field));
    println!();

    let outcome = Organizer::new(root, field)
        .with_cancel_flag(shutdown_flag)
        .run()?;

    print_success(&format!("{} file(s) moved", outcome.moves.len()));
    if outcome.already_in_place > 0 {
        print_info(&format!(
            "{} file(s) already in place",
            outcome.already_in_place
        ));
    }
    for failure in &outcome.failures {
        print_warning(&format!(
            "Failed {}: {}",
            failure.path.display(),
            failure.reason
        ));
    }
    if outcome.interrupted {
        print_warning("Organize pass was interrupted; results are partial");
    }

    Ok(())
}

fn show_metadata(path: PathBuf, json: bool) -> Result<()> {
    let meta = metadata::extract(&path)?;

    if json {
        let value = json!({
            "name": &meta.name,
            "size_bytes": meta.size_bytes,
            "size": meta.display_size(),
            "mime_type": &meta.mime_type,
            "extension": &meta.extension,
            "created_at": meta.created_at.to_rfc3339(),
            "modified_at": meta.modified_at.to_rfc3339(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_header("File Metadata");
    print_info(&format!("Name: {}", meta.name));
    print_info(&format!("Size: {} ({} bytes)", meta.display_size(), meta.size_bytes));
    print_info(&format!("Type: {}", meta.mime_type));
    print_info(&format!(
        "Extension: {}",
        if meta.extension.is_empty() {
            "(none)"
        } else {
            meta.extension.as_str()
        }
    ));
    print_info(&format!("Created: {}", meta.created_at.format("%Y-%m-%d %H:%M:%S")));
    print_info(&format!("Modified: {}", meta.modified_at.format("%Y-%m-%d %H:%M:%S")));

    Ok(())
}

fn run_report(root: PathBuf, output: PathBuf, top_n: usize, json: bool) -> Result<()> {
    let report = ArchiveReport::build(&root, top_n)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
        return Ok(());
    }

    print_header("Archive Report");
    print_info(&format!("Total files: {}", report.total_files));
    print_info(&format!(
        "Total size: {}",
        metadata::format_file_size(report.total_bytes)
    ));
    if report.errors > 0 {
        print_warning(&format!("{} file(s) could not be read", report.errors));
    }

    report.write_text(&output)?;
    print_success(&format!("Report written to {}", output.display()));

    Ok(())
}

/// Handle the Config command: show path, reset, or open in editor
fn handle_config_command(show_path: bool, reset: bool) -> Result<()> {
    if show_path {
        let path = Config::get_active_config_path();
        if path.exists() {
            println!("{}", path.display());
        } else {
            println!("{} (not created yet)", path.display());
            print_info("Run 'archive-tool config' to create and edit it");
        }
        return Ok(());
    }

    if reset {
        let path = get_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Removed existing config: {}", path.display());
        }
        let created = init_config()?;
        print_success(&format!("Config reset to defaults: {}", created.display()));
        return Ok(());
    }

    match open_config_in_editor() {
        Ok(path) => {
            print_success(&format!("Opened config file: {}", path.display()));
        }
        Err(e) => {
            print_error(&format!("Failed to open config: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let path = match output {
        Some(path) => {
            fs::write(&path, Config::generate_default_config())?;
            path
        }
        None => init_config()?,
    };
    print_success(&format!("Config file written to {}", path.display()));
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    print_header("Current Configuration");
    println!("{}", toml::to_string_pretty(config)?);
    print_info(&format!(
        "Active config file: {}",
        Config::get_active_config_path().display()
    ));
    Ok(())
}
