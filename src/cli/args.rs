//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A small digital-archive utility: organize files by metadata, find
/// duplicate files by content checksum, and summarize directory trees
#[derive(Parser, Debug)]
#[command(name = "archive-tool")]
#[command(version = "1.0.0")]
#[command(about = "Scan, organize, and deduplicate a digital archive", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find files with identical content under a directory
    Dedup {
        /// Directory to scan
        root: PathBuf,

        /// Delete each duplicate after recording it (the first-seen copy
        /// is always kept)
        #[arg(long)]
        delete: bool,

        /// Checksum algorithm: sha256 or sha512 (overrides config)
        #[arg(long, value_name = "ALGORITHM")]
        algorithm: Option<String>,

        /// Print the duplicate pairs as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Move files into subfolders derived from a metadata field
    Organize {
        /// Directory to organize
        root: PathBuf,

        /// Field to group by: name, size_bytes, mime_type, extension,
        /// created_at, modified_at (overrides config)
        #[arg(long = "by", value_name = "FIELD")]
        group_by: Option<String>,
    },

    /// Show the metadata snapshot for a single file
    Metadata {
        /// File to inspect
        path: PathBuf,

        /// Print the snapshot as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Summarize a directory tree (file count, total size, type
    /// histogram, largest files)
    Report {
        /// Directory to summarize
        root: PathBuf,

        /// Write the plain-text report to this path (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of largest files to list (overrides config)
        #[arg(long, value_name = "N")]
        top: Option<usize>,

        /// Print the report as JSON to stdout instead of writing a file
        #[arg(long)]
        json: bool,
    },

    /// Open the configuration file in your default editor
    ///
    /// The config file is stored at:
    /// - Windows: %APPDATA%\archive_tool\config.toml
    /// - Linux/macOS: ~/.config/archive_tool/config.toml
    ///
    /// If no config file exists, a default one will be created.
    Config {
        /// Show the config file path without opening it
        #[arg(long)]
        path: bool,

        /// Reset config to defaults (creates a fresh config file)
        #[arg(long)]
        reset: bool,
    },

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration
    ShowConfig,
}
