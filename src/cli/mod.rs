//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "buildforge",
    version,
    about = "Tag-driven build component recommender for Path of Exile 2",
    long_about = "BuildForge extracts semantic tags from a free-text playstyle description and ranks \
                  the skill, unique item, passive tree and rune catalogs against them, producing small \
                  relevant lists ready to hand to a build generator."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/buildforge/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract build tags from a playstyle description
    Tags {
        /// Playstyle description
        description: String,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Select skills, supports, uniques, passives, runes and ascendancy nodes for a build
    Recommend {
        /// Playstyle description
        description: String,

        /// Class name (e.g., "Monk") or attribute label (e.g., "Dex/Int")
        #[arg(long)]
        class: Option<String>,

        /// Only show this ascendancy's nodes
        #[arg(short, long)]
        ascendancy: Option<String>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List support gems compatible with a skill
    Supports {
        /// Skill name or id
        skill: String,

        /// Maximum number of results (defaults to limits.support_gems)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List unique items for an equipment slot
    Slot {
        /// Item class, e.g. "ring", "amulet", "boots"
        slot: String,

        /// Rank items against this playstyle description
        #[arg(short, long)]
        description: Option<String>,

        /// Maximum number of results (defaults to limits.slot_items)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the playable classes and their ascendancies
    Classes,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print the default configuration file path
    Path,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
