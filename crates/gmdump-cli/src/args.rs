use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "gmdump")]
#[command(about = "Object classification and GML code export for GameMaker data dumps")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.gmdump)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Arguments shared by export and dump
#[derive(Args)]
pub struct CommonOpts {
    /// Database dump to read
    #[arg(short, long)]
    pub data: PathBuf,

    /// Output directory (prompts for one when omitted)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExportOpts {
    /// Rule file overriding the builtin category rules
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

#[derive(Args)]
pub struct DumpOpts {
    /// External decompiler command
    #[arg(long)]
    pub decompiler: Option<String>,

    /// Worker threads (0 = one per logical CPU)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Only dump code entries matching these globs
    #[arg(long)]
    pub include: Vec<String>,

    /// Skip code entries matching these globs
    #[arg(long)]
    pub exclude: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify objects and write gml_code/data.json
    Export {
        #[command(flatten)]
        common: CommonOpts,

        #[command(flatten)]
        export: ExportOpts,
    },

    /// Decompile eligible code entries into gml_code/
    Dump {
        #[command(flatten)]
        common: CommonOpts,

        #[command(flatten)]
        dump: DumpOpts,
    },

    /// Export and dump in one pass
    Run {
        #[command(flatten)]
        common: CommonOpts,

        #[command(flatten)]
        export: ExportOpts,

        #[command(flatten)]
        dump: DumpOpts,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Create config.toml with the default template
    Init,
    /// Print the config file path
    Path,
    /// Show the effective configuration
    Show,
}
