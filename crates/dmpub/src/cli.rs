//! Clap derive structures for the `dmpub` CLI.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use dmpub_core::ApiFlavor;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// dmpub -- idempotent release publishing for Download Monitor sites
#[derive(Debug, Parser)]
#[command(
    name = "dmpub",
    version,
    about = "Publish release artifacts to WordPress Download Monitor sites",
    long_about = "Registers a product release on a WordPress site running the \
        Download Monitor (or DokuMate) REST plugin.\n\n\
        Publishing is idempotent: the download and version are created only \
        when missing, so re-running a release pipeline is safe.",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Site profile to use
    #[arg(long, short = 'p', env = "DMPUB_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Site root URL (overrides profile)
    #[arg(long, env = "DMPUB_SITE", global = true)]
    pub site: Option<String>,

    /// WordPress username (overrides profile)
    #[arg(long, short = 'u', env = "DMPUB_USERNAME", global = true)]
    pub username: Option<String>,

    /// REST plugin flavor (overrides profile)
    #[arg(long, env = "DMPUB_FLAVOR", global = true)]
    pub flavor: Option<FlavorArg>,

    /// Output format [default: `defaults.output` from config, else table]
    #[arg(long, short = 'o', env = "DMPUB_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in milliseconds (overrides profile)
    #[arg(long, env = "DMPUB_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Enums ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FlavorArg {
    /// Download Monitor plugin (/wp-json/download-monitor/v1/)
    DownloadMonitor,
    /// DokuMate plugin (/wp-json/dokumate/v1/)
    Dokumate,
}

impl From<FlavorArg> for ApiFlavor {
    fn from(arg: FlavorArg) -> Self {
        match arg {
            FlavorArg::DownloadMonitor => Self::DownloadMonitor,
            FlavorArg::Dokumate => Self::DokuMate,
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Publish a version, creating the download and version if missing
    #[command(alias = "pub")]
    Publish(PublishArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "file"])))]
pub struct PublishArgs {
    /// Download (product) title; matched case-insensitively
    #[arg(long)]
    pub title: String,

    /// Version string; matched exactly
    #[arg(long = "version", id = "release", value_name = "VERSION")]
    pub release: String,

    /// Public URL of the artifact
    #[arg(long)]
    pub url: Option<String>,

    /// Folder under the site root the artifact was uploaded to
    #[arg(long, requires = "file")]
    pub remote_folder: Option<String>,

    /// Artifact file name, joined onto the site and --remote-folder
    #[arg(long, requires = "remote_folder")]
    pub file: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Store the active profile's password in the system keyring
    SetPassword,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn publish_requires_exactly_one_source() {
        let parse = |args: &[&str]| {
            Cli::try_parse_from(
                ["dmpub", "publish", "--title", "Product X", "--version", "1.0"]
                    .iter()
                    .chain(args),
            )
        };

        assert!(parse(&["--url", "https://example.com/x.zip"]).is_ok());
        assert!(parse(&["--remote-folder", "Updates", "--file", "x.zip"]).is_ok());
        assert!(parse(&[]).is_err());
        assert!(parse(&["--file", "x.zip"]).is_err());
        assert!(parse(&["--url", "https://example.com/x.zip", "--remote-folder", "U", "--file", "x.zip"]).is_err());
    }
}
