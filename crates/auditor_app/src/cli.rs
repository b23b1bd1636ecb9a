use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use auditor_engine::Frequency;

#[derive(Debug, Parser)]
#[command(
    name = "siteauditor",
    version,
    about = "Audit a website through the SiteAuditor backend"
)]
pub struct Cli {
    /// Base URL of the audit backend.
    #[arg(
        long,
        global = true,
        env = "SITEAUDITOR_API",
        default_value = "http://127.0.0.1:8000"
    )]
    pub api_base: String,

    /// Bearer token for authenticated backends.
    #[arg(long, global = true, env = "SITEAUDITOR_TOKEN")]
    pub token: Option<String>,

    /// Where log output goes.
    #[arg(long, global = true, value_enum, default_value_t = LogDest::File)]
    pub log: LogDest,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an audit and render the report.
    Audit(AuditArgs),
    /// Check that the backend is reachable.
    Health,
    /// Manage scheduled re-scans on the backend.
    Monitor {
        #[command(subcommand)]
        command: MonitorCommand,
    },
}

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// URL to audit; https is assumed when no scheme is given.
    pub url: String,

    /// Competitor URL to compare against.
    #[arg(long)]
    pub competitor: Option<String>,

    /// Language for analysis results (en, fr).
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// How to obtain the result from the backend.
    #[arg(long, value_enum, default_value_t = TransportArg::Stream)]
    pub transport: TransportArg,

    /// Save the raw report JSON into this directory.
    #[arg(long, value_name = "DIR")]
    pub save: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum MonitorCommand {
    /// List the monitors registered on the backend.
    List,
    /// Register a new monitor.
    Add {
        url: String,
        #[arg(long, default_value = "daily")]
        frequency: Frequency,
        /// Alert when the score drops below this value.
        #[arg(long, default_value_t = 80)]
        threshold: u8,
    },
    /// Delete a monitor.
    Rm { id: i64 },
    /// Flip a monitor's active state.
    Toggle { id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    Stream,
    Poll,
}

impl From<TransportArg> for auditor_engine::Transport {
    fn from(value: TransportArg) -> Self {
        match value {
            TransportArg::Stream => auditor_engine::Transport::Stream,
            TransportArg::Poll => auditor_engine::Transport::Poll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDest {
    Terminal,
    File,
    Both,
}

impl From<LogDest> for audit_logging::LogDestination {
    fn from(value: LogDest) -> Self {
        match value {
            LogDest::Terminal => audit_logging::LogDestination::Terminal,
            LogDest::File => audit_logging::LogDestination::File,
            LogDest::Both => audit_logging::LogDestination::Both,
        }
    }
}
