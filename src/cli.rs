use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(about, version, author)]
pub struct Cli {
    /// Log fewer messages
    #[clap(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Treat this RFC 3339 timestamp as the current time
    #[clap(long, env = "TIMEAGO_NOW", global = true)]
    pub now: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Describe spans such as "2D12h" or "44m30s"
    Span(SpanArgs),

    /// Describe RFC 3339 timestamps relative to now
    Time(TimeArgs),

    /// Describe every entry in a TOML timefile
    Batch(BatchArgs),
}

#[derive(Args)]
pub struct SpanArgs {
    /// Describe the spans as having elapsed
    #[clap(long, conflicts_with = "future")]
    pub past: bool,

    /// Describe the spans as still to come
    #[clap(long)]
    pub future: bool,

    /// Spans to describe
    #[clap(required = true)]
    pub spans: Vec<String>,
}

#[derive(Args)]
pub struct TimeArgs {
    /// Timestamps to describe
    #[clap(required = true)]
    pub timestamps: Vec<String>,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Path to the timefile
    pub timefile: PathBuf,
}
