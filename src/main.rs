mod cli;
mod commands;

use crate::cli::{Cli, Command};
use crate::commands::CliClock;
use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    simple_logger::SimpleLogger::new()
        .with_level(if cli.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Debug
        })
        .init()?;

    let clock = CliClock::new(cli.now.as_deref())?;
    let lines = match cli.command {
        Command::Span(args) => commands::span(args)?,
        Command::Time(args) => commands::time(&clock, args)?,
        Command::Batch(args) => commands::batch(&clock, args)?,
    };
    for line in lines {
        println!("{line}");
    }

    Ok(())
}
