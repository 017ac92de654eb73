#[path = "src/cli.rs"]
#[allow(dead_code)]
mod cli;

use clap::CommandFactory;
use clap_complete::shells::Shell;
use cli::Cli;
use std::fs::{create_dir_all, write};
use std::io::Result;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/cli.rs");

    let contrib = Path::new("contrib");
    generate_completions(&contrib.join("completions")).unwrap();
    generate_manpage(&contrib.join("man/man1")).unwrap();
}

/// Write a completion script for every supported shell
fn generate_completions(out_dir: &Path) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_owned();

    create_dir_all(out_dir)?;
    for shell in [
        Shell::Bash,
        Shell::Elvish,
        Shell::Fish,
        Shell::PowerShell,
        Shell::Zsh,
    ] {
        clap_complete::generate_to(shell, &mut cmd, &bin_name, out_dir)?;
    }

    Ok(())
}

fn generate_manpage(out_dir: &Path) -> Result<()> {
    let cmd = Cli::command();
    let page = out_dir.join(format!("{}.1", cmd.get_name()));

    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd).render(&mut buffer)?;
    create_dir_all(out_dir)?;
    write(page, buffer)
}
