use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "imgbucket")]
#[command(bin_name = "imgbucket")]
#[command(version)]
#[command(about = "Sort the images in the current directory into bucket folders")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Write a diagnostics log under ~/.config/imgbucket/diagnostics"
    )]
    pub diagnostics: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Run environment and configuration checks")]
    Doctor,
}
