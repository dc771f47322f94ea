use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docchat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Load vendor credentials from this file instead of ./.env
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Answer from an offline mock vendor instead of a real API
    #[arg(long, global = true)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one message and print the reply with its token usage
    Ask {
        message: String,

        /// Model id (see `docchat models`); defaults to the highest-priority configured model
        #[arg(short, long)]
        model: Option<String>,

        /// PDF or text file to ground the answer on (repeatable)
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,

        /// JSON file holding prior turns: [{"role": "user", "content": "..."}, ...]
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// List models that have credentials configured
    Models,
}
