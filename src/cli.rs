use clap::{Parser, Subcommand};

/// Manual approval step for CI/CD workflows
#[derive(Parser, Debug)]
#[command(name = "manual-approval", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one phase of the approval step
    Run {
        /// Phase to run: init, callback or cancel
        #[arg(long, env = "HANDLER", default_value = "")]
        handler: String,
    },
}
