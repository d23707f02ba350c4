use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use manual_approval::config::{self, Env};
use manual_approval::transport::ReqwestTransport;
use manual_approval::ApprovalDispatcher;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let env = Env::from_process();

    tracing_subscriber::registry()
        .with(EnvFilter::new(config::default_filter(&env)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = cli::Cli::parse();

    match args.command {
        cli::Commands::Run { handler } => {
            let transport = ReqwestTransport::new()?;
            ApprovalDispatcher::new(env, transport)
                .run(&handler)
                .await?;
        }
    }

    Ok(())
}
