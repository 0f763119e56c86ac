mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodle_client::MoodleClient;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodle_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let mut client = MoodleClient::new(&cli.url)?;
    client.login(&cli.username, &cli.password).await?;

    match cli.command {
        Commands::Assignments {
            today,
            overdue,
            limit,
        } => {
            cli::assignments(&mut client, today, overdue, limit).await?;
        }
        Commands::Courses { classification } => {
            cli::courses(&mut client, &classification).await?;
        }
        Commands::Search { term } => {
            cli::search_courses(&mut client, &term).await?;
        }
        Commands::User { username } => {
            let username = username.as_deref().unwrap_or(&cli.username);
            cli::user(&mut client, username).await?;
        }
        Commands::Groups { course } => {
            cli::groups(&mut client, course).await?;
        }
        Commands::Participants { course, query } => {
            cli::participants(&mut client, course, &query).await?;
        }
    }

    Ok(())
}
