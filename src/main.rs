use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use teloxide::prelude::*;
use tracing::{error, info};

use homework_bot::config;
use homework_bot::handlers;
use homework_bot::notifier::TelegramNotifier;
use homework_bot::poll::{self, PollState};
use homework_bot::practicum::PracticumClient;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML settings file (optional; defaults apply when absent)
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    // A missing .env is fine; variables may come from the real environment.
    dotenv::dotenv().ok();

    let args = Args::parse();
    let cfg = match config::load(Some(&args.config)) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(%err, "refusing to start");
            return Err(err.into());
        }
    };

    let api = PracticumClient::new(
        cfg.credentials.practicum_token.clone(),
        cfg.endpoint()?,
        cfg.request_timeout(),
    )?;
    let bot = Bot::new(cfg.credentials.telegram_token.clone());
    let notifier = TelegramNotifier::new(bot.clone(), cfg.credentials.chat_id);

    info!(endpoint = %api.endpoint(), "starting telegram bot");
    let listener = teloxide::repl(bot, |bot: Bot, msg: Message| async move {
        if let Err(err) = handlers::handle_update(&bot, &msg).await {
            error!(?err, "failed to handle update");
        }
        respond(())
    });

    tokio::select! {
        res = poll::run(&api, &notifier, PollState::starting_now(), cfg.retry_interval()) => {
            if let Err(err) = res {
                error!(?err, "poller stopped");
                return Err(err.into());
            }
        }
        _ = listener => info!("telegram listener stopped"),
    }

    Ok(())
}
