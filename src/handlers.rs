use anyhow::Result;
use teloxide::prelude::*;
use tracing::{info, instrument};

/// Inbound updates. Only `/start` is answered; everything else is ignored.
#[instrument(skip_all)]
pub async fn handle_update(bot: &Bot, msg: &Message) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    if !is_start_command(text) {
        return Ok(());
    }

    bot.send_message(msg.chat.id, greeting(msg.chat.first_name()))
        .await?;
    info!(chat_id = msg.chat.id.0, "greeted user");
    Ok(())
}

/// Matches `/start`, `/start@SomeBot` and `/start <payload>`.
fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or_default();
    let command = command.split('@').next().unwrap_or_default();
    command == "/start"
}

fn greeting(first_name: Option<&str>) -> String {
    let name = first_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("there");
    format!(
        "Hello, {}. I can help you to know the status of your homework",
        name
    )
}
