//! chat-widget - terminal chat client
//!
//! Reads lines from stdin, sends them to the chat server and renders the
//! conversation. History persists between runs.

use chat_widget::client::{ChatClient, HttpChatClient, LoggingChatClient};
use chat_widget::runtime::{FilePersistence, NoticeKind, TerminalRenderer};
use chat_widget::{ChatConfig, ConversationController, HistoryStore, Session};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Turns replayed from history at startup
const REPLAY_TURNS: usize = 10;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Send(String),
    Stats,
    Clear,
    History(usize),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Send(line.to_string());
        };
        let mut parts = rest.split_whitespace();
        match parts.next().unwrap_or("") {
            "stats" => Command::Stats,
            "clear" => Command::Clear,
            "history" => Command::History(
                parts
                    .next()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(REPLAY_TURNS),
            ),
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Returns false when the session should end
async fn handle_line(controller: &mut ConversationController, line: &str) -> bool {
    match Command::parse(line) {
        Command::Send(text) => {
            if let Err(e) = controller.send_message(&text).await {
                tracing::debug!(error = %e, "Message not answered");
            }
        }
        Command::Stats => {
            let stats = controller.history_stats();
            controller.notify(
                NoticeKind::Info,
                format!(
                    "{} stored messages: {} yours, {} from the bot ({:.1}% yours)",
                    stats.total, stats.user_count, stats.bot_count, stats.ratio
                ),
            );
            match controller.server_stats().await {
                Some(server) => controller.notify(NoticeKind::Info, format!("Server statistics: {server}")),
                None => controller.notify(NoticeKind::Warning, "Server statistics unavailable"),
            }
        }
        Command::Clear => controller.clear_history(),
        Command::History(n) => controller.replay(n),
        Command::Help => controller.notify(
            NoticeKind::Info,
            "Commands: /stats, /history [n], /clear, /quit. Ctrl-C cancels a pending reply.",
        ),
        Command::Quit => return false,
        Command::Unknown(name) => {
            controller.notify(NoticeKind::Warning, format!("Unknown command /{name}, try /help"));
        }
    }
    true
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ChatConfig::from_env();

    // Logs go to stderr so they never interleave with the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_widget=info".into()),
        )
        .with(config.json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr)
        }))
        .with((!config.json_logs).then(|| {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
        }))
        .init();

    tracing::info!(
        base_url = %config.base_url,
        history_dir = %config.history_dir.display(),
        capacity = config.history_capacity,
        "Starting chat client"
    );

    let persistence = Arc::new(FilePersistence::new(&config.history_dir));
    let history = HistoryStore::open(persistence, &config.history_key, config.history_capacity);

    let http = HttpChatClient::new(&config.base_url, config.request_timeout)?;
    let client: Arc<dyn ChatClient> = Arc::new(LoggingChatClient::new(Arc::new(http)));
    let renderer = Arc::new(TerminalRenderer::new());

    let mut controller = ConversationController::new(
        Session::new(),
        history,
        renderer,
        client,
        config.controller_options(),
    );
    controller.restore(REPLAY_TURNS);

    // Ctrl-C cancels a pending reply, or ends the session when idle
    let shutdown = CancellationToken::new();
    {
        let cancel = controller.cancel_handle();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if !cancel.cancel() {
                    shutdown.cancel();
                    break;
                }
            }
        });
    }

    let health_timer = tokio::time::sleep(config.health_check_delay);
    tokio::pin!(health_timer);
    let mut health_checked = false;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            () = &mut health_timer, if !health_checked => {
                health_checked = true;
                controller.check_server().await;
            }
            () = shutdown.cancelled() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !handle_line(&mut controller, &line).await {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read input");
                    break;
                }
            },
        }
    }

    controller.shutdown();
    Ok(())
}
