//! Terminal rendering surface

use super::traits::Renderer;
use super::{Notice, NoticeKind, RenderedTurn};
use crate::chat::Role;
use crossterm::style::{Attribute, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, execute};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Convert formatter markup to ANSI-styled terminal text
pub fn markup_to_ansi(markup: &str) -> String {
    markup
        .replace("<strong>", &Attribute::Bold.to_string())
        .replace("</strong>", &Attribute::NormalIntensity.to_string())
        .replace("<em>", &Attribute::Italic.to_string())
        .replace("</em>", &Attribute::NoItalic.to_string())
        .replace("<br>", "\n")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Renders the conversation to stdout.
///
/// Printed notices stay in the scrollback; dismissal is a no-op.
#[derive(Default)]
pub struct TerminalRenderer {
    typing: AtomicBool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self, f: impl FnOnce(&mut io::StdoutLock<'_>) -> io::Result<()>) {
        let mut out = io::stdout().lock();
        // Any visible indicator line is replaced by the new output
        let result = if self.typing.load(Ordering::SeqCst) {
            execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))
        } else {
            Ok(())
        }
        .and_then(|()| f(&mut out))
        .and_then(|()| out.flush());
        if let Err(e) = result {
            tracing::debug!(error = %e, "Terminal write failed");
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render_turn(&self, turn: &RenderedTurn) {
        let body = markup_to_ansi(&turn.markup);
        let time = turn.timestamp.format("%H:%M");
        self.write(|out| {
            let label = match turn.role {
                Role::User => "you".cyan().bold(),
                Role::Bot if turn.is_error => "bot".red().bold(),
                Role::Bot => "bot".green().bold(),
            };
            if turn.is_error {
                writeln!(out, "{} {label} › {}", time.to_string().dark_grey(), body.red())?;
            } else {
                writeln!(out, "{} {label} › {body}", time.to_string().dark_grey())?;
            }
            if let Some(badge) = &turn.badge {
                let mut line = format!("confidence {}", badge.confidence);
                if let Some(tag) = &badge.tag {
                    line.push_str("  ");
                    line.push_str(tag);
                }
                writeln!(out, "        {}", line.dark_grey())?;
            }
            Ok(())
        });
    }

    fn show_typing(&self) {
        self.write(|out| write!(out, "{}", "bot is typing…".dark_grey().italic()));
        self.typing.store(true, Ordering::SeqCst);
    }

    fn hide_typing(&self) {
        if self.typing.swap(false, Ordering::SeqCst) {
            let mut out = io::stdout().lock();
            if let Err(e) = execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)) {
                tracing::debug!(error = %e, "Terminal write failed");
            }
        }
    }

    fn show_notice(&self, notice: &Notice) {
        let text = match notice.kind {
            NoticeKind::Info => notice.text.clone().blue(),
            NoticeKind::Success => notice.text.clone().green(),
            NoticeKind::Warning => notice.text.clone().yellow(),
            NoticeKind::Error => notice.text.clone().red(),
        };
        self.write(|out| writeln!(out, "  [{}] {text}", notice.kind.as_str()));
    }

    fn dismiss_notice(&self, id: u64) {
        tracing::trace!(notice_id = id, "Notice expired");
    }
}
