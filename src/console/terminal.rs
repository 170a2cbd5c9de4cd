use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use worklog::manager::{Frontend, Notification, NotificationLevel};

/// Line-oriented stdin/stdout front-end
pub struct Terminal {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Print `label` and read one line; `None` once stdin is closed
    pub async fn prompt(&self, label: &str) -> Option<String> {
        print!("{}", label);
        let _ = std::io::stdout().flush();

        match self.lines.lock().await.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read from stdin");
                None
            }
        }
    }
}

#[async_trait]
impl Frontend for Terminal {
    fn notify(&self, notification: Notification) {
        let tag = match notification.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        println!("[{}] {}", tag, notification.message);
    }

    async fn confirm(&self, question: &str) -> bool {
        match self.prompt(&format!("{} [y/N] ", question)).await {
            Some(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }
}
