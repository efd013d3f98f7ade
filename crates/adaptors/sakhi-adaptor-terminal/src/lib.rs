//! Terminal chat front-end
//!
//! Reads one message per line, hands it to the [`TurnEngine`] and prints the
//! reply after a short simulated typing pause.

use sakhi_core::{CompanionStore, Credentials, InMemoryStore, Logger, Result};
use sakhi_plugin_lifeengine::TurnEngine;
use sakhi_storage_supabase::{SupabaseAdapter, SupabaseConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Characters "typed" per second
const TYPING_CHARS_PER_SEC: f64 = 25.0;
/// Longest typing pause
const MAX_TYPING_SECS: f64 = 4.0;

/// Lines that end the session
const QUIT_COMMANDS: &[&str] = &["/quit", "/exit", "bye!"];

/// Session settings
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Identifier the conversation is stored under
    pub user_id: String,
    /// Pause before printing replies
    pub typing_delay: bool,
}

/// Pause before showing `reply`
pub fn typing_delay_for(reply: &str) -> Duration {
    let secs = (reply.chars().count() as f64 / TYPING_CHARS_PER_SEC).min(MAX_TYPING_SECS);
    Duration::from_secs_f64(secs)
}

/// Supabase store, or the in-memory one when offline or unreachable
pub async fn connect_store(credentials: &Credentials, offline: bool) -> Arc<dyn CompanionStore> {
    if offline {
        tracing::info!("Offline mode: conversation will not be persisted");
        return Arc::new(InMemoryStore::new());
    }
    match SupabaseAdapter::new(SupabaseConfig::from_credentials(credentials)).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(
                "Supabase unreachable ({}); continuing with an in-memory store",
                e
            );
            Arc::new(InMemoryStore::new())
        }
    }
}

/// Interactive chat session over any line reader and writer
pub struct TerminalAdaptor {
    config: TerminalConfig,
    engine: Arc<TurnEngine>,
    logger: Logger,
}

impl TerminalAdaptor {
    /// Create an adaptor driving `engine`
    pub fn new(config: TerminalConfig, engine: Arc<TurnEngine>) -> Self {
        Self {
            config,
            engine,
            logger: Logger::new("terminal"),
        }
    }

    /// Run until EOF or a quit command
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let user_id = self.config.user_id.as_str();

        match self.engine.proactive_message(user_id).await {
            Ok(Some(opener)) => self.say(&mut output, &opener).await?,
            Ok(None) => {}
            Err(e) => self.logger.warn(&format!("Proactive message skipped: {}", e)),
        }

        let mut lines = input.lines();
        let mut turns = 0usize;
        loop {
            output.write_all(b"You: ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let message = line.trim();
            if message.is_empty() {
                continue;
            }
            if QUIT_COMMANDS.contains(&message.to_lowercase().as_str()) {
                break;
            }

            match self.engine.handle_turn(user_id, message).await {
                Ok(outcome) => {
                    if let Some(reply) = outcome.reply {
                        self.say(&mut output, &reply).await?;
                    }
                }
                Err(e) => self.logger.warn(&format!("Turn rejected: {}", e)),
            }
            turns += 1;
        }

        self.logger
            .success(&format!("Session with '{}' ended after {} turns", user_id, turns));

        output.write_all(b"\n").await?;
        output.flush().await?;
        Ok(())
    }

    async fn say<W: AsyncWrite + Unpin>(&self, output: &mut W, reply: &str) -> Result<()> {
        if self.config.typing_delay {
            tokio::time::sleep(typing_delay_for(reply)).await;
        }
        let line = format!("{}: {}\n", self.engine.persona().name, reply);
        output.write_all(line.as_bytes()).await?;
        output.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sakhi_core::testing::{utc, ScriptedGenerator};
    use sakhi_core::{EngineConfig, ManualClock, ScriptedRandom};

    fn adaptor(replies: &str) -> (TerminalAdaptor, Arc<ScriptedGenerator>) {
        let generator = Arc::new(ScriptedGenerator::always(replies));
        let config = EngineConfig {
            unavailability_scale: 0.0,
            typing_delay: false,
            ..EngineConfig::default()
        };
        let engine = TurnEngine::new(config, Arc::new(InMemoryStore::new()), generator.clone())
            .unwrap()
            .with_clock(Arc::new(ManualClock::new(utc(2026, 10, 16, 9, 0))))
            .with_random(ScriptedRandom::new());
        let terminal = TerminalAdaptor::new(
            TerminalConfig {
                user_id: "local".to_string(),
                typing_delay: false,
            },
            Arc::new(engine),
        );
        (terminal, generator)
    }

    #[test]
    fn test_typing_delay_is_capped() {
        assert_eq!(typing_delay_for(""), Duration::ZERO);
        assert_eq!(typing_delay_for(&"a".repeat(50)), Duration::from_secs(2));
        assert_eq!(typing_delay_for(&"a".repeat(500)), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_session_prints_replies_and_skips_blank_lines() {
        let (terminal, generator) = adaptor("heyy");
        let input: &[u8] = b"hi\n\n   \nhow was your day\n/quit\nnever read\n";
        let mut output = Vec::new();

        terminal.run(input, &mut output).await.unwrap();

        let transcript = String::from_utf8(output).unwrap();
        assert_eq!(transcript.matches("Riya: heyy\n").count(), 2);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_session_ends_on_eof() {
        let (terminal, generator) = adaptor("hmm");
        let input: &[u8] = b"hello";
        let mut output = Vec::new();

        terminal.run(input, &mut output).await.unwrap();

        assert!(String::from_utf8(output).unwrap().contains("Riya: hmm"));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_offline_store_is_in_memory() {
        let credentials = Credentials {
            gemini_api_key: "k".to_string(),
            supabase_url: "http://127.0.0.1:1".to_string(),
            supabase_key: "k".to_string(),
        };
        assert_eq!(connect_store(&credentials, true).await.name(), "memory");
        assert_eq!(connect_store(&credentials, false).await.name(), "memory");
    }
}
