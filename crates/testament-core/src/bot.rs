//! Chat command handling — turns inbound messages into replies.
//!
//! Messages starting with the sentinel are verse references; messages
//! starting with the command prefix are utility commands. Everything else is
//! ignored.

use std::sync::Arc;

use tracing::{debug, info, warn};

use testament_config::AppConfig;

use crate::build_info;
use crate::format::OutputFormatter;
use crate::message::Envelope;
use crate::resolver::Resolver;
use crate::store::VerseStore;
use crate::validate::{ReferenceRules, VerseBound};

/// Utility commands understood after the command prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Version,
    Help,
}

impl Command {
    /// Parse the first word of `text` (case-insensitive).
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        match word.to_ascii_lowercase().as_str() {
            "ping" => Some(Command::Ping),
            "version" => Some(Command::Version),
            "help" => Some(Command::Help),
            _ => None,
        }
    }
}

/// The chat bot: a resolver plus reply formatting.
pub struct Bot {
    resolver: Resolver,
    formatter: OutputFormatter,
    command_prefix: char,
    failure_message: String,
}

impl Bot {
    /// Create a bot with the default command prefix and failure message.
    pub fn new(resolver: Resolver, formatter: OutputFormatter) -> Self {
        let defaults = testament_config::BotConfig::default();
        Self {
            resolver,
            formatter,
            command_prefix: defaults.command_prefix_char(),
            failure_message: defaults.failure_message,
        }
    }

    /// Build a bot from a validated configuration.
    pub fn from_config(config: &AppConfig, store: Arc<dyn VerseStore>) -> Self {
        let bound = match config.validation.verse_bound.as_str() {
            "global" => VerseBound::Global,
            _ => VerseBound::PerChapter,
        };
        let rules = ReferenceRules {
            sentinel: config.bot.sentinel_char(),
            bound,
        };
        let resolver = Resolver::new(store)
            .with_rules(rules)
            .with_random_keyword(config.bot.random_keyword.clone());
        let formatter = OutputFormatter::new(
            config.output.max_length,
            config.output.envelope.clone(),
            config.output.ellipsis.clone(),
        );

        Self {
            resolver,
            formatter,
            command_prefix: config.bot.command_prefix_char(),
            failure_message: config.bot.failure_message.clone(),
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Handle an inbound message, returning the reply to send (if any).
    pub async fn handle(&self, message: &Envelope) -> Option<Envelope> {
        if !message.is_inbound() {
            return None;
        }
        let body = self
            .respond(message.body.trim(), &message.sender)
            .await?;
        Some(message.reply(&body))
    }

    /// Compute the reply text for a message body.
    pub async fn respond(&self, body: &str, sender: &str) -> Option<String> {
        let sentinel = self.resolver.rules().sentinel;

        if body.starts_with(sentinel) {
            return self.respond_to_reference(body, sender).await;
        }
        if let Some(rest) = body.strip_prefix(self.command_prefix) {
            return self.respond_to_command(rest, sender);
        }
        None
    }

    async fn respond_to_reference(&self, body: &str, sender: &str) -> Option<String> {
        match self.resolver.resolve(body).await {
            Ok(passage) => {
                info!(
                    sender = %sender,
                    reference = %passage.reference,
                    chars = passage.text.chars().count(),
                    "Resolved verse reference"
                );
                let formatted = self.formatter.format(&passage.text);
                if formatted.is_none() {
                    debug!(reference = %passage.reference, "Rendered passage is empty, not replying");
                }
                formatted
            }
            Err(err) => {
                warn!(
                    sender = %sender,
                    input = %body,
                    kind = err.kind(),
                    error = %err,
                    "Could not resolve verse reference"
                );
                Some(self.failure_message.clone())
            }
        }
    }

    fn respond_to_command(&self, text: &str, sender: &str) -> Option<String> {
        let Some(command) = Command::parse(text) else {
            debug!(sender = %sender, command = %text, "Ignoring unknown command");
            return None;
        };
        debug!(sender = %sender, ?command, "Handling command");

        let reply = match command {
            Command::Ping => "Pong!".to_string(),
            Command::Version => format!("testament {}", build_info::version_string()),
            Command::Help => {
                let s = self.resolver.rules().sentinel;
                let p = self.command_prefix;
                let random = self.resolver.random_keyword();
                format!(
                    "{s}chapter:verse or {s}chapter:first-last to quote verses, \
                     {s}{random} for a random verse, {p}ping, {p}version"
                )
            }
        };
        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::INVOCATION;
    use crate::store::{Corpus, CorpusChapter, CorpusVerse, MemoryStore};
    use pretty_assertions::assert_eq;

    fn store() -> Arc<dyn VerseStore> {
        let corpus = Corpus {
            chapters: vec![
                CorpusChapter::new(63, "The Hypocrites")
                    .with_verse(CorpusVerse::new(6, "It is the same.").with_footnote("*note")),
                CorpusChapter::new(9, "Ultimatum")
                    .with_verse(CorpusVerse::new(1, "An ultimatum."))
                    .with_verse(CorpusVerse::new(2, "Roam the land.")),
            ],
        };
        Arc::new(MemoryStore::from_corpus("bot-test", corpus).unwrap())
    }

    fn bot() -> Bot {
        Bot::from_config(&AppConfig::default(), store())
    }

    #[test_log::test(tokio::test)]
    async fn test_reference_reply_is_enveloped() {
        let reply = bot().respond("$63:6", "alice").await.unwrap();
        assert_eq!(reply, "```\n[63:6] It is the same.\n*note\n```");
    }

    #[test_log::test(tokio::test)]
    async fn test_chapter_nine_reply() {
        let reply = bot().respond("$9:1-2", "alice").await.unwrap();
        assert!(reply.contains("No Basmalah*"));
        assert!(!reply.contains(INVOCATION));
    }

    #[test_log::test(tokio::test)]
    async fn test_failure_replies_with_generic_message() {
        let bot = bot();
        for input in ["$", "$0:1", "$63:99", "$2:5-1", "$1:0", "$63:5"] {
            assert_eq!(
                bot.respond(input, "alice").await.as_deref(),
                Some("Could not resolve that reference."),
                "input {input:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_commands() {
        let bot = bot();
        assert_eq!(bot.respond("!ping", "u").await.as_deref(), Some("Pong!"));
        assert_eq!(bot.respond("!PING now", "u").await.as_deref(), Some("Pong!"));
        let version = bot.respond("!version", "u").await.unwrap();
        assert!(version.starts_with("testament "));
        let help = bot.respond("!help", "u").await.unwrap();
        assert!(help.contains("$random"));
        assert_eq!(bot.respond("!makan", "u").await, None);
        assert_eq!(bot.respond("!", "u").await, None);
    }

    #[tokio::test]
    async fn test_plain_chat_is_ignored() {
        assert_eq!(bot().respond("hello there", "u").await, None);
        assert_eq!(bot().respond("", "u").await, None);
    }

    #[tokio::test]
    async fn test_handle_replies_to_sender_on_same_channel() {
        let inbound = Envelope::new("console", "bob", "  $63:6  ");
        let reply = bot().handle(&inbound).await.unwrap();
        assert_eq!(reply.channel, "console");
        assert_eq!(reply.sender, "bob");
        assert!(!reply.is_inbound());
        assert!(reply.body.contains("[63:6]"));
    }

    #[tokio::test]
    async fn test_handle_ignores_outbound() {
        let outbound = Envelope::new("console", "bob", "$63:6").reply("$63:6");
        assert!(bot().handle(&outbound).await.is_none());
    }

    #[tokio::test]
    async fn test_custom_prefixes_from_config() {
        let config = AppConfig::parse(
            r##"
            [bot]
            sentinel = "#"
            command_prefix = "/"
            failure_message = "No such verse."

            [output]
            envelope = ""
            "##,
        )
        .unwrap();
        let bot = Bot::from_config(&config, store());
        assert_eq!(
            bot.respond("#63:6", "u").await.as_deref(),
            Some("[63:6] It is the same.\n*note")
        );
        assert_eq!(bot.respond("$63:6", "u").await, None);
        assert_eq!(bot.respond("/ping", "u").await.as_deref(), Some("Pong!"));
        assert_eq!(bot.respond("#1:0", "u").await.as_deref(), Some("No such verse."));
    }

    #[tokio::test]
    async fn test_help_names_configured_random_keyword() {
        let mut config = AppConfig::default();
        config.bot.random_keyword = "any".to_string();
        let bot = Bot::from_config(&config, store());

        let help = bot.respond("!help", "u").await.unwrap();
        assert!(help.contains("$any for a random verse"), "help {help:?}");
        assert!(!help.contains("$random"), "help {help:?}");
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("ping"), Some(Command::Ping));
        assert_eq!(Command::parse("Version extra"), Some(Command::Version));
        assert_eq!(Command::parse("help"), Some(Command::Help));
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("verse"), None);
    }

    #[test]
    fn test_new_uses_default_prefixes() {
        let bot = Bot::new(Resolver::new(store()), OutputFormatter::default());
        assert_eq!(bot.command_prefix, '!');
        assert_eq!(bot.resolver().rules().sentinel, '$');
    }
}
