//! Bot behaviour over the daemon's message bus.

use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use testament_config::AppConfig;
use testament_core::MemoryStore;
use testament_core::render::NO_INVOCATION;
use testament_test_utils::config::{TempConfigFile, TestConfigBuilder};
use testament_test_utils::corpus::{
    HYPOCRITES_6, HYPOCRITES_6_NOTE, sample_store, synthetic_store, write_sample_corpus,
};
use testament_test_utils::daemon::TestDaemon;
use testament_test_utils::tracing_setup::init_test_tracing;

#[tokio::test]
async fn reference_reply_is_wrapped_in_envelope() {
    init_test_tracing();
    let mut daemon = TestDaemon::start(&AppConfig::default(), sample_store());

    let reply = daemon.ask("$63:6").await;
    assert_eq!(
        reply,
        format!("```\n[63:6] {HYPOCRITES_6}\n{HYPOCRITES_6_NOTE}\n```")
    );

    daemon.stop().await;
}

#[tokio::test]
async fn reply_goes_back_to_sender() {
    let mut daemon = TestDaemon::start(&AppConfig::default(), sample_store());

    daemon.send("alice", "$9:1");
    let reply = daemon.next_reply().await;
    assert_eq!(reply.sender, "alice");
    assert_eq!(reply.channel, "test");
    assert!(reply.body.contains(NO_INVOCATION));

    daemon.stop().await;
}

#[tokio::test]
async fn invalid_reference_gets_failure_message() {
    let config = TestConfigBuilder::new()
        .failure_message("No such verse.")
        .build();
    let mut daemon = TestDaemon::start(&config, sample_store());

    for input in ["$115:1", "$63:12", "$2:5-3", "$1:0", "$x"] {
        assert_eq!(daemon.ask(input).await, "No such verse.", "input {input:?}");
    }

    daemon.stop().await;
}

#[tokio::test]
async fn commands_are_answered() {
    let mut daemon = TestDaemon::start(&AppConfig::default(), sample_store());

    assert_eq!(daemon.ask("!ping").await, "Pong!");
    assert!(daemon.ask("!version").await.starts_with("testament "));
    assert!(daemon.ask("!help").await.contains("$random"));

    daemon.stop().await;
}

#[tokio::test]
async fn chatter_is_ignored() {
    let mut daemon = TestDaemon::start(&AppConfig::default(), sample_store());

    // Nothing comes back for these, so the next reply must be the ping's.
    daemon.send("tester", "hello there");
    daemon.send("tester", "!unknown");
    daemon.send("tester", "63:6");
    assert_eq!(daemon.ask("!ping").await, "Pong!");

    daemon.stop().await;
}

#[tokio::test]
async fn long_passages_are_truncated() {
    let config = TestConfigBuilder::new().max_length(20).build();
    let mut daemon = TestDaemon::start(&config, sample_store());

    let reply = daemon.ask("$2:110-120").await;
    assert_eq!(reply, "```\n[2:110] Heifer verse...\n```");

    daemon.stop().await;
}

#[tokio::test]
async fn custom_sentinel_and_prefix() {
    let config = TestConfigBuilder::new()
        .sentinel("#")
        .command_prefix("/")
        .envelope("")
        .build();
    let mut daemon = TestDaemon::start(&config, sample_store());

    assert_eq!(
        daemon.ask("#63:6").await,
        format!("[63:6] {HYPOCRITES_6}\n{HYPOCRITES_6_NOTE}")
    );
    assert_eq!(daemon.ask("/ping").await, "Pong!");

    daemon.stop().await;
}

#[tokio::test]
async fn random_always_answers_with_a_verse() {
    let mut daemon = TestDaemon::start(&AppConfig::default(), synthetic_store());

    for _ in 0..20 {
        let reply = daemon.ask("$random").await;
        assert!(reply.starts_with("```\n"), "reply {reply:?}");
        assert!(reply.contains("] text "), "reply {reply:?}");
    }

    daemon.stop().await;
}

#[tokio::test]
async fn global_bound_reaches_the_store() {
    let config = TestConfigBuilder::new()
        .global_verse_bound()
        .failure_message("nope")
        .build();
    let mut daemon = TestDaemon::start(&config, sample_store());

    // 63:200 passes the global cap but the store has nothing for it.
    assert_eq!(daemon.ask("$63:200").await, "nope");
    assert_eq!(daemon.ask("$63:287").await, "nope");

    daemon.stop().await;
}

#[tokio::test]
async fn config_and_corpus_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let corpus_path = write_sample_corpus(dir.path()).await;
    let toml = format!(
        r#"
[bot]
sentinel = "%"

[output]
envelope = ""

[store]
corpus_path = "{}"
"#,
        corpus_path.display()
    );
    let file = TempConfigFile::with_toml(&toml).await;

    let config = AppConfig::load(&file.path).await.unwrap();
    let store = MemoryStore::load(Path::new(&config.store.corpus_path))
        .await
        .unwrap();
    let mut daemon = TestDaemon::start(&config, Arc::new(store));

    assert_eq!(
        daemon.ask("%63:6").await,
        format!("[63:6] {HYPOCRITES_6}\n{HYPOCRITES_6_NOTE}")
    );

    daemon.stop().await;
}
