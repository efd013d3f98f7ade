//! End-to-end turn cycle tests against the in-memory store

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockall::mock;
use sakhi_core::testing::{utc, FailingStore, ScriptedGenerator};
use sakhi_core::*;
use sakhi_plugin_lifeengine::excuse::find_excuse;
use sakhi_plugin_lifeengine::generation::fallback_lines;
use sakhi_plugin_lifeengine::postprocess::count_emojis;
use sakhi_plugin_lifeengine::prompt::NO_HISTORY;
use sakhi_plugin_lifeengine::TurnEngine;
use std::sync::Arc;

mock! {
    pub Generator {}

    #[async_trait]
    impl TextGenerator for Generator {
        fn name(&self) -> &str;
        async fn generate(&self, prompt: &str) -> sakhi_core::Result<String>;
    }
}

// Friday 2026-10-16, 14:30 IST
fn friday_afternoon() -> DateTime<Utc> {
    utc(2026, 10, 16, 9, 0)
}

struct Harness {
    engine: TurnEngine,
    store: Arc<InMemoryStore>,
    clock: Arc<ManualClock>,
}

fn harness(generator: Arc<dyn TextGenerator>, rng: impl RandomSource + 'static) -> Harness {
    harness_with(EngineConfig::default(), generator, rng)
}

fn harness_with(
    config: EngineConfig,
    generator: Arc<dyn TextGenerator>,
    rng: impl RandomSource + 'static,
) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(ManualClock::new(friday_afternoon()));
    let engine = TurnEngine::new(config, store.clone(), generator)
        .unwrap()
        .with_clock(clock.clone())
        .with_random(rng);
    Harness {
        engine,
        store,
        clock,
    }
}

async fn seed_regular(store: &InMemoryStore, mood: Mood, now: DateTime<Utc>) {
    let mut profile = UserProfile::new("u1", now - Duration::days(2));
    for _ in 0..5 {
        profile.record_message(false, now - Duration::hours(8));
    }
    store.upsert_profile(&profile).await.unwrap();
    store
        .upsert_personality(&PersonalityState::new("u1", mood, now - Duration::hours(8)))
        .await
        .unwrap();
}

#[tokio::test]
async fn stressed_message_gets_supportive_reply_with_one_emoji() {
    let generator = Arc::new(ScriptedGenerator::always(
        "aww no 😟😟 come here 🤗 tell me everything 💕",
    ));
    let h = harness(generator.clone(), ScriptedRandom::new());
    seed_regular(&h.store, Mood::Playful, friday_afternoon()).await;

    let outcome = h
        .engine
        .handle_turn("u1", "I'm so stressed about my deadline")
        .await
        .unwrap();

    assert_eq!(outcome.emotion, Emotion::Stressed);
    assert_eq!(outcome.topics, vec![Topic::Work]);
    assert_eq!(outcome.mood, Mood::Supportive);
    assert_eq!(outcome.kind, TurnKind::Reply);
    let reply = outcome.reply.unwrap();
    assert_eq!(reply, "aww no 😟 come here tell me everything");
    assert!(count_emojis(&reply) <= 1);

    let state = h.store.get_personality("u1").await.unwrap().unwrap();
    assert_eq!(state.mood, Mood::Supportive);
    assert_eq!(state.mood_history, vec![Mood::Playful, Mood::Supportive]);
    assert!(generator.prompts()[0].contains("He seems stressed"));
}

#[tokio::test]
async fn availability_window_lifecycle() {
    let generator = Arc::new(ScriptedGenerator::always("haha sorry 😅"));
    // Turn 1: initial mood pick, mood/typo/filler misses.
    // Turn 2: gate hits, Work category, second excuse, 7 minutes.
    let rng = ScriptedRandom::new()
        .with_chances([false, false, false, true])
        .with_indices([0, 0, 1])
        .with_ranges([7]);
    let h = harness(generator.clone(), rng);

    let first = h.engine.handle_turn("u1", "hi").await.unwrap();
    assert_eq!(first.kind, TurnKind::Reply);
    assert_eq!(first.mood, Mood::Playful);

    h.clock.advance(Duration::minutes(1));
    let away = h.engine.handle_turn("u1", "what are you doing?").await.unwrap();
    assert_eq!(away.kind, TurnKind::Unavailable);
    assert!(away.reply.as_deref().unwrap().contains("on a tight deadline"));

    let window = h.store.get_availability("u1").await.unwrap().unwrap();
    assert_eq!(window.excuse, "on a tight deadline");
    assert_eq!(window.duration_minutes, 7);
    let opened_at = window.started_at;

    h.clock.set(opened_at + Duration::minutes(2));
    let ack = h.engine.handle_turn("u1", "okay cool").await.unwrap();
    assert_eq!(ack.kind, TurnKind::Silent);
    assert!(ack.reply.is_none());
    let window = h.store.get_availability("u1").await.unwrap().unwrap();
    assert!(window.acknowledged);
    assert_eq!(window.excuse, "on a tight deadline");

    h.clock.set(opened_at + Duration::minutes(3));
    let reminder = h.engine.handle_turn("u1", "where are you?").await.unwrap();
    assert_eq!(reminder.kind, TurnKind::Reminder);
    assert!(reminder.reply.as_deref().unwrap().contains("on a tight deadline"));

    h.clock.set(opened_at + Duration::minutes(8));
    let back = h.engine.handle_turn("u1", "hey you there?").await.unwrap();
    assert_eq!(back.kind, TurnKind::Returned);
    let reply = back.reply.unwrap();
    let family = find_excuse("on a tight deadline").unwrap().return_lines;
    assert!(
        family.iter().any(|line| reply.starts_with(line)),
        "unexpected return reply {reply}"
    );
    assert!(reply.ends_with("haha sorry 😅"));
    assert!(h.store.get_availability("u1").await.unwrap().is_none());

    // Only the two generated turns reached the model
    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("You were away (on a tight deadline)"));

    // Silent turn persisted with an empty reply
    let turns = h.store.recent_turns("u1", 10).await.unwrap();
    assert_eq!(turns.len(), 5);
    assert_eq!(turns[2].user_message, "okay cool");
    assert!(turns[2].reply.is_empty());
}

#[tokio::test]
async fn saved_turn_appears_verbatim_in_next_prompt() {
    let generator = Arc::new(ScriptedGenerator::new([
        Ok("ooh biryani without me? rude".to_string()),
        Ok("hmm".to_string()),
    ]));
    let config = EngineConfig {
        unavailability_scale: 0.0,
        ..EngineConfig::default()
    };
    let h = harness_with(config, generator.clone(), ScriptedRandom::new());

    h.engine
        .handle_turn("u1", "my name is aarav, had biryani today")
        .await
        .unwrap();
    h.clock.advance(Duration::minutes(3));
    h.engine.handle_turn("u1", "you want some?").await.unwrap();

    let prompts = generator.prompts();
    assert!(prompts[0].contains(NO_HISTORY));
    assert!(prompts[1].contains(
        "You: my name is aarav, had biryani today\nHer: ooh biryani without me? rude"
    ));
    assert!(prompts[1].contains("His name is Aarav."));

    let profile = h.store.get_profile("u1").await.unwrap().unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Aarav"));
    assert_eq!(profile.message_count, 2);
}

#[tokio::test]
async fn generation_failure_retries_once_then_falls_back() {
    let mut generator = MockGenerator::new();
    generator.expect_name().return_const("mock".to_string());
    generator
        .expect_generate()
        .times(2)
        .returning(|_| Err(SakhiError::model("503 Service Unavailable")));

    let h = harness(Arc::new(generator), ScriptedRandom::new());
    seed_regular(&h.store, Mood::Chill, friday_afternoon()).await;

    let outcome = h.engine.handle_turn("u1", "bored yaar").await.unwrap();
    assert_eq!(outcome.kind, TurnKind::Fallback);
    assert_eq!(outcome.emotion, Emotion::Bored);
    let reply = outcome.reply.unwrap();
    assert!(fallback_lines(Mood::Chill).contains(&reply.as_str()));
}

#[tokio::test]
async fn prompt_is_built_from_current_state() {
    let mut generator = MockGenerator::new();
    generator.expect_name().return_const("mock".to_string());
    generator
        .expect_generate()
        .withf(|prompt| {
            !prompt.contains("His name")
                && prompt.contains("You: miss you so much")
                && prompt.contains(Mood::Clingy.description())
        })
        .times(1)
        .returning(|_| Ok("Her: miss you more".to_string()));

    let config = EngineConfig {
        unavailability_scale: 0.0,
        ..EngineConfig::default()
    };
    let h = harness_with(config, Arc::new(generator), ScriptedRandom::new());
    seed_regular(&h.store, Mood::Clingy, friday_afternoon()).await;

    let outcome = h.engine.handle_turn("u1", "miss you so much").await.unwrap();
    assert_eq!(outcome.reply.as_deref(), Some("miss you more"));
    assert_eq!(outcome.emotion, Emotion::Romantic);
    // Romantic is high-affinity
    assert_eq!(outcome.intimacy, INTIMACY_MIN + 1);
}

#[tokio::test]
async fn store_failures_degrade_to_fresh_state() {
    let generator = Arc::new(ScriptedGenerator::always("hii"));
    let engine = TurnEngine::new(EngineConfig::default(), Arc::new(FailingStore), generator.clone())
        .unwrap()
        .with_clock(Arc::new(ManualClock::new(friday_afternoon())))
        .with_random(ScriptedRandom::new());

    let outcome = engine.handle_turn("u1", "hello?").await.unwrap();
    assert_eq!(outcome.kind, TurnKind::Reply);
    assert_eq!(outcome.reply.as_deref(), Some("hii"));
    assert_eq!(outcome.relationship_stage, RelationshipStage::Stranger);
    assert!(generator.prompts()[0].contains(NO_HISTORY));

    assert!(engine.forget_user("u1").await.is_err());
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let h = harness(Arc::new(ScriptedGenerator::always("hi")), ScriptedRandom::new());
    let err = h.engine.handle_turn("u1", "   ").await.unwrap_err();
    assert!(matches!(err, SakhiError::Validation(_)));
    assert_eq!(h.store.turn_count("u1").await, 0);
}

#[tokio::test]
async fn proactive_message_after_long_silence() {
    let generator = Arc::new(ScriptedGenerator::always("oye kahan ho 😒😒"));
    let rng = ScriptedRandom::new().with_chances([true]);
    let h = harness(generator.clone(), rng);
    seed_regular(&h.store, Mood::Clingy, friday_afternoon()).await;

    let message = h.engine.proactive_message("u1").await.unwrap();
    assert_eq!(message.as_deref(), Some("oye kahan ho 😒"));
    assert!(generator.prompts()[0].contains("Text him first."));

    let turns = h.store.recent_turns("u1", 10).await.unwrap();
    assert_eq!(turns.len(), 1);
    assert!(turns[0].user_message.is_empty());
    assert_eq!(turns[0].context["kind"], "proactive");

    let profile = h.store.get_profile("u1").await.unwrap().unwrap();
    assert_eq!(profile.last_interaction, friday_afternoon());
    assert_eq!(profile.message_count, 5);

    // Just talked, so no second nudge
    assert!(h.engine.proactive_message("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn no_proactive_message_for_unknown_user() {
    let generator = Arc::new(ScriptedGenerator::always("hey"));
    let h = harness(generator.clone(), ScriptedRandom::new().with_chances([true]));
    assert!(h.engine.proactive_message("stranger").await.unwrap().is_none());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn forget_user_removes_everything() {
    let h = harness(Arc::new(ScriptedGenerator::always("hey")), ScriptedRandom::new());
    h.engine.handle_turn("u1", "hi").await.unwrap();
    assert_eq!(h.store.turn_count("u1").await, 1);

    h.engine.forget_user("u1").await.unwrap();
    assert!(h.store.get_profile("u1").await.unwrap().is_none());
    assert!(h.store.get_personality("u1").await.unwrap().is_none());
    assert_eq!(h.store.turn_count("u1").await, 0);
}

#[tokio::test]
async fn invariants_hold_over_a_long_session() {
    let generator = Arc::new(ScriptedGenerator::always("haha 😂😂 okay 💕 see"));
    let config = EngineConfig {
        unavailability_scale: 4.0,
        ..EngineConfig::default()
    };
    let h = harness_with(config, generator, StdRandom::seeded(2026));

    let messages = [
        "hey",
        "what's up",
        "okay cool",
        "I'm so stressed about my deadline",
        "my boss is so annoying",
        "love you",
        "ok",
        "watched a movie today, it was amazing and the songs were so good, you'd love it honestly",
        "so bored",
        "np take your time",
    ];

    let mut last_intimacy = INTIMACY_MIN;
    let mut active_excuse: Option<String> = None;

    for i in 0..200 {
        let message = messages[i % messages.len()];
        let outcome = h.engine.handle_turn("u1", message).await.unwrap();

        assert!(Mood::ALL.contains(&outcome.mood));
        assert!(outcome.intimacy >= last_intimacy);
        assert!((INTIMACY_MIN..=INTIMACY_MAX).contains(&outcome.intimacy));
        last_intimacy = outcome.intimacy;

        if let Some(reply) = &outcome.reply {
            assert!(count_emojis(reply) <= 1, "too many emoji in {reply}");
        }

        match outcome.kind {
            TurnKind::Unavailable => {
                assert!(active_excuse.is_none());
                let window = h.store.get_availability("u1").await.unwrap().unwrap();
                assert!(outcome.reply.as_deref().unwrap().contains(&window.excuse));
                active_excuse = Some(window.excuse);
            }
            TurnKind::Reminder => {
                let excuse = active_excuse.as_deref().unwrap();
                assert!(outcome.reply.as_deref().unwrap().contains(excuse));
                let window = h.store.get_availability("u1").await.unwrap().unwrap();
                assert_eq!(window.excuse, excuse);
            }
            TurnKind::Silent => {
                assert!(active_excuse.is_some());
                assert!(outcome.reply.is_none());
            }
            TurnKind::Returned => {
                assert!(active_excuse.take().is_some());
                assert!(h.store.get_availability("u1").await.unwrap().is_none());
            }
            TurnKind::Reply | TurnKind::Fallback => {
                assert!(active_excuse.is_none());
                if outcome.emotion.is_distress() {
                    assert_eq!(outcome.mood, Mood::Supportive);
                }
            }
            TurnKind::Proactive => unreachable!("handle_turn never produces proactive turns"),
        }

        h.clock.advance(Duration::minutes((i as i64 * 7) % 13 + 1));
    }
}
