//! Turn Engine
//!
//! The conversation turn handler. Per-user state is loaded from the store at
//! the start of every turn and written back at the end, so the engine itself
//! keeps nothing between turns except its collaborators.
//!
//! Order of work for one message:
//! 1. Derive context from the clock and the stored profile
//! 2. Classify emotion, topics and a volunteered name
//! 3. Run the availability gate
//! 4. Move mood and intimacy (only when a reply is generated)
//! 5. Assemble the prompt and generate, falling back in character
//! 6. Post-process, persist, return

use super::availability::{AvailabilityGate, GateInput, GateOutcome};
use super::generation::{fallback_line, generate_reply};
use super::postprocess::PostProcessor;
use super::proactive::{fallback_opener, should_reach_out};
use super::prompt::{ProactivePrompt, PromptAssembler, PromptBudgets, ReplyPrompt};
use crate::evaluators::{initial_mood, next_intimacy, next_mood, EmotionEvaluator};
use crate::providers::derive_context;
use crate::types::{ContextBundle, Persona};
use chrono::{DateTime, NaiveDate, Utc};
use sakhi_core::*;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Result of handling one inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Text to show the user; `None` when the persona stays silent
    pub reply: Option<String>,
    /// How the reply was produced
    pub kind: TurnKind,
    /// Classified user emotion
    pub emotion: Emotion,
    /// Topics mentioned
    pub topics: Vec<Topic>,
    /// Persona mood after the turn
    pub mood: Mood,
    /// Intimacy after the turn
    pub intimacy: u8,
    /// Relationship stage after the turn
    pub relationship_stage: RelationshipStage,
}

/// Conversation turn handler
pub struct TurnEngine {
    config: EngineConfig,
    persona: Persona,
    store: Arc<dyn CompanionStore>,
    generator: Arc<dyn TextGenerator>,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn RandomSource>>,
    evaluator: EmotionEvaluator,
    prompts: PromptAssembler,
    gate: AvailabilityGate,
    post: PostProcessor,
    retry: RetryConfig,
}

impl TurnEngine {
    /// Create an engine on the system clock and entropy-seeded randomness
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn CompanionStore>,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self> {
        config.validate()?;
        let prompts = PromptAssembler::new(PromptBudgets {
            history_chars: config.history_char_budget,
            message_chars: config.message_char_budget,
        })?;

        info!(
            persona = %config.persona_name,
            store = store.name(),
            generator = generator.name(),
            "TurnEngine initialized"
        );

        Ok(Self {
            persona: Persona::new(config.persona_name.clone()),
            store,
            generator,
            clock: Arc::new(SystemClock),
            rng: Mutex::new(Box::new(StdRandom::from_entropy())),
            evaluator: EmotionEvaluator::new(),
            prompts,
            gate: AvailabilityGate::new(config.unavailability_scale),
            post: PostProcessor::new(config.max_emojis),
            retry: RetryConfig::default(),
            config,
        })
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the randomness source
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    /// Replace the persona; the configured name is kept
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = Persona {
            name: self.config.persona_name.clone(),
            ..persona
        };
        self
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Persona in use
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    fn with_rng<R>(&self, f: impl FnOnce(&mut dyn RandomSource) -> R) -> R {
        let mut guard = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut **guard)
    }

    /// Handle one inbound message
    pub async fn handle_turn(&self, user_id: &str, message: &str) -> Result<TurnOutcome> {
        let message = message.trim();
        if user_id.trim().is_empty() {
            return Err(SakhiError::validation("user id must not be empty"));
        }
        if message.is_empty() {
            return Err(SakhiError::validation("message must not be empty"));
        }

        let now = self.clock.now();
        let stored_profile = degrade(self.store.get_profile(user_id).await, "get_profile", user_id);
        let stored_personality =
            degrade(self.store.get_personality(user_id).await, "get_personality", user_id);
        let window = degrade(
            self.store.get_availability(user_id).await,
            "get_availability",
            user_id,
        );
        let history = degrade(
            self.store
                .recent_turns(user_id, self.config.history_window)
                .await
                .map(Some),
            "recent_turns",
            user_id,
        )
        .unwrap_or_default();

        let context = derive_context(now, self.config.timezone(), stored_profile.as_ref());
        let analysis = self.evaluator.analyze(message);
        let emotion = analysis.emotion;

        let mut profile = stored_profile.unwrap_or_else(|| UserProfile::new(user_id, now));
        if let Some(name) = &analysis.name {
            profile.display_name = Some(name.clone());
        }
        profile.record_message(emotion.is_emotional(), now);

        let mut personality = match stored_personality {
            Some(state) => state.normalized(),
            None => self.with_rng(|rng| PersonalityState::new(user_id, initial_mood(rng), now)),
        };

        let outcome = self.with_rng(|rng| {
            self.gate.evaluate(
                GateInput {
                    user_id,
                    message,
                    window: window.as_ref(),
                    context: &context,
                    first_message: context.first_contact,
                    distress: emotion.is_distress(),
                    now,
                },
                rng,
            )
        });

        let (reply, kind) = match outcome {
            GateOutcome::WentAway { window, apology } => {
                log_write(self.store.put_availability(&window).await, "put_availability", user_id);
                (Some(self.post.cap(&apology)), TurnKind::Unavailable)
            }
            GateOutcome::Reminder { text, .. } => (Some(self.post.cap(&text)), TurnKind::Reminder),
            GateOutcome::Acknowledged { window } => {
                log_write(self.store.put_availability(&window).await, "put_availability", user_id);
                (None, TurnKind::Silent)
            }
            GateOutcome::Returned {
                window,
                return_line,
            } => {
                log_write(
                    self.store.clear_availability(user_id).await,
                    "clear_availability",
                    user_id,
                );
                let note = format!(
                    "You were away ({}) and just came back to your phone. Don't over-explain.",
                    window.excuse
                );
                let (text, _) = self
                    .generate_turn_reply(
                        user_id,
                        &mut personality,
                        &context,
                        &analysis.topics,
                        emotion,
                        Some(&note),
                        &history,
                        message,
                        now,
                    )
                    .await;
                let combined = format!("{return_line} {text}");
                let reply = self.with_rng(|rng| self.post.process(&combined, rng));
                (Some(reply), TurnKind::Returned)
            }
            GateOutcome::Proceed => {
                let (text, kind) = self
                    .generate_turn_reply(
                        user_id,
                        &mut personality,
                        &context,
                        &analysis.topics,
                        emotion,
                        None,
                        &history,
                        message,
                        now,
                    )
                    .await;
                let reply = self.with_rng(|rng| self.post.process(&text, rng));
                (Some(reply), kind)
            }
        };

        let turn = ConversationTurn::new(
            user_id,
            message,
            reply.clone().unwrap_or_default(),
            emotion,
            personality.mood,
            now,
        )
        .with_context(turn_context(kind, &analysis.topics, &context, &profile, &personality));
        self.persist(&profile, &personality, &turn, context.local_date)
            .await;

        info!(
            user_id,
            kind = kind.as_str(),
            emotion = %emotion,
            mood = %personality.mood,
            intimacy = personality.intimacy,
            stage = %profile.relationship_stage,
            "turn handled"
        );

        Ok(TurnOutcome {
            reply,
            kind,
            emotion,
            topics: analysis.topics,
            mood: personality.mood,
            intimacy: personality.intimacy,
            relationship_stage: profile.relationship_stage,
        })
    }

    /// Move mood and intimacy, then generate with the in-character fallback
    #[allow(clippy::too_many_arguments)]
    async fn generate_turn_reply(
        &self,
        user_id: &str,
        personality: &mut PersonalityState,
        context: &ContextBundle,
        topics: &[Topic],
        emotion: Emotion,
        availability_note: Option<&str>,
        history: &[ConversationTurn],
        message: &str,
        now: DateTime<Utc>,
    ) -> (String, TurnKind) {
        let mood = self.with_rng(|rng| next_mood(personality.mood, emotion, rng));
        personality.set_mood(mood, now);
        personality.intimacy = next_intimacy(personality.intimacy, message, emotion);

        let prompt = self.prompts.render_reply(ReplyPrompt {
            persona: &self.persona,
            context,
            emotion,
            topics,
            mood,
            intimacy: personality.intimacy,
            availability_note,
            history,
            message,
        });

        match self.generate(prompt).await {
            Ok(text) => (text, TurnKind::Reply),
            Err(e) => {
                warn!(user_id, error = %e, mood = %mood, "generation failed, using fallback line");
                (
                    self.with_rng(|rng| fallback_line(mood, rng)),
                    TurnKind::Fallback,
                )
            }
        }
    }

    async fn generate(&self, prompt: Result<String>) -> Result<String> {
        let prompt = prompt?;
        debug!(chars = prompt.chars().count(), "prompt assembled");
        generate_reply(
            self.generator.as_ref(),
            &prompt,
            &self.persona.name,
            &self.retry,
        )
        .await
    }

    /// Text the user first if they've been quiet long enough.
    ///
    /// Returns `None` when the persona decides not to reach out.
    pub async fn proactive_message(&self, user_id: &str) -> Result<Option<String>> {
        if user_id.trim().is_empty() {
            return Err(SakhiError::validation("user id must not be empty"));
        }

        let now = self.clock.now();
        let profile = degrade(self.store.get_profile(user_id).await, "get_profile", user_id);
        let window = degrade(
            self.store.get_availability(user_id).await,
            "get_availability",
            user_id,
        );

        let reach_out = self.with_rng(|rng| {
            should_reach_out(
                profile.as_ref(),
                window.as_ref(),
                self.config.proactive_idle_hours,
                now,
                rng,
            )
        });
        let Some(mut profile) = profile.filter(|_| reach_out) else {
            debug!(user_id, "no proactive message");
            return Ok(None);
        };

        let personality = match degrade(
            self.store.get_personality(user_id).await,
            "get_personality",
            user_id,
        ) {
            Some(state) => state.normalized(),
            None => self.with_rng(|rng| PersonalityState::new(user_id, initial_mood(rng), now)),
        };
        let history = degrade(
            self.store
                .recent_turns(user_id, self.config.history_window)
                .await
                .map(Some),
            "recent_turns",
            user_id,
        )
        .unwrap_or_default();

        let context = derive_context(now, self.config.timezone(), Some(&profile));
        let prompt = self.prompts.render_proactive(ProactivePrompt {
            persona: &self.persona,
            context: &context,
            mood: personality.mood,
            history: &history,
        });

        let text = match self.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(user_id, error = %e, "proactive generation failed, using fallback opener");
                self.with_rng(fallback_opener)
            }
        };
        let reply = self.with_rng(|rng| self.post.process(&text, rng));

        profile.last_interaction = now;
        let turn = ConversationTurn::new(
            user_id,
            "",
            reply.clone(),
            Emotion::Neutral,
            personality.mood,
            now,
        )
        .with_context(turn_context(
            TurnKind::Proactive,
            &[],
            &context,
            &profile,
            &personality,
        ));
        self.persist(&profile, &personality, &turn, context.local_date)
            .await;

        info!(user_id, hours_idle = context.hours_since_last, "proactive message sent");
        Ok(Some(reply))
    }

    /// Delete everything stored about a user
    pub async fn forget_user(&self, user_id: &str) -> Result<()> {
        self.store.delete_user(user_id).await?;
        info!(user_id, "user forgotten");
        Ok(())
    }

    async fn persist(
        &self,
        profile: &UserProfile,
        personality: &PersonalityState,
        turn: &ConversationTurn,
        local_date: NaiveDate,
    ) {
        let user_id = profile.user_id.as_str();
        log_write(self.store.upsert_profile(profile).await, "upsert_profile", user_id);
        log_write(
            self.store.upsert_personality(personality).await,
            "upsert_personality",
            user_id,
        );
        log_write(self.store.insert_turn(turn).await, "insert_turn", user_id);
        match self
            .store
            .record_daily_interaction(user_id, local_date)
            .await
        {
            Ok(daily) => debug!(user_id, date = %daily.date, turns = daily.turn_count, "daily interaction recorded"),
            Err(e) => warn!(user_id, op = "record_daily_interaction", error = %e, "store write dropped"),
        }
    }
}

/// Read that falls back to `None` when the store fails
fn degrade<T>(result: Result<Option<T>>, op: &'static str, user_id: &str) -> Option<T> {
    result.unwrap_or_else(|e| {
        warn!(user_id, op, error = %e, "store read failed, continuing with defaults");
        None
    })
}

fn log_write(result: Result<()>, op: &'static str, user_id: &str) {
    if let Err(e) = result {
        warn!(user_id, op, error = %e, "store write dropped");
    }
}

fn turn_context(
    kind: TurnKind,
    topics: &[Topic],
    context: &ContextBundle,
    profile: &UserProfile,
    personality: &PersonalityState,
) -> serde_json::Value {
    json!({
        "kind": kind,
        "topics": topics,
        "time_of_day": context.time_of_day,
        "cycle_phase": context.cycle_phase,
        "season": context.season,
        "festival": context.festival_today,
        "relationship_stage": profile.relationship_stage,
        "intimacy": personality.intimacy,
    })
}
