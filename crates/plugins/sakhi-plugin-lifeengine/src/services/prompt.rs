//! Prompt Assembler
//!
//! Renders the reply and proactive prompts with handlebars. History is
//! passed through verbatim (no escaping) and only clipped from the front
//! when it exceeds its character budget.

use crate::types::{ContextBundle, Persona};
use sakhi_core::utils::{clip_chars, clip_tail_chars};
use sakhi_core::{ConversationTurn, Emotion, Mood, Result, TemplateEngine, Topic};
use serde_json::json;

const REPLY_TEMPLATE_NAME: &str = "reply";
const PROACTIVE_TEMPLATE_NAME: &str = "proactive";

/// Placeholder when there is no history yet
pub const NO_HISTORY: &str = "No prior chat history.";

const REPLY_TEMPLATE: &str = r#"{{persona}}

Today your mood is: **{{mood_description}}**.
{{stage_tone}}
{{#if display_name}}His name is {{display_name}}.
{{/if}}Intimacy level with him: {{intimacy}}/10.

Right now:
{{#each context_notes}}- {{this}}
{{/each}}
{{#if availability_note}}{{availability_note}}
{{/if}}
He seems {{emotion}}{{#if topics}} and is talking about {{join topics ", "}}{{/if}}.

Reply naturally like a real person texting: one in-character reply, 2-4 short lines, Hinglish is fine. Never list options. Never mention that you are an AI.

Here's your recent chat history:
{{history}}

Now respond to this:
You: {{message}}
Her:"#;

const PROACTIVE_TEMPLATE: &str = r#"{{persona}}

Today your mood is: **{{mood_description}}**.
{{stage_tone}}
{{#if display_name}}His name is {{display_name}}.
{{/if}}He hasn't texted you in {{hours_idle}} hours.

Right now:
{{#each context_notes}}- {{this}}
{{/each}}
Here's your recent chat history:
{{history}}

Text him first. One short, casual, in-character message, the kind you'd send out of nowhere.
Her:"#;

/// Budgets applied while assembling prompts
#[derive(Debug, Clone, Copy)]
pub struct PromptBudgets {
    /// Max chars of rendered history
    pub history_chars: usize,
    /// Max chars of the current message
    pub message_chars: usize,
}

/// Inputs for a reply prompt
#[derive(Debug, Clone, Copy)]
pub struct ReplyPrompt<'a> {
    /// Persona
    pub persona: &'a Persona,
    /// Turn context
    pub context: &'a ContextBundle,
    /// User emotion
    pub emotion: Emotion,
    /// Topics mentioned
    pub topics: &'a [Topic],
    /// Persona mood after the transition
    pub mood: Mood,
    /// Intimacy after the transition
    pub intimacy: u8,
    /// Extra note when returning from unavailability
    pub availability_note: Option<&'a str>,
    /// Recent turns, oldest first
    pub history: &'a [ConversationTurn],
    /// Current user message
    pub message: &'a str,
}

/// Inputs for a proactive prompt
#[derive(Debug, Clone, Copy)]
pub struct ProactivePrompt<'a> {
    /// Persona
    pub persona: &'a Persona,
    /// Turn context
    pub context: &'a ContextBundle,
    /// Persona mood
    pub mood: Mood,
    /// Recent turns, oldest first
    pub history: &'a [ConversationTurn],
}

/// Owns the registered prompt templates
pub struct PromptAssembler {
    templates: TemplateEngine,
    budgets: PromptBudgets,
}

impl PromptAssembler {
    /// Register the built-in templates
    pub fn new(budgets: PromptBudgets) -> Result<Self> {
        let mut templates = TemplateEngine::new();
        templates.register_template(REPLY_TEMPLATE_NAME, REPLY_TEMPLATE)?;
        templates.register_template(PROACTIVE_TEMPLATE_NAME, PROACTIVE_TEMPLATE)?;
        Ok(Self { templates, budgets })
    }

    /// Budgets in effect
    pub fn budgets(&self) -> PromptBudgets {
        self.budgets
    }

    /// Render the prompt for a reply
    pub fn render_reply(&self, input: ReplyPrompt<'_>) -> Result<String> {
        let topics: Vec<&str> = input.topics.iter().map(Topic::as_str).collect();

        let data = json!({
            "persona": input.persona.description(),
            "mood_description": input.mood.description(),
            "stage_tone": input.context.relationship_stage.tone(),
            "display_name": input.context.display_name,
            "intimacy": input.intimacy,
            "context_notes": input.context.notes(),
            "availability_note": input.availability_note,
            "emotion": input.emotion.as_str(),
            "topics": topics,
            "history": format_history(input.history, self.budgets.history_chars),
            "message": clip_chars(input.message, self.budgets.message_chars),
        });

        self.templates.render_named(REPLY_TEMPLATE_NAME, &data)
    }

    /// Render the prompt for a proactive message
    pub fn render_proactive(&self, input: ProactivePrompt<'_>) -> Result<String> {
        let data = json!({
            "persona": input.persona.description(),
            "mood_description": input.mood.description(),
            "stage_tone": input.context.relationship_stage.tone(),
            "display_name": input.context.display_name,
            "hours_idle": input.context.hours_since_last,
            "context_notes": input.context.notes(),
            "history": format_history(input.history, self.budgets.history_chars),
        });

        self.templates.render_named(PROACTIVE_TEMPLATE_NAME, &data)
    }
}

/// Render turns as `You:` / `Her:` lines, keeping the newest `budget` chars
pub fn format_history(turns: &[ConversationTurn], budget: usize) -> String {
    let mut lines = Vec::with_capacity(turns.len() * 2);
    for turn in turns {
        if !turn.user_message.is_empty() {
            lines.push(format!("You: {}", turn.user_message));
        }
        if !turn.reply.is_empty() {
            lines.push(format!("Her: {}", turn.reply));
        }
    }

    if lines.is_empty() {
        return NO_HISTORY.to_string();
    }
    clip_tail_chars(&lines.join("\n"), budget).to_string()
}
