//! Generation policy
//!
//! One attempt plus one immediate retry against the text generator. The
//! caller decides what to send when both fail; the in-character fallback
//! lines live here.

use sakhi_core::random::{pick, RandomSource};
use sakhi_core::{retry_with_backoff, Mood, Result, RetryConfig, SakhiError, TextGenerator};

/// Fallback used when a mood's list is somehow empty
const LAST_RESORT: &str = "network is being so weird rn, text you in a sec";

/// In-character lines for when the model is unreachable
pub fn fallback_lines(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Playful => &[
            "lol my brain just lagged, say that again?",
            "wait wait my phone hung, what were you saying",
        ],
        Mood::Clingy => &[
            "ugh my net died and i panicked, don't go anywhere",
            "sorry phone glitched... you're still here na?",
        ],
        Mood::Sarcastic => &[
            "wow my phone chose violence today. one sec",
            "great, network gone. classic.",
        ],
        Mood::Chatty => &[
            "omg my wifi just died in the middle of typing a whole essay, repeat pls",
            "okay so my phone literally froze, tell me again",
        ],
        Mood::Mysterious => &["hmm. signal's weak here.", "lost you for a second there."],
        Mood::Poetic => &[
            "the network and i aren't on speaking terms right now",
            "words got lost somewhere between us, say it again?",
        ],
        Mood::Chill => &["net's slow, one sec", "hmm my phone's acting up"],
        Mood::Supportive => &[
            "sorry my phone glitched, but i'm here okay? tell me again",
            "my net dropped for a sec, i'm listening, go on",
        ],
    }
}

/// Choose a fallback line for the mood
pub fn fallback_line(mood: Mood, rng: &mut dyn RandomSource) -> String {
    pick(rng, fallback_lines(mood))
        .copied()
        .unwrap_or(LAST_RESORT)
        .to_string()
}

/// Strip the speaker tag models sometimes echo back and surrounding whitespace
pub fn clean_reply(raw: &str, persona_name: &str) -> String {
    let tag = format!("{persona_name}:");
    let mut text = raw.trim();
    for prefix in ["Her:", tag.as_str()] {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest.trim_start();
        }
    }
    text.to_string()
}

/// Call the generator under `retry`; empty replies count as failures
pub async fn generate_reply(
    generator: &dyn TextGenerator,
    prompt: &str,
    persona_name: &str,
    retry: &RetryConfig,
) -> Result<String> {
    retry_with_backoff(retry, move || async move {
        let raw = generator.generate(prompt).await?;
        let reply = clean_reply(&raw, persona_name);
        if reply.is_empty() {
            return Err(SakhiError::model(format!(
                "{} returned an empty reply",
                generator.name()
            )));
        }
        Ok(reply)
    })
    .await
}
