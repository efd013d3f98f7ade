//! Reply post-processing
//!
//! Runs in a fixed order: occasional typo (with an optional `*word`
//! self-correction), occasional thinking filler, then the emoji cap. The cap
//! always runs last so no reply ever exceeds the configured emoji count.

use sakhi_core::random::{pick, RandomSource};
use unicode_segmentation::UnicodeSegmentation;

/// Chance of introducing one typo
pub const TYPO_PROBABILITY: f64 = 0.08;

/// Chance that a typo is followed by a `*word` correction
pub const CORRECTION_PROBABILITY: f64 = 0.5;

/// Chance of prepending a thinking filler
pub const FILLER_PROBABILITY: f64 = 0.10;

/// Common words and the way they get fat-fingered
const TYPOS: &[(&str, &str)] = &[
    ("the", "teh"),
    ("what", "waht"),
    ("because", "becuase"),
    ("really", "realy"),
    ("just", "jsut"),
    ("about", "abotu"),
    ("with", "wiht"),
    ("think", "thnik"),
    ("going", "goign"),
    ("know", "konw"),
    ("you", "yuo"),
];

/// Openers a person types while thinking
const FILLERS: &[&str] = &["hmm", "umm", "acha", "wait", "ohh"];

const PRESENTATION_SELECTOR: char = '\u{FE0F}';

/// Whether `c` is a pictograph that renders as emoji on its own
pub fn is_emoji(c: char) -> bool {
    if is_emoji_modifier(c) {
        return false;
    }
    matches!(
        c as u32,
        0x1F000..=0x1F02F
            | 0x1F0A0..=0x1F0FF
            | 0x1F100..=0x1F1FF
            | 0x1F300..=0x1F5FF
            | 0x1F600..=0x1F64F
            | 0x1F680..=0x1F6FF
            | 0x1F700..=0x1F77F
            | 0x1F780..=0x1F7FF
            | 0x1F900..=0x1F9FF
            | 0x1FA00..=0x1FAFF
            | 0x2600..=0x26FF
            | 0x2700..=0x27BF
            | 0x2B00..=0x2BFF
            | 0x231A..=0x231B
            | 0x23E9..=0x23FA
    )
}

/// Skin tones, keycap and tag characters
fn is_emoji_modifier(c: char) -> bool {
    matches!(
        c as u32,
        0xFE0E | 0xFE0F | 0x1F3FB..=0x1F3FF | 0x20E3 | 0xE0020..=0xE007F
    )
}

/// Symbols that become emoji when followed by U+FE0F (‼️, ▶️, ™️, 1️⃣, ...)
fn takes_presentation_selector(c: char) -> bool {
    matches!(c, '0'..='9' | '#' | '*')
        || (!c.is_ascii() && !c.is_alphanumeric() && !c.is_whitespace())
}

/// Whether a grapheme cluster displays as a single emoji.
///
/// ZWJ sequences, skin tones and flag pairs are one cluster each.
fn is_emoji_cluster(cluster: &str) -> bool {
    let Some(first) = cluster.chars().next() else {
        return false;
    };
    is_emoji(first)
        || (takes_presentation_selector(first) && cluster.contains(PRESENTATION_SELECTOR))
}

/// Number of emoji in `text`
pub fn count_emojis(text: &str) -> usize {
    text.graphemes(true)
        .filter(|cluster| is_emoji_cluster(cluster))
        .count()
}

/// Keep the first `max` emoji and drop the rest whole
pub fn cap_emojis(text: &str, max: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut kept = 0;
    let mut dropped_any = false;

    for cluster in text.graphemes(true) {
        if is_emoji_cluster(cluster) {
            if kept < max {
                kept += 1;
            } else {
                dropped_any = true;
                continue;
            }
        }
        out.push_str(cluster);
    }

    if dropped_any {
        collapse_spaces(&out)
    } else {
        out
    }
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !previous_space {
                out.push(c);
            }
            previous_space = true;
        } else {
            previous_space = false;
            out.push(c);
        }
    }
    out.trim().to_string()
}

/// Byte ranges of ASCII-letter words in `text`
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_ascii_alphabetic(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// With `TYPO_PROBABILITY`, misspell one common word
pub fn maybe_typo(text: &str, rng: &mut dyn RandomSource) -> String {
    if !rng.chance(TYPO_PROBABILITY) {
        return text.to_string();
    }

    let candidates: Vec<(usize, usize, &str, &str)> = word_spans(text)
        .into_iter()
        .filter_map(|(start, end)| {
            let word = &text[start..end];
            TYPOS
                .iter()
                .find(|(correct, _)| *correct == word)
                .map(|(correct, typo)| (start, end, *correct, *typo))
        })
        .collect();

    let Some(&(start, end, correct, typo)) = pick(rng, &candidates) else {
        return text.to_string();
    };

    let mut out = format!("{}{}{}", &text[..start], typo, &text[end..]);
    if rng.chance(CORRECTION_PROBABILITY) {
        out.push_str("\n*");
        out.push_str(correct);
    }
    out
}

/// With `FILLER_PROBABILITY`, open with a thinking filler
pub fn maybe_filler(text: &str, rng: &mut dyn RandomSource) -> String {
    if !rng.chance(FILLER_PROBABILITY) {
        return text.to_string();
    }
    match pick(rng, FILLERS) {
        Some(filler) => format!("{filler}... {text}"),
        None => text.to_string(),
    }
}

/// Applies the post-processing pipeline to every outbound reply
#[derive(Debug, Clone, Copy)]
pub struct PostProcessor {
    max_emojis: usize,
}

impl PostProcessor {
    /// Create a processor with an emoji cap
    pub fn new(max_emojis: usize) -> Self {
        Self { max_emojis }
    }

    /// Configured cap
    pub fn max_emojis(&self) -> usize {
        self.max_emojis
    }

    /// Full pipeline for generated text
    pub fn process(&self, reply: &str, rng: &mut dyn RandomSource) -> String {
        let text = maybe_typo(reply, rng);
        let text = maybe_filler(&text, rng);
        self.cap(&text)
    }

    /// Emoji cap only, for scripted replies
    pub fn cap(&self, reply: &str) -> String {
        cap_emojis(reply, self.max_emojis)
    }
}
