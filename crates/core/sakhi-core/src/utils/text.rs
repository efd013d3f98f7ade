//! Character-boundary text clipping

/// First `max_chars` characters of `text`
pub fn clip_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Last `max_chars` characters of `text`
pub fn clip_tail_chars(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    match text.char_indices().nth(total - max_chars) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

/// Uppercase the first letter, lowercase the rest
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
