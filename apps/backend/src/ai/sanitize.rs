use crate::domain::rules::MAX_CHAT_LEN;

const QUOTES: [char; 2] = ['"', '\''];

/// Normalise provider chat text: trim, drop one surrounding quote on each
/// side, cap at the chat limit. Empty results become `None`.
pub fn clean_chat(raw: &str) -> Option<String> {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(QUOTES) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix(QUOTES) {
        text = rest;
    }
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_CHAT_LEN).collect())
}
