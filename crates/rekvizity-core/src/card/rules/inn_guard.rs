//! Guard against INN candidates that are really the head of an OGRN.
//!
//! OCR output often loses the separator between an INN and the OGRN that
//! follows it, and the 10-digit INN patterns then happily match the first ten
//! digits of a 13/15-digit registration number.

use regex::Regex;
use tracing::trace;

use super::patterns::{DATE_MARKERS, OGRN_KEYWORDS, OGRN_LIKE_NUMBER};

/// Characters of context inspected on each side of an OGRN-like number.
const CONTEXT_CHARS: usize = 30;

/// Whether `candidate` is the leading part of an OGRN rather than an INN.
pub fn is_ogrn_fragment(candidate: &str, text: &str) -> bool {
    if appears_as_inn(candidate, text) {
        return false;
    }

    for number in OGRN_LIKE_NUMBER.find_iter(text) {
        if !number.as_str().contains(candidate) {
            continue;
        }

        let before = chars_before(text, number.start(), CONTEXT_CHARS);
        let after = chars_after(text, number.end(), CONTEXT_CHARS);

        if OGRN_KEYWORDS.is_match(before) || OGRN_KEYWORDS.is_match(after) {
            trace!("INN candidate {} sits inside OGRN {}", candidate, number.as_str());
            return true;
        }
        if DATE_MARKERS.is_match(after) {
            trace!("INN candidate {} sits inside dated number {}", candidate, number.as_str());
            return true;
        }
    }

    false
}

/// Whether the text shows `candidate` in an unambiguous INN position.
fn appears_as_inn(candidate: &str, text: &str) -> bool {
    let inn = regex::escape(candidate);
    let layouts = [
        format!(r"(?i:инн)[:\s]+{}(?:\s|$)", inn),
        format!(r"{}\s*[/\\]\s*\d{{9}}", inn),
        format!(r"{}\s+\d{{9}}(?:\s|$)", inn),
        format!(r"(?i:инн\s*[/\\]\s*кпп)[:\s]*{}\s*[/\\]\s*\d{{9}}", inn),
    ];

    layouts.iter().any(|pattern| {
        Regex::new(pattern)
            .map(|re| re.is_match(text))
            .unwrap_or(false)
    })
}

/// Up to `n` characters ending at byte offset `end`.
fn chars_before(text: &str, end: usize, n: usize) -> &str {
    let head = &text[..end];
    let start = head
        .char_indices()
        .rev()
        .nth(n.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    &head[start..]
}

/// Up to `n` characters starting at byte offset `start`.
fn chars_after(text: &str, start: usize, n: usize) -> &str {
    let tail = &text[start..];
    let end = tail
        .char_indices()
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(tail.len());
    &tail[..end]
}
