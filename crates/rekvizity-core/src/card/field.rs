//! Single-field extraction: try matchers in order, clean, validate, score.

use regex::Captures;
use tracing::{debug, trace};

use crate::models::company::{ExtractedField, FieldSource, FieldType, MAX_CONFIDENCE};

use super::rules::clean::clean_value;
use super::rules::patterns::{field_label, in_bank_context, neighbour_labels, scan, Matcher};
use super::rules::validate::validate_value;

/// Confidence of a match from the first matcher, before context bonuses.
const TOP_CONFIDENCE: u32 = 95;

/// Confidence lost between the first and the last matcher of a list.
const RANK_SPREAD: u32 = 20;

/// Characters after a match searched for neighbouring labels.
const NEIGHBOUR_WINDOW: usize = 60;

const LABEL_BONUS: u8 = 3;
const SEPARATOR_BONUS: u8 = 2;
const NEIGHBOUR_BONUS: u8 = 2;

/// Extract one field from `text` using `matchers`, most reliable first.
///
/// Every match of every matcher is cleaned and validated in order; the first
/// valid candidate wins. Candidates that fail validation are kept as
/// alternatives on the winner, or only logged when nothing is accepted.
pub fn extract_field(text: &str, field: FieldType, matchers: &[Matcher]) -> Option<ExtractedField> {
    let mut alternatives: Vec<String> = Vec::new();

    for (rank, matcher) in matchers.iter().enumerate() {
        for caps in scan(&matcher.regex, text) {
            let raw = raw_value(&caps, field);
            if raw.is_empty() {
                continue;
            }

            let value = clean_value(&raw, field);
            if !validate_value(&value, field, text) || names_bank(&caps, text, field) {
                trace!("{}: rejected {:?} from {}", field, value, matcher.name);
                if !value.is_empty() && !alternatives.contains(&value) {
                    alternatives.push(value);
                }
                continue;
            }

            let confidence = rank_confidence(rank, matchers.len())
                .saturating_add(context_bonus(&caps, text, field))
                .min(MAX_CONFIDENCE);
            let source = rank_source(rank, matchers.len());

            debug!(
                "{}: {:?} via {} (confidence {}, {:?})",
                field, value, matcher.name, confidence, source
            );

            alternatives.retain(|a| a != &value);
            return Some(ExtractedField::new(value, confidence, source).with_alternatives(alternatives));
        }
    }

    if !alternatives.is_empty() {
        debug!("{}: no valid candidate, rejected {:?}", field, alternatives);
    }
    None
}

/// Raw value of a match: the value group, both halves for split names, or the
/// whole match for patterns without groups.
fn raw_value(caps: &Captures<'_>, field: FieldType) -> String {
    if field == FieldType::CompanyName {
        let groups: Vec<&str> = caps
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .collect();
        if groups.len() > 1 {
            return groups.join(" ");
        }
    }

    caps.get(1)
        .or_else(|| caps.get(0))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Company and legal names found in the bank section name the bank.
fn names_bank(caps: &Captures<'_>, text: &str, field: FieldType) -> bool {
    if !matches!(field, FieldType::CompanyName | FieldType::LegalName) {
        return false;
    }
    caps.get(1)
        .or_else(|| caps.get(0))
        .is_some_and(|m| in_bank_context(text, m.start()))
}

/// Base confidence for a matcher at `rank` in a list of `total`.
pub fn rank_confidence(rank: usize, total: usize) -> u8 {
    let total = total.max(1) as u32;
    let drop = RANK_SPREAD * rank as u32 / total;
    TOP_CONFIDENCE.saturating_sub(drop) as u8
}

/// Provenance by rank: first third primary, second third secondary, rest
/// reconstructed.
pub fn rank_source(rank: usize, total: usize) -> FieldSource {
    let total = total.max(1);
    if rank * 3 < total {
        FieldSource::Primary
    } else if rank * 3 < total * 2 {
        FieldSource::Secondary
    } else {
        FieldSource::Reconstructed
    }
}

/// Bonus for label keywords, explicit separators and neighbouring labels.
fn context_bonus(caps: &Captures<'_>, text: &str, field: FieldType) -> u8 {
    let Some(whole) = caps.get(0) else {
        return 0;
    };
    let matched = whole.as_str();
    let mut bonus = 0;

    if field_label(field).is_match(matched) {
        bonus += LABEL_BONUS;
    }
    if matched.contains(':') || matched.contains('–') || matched.contains('—') {
        bonus += SEPARATOR_BONUS;
    }

    let tail = &text[whole.end()..];
    let window_end = tail
        .char_indices()
        .nth(NEIGHBOUR_WINDOW)
        .map(|(i, _)| i)
        .unwrap_or(tail.len());
    let window = &tail[..window_end];

    if neighbour_labels(field)
        .iter()
        .any(|label| label.is_match(matched) || label.is_match(window))
    {
        bonus += NEIGHBOUR_BONUS;
    }

    bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::rules::patterns::patterns_for;
    use pretty_assertions::assert_eq;

    fn extract(text: &str, field: FieldType) -> Option<ExtractedField> {
        extract_field(text, field, patterns_for(field))
    }

    #[test]
    fn test_rank_confidence_decreases() {
        assert_eq!(rank_confidence(0, 8), 95);
        assert!(rank_confidence(7, 8) < rank_confidence(3, 8));
        assert!(rank_confidence(7, 8) >= 75);
        assert_eq!(rank_confidence(0, 0), 95);
    }

    #[test]
    fn test_rank_source_thirds() {
        assert_eq!(rank_source(0, 6), FieldSource::Primary);
        assert_eq!(rank_source(1, 6), FieldSource::Primary);
        assert_eq!(rank_source(2, 6), FieldSource::Secondary);
        assert_eq!(rank_source(4, 6), FieldSource::Reconstructed);
    }

    #[test]
    fn test_labeled_inn() {
        let field = extract("ИНН: 7701234567\nКПП: 770101001", FieldType::Inn).unwrap();
        assert_eq!(field.value, "7701234567");
        assert_eq!(field.source, FieldSource::Primary);
        assert!(field.confidence >= 95);
    }

    #[test]
    fn test_invalid_candidates_become_alternatives() {
        let text = "Карточка предприятия \"Ромашка\"\nООО \"ПАРТНЕР\"";
        let field = extract(text, FieldType::CompanyName).unwrap();
        assert_eq!(field.value, "ПАРТНЕР");

        assert_eq!(extract("Карточка предприятия \"Ромашка\"", FieldType::CompanyName), None);
    }

    #[test]
    fn test_split_quoted_name_is_joined() {
        let text = "\"ТРУБНЫЙ\nПОТОК\"";
        let field = extract(text, FieldType::CompanyName).unwrap();
        assert_eq!(field.value, "ТРУБНЫЙ ПОТОК");
    }

    #[test]
    fn test_bank_word_inside_company_name() {
        let field = extract("ООО \"Банкет Сервис\"\nИНН 7701234567", FieldType::CompanyName).unwrap();
        assert_eq!(field.value, "Банкет Сервис");

        let field = extract("ПАО \"Сбербанк\"\nИНН 7707083893", FieldType::LegalName).unwrap();
        assert_eq!(field.value, "ПАО \"Сбербанк\"");
    }

    #[test]
    fn test_bank_section_name_is_not_company() {
        let text = "Наименование банка: ООО \"ОЗОН Банк\"\nООО \"ПАРТНЕР\"";
        let field = extract(text, FieldType::CompanyName).unwrap();
        assert_eq!(field.value, "ПАРТНЕР");
        assert_eq!(field.alternatives, vec!["ОЗОН Банк".to_string()]);

        assert_eq!(extract("Банк: АО \"АЛЬФА-БАНК\"", FieldType::CompanyName), None);
    }

    #[test]
    fn test_absent_field() {
        assert_eq!(extract("", FieldType::Email), None);
        assert_eq!(extract("нет почты", FieldType::Email), None);
    }

    #[test]
    fn test_confidence_is_bounded() {
        let text = "ИНН/КПП: 7701234567/770101001 ОГРН: 1027700132195";
        for field in FieldType::ALL {
            if let Some(f) = extract(text, field) {
                assert!(f.confidence <= 99, "{} over cap", field);
            }
        }
    }
}
