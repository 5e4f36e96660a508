//! Upgrade of short, weak company names from the card header.

use tracing::debug;

use crate::card::rules::clean::clean_value;
use crate::card::rules::patterns::in_bank_context;
use crate::card::rules::validate::valid_company_name;
use crate::models::company::{ExtractedCompanyData, FieldSource, FieldType, MAX_CONFIDENCE};

/// Names shorter than this are upgrade candidates.
const SHORT_NAME_CHARS: usize = 10;
/// Names at or above this confidence are left alone.
const WEAK_CONFIDENCE: u8 = 80;
/// Only the card header is searched.
const HEADER_LINES: usize = 10;
const MAX_LINE_CHARS: usize = 100;
const UPGRADE_BONUS: u8 = 10;

const IDENTIFIER_LABELS: &[&str] = &["ИНН", "КПП", "ОГРН"];

/// Replace a short low-confidence company name with a longer header line.
pub fn upgrade_company_name(data: &mut ExtractedCompanyData, text: &str) {
    let Some(field) = data.get_mut(FieldType::CompanyName) else {
        return;
    };

    let current_len = field.value.chars().count();
    if current_len >= SHORT_NAME_CHARS || field.confidence >= WEAK_CONFIDENCE {
        return;
    }

    let mut line_start = 0;
    for raw in text.split_inclusive('\n').take(HEADER_LINES) {
        let offset = line_start + (raw.len() - raw.trim_start().len());
        line_start += raw.len();

        let line = raw.trim();
        let len = line.chars().count();
        if len <= current_len + 5 || len >= MAX_LINE_CHARS {
            continue;
        }

        let starts_capital = line
            .chars()
            .next()
            .is_some_and(|c| matches!(c, 'А'..='Я' | 'Ё'));
        if !starts_capital {
            continue;
        }

        let upper = line.to_uppercase();
        if IDENTIFIER_LABELS.iter().any(|l| upper.contains(l)) {
            continue;
        }

        let candidate = clean_value(line, FieldType::CompanyName);
        if !valid_company_name(&candidate) || in_bank_context(text, offset) {
            continue;
        }

        debug!("company name {:?} upgraded to {:?}", field.value, candidate);
        field.value = candidate;
        field.bump_confidence(UPGRADE_BONUS, MAX_CONFIDENCE);
        field.source = FieldSource::Reconstructed;
        return;
    }
}
