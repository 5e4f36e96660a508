//! Combined INN/KPP block correction.

use tracing::debug;

use crate::card::rules::clean::clean_value;
use crate::card::rules::patterns::{scan, INN_KPP_BLOCKS};
use crate::card::rules::validate::validate_value;
use crate::models::company::{ExtractedCompanyData, ExtractedField, FieldSource, FieldType};

/// Confidence assigned to values taken from a combined block.
const BLOCK_CONFIDENCE: u8 = 95;

/// Existing values at or above this confidence are kept when they agree.
const TRUSTED_CONFIDENCE: u8 = 85;

/// Prefer INN and KPP from an explicit `INN/KPP` block over separate matches.
///
/// The first block whose halves both validate wins; each field is replaced
/// when it is missing, weak, or disagrees with the block.
pub fn apply_combined_block(data: &mut ExtractedCompanyData, text: &str) {
    for matcher in INN_KPP_BLOCKS.iter() {
        for caps in scan(&matcher.regex, text) {
            let (Some(inn), Some(kpp)) = (caps.get(1), caps.get(2)) else {
                continue;
            };

            let inn = clean_value(inn.as_str(), FieldType::Inn);
            let kpp = clean_value(kpp.as_str(), FieldType::Kpp);
            if !validate_value(&inn, FieldType::Inn, text) || !validate_value(&kpp, FieldType::Kpp, text) {
                continue;
            }

            debug!("INN/KPP block {} / {} via {}", inn, kpp, matcher.name);
            override_field(data, FieldType::Inn, inn);
            override_field(data, FieldType::Kpp, kpp);
            return;
        }
    }
}

fn override_field(data: &mut ExtractedCompanyData, field: FieldType, value: String) {
    let mut alternatives = Vec::new();

    if let Some(existing) = data.get(field) {
        if existing.confidence >= TRUSTED_CONFIDENCE && existing.value == value {
            return;
        }
        alternatives = existing.alternatives.clone();
        if existing.value != value && !alternatives.contains(&existing.value) {
            alternatives.push(existing.value.clone());
        }
    }

    alternatives.retain(|a| a != &value);
    data.set(
        field,
        Some(ExtractedField::new(value, BLOCK_CONFIDENCE, FieldSource::Secondary).with_alternatives(alternatives)),
    );
}
