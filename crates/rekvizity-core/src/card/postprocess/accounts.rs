//! Settlement / correspondent account recovery and disambiguation.

use tracing::debug;

use crate::card::rules::clean::clean_value;
use crate::card::rules::patterns::{scan, Matcher, CORRESPONDENT_RECOVERY, SETTLEMENT_RECOVERY};
use crate::card::rules::validate::validate_value;
use crate::models::company::{ExtractedCompanyData, ExtractedField, FieldSource, FieldType};

const SETTLEMENT_PREFIX: &str = "40";
const CORRESPONDENT_PREFIX: &str = "30";

const RECOVERED_SETTLEMENT_CONFIDENCE: u8 = 75;
const RECOVERED_CORRESPONDENT_CONFIDENCE: u8 = 85;
const FALLBACK_CORRESPONDENT_CONFIDENCE: u8 = 70;

/// Fill missing accounts from unlabeled 20-digit numbers.
pub fn recover_accounts(data: &mut ExtractedCompanyData, text: &str) {
    recover_settlement(data, text);
    recover_correspondent(data, text);
}

fn recover_settlement(data: &mut ExtractedCompanyData, text: &str) {
    if data.is_present(FieldType::BankAccount) {
        return;
    }

    let correspondent = data.value(FieldType::CorrAccount).map(str::to_string);
    let found = candidates(&SETTLEMENT_RECOVERY, FieldType::BankAccount, text)
        .into_iter()
        .find(|c| c.starts_with(SETTLEMENT_PREFIX) && Some(c) != correspondent.as_ref());

    if let Some(value) = found {
        debug!("recovered settlement account {}", value);
        data.set(
            FieldType::BankAccount,
            Some(ExtractedField::new(
                value,
                RECOVERED_SETTLEMENT_CONFIDENCE,
                FieldSource::Reconstructed,
            )),
        );
    }
}

fn recover_correspondent(data: &mut ExtractedCompanyData, text: &str) {
    if data.is_present(FieldType::CorrAccount) {
        return;
    }

    let settlement = data.value(FieldType::BankAccount).map(str::to_string);
    let all: Vec<String> = candidates(&CORRESPONDENT_RECOVERY, FieldType::CorrAccount, text)
        .into_iter()
        .filter(|c| Some(c) != settlement.as_ref())
        .collect();

    let found = all
        .iter()
        .find(|c| c.starts_with(CORRESPONDENT_PREFIX))
        .map(|c| (c.clone(), RECOVERED_CORRESPONDENT_CONFIDENCE))
        .or_else(|| {
            all.iter()
                .find(|c| !c.starts_with(SETTLEMENT_PREFIX))
                .map(|c| (c.clone(), FALLBACK_CORRESPONDENT_CONFIDENCE))
        });

    if let Some((value, confidence)) = found {
        debug!("recovered correspondent account {} ({})", value, confidence);
        data.set(
            FieldType::CorrAccount,
            Some(ExtractedField::new(value, confidence, FieldSource::Reconstructed)),
        );
    }
}

/// Distinct valid candidates from every matcher, in matcher order.
fn candidates(matchers: &[Matcher], field: FieldType, text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for matcher in matchers {
        for caps in scan(&matcher.regex, text) {
            let Some(raw) = caps.get(1) else {
                continue;
            };
            let value = clean_value(raw.as_str(), field);
            if validate_value(&value, field, text) && !found.contains(&value) {
                found.push(value);
            }
        }
    }
    found
}

/// A single number cannot be both accounts. Keep it on the field its prefix
/// belongs to, otherwise on the more confident one.
pub fn enforce_distinct_accounts(data: &mut ExtractedCompanyData) {
    let (Some(settlement), Some(correspondent)) =
        (data.get(FieldType::BankAccount), data.get(FieldType::CorrAccount))
    else {
        return;
    };
    if settlement.value != correspondent.value {
        return;
    }

    let value = settlement.value.clone();
    let dropped = if value.starts_with(SETTLEMENT_PREFIX) {
        FieldType::CorrAccount
    } else if value.starts_with(CORRESPONDENT_PREFIX) {
        FieldType::BankAccount
    } else if settlement.confidence >= correspondent.confidence {
        FieldType::CorrAccount
    } else {
        FieldType::BankAccount
    };

    debug!("account {} claimed by both fields, dropping {}", value, dropped);
    data.take(dropped);
}
