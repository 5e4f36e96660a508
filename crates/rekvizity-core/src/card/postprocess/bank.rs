//! Bank name cleanup and BIK recovery.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::card::rules::clean::clean_value;
use crate::card::rules::patterns::{scan, BIK_RECOVERY};
use crate::card::rules::validate::validate_value;
use crate::models::company::{ExtractedCompanyData, ExtractedField, FieldSource, FieldType};

lazy_static! {
    static ref BANK_NAME_NOISE: Regex = Regex::new(r"(?i)наименование\s+банка|бик\s+банка").unwrap();
    static ref LEADING_IN: Regex = Regex::new(r"^(?i:в)\s+").unwrap();
}

/// Values too generic to identify a bank on their own.
const GENERIC_NAMES: &[&str] = &["АО", "ПАО", "ООО", "банка"];

/// Confidence assigned to a BIK found during recovery.
const RECOVERED_BIK_CONFIDENCE: u8 = 80;

const CLEANUP_BONUS: u8 = 10;
const CLEANUP_CEILING: u8 = 95;

/// Bank behind a well-known BIK.
pub fn bank_by_bik(bik: &str) -> Option<&'static str> {
    match bik {
        "044525593" => Some("АЛЬФА-БАНК"),
        "044525225" => Some("ПАО Сбербанк"),
        "044525187" => Some("Банк ВТБ (ПАО)"),
        "044525974" => Some("АО «ТБанк»"),
        _ => None,
    }
}

/// Strip label residue from the bank name and resolve generic values
/// through the BIK.
pub fn clean_bank_name(data: &mut ExtractedCompanyData) {
    let bik = data.value(FieldType::BankBik).map(str::to_string);
    let Some(field) = data.get_mut(FieldType::BankName) else {
        return;
    };

    let original = field.value.clone();
    let mut name = tidy(&original);
    let mut source = field.source;

    if name.chars().count() < 3 || GENERIC_NAMES.contains(&name.as_str()) {
        if let Some(known) = bik.as_deref().and_then(bank_by_bik) {
            debug!("bank name {:?} resolved through BIK to {:?}", name, known);
            name = known.to_string();
            source = FieldSource::Reconstructed;
        }
    }

    if name.chars().count() < 3 {
        name = original.clone();
    }

    let name = standardize(&name);
    if name != original {
        field.value = name;
        field.source = source;
        field.bump_confidence(CLEANUP_BONUS, CLEANUP_CEILING);
    }
}

fn tidy(name: &str) -> String {
    let stripped = BANK_NAME_NOISE.replace_all(name, " ");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let name = LEADING_IN.replace(&collapsed, "");
    trim_unpaired_quotes(name.trim()).to_string()
}

/// Drop a guillemet or straight quote left over at either end without its pair.
fn trim_unpaired_quotes(name: &str) -> &str {
    let mut name = name;
    let opening = name.matches('«').count();
    let closing = name.matches('»').count();

    if closing > opening {
        name = name.trim_end_matches('»').trim_end();
    } else if opening > closing {
        name = name.trim_start_matches('«').trim_start();
    }
    if name.matches('"').count() % 2 == 1 {
        name = name.trim_matches('"').trim();
    }
    name
}

/// Canonical spelling for banks that appear under many names.
fn standardize(name: &str) -> String {
    if name.contains("Сбербанк") || name.contains("СБЕРБАНК") {
        "ПАО Сбербанк".to_string()
    } else if name.contains("АЛЬФА") || name.contains("Альфа") {
        "АЛЬФА-БАНК".to_string()
    } else {
        name.to_string()
    }
}

/// Look for a BIK the field patterns missed, including 9-digit numbers
/// near a bank name.
pub fn recover_bik(data: &mut ExtractedCompanyData, text: &str) {
    if data.is_present(FieldType::BankBik) {
        return;
    }

    for matcher in BIK_RECOVERY.iter() {
        for caps in scan(&matcher.regex, text) {
            let Some(raw) = caps.get(1) else {
                continue;
            };
            let value = clean_value(raw.as_str(), FieldType::BankBik);
            if validate_value(&value, FieldType::BankBik, text) {
                debug!("recovered BIK {} via {}", value, matcher.name);
                data.set(
                    FieldType::BankBik,
                    Some(ExtractedField::new(value, RECOVERED_BIK_CONFIDENCE, FieldSource::Secondary)),
                );
                return;
            }
        }
    }
}
