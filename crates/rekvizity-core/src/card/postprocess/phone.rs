//! Phone recovery and display formatting.

use tracing::debug;

use crate::card::rules::clean::{clean_value, digits_only};
use crate::card::rules::patterns::{scan, PHONE_RECOVERY};
use crate::card::rules::validate::validate_value;
use crate::models::company::{ExtractedCompanyData, ExtractedField, FieldSource, FieldType};

const RECOVERED_PHONE_CONFIDENCE: u8 = 85;

/// Look for a phone the field patterns missed. Bare 10-digit numbers
/// (area code without country prefix) are completed with `+7`.
pub fn recover_phone(data: &mut ExtractedCompanyData, text: &str) {
    if data.is_present(FieldType::Phone) {
        return;
    }

    for matcher in PHONE_RECOVERY.iter() {
        for caps in scan(&matcher.regex, text) {
            let Some(raw) = caps.get(1).or_else(|| caps.get(0)) else {
                continue;
            };
            let value = normalize(raw.as_str());
            if validate_value(&value, FieldType::Phone, text) {
                debug!("recovered phone {} via {}", value, matcher.name);
                data.set(
                    FieldType::Phone,
                    Some(ExtractedField::new(value, RECOVERED_PHONE_CONFIDENCE, FieldSource::Secondary)),
                );
                return;
            }
        }
    }
}

fn normalize(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() == 10 && !raw.trim_start().starts_with('+') {
        format!("+7{}", digits)
    } else {
        clean_value(raw, FieldType::Phone)
    }
}

/// Render an 11-digit Russian number as `+7 (XXX) XXX-XX-XX`.
pub fn format_phone(value: &str) -> Option<String> {
    let digits = digits_only(value);
    if digits.len() != 11 || !(digits.starts_with('7') || digits.starts_with('8')) {
        return None;
    }

    Some(format!(
        "+7 ({}) {}-{}-{}",
        &digits[1..4],
        &digits[4..7],
        &digits[7..9],
        &digits[9..11]
    ))
}

/// Apply [`format_phone`] to the phone field in place.
pub fn format_phone_field(data: &mut ExtractedCompanyData) {
    if let Some(field) = data.get_mut(FieldType::Phone) {
        if let Some(formatted) = format_phone(&field.value) {
            field.value = formatted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("+74951234567"), Some("+7 (495) 123-45-67".to_string()));
        assert_eq!(format_phone("89001234567"), Some("+7 (900) 123-45-67".to_string()));
        assert_eq!(format_phone("+7 (495) 123-45-67"), Some("+7 (495) 123-45-67".to_string()));
        assert_eq!(format_phone("12345"), None);
    }

    #[test]
    fn test_recover_grouped_local_number() {
        let mut data = ExtractedCompanyData::default();
        recover_phone(&mut data, "тел. отдела продаж (812) 123-45-67");

        let phone = data.get(FieldType::Phone).unwrap();
        assert_eq!(phone.value, "+78121234567");
        assert_eq!(phone.confidence, 85);
        assert_eq!(phone.source, FieldSource::Secondary);
    }

    #[test]
    fn test_recover_bare_number() {
        let mut data = ExtractedCompanyData::default();
        recover_phone(&mut data, "контакт 89001234567");
        assert_eq!(data.value(FieldType::Phone), Some("+79001234567"));
    }

    #[test]
    fn test_nothing_to_recover() {
        let mut data = ExtractedCompanyData::default();
        recover_phone(&mut data, "ИНН 7701234567");
        assert!(!data.is_present(FieldType::Phone));
    }
}
