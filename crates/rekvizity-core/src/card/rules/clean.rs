//! Per-field normalisation of raw matched text.

use crate::models::company::FieldType;

/// Normalises a trimmed raw value.
pub type Cleaner = fn(&str) -> String;

const QUOTES: &[char] = &['"', '«', '»', '“', '”', '„'];

/// Cleaner registered for a field.
pub fn cleaner(field: FieldType) -> Cleaner {
    match field {
        FieldType::Inn
        | FieldType::Kpp
        | FieldType::Ogrn
        | FieldType::BankAccount
        | FieldType::CorrAccount => digits_only,
        FieldType::BankBik => clean_bik,
        FieldType::CompanyName | FieldType::LegalName => clean_name,
        FieldType::Phone => clean_phone,
        FieldType::Email => clean_email,
        FieldType::BankName | FieldType::Address | FieldType::Director => identity,
    }
}

/// Trim and normalise a raw value for `field`.
pub fn clean_value(value: &str, field: FieldType) -> String {
    cleaner(field)(value.trim())
}

fn identity(value: &str) -> String {
    value.to_string()
}

/// Drop everything that is not an ASCII digit.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// OCR reads a leading "Р" stamp mark on BIK values; drop it before the digits.
fn clean_bik(value: &str) -> String {
    let value = value.trim_start_matches(['p', 'р', 'P', 'Р']);
    digits_only(value)
}

/// Collapse whitespace and strip wrapping quotes.
///
/// Quotes that belong to the name (`ООО "ПАРТНЕР"`) are kept: leading quotes
/// are always dropped, trailing ones only when the value opened with a quote
/// or the quotes are unbalanced.
fn clean_name(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");

    let opens_quoted = collapsed.starts_with(QUOTES);
    let mut name = collapsed.trim_start_matches(QUOTES).trim_start();

    let quote_count = name.chars().filter(|c| QUOTES.contains(c)).count();
    if opens_quoted || quote_count % 2 == 1 {
        name = name.trim_end_matches(QUOTES).trim_end();
    }

    name.to_string()
}

/// Keep digits and `+`; a leading domestic `8` becomes `+7`.
fn clean_phone(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    match kept.strip_prefix('8') {
        Some(rest) => format!("+7{}", rest),
        None => kept,
    }
}

fn clean_email(value: &str) -> String {
    value.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_fields_strip_separators() {
        assert_eq!(clean_value(" 7701 234 567 ", FieldType::Inn), "7701234567");
        assert_eq!(
            clean_value("4070-2810-1234-5010-1230", FieldType::BankAccount),
            "40702810123450101230"
        );
    }

    #[test]
    fn test_bik_stamp_prefix() {
        assert_eq!(clean_value("р044525225", FieldType::BankBik), "044525225");
        assert_eq!(clean_value("p044525225", FieldType::BankBik), "044525225");
        assert_eq!(clean_value("044525225", FieldType::BankBik), "044525225");
    }

    #[test]
    fn test_name_quotes() {
        assert_eq!(clean_value("ПАРТНЕР", FieldType::CompanyName), "ПАРТНЕР");
        assert_eq!(clean_value("«ПАРТНЕР»", FieldType::CompanyName), "ПАРТНЕР");
        assert_eq!(
            clean_value("ООО   \"ПАРТНЕР\"", FieldType::LegalName),
            "ООО \"ПАРТНЕР\""
        );
        assert_eq!(clean_value("ТРУБНЫЙ ПОТОК\"", FieldType::CompanyName), "ТРУБНЫЙ ПОТОК");
    }

    #[test]
    fn test_phone_domestic_prefix() {
        assert_eq!(clean_value("8 (495) 123-45-67", FieldType::Phone), "+74951234567");
        assert_eq!(clean_value("+7 950 246-60-05", FieldType::Phone), "+79502466005");
        assert_eq!(clean_value("79502466005", FieldType::Phone), "79502466005");
    }

    #[test]
    fn test_email_lowercase() {
        assert_eq!(clean_value("Info@Partner.RU", FieldType::Email), "info@partner.ru");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let samples = [
            (FieldType::Inn, "ИНН 7701234567"),
            (FieldType::BankBik, "р044525225"),
            (FieldType::CompanyName, "«Ромашка»"),
            (FieldType::Phone, "8 (495) 123-45-67"),
            (FieldType::Email, "A@B.RU"),
        ];
        for (field, raw) in samples {
            let once = clean_value(raw, field);
            assert_eq!(clean_value(&once, field), once, "{}", field);
        }
    }
}
