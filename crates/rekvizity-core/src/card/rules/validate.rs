//! Per-field plausibility checks for cleaned values.

use lazy_static::lazy_static;
use regex::Regex;

use super::inn_guard::is_ogrn_fragment;
use crate::models::company::FieldType;

/// Decides whether a cleaned value is plausible. Receives the full card text
/// for checks that depend on context.
pub type Validator = fn(&str, &str) -> bool;

lazy_static! {
    static ref PHONE_SHAPE: Regex = Regex::new(r"^\+?[78]\d{10}$").unwrap();
    static ref EMAIL_SHAPE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").unwrap();
    static ref ADDRESS_MARKER: Regex = Regex::new(
        r"(?i)\d{6}|город|\bг\.?\s|\bг\.|обл\.|область|российская\s+федерация|\bул\.?\s|\bул\.|улица|\bпр\.|проспект|\bд\.?\s*\d|\bд\.|\bдом\b|шоссе|переулок|\bпер\."
    )
    .unwrap();
    static ref CYRILLIC_CAPITAL: Regex = Regex::new(r"[А-ЯЁ]").unwrap();
}

/// Document headers that OCR often picks up as a company name.
const HEADER_PHRASES: &[&str] = &[
    "карточка предприятия",
    "карточка учета",
    "карточка учёта",
    "карточка организации",
    "карточка контрагента",
    "основная информация",
    "реквизиты компании",
    "реквизиты организации",
    "сведения о компании",
    "сведения об организации",
    "название проекта",
    "наименование документа",
];

/// Word stems that never occur in a real company name on these cards.
const HEADER_STEMS: &[&str] = &["карточк", "проект", "документ"];

/// Legal boilerplate that address patterns tend to run into.
const ADDRESS_BOILERPLATE: &[&str] = &["соответствии", "документами", "учредительными"];

/// Validator registered for a field.
pub fn validator(field: FieldType) -> Validator {
    match field {
        FieldType::Inn => valid_inn,
        FieldType::Kpp | FieldType::BankBik => valid_nine_digits,
        FieldType::Ogrn => valid_ogrn,
        FieldType::BankAccount => valid_settlement_account,
        FieldType::CorrAccount => valid_correspondent_account,
        FieldType::CompanyName | FieldType::LegalName => valid_name,
        FieldType::Phone => valid_phone,
        FieldType::Email => valid_email,
        FieldType::Address => valid_address,
        FieldType::Director => valid_director,
        FieldType::BankName => valid_bank_name,
    }
}

/// Whether a cleaned value is acceptable for `field` given the card text.
pub fn validate_value(value: &str, field: FieldType, text: &str) -> bool {
    !value.is_empty() && validator(field)(value, text)
}

fn is_digits(value: &str, lengths: &[usize]) -> bool {
    value.bytes().all(|b| b.is_ascii_digit()) && lengths.contains(&value.len())
}

fn valid_inn(value: &str, text: &str) -> bool {
    if !is_digits(value, &[10, 12]) {
        return false;
    }
    !is_ogrn_fragment(value, text)
}

fn valid_nine_digits(value: &str, _text: &str) -> bool {
    is_digits(value, &[9])
}

fn valid_ogrn(value: &str, _text: &str) -> bool {
    is_digits(value, &[13, 15])
}

fn valid_settlement_account(value: &str, _text: &str) -> bool {
    is_digits(value, &[20])
}

fn valid_correspondent_account(value: &str, _text: &str) -> bool {
    is_digits(value, &[19, 20])
}

fn valid_name(value: &str, _text: &str) -> bool {
    valid_company_name(value)
}

fn valid_phone(value: &str, _text: &str) -> bool {
    PHONE_SHAPE.is_match(value)
}

fn valid_email(value: &str, _text: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

fn valid_bank_name(value: &str, _text: &str) -> bool {
    value.chars().any(char::is_alphabetic)
}

/// Company or legal name: 3..=200 chars, some letters, not a document header.
///
/// Bank names are told apart by where they sit on the card, see
/// [`in_bank_context`](super::patterns::in_bank_context).
pub fn valid_company_name(value: &str) -> bool {
    let len = value.chars().count();
    if !(3..=200).contains(&len) || !value.chars().any(char::is_alphabetic) {
        return false;
    }

    let lower = value.to_lowercase();
    !HEADER_PHRASES.iter().any(|p| lower.contains(p))
        && !HEADER_STEMS.iter().any(|s| lower.contains(s))
}

fn valid_address(value: &str, _text: &str) -> bool {
    let len = value.chars().count();
    if !(10..=300).contains(&len) {
        return false;
    }

    let lower = value.to_lowercase();
    if ADDRESS_BOILERPLATE.iter().any(|b| lower.contains(b)) {
        return false;
    }
    if value.starts_with('(') && value.ends_with(')') {
        return false;
    }

    ADDRESS_MARKER.is_match(value)
}

fn valid_director(value: &str, _text: &str) -> bool {
    value.chars().count() >= 5 && CYRILLIC_CAPITAL.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_lengths() {
        assert!(validate_value("123456789", FieldType::Kpp, ""));
        assert!(!validate_value("12345678", FieldType::Kpp, ""));
        assert!(validate_value("1027700132195", FieldType::Ogrn, ""));
        assert!(validate_value("325180000053059", FieldType::Ogrn, ""));
        assert!(!validate_value("10277001321", FieldType::Ogrn, ""));
        assert!(validate_value("3010181060000000786", FieldType::CorrAccount, ""));
        assert!(!validate_value("3010181060000000786", FieldType::BankAccount, ""));
        assert!(!validate_value("", FieldType::BankBik, ""));
    }

    #[test]
    fn test_inn_uses_ogrn_guard() {
        assert!(validate_value("7701234567", FieldType::Inn, "ИНН 7701234567"));
        assert!(validate_value("183271969239", FieldType::Inn, ""));
        assert!(!validate_value("1027700132", FieldType::Inn, "ОГРН от 1027700132195"));
        assert!(!validate_value("77012345", FieldType::Inn, ""));
    }

    #[test]
    fn test_twelve_digit_inn_uses_ogrn_guard() {
        let text = "ИНН: 325180000053, ОГРНИП 325180000053059";
        assert!(!validate_value("325180000053", FieldType::Inn, text));

        let text = "ИНН / ОГРНИП: 183271969239 / 325180000053059";
        assert!(validate_value("183271969239", FieldType::Inn, text));
    }

    #[test]
    fn test_company_name_rejects_headers() {
        assert!(validate_value("ПАРТНЕР", FieldType::CompanyName, ""));
        assert!(validate_value("ООО \"ПАРТНЕР\"", FieldType::LegalName, ""));
        assert!(!validate_value("Карточка предприятия \"Ромашка\"", FieldType::CompanyName, ""));
        assert!(!validate_value("КАРТОЧКА ОРГАНИЗАЦИИ", FieldType::CompanyName, ""));
        assert!(!validate_value("Название проекта", FieldType::CompanyName, ""));
        assert!(!validate_value("12", FieldType::CompanyName, ""));
        assert!(!validate_value("123 456", FieldType::CompanyName, ""));
    }

    #[test]
    fn test_company_name_may_mention_bank() {
        assert!(validate_value("ООО \"Банкет Сервис\"", FieldType::CompanyName, ""));
        assert!(validate_value("Банкет Сервис", FieldType::CompanyName, ""));
        assert!(validate_value("ПАО \"Сбербанк\"", FieldType::LegalName, ""));
    }

    #[test]
    fn test_phone_shape() {
        assert!(validate_value("+74951234567", FieldType::Phone, ""));
        assert!(validate_value("89001234567", FieldType::Phone, ""));
        assert!(!validate_value("+7495123456", FieldType::Phone, ""));
        assert!(!validate_value("+1495123456789", FieldType::Phone, ""));
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_value("info@partner.ru", FieldType::Email, ""));
        assert!(!validate_value("info@partner", FieldType::Email, ""));
    }

    #[test]
    fn test_address_markers() {
        assert!(validate_value(
            "115432, г. Москва, пр-кт Андропова, д. 18, к. 7",
            FieldType::Address,
            ""
        ));
        assert!(validate_value(
            "г Москва, ул Летниковская, д 10 стр 2",
            FieldType::Address,
            ""
        ));
        assert!(!validate_value("в соответствии с документами", FieldType::Address, ""));
        assert!(!validate_value("(по месту нахождения)", FieldType::Address, ""));
        assert!(!validate_value("Москва", FieldType::Address, ""));
    }

    #[test]
    fn test_director() {
        assert!(validate_value("Иванов Иван Иванович", FieldType::Director, ""));
        assert!(!validate_value("иван", FieldType::Director, ""));
    }
}
