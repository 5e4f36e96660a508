//! Addresses that OCR broke over several lines.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::card::rules::validate::validate_value;
use crate::models::company::{ExtractedCompanyData, FieldType};

/// Continuation lines joined onto an address at most.
const MAX_CONTINUATION_LINES: usize = 2;

lazy_static! {
    static ref FIELD_LABEL_START: Regex = Regex::new(
        r"(?i)^(?:инн|кпп|огрн|окпо|окато|октмо|оквэд|бик|банк|реквизиты|р/?с|к/?с|рсч|кс\b|расч|корр|сч[её]т|тел|e-?mail|эл|почт|сайт|генеральный|директор|руководитель|главный|наименование|адрес|фактический|юридический)"
    )
    .unwrap();
    static ref BUILDING_MARKER: Regex = Regex::new(
        r"(?i)(?:^|[^а-яё])(?:д\.|дом|стр\.?|корп|к\.[ \t]*\d|помещ|пом\.|кв\.|оф\.|офис|этаж|литер)"
    )
    .unwrap();
}

/// Append lines that carry on the address, such as the house and premises
/// part of a street wrapped onto the next line.
pub fn join_address_lines(data: &mut ExtractedCompanyData, text: &str) {
    let Some(field) = data.get_mut(FieldType::Address) else {
        return;
    };
    let Some(start) = text.find(field.value.as_str()) else {
        return;
    };

    let end = start + field.value.len();
    let Some(rest) = text[end..].trim_start_matches([' ', '\t']).strip_prefix('\n') else {
        return;
    };

    let mut joined = field.value.clone();
    for line in rest.lines().take(MAX_CONTINUATION_LINES) {
        let line = line.trim();
        if !is_continuation(line) {
            break;
        }
        joined.push(' ');
        joined.push_str(line);
    }

    if joined != field.value && validate_value(&joined, FieldType::Address, text) {
        debug!("address {:?} continued as {:?}", field.value, joined);
        field.value = joined;
    }
}

fn is_continuation(line: &str) -> bool {
    !line.is_empty()
        && !line.contains(':')
        && !FIELD_LABEL_START.is_match(line)
        && BUILDING_MARKER.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::{ExtractedField, FieldSource};
    use pretty_assertions::assert_eq;

    fn with_address(address: &str) -> ExtractedCompanyData {
        let mut data = ExtractedCompanyData::default();
        data.set(
            FieldType::Address,
            Some(ExtractedField::new(address, 85, FieldSource::Primary)),
        );
        data
    }

    #[test]
    fn test_wrapped_house_number_joined() {
        let text = "Адрес 625041, г Тюмень, ул Бакинских\nКомиссаров, д. 1, помещ. 6\nИНН 7203563629";
        let mut data = with_address("625041, г Тюмень, ул Бакинских");
        join_address_lines(&mut data, text);

        let address = data.get(FieldType::Address).unwrap();
        assert_eq!(address.value, "625041, г Тюмень, ул Бакинских Комиссаров, д. 1, помещ. 6");
        assert_eq!(address.confidence, 85);
    }

    #[test]
    fn test_next_field_is_not_joined() {
        let text = "Юридический адрес: 426000, г Ижевск, ул Ленина\nФактический адрес: г Ижевск, д. 5";
        let mut data = with_address("426000, г Ижевск, ул Ленина");
        join_address_lines(&mut data, text);
        assert_eq!(data.value(FieldType::Address), Some("426000, г Ижевск, ул Ленина"));

        let text = "Адрес: 400001, г. Волгоград, ул. Мира, 15\n\nБанк: ВТБ (ПАО)";
        let mut data = with_address("400001, г. Волгоград, ул. Мира, 15");
        join_address_lines(&mut data, text);
        assert_eq!(data.value(FieldType::Address), Some("400001, г. Волгоград, ул. Мира, 15"));
    }

    #[test]
    fn test_line_without_building_part_is_not_joined() {
        let text = "Адрес 625041, г Тюмень, ул Бакинских\nООО ФАВОРИТ";
        let mut data = with_address("625041, г Тюмень, ул Бакинских");
        join_address_lines(&mut data, text);
        assert_eq!(data.value(FieldType::Address), Some("625041, г Тюмень, ул Бакинских"));
    }
}
