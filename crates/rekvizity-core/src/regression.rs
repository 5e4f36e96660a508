//! Reference company cards and a regression harness for pattern changes.
//!
//! Each reference card carries real-world OCR layout quirks together with the
//! values a correct extraction produces. A card counts as successful when at
//! least three quarters of [`REQUIRED_FIELDS`] are found.
//!
//! A saved report serves as a baseline: [`compare_with_baseline`] tells which
//! cards a pattern change broke or made less confident.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::card::rules::patterns::PATTERN_LIBRARY_VERSION;
use crate::card::CompanyExtractor;
use crate::models::company::{ExtractedCompanyData, FieldType};
use FieldType::*;

/// Fields that decide whether a card extraction is usable.
pub const REQUIRED_FIELDS: [FieldType; 4] = [
    FieldType::CompanyName,
    FieldType::Inn,
    FieldType::Ogrn,
    FieldType::BankAccount,
];

/// Share of required fields that must be present.
const SUCCESS_RATIO: f64 = 0.75;

/// Confidence points a card may lose against the baseline.
pub const CONFIDENCE_TOLERANCE: u8 = 5;

/// Last recorded extraction status of a reference card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Success,
    Partial,
    Failed,
}

/// A reference card: OCR text plus expected values.
#[derive(Debug)]
pub struct ReferenceCard {
    pub id: &'static str,
    pub name: &'static str,
    pub status: CardStatus,
    pub text: &'static str,
    /// Expected values; fields absent from the card are not listed.
    pub expected: &'static [(FieldType, &'static str)],
}

impl ReferenceCard {
    pub fn expected(&self, field: FieldType) -> Option<&'static str> {
        self.expected
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| *v)
    }
}

/// Comparison of one field against the reference value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCheck {
    pub field: FieldType,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl FieldCheck {
    pub fn matches(&self) -> bool {
        self.expected == self.actual
    }
}

/// Extraction outcome for one reference card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardReport {
    pub id: String,
    pub name: String,
    pub status: CardStatus,
    pub success: bool,
    pub required_found: usize,
    pub extracted_fields: usize,
    pub confidence: u8,
    /// Required fields the card has but extraction missed.
    pub missing_required: Vec<FieldType>,
    pub checks: Vec<FieldCheck>,
}

impl CardReport {
    /// Field checks whose values differ from the reference.
    pub fn mismatches(&self) -> impl Iterator<Item = &FieldCheck> {
        self.checks.iter().filter(|c| !c.matches())
    }
}

/// Outcome of a full regression run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegressionReport {
    /// Pattern library version the report was produced with.
    pub version: String,
    pub total_cards: usize,
    pub successful_cards: usize,
    pub failed_cards: Vec<String>,
    /// Cards recorded as working that lost required fields or stopped working.
    pub regressions: Vec<String>,
    pub cards: Vec<CardReport>,
}

impl RegressionReport {
    pub fn success_rate(&self) -> f64 {
        if self.total_cards == 0 {
            return 0.0;
        }
        self.successful_cards as f64 / self.total_cards as f64
    }

    /// Mean overall confidence across cards.
    pub fn average_confidence(&self) -> f64 {
        if self.cards.is_empty() {
            return 0.0;
        }
        let total: u32 = self.cards.iter().map(|c| u32::from(c.confidence)).sum();
        f64::from(total) / self.cards.len() as f64
    }

    pub fn card(&self, id: &str) -> Option<&CardReport> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Parse a report saved with `serde_json`.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Difference between a baseline report and the current one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineComparison {
    pub baseline_version: String,
    pub current_version: String,
    /// Change in average confidence, in points.
    pub confidence_change: f64,
    /// Change in success rate, as a fraction.
    pub success_rate_change: f64,
    /// Cards that stopped working or lost more than [`CONFIDENCE_TOLERANCE`].
    pub regressions: Vec<String>,
    /// Fields that matched the reference in the baseline and no longer do.
    pub warnings: Vec<String>,
}

impl BaselineComparison {
    /// Whether every card that worked in the baseline still works as well.
    pub fn is_compatible(&self) -> bool {
        self.regressions.is_empty()
    }
}

/// Compare `current` against a `baseline` run, card by card.
///
/// Cards present in only one of the reports are skipped.
pub fn compare_with_baseline(baseline: &RegressionReport, current: &RegressionReport) -> BaselineComparison {
    let mut regressions = Vec::new();
    let mut warnings = Vec::new();

    for old in &baseline.cards {
        let Some(new) = current.card(&old.id) else {
            debug!("{}: not in current report", old.id);
            continue;
        };

        if old.success && !new.success {
            regressions.push(format!("{}: card stopped working", old.name));
        } else if new.confidence.saturating_add(CONFIDENCE_TOLERANCE) < old.confidence {
            regressions.push(format!(
                "{}: confidence dropped by {} ({} -> {})",
                old.name,
                old.confidence - new.confidence,
                old.confidence,
                new.confidence
            ));
        }

        for check in old.checks.iter().filter(|c| c.matches()) {
            let still_matches = new
                .checks
                .iter()
                .any(|c| c.field == check.field && c.matches());
            if !still_matches {
                warnings.push(format!("{}: {} no longer matches", old.name, check.field));
            }
        }
    }

    for regression in &regressions {
        warn!("Baseline regression: {}", regression);
    }

    BaselineComparison {
        baseline_version: baseline.version.clone(),
        current_version: current.version.clone(),
        confidence_change: current.average_confidence() - baseline.average_confidence(),
        success_rate_change: current.success_rate() - baseline.success_rate(),
        regressions,
        warnings,
    }
}

/// Compare an extraction against a reference card.
pub fn card_report(card: &ReferenceCard, data: &ExtractedCompanyData) -> CardReport {
    let required_found = REQUIRED_FIELDS
        .iter()
        .filter(|f| data.is_present(**f))
        .count();
    let success = required_found as f64 >= REQUIRED_FIELDS.len() as f64 * SUCCESS_RATIO;

    let missing_required = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|f| card.expected(*f).is_some() && !data.is_present(*f))
        .collect();

    let checks = FieldType::ALL
        .iter()
        .filter_map(|&field| {
            let expected = card.expected(field).map(str::to_string);
            let actual = data.value(field).map(str::to_string);
            if expected.is_none() && actual.is_none() {
                None
            } else {
                Some(FieldCheck { field, expected, actual })
            }
        })
        .collect();

    CardReport {
        id: card.id.to_string(),
        name: card.name.to_string(),
        status: card.status,
        success,
        required_found,
        extracted_fields: data.extracted_fields_count,
        confidence: data.overall_confidence,
        missing_required,
        checks,
    }
}

/// Run `extractor` over every reference card.
pub fn run_regression<E: CompanyExtractor + ?Sized>(extractor: &E) -> RegressionReport {
    let mut report = RegressionReport {
        version: PATTERN_LIBRARY_VERSION.to_string(),
        ..RegressionReport::default()
    };

    for card in REFERENCE_CARDS {
        let data = extractor.extract(card.text);
        let outcome = card_report(card, &data);
        report.total_cards += 1;

        if outcome.success {
            report.successful_cards += 1;
            if card.status == CardStatus::Success && !outcome.missing_required.is_empty() {
                let lost: Vec<&str> = outcome.missing_required.iter().map(|f| f.name()).collect();
                report
                    .regressions
                    .push(format!("{}: lost fields {}", card.name, lost.join(", ")));
            }
        } else {
            report.failed_cards.push(card.name.to_string());
            if card.status == CardStatus::Success {
                report
                    .regressions
                    .push(format!("{}: card stopped working", card.name));
            }
        }

        debug!(
            "{}: {}/{} required fields",
            card.id,
            outcome.required_found,
            REQUIRED_FIELDS.len()
        );
        report.cards.push(outcome);
    }

    for regression in &report.regressions {
        warn!("Regression: {}", regression);
    }
    info!(
        "Reference cards: {}/{} successful",
        report.successful_cards, report.total_cards
    );

    report
}

/// Number of reference cards per recorded status.
pub fn status_counts() -> BTreeMap<CardStatus, usize> {
    let mut counts = BTreeMap::new();
    for card in REFERENCE_CARDS {
        *counts.entry(card.status).or_insert(0) += 1;
    }
    counts
}

/// The reference card set.
pub fn reference_cards() -> &'static [ReferenceCard] {
    REFERENCE_CARDS
}

static REFERENCE_CARDS: &[ReferenceCard] = &[
    ReferenceCard {
        id: "card_001_partner",
        name: "ПАРТНЕР",
        status: CardStatus::Success,
        text: r#"
КАРТОЧКА ПРЕДПРИЯТИЯ

ООО "ПАРТНЕР"

ИНН / КПП
9716000221 / 971601419

ОГРН
1027716000229

Юридический адрес
115432, г. Москва, проспект Андропова, д.38, корп.3

Наименование банка
АЛЬФА-БАНК

БИК банка
044525593

Расчётный счет
40702810123450101230

Корреспондентский счет
30101810200000000593

Телефон
+7 (495) 123-45-67

E-mail
info@partner.ru
"#,
        expected: &[
            (CompanyName, "ПАРТНЕР"),
            (LegalName, "ООО \"ПАРТНЕР\""),
            (Inn, "9716000221"),
            (Kpp, "971601419"),
            (Ogrn, "1027716000229"),
            (Address, "115432, г. Москва, проспект Андропова, д.38, корп.3"),
            (BankName, "АЛЬФА-БАНК"),
            (BankAccount, "40702810123450101230"),
            (CorrAccount, "30101810200000000593"),
            (BankBik, "044525593"),
            (Phone, "+7 (495) 123-45-67"),
            (Email, "info@partner.ru"),
        ],
    },
    ReferenceCard {
        id: "card_002_itgroup",
        name: "АЙ ТИ ГРУП",
        status: CardStatus::Success,
        text: r#"
Общество с ограниченной ответственностью "АЙ ТИ ГРУП"
ИНН 7701234567 КПП 770101001
ОГРН 1027701234567

Юридический адрес:
123456, г. Москва, ул. Тверская, д. 1

Банковские реквизиты:
ПАО СБЕРБАНК
БИК 044525225
Расчетный счет 40702810938000123456
Корреспондентский счет 30101810400000000225

Контакты:
Тел: +7 (495) 987-65-43
Email: contact@itgroup.ru
"#,
        expected: &[
            (CompanyName, "АЙ ТИ ГРУП"),
            (LegalName, "Общество с ограниченной ответственностью \"АЙ ТИ ГРУП\""),
            (Inn, "7701234567"),
            (Kpp, "770101001"),
            (Ogrn, "1027701234567"),
            (Address, "123456, г. Москва, ул. Тверская, д. 1"),
            (BankName, "ПАО Сбербанк"),
            (BankAccount, "40702810938000123456"),
            (CorrAccount, "30101810400000000225"),
            (BankBik, "044525225"),
            (Phone, "+7 (495) 987-65-43"),
            (Email, "contact@itgroup.ru"),
        ],
    },
    ReferenceCard {
        id: "card_003_volsevmash",
        name: "ВОЛСЕВМАШ",
        status: CardStatus::Success,
        text: r#"
ООО "ВОЛСЕВМАШ"
8801234567 / 880101001
ОГРН: 1028801234567

Адрес: 400001, г. Волгоград, ул. Мира, 15

Банк: ВТБ (ПАО)
БИК: 044525187
Расчётный счёт: 40702810200001234567
Корр. счёт: 30101810700000000187

+7 (8442) 12-34-56
"#,
        expected: &[
            (CompanyName, "ВОЛСЕВМАШ"),
            (LegalName, "ООО \"ВОЛСЕВМАШ\""),
            (Inn, "8801234567"),
            (Kpp, "880101001"),
            (Ogrn, "1028801234567"),
            (Address, "400001, г. Волгоград, ул. Мира, 15"),
            (BankName, "ВТБ (ПАО)"),
            (BankAccount, "40702810200001234567"),
            (CorrAccount, "30101810700000000187"),
            (BankBik, "044525187"),
            (Phone, "+7 (844) 212-34-56"),
        ],
    },
    ReferenceCard {
        id: "card_004_baisyuhan",
        name: "БАЙСЮХАН",
        status: CardStatus::Failed,
        text: r#"
Покупатель:
ОБЩЕСТВО С ОГРАНИЧЕННОЙ ОТВЕТСТВЕННОСТЬЮ "БАЙСЮХАН"
ИНН: 9705227092
ОГРН: 1247700449480
Юридический адрес: г Москва, ул Летниковская, д 10 стр 2, кв./оф. ПОМЕЩ. 18/10
Реквизиты в ФИЛИАЛ "САНКТ-ПЕТЕРБУРГСКИЙ" АО "АЛЬФА-БАНК"
БИК: 044030786
К/с: 3010181060000000786 в СЕВЕРО-ЗАПАДНОЕ ГУ БАНКА РОССИИ
Номер счета: 40702810232410015485
"#,
        expected: &[
            (CompanyName, "БАЙСЮХАН"),
            (LegalName, "ОБЩЕСТВО С ОГРАНИЧЕННОЙ ОТВЕТСТВЕННОСТЬЮ \"БАЙСЮХАН\""),
            (Inn, "9705227092"),
            (Ogrn, "1247700449480"),
            (Address, "г Москва, ул Летниковская, д 10 стр 2, кв./оф. ПОМЕЩ. 18/10"),
            (BankName, "АЛЬФА-БАНК"),
            (BankAccount, "40702810232410015485"),
            (CorrAccount, "3010181060000000786"),
            (BankBik, "044030786"),
        ],
    },
    ReferenceCard {
        id: "card_005_entrepreneur",
        name: "ПЕТРОВ ИП",
        status: CardStatus::Failed,
        text: r#"
Карточка предприятия

Полное наименование организации: Индивидуальный предприниматель Петров Андрей Алексеевич
Сокращенное наименование организации: ИП Петров Андрей Алексеевич
Юридический адрес: 426000, Удмуртская Респ., г Ижевск
Фактический адрес: г Ижевск
Почтовый адрес: 426000, Удмуртская Респ., г Ижевск

ИНН / ОГРНИП: 183200000019 / 325180000000011
ОКПО / ОКАТО / ОКТМО: 2043138162 / 94401365000 / 94701000001

Наименование банка: ООО "ОЗОН Банк"
Корреспондентский счет: 30101810645374525068
БИК: 044525068
Расчетный счет: 40802810100001257933
ИНН / КПП: 970307050 / 770301001

Руководитель: Петров Андрей Алексеевич
Электронная почта: a.petrov@example.ru
Телефон: 89001234567
"#,
        expected: &[
            (CompanyName, "Петров Андрей Алексеевич"),
            (LegalName, "Индивидуальный предприниматель Петров Андрей Алексеевич"),
            (Inn, "183200000019"),
            (Kpp, "770301001"),
            (Ogrn, "325180000000011"),
            (Address, "426000, Удмуртская Респ., г Ижевск"),
            (BankName, "ООО \"ОЗОН Банк\""),
            (BankAccount, "40802810100001257933"),
            (CorrAccount, "30101810645374525068"),
            (BankBik, "044525068"),
            (Phone, "+7 (900) 123-45-67"),
            (Email, "a.petrov@example.ru"),
            (Director, "Петров Андрей Алексеевич"),
        ],
    },
    ReferenceCard {
        id: "card_006_komplektpro",
        name: "КОМПЛЕКТПРО",
        status: CardStatus::Success,
        text: r#"
ИНН 9731074981, КПП 772201001, ОГРН 1217700042340 ОКПО 47068057 ОКТМО - 45388000000

Зарегистрировано в ИФНС России № 22 по г. Москве, 111024, г. Москва, шоссе Энтузиастов, д. 14

ООО "КОМПЛЕКТПРО" в
Публичное акционерное общество «Сбербанк России»
Р/счет – 40702810738000084434
К/счет – 30101810400000000225
БИК – 044525225

Генеральный директор ООО "Комплектпро"
Кузнецов Сергей Борисович (действует на основании Уставa) +7 900 246-60-05
"#,
        expected: &[
            (CompanyName, "КОМПЛЕКТПРО"),
            (LegalName, "ООО \"КОМПЛЕКТПРО\""),
            (Inn, "9731074981"),
            (Kpp, "772201001"),
            (Ogrn, "1217700042340"),
            (Address, "111024, г. Москва, шоссе Энтузиастов, д. 14"),
            (BankName, "ПАО Сбербанк"),
            (BankAccount, "40702810738000084434"),
            (CorrAccount, "30101810400000000225"),
            (BankBik, "044525225"),
            (Phone, "+7 (900) 246-60-05"),
            (Director, "Кузнецов Сергей Борисович"),
        ],
    },
    ReferenceCard {
        id: "card_007_engelsky_metal",
        name: "ЭНГЕЛЬССКИЙ МЕТАЛЛ",
        status: CardStatus::Success,
        text: r#"
Карточка предприятия

Наименование предприятия
ООО "Энгельсский металл"

ИНН/КПП: 6449091357\6449091001
ОГРН: 1186451018324 от 07.08.2018 г.
Главный бухгалтер: Соколов Алексей Михайлович

Адрес местонахождения
410000, РОССИЯ, САРАТОВСКАЯ ОБЛ, г Энгельс, ул Химиков, д 2А

ОКПО ОГРН
32359263
1186451018324 от 07.08.2018 г Инспекция Федеральной налоговой службы № 25 по Саратовской области
"#,
        expected: &[
            (CompanyName, "Энгельсский металл"),
            (LegalName, "ООО \"Энгельсский металл\""),
            (Inn, "6449091357"),
            (Ogrn, "1186451018324"),
            (Address, "410000, РОССИЯ, САРАТОВСКАЯ ОБЛ, г Энгельс, ул Химиков, д 2А"),
        ],
    },
    ReferenceCard {
        id: "card_008_trubniy_potok",
        name: "ТРУБНЫЙ ПОТОК ПЕРЕРАБОТКА",
        status: CardStatus::Success,
        text: r#"
Общество с ограниченной ответственностью «Трубный Поток Переработка»

ИНН: 2014032944
КПП: 201401001
ОГРН: 1212000009572

Юридический адрес: 366020, Чеченская Республика, г.о. город Грозный, г. Грозный, р-н Ахматовский, ул. им. У.Д. Димаева, д. 14, этаж 2, пом

Расчетный счет: 40702810400250001112
Корреспондентский счет: 30101810145250000411
БИК: 044525411
Банк: ФИЛИАЛ "ЦЕНТРАЛЬНЫЙ" БАНКА ВТБ (ПАО)
"#,
        expected: &[
            (CompanyName, "Трубный Поток Переработка"),
            (LegalName, "Общество с ограниченной ответственностью «Трубный Поток Переработка»"),
            (Inn, "2014032944"),
            (Kpp, "201401001"),
            (Ogrn, "1212000009572"),
            (
                Address,
                "366020, Чеченская Республика, г.о. город Грозный, г. Грозный, р-н Ахматовский, ул. им. У.Д. Димаева, д. 14, этаж 2, пом",
            ),
            (BankName, "ФИЛИАЛ \"ЦЕНТРАЛЬНЫЙ\" БАНКА ВТБ (ПАО)"),
            (BankAccount, "40702810400250001112"),
            (CorrAccount, "30101810145250000411"),
            (BankBik, "044525411"),
        ],
    },
    ReferenceCard {
        id: "card_009_favorit",
        name: "ООО ФАВОРИТ",
        status: CardStatus::Success,
        text: r#"
ООО ФАВОРИТ
Адрес 625041, Тюменская область, г.о. город Тюмень, г Тюмень, ул Бакинских
Комиссаров, д. 1, помещ. 6
ИНН 7203563629
КПП 720301001
рсчет 40702810500000011819
Банк АО Банк Русский Стандарт»
кс 30101810845250000151
БИК 044525151
ГЕНЕРАЛЬНЫЙ ДИРЕКТОР Смирнова Мария Дмитриевна
"#,
        expected: &[
            (CompanyName, "ООО ФАВОРИТ"),
            (LegalName, "ООО ФАВОРИТ"),
            (Inn, "7203563629"),
            (Kpp, "720301001"),
            (Address, "625041, Тюменская область, г.о. город Тюмень, г Тюмень, ул Бакинских Комиссаров, д. 1, помещ. 6"),
            (BankName, "АО Банк Русский Стандарт"),
            (BankAccount, "40702810500000011819"),
            (CorrAccount, "30101810845250000151"),
            (BankBik, "044525151"),
            (Director, "Смирнова Мария Дмитриевна"),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardExtractor;
    use crate::models::company::{ExtractedField, FieldSource};
    use pretty_assertions::assert_eq;

    struct NothingFound;

    impl CompanyExtractor for NothingFound {
        fn extract(&self, _text: &str) -> ExtractedCompanyData {
            ExtractedCompanyData::default()
        }
    }

    #[test]
    fn test_reference_cards_are_consistent() {
        let cards = reference_cards();
        assert_eq!(cards.len(), 9);

        let mut ids: Vec<_> = cards.iter().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), cards.len());

        for card in cards {
            assert!(card.expected(Inn).is_some(), "{} has no INN", card.id);
        }
    }

    #[test]
    fn test_status_counts() {
        let counts = status_counts();
        assert_eq!(counts.get(&CardStatus::Success), Some(&7));
        assert_eq!(counts.get(&CardStatus::Failed), Some(&2));
    }

    #[test]
    fn test_card_report_threshold() {
        let card = &reference_cards()[0];
        let mut data = ExtractedCompanyData::default();
        for field in [CompanyName, Inn, Ogrn] {
            data.set(
                field,
                Some(ExtractedField::new(card.expected(field).unwrap(), 90, FieldSource::Primary)),
            );
        }

        let report = card_report(card, &data);
        assert!(report.success);
        assert_eq!(report.required_found, 3);
        assert_eq!(report.missing_required, vec![BankAccount]);
        assert!(report.mismatches().any(|c| c.field == BankAccount));
        assert!(!report.mismatches().any(|c| c.field == Inn));
    }

    #[test]
    fn test_failing_extractor_reports_regressions() {
        let report = run_regression(&NothingFound);

        assert_eq!(report.total_cards, 9);
        assert_eq!(report.successful_cards, 0);
        assert_eq!(report.failed_cards.len(), 9);
        assert_eq!(report.regressions.len(), 7);
        assert_eq!(report.success_rate(), 0.0);
    }

    #[test]
    fn test_card_extractor_passes_reference_cards() {
        let report = run_regression(&CardExtractor::new());

        assert_eq!(report.failed_cards, Vec::<String>::new());
        assert_eq!(report.regressions, Vec::<String>::new());
        assert_eq!(report.successful_cards, report.total_cards);
        assert_eq!(report.version, PATTERN_LIBRARY_VERSION);

        let mismatches: Vec<(&str, &FieldCheck)> = report
            .cards
            .iter()
            .flat_map(|card| card.mismatches().map(move |check| (card.id.as_str(), check)))
            .collect();
        assert!(mismatches.is_empty(), "mismatches: {:#?}", mismatches);
    }

    #[test]
    fn test_entrepreneur_card_fields() {
        let card = reference_cards()
            .iter()
            .find(|c| c.id == "card_005_entrepreneur")
            .unwrap();
        let data = CardExtractor::new().extract(card.text);

        assert_eq!(data.value(Kpp), Some("770301001"));
        assert_eq!(data.value(CompanyName), Some("Петров Андрей Алексеевич"));
    }

    #[test]
    fn test_wrapped_address_and_stray_quote() {
        let card = reference_cards()
            .iter()
            .find(|c| c.id == "card_009_favorit")
            .unwrap();
        let data = CardExtractor::new().extract(card.text);

        assert_eq!(data.value(BankName), Some("АО Банк Русский Стандарт"));
        assert_eq!(data.value(Address), card.expected(Address));
    }

    #[test]
    fn test_identical_runs_are_compatible() {
        let report = run_regression(&CardExtractor::new());
        let comparison = compare_with_baseline(&report, &report);

        assert!(comparison.is_compatible());
        assert_eq!(comparison.confidence_change, 0.0);
        assert_eq!(comparison.success_rate_change, 0.0);
        assert!(comparison.warnings.is_empty());
        assert_eq!(comparison.current_version, PATTERN_LIBRARY_VERSION);
    }

    #[test]
    fn test_broken_extractor_regresses_against_baseline() {
        let baseline = run_regression(&CardExtractor::new());
        let current = run_regression(&NothingFound);
        let comparison = compare_with_baseline(&baseline, &current);

        assert!(!comparison.is_compatible());
        assert_eq!(comparison.regressions.len(), 9);
        assert!(comparison.regressions[0].ends_with("card stopped working"));
        assert_eq!(comparison.success_rate_change, -1.0);
        assert!(comparison.confidence_change < 0.0);
        assert!(comparison.warnings.iter().any(|w| w == "ПАРТНЕР: inn no longer matches"));
    }

    #[test]
    fn test_confidence_drop_beyond_tolerance() {
        let baseline = run_regression(&CardExtractor::new());
        let mut current = baseline.clone();
        current.cards[0].confidence = baseline.cards[0].confidence - CONFIDENCE_TOLERANCE;
        current.cards[1].confidence = baseline.cards[1].confidence - CONFIDENCE_TOLERANCE - 1;

        let comparison = compare_with_baseline(&baseline, &current);
        assert_eq!(comparison.regressions.len(), 1);
        assert!(comparison.regressions[0].starts_with("АЙ ТИ ГРУП: confidence dropped by 6"));
    }

    #[test]
    fn test_baseline_roundtrips_through_json() {
        let report = run_regression(&CardExtractor::new());
        let json = serde_json::to_string(&report).unwrap();
        let baseline = RegressionReport::from_json(&json).unwrap();

        assert_eq!(baseline.version, report.version);
        assert_eq!(baseline.cards.len(), report.cards.len());
        assert!(compare_with_baseline(&baseline, &report).is_compatible());
        assert!(RegressionReport::from_json("{").is_err());
    }
}
