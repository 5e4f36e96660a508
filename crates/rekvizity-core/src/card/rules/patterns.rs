//! Pattern library for Russian company card extraction.
//!
//! Each field has an ordered list of matchers, most reliable first: label-anchored
//! patterns come before patterns that rely only on the shape of the value. The
//! position of a matcher in its list drives the base confidence of a match.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::models::company::FieldType;

/// Version of the pattern tables below. Bump whenever a pattern list changes.
pub const PATTERN_LIBRARY_VERSION: &str = "2.5.0";

/// A named, compiled pattern.
#[derive(Debug)]
pub struct Matcher {
    /// Short identifier used in logs.
    pub name: &'static str,
    /// Compiled regex. Group 1 (and for some fields group 2) holds the value.
    pub regex: Regex,
}

impl Matcher {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
        }
    }
}

lazy_static! {
    // INN (10 digits for organisations, 12 for individuals)
    pub static ref INN_PATTERNS: Vec<Matcher> = vec![
        Matcher::new("inn_ogrnip_block", r"ИНН\s*[/\\]\s*ОГРНИП[:\s]*(\d{12})\s*[/\\]\s*\d{15}"),
        Matcher::new("inn_colon", r"ИНН\s*:\s*(\d{12}|\d{10})(?:\D|$)"),
        Matcher::new("inn_label", r"ИНН[\s№]*(\d{12}|\d{10})(?:\D|$)"),
        Matcher::new("inn_kpp_label", r"ИНН\s*[/\\]\s*КПП[:\s]*(\d{10})\s*[/\\]\s*\d{9}(?:\D|$)"),
        Matcher::new("inn_slash_kpp", r"(?:^|\D)(\d{10})\s*[/\\]\s*\d{9}(?:\D|$)"),
        Matcher::new("inn_loose_label", r"(?i:инн)[^\d\n]{0,20}(\d{12}|\d{10})(?:\D|$)"),
        Matcher::new("inn_isolated_line", r"(?m)^[ \t]*(\d{12}|\d{10})[ \t]*$"),
        // OCR regularly glues the next number onto an INN, so a 10-digit head of
        // a 13/15-digit run is still a candidate; the OGRN guard sorts these out.
        Matcher::new("inn_glued", r"(?:^|\D)(\d{10})(?:\d{3}|\d{5})?(?:\D|$)"),
    ];

    // KPP (9 digits)
    pub static ref KPP_PATTERNS: Vec<Matcher> = vec![
        // Before the plain labels: "КПП: <inn> / <kpp>" would otherwise yield the
        // INN, which OCR sometimes cuts to nine digits.
        Matcher::new("kpp_inn_kpp_label", r"ИНН\s*[/\\]\s*КПП[:\s]*\d{9,12}\s*[/\\]\s*(\d{9})(?:\D|$)"),
        Matcher::new("kpp_colon", r"КПП\s*:\s*(\d{9})(?:\D|$)"),
        Matcher::new("kpp_label", r"КПП[\s№]*(\d{9})(?:\D|$)"),
        Matcher::new("kpp_inn_slash", r"(?:^|\D)\d{10}\s*[/\\]\s*(\d{9})(?:\D|$)"),
        Matcher::new("kpp_loose_label", r"(?i:кпп)[^\d\n]{0,20}(\d{9})(?:\D|$)"),
    ];

    // OGRN (13 digits) / OGRNIP (15 digits)
    pub static ref OGRN_PATTERNS: Vec<Matcher> = vec![
        Matcher::new("ogrn_ogrnip_block", r"ИНН\s*[/\\]\s*ОГРНИП[:\s]*\d{10,12}\s*[/\\]\s*(\d{15})(?:\D|$)"),
        Matcher::new("ogrnip_label", r"ОГРНИП[:\s]*(\d{15})(?:\D|$)"),
        Matcher::new("ogrn_colon", r"ОГРН\s*:\s*(\d{15}|\d{13})(?:\D|$)"),
        Matcher::new("ogrn_label", r"ОГРН[\s№]*(\d{15}|\d{13})(?:\D|$)"),
        Matcher::new("ogrn_loose_label", r"(?i:огрн)[^\d\n]{0,20}(\d{15}|\d{13})(?:\D|$)"),
        Matcher::new(
            "ogrn_full_name",
            r"(?i:основной\s+государственный\s+регистрационный\s+номер)[^\d]{0,30}(\d{15}|\d{13})(?:\D|$)",
        ),
        Matcher::new("ogrn_isolated_line", r"(?m)^[ \t]*(\d{15}|\d{13})(?:[ \t]|$)"),
    ];

    // Short company name
    pub static ref COMPANY_NAME_PATTERNS: Vec<Matcher> = vec![
        Matcher::new(
            "name_short_form_quoted",
            r#"(?:^|[^А-Яа-яЁё])(?:ООО|АО|ПАО|ЗАО|ОАО|НКО|АНО)[ \t]*["«“„]([^"»”“\n]{2,100})["»”“]"#,
        ),
        Matcher::new(
            "name_full_form_quoted",
            r#"(?i:общество\s+с\s+ограниченной\s+ответственностью)\s*["«“„]([^"»”“\n]{2,100})["»”“]"#,
        ),
        // Quoted name broken over two lines by OCR: the halves are joined.
        Matcher::new(
            "name_quoted_split",
            r#"(?m)^[ \t]*["«]([^"»\n]{2,60})[ \t]*\n[ \t]*([^"»\n]{2,60})["»]"#,
        ),
        Matcher::new(
            "name_entrepreneur",
            r"(?:^|[^А-Яа-яЁё])(?:Индивидуальный\s+предприниматель|ИП)[ \t]+([А-ЯЁ][а-яё\-]+(?:[ \t]+[А-ЯЁ][а-яё\-]+){1,2})",
        ),
        Matcher::new(
            "name_label",
            r#"(?i:наименование(?:\s+(?:предприятия|организации|компании))?|название)[ \t]*:?[ \t]*\n?[ \t]*([А-ЯЁA-Z"«][^\n]{2,199})"#,
        ),
        Matcher::new(
            "name_legal_form_line",
            r#"(?m)^[ \t]*((?:ООО|АО|ПАО|ЗАО|ОАО)[ \t]+[А-ЯЁA-Z][^\n"«»]{1,100}?)[ \t]*$"#,
        ),
        Matcher::new(
            "name_quoted_line",
            r#"(?m)^[ \t]*([А-ЯЁ][^\n]{0,100}?["«][^"»\n]{2,100}["»])[ \t]*$"#,
        ),
        Matcher::new("name_caps_line", r"(?m)^[ \t]*([А-ЯЁ][А-ЯЁ \t\-]{2,60})[ \t]*$"),
    ];

    // Full legal name, legal form included
    pub static ref LEGAL_NAME_PATTERNS: Vec<Matcher> = vec![
        Matcher::new(
            "legal_full_name_label",
            r"(?i:полное\s+наименование(?:\s+организации)?)[ \t]*:?[ \t]*([^\n]{5,200})",
        ),
        Matcher::new(
            "legal_full_form",
            r"((?i:общество\s+с\s+ограниченной\s+ответственностью|индивидуальный\s+предприниматель)[ \t]+[^\n]{2,150})",
        ),
        Matcher::new(
            "legal_short_form_quoted",
            r#"(?:^|[^А-Яа-яЁё])((?:ООО|АО|ПАО|ЗАО|ОАО)[ \t]*["«“„][^"»”“\n]{2,100}["»”“])"#,
        ),
        Matcher::new(
            "legal_form_line",
            r#"(?m)^[ \t]*((?:ООО|АО|ПАО|ЗАО|ОАО)[ \t]+[А-ЯЁA-Z][^\n"«»]{1,100}?)[ \t]*$"#,
        ),
    ];

    // Bank name
    pub static ref BANK_NAME_PATTERNS: Vec<Matcher> = vec![
        Matcher::new("bank_name_label", r"Наименование\s+банка[ \t]*:?[ \t]*\n?[ \t]*([^\n]{2,100})"),
        Matcher::new("bank_line", r"(?m)^[ \t]*Банк[ \t]*[:\-–—]?[ \t]+([^\n]{3,100})"),
        Matcher::new("bank_requisites_in", r"(?i:реквизиты)[ \t]+(в[ \t]+[^\n]{3,100})"),
        Matcher::new(
            "bank_legal_form_line",
            r#"(?m)^[ \t]*((?:ПАО|АО|ООО)[ \t]+["«]?[^\n]*(?i:банк)[^\n]*)$"#,
        ),
        Matcher::new(
            "bank_joint_stock",
            r#"((?i:публичное|открытое|закрытое)?[ \t]*(?i:акционерное[ \t]+общество)[ \t]*["«][^"»\n]+["»])"#,
        ),
        Matcher::new(
            "bank_known_name",
            r"(?i)((?:ПАО[ \t]+)?сбербанк(?:[ \t]+россии)?|альфа[\-\s]?банк|озон[\-\s]*банк|банк[ \t]+втб|т-банк|тинькофф)",
        ),
    ];

    // Settlement account (20 digits, conventionally 40...)
    pub static ref BANK_ACCOUNT_PATTERNS: Vec<Matcher> = vec![
        Matcher::new("account_label", r"(?i:расч[её]тный[ \t]+сч[её]т)[\s:\-–—№]*(\d{20})(?:\D|$)"),
        Matcher::new(
            "account_short_label",
            r"(?:^|[^А-Яа-яЁё])(?i:р[ \t]*/?[ \t]*с(?:ч[её]т)?)[\s:\-–—№.]*(\d{20})(?:\D|$)",
        ),
        Matcher::new(
            "account_number_label",
            r"(?i:номер[ \t]+сч[её]та|сч[её]т[ \t]+№)[\s:\-–—]*(\d{20})(?:\D|$)",
        ),
        Matcher::new("account_labeled_40", r"(?i:сч[её]т)[^\d\n]{0,20}(40\d{18})(?:\D|$)"),
        Matcher::new("account_bare_40", r"(?:^|\D)(40\d{18})(?:\D|$)"),
    ];

    // Correspondent account (19-20 digits, conventionally 30...)
    pub static ref CORR_ACCOUNT_PATTERNS: Vec<Matcher> = vec![
        Matcher::new(
            "corr_label",
            r"(?i:корреспондентский[ \t]+сч[её]т)[\s:\-–—№]*(\d{19,20})(?:\D|$)",
        ),
        Matcher::new("corr_short_label", r"(?i:корр?\.?[ \t]*сч[её]т)[\s:\-–—№]*(\d{19,20})(?:\D|$)"),
        Matcher::new(
            "corr_ks_label",
            r"(?:^|[^А-Яа-яЁё])(?i:к[ \t]*/?[ \t]*с(?:ч[её]т)?)[\s:\-–—№.]*(\d{19,20})(?:\D|$)",
        ),
        Matcher::new("corr_bare_30101", r"(?:^|\D)(3010[1-3]\d{15})(?:\D|$)"),
    ];

    // BIK (9 digits)
    pub static ref BANK_BIK_PATTERNS: Vec<Matcher> = vec![
        Matcher::new("bik_separator", r"БИК\s*[:\-–—]\s*([pр]?\d{9})(?:\D|$)"),
        Matcher::new("bik_label", r"БИК[\s№]*([pр]?\d{9})(?:\D|$)"),
        Matcher::new("bik_bank_label", r"(?i:бик[ \t]+банка)[\s:]*([pр]?\d{9})(?:\D|$)"),
        Matcher::new(
            "bik_full_name",
            r"(?i:банковский[ \t]+идентификационный[ \t]+код)[\s:]*(\d{9})(?:\D|$)",
        ),
        Matcher::new("bik_loose_label", r"(?i:бик)[^\d\n]{0,20}(\d{9})(?:\D|$)"),
        Matcher::new("bik_bare_04", r"(?:^|\D)(04\d{7})(?:\D|$)"),
    ];

    // Phone
    pub static ref PHONE_PATTERNS: Vec<Matcher> = vec![
        Matcher::new(
            "phone_label",
            r"(?i:телефон|тел|phone|tel)\.?[\s:]*(\+?[78][\d \t\-\(\)]{9,20})",
        ),
        Matcher::new(
            "phone_international",
            r"(\+7[ \t\-]*\(?[ \t]*\d{3,4}[ \t]*\)?[ \t\-]*\d{1,3}[ \t\-]*\d{2}[ \t\-]*\d{2})",
        ),
        Matcher::new(
            "phone_domestic",
            r"(?:^|\D)(8[ \t\-]*\(?\d{3,4}\)?[ \t\-]*\d{2,3}[ \t\-]*\d{2}[ \t\-]*\d{2})(?:\D|$)",
        ),
        Matcher::new("phone_bare_11", r"(?:^|\D)([78]\d{10})(?:\D|$)"),
    ];

    // Email
    pub static ref EMAIL_PATTERNS: Vec<Matcher> = vec![
        Matcher::new(
            "email_label",
            r"(?i:e-?mail|эл\.?[ \t]*почта|электронная[ \t]+почта)[ \t]*:?\s*([A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,})",
        ),
        Matcher::new("email_bare", r"([A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,})"),
    ];

    // Address
    pub static ref ADDRESS_PATTERNS: Vec<Matcher> = vec![
        Matcher::new("address_legal", r"(?i:юридический[ \t]+адрес)[ \t]*:?\s*([^\n]{10,300})"),
        Matcher::new(
            "address_location",
            r"(?i:адрес[ \t]+местонахождения|место[ \t]+нахождения|фактический[ \t]+адрес|почтовый[ \t]+адрес)[ \t]*:?\s*([^\n]{10,300})",
        ),
        Matcher::new("address_plain_label", r"(?m)^[ \t]*(?i:адрес)[ \t]*:?[ \t]+([^\n]{10,300})"),
        Matcher::new("address_postal_code", r"(?:^|\D)(\d{6},[ \t]*[^\n]{10,250})"),
    ];

    // Director
    pub static ref DIRECTOR_PATTERNS: Vec<Matcher> = vec![
        Matcher::new(
            "director_label",
            r"(?i:генеральный[ \t]+директор|директор|руководитель)[ \t]*:?[ \t]*([А-ЯЁ][а-яё]+[ \t]+[А-ЯЁ][а-яё]+(?:[ \t]+[А-ЯЁ][а-яё]+)?)",
        ),
        Matcher::new(
            "director_next_line",
            r"(?i:генеральный[ \t]+директор|директор|руководитель)[^\n]*\n[ \t]*([А-ЯЁ][а-яё]+[ \t]+[А-ЯЁ][а-яё]+[ \t]+[А-ЯЁ][а-яё]+)",
        ),
        Matcher::new(
            "director_initials",
            r"(?i:директор|руководитель)[ \t]*:?[ \t]*([А-ЯЁ][а-яё]+[ \t]+[А-ЯЁ]\.[ \t]*[А-ЯЁ]\.)",
        ),
    ];
}

lazy_static! {
    // Combined INN/KPP layouts, checked after per-field extraction
    pub static ref INN_KPP_BLOCKS: Vec<Matcher> = vec![
        Matcher::new("block_label", r"ИНН\s*[/\\]\s*КПП[:\s]*(\d{10})\s*[/\\]\s*(\d{9})(?:\D|$)"),
        Matcher::new("block_inline_labels", r"ИНН[:\s]+(\d{10})\s*[/\\]\s*КПП[:\s]+(\d{9})(?:\D|$)"),
        Matcher::new("block_slash", r"(?:^|\D)(\d{10})\s*[/\\]\s*(\d{9})(?:\D|$)"),
        Matcher::new("block_line_break", r"ИНН\s*[/\\]\s*КПП[ \t]*\n\s*(\d{10})\s*[/\\]\s*(\d{9})(?:\D|$)"),
        Matcher::new("block_comma", r"ИНН[:\s]*(\d{10})[,\s]+КПП[:\s]*(\d{9})(?:\D|$)"),
        Matcher::new("block_table", r"\|\s*(\d{10})\s*[/\\]\s*(\d{9})\s*\|"),
    ];

    // Bank section of the card, where legal-form names belong to the bank
    static ref BANK_LINE_PREFIX: Regex =
        Regex::new(r"(?i)банк|реквизиты[ \t]+в[ \t]|бик|к/с|р/с|корр|сч[её]т").unwrap();
    static ref BANK_LINE_START: Regex =
        Regex::new(r"(?i)^(?:наименование[ \t]+банка|банк|реквизиты[ \t]+в|бик|к/с|р/с)(?:[^а-яё]|$)")
            .unwrap();
    static ref BANK_SECTION_LABEL: Regex = Regex::new(
        r"(?i)^[ \t]*(?:наименование[ \t]+банка|банк(?:[ \t]+получателя)?|обслуживающий[ \t]+банк|банковские[ \t]+реквизиты)[ \t]*:?[ \t]*$"
    )
    .unwrap();

    // INN-from-OGRN guard
    pub static ref OGRN_LIKE_NUMBER: Regex = Regex::new(r"\d{13,15}").unwrap();
    pub static ref OGRN_KEYWORDS: Regex =
        Regex::new(r"(?i)огрн|регистрационный|государственный|основной").unwrap();
    pub static ref DATE_MARKERS: Regex =
        Regex::new(r"\bот\b|\bг\b|\d{2}\.\d{2}\.\d{4}").unwrap();

    // Missing BIK recovery
    pub static ref BIK_RECOVERY: Vec<Matcher> = vec![
        Matcher::new("bik_recovery_label", r"БИК[\s№:]*(\d{9})(?:\D|$)"),
        Matcher::new(
            "bik_recovery_full_name",
            r"(?i:банковский\s+идентификационный\s+код)[\s:]*(\d{9})(?:\D|$)",
        ),
        Matcher::new(
            "bik_recovery_near_bank",
            r"(?i:сбербанк|альфа[\-\s]?банк|втб|банк)[\s\S]{0,100}?(?:^|\D)(\d{9})(?:\D|$)",
        ),
    ];

    // Missing phone recovery, loosest last
    pub static ref PHONE_RECOVERY: Vec<Matcher> = vec![
        Matcher::new(
            "phone_recovery_international",
            r"\+7\s*\(\s*\d{3}\s*\)\s*\d{3}\s*-?\s*\d{2}\s*-?\s*\d{2}",
        ),
        Matcher::new(
            "phone_recovery_grouped",
            r"\(\s*\d{3,4}\s*\)\s*\d{2,3}[ \t\-]*\d{2}[ \t\-]*\d{2}",
        ),
        Matcher::new("phone_recovery_bare_11", r"(?:^|\D)([78]\d{10})(?:\D|$)"),
        Matcher::new(
            "phone_recovery_label",
            r"(?i:телефон|тел|phone|tel)[.:\s]+([+\d \t\-\(\)]{10,})",
        ),
    ];

    // Settlement account recovery
    pub static ref SETTLEMENT_RECOVERY: Vec<Matcher> = vec![
        Matcher::new("settlement_isolated", r"(?m)^[ \t]*(\d{20})[ \t]*$"),
        Matcher::new("settlement_near_label", r"(?i:расч[её]тный|р/с)[\s\S]{0,50}?(\d{20})(?:\D|$)"),
        Matcher::new("settlement_bare_40", r"(?:^|\D)(40\d{18})(?:\D|$)"),
    ];

    // Correspondent account recovery
    pub static ref CORRESPONDENT_RECOVERY: Vec<Matcher> = vec![
        Matcher::new("corr_isolated", r"(?m)^[ \t]*(\d{20})[ \t]*$"),
        Matcher::new("corr_near_bik", r"(?i:бик)[\s\S]{0,100}?(?:^|\D)(\d{20})(?:\D|$)"),
        Matcher::new("corr_near_bank", r"(?i:банк)[\s\S]{0,100}?(?:^|\D)(\d{20})(?:\D|$)"),
        Matcher::new("corr_bare_30", r"(?:^|\D)(30\d{18})(?:\D|$)"),
        Matcher::new("corr_bare_20", r"(?:^|\D)(\d{20})(?:\D|$)"),
    ];

    // Label and neighbour words used for the context bonus
    static ref INN_LABEL: Regex = Regex::new(r"(?i)инн").unwrap();
    static ref KPP_LABEL: Regex = Regex::new(r"(?i)кпп").unwrap();
    static ref OGRN_LABEL: Regex = Regex::new(r"(?i)огрн").unwrap();
    static ref BIK_LABEL: Regex = Regex::new(r"(?i)бик").unwrap();
    static ref ACCOUNT_LABEL: Regex = Regex::new(r"(?i)расч[её]т|р/с|сч[её]т").unwrap();
    static ref CORR_LABEL: Regex = Regex::new(r"(?i)корр|к/с").unwrap();
    static ref BANK_LABEL: Regex = Regex::new(r"(?i)банк").unwrap();
    static ref PHONE_LABEL: Regex = Regex::new(r"(?i)тел|phone").unwrap();
    static ref EMAIL_LABEL: Regex = Regex::new(r"(?i)mail|почта").unwrap();
    static ref ADDRESS_LABEL: Regex = Regex::new(r"(?i)адрес").unwrap();
    static ref DIRECTOR_LABEL: Regex = Regex::new(r"(?i)директор|руководитель").unwrap();
    static ref NAME_LABEL: Regex =
        Regex::new(r"(?i)наименование|название|общество|предприниматель|ООО|ИП").unwrap();
}

/// Ordered matcher list for a field.
pub fn patterns_for(field: FieldType) -> &'static [Matcher] {
    match field {
        FieldType::Inn => &INN_PATTERNS,
        FieldType::Kpp => &KPP_PATTERNS,
        FieldType::Ogrn => &OGRN_PATTERNS,
        FieldType::CompanyName => &COMPANY_NAME_PATTERNS,
        FieldType::LegalName => &LEGAL_NAME_PATTERNS,
        FieldType::BankName => &BANK_NAME_PATTERNS,
        FieldType::BankAccount => &BANK_ACCOUNT_PATTERNS,
        FieldType::CorrAccount => &CORR_ACCOUNT_PATTERNS,
        FieldType::BankBik => &BANK_BIK_PATTERNS,
        FieldType::Phone => &PHONE_PATTERNS,
        FieldType::Email => &EMAIL_PATTERNS,
        FieldType::Address => &ADDRESS_PATTERNS,
        FieldType::Director => &DIRECTOR_PATTERNS,
    }
}

/// Label that marks the field itself.
pub fn field_label(field: FieldType) -> &'static Regex {
    match field {
        FieldType::Inn => &INN_LABEL,
        FieldType::Kpp => &KPP_LABEL,
        FieldType::Ogrn => &OGRN_LABEL,
        FieldType::BankBik => &BIK_LABEL,
        FieldType::BankAccount => &ACCOUNT_LABEL,
        FieldType::CorrAccount => &CORR_LABEL,
        FieldType::BankName => &BANK_LABEL,
        FieldType::Phone => &PHONE_LABEL,
        FieldType::Email => &EMAIL_LABEL,
        FieldType::Address => &ADDRESS_LABEL,
        FieldType::Director => &DIRECTOR_LABEL,
        FieldType::CompanyName | FieldType::LegalName => &NAME_LABEL,
    }
}

/// Labels of fields that usually sit next to `field` on a card.
pub fn neighbour_labels(field: FieldType) -> Vec<&'static Regex> {
    match field {
        FieldType::Inn => vec![&*KPP_LABEL, &*OGRN_LABEL],
        FieldType::Kpp => vec![&*INN_LABEL, &*OGRN_LABEL],
        FieldType::Ogrn => vec![&*INN_LABEL, &*KPP_LABEL],
        FieldType::BankBik => vec![&*ACCOUNT_LABEL, &*BANK_LABEL],
        FieldType::BankAccount => vec![&*BIK_LABEL, &*CORR_LABEL],
        FieldType::CorrAccount => vec![&*BIK_LABEL, &*ACCOUNT_LABEL],
        FieldType::BankName => vec![&*BIK_LABEL],
        FieldType::Phone => vec![&*EMAIL_LABEL],
        FieldType::Email => vec![&*PHONE_LABEL],
        FieldType::CompanyName | FieldType::LegalName => vec![&*INN_LABEL],
        FieldType::Address | FieldType::Director => Vec::new(),
    }
}

/// Whether a name starting at byte `offset` of `text` belongs to the bank
/// section: its line is introduced by a bank or account label, the name itself
/// opens with one, or it sits right under a bare bank label.
pub fn in_bank_context(text: &str, offset: usize) -> bool {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    if BANK_LINE_PREFIX.is_match(&text[line_start..offset]) {
        return true;
    }

    let line_end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    if BANK_LINE_START.is_match(&text[offset..line_end]) {
        return true;
    }

    line_start > 0
        && text[..line_start - 1]
            .rsplit('\n')
            .next()
            .is_some_and(|previous| BANK_SECTION_LABEL.is_match(previous))
}

/// Iterate over all matches of `regex`, resuming each search where the value
/// group ends rather than where the whole match ends.
///
/// Patterns close numbers with `(?:\D|$)` instead of a lookahead, which the
/// regex crate does not support. Resuming after the group keeps that trailing
/// delimiter available as the leading `(?:^|\D)` of the next match, so two
/// numbers separated by a single character are both found.
pub fn scan<'r, 't>(regex: &'r Regex, text: &'t str) -> impl Iterator<Item = Captures<'t>> + 'r
where
    't: 'r,
{
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos > text.len() {
            return None;
        }
        let caps = regex.captures_at(text, pos)?;
        let whole = caps.get(0)?;
        let resume = caps.get(1).map(|g| g.end()).unwrap_or(whole.end());

        pos = if resume > pos {
            resume
        } else {
            // Zero-width progress: step over one character.
            text[pos..]
                .chars()
                .next()
                .map(|c| pos + c.len_utf8())
                .unwrap_or(text.len() + 1)
        };

        Some(caps)
    })
}
