//! Company card data model: extracted fields and their provenance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Highest confidence a field can carry.
pub const MAX_CONFIDENCE: u8 = 99;

/// The requisite fields of a company card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    /// Short company name (without legal form).
    CompanyName,
    /// Full legal name including the legal form.
    LegalName,
    /// Taxpayer identification number (ИНН).
    Inn,
    /// Tax registration reason code (КПП).
    Kpp,
    /// Primary state registration number (ОГРН / ОГРНИП).
    Ogrn,
    /// Bank name.
    BankName,
    /// Settlement account (расчётный счёт).
    BankAccount,
    /// Correspondent account (корреспондентский счёт).
    CorrAccount,
    /// Bank identification code (БИК).
    BankBik,
    /// Contact phone.
    Phone,
    /// Contact email.
    Email,
    /// Legal address.
    Address,
    /// Director / head of the organisation.
    Director,
}

impl FieldType {
    /// All fields, in extraction order.
    pub const ALL: [FieldType; 13] = [
        FieldType::Inn,
        FieldType::Kpp,
        FieldType::Ogrn,
        FieldType::CompanyName,
        FieldType::LegalName,
        FieldType::BankName,
        FieldType::BankAccount,
        FieldType::BankBik,
        FieldType::CorrAccount,
        FieldType::Phone,
        FieldType::Email,
        FieldType::Address,
        FieldType::Director,
    ];

    /// Stable field name, as used in serialized output.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::CompanyName => "companyName",
            FieldType::LegalName => "legalName",
            FieldType::Inn => "inn",
            FieldType::Kpp => "kpp",
            FieldType::Ogrn => "ogrn",
            FieldType::BankName => "bankName",
            FieldType::BankAccount => "bankAccount",
            FieldType::CorrAccount => "corrAccount",
            FieldType::BankBik => "bankBik",
            FieldType::Phone => "phone",
            FieldType::Email => "email",
            FieldType::Address => "address",
            FieldType::Director => "director",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field: {}", s))
    }
}

/// How a field value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    /// Found by one of the top-ranked, label-anchored patterns.
    Primary,
    /// Found by a mid-ranked pattern or derived from context.
    Secondary,
    /// Found by a last-resort shape pattern, or repaired during post-processing.
    #[serde(alias = "fallback")]
    Reconstructed,
}

/// A single extracted field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    /// Cleaned, validated value. Never empty.
    pub value: String,

    /// Confidence in 0..=99.
    pub confidence: u8,

    /// Provenance of the value.
    pub source: FieldSource,

    /// Candidates that matched but failed validation (diagnostics only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl ExtractedField {
    /// Create a field; confidence is capped at [`MAX_CONFIDENCE`].
    pub fn new(value: impl Into<String>, confidence: u8, source: FieldSource) -> Self {
        Self {
            value: value.into(),
            confidence: confidence.min(MAX_CONFIDENCE),
            source,
            alternatives: Vec::new(),
        }
    }

    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Raise confidence by `delta`, never past `ceiling` (itself capped at 99).
    pub fn bump_confidence(&mut self, delta: u8, ceiling: u8) {
        let ceiling = ceiling.min(MAX_CONFIDENCE);
        self.confidence = self.confidence.saturating_add(delta).min(ceiling);
    }
}

/// Structured company requisites extracted from one card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedCompanyData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpp: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ogrn: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub corr_account: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_bik: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<ExtractedField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<ExtractedField>,

    /// Rounded mean confidence over present fields, 0 when none are present.
    pub overall_confidence: u8,

    /// Number of present fields.
    pub extracted_fields_count: usize,
}

impl ExtractedCompanyData {
    fn slot(&self, field: FieldType) -> &Option<ExtractedField> {
        match field {
            FieldType::CompanyName => &self.company_name,
            FieldType::LegalName => &self.legal_name,
            FieldType::Inn => &self.inn,
            FieldType::Kpp => &self.kpp,
            FieldType::Ogrn => &self.ogrn,
            FieldType::BankName => &self.bank_name,
            FieldType::BankAccount => &self.bank_account,
            FieldType::CorrAccount => &self.corr_account,
            FieldType::BankBik => &self.bank_bik,
            FieldType::Phone => &self.phone,
            FieldType::Email => &self.email,
            FieldType::Address => &self.address,
            FieldType::Director => &self.director,
        }
    }

    fn slot_mut(&mut self, field: FieldType) -> &mut Option<ExtractedField> {
        match field {
            FieldType::CompanyName => &mut self.company_name,
            FieldType::LegalName => &mut self.legal_name,
            FieldType::Inn => &mut self.inn,
            FieldType::Kpp => &mut self.kpp,
            FieldType::Ogrn => &mut self.ogrn,
            FieldType::BankName => &mut self.bank_name,
            FieldType::BankAccount => &mut self.bank_account,
            FieldType::CorrAccount => &mut self.corr_account,
            FieldType::BankBik => &mut self.bank_bik,
            FieldType::Phone => &mut self.phone,
            FieldType::Email => &mut self.email,
            FieldType::Address => &mut self.address,
            FieldType::Director => &mut self.director,
        }
    }

    pub fn get(&self, field: FieldType) -> Option<&ExtractedField> {
        self.slot(field).as_ref()
    }

    pub fn get_mut(&mut self, field: FieldType) -> Option<&mut ExtractedField> {
        self.slot_mut(field).as_mut()
    }

    /// Value of a field, if present.
    pub fn value(&self, field: FieldType) -> Option<&str> {
        self.get(field).map(|f| f.value.as_str())
    }

    pub fn set(&mut self, field: FieldType, value: Option<ExtractedField>) {
        *self.slot_mut(field) = value;
    }

    pub fn take(&mut self, field: FieldType) -> Option<ExtractedField> {
        self.slot_mut(field).take()
    }

    pub fn is_present(&self, field: FieldType) -> bool {
        self.slot(field).is_some()
    }

    /// Present fields, in extraction order.
    pub fn present_fields(&self) -> impl Iterator<Item = (FieldType, &ExtractedField)> {
        FieldType::ALL
            .into_iter()
            .filter_map(move |f| self.get(f).map(|v| (f, v)))
    }

    /// Fields that were not found, in extraction order.
    pub fn missing_fields(&self) -> Vec<FieldType> {
        FieldType::ALL
            .into_iter()
            .filter(|f| !self.is_present(*f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_names_roundtrip() {
        for field in FieldType::ALL {
            assert_eq!(field.name().parse::<FieldType>(), Ok(field));
        }
        assert!("website".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_confidence_is_capped() {
        let mut field = ExtractedField::new("7701234567", 150, FieldSource::Primary);
        assert_eq!(field.confidence, 99);

        field.confidence = 90;
        field.bump_confidence(10, 95);
        assert_eq!(field.confidence, 95);

        field.bump_confidence(200, 120);
        assert_eq!(field.confidence, 99);
    }

    #[test]
    fn test_serialized_shape() {
        let mut data = ExtractedCompanyData::default();
        data.set(
            FieldType::BankBik,
            Some(ExtractedField::new("044525225", 95, FieldSource::Primary)),
        );

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["bankBik"]["value"], "044525225");
        assert_eq!(json["bankBik"]["source"], "primary");
        assert!(json.get("inn").is_none());
        assert!(json["bankBik"].get("alternatives").is_none());
        assert_eq!(json["overallConfidence"], 0);
    }

    #[test]
    fn test_fallback_alias_deserializes() {
        let field: ExtractedField =
            serde_json::from_str(r#"{"value":"x","confidence":50,"source":"fallback"}"#).unwrap();
        assert_eq!(field.source, FieldSource::Reconstructed);
    }

    #[test]
    fn test_present_and_missing_fields() {
        let mut data = ExtractedCompanyData::default();
        data.set(
            FieldType::Email,
            Some(ExtractedField::new("info@partner.ru", 90, FieldSource::Primary)),
        );

        let present: Vec<_> = data.present_fields().map(|(f, _)| f).collect();
        assert_eq!(present, vec![FieldType::Email]);
        assert_eq!(data.missing_fields().len(), 12);

        assert!(data.take(FieldType::Email).is_some());
        assert!(!data.is_present(FieldType::Email));
    }
}
