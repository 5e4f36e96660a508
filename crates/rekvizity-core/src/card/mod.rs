//! Company card requisites extraction.

mod aggregate;
mod extractor;
mod field;
mod postprocess;
pub mod rules;

pub use aggregate::aggregate;
pub use extractor::CardExtractor;
pub use field::extract_field;
pub use postprocess::{bank_by_bik, format_phone};
pub use rules::{clean_value, validate_value};

use crate::models::company::ExtractedCompanyData;

/// Trait for company card extractors.
pub trait CompanyExtractor {
    /// Extract requisites from OCR text. Never fails: fields that cannot be
    /// found are simply absent.
    fn extract(&self, text: &str) -> ExtractedCompanyData;
}

/// Extract requisites with the default extractor.
pub fn extract_company_data(text: &str) -> ExtractedCompanyData {
    CardExtractor::new().extract(text)
}
