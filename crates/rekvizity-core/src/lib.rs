//! Core library for Russian company card extraction.
//!
//! This crate provides:
//! - A pattern library of ranked regex matchers per requisite field
//! - Field extraction with per-field cleaning, validation and confidence scoring
//! - Cross-field post-processing (INN/KPP blocks, bank names, account disambiguation)
//! - A reference-card regression harness for pattern changes

pub mod error;
pub mod models;
pub mod card;
pub mod regression;

pub use error::{RekvizityError, Result};
pub use models::company::{ExtractedCompanyData, ExtractedField, FieldSource, FieldType};
pub use models::config::{ExtractionConfig, OutputConfig, OutputFormat, RekvizityConfig};
pub use card::{extract_company_data, CardExtractor, CompanyExtractor};
pub use card::rules::patterns::PATTERN_LIBRARY_VERSION;
