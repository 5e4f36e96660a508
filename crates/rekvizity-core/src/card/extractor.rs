//! Rule-based company card extractor.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::company::{ExtractedCompanyData, FieldType};
use crate::models::config::ExtractionConfig;

use super::aggregate::aggregate;
use super::field::extract_field;
use super::postprocess::post_process;
use super::rules::patterns::patterns_for;
use super::CompanyExtractor;

/// Extracts requisites from OCR text of a Russian company card.
#[derive(Debug, Clone, Default)]
pub struct CardExtractor {
    config: ExtractionConfig,
}

impl CardExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor from a loaded configuration section.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Render phones as `+7 (XXX) XXX-XX-XX`.
    pub fn with_phone_formatting(mut self, enabled: bool) -> Self {
        self.config.format_phone = enabled;
        self
    }

    /// Keep rejected candidates on accepted fields.
    pub fn with_alternatives(mut self, enabled: bool) -> Self {
        self.config.keep_alternatives = enabled;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }
}

impl CompanyExtractor for CardExtractor {
    fn extract(&self, text: &str) -> ExtractedCompanyData {
        let start = clock();
        let mut data = ExtractedCompanyData::default();

        for field in FieldType::ALL {
            let mut found = extract_field(text, field, patterns_for(field));
            if !self.config.keep_alternatives {
                if let Some(f) = found.as_mut() {
                    f.alternatives.clear();
                }
            }
            data.set(field, found);
        }
        debug!("field pass found {} fields", data.present_fields().count());

        post_process(&mut data, text, &self.config);
        aggregate(&mut data);

        match start {
            Some(start) => info!(
                "Extracted {} fields (confidence {}) in {}ms",
                data.extracted_fields_count,
                data.overall_confidence,
                start.elapsed().as_millis()
            ),
            None => info!(
                "Extracted {} fields (confidence {})",
                data.extracted_fields_count, data.overall_confidence
            ),
        }

        data
    }
}

/// Start of a timed extraction. `wasm32-unknown-unknown` has no clock and
/// panics on `Instant::now`.
#[cfg(not(target_arch = "wasm32"))]
fn clock() -> Option<Instant> {
    Some(Instant::now())
}

#[cfg(target_arch = "wasm32")]
fn clock() -> Option<Instant> {
    None
}
