//! WASM bindings for Russian company card requisites extraction.
//!
//! Lets the browser form that consumes extraction results call the engine directly.

use wasm_bindgen::prelude::*;

use rekvizity_core::card::{bank_by_bik, clean_value, format_phone, validate_value};
use rekvizity_core::{
    CardExtractor as Engine, CompanyExtractor, ExtractedCompanyData, FieldType,
    PATTERN_LIBRARY_VERSION,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Crate and pattern library version, e.g. `0.1.0 (patterns 2.5.0)`.
#[wasm_bindgen]
pub fn version() -> String {
    format!(
        "{} (patterns {})",
        env!("CARGO_PKG_VERSION"),
        PATTERN_LIBRARY_VERSION
    )
}

/// Extract requisites from OCR text with default settings.
#[wasm_bindgen]
pub fn extract_company_data(text: &str) -> Result<JsValue, JsValue> {
    to_js(&rekvizity_core::extract_company_data(text))
}

/// Check a single value typed into a form field.
///
/// `name` is the camelCase field name (`inn`, `bankBik`, ...). Unknown names
/// are never valid.
#[wasm_bindgen]
pub fn validate_field(name: &str, value: &str) -> bool {
    let Ok(field) = name.parse::<FieldType>() else {
        return false;
    };
    let cleaned = clean_value(value, field);
    validate_value(&cleaned, field, value)
}

/// Render a Russian phone number as `+7 (XXX) XXX-XX-XX`.
#[wasm_bindgen]
pub fn format_phone_number(value: &str) -> Option<String> {
    format_phone(value)
}

/// Bank name for a well-known BIK.
#[wasm_bindgen]
pub fn bank_name_for_bik(bik: &str) -> Option<String> {
    bank_by_bik(bik).map(str::to_string)
}

/// Company card extractor class for browser use.
#[wasm_bindgen]
pub struct CardExtractor {
    engine: Engine,
}

#[wasm_bindgen]
impl CardExtractor {
    /// Create an extractor with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
        }
    }

    /// Render phones as `+7 (XXX) XXX-XX-XX` (default) or keep `+7XXXXXXXXXX`.
    #[wasm_bindgen]
    pub fn set_format_phone(&mut self, enabled: bool) {
        self.engine = self.engine.clone().with_phone_formatting(enabled);
    }

    /// Keep rejected candidates on accepted fields.
    #[wasm_bindgen]
    pub fn set_keep_alternatives(&mut self, enabled: bool) {
        self.engine = self.engine.clone().with_alternatives(enabled);
    }

    /// Extract requisites from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.engine.extract(text))
    }

    /// Extract requisites and return them as a JSON string.
    #[wasm_bindgen]
    pub fn extract_json(&self, text: &str) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.extract(text))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for CardExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js(data: &ExtractedCompanyData) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(data).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_validate_field() {
        assert!(validate_field("inn", "7707083893"));
        assert!(validate_field("bankBik", "044525225"));
        assert!(!validate_field("kpp", "12345"));
        assert!(!validate_field("noSuchField", "7707083893"));
    }

    #[wasm_bindgen_test]
    fn test_format_phone_number() {
        assert_eq!(
            format_phone_number("89001234567"),
            Some("+7 (900) 123-45-67".to_string())
        );
        assert_eq!(format_phone_number("123"), None);
    }

    #[wasm_bindgen_test]
    fn test_extract_json() {
        let mut extractor = CardExtractor::new();
        extractor.set_format_phone(false);
        let json = extractor.extract_json("Телефон: 8 (495) 123-45-67").unwrap();
        assert!(json.contains("+74951234567"));
    }

    #[wasm_bindgen_test]
    fn test_extract_without_system_clock() {
        let extractor = CardExtractor::new();
        let json = extractor
            .extract_json("ООО \"ПАРТНЕР\"\nИНН / КПП: 9716000221 / 971601419")
            .unwrap();
        assert!(json.contains("9716000221"));
        assert!(json.contains("971601419"));
    }

    #[wasm_bindgen_test]
    fn test_version_reports_patterns() {
        assert!(version().contains(PATTERN_LIBRARY_VERSION));
    }
}
