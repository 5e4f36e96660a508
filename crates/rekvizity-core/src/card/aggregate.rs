//! Record-level statistics.

use crate::models::company::ExtractedCompanyData;

/// Fill `extracted_fields_count` and `overall_confidence` from present fields.
pub fn aggregate(data: &mut ExtractedCompanyData) {
    let (count, sum) = data
        .present_fields()
        .fold((0usize, 0u32), |(n, s), (_, f)| (n + 1, s + f.confidence as u32));

    data.extracted_fields_count = count;
    data.overall_confidence = if count == 0 {
        0
    } else {
        (sum as f64 / count as f64).round() as u8
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::{ExtractedField, FieldSource, FieldType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_record() {
        let mut data = ExtractedCompanyData::default();
        aggregate(&mut data);
        assert_eq!(data.extracted_fields_count, 0);
        assert_eq!(data.overall_confidence, 0);
    }

    #[test]
    fn test_mean_is_rounded() {
        let mut data = ExtractedCompanyData::default();
        data.set(FieldType::Inn, Some(ExtractedField::new("7701234567", 95, FieldSource::Primary)));
        data.set(FieldType::Kpp, Some(ExtractedField::new("770101001", 90, FieldSource::Primary)));
        aggregate(&mut data);

        assert_eq!(data.extracted_fields_count, 2);
        assert_eq!(data.overall_confidence, 93);
    }
}
