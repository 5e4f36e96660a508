//! Cross-field corrections applied after per-field extraction.

mod accounts;
mod address;
mod bank;
mod inn_kpp;
mod name;
mod phone;

pub use bank::bank_by_bik;
pub use phone::format_phone;

use tracing::debug;

use crate::models::company::ExtractedCompanyData;
use crate::models::config::ExtractionConfig;

/// Run all corrections in order. Each step only touches the fields it owns.
pub fn post_process(data: &mut ExtractedCompanyData, text: &str, config: &ExtractionConfig) {
    inn_kpp::apply_combined_block(data, text);
    address::join_address_lines(data, text);
    bank::clean_bank_name(data);
    bank::recover_bik(data, text);
    phone::recover_phone(data, text);
    accounts::recover_accounts(data, text);
    name::upgrade_company_name(data, text);

    if config.format_phone {
        phone::format_phone_field(data);
    }

    accounts::enforce_distinct_accounts(data);
    debug!("post-processing done");
}
