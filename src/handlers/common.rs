use crate::config::AppConfig;
use crate::entities::{account::AccountKind, payment::PaymentMethod};
use crate::errors::ApiError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Tenant selector carried on every business route as a query parameter.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, IntoParams)]
pub struct TenantParams {
    /// Owning tenant of the rows being read or written
    pub user_id: Uuid,
}

/// Pagination parameters for list operations
#[derive(Debug, Clone, Copy, Deserialize, Serialize, IntoParams)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Resolves raw query values against the configured page sizes: omitted
    /// values fall back to the configured defaults, the result is clamped.
    pub fn resolve(cfg: &AppConfig, page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
        Self {
            page: page.unwrap_or_else(default_page),
            per_page: per_page.unwrap_or(cfg.api_default_page_size),
        }
        .clamped(cfg.api_max_page_size)
    }

    /// Normalizes the raw query values: page floors at 1, per_page stays
    /// within 1..=max.
    pub fn clamped(&self, max_per_page: u64) -> (u64, u64) {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, max_per_page.max(1));
        (page, per_page)
    }
}

pub fn default_page() -> u64 {
    1
}

pub fn default_per_page() -> u64 {
    20
}

pub fn default_unit() -> String {
    "adet".to_string()
}

pub fn default_vat_rate() -> Decimal {
    dec!(20)
}

pub fn default_currency() -> String {
    "TRY".to_string()
}

pub fn default_account_kind() -> String {
    AccountKind::Kasa.to_string()
}

pub fn default_true() -> bool {
    true
}

/// Validate request input, turning violations into a 422 that names every
/// failing field.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input.validate().map_err(ApiError::from)
}

pub fn validate_min_zero(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("min_zero");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some("must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}

/// Money amounts people actually pay: at least one kuruş.
pub fn validate_payment_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < dec!(0.01) {
        let mut err = ValidationError::new("payment_amount");
        err.message = Some("must be at least 0.01".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_vat_rate(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > dec!(100) {
        let mut err = ValidationError::new("vat_rate");
        err.message = Some("must be between 0 and 100".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_payment_method(value: &str) -> Result<(), ValidationError> {
    if PaymentMethod::from_str(value).is_err() {
        let mut err = ValidationError::new("payment_method");
        err.message = Some("must be one of nakit, kredi_karti, havale".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_account_kind(value: &str) -> Result<(), ValidationError> {
    if AccountKind::from_str(value).is_err() {
        let mut err = ValidationError::new("account_kind");
        err.message = Some("must be one of kasa, banka".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let params = PaginationParams { page: 0, per_page: 5000 };
        assert_eq!(params.clamped(100), (1, 100));

        let params = PaginationParams { page: 3, per_page: 0 };
        assert_eq!(params.clamped(100), (3, 1));

        let params = PaginationParams::default();
        assert_eq!(params.clamped(100), (1, 20));
    }

    #[test]
    fn pagination_resolve_uses_configured_defaults() {
        let cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            0,
            "development".into(),
        );
        assert_eq!(PaginationParams::resolve(&cfg, None, None), (1, 20));
        assert_eq!(PaginationParams::resolve(&cfg, Some(4), Some(50)), (4, 50));
        assert_eq!(PaginationParams::resolve(&cfg, Some(0), Some(5000)), (1, 100));
    }

    #[test]
    fn payment_methods_match_the_wire_vocabulary() {
        for method in ["nakit", "kredi_karti", "havale"] {
            assert!(validate_payment_method(method).is_ok(), "{method}");
        }
        for method in ["cheque", "cash", "NAKIT", ""] {
            assert!(validate_payment_method(method).is_err(), "{method}");
        }
    }

    #[test]
    fn account_kinds_match_the_wire_vocabulary() {
        assert!(validate_account_kind("kasa").is_ok());
        assert!(validate_account_kind("banka").is_ok());
        assert!(validate_account_kind("cash").is_err());
    }

    #[test]
    fn payment_amount_floor_is_one_kurus() {
        assert!(validate_payment_amount(&dec!(0)).is_err());
        assert!(validate_payment_amount(&dec!(0.009)).is_err());
        assert!(validate_payment_amount(&dec!(0.01)).is_ok());
    }

    #[test]
    fn vat_rate_stays_within_percent_bounds() {
        assert!(validate_vat_rate(&dec!(0)).is_ok());
        assert!(validate_vat_rate(&dec!(20)).is_ok());
        assert!(validate_vat_rate(&dec!(100)).is_ok());
        assert!(validate_vat_rate(&dec!(-1)).is_err());
        assert!(validate_vat_rate(&dec!(100.5)).is_err());
    }

    #[test]
    fn defaults_match_the_turkish_back_office() {
        assert_eq!(default_unit(), "adet");
        assert_eq!(default_vat_rate(), dec!(20));
        assert_eq!(default_currency(), "TRY");
        assert_eq!(default_account_kind(), "kasa");
    }
}
