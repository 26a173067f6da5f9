use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExchangeError, Result};

pub const CURRENT_RATE_ID: &str = "current-rate";
pub const INITIAL_RATE: f64 = 2.5;
pub const MAX_AMOUNT: f64 = 9999.99;
pub const MIN_RATE: f64 = 0.01;
pub const MAX_RATE: f64 = 9999.99;
pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    OuroReal,
    Tibar,
}

impl Currency {
    pub fn name(self) -> &'static str {
        match self {
            Currency::OuroReal => "Ouro Real",
            Currency::Tibar => "Tibar",
        }
    }

    /// The other side of the only supported pair.
    pub fn counterpart(self) -> Currency {
        match self {
            Currency::OuroReal => Currency::Tibar,
            Currency::Tibar => Currency::OuroReal,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multiplier converting one unit of `from_currency` into `to_currency`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRate {
    pub id: String,
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub rate: f64,
    pub last_updated: DateTime<Utc>,
}

impl CurrencyRate {
    /// Builds the record for the fixed Ouro Real -> Tibar pair, stamped now.
    pub fn ouro_real_to_tibar(rate: f64) -> Self {
        Self {
            id: CURRENT_RATE_ID.to_string(),
            from_currency: Currency::OuroReal,
            to_currency: Currency::Tibar,
            rate,
            last_updated: Utc::now(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub amount: f64,
}

impl ConversionRequest {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ExchangeError::Validation(
                "Valor deve ser maior que zero".to_string(),
            ));
        }

        if self.amount > MAX_AMOUNT {
            return Err(ExchangeError::Validation(format!(
                "Valor deve ser no máximo {MAX_AMOUNT}"
            )));
        }

        if self.from_currency == self.to_currency {
            return Err(ExchangeError::Validation(
                "As moedas de origem e destino devem ser diferentes".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub from_amount: f64,
    pub to_amount: f64,
    pub rate: f64,
    pub from_currency: Currency,
    pub to_currency: Currency,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub from_amount: f64,
    pub to_amount: f64,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

/// Optional predicates over the ledger. `None` means "no constraint".
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub from_currency: Option<Currency>,
    pub to_currency: Option<Currency>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOptions {
    pub page: usize,
    pub page_size: usize,
    #[serde(default)]
    pub total_items: usize,
    #[serde(default)]
    pub total_pages: usize,
}

impl PaginationOptions {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            total_items: 0,
            total_pages: 0,
        }
    }
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub pagination: PaginationOptions,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct RateUpdateRequest {
    pub rate: f64,
}

impl RateUpdateRequest {
    pub fn validate(&self) -> Result<()> {
        if self.rate > 0.0 && self.rate < MIN_RATE {
            return Err(ExchangeError::Validation(format!(
                "Taxa deve ser no mínimo {MIN_RATE}"
            )));
        }

        if self.rate > MAX_RATE {
            return Err(ExchangeError::Validation(format!(
                "Taxa deve ser no máximo {MAX_RATE}"
            )));
        }

        Ok(())
    }
}

/// Query string accepted by the history endpoint.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub from_currency: Option<Currency>,
    pub to_currency: Option<Currency>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl HistoryQuery {
    pub fn into_parts(self) -> (FilterOptions, PaginationOptions) {
        let filters = FilterOptions {
            from_currency: self.from_currency,
            to_currency: self.to_currency,
            date_from: self.date_from,
            date_to: self.date_to,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        };

        let pagination = PaginationOptions::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        );

        (filters, pagination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(from: Currency, to: Currency, amount: f64) -> ConversionRequest {
        ConversionRequest {
            from_currency: from,
            to_currency: to,
            amount,
        }
    }

    #[test]
    fn currency_names_and_counterparts() {
        assert_eq!(Currency::OuroReal.to_string(), "Ouro Real");
        assert_eq!(Currency::Tibar.name(), "Tibar");
        assert_eq!(Currency::OuroReal.counterpart(), Currency::Tibar);
        assert_eq!(Currency::Tibar.counterpart(), Currency::OuroReal);
    }

    #[test]
    fn currency_uses_screaming_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&Currency::OuroReal).unwrap(),
            "\"OURO_REAL\""
        );
        let parsed: Currency = serde_json::from_str("\"TIBAR\"").unwrap();
        assert_eq!(parsed, Currency::Tibar);
        assert!(serde_json::from_str::<Currency>("\"EURO\"").is_err());
    }

    #[test]
    fn rejects_non_positive_and_oversized_amounts() {
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY, 10_000.0] {
            let result = request(Currency::OuroReal, Currency::Tibar, amount).validate();
            assert!(matches!(result, Err(ExchangeError::Validation(_))), "{amount}");
        }

        assert!(request(Currency::OuroReal, Currency::Tibar, MAX_AMOUNT)
            .validate()
            .is_ok());
        assert!(request(Currency::Tibar, Currency::OuroReal, 0.01)
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_identical_currencies() {
        let result = request(Currency::Tibar, Currency::Tibar, 10.0).validate();
        assert!(matches!(result, Err(ExchangeError::Validation(_))));
    }

    #[test]
    fn rate_update_has_a_ceiling() {
        assert!(RateUpdateRequest { rate: MAX_RATE }.validate().is_ok());
        assert!(RateUpdateRequest { rate: 10_000.0 }.validate().is_err());
    }

    #[test]
    fn rate_update_has_a_floor() {
        assert!(RateUpdateRequest { rate: MIN_RATE }.validate().is_ok());
        for rate in [0.009, 1e-320] {
            let result = RateUpdateRequest { rate }.validate();
            assert!(matches!(result, Err(ExchangeError::Validation(_))), "{rate}");
        }
    }

    #[test]
    fn history_query_falls_back_to_default_page() {
        let (filters, pagination) = HistoryQuery {
            min_amount: Some(5.0),
            ..Default::default()
        }
        .into_parts();

        assert_eq!(filters.min_amount, Some(5.0));
        assert_eq!(pagination, PaginationOptions::default());
    }

    #[test]
    fn rate_serializes_in_camel_case() {
        let rate = CurrencyRate::ouro_real_to_tibar(2.5);
        let json = serde_json::to_value(&rate).unwrap();
        assert_eq!(json["id"], CURRENT_RATE_ID);
        assert_eq!(json["fromCurrency"], "OURO_REAL");
        assert!(json.get("lastUpdated").is_some());
    }

    #[test]
    fn transaction_serializes_in_camel_case() {
        let transaction = Transaction {
            id: "TXN-1".to_string(),
            from_currency: Currency::Tibar,
            to_currency: Currency::OuroReal,
            from_amount: 5.0,
            to_amount: 2.0,
            rate: 2.5,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&transaction).unwrap();
        assert_eq!(json["fromCurrency"], "TIBAR");
        assert_eq!(json["toCurrency"], "OURO_REAL");
        assert_eq!(json["fromAmount"], 5.0);
        assert_eq!(json["toAmount"], 2.0);
        assert!(json.get("timestamp").is_some());
        assert!(json.get("from_amount").is_none());
    }
}
