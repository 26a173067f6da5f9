use crate::error::{ExchangeError, Result};
use crate::models::{ConversionRequest, ConversionResult, CurrencyRate};

/// Rounds to two decimal places, ties away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts `request` at `rate`, in either direction of the stored pair.
pub fn convert(request: &ConversionRequest, rate: &CurrencyRate) -> Result<ConversionResult> {
    let converted = if request.from_currency == rate.from_currency
        && request.to_currency == rate.to_currency
    {
        request.amount * rate.rate
    } else if request.from_currency == rate.to_currency
        && request.to_currency == rate.from_currency
    {
        request.amount / rate.rate
    } else {
        return Err(ExchangeError::InvalidPair);
    };

    let to_amount = round2(converted);
    if !to_amount.is_finite() {
        return Err(ExchangeError::Validation(
            "Valor convertido fora do intervalo suportado".to_string(),
        ));
    }

    if to_amount == 0.0 {
        return Err(ExchangeError::ResultTooSmall);
    }

    Ok(ConversionResult {
        from_amount: request.amount,
        to_amount,
        rate: rate.rate,
        from_currency: request.from_currency,
        to_currency: request.to_currency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency::{OuroReal, Tibar};
    use crate::models::{Currency, INITIAL_RATE};

    fn request(from: Currency, to: Currency, amount: f64) -> ConversionRequest {
        ConversionRequest {
            from_currency: from,
            to_currency: to,
            amount,
        }
    }

    fn rate() -> CurrencyRate {
        CurrencyRate::ouro_real_to_tibar(INITIAL_RATE)
    }

    #[test]
    fn forward_direction_multiplies() {
        let result = convert(&request(OuroReal, Tibar, 100.0), &rate()).unwrap();
        assert_eq!(result.to_amount, 250.0);
        assert_eq!(result.from_amount, 100.0);
        assert_eq!(result.rate, 2.5);
        assert_eq!(result.from_currency, OuroReal);
        assert_eq!(result.to_currency, Tibar);
    }

    #[test]
    fn reverse_direction_divides() {
        let result = convert(&request(Tibar, OuroReal, 5.0), &rate()).unwrap();
        assert_eq!(result.to_amount, 2.0);
    }

    #[test]
    fn result_is_rounded_to_cents() {
        let result = convert(&request(Tibar, OuroReal, 10.0), &rate()).unwrap();
        assert_eq!(result.to_amount, 4.0);

        let mut odd = rate();
        odd.rate = 3.0;
        let result = convert(&request(Tibar, OuroReal, 10.0), &odd).unwrap();
        assert_eq!(result.to_amount, 3.33);
        assert_eq!(result.rate, 3.0);
    }

    #[test]
    fn round2_breaks_ties_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(1.0 / 3.0), 0.33);
    }

    #[test]
    fn tiny_results_are_rejected() {
        let result = convert(&request(Tibar, OuroReal, 0.01), &rate());
        assert!(matches!(result, Err(ExchangeError::ResultTooSmall)));
    }

    #[test]
    fn overflowing_results_are_rejected() {
        let mut tiny = rate();
        tiny.rate = 1e-320;
        let result = convert(&request(Tibar, OuroReal, 1.0), &tiny);
        assert!(matches!(result, Err(ExchangeError::Validation(_))));

        let mut huge = rate();
        huge.rate = f64::MAX;
        let result = convert(&request(OuroReal, Tibar, 9999.99), &huge);
        assert!(matches!(result, Err(ExchangeError::Validation(_))));
    }

    #[test]
    fn unknown_pairs_are_rejected() {
        for (from, to) in [(OuroReal, OuroReal), (Tibar, Tibar)] {
            let result = convert(&request(from, to, 10.0), &rate());
            assert!(matches!(result, Err(ExchangeError::InvalidPair)));
        }
    }
}
