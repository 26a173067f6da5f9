use tokio::sync::watch;

use crate::error::{ExchangeError, Result};
use crate::models::CurrencyRate;

/// Holds the single current exchange rate.
///
/// The rate is replaced wholesale on every update and pushed to subscribers.
/// A new subscriber sees only the most recent rate, never older ones.
pub struct RateStore {
    current: watch::Sender<CurrencyRate>,
}

impl RateStore {
    pub fn new(initial: CurrencyRate) -> Self {
        let (current, _receiver) = watch::channel(initial);
        Self { current }
    }

    pub fn current(&self) -> CurrencyRate {
        self.current.borrow().clone()
    }

    pub fn update(&self, new_rate: f64) -> Result<CurrencyRate> {
        if !new_rate.is_finite() || new_rate <= 0.0 {
            return Err(ExchangeError::InvalidRate);
        }

        let updated = CurrencyRate::ouro_real_to_tibar(new_rate);
        self.current.send_replace(updated.clone());

        Ok(updated)
    }

    pub fn subscribe(&self) -> watch::Receiver<CurrencyRate> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, CURRENT_RATE_ID, INITIAL_RATE};

    fn store() -> RateStore {
        RateStore::new(CurrencyRate::ouro_real_to_tibar(INITIAL_RATE))
    }

    #[test]
    fn positive_rates_replace_the_current_one() {
        let store = store();

        for rate in [0.01, 1.0, 2.75, 9999.99, 123_456.0] {
            let updated = store.update(rate).unwrap();
            assert_eq!(updated.rate, rate);
            assert_eq!(store.current().rate, rate);
            assert_eq!(store.current().id, CURRENT_RATE_ID);
            assert_eq!(store.current().from_currency, Currency::OuroReal);
            assert_eq!(store.current().to_currency, Currency::Tibar);
        }
    }

    #[test]
    fn non_positive_rates_leave_the_store_untouched() {
        let store = store();
        let before = store.current();

        for rate in [0.0, -0.01, -3.0, f64::NAN, f64::NEG_INFINITY] {
            assert!(matches!(store.update(rate), Err(ExchangeError::InvalidRate)));
        }

        assert_eq!(store.current(), before);
    }

    #[test]
    fn subscribers_see_latest_value_and_updates() {
        let store = store();
        store.update(3.0).unwrap();

        let mut receiver = store.subscribe();
        assert_eq!(receiver.borrow_and_update().rate, 3.0);
        assert!(!receiver.has_changed().unwrap());

        store.update(4.0).unwrap();
        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().rate, 4.0);

        store.update(-1.0).unwrap_err();
        assert!(!receiver.has_changed().unwrap());
    }

    #[test]
    fn dropping_a_subscriber_does_not_affect_updates() {
        let store = store();
        drop(store.subscribe());

        assert_eq!(store.update(5.0).unwrap().rate, 5.0);
        assert_eq!(store.current().rate, 5.0);
    }
}
