use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::activity::ActivityTracker;
use crate::config::{Config, Latency};
use crate::conversion;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::models::{
    ConversionRequest, ConversionResult, CurrencyRate, FilterOptions, PaginationOptions,
    Transaction, TransactionPage, INITIAL_RATE,
};
use crate::rates::RateStore;

/// Sole owner of the exchange rate and the transaction ledger.
///
/// Cloning is cheap and every clone shares the same state. Mutating
/// operations run on their own task, so a caller that stops waiting does not
/// undo an update or a conversion already in progress.
#[derive(Clone)]
pub struct CurrencyService {
    inner: Arc<Inner>,
}

struct Inner {
    rates: RateStore,
    ledger: Mutex<Ledger>,
    latency: Latency,
    activity: ActivityTracker,
}

impl CurrencyService {
    pub fn new(config: &Config) -> Self {
        Self::with_rate(config.initial_rate, config.latency)
    }

    pub fn with_latency(latency: Latency) -> Self {
        Self::with_rate(INITIAL_RATE, latency)
    }

    fn with_rate(rate: f64, latency: Latency) -> Self {
        Self {
            inner: Arc::new(Inner {
                rates: RateStore::new(CurrencyRate::ouro_real_to_tibar(rate)),
                ledger: Mutex::new(Ledger::new()),
                latency,
                activity: ActivityTracker::new(),
            }),
        }
    }

    pub fn current_rate(&self) -> CurrencyRate {
        self.inner.rates.current()
    }

    pub fn subscribe_rate(&self) -> watch::Receiver<CurrencyRate> {
        self.inner.rates.subscribe()
    }

    /// `true` while at least one operation is waiting to complete.
    pub fn subscribe_activity(&self) -> watch::Receiver<bool> {
        self.inner.activity.subscribe()
    }

    pub async fn update_rate(&self, new_rate: f64) -> Result<CurrencyRate> {
        let guard = self.inner.activity.begin();
        let inner = self.inner.clone();

        let task = tokio::spawn(async move {
            let _guard = guard;
            simulate_latency(inner.latency.rate_update).await;

            match inner.rates.update(new_rate) {
                Ok(updated) => {
                    tracing::info!(rate = updated.rate, "exchange rate updated");
                    Ok(updated)
                }
                Err(error) => {
                    tracing::warn!(rate = new_rate, %error, "rate update rejected");
                    Err(error)
                }
            }
        });

        task.await?
    }

    pub async fn convert(&self, request: ConversionRequest) -> Result<ConversionResult> {
        if let Err(error) = request.validate() {
            tracing::warn!(?request, %error, "conversion request rejected");
            return Err(error);
        }

        let guard = self.inner.activity.begin();
        let inner = self.inner.clone();

        let task = tokio::spawn(async move {
            let _guard = guard;
            simulate_latency(inner.latency.conversion).await;
            inner.record_conversion(&request).await
        });

        task.await?
    }

    pub async fn query_transactions(
        &self,
        filters: &FilterOptions,
        pagination: PaginationOptions,
    ) -> TransactionPage {
        let _guard = self.inner.activity.begin();
        simulate_latency(self.inner.latency.history).await;

        let page = self
            .inner
            .ledger
            .lock()
            .await
            .query(filters, pagination, &Local);

        tracing::debug!(
            page = page.pagination.page,
            returned = page.transactions.len(),
            total_items = page.pagination.total_items,
            "transaction history queried"
        );

        page
    }

    pub async fn transaction_count(&self) -> usize {
        self.inner.ledger.lock().await.len()
    }
}

impl Inner {
    // The rate is read while the ledger is held, so each conversion uses the
    // rate current at its own completion and appends exactly once.
    async fn record_conversion(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        let mut ledger = self.ledger.lock().await;
        let rate = self.rates.current();

        let result = match conversion::convert(request, &rate) {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(?request, rate = rate.rate, %error, "conversion rejected");
                return Err(error);
            }
        };

        let transaction = Transaction {
            id: format!("TXN-{}", Uuid::now_v7()),
            from_currency: result.from_currency,
            to_currency: result.to_currency,
            from_amount: result.from_amount,
            to_amount: result.to_amount,
            rate: rate.rate,
            timestamp: Utc::now(),
        };

        tracing::info!(
            id = %transaction.id,
            from = %transaction.from_currency,
            to = %transaction.to_currency,
            from_amount = transaction.from_amount,
            to_amount = transaction.to_amount,
            rate = transaction.rate,
            "conversion recorded"
        );
        ledger.append(transaction);

        Ok(result)
    }
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
