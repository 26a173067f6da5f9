use std::collections::VecDeque;

use chrono::TimeZone;

use crate::history::{self, TransactionFilter};
use crate::models::{FilterOptions, PaginationOptions, Transaction, TransactionPage};

/// Append-only record of past conversions, newest first.
#[derive(Debug, Default)]
pub struct Ledger {
    transactions: VecDeque<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, transaction: Transaction) {
        self.transactions.push_front(transaction);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn query<Tz: TimeZone>(
        &self,
        filters: &FilterOptions,
        pagination: PaginationOptions,
        tz: &Tz,
    ) -> TransactionPage {
        let filter = TransactionFilter::resolve(filters, tz);
        history::paginate(&self.transactions, &filter, pagination)
    }
}
