use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::models::{
    Currency, FilterOptions, PaginationOptions, Transaction, TransactionPage, DEFAULT_PAGE,
    DEFAULT_PAGE_SIZE,
};

/// `FilterOptions` resolved against a time zone, ready to test transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub from_currency: Option<Currency>,
    pub to_currency: Option<Currency>,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl TransactionFilter {
    /// Date bounds become local midnight and local 23:59:59.999 of their day.
    pub fn resolve<Tz: TimeZone>(filters: &FilterOptions, tz: &Tz) -> Self {
        Self {
            from_currency: filters.from_currency,
            to_currency: filters.to_currency,
            not_before: filters.date_from.map(|date| start_of_day(date, tz)),
            not_after: filters.date_to.map(|date| end_of_day(date, tz)),
            min_amount: amount_bound(filters.min_amount),
            max_amount: amount_bound(filters.max_amount),
        }
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.from_currency
            .map_or(true, |currency| transaction.from_currency == currency)
            && self
                .to_currency
                .map_or(true, |currency| transaction.to_currency == currency)
            && self
                .not_before
                .map_or(true, |bound| transaction.timestamp >= bound)
            && self
                .not_after
                .map_or(true, |bound| transaction.timestamp <= bound)
            && self
                .min_amount
                .map_or(true, |bound| transaction.from_amount >= bound)
            && self
                .max_amount
                .map_or(true, |bound| transaction.from_amount <= bound)
    }
}

// A zero bound counts as unset, so `minAmount=0` cannot express "floor of zero".
fn amount_bound(value: Option<f64>) -> Option<f64> {
    value.filter(|bound| *bound != 0.0 && !bound.is_nan())
}

fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    to_utc(date.and_time(NaiveTime::MIN), tz, true)
}

fn end_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    to_utc(date.and_time(last_milli), tz, false)
}

fn to_utc<Tz: TimeZone>(local: NaiveDateTime, tz: &Tz, earliest: bool) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => instant.with_timezone(&Utc),
        LocalResult::Ambiguous(first, second) => {
            let (first, second) = (first.with_timezone(&Utc), second.with_timezone(&Utc));
            if earliest {
                first.min(second)
            } else {
                first.max(second)
            }
        }
        // Wall clock skipped this instant; an hour either side is still on the same day.
        LocalResult::None => {
            let shifted = if earliest {
                local + chrono::Duration::hours(1)
            } else {
                local - chrono::Duration::hours(1)
            };
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|instant| instant.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&local))
        }
    }
}

/// Falls back to the defaults for a zero page or page size.
pub fn normalize(pagination: PaginationOptions) -> (usize, usize) {
    let page = if pagination.page == 0 {
        DEFAULT_PAGE
    } else {
        pagination.page
    };
    let page_size = if pagination.page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        pagination.page_size
    };

    (page, page_size)
}

/// Narrows `transactions` (already newest-first) and slices the requested page.
///
/// Totals are computed from the filtered count. A page past the end yields an
/// empty slice.
pub fn paginate<'a, I>(
    transactions: I,
    filter: &TransactionFilter,
    pagination: PaginationOptions,
) -> TransactionPage
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (page, page_size) = normalize(pagination);
    let start = (page - 1).saturating_mul(page_size);

    let mut total_items = 0;
    let mut window = Vec::with_capacity(page_size.min(64));

    for transaction in transactions.into_iter().filter(|t| filter.matches(t)) {
        if total_items >= start && window.len() < page_size {
            window.push(transaction.clone());
        }
        total_items += 1;
    }

    TransactionPage {
        transactions: window,
        pagination: PaginationOptions {
            page,
            page_size,
            total_items,
            total_pages: total_items.div_ceil(page_size),
        },
    }
}
