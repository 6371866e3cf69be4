//! Dashboard and report aggregation
//!
//! Pure functions over in-memory transactions and products. Amounts are
//! plain `f64` currency; no rounding is applied.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::Session;
use shared::models::{Product, Transaction};
use shared::util::{business_date, parse_date};

use crate::scope::{self, BranchScoped};
use crate::{ClientError, ClientResult, validation};

/// A record carrying a point in time
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for Transaction {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn timestamp(&self) -> DateTime<Utc> {
        (**self).timestamp()
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// One day of the revenue/transactions series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub count: u32,
    pub revenue: f64,
}

/// Units and revenue of a single product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub quantity: u64,
    pub revenue: f64,
}

/// Product ranked by revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedProduct {
    pub product_id: String,
    pub quantity: u64,
    pub revenue: f64,
}

/// Sales of one product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySale {
    pub category: String,
    pub quantity: u64,
    pub revenue: f64,
}

/// Headline numbers of a dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub revenue: f64,
    pub transactions: usize,
    pub items_sold: u64,
    pub average_ticket: f64,
    pub unique_customers: usize,
}

/// Stock overview
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    pub total_units: i64,
    pub stock_value: f64,
    /// Active products at or below the threshold, lowest stock first
    pub low_stock: Vec<String>,
}

/// Report filters as chosen on a report page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub branch_id: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub category: Option<String>,
}

impl ReportQuery {
    /// Build a query from raw filter fields; blank fields mean "no filter"
    pub fn from_params(
        branch_id: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
        category: Option<&str>,
    ) -> ClientResult<Self> {
        fn non_blank(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }

        fn date(value: Option<&str>, field: &str) -> ClientResult<Option<NaiveDate>> {
            match non_blank(value) {
                None => Ok(None),
                Some(raw) => parse_date(raw).map(Some).ok_or_else(|| {
                    ClientError::validation(format!("{field} must be a YYYY-MM-DD date"))
                }),
            }
        }

        let start = date(start, "Start date")?;
        let end = date(end, "End date")?;
        if let (Some(start), Some(end)) = (start, end) {
            validation::validate_date_range(start, end)?;
        }

        Ok(Self {
            branch_id: non_blank(branch_id).map(String::from),
            start,
            end,
            category: non_blank(category).map(String::from),
        })
    }
}

/// Everything a dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub branch_id: Option<String>,
    pub summary: SalesSummary,
    pub daily: Vec<DailyPoint>,
    pub top_products: Vec<RankedProduct>,
    pub category_sales: Vec<CategorySale>,
    pub inventory: InventorySummary,
}

// ============================================================================
// Filters
// ============================================================================

/// Records of a single branch
pub fn filter_by_branch<'a, T: BranchScoped>(records: &'a [T], branch_id: &str) -> Vec<&'a T> {
    scope::filter_by_branch(records, branch_id)
}

/// Records whose calendar day lies in `start..=end`; a missing bound is open
pub fn filter_by_date_range<'a, T: Timestamped>(
    records: &'a [T],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<&'a T> {
    records
        .iter()
        .filter(|r| {
            let day = business_date(&r.timestamp());
            start.is_none_or(|s| day >= s) && end.is_none_or(|e| day <= e)
        })
        .collect()
}

/// Restrict transactions to items of `category`.
///
/// Totals are recomputed from the kept items; transactions left without
/// items are dropped. Items whose product is unknown never match.
pub fn filter_by_category<T: Borrow<Transaction>>(
    transactions: &[T],
    products: &[Product],
    category: &str,
) -> Vec<Transaction> {
    let in_category: HashSet<&str> = products
        .iter()
        .filter(|p| p.category.eq_ignore_ascii_case(category))
        .map(|p| p.id.as_str())
        .collect();

    transactions
        .iter()
        .filter_map(|tx| {
            let tx: &Transaction = tx.borrow();
            let items: Vec<_> = tx
                .items
                .iter()
                .filter(|i| in_category.contains(i.product_id.as_str()))
                .cloned()
                .collect();
            if items.is_empty() {
                return None;
            }
            let total = items.iter().map(|i| i.line_total()).sum();
            Some(Transaction {
                items,
                total,
                ..tx.clone()
            })
        })
        .collect()
}

// ============================================================================
// Aggregates
// ============================================================================

/// Sum of transaction totals (0 for none)
pub fn sum_revenue<T: Borrow<Transaction>>(transactions: &[T]) -> f64 {
    transactions.iter().fold(0.0, |acc, t| {
        let t: &Transaction = t.borrow();
        acc + t.total
    })
}

/// Longest daily series a report builds (ten years)
pub const MAX_SERIES_DAYS: u32 = 3660;

/// `days` consecutive days ending at `end`, zero-filled.
///
/// `days` is capped at [`MAX_SERIES_DAYS`]; a window reaching before the
/// earliest representable date yields an empty series.
pub fn count_by_day<T: Borrow<Transaction>>(
    transactions: &[T],
    days: u32,
    end: NaiveDate,
) -> Vec<DailyPoint> {
    if days == 0 {
        return Vec::new();
    }
    if days > MAX_SERIES_DAYS {
        tracing::warn!(days, max = MAX_SERIES_DAYS, "Daily series too long, truncating");
    }
    let days = days.min(MAX_SERIES_DAYS);

    let Some(start) = end.checked_sub_signed(Duration::days(i64::from(days) - 1)) else {
        tracing::warn!(days, end = %end, "Daily series starts out of date range");
        return Vec::new();
    };
    let mut series: Vec<DailyPoint> = (0..days)
        .map(|offset| DailyPoint {
            date: start + Duration::days(i64::from(offset)),
            count: 0,
            revenue: 0.0,
        })
        .collect();

    for tx in transactions {
        let tx: &Transaction = tx.borrow();
        let day = business_date(&tx.timestamp);
        if day < start || day > end {
            continue;
        }
        let index = (day - start).num_days() as usize;
        let point = &mut series[index];
        point.count += 1;
        point.revenue += tx.total;
    }

    series
}

/// Units and revenue per product id
pub fn product_sales<T: Borrow<Transaction>>(
    transactions: &[T],
) -> HashMap<String, ProductSales> {
    let mut sales: HashMap<String, ProductSales> = HashMap::new();
    for tx in transactions {
        let tx: &Transaction = tx.borrow();
        for item in &tx.items {
            let entry = sales.entry(item.product_id.clone()).or_default();
            entry.quantity += u64::from(item.quantity);
            entry.revenue += item.line_total();
        }
    }
    sales
}

/// The `n` best products by revenue (ties by id)
pub fn top_n(sales: &HashMap<String, ProductSales>, n: usize) -> Vec<RankedProduct> {
    let mut ranked: Vec<RankedProduct> = sales
        .iter()
        .map(|(id, s)| RankedProduct {
            product_id: id.clone(),
            quantity: s.quantity,
            revenue: s.revenue,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(n);
    ranked
}

/// Revenue per product category, highest first.
///
/// Items of unknown products are grouped under `"Uncategorized"`.
pub fn sales_by_category<T: Borrow<Transaction>>(
    transactions: &[T],
    products: &[Product],
) -> Vec<CategorySale> {
    let category_of: HashMap<&str, &str> = products
        .iter()
        .map(|p| (p.id.as_str(), p.category.as_str()))
        .collect();

    let mut totals: HashMap<&str, (u64, f64)> = HashMap::new();
    for tx in transactions {
        let tx: &Transaction = tx.borrow();
        for item in &tx.items {
            let category = category_of
                .get(item.product_id.as_str())
                .copied()
                .unwrap_or("Uncategorized");
            let entry = totals.entry(category).or_default();
            entry.0 += u64::from(item.quantity);
            entry.1 += item.line_total();
        }
    }

    let mut sales: Vec<CategorySale> = totals
        .into_iter()
        .map(|(category, (quantity, revenue))| CategorySale {
            category: category.to_string(),
            quantity,
            revenue,
        })
        .collect();
    sales.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.category.cmp(&b.category))
    });
    sales
}

/// Headline numbers
pub fn summarize<T: Borrow<Transaction>>(transactions: &[T]) -> SalesSummary {
    let revenue = sum_revenue(transactions);
    let count = transactions.len();
    let customers: HashSet<&str> = transactions
        .iter()
        .filter_map(|t| {
            let t: &Transaction = t.borrow();
            t.customer.as_deref()
        })
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    SalesSummary {
        revenue,
        transactions: count,
        items_sold: transactions
            .iter()
            .map(|t| {
                let t: &Transaction = t.borrow();
                t.units()
            })
            .sum(),
        average_ticket: if count == 0 { 0.0 } else { revenue / count as f64 },
        unique_customers: customers.len(),
    }
}

/// Stock overview; inactive products are ignored
pub fn inventory_summary<T: Borrow<Product>>(
    products: &[T],
    low_stock_threshold: i64,
) -> InventorySummary {
    let mut active: Vec<&Product> = Vec::with_capacity(products.len());
    for p in products {
        let p: &Product = p.borrow();
        if p.is_active {
            active.push(p);
        }
    }

    let mut low: Vec<&Product> = active
        .iter()
        .copied()
        .filter(|p| p.stock <= low_stock_threshold)
        .collect();
    low.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.id.cmp(&b.id)));

    InventorySummary {
        total_products: active.len(),
        total_units: active.iter().map(|p| p.stock.max(0)).sum(),
        stock_value: active.iter().map(|p| p.stock_value()).sum(),
        low_stock: low.into_iter().map(|p| p.id.clone()).collect(),
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// Dashboard sizing
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Length of the daily series
    pub days: u32,
    /// Number of ranked products
    pub top: usize,
    /// Stock level at or below which a product is flagged
    pub low_stock_threshold: i64,
    /// Last day of the daily series
    pub today: NaiveDate,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            days: 7,
            top: 5,
            low_stock_threshold: 5,
            today: shared::util::today(),
        }
    }
}

fn in_report_scope<T: BranchScoped + ?Sized>(
    session: &Session,
    branch: Option<&str>,
    record: &T,
) -> bool {
    scope::can_see(session, record) && branch.is_none_or(|b| record.belongs_to_branch(b))
}

/// Scope, filter and aggregate for one dashboard.
///
/// Non-admin sessions are pinned to their own branch whatever the query
/// asks for. The daily series ends at the query's end date when given.
pub fn build_report(
    session: &Session,
    query: &ReportQuery,
    transactions: &[Transaction],
    products: &[Product],
    options: ReportOptions,
) -> DashboardReport {
    let branch = scope::effective_branch(session, query.branch_id.as_deref());

    let scoped_tx: Vec<Transaction> = filter_by_date_range(transactions, query.start, query.end)
        .into_iter()
        .filter(|t| in_report_scope(session, branch, *t))
        .cloned()
        .collect();
    let scoped_products: Vec<&Product> = products
        .iter()
        .filter(|p| in_report_scope(session, branch, *p))
        .collect();

    let (tx, category_products): (Vec<Transaction>, Vec<&Product>) = match &query.category {
        Some(category) => (
            filter_by_category(&scoped_tx, products, category),
            scoped_products
                .into_iter()
                .filter(|p| p.category.eq_ignore_ascii_case(category))
                .collect(),
        ),
        None => (scoped_tx, scoped_products),
    };

    let series_end = query.end.unwrap_or(options.today);
    let sales = product_sales(&tx);

    tracing::debug!(
        user_id = %session.user_id(),
        branch = ?branch,
        transactions = tx.len(),
        "Built dashboard report"
    );

    DashboardReport {
        branch_id: branch.map(String::from),
        summary: summarize(&tx),
        daily: count_by_day(&tx, options.days, series_end),
        top_products: top_n(&sales, options.top),
        category_sales: sales_by_category(&tx, products),
        inventory: inventory_summary(&category_products, options.low_stock_threshold),
    }
}
