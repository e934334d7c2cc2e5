//! Transaction data aggregation for charts.
//!
//! Pure functions that turn a snapshot of transactions into totals by type,
//! totals by category, the category cloud behind the bubble chart and the
//! daily buckets behind the heatmap. Amounts are always summed as absolute
//! values and the transaction type alone decides which side they count
//! towards.

use std::collections::{BTreeMap, HashMap};

use time::Date;

use crate::transaction::{Transaction, TransactionType};

/// The smallest radius a bubble may have, so small categories stay visible.
pub const MIN_BUBBLE_SIZE: f64 = 5.0;

/// How much the log of a category total is stretched to get a bubble radius.
pub const BUBBLE_SCALE: f64 = 3.0;

/// The summed absolute amounts of income and expense transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TypeTotals {
    /// The total of all income transactions.
    pub income: f64,
    /// The total of all expense transactions.
    pub expense: f64,
}

impl TypeTotals {
    /// The total for `type_`.
    pub fn get(&self, type_: TransactionType) -> f64 {
        match type_ {
            TransactionType::Income => self.income,
            TransactionType::Expense => self.expense,
        }
    }

    /// Income minus expenses.
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// The summed absolute amount of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category label, [crate::transaction::UNCATEGORIZED_LABEL] for
    /// transactions without one.
    pub category: String,
    /// The summed absolute amount.
    pub total: f64,
}

/// How many transactions a category has and how much they add up to.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCloudEntry {
    /// The category label.
    pub category: String,
    /// The number of transactions in the category.
    pub count: usize,
    /// The summed absolute amount of the transactions in the category.
    pub total: f64,
}

impl CategoryCloudEntry {
    /// The radius of the bubble for this category, see [bubble_size].
    pub fn size(&self) -> f64 {
        bubble_size(self.total)
    }
}

/// The summed absolute amount of the transactions on one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotal {
    /// The day.
    pub date: Date,
    /// The summed absolute amount.
    pub total: f64,
}

/// Sums the absolute amounts of transactions by type.
///
/// An empty slice gives zero for both types.
pub fn totals_by_type(transactions: &[Transaction]) -> TypeTotals {
    transactions
        .iter()
        .fold(TypeTotals::default(), |mut totals, transaction| {
            match transaction.type_ {
                TransactionType::Income => totals.income += transaction.magnitude(),
                TransactionType::Expense => totals.expense += transaction.magnitude(),
            }

            totals
        })
}

/// Groups the transactions of one type by category and counts and sums each group.
///
/// # Returns
/// One entry per category, in the order each category first appears in
/// `transactions`.
pub fn category_cloud(
    transactions: &[Transaction],
    type_: TransactionType,
) -> Vec<CategoryCloudEntry> {
    let mut entries: Vec<CategoryCloudEntry> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions.iter().filter(|t| t.type_ == type_) {
        let category = transaction.category_label();
        let index = *index_by_category.entry(category).or_insert_with(|| {
            entries.push(CategoryCloudEntry {
                category: category.to_owned(),
                count: 0,
                total: 0.0,
            });
            entries.len() - 1
        });

        let entry = &mut entries[index];
        entry.count += 1;
        entry.total += transaction.magnitude();
    }

    entries
}

/// Sums the transactions of one type by category.
///
/// # Returns
/// One total per category, in the order each category first appears in
/// `transactions`.
pub fn totals_by_category(
    transactions: &[Transaction],
    type_: TransactionType,
) -> Vec<CategoryTotal> {
    category_cloud(transactions, type_)
        .into_iter()
        .map(|entry| CategoryTotal {
            category: entry.category,
            total: entry.total,
        })
        .collect()
}

/// The bubble radius for a category total: `max(MIN_BUBBLE_SIZE, ln(total) * BUBBLE_SCALE)`.
///
/// Totals that are zero, negative or not finite get [MIN_BUBBLE_SIZE].
pub fn bubble_size(total: f64) -> f64 {
    if !total.is_finite() || total <= 0.0 {
        return MIN_BUBBLE_SIZE;
    }

    MIN_BUBBLE_SIZE.max(total.ln() * BUBBLE_SCALE)
}

/// Sums the transactions of one type by day.
///
/// Transactions without a valid date are skipped. Days without transactions
/// are left out rather than filled with zero.
///
/// # Returns
/// One total per day, sorted by date.
pub fn daily_totals(transactions: &[Transaction], type_: TransactionType) -> Vec<DailyTotal> {
    let mut totals: BTreeMap<Date, f64> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| t.type_ == type_) {
        if let Some(date) = transaction.date {
            *totals.entry(date).or_insert(0.0) += transaction.magnitude();
        }
    }

    totals
        .into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect()
}

/// Everything the dashboard shows, computed from one snapshot of transactions.
///
/// A summary is never updated in place. Build a new one whenever the
/// snapshot changes.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Income and expense totals.
    pub totals: TypeTotals,
    /// Expense totals by category.
    pub expense_categories: Vec<CategoryTotal>,
    /// Income totals by category.
    pub income_categories: Vec<CategoryTotal>,
    /// Expense counts and totals by category.
    pub expense_cloud: Vec<CategoryCloudEntry>,
    /// Expense totals by day.
    pub expense_days: Vec<DailyTotal>,
    /// The number of transactions in the snapshot.
    pub transaction_count: usize,
}

impl DashboardSummary {
    /// Aggregate a snapshot of transactions. `None` is treated as an empty snapshot.
    pub fn new(transactions: Option<&[Transaction]>) -> Self {
        let transactions = transactions.unwrap_or_default();

        Self {
            totals: totals_by_type(transactions),
            expense_categories: totals_by_category(transactions, TransactionType::Expense),
            income_categories: totals_by_category(transactions, TransactionType::Income),
            expense_cloud: category_cloud(transactions, TransactionType::Expense),
            expense_days: daily_totals(transactions, TransactionType::Expense),
            transaction_count: transactions.len(),
        }
    }

    /// Whether the snapshot had no transactions.
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        dashboard::aggregation::{
            BUBBLE_SCALE, CategoryCloudEntry, CategoryTotal, DailyTotal, DashboardSummary,
            MIN_BUBBLE_SIZE, TypeTotals, bubble_size, category_cloud, daily_totals,
            totals_by_category, totals_by_type,
        },
        transaction::{Transaction, TransactionType, UNCATEGORIZED_LABEL},
    };

    fn create_test_transaction(
        type_: TransactionType,
        amount: f64,
        category: Option<&str>,
    ) -> Transaction {
        Transaction {
            id: None,
            description: String::new(),
            amount,
            type_,
            category: category.map(str::to_owned),
            date: None,
        }
    }

    fn expense(amount: f64, category: &str) -> Transaction {
        create_test_transaction(TransactionType::Expense, amount, Some(category))
    }

    fn income(amount: f64, category: &str) -> Transaction {
        create_test_transaction(TransactionType::Income, amount, Some(category))
    }

    fn from_json(value: serde_json::Value) -> Vec<Transaction> {
        serde_json::from_value(value).expect("could not deserialize transactions")
    }

    #[test]
    fn totals_by_type_and_category_for_mixed_snapshot() {
        let transactions = vec![
            expense(100.0, "Food"),
            expense(50.0, "Food"),
            income(200.0, "Salary"),
        ];

        let totals = totals_by_type(&transactions);
        let expense_categories = totals_by_category(&transactions, TransactionType::Expense);

        assert_eq!(
            totals,
            TypeTotals {
                income: 200.0,
                expense: 150.0
            }
        );
        assert_eq!(
            expense_categories,
            vec![CategoryTotal {
                category: "Food".to_owned(),
                total: 150.0
            }]
        );
    }

    #[test]
    fn same_day_expenses_share_a_bucket() {
        let transactions = from_json(json!([
            {"type": "EXPENSE", "amount": 30, "transactionDate": "2024-01-01"},
            {"type": "EXPENSE", "amount": 70, "transactionDate": "2024-01-01"}
        ]));

        let days = daily_totals(&transactions, TransactionType::Expense);

        assert_eq!(
            days,
            vec![DailyTotal {
                date: date!(2024 - 01 - 01),
                total: 100.0
            }]
        );
    }

    #[test]
    fn invalid_date_is_excluded_from_days_but_not_totals() {
        let transactions = from_json(json!([
            {"type": "EXPENSE", "amount": 10, "transactionDate": "not-a-date"}
        ]));

        let days = daily_totals(&transactions, TransactionType::Expense);
        let totals = totals_by_type(&transactions);
        let categories = totals_by_category(&transactions, TransactionType::Expense);

        assert!(days.is_empty());
        assert_eq!(totals.expense, 10.0);
        assert_eq!(categories[0].total, 10.0);
    }

    #[test]
    fn category_cloud_counts_and_sizes_single_category() {
        let transactions = vec![expense(1000.0, "Rent")];

        let cloud = category_cloud(&transactions, TransactionType::Expense);

        assert_eq!(
            cloud,
            vec![CategoryCloudEntry {
                category: "Rent".to_owned(),
                count: 1,
                total: 1000.0
            }]
        );
        assert_eq!(
            cloud[0].size(),
            MIN_BUBBLE_SIZE.max(1000.0_f64.ln() * BUBBLE_SCALE)
        );
    }

    #[test]
    fn type_totals_sum_to_total_magnitude() {
        let transactions = vec![
            expense(-12.5, "Food"),
            income(300.0, "Salary"),
            expense(7.25, "Transport"),
            income(-40.0, "Refund"),
            expense(0.0, "Food"),
        ];

        let totals = totals_by_type(&transactions);
        let expected: f64 = transactions.iter().map(|t| t.amount.abs()).sum();

        assert_eq!(totals.income + totals.expense, expected);
        assert_eq!(totals.expense, 19.75);
        assert_eq!(totals.income, 340.0);
    }

    #[test]
    fn empty_input_gives_zero_totals() {
        assert_eq!(totals_by_type(&[]), TypeTotals::default());
        assert!(totals_by_category(&[], TransactionType::Expense).is_empty());
        assert!(category_cloud(&[], TransactionType::Income).is_empty());
        assert!(daily_totals(&[], TransactionType::Expense).is_empty());
    }

    #[test]
    fn missing_snapshot_is_treated_as_empty() {
        let summary = DashboardSummary::new(None);

        assert_eq!(summary, DashboardSummary::new(Some(&[])));
        assert!(summary.is_empty());
        assert_eq!(summary.totals, TypeTotals::default());
    }

    #[test]
    fn missing_category_is_grouped_as_uncategorized() {
        let transactions = vec![
            create_test_transaction(TransactionType::Expense, 5.0, None),
            create_test_transaction(TransactionType::Expense, 6.0, Some("")),
            expense(1.0, "Food"),
        ];

        let categories = totals_by_category(&transactions, TransactionType::Expense);

        assert_eq!(
            categories,
            vec![
                CategoryTotal {
                    category: UNCATEGORIZED_LABEL.to_owned(),
                    total: 11.0
                },
                CategoryTotal {
                    category: "Food".to_owned(),
                    total: 1.0
                },
            ]
        );
    }

    #[test]
    fn categories_keep_first_occurrence_order() {
        let transactions = vec![
            expense(1.0, "Zebra"),
            income(5.0, "Salary"),
            expense(2.0, "Alpha"),
            expense(3.0, "Zebra"),
            expense(4.0, "Middle"),
        ];

        let labels: Vec<_> = totals_by_category(&transactions, TransactionType::Expense)
            .into_iter()
            .map(|category| category.category)
            .collect();

        assert_eq!(labels, vec!["Zebra", "Alpha", "Middle"]);
    }

    #[test]
    fn category_totals_are_filtered_by_type() {
        let transactions = vec![expense(10.0, "Food"), income(20.0, "Food")];

        let income_categories = totals_by_category(&transactions, TransactionType::Income);

        assert_eq!(
            income_categories,
            vec![CategoryTotal {
                category: "Food".to_owned(),
                total: 20.0
            }]
        );
    }

    #[test]
    fn daily_totals_are_sorted_and_filtered_by_type() {
        let transactions = from_json(json!([
            {"type": "DESPESA", "amount": 5, "transactionDate": "2024-03-02"},
            {"type": "RECEITA", "amount": 500, "transactionDate": "2024-03-01"},
            {"type": "DESPESA", "amount": -7, "date": "2024-03-01T09:30:00"}
        ]));

        let days = daily_totals(&transactions, TransactionType::Expense);

        assert_eq!(
            days,
            vec![
                DailyTotal {
                    date: date!(2024 - 03 - 01),
                    total: 7.0
                },
                DailyTotal {
                    date: date!(2024 - 03 - 02),
                    total: 5.0
                },
            ]
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let transactions = from_json(json!([
            {"type": "DESPESA", "amount": 5, "category": "Food", "transactionDate": "2024-03-02"},
            {"type": "RECEITA", "amount": 500, "transactionDate": "2024-03-01"}
        ]));

        let first = DashboardSummary::new(Some(&transactions));
        let second = DashboardSummary::new(Some(&transactions));

        assert_eq!(first, second);
    }

    #[test]
    fn non_finite_amounts_count_as_zero() {
        let transactions = vec![expense(f64::NAN, "Food"), expense(f64::INFINITY, "Food")];

        let totals = totals_by_type(&transactions);

        assert_eq!(totals.expense, 0.0);
    }

    #[test]
    fn bubble_size_uses_floor_for_small_and_invalid_totals() {
        for total in [0.0, -10.0, f64::NAN, f64::INFINITY, 0.5, 1.0, 5.0] {
            assert_eq!(bubble_size(total), MIN_BUBBLE_SIZE, "total {total}");
        }
    }

    #[test]
    fn bubble_size_grows_with_total() {
        assert_eq!(bubble_size(1000.0), 1000.0_f64.ln() * BUBBLE_SCALE);
        assert!(bubble_size(10_000.0) > bubble_size(1000.0));
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let totals = TypeTotals {
            income: 300.0,
            expense: 120.0,
        };

        assert_eq!(totals.balance(), 180.0);
        assert_eq!(totals.get(TransactionType::Expense), 120.0);
    }
}
