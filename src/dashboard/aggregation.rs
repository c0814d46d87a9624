//! Pure aggregation over the transaction list.
//!
//! Every list change triggers a full recompute; there is no incremental
//! accumulation. The lists involved are personal-finance sized, so a full
//! pass is cheaper than it is clever.

use crate::transaction::core::{PaymentMethod, Transaction, TransactionType};

/// The totals and splits the dashboard displays.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Sum of amounts over income transactions.
    pub income: f64,
    /// Sum of amounts over expense transactions.
    pub expense: f64,
    /// Income minus expense. May be negative.
    pub balance: f64,
    /// Sum of amounts over cash transactions, income and expense alike.
    pub cash: f64,
    /// Sum of amounts over cashless transactions, income and expense alike.
    pub cashless: f64,
    /// Cash plus cashless, the denominator of the method split.
    pub flow: f64,
}

/// Compute the dashboard totals from the full transaction list.
pub fn aggregate(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for transaction in transactions {
        match transaction.type_ {
            TransactionType::Income => totals.income += transaction.amount,
            TransactionType::Expense => totals.expense += transaction.amount,
        }

        match transaction.method {
            PaymentMethod::Cash => totals.cash += transaction.amount,
            PaymentMethod::Cashless => totals.cashless += transaction.amount,
        }
    }

    totals.balance = totals.income - totals.expense;
    totals.flow = totals.cash + totals.cashless;

    totals
}

/// The share of `part` in `total` as a whole percentage.
///
/// Defined as 0 when `total` is zero. That is a policy choice to keep the
/// split bars rendering for an empty list, not a mathematical identity.
pub fn percentage(part: f64, total: f64) -> i32 {
    if total == 0.0 {
        return 0;
    }

    (part / total * 100.0).round() as i32
}

#[cfg(test)]
mod aggregation_tests {
    use time::macros::date;

    use crate::{
        dashboard::aggregation::{aggregate, percentage},
        transaction::core::{PaymentMethod, Transaction, TransactionType},
    };

    fn transaction(amount: f64, type_: TransactionType, method: PaymentMethod) -> Transaction {
        Transaction {
            id: 1,
            description: "test".to_owned(),
            amount,
            type_,
            method,
            date: date!(2026 - 08 - 01),
            order_key: None,
            created_by: "Budi".to_owned(),
            updated_by: None,
            created_at: 0,
            updated_at: None,
        }
    }

    #[test]
    fn totals_for_mixed_list() {
        let transactions = vec![
            transaction(50_000.0, TransactionType::Income, PaymentMethod::Cash),
            transaction(20_000.0, TransactionType::Expense, PaymentMethod::Cashless),
        ];

        let totals = aggregate(&transactions);

        assert_eq!(totals.income, 50_000.0);
        assert_eq!(totals.expense, 20_000.0);
        assert_eq!(totals.balance, 30_000.0);
        assert_eq!(totals.cash, 50_000.0);
        assert_eq!(totals.cashless, 20_000.0);
        assert_eq!(totals.flow, 70_000.0);
        assert_eq!(percentage(totals.income, totals.income + totals.expense), 71);
        assert_eq!(percentage(totals.expense, totals.income + totals.expense), 29);
    }

    #[test]
    fn empty_list_is_all_zero() {
        let totals = aggregate(&[]);

        assert_eq!(totals, Default::default());
        assert_eq!(percentage(totals.income, totals.income + totals.expense), 0);
        assert_eq!(percentage(totals.cash, totals.flow), 0);
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let transactions = vec![
            transaction(100.0, TransactionType::Income, PaymentMethod::Cash),
            transaction(30.0, TransactionType::Expense, PaymentMethod::Cash),
            transaction(250.0, TransactionType::Expense, PaymentMethod::Cashless),
        ];

        let totals = aggregate(&transactions);

        assert_eq!(totals.balance, totals.income - totals.expense);
        // The balance may go negative; only amounts are constrained positive.
        assert_eq!(totals.balance, -180.0);
    }

    #[test]
    fn percentage_of_zero_total_is_zero() {
        assert_eq!(percentage(0.0, 0.0), 0);
        assert_eq!(percentage(123_456.0, 0.0), 0);
    }

    #[test]
    fn percentage_stays_within_bounds() {
        assert_eq!(percentage(0.0, 70_000.0), 0);
        assert_eq!(percentage(70_000.0, 70_000.0), 100);
        assert_eq!(percentage(35_000.0, 70_000.0), 50);

        for part in [0.0, 1.0, 33_333.0, 69_999.0, 70_000.0] {
            let value = percentage(part, 70_000.0);
            assert!((0..=100).contains(&value), "got {value} for part {part}");
        }
    }

    #[test]
    fn percentage_is_deterministic() {
        assert_eq!(
            percentage(50_000.0, 70_000.0),
            percentage(50_000.0, 70_000.0)
        );
    }
}
