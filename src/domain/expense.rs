use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Amount;

pub type ExpenseId = u64;

/// Expenses at or above this amount are flagged in reports.
pub const BIG_EXPENSE_THRESHOLD: Amount = Amount::from_units(1000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("amount must be positive, got {0}")]
pub struct InvalidAmount(pub Amount);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Amount,
    pub description: String,
}

impl Expense {
    /// Build an expense, rejecting zero and negative amounts.
    pub fn new(
        id: ExpenseId,
        amount: Amount,
        description: impl Into<String>,
    ) -> Result<Self, InvalidAmount> {
        if !amount.is_positive() {
            return Err(InvalidAmount(amount));
        }
        Ok(Self {
            id,
            amount,
            description: description.into(),
        })
    }

    pub fn is_big(&self) -> bool {
        self.amount >= BIG_EXPENSE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_positive_amount() {
        let expense = Expense::new(1, Amount::from_cents(1), "gum").unwrap();
        assert_eq!(expense.id, 1);
        assert_eq!(expense.description, "gum");
    }

    #[test]
    fn test_new_rejects_zero_and_negative() {
        assert_eq!(
            Expense::new(1, Amount::ZERO, "free"),
            Err(InvalidAmount(Amount::ZERO))
        );
        assert!(Expense::new(1, Amount::from_units(-5), "refund").is_err());
    }

    #[test]
    fn test_is_big_threshold() {
        let small = Expense::new(1, Amount::from_units(5), "coffee").unwrap();
        let edge = Expense::new(2, Amount::from_units(1000), "laptop").unwrap();
        let below = Expense::new(3, Amount::from_cents(99_999), "almost").unwrap();

        assert!(!small.is_big());
        assert!(edge.is_big());
        assert!(!below.is_big());
    }
}
