use std::collections::HashSet;

use thiserror::Error;

use super::{Amount, Expense, ExpenseId, InvalidAmount};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    InvalidAmount(#[from] InvalidAmount),

    #[error("expense id {0} appears more than once")]
    DuplicateId(ExpenseId),

    #[error("adding {0} would push the total past {max}", max = Amount::MAX)]
    TotalOverflow(Amount),
}

/// Ordered collection of expenses with pairwise distinct ids whose total
/// always fits in an [`Amount`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    expenses: Vec<Expense>,
    total: Amount,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored records, keeping their order.
    pub fn from_expenses(expenses: Vec<Expense>) -> Result<Self, LedgerError> {
        let mut seen = HashSet::with_capacity(expenses.len());
        let mut total = Amount::ZERO;
        for expense in &expenses {
            if !seen.insert(expense.id) {
                return Err(LedgerError::DuplicateId(expense.id));
            }
            total = total
                .checked_add(expense.amount)
                .ok_or(LedgerError::TotalOverflow(expense.amount))?;
        }
        Ok(Self { expenses, total })
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expense> {
        self.expenses.iter()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Smallest positive id not used by any expense.
    pub fn next_id(&self) -> ExpenseId {
        next_id(&self.expenses)
    }

    /// Append a new expense under the next free id and return a copy of it.
    /// The ledger is untouched when the amount is rejected or would overflow
    /// the total.
    pub fn add(
        &mut self,
        amount: Amount,
        description: impl Into<String>,
    ) -> Result<Expense, LedgerError> {
        let expense = Expense::new(self.next_id(), amount, description)?;
        let total = self
            .total
            .checked_add(expense.amount)
            .ok_or(LedgerError::TotalOverflow(expense.amount))?;

        self.expenses.push(expense.clone());
        self.total = total;
        Ok(expense)
    }

    pub fn total(&self) -> Amount {
        self.total
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Smallest positive integer not taken by any of `expenses`.
/// Depends only on the set of ids, not on their order.
pub fn next_id(expenses: &[Expense]) -> ExpenseId {
    let taken: HashSet<ExpenseId> = expenses.iter().map(|e| e.id).collect();
    (1..).find(|id| !taken.contains(id)).unwrap_or(1)
}

/// Sum of all amounts, `None` if it does not fit in an [`Amount`].
pub fn compute_total(expenses: &[Expense]) -> Option<Amount> {
    expenses
        .iter()
        .try_fold(Amount::ZERO, |total, e| total.checked_add(e.amount))
}
