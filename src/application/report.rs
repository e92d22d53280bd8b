use crate::domain::{Amount, Expense, Ledger};

pub const REPORT_HEADER: &str = "--ID--  -AMOUNT-  -BIG?-  --DESC--------------";
pub const NO_EXPENSES: &str = "No expenses recorded.";
const BIG_MARKER: &str = "(!)";

/// A loaded ledger together with its total, ready for display.
#[derive(Debug, Clone)]
pub struct Report {
    pub ledger: Ledger,
    pub total: Amount,
}

impl Report {
    pub fn lines(&self) -> ReportLines<'_> {
        format_report(&self.ledger, self.total)
    }
}

/// Lazily produce the display lines for `ledger`: a header, one row per
/// expense and a total line, or a single notice when there is nothing to show.
pub fn format_report(ledger: &Ledger, total: Amount) -> ReportLines<'_> {
    ReportLines {
        rows: ledger.iter(),
        total,
        stage: if ledger.is_empty() {
            Stage::Empty
        } else {
            Stage::Header
        },
    }
}

enum Stage {
    Empty,
    Header,
    Rows,
    Done,
}

pub struct ReportLines<'a> {
    rows: std::slice::Iter<'a, Expense>,
    total: Amount,
    stage: Stage,
}

impl Iterator for ReportLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self.stage {
            Stage::Empty => {
                self.stage = Stage::Done;
                Some(NO_EXPENSES.to_string())
            }
            Stage::Header => {
                self.stage = Stage::Rows;
                Some(REPORT_HEADER.to_string())
            }
            Stage::Rows => match self.rows.next() {
                Some(expense) => Some(format_row(expense)),
                None => {
                    self.stage = Stage::Done;
                    Some(format!("TOTAL:   {:>8}", self.total))
                }
            },
            Stage::Done => None,
        }
    }
}

fn format_row(expense: &Expense) -> String {
    let marker = if expense.is_big() { BIG_MARKER } else { "" };
    format!(
        "{:>6}  {:>8}  {:^6}  {}",
        expense.id, expense.amount, marker, expense.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ledger_single_line() {
        let ledger = Ledger::new();
        let lines: Vec<String> = format_report(&ledger, Amount::ZERO).collect();
        assert_eq!(lines, vec![NO_EXPENSES.to_string()]);
    }

    #[test]
    fn test_table_layout() {
        let mut ledger = Ledger::new();
        ledger.add(Amount::from_units(5), "coffee").unwrap();
        ledger.add(Amount::from_units(1000), "laptop").unwrap();

        let lines: Vec<String> = format_report(&ledger, ledger.total()).collect();

        assert_eq!(
            lines,
            vec![
                REPORT_HEADER.to_string(),
                "     1      5.00          coffee".to_string(),
                "     2   1000.00   (!)    laptop".to_string(),
                "TOTAL:    1005.00".to_string(),
            ]
        );
    }

    #[test]
    fn test_lines_are_lazy() {
        let mut ledger = Ledger::new();
        for _ in 0..3 {
            ledger.add(Amount::from_units(1), "x").unwrap();
        }

        let mut lines = format_report(&ledger, ledger.total());
        assert_eq!(lines.next().as_deref(), Some(REPORT_HEADER));
        assert_eq!(lines.count(), 4);
    }
}
