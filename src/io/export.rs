use std::io::Write;

use crate::domain::Ledger;

pub const CSV_HEADER: [&str; 3] = ["id", "amount", "description"];

/// Writes a ledger out as CSV, one row per expense in ledger order.
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Returns the number of expense rows written. The header is always
    /// written, even for an empty ledger.
    pub fn export_csv<W: Write>(&self, writer: W) -> csv::Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(CSV_HEADER)?;

        let mut count = 0;
        for expense in self.ledger {
            csv_writer.write_record(&[
                expense.id.to_string(),
                expense.amount.to_string(),
                expense.description.clone(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Amount;
    use crate::io::Importer;

    #[test]
    fn test_export_layout() {
        let mut ledger = Ledger::new();
        ledger.add(Amount::from_cents(1250), "lunch").unwrap();
        ledger.add(Amount::from_units(3), "bus, return").unwrap();

        let mut out = Vec::new();
        let count = Exporter::new(&ledger).export_csv(&mut out).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,amount,description\n1,12.50,lunch\n2,3.00,\"bus, return\"\n"
        );
    }

    #[test]
    fn test_export_empty_ledger_writes_header() {
        let mut out = Vec::new();
        let count = Exporter::new(&Ledger::new()).export_csv(&mut out).unwrap();

        assert_eq!(count, 0);
        assert_eq!(out, b"id,amount,description\n");
    }

    #[test]
    fn test_export_then_import_keeps_pairs() {
        let mut ledger = Ledger::new();
        ledger.add(Amount::from_cents(1), "penny").unwrap();
        ledger.add(Amount::from_units(1000), "multi\nline \"quoted\"").unwrap();
        ledger.add(Amount::from_cents(4999), "").unwrap();

        let mut out = Vec::new();
        Exporter::new(&ledger).export_csv(&mut out).unwrap();

        let mut fresh = Ledger::new();
        let result = Importer::new(&mut fresh).import_csv(out.as_slice()).unwrap();

        assert!(result.errors.is_empty());
        let pairs = |l: &Ledger| {
            l.iter()
                .map(|e| (e.amount, e.description.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&fresh), pairs(&ledger));
    }
}
