use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::domain::{Amount, Expense, Ledger};
use crate::io::{Exporter, ImportResult, Importer};
use crate::storage::{replace_file, LedgerStore};

use super::{AppError, Report};

/// Application service providing the expense use cases.
/// Every operation loads the ledger from the store, and mutating ones save
/// it back exactly once.
pub struct ExpenseService<S> {
    store: S,
}

impl<S: LedgerStore> ExpenseService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the current ledger.
    pub fn ledger(&self) -> Result<Ledger, AppError> {
        Ok(self.store.load()?)
    }

    /// Record a new expense under the next free id and persist it.
    /// Nothing is written when the amount is rejected.
    pub fn add_expense(
        &self,
        amount: Amount,
        description: impl Into<String>,
    ) -> Result<Expense, AppError> {
        let mut ledger = self.store.load()?;
        let expense = ledger.add(amount, description)?;
        self.store.save(&ledger)?;

        info!(id = expense.id, amount = %expense.amount, "added expense");
        Ok(expense)
    }

    pub fn report(&self) -> Result<Report, AppError> {
        let ledger = self.store.load()?;
        let total = ledger.total();
        Ok(Report { ledger, total })
    }

    /// Import expenses from the CSV file at `path`.
    ///
    /// A missing file aborts the whole import with [`AppError::FileNotFound`],
    /// and any other read failure with [`AppError::ImportSource`]; storage is
    /// left untouched in both cases. Bad rows are skipped and listed in the
    /// returned [`ImportResult`]; good rows are saved in a single write.
    pub fn import_csv(&self, path: &Path) -> Result<ImportResult, AppError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AppError::FileNotFound(path.to_path_buf()),
            _ => AppError::ImportSource {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        self.import_from(path, file)
    }

    /// Import expenses from any CSV reader (stdin, in-memory data, ...).
    pub fn import_csv_from<R: Read>(&self, reader: R) -> Result<ImportResult, AppError> {
        self.import_from(Path::new("<reader>"), reader)
    }

    fn import_from<R: Read>(&self, source: &Path, reader: R) -> Result<ImportResult, AppError> {
        let mut ledger = self.store.load()?;
        let result = Importer::new(&mut ledger)
            .import_csv(reader)
            .map_err(|e| AppError::ImportSource {
                path: source.to_path_buf(),
                source: e,
            })?;
        self.store.save(&ledger)?;

        info!(
            imported = result.imported,
            errors = result.errors.len(),
            "imported CSV"
        );
        Ok(result)
    }

    /// Export the ledger to `path` as CSV. The file is replaced atomically,
    /// so a failed export never leaves a half-written file behind.
    pub fn export_csv(&self, path: &Path) -> Result<usize, AppError> {
        let ledger = self.store.load()?;

        let mut count = 0;
        replace_file(path, |file| {
            count = Exporter::new(&ledger).export_csv(file)?;
            Ok(())
        })
        .map_err(|source| AppError::ExportFailure {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(count, path = %path.display(), "exported CSV");
        Ok(count)
    }

    /// Write the ledger as CSV to an arbitrary writer.
    pub fn export_csv_to<W: Write>(&self, writer: W) -> Result<usize, AppError> {
        let ledger = self.store.load()?;
        Exporter::new(&ledger)
            .export_csv(writer)
            .map_err(|e| AppError::ExportFailure {
                path: "<writer>".into(),
                source: e.into(),
            })
    }

    /// Raw in-memory representation of the stored records, for inspection.
    pub fn debug_dump(&self) -> Result<String, AppError> {
        let ledger = self.store.load()?;
        Ok(format!("{:#?}", ledger.expenses()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LedgerError;
    use crate::storage::{MemoryStore, StoreError};

    fn service() -> ExpenseService<MemoryStore> {
        ExpenseService::new(MemoryStore::new())
    }

    #[test]
    fn test_add_assigns_smallest_unused_id() {
        let service = service();

        let first = service.add_expense(Amount::from_units(5), "coffee").unwrap();
        let second = service.add_expense(Amount::from_units(7), "cake").unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(service.ledger().unwrap().len(), 2);
        assert_eq!(service.store().save_count(), 2);
    }

    #[test]
    fn test_add_invalid_amount_does_not_save() {
        let service = service();
        service.add_expense(Amount::from_units(5), "coffee").unwrap();
        let before = service.store().bytes();

        let err = service.add_expense(Amount::ZERO, "nothing").unwrap_err();

        assert!(matches!(err, AppError::InvalidAmount(_)));
        assert_eq!(service.store().bytes(), before);
        assert_eq!(service.store().save_count(), 1);
    }

    #[test]
    fn test_report_totals() {
        let service = service();
        assert_eq!(service.report().unwrap().total, Amount::ZERO);

        service.add_expense(Amount::from_units(5), "coffee").unwrap();
        service.add_expense(Amount::from_units(1000), "laptop").unwrap();

        let report = service.report().unwrap();
        assert_eq!(report.total, Amount::from_units(1005));
        assert_eq!(report.lines().count(), 4);
    }

    #[test]
    fn test_import_saves_once() {
        let service = service();
        let csv = "amount,description\n1,a\nbad,b\n2,c\n3,d\n";

        let result = service.import_csv_from(csv.as_bytes()).unwrap();

        assert_eq!(result.imported, 3);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(service.store().save_count(), 1);
        assert_eq!(service.ledger().unwrap().len(), 3);
    }

    #[test]
    fn test_import_missing_file_touches_nothing() {
        let service = service();
        service.add_expense(Amount::from_units(1), "kept").unwrap();

        let err = service
            .import_csv(Path::new("/definitely/not/here.csv"))
            .unwrap_err();

        assert!(matches!(err, AppError::FileNotFound(_)));
        assert_eq!(service.store().save_count(), 1);
        assert_eq!(service.ledger().unwrap().len(), 1);
    }

    #[test]
    fn test_import_read_failure_touches_nothing() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("device went away"))
            }
        }

        let service = service();
        service.add_expense(Amount::from_units(1), "kept").unwrap();
        let before = service.store().bytes();

        let reader = "amount,description\n2,lost\n".as_bytes().chain(FailingReader);
        let err = service.import_csv_from(reader).unwrap_err();

        assert!(matches!(err, AppError::ImportSource { .. }));
        assert_eq!(service.store().save_count(), 1);
        assert_eq!(service.store().bytes(), before);
    }

    #[test]
    fn test_add_rejects_total_overflow_and_report_still_works() {
        let service = service();
        let huge: Amount = "92233720368547758".parse().unwrap();
        service.add_expense(huge, "a").unwrap();

        let err = service.add_expense(huge, "b").unwrap_err();

        assert!(matches!(err, AppError::Ledger(LedgerError::TotalOverflow(_))));
        assert_eq!(service.store().save_count(), 1);
        let report = service.report().unwrap();
        assert_eq!(report.total, huge);
        assert_eq!(report.lines().count(), 3);
    }

    #[test]
    fn test_corrupt_store_surfaces_error() {
        let service = ExpenseService::new(MemoryStore::with_bytes("garbage"));

        let err = service.add_expense(Amount::from_units(1), "x").unwrap_err();

        assert!(matches!(err, AppError::Storage(StoreError::Corrupt { .. })));
        assert_eq!(service.store().bytes().as_deref(), Some(&b"garbage"[..]));
    }

    #[test]
    fn test_export_csv_to_writer() {
        let service = service();
        service.add_expense(Amount::from_cents(250), "tea").unwrap();

        let mut out = Vec::new();
        let count = service.export_csv_to(&mut out).unwrap();

        assert_eq!(count, 1);
        assert_eq!(out, b"id,amount,description\n1,2.50,tea\n");
    }

    #[test]
    fn test_debug_dump_lists_records() {
        let service = service();
        service.add_expense(Amount::from_units(3), "bread").unwrap();

        let dump = service.debug_dump().unwrap();

        assert!(dump.contains("bread"));
        assert!(dump.contains("id: 1"));
    }
}
