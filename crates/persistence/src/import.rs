//! CSV import
//!
//! Each importer reads one file into an existing [`Bank`]. Lines that cannot
//! be parsed or are rejected by the domain (bad ID, duplicate, unknown owner)
//! are logged and skipped; only IO-level failures abort an import.

use crate::error::{PersistenceError, PersistenceResult};
use crate::records::{
    AccountRecord, BranchRecord, CustomerRecord, LedgerRecord, ACCOUNT_HEADERS, BRANCH_HEADERS,
    CUSTOMER_HEADERS, LEDGER_HEADERS,
};
use csv::{ReaderBuilder, StringRecord, Trim};
use minibank_core::{
    Account, AccountKey, Bank, Branch, CoreError, CoreResult, CustomerId,
};
use serde::de::DeserializeOwned;
use std::io::Read;
use tracing::{debug, warn};

/// Outcome of importing one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

impl ImportSummary {
    fn skip(&mut self, err: PersistenceError) {
        warn!(error = %err, "Skipping CSV line");
        self.skipped += 1;
    }
}

/// Import `clientes.csv` rows. Existing national IDs are skipped.
pub fn import_customers<R: Read>(
    bank: &mut Bank,
    input: R,
    file: &str,
) -> PersistenceResult<ImportSummary> {
    import_rows(
        input,
        file,
        CUSTOMER_HEADERS.len(),
        1,
        |row: CustomerRecord| {
            let customer = row.to_customer()?;
            bank.add_customer(customer).map(|_| ())
        },
    )
}

/// Import `agencias.csv` rows.
pub fn import_branches<R: Read>(
    bank: &mut Bank,
    input: R,
    file: &str,
) -> PersistenceResult<ImportSummary> {
    import_rows(
        input,
        file,
        BRANCH_HEADERS.len(),
        0,
        |row: BranchRecord| {
            let branch = Branch::new(row.number, &row.name)?;
            if bank.add_branch(branch) {
                Ok(())
            } else {
                Err(CoreError::validation(format!(
                    "branch {} already registered",
                    row.number
                )))
            }
        },
    )
}

/// Import `contas.csv` rows.
///
/// The owner is resolved by national ID; rows from the six-column layout,
/// which only carry the customer name, fall back to a unique name match.
pub fn import_accounts<R: Read>(
    bank: &mut Bank,
    input: R,
    file: &str,
) -> PersistenceResult<ImportSummary> {
    import_rows(
        input,
        file,
        ACCOUNT_HEADERS.len(),
        0,
        |row: AccountRecord| {
            let owner = resolve_owner(bank, &row)?;
            let account = Account::open(
                AccountKey::new(row.branch, row.account_number),
                owner,
                row.account_kind()?,
                row.pin.trim(),
                row.balance()?,
            )?
            .with_label(row.label.as_deref().unwrap_or_default());
            bank.add_account(account).map(|_| ())
        },
    )
}

/// Import `movimentacoes.csv` rows into the ledgers of existing accounts.
/// Balances are not touched.
pub fn import_ledger<R: Read>(
    bank: &mut Bank,
    input: R,
    file: &str,
) -> PersistenceResult<ImportSummary> {
    import_rows(
        input,
        file,
        LEDGER_HEADERS.len(),
        1,
        |row: LedgerRecord| {
            let id = match row.branch {
                Some(branch) => bank.find_account(branch, row.account_number),
                None => unique_by_number(bank, row.account_number),
            }
            .ok_or_else(|| {
                CoreError::InvalidReference(format!(
                    "no account {} for ledger entry",
                    row.account_number
                ))
            })?;
            let entry = row.to_entry()?;
            match bank.account_mut(id) {
                Some(account) => account.import_entry(entry),
                None => Err(CoreError::InvalidReference(id.to_string())),
            }
        },
    )
}

fn import_rows<R, T, F>(
    input: R,
    file: &str,
    width: usize,
    key_column: usize,
    mut apply: F,
) -> PersistenceResult<ImportSummary>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T) -> CoreResult<()>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let mut summary = ImportSummary::default();
    let mut first = true;

    for result in reader.records() {
        let mut record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                let line = err.position().map_or(0, |p| p.line());
                summary.skip(PersistenceError::invalid_record(file, line, err.to_string()));
                first = false;
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());

        if std::mem::take(&mut first) && looks_like_header(&record, key_column) {
            debug!(file, header = ?record, "Skipping header line");
            continue;
        }
        if record.iter().all(str::is_empty) {
            continue;
        }

        record.truncate(width);
        while record.len() < width {
            record.push_field("");
        }

        let row: T = match record.deserialize(None) {
            Ok(row) => row,
            Err(err) => {
                summary.skip(PersistenceError::invalid_record(file, line, err.to_string()));
                continue;
            }
        };

        match apply(row) {
            Ok(()) => summary.imported += 1,
            Err(err) => {
                summary.skip(PersistenceError::invalid_record(file, line, err.to_string()))
            }
        }
    }

    debug!(
        file,
        imported = summary.imported,
        skipped = summary.skipped,
        "CSV import finished"
    );
    Ok(summary)
}

/// A first line is a header when its numeric key column (national ID,
/// branch or account number) holds no digit at all. Data rows with a
/// malformed key still carry digits and go through validation.
fn looks_like_header(record: &StringRecord, key_column: usize) -> bool {
    !record
        .get(key_column)
        .is_some_and(|field| field.bytes().any(|b| b.is_ascii_digit()))
}

fn resolve_owner(bank: &Bank, row: &AccountRecord) -> CoreResult<CustomerId> {
    if let Some(national_id) = row.owner_national_id.as_deref().filter(|s| !s.is_empty()) {
        return bank.find_customer(national_id).ok_or_else(|| {
            CoreError::InvalidReference(format!("no customer with national ID {}", national_id))
        });
    }

    let mut matches = bank
        .customers()
        .filter(|(_, c)| c.name == row.customer_name.trim())
        .map(|(id, _)| id);
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (Some(_), Some(_)) => Err(CoreError::InvalidReference(format!(
            "customer name {:?} is ambiguous",
            row.customer_name
        ))),
        (None, _) => Err(CoreError::InvalidReference(format!(
            "no customer named {:?}",
            row.customer_name
        ))),
    }
}

fn unique_by_number(bank: &Bank, number: u32) -> Option<minibank_core::AccountId> {
    let mut matches = bank
        .accounts()
        .filter(|(_, a)| a.number() == number)
        .map(|(id, _)| id);
    match (matches.next(), matches.next()) {
        (Some(id), None) => Some(id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minibank_core::{AccountKind, AccountType, Customer, EntryKind};
    use rust_decimal_macros::dec;

    const CUSTOMERS: &str = "\
Nome,CPF,Email,Telefone
João Silva,12345678901,joao@email.com,99999-9999
Ana Souza,98765432100,ana@email.com,88888-8888
Bad CPF,123,x@y.com,
João Again,12345678901,,
";

    #[test]
    fn test_import_customers_skips_header_and_bad_rows() {
        let mut bank = Bank::new();
        let summary = import_customers(&mut bank, CUSTOMERS.as_bytes(), "clientes.csv").unwrap();

        assert_eq!(summary, ImportSummary { imported: 2, skipped: 2 });
        assert_eq!(bank.customer_count(), 2);
        let joao = bank.find_customer("12345678901").unwrap();
        assert_eq!(bank.customer(joao).unwrap().name, "João Silva");
    }

    #[test]
    fn test_import_customers_without_header() {
        let mut bank = Bank::new();
        let summary = import_customers(
            &mut bank,
            "Ana Souza,98765432100,ana@email.com,88888-8888\n".as_bytes(),
            "clientes.csv",
        )
        .unwrap();
        assert_eq!(summary.imported, 1);
    }

    #[test]
    fn test_import_customers_malformed_first_row_is_counted() {
        let mut bank = Bank::new();
        let csv = "\
Bad CPF,123,x@y.com,
Ana Souza,98765432100,ana@email.com,88888-8888
";
        let summary = import_customers(&mut bank, csv.as_bytes(), "clientes.csv").unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 1 });
    }

    #[test]
    fn test_header_detection() {
        let header = StringRecord::from(vec!["Nome", "CPF", "Email", "Telefone"]);
        let row = StringRecord::from(vec!["Bad CPF", "123", "x@y.com", ""]);
        let ledger = StringRecord::from(vec!["BOGUS", "12345", "Deposit", "1.00"]);
        assert!(looks_like_header(&header, 1));
        assert!(!looks_like_header(&row, 1));
        assert!(!looks_like_header(&ledger, 1));
        assert!(looks_like_header(&StringRecord::from(vec!["number", "name"]), 0));
    }

    #[test]
    fn test_import_ledger_bad_first_row_is_counted() {
        let mut bank = Bank::new();
        let csv = "BOGUS,12345,Deposit,500.00,2024-03-15,1\n";
        let summary = import_ledger(&mut bank, csv.as_bytes(), "movimentacoes.csv").unwrap();
        assert_eq!(summary, ImportSummary { imported: 0, skipped: 1 });
    }

    fn bank_with_customers() -> Bank {
        let mut bank = Bank::new();
        import_customers(&mut bank, CUSTOMERS.as_bytes(), "clientes.csv").unwrap();
        bank
    }

    #[test]
    fn test_import_accounts_full_layout() {
        let mut bank = bank_with_customers();
        let csv = "\
account_number,customer_name,branch,kind,balance,pin,owner_national_id,maintenance_fee,interest_rate,employer,withdrawal_limit,withdrawals_made,label
12345,João Silva,1,CORRENTE,1800.00,1234,12345678901,12.50,,,,,Conta João
67890,Ana Souza,2,POUPANCA,2500.00,5678,98765432100,,0.005,,,,
55555,Ana Souza,2,SALARIO,300.00,5678,98765432100,,,ACME,4,1,
";
        let summary = import_accounts(&mut bank, csv.as_bytes(), "contas.csv").unwrap();
        assert_eq!(summary, ImportSummary { imported: 3, skipped: 0 });

        let checking = bank.account(bank.find_account(1, 12345).unwrap()).unwrap();
        assert_eq!(checking.balance(), dec!(1800.00));
        assert_eq!(checking.label(), "Conta João");
        assert_eq!(checking.kind(), &AccountKind::checking(dec!(12.50)));

        let payroll = bank.account(bank.find_account(2, 55555).unwrap()).unwrap();
        assert_eq!(payroll.account_type(), AccountType::Payroll);
        assert_eq!(payroll.withdrawals_remaining(), Some(3));

        let ana = bank.find_customer("98765432100").unwrap();
        assert_eq!(bank.customer(ana).unwrap().accounts().len(), 2);
    }

    #[test]
    fn test_import_accounts_base_layout_links_by_name() {
        let mut bank = bank_with_customers();
        let csv = "12345,João Silva,1,CORRENTE,1500.00,1234\n";
        let summary = import_accounts(&mut bank, csv.as_bytes(), "contas.csv").unwrap();
        assert_eq!(summary.imported, 1);

        let account = bank.account(bank.find_account(1, 12345).unwrap()).unwrap();
        assert_eq!(account.kind(), &AccountKind::checking(dec!(0)));
    }

    #[test]
    fn test_import_accounts_rejections() {
        let mut bank = bank_with_customers();
        let csv = "\
12345,João Silva,1,CORRENTE,1500.00,1234,12345678901
12345,João Silva,1,CORRENTE,10.00,1234,12345678901
22222,Nobody,1,CORRENTE,10.00,1234,00000000000
33333,João Silva,1,XYZ,10.00,1234,12345678901
44444,João Silva,1,CORRENTE,-5.00,1234,12345678901
55555,João Silva,1,SALARIO,5.00,1234,12345678901
";
        let summary = import_accounts(&mut bank, csv.as_bytes(), "contas.csv").unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 5 });
        assert_eq!(bank.account_count(), 1);
    }

    #[test]
    fn test_import_ledger_keeps_balances() {
        let mut bank = Bank::new();
        let joao = bank
            .add_customer(Customer::new("João Silva", "12345678901", "", "").unwrap())
            .unwrap();
        bank.add_account(
            Account::open(
                AccountKey::new(1, 12345),
                joao,
                AccountKind::checking(dec!(0)),
                "1234",
                dec!(1800),
            )
            .unwrap(),
        )
        .unwrap();

        let csv = "\
kind,account_number,description,amount,date,branch
DEPOSITO,12345,Deposit,500.00,2024-03-15,1
SAQUE,12345,Withdrawal,200.00,2024-03-16,
SAQUE,99999,Withdrawal,200.00,2024-03-16,1
BOGUS,12345,Withdrawal,200.00,2024-03-16,1
SAQUE,12345,Withdrawal,0,2024-03-16,1
";
        let summary = import_ledger(&mut bank, csv.as_bytes(), "movimentacoes.csv").unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 3 });

        let account = bank.account(bank.find_account(1, 12345).unwrap()).unwrap();
        assert_eq!(account.balance(), dec!(1800));
        assert_eq!(account.entries().len(), 2);
        assert_eq!(account.entries()[1].kind(), EntryKind::Withdrawal);
    }

    #[test]
    fn test_import_branches() {
        let mut bank = Bank::new();
        let csv = "number,name\n1,Centro\n2,Zona Norte\n1,Duplicada\n";
        let summary = import_branches(&mut bank, csv.as_bytes(), "agencias.csv").unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 1 });
        assert_eq!(bank.branch(1).unwrap().name, "Centro");
    }
}
