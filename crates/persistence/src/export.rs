//! CSV export
//!
//! Every exporter writes its header line first, then one record per entity.
//! Fields containing the delimiter are quoted by the csv writer, so free-text
//! columns round-trip.

use crate::error::PersistenceResult;
use crate::records::{
    AccountRecord, BranchRecord, CustomerRecord, LedgerRecord, ACCOUNT_HEADERS, BRANCH_HEADERS,
    CUSTOMER_HEADERS, LEDGER_HEADERS,
};
use csv::{Writer, WriterBuilder};
use minibank_core::Bank;
use std::io::Write;

fn csv_writer<W: Write>(output: W, headers: &[&str]) -> PersistenceResult<Writer<W>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    writer.write_record(headers)?;
    Ok(writer)
}

/// Write `clientes.csv`. Returns the number of records written.
pub fn export_customers<W: Write>(bank: &Bank, output: W) -> PersistenceResult<usize> {
    let mut writer = csv_writer(output, &CUSTOMER_HEADERS)?;
    let mut count = 0;
    for (_, customer) in bank.customers() {
        writer.serialize(CustomerRecord::from(customer))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

pub fn export_branches<W: Write>(bank: &Bank, output: W) -> PersistenceResult<usize> {
    let mut writer = csv_writer(output, &BRANCH_HEADERS)?;
    for branch in bank.branches() {
        writer.serialize(BranchRecord::from(branch))?;
    }
    writer.flush()?;
    Ok(bank.branches().len())
}

pub fn export_accounts<W: Write>(bank: &Bank, output: W) -> PersistenceResult<usize> {
    let mut writer = csv_writer(output, &ACCOUNT_HEADERS)?;
    let mut count = 0;
    for (_, account) in bank.accounts() {
        writer.serialize(AccountRecord::from_account(account, bank))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Write `movimentacoes.csv`: every ledger entry, grouped by account in
/// opening order, oldest entry first.
pub fn export_ledger<W: Write>(bank: &Bank, output: W) -> PersistenceResult<usize> {
    let mut writer = csv_writer(output, &LEDGER_HEADERS)?;
    let mut count = 0;
    for (_, account) in bank.accounts() {
        for entry in account.entries() {
            writer.serialize(LedgerRecord::from_entry(entry, account.branch()))?;
            count += 1;
        }
    }
    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minibank_core::{Account, AccountKey, AccountKind, Customer};
    use rust_decimal_macros::dec;

    fn sample_bank() -> Bank {
        let mut bank = Bank::new();
        let joao = bank
            .add_customer(
                Customer::new("Silva, João", "12345678901", "joao@email.com", "99999-9999")
                    .unwrap(),
            )
            .unwrap();
        let id = bank
            .add_account(
                Account::open(
                    AccountKey::new(1, 12345),
                    joao,
                    AccountKind::checking(dec!(12.50)),
                    "1234",
                    dec!(1500),
                )
                .unwrap(),
            )
            .unwrap();
        bank.account_mut(id).unwrap().deposit(dec!(500)).unwrap();
        bank
    }

    #[test]
    fn test_export_customers_quotes_commas() {
        let bank = sample_bank();
        let mut out = Vec::new();
        assert_eq!(export_customers(&bank, &mut out).unwrap(), 1);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "name,national_id,email,phone\n\"Silva, João\",12345678901,joao@email.com,99999-9999\n"
        );
    }

    #[test]
    fn test_export_accounts_layout() {
        let bank = sample_bank();
        let mut out = Vec::new();
        export_accounts(&bank, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "12345,\"Silva, João\",1,CORRENTE,2000.00,1234,12345678901,12.50,,,,,Checking 12345"
        );
    }

    #[test]
    fn test_export_ledger() {
        let bank = sample_bank();
        let mut out = Vec::new();
        assert_eq!(export_ledger(&bank, &mut out).unwrap(), 1);

        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("DEPOSITO,12345,Deposit,500,"));
        assert!(row.ends_with(",1"));
    }

    #[test]
    fn test_export_empty_bank_writes_headers() {
        let mut out = Vec::new();
        assert_eq!(export_branches(&Bank::new(), &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "number,name\n");
    }
}
