use std::io::{Read, Write};

use serde::{Serialize, Serializer};

use super::account::{parse_real, Account};
use super::confirmation::{ConfirmationCode, TransactionType};
use super::error::{Error, ValidationError};
use super::operation::{Operation, OperationRecord};
use super::Decimal;

/// Serialize Decimal with exactly 4 decimal places
fn serialize_decimal_4dp<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.4}"))
}

/// One accepted operation: its confirmation code, the amount moved (or
/// requested, for a rejected withdrawal) and the balance afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    code: ConfirmationCode,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    #[serde(serialize_with = "serialize_decimal_4dp")]
    amount: Decimal,
    #[serde(serialize_with = "serialize_decimal_4dp")]
    balance: Decimal,
}

impl Receipt {
    pub fn code(&self) -> &ConfirmationCode {
        &self.code
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }
}

/// Replays a script of operations against one account.
#[derive(Debug)]
pub struct Teller {
    account: Account,
    receipts: Vec<Receipt>,
}

impl Teller {
    pub fn new(account: Account) -> Self {
        log::trace!("Teller opened for account {}", account.account_number());
        Self {
            account,
            receipts: Vec::new(),
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Primary API: process operations from any CSV source with a `type,amount` header.
    ///
    /// Rows with the wrong shape stop processing. Rows whose amount fails
    /// validation are logged and skipped.
    pub fn process_operations<R: Read>(&mut self, reader: R) -> Result<(), Error> {
        log::info!(
            "Starting operation processing for account {}",
            self.account.account_number()
        );

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut processed = 0u64;
        let mut skipped = 0u64;

        for result in csv_reader.deserialize() {
            let record: OperationRecord = result?;

            let row_num = processed + skipped + 1;
            log::trace!(
                "[row {}] Parsing: type={} amount={:?}",
                row_num,
                record.op_type,
                record.amount
            );

            let operation = Operation::try_from(record)?;

            match self.process_operation(&operation) {
                Ok(receipt) => {
                    self.receipts.push(receipt);
                    processed += 1;
                }
                Err(e) => {
                    log::warn!("[row {row_num}] - Skipped {operation}: {e}");
                    skipped += 1;
                }
            }
        }

        log::info!(
            "Processing complete: {} processed, {} skipped, balance {}",
            processed,
            skipped,
            self.account.balance()
        );
        Ok(())
    }

    /// Secondary API: write the receipts to any sink as CSV.
    pub fn export_receipts<W: Write>(&self, writer: W) -> Result<(), Error> {
        log::info!("Exporting {} receipts", self.receipts.len());

        let mut csv_writer = csv::Writer::from_writer(writer);
        for receipt in &self.receipts {
            csv_writer.serialize(receipt)?;
        }
        csv_writer.flush()?;

        log::trace!("Export complete");
        Ok(())
    }

    /// Applies one operation to the account and builds its receipt.
    pub fn process_operation(&mut self, operation: &Operation) -> Result<Receipt, ValidationError> {
        log::trace!("Processing operation: {operation}");
        let before = self.account.balance();
        let (code, amount) = match operation {
            Operation::Deposit { amount } => {
                let amount = parse_real("amount", amount)?;
                (self.account.deposit(amount)?, amount)
            }
            Operation::Withdrawal { amount } => {
                let amount = parse_real("amount", amount)?;
                (self.account.withdrawal(amount)?, amount)
            }
            Operation::Interest => {
                let code = self.account.pay_interest()?;
                (code, self.account.balance() - before)
            }
        };

        Ok(Receipt {
            transaction_type: code.transaction_type(),
            code,
            amount,
            balance: self.account.balance(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::context::{AccountContext, FixedClock};
    use chrono::{TimeZone as _, Utc};
    use rust_decimal_macros::dec;
    use std::io::Cursor;
    use std::rc::Rc;

    fn make_teller(balance: Decimal) -> Teller {
        let instant = Utc.with_ymd_and_hms(2011, 3, 9, 8, 0, 0).unwrap();
        let context = Rc::new(AccountContext::new(FixedClock(instant)));
        let account = Account::new(&context, "A100", "FIRST", "LAST", None, balance).unwrap();
        Teller::new(account)
    }

    #[test]
    fn test_deposit_receipt() {
        let mut teller = make_teller(dec!(100));
        let receipt = teller
            .process_operation(&Operation::Deposit {
                amount: "25.5".to_owned(),
            })
            .unwrap();

        assert_eq!(receipt.code().as_str(), "D-A100-20110309080000-100");
        assert_eq!(receipt.transaction_type(), TransactionType::Deposit);
        assert_eq!(receipt.amount(), dec!(25.5));
        assert_eq!(receipt.balance(), dec!(125.5));
    }

    #[test]
    fn test_rejected_withdrawal_receipt() {
        let mut teller = make_teller(dec!(10));
        let receipt = teller
            .process_operation(&Operation::Withdrawal {
                amount: "20".to_owned(),
            })
            .unwrap();

        assert_eq!(receipt.transaction_type(), TransactionType::Rejected);
        assert_eq!(receipt.amount(), dec!(20));
        assert_eq!(receipt.balance(), dec!(10));
    }

    #[test]
    fn test_interest_receipt_reports_interest_paid() {
        let mut teller = make_teller(dec!(100));
        let receipt = teller.process_operation(&Operation::Interest).unwrap();

        assert_eq!(receipt.transaction_type(), TransactionType::Interest);
        assert_eq!(receipt.amount(), dec!(0.5));
        assert_eq!(receipt.balance(), dec!(100.5));
    }

    #[test]
    fn test_non_numeric_amount_is_a_type_mismatch() {
        let mut teller = make_teller(dec!(100));
        let err = teller
            .process_operation(&Operation::Deposit {
                amount: "John".to_owned(),
            })
            .unwrap_err();

        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
        assert_eq!(teller.account().balance(), dec!(100));
    }

    #[test]
    fn test_soft_errors_are_skipped() {
        let mut teller = make_teller(dec!(0));
        let input = "type,amount
deposit,abc
deposit,0.001
deposit,10
";
        teller.process_operations(Cursor::new(input)).unwrap();

        assert_eq!(teller.receipts().len(), 1);
        assert_eq!(teller.account().balance(), dec!(10));
    }

    #[test]
    fn test_balance_overflow_row_is_skipped() {
        let mut teller = make_teller(dec!(0));
        let input = "type,amount
deposit,79228162514264337593543950335
deposit,1
interest,
";
        teller.process_operations(Cursor::new(input)).unwrap();

        // only the first deposit fits, the other two rows are skipped
        assert_eq!(teller.receipts().len(), 1);
        assert_eq!(teller.account().balance(), Decimal::MAX);
        assert_eq!(teller.receipts()[0].code().as_str(), "D-A100-20110309080000-100");
    }

    #[test]
    fn test_malformed_row_stops_processing() {
        let mut teller = make_teller(dec!(0));
        let input = "type,amount
deposit,10
deposit,
deposit,10
";
        let err = teller.process_operations(Cursor::new(input)).unwrap_err();

        assert!(matches!(err, Error::Operation(_)));
        assert_eq!(teller.account().balance(), dec!(10));
    }

    #[test]
    fn test_export_formats_four_decimal_places() {
        let mut teller = make_teller(dec!(100));
        teller.process_operation(&Operation::Interest).unwrap();

        let mut output = Vec::new();
        teller.export_receipts(&mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(
            output,
            "code,type,amount,balance\nI-A100-20110309080000-100,interest,0.5000,100.5000\n"
        );
    }
}
