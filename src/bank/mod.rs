//! Bank account module.
//!
//! This module contains the account model and its confirmation codes:
//! - `Account` - Holder, balance and balance operations
//! - `TimeZone` - Validated named UTC offset
//! - `AccountContext` - Sequence, interest rate and clock shared by accounts
//! - Confirmation code generation and parsing
//! - `Teller` - Replays CSV operation scripts against an account
//! - `Error` types - Validation and processing errors

mod account;
mod confirmation;
mod context;
mod error;
mod operation;
mod teller;
mod timezone;

pub(crate) use rust_decimal::Decimal;

pub use account::{parse_real, Account, MIN_TRANSACTION_AMOUNT};
pub use confirmation::{parse_confirmation_code, ConfirmationCode, ParsedConfirmation, TransactionType};
pub use context::{
    AccountContext, Clock, FixedClock, InterestRatePolicy, SystemClock, TransactionSequencer,
    DEFAULT_INTEREST_RATE, SEQUENCE_START,
};
pub use error::{Error, FormatViolation, OperationError, ValidationError};
pub use operation::{Operation, OperationRecord, OperationType};
pub use teller::{Receipt, Teller};
pub use timezone::TimeZone;
