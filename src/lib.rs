//! A single bank account with validated holder details, balance operations
//! and auditable confirmation codes.
//!
//! Every deposit, withdrawal and interest payment returns a code of the form
//! `{type}-{account number}-{UTC timestamp}-{sequence value}`, which
//! [`parse_confirmation_code`] turns back into its parts.

pub mod bank;

pub use bank::{
    parse_confirmation_code, Account, AccountContext, ConfirmationCode, Error, FixedClock,
    ParsedConfirmation, Receipt, SystemClock, Teller, TimeZone, TransactionType, ValidationError,
};
pub use rust_decimal::Decimal;
