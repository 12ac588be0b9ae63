use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};

use super::error::ValidationError;
use super::timezone::TimeZone;

/// Layout of the timestamp segment of a confirmation code.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Kind of operation a confirmation code was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Interest,
    /// A withdrawal that was refused for insufficient funds.
    Rejected,
}

impl TransactionType {
    /// Single-letter code used as the first segment of a confirmation code.
    pub fn code(self) -> char {
        match self {
            TransactionType::Deposit => 'D',
            TransactionType::Withdraw => 'W',
            TransactionType::Interest => 'I',
            TransactionType::Rejected => 'X',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "D" => Some(TransactionType::Deposit),
            "W" => Some(TransactionType::Withdraw),
            "I" => Some(TransactionType::Interest),
            "X" => Some(TransactionType::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "deposit"),
            TransactionType::Withdraw => write!(f, "withdraw"),
            TransactionType::Interest => write!(f, "interest"),
            TransactionType::Rejected => write!(f, "rejected"),
        }
    }
}

/// Code returned by every balance operation:
/// `{type}-{account number}-{UTC %Y%m%d%H%M%S}-{sequence value}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfirmationCode {
    code: String,
    transaction_type: TransactionType,
}

impl ConfirmationCode {
    pub(crate) fn generate(
        transaction_type: TransactionType,
        account_number: &str,
        at: DateTime<Utc>,
        transaction_id: u64,
    ) -> Self {
        let code = format!(
            "{}-{}-{}-{}",
            transaction_type.code(),
            account_number,
            at.format(TIMESTAMP_FORMAT),
            transaction_id
        );
        Self {
            code,
            transaction_type,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Shorthand for [`parse_confirmation_code`] on this code.
    pub fn parse(&self, preferred: Option<&TimeZone>) -> Result<ParsedConfirmation, ValidationError> {
        parse_confirmation_code(&self.code, preferred)
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl AsRef<str> for ConfirmationCode {
    fn as_ref(&self) -> &str {
        &self.code
    }
}

impl From<ConfirmationCode> for String {
    fn from(code: ConfirmationCode) -> Self {
        code.code
    }
}

impl Serialize for ConfirmationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}

/// The segments of a confirmation code, with the timestamp rendered in UTC
/// and in a preferred time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedConfirmation {
    account_number: String,
    transaction_code: String,
    transaction_id: String,
    time_utc: String,
    time: String,
    #[serde(skip)]
    utc: DateTime<Utc>,
}

impl ParsedConfirmation {
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// Raw type segment. Not checked against the known codes.
    pub fn transaction_code(&self) -> &str {
        &self.transaction_code
    }

    pub fn transaction_type(&self) -> Option<TransactionType> {
        TransactionType::from_code(&self.transaction_code)
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// ISO-8601 UTC instant, `YYYY-MM-DDTHH:MM:SS`.
    pub fn time_utc(&self) -> &str {
        &self.time_utc
    }

    /// Instant shifted into the preferred zone, `YYYY-MM-DD HH:MM:SS (NAME)`.
    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.utc
    }
}

/// Splits a confirmation code back into its parts.
///
/// Only the part count and the timestamp are checked; the type letter, account
/// number and id are returned as found. `preferred` defaults to UTC.
pub fn parse_confirmation_code(
    code: &str,
    preferred: Option<&TimeZone>,
) -> Result<ParsedConfirmation, ValidationError> {
    let parts: Vec<&str> = code.split('-').collect();
    let [transaction_code, account_number, raw_timestamp, transaction_id] = parts.as_slice() else {
        return Err(ValidationError::malformed(
            code,
            "expected 4 parts separated by '-'",
        ));
    };

    let naive = NaiveDateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT).map_err(|source| {
        ValidationError::MalformedInput {
            input: code.to_owned(),
            reason: "invalid timestamp, expected YYYYMMDDHHMMSS",
            source: Some(source),
        }
    })?;

    let utc_zone = TimeZone::utc();
    let preferred = preferred.unwrap_or(&utc_zone);
    let shifted = naive
        .checked_add_signed(preferred.offset())
        .ok_or_else(|| ValidationError::malformed(code, "timestamp out of range"))?;

    log::trace!("Parsed confirmation code {code} for account {account_number}");
    Ok(ParsedConfirmation {
        account_number: (*account_number).to_owned(),
        transaction_code: (*transaction_code).to_owned(),
        transaction_id: (*transaction_id).to_owned(),
        time_utc: naive.format(ISO_FORMAT).to_string(),
        time: format!("{} ({})", shifted.format(DISPLAY_FORMAT), preferred.name()),
        utc: naive.and_utc(),
    })
}
