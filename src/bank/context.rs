//! State shared by every account opened from the same context.
//!
//! The sequence counter and the interest rate live in [`Cell`]s. Accounts hold
//! the context through an `Rc`, which keeps them on a single thread: there is
//! exactly one writer at any time and no locking is needed.

use std::cell::Cell;
use std::fmt;

use chrono::{DateTime, Utc};

use super::account::parse_real;
use super::error::ValidationError;
use super::Decimal;

/// First value handed out by a fresh [`TransactionSequencer`].
pub const SEQUENCE_START: u64 = 100;

/// Default interest rate, in percent.
pub const DEFAULT_INTEREST_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Source of the current UTC time used in confirmation codes.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Monotonic counter embedded in every confirmation code.
#[derive(Debug)]
pub struct TransactionSequencer {
    next: Cell<u64>,
}

impl TransactionSequencer {
    pub fn new(start: u64) -> Self {
        Self {
            next: Cell::new(start),
        }
    }

    /// Returns the current value and advances the counter.
    ///
    /// `u64::MAX` is never handed out: once the counter reaches it every call
    /// fails with `OutOfRange` and the counter stays put.
    pub fn next_value(&self) -> Result<u64, ValidationError> {
        let value = self.next.get();
        let next = value.checked_add(1).ok_or_else(|| {
            ValidationError::out_of_range("transaction id", value, "< u64::MAX")
        })?;
        self.next.set(next);
        Ok(value)
    }

    /// The value the next call to [`next_value`](Self::next_value) returns.
    pub fn peek(&self) -> u64 {
        self.next.get()
    }
}

impl Default for TransactionSequencer {
    fn default() -> Self {
        Self::new(SEQUENCE_START)
    }
}

/// Interest rate applied by `Account::pay_interest`, in percent.
#[derive(Debug)]
pub struct InterestRatePolicy {
    rate: Cell<Decimal>,
}

impl InterestRatePolicy {
    pub fn new(rate: Decimal) -> Result<Self, ValidationError> {
        validate_rate(rate)?;
        Ok(Self {
            rate: Cell::new(rate),
        })
    }

    pub fn rate(&self) -> Decimal {
        self.rate.get()
    }

    /// Replaces the rate. Negative rates are rejected and leave it unchanged.
    pub fn set_rate(&self, rate: Decimal) -> Result<(), ValidationError> {
        validate_rate(rate)?;
        log::debug!("Interest rate changed from {} to {rate}", self.rate.get());
        self.rate.set(rate);
        Ok(())
    }
}

impl Default for InterestRatePolicy {
    fn default() -> Self {
        Self {
            rate: Cell::new(DEFAULT_INTEREST_RATE),
        }
    }
}

fn validate_rate(rate: Decimal) -> Result<(), ValidationError> {
    if rate < Decimal::ZERO {
        return Err(ValidationError::out_of_range("interest rate", rate, ">= 0"));
    }
    Ok(())
}

/// Sequencer, interest rate and clock shared by a group of accounts.
///
/// Wrap it in an `Rc` and pass it to `Account::new`; every account opened
/// from the same `Rc` draws from the same sequence and sees the same rate.
pub struct AccountContext {
    sequencer: TransactionSequencer,
    interest: InterestRatePolicy,
    clock: Box<dyn Clock>,
}

impl AccountContext {
    /// Context with the default sequence start and rate, reading `clock`.
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            sequencer: TransactionSequencer::default(),
            interest: InterestRatePolicy::default(),
            clock: Box::new(clock),
        }
    }

    /// Starts the sequence at `start` instead of [`SEQUENCE_START`].
    #[must_use]
    pub fn with_sequence_start(mut self, start: u64) -> Self {
        self.sequencer = TransactionSequencer::new(start);
        self
    }

    pub fn with_interest_rate(mut self, rate: Decimal) -> Result<Self, ValidationError> {
        self.interest = InterestRatePolicy::new(rate)?;
        Ok(self)
    }

    pub fn sequencer(&self) -> &TransactionSequencer {
        &self.sequencer
    }

    pub fn interest_rate(&self) -> Decimal {
        self.interest.rate()
    }

    pub fn set_interest_rate(&self, rate: Decimal) -> Result<(), ValidationError> {
        self.interest.set_rate(rate)
    }

    /// Parses `raw` with [`parse_real`] and sets it as the rate.
    pub fn set_interest_rate_str(&self, raw: &str) -> Result<(), ValidationError> {
        self.set_interest_rate(parse_real("interest rate", raw)?)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl Default for AccountContext {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl fmt::Debug for AccountContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountContext")
            .field("sequencer", &self.sequencer)
            .field("interest", &self.interest)
            .finish_non_exhaustive()
    }
}
