use std::fmt;
use std::rc::Rc;

use super::confirmation::{ConfirmationCode, TransactionType};
use super::context::AccountContext;
use super::error::{FormatViolation, ValidationError};
use super::timezone::TimeZone;
use super::Decimal;

/// Smallest amount accepted by `deposit` and `withdrawal`.
pub const MIN_TRANSACTION_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Parses a real number from text, reporting a `TypeMismatch` for `field`.
pub fn parse_real(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    raw.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| ValidationError::TypeMismatch {
            field,
            expected: "real number",
            found: raw.to_owned(),
        })
}

/// A single customer account.
///
/// The sequence used for confirmation codes and the interest rate come from
/// the [`AccountContext`] the account was opened with, and are shared with
/// every other account of that context.
#[derive(Clone)]
pub struct Account {
    context: Rc<AccountContext>,
    account_number: String,
    first_name: String,
    last_name: String,
    timezone: TimeZone,
    balance: Decimal,
}

impl Account {
    /// Opens an account. `timezone` defaults to UTC.
    ///
    /// The opening balance only has to be non-negative; the
    /// [`MIN_TRANSACTION_AMOUNT`] floor applies to deposits and withdrawals.
    pub fn new(
        context: &Rc<AccountContext>,
        account_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        timezone: Option<TimeZone>,
        initial_balance: Decimal,
    ) -> Result<Self, ValidationError> {
        let first_name = validate_name("First Name", first_name.into())?;
        let last_name = validate_name("Last Name", last_name.into())?;
        if initial_balance < Decimal::ZERO {
            return Err(ValidationError::out_of_range(
                "initial balance",
                initial_balance,
                ">= 0",
            ));
        }
        let account = Self {
            context: Rc::clone(context),
            account_number: account_number.into(),
            first_name,
            last_name,
            timezone: timezone.unwrap_or_default(),
            balance: initial_balance.normalize(),
        };
        log::trace!(
            "Opened account {} for {} with balance {}",
            account.account_number,
            account.full_name(),
            account.balance
        );
        Ok(account)
    }

    /// Returns the account number
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        self.first_name = validate_name("First Name", value.into())?;
        Ok(())
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        self.last_name = validate_name("Last Name", value.into())?;
        Ok(())
    }

    /// `"{first_name} {last_name}"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn timezone(&self) -> &TimeZone {
        &self.timezone
    }

    pub fn set_timezone(&mut self, timezone: TimeZone) {
        self.timezone = timezone;
    }

    /// Returns the current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Current interest rate of the shared context, in percent.
    pub fn interest_rate(&self) -> Decimal {
        self.context.interest_rate()
    }

    pub fn context(&self) -> &Rc<AccountContext> {
        &self.context
    }

    /// Credits `amount` and returns a `D` code.
    pub fn deposit(&mut self, amount: Decimal) -> Result<ConfirmationCode, ValidationError> {
        validate_amount(amount)?;
        let new_balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| balance_overflow(self.balance, "deposit"))?;
        let code = self.generate_confirmation_code(TransactionType::Deposit)?;
        self.balance = new_balance.normalize();
        log::trace!(
            "[deposit] account={} amount={amount} -> new_balance={}",
            self.account_number,
            self.balance
        );
        Ok(code)
    }

    /// Debits `amount` and returns a `W` code.
    ///
    /// Insufficient funds are not an error: the balance is left untouched and
    /// an `X` code is returned instead.
    pub fn withdrawal(&mut self, amount: Decimal) -> Result<ConfirmationCode, ValidationError> {
        validate_amount(amount)?;
        if amount > self.balance {
            log::debug!(
                "[withdrawal] account={} rejected: balance {} < requested {amount}",
                self.account_number,
                self.balance
            );
            return self.generate_confirmation_code(TransactionType::Rejected);
        }
        let code = self.generate_confirmation_code(TransactionType::Withdraw)?;
        // amount <= balance and both are non-negative, so this cannot overflow
        self.balance = (self.balance - amount).normalize();
        log::trace!(
            "[withdrawal] account={} amount={amount} -> new_balance={}",
            self.account_number,
            self.balance
        );
        Ok(code)
    }

    /// Adds `balance * rate / 100` and returns an `I` code.
    ///
    /// Fails with `OutOfRange` on `balance`, leaving the account untouched,
    /// when the new balance does not fit in a `Decimal`.
    pub fn pay_interest(&mut self) -> Result<ConfirmationCode, ValidationError> {
        let new_balance = self
            .balance
            .checked_mul(self.context.interest_rate())
            .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|interest| self.balance.checked_add(interest))
            .ok_or_else(|| balance_overflow(self.balance, "interest payment"))?;
        let code = self.generate_confirmation_code(TransactionType::Interest)?;
        let interest = new_balance - self.balance;
        self.balance = new_balance.normalize();
        log::trace!(
            "[interest] account={} interest={interest} -> new_balance={}",
            self.account_number,
            self.balance
        );
        Ok(code)
    }

    fn generate_confirmation_code(
        &self,
        transaction_type: TransactionType,
    ) -> Result<ConfirmationCode, ValidationError> {
        let transaction_id = self.context.sequencer().next_value()?;
        let code = ConfirmationCode::generate(
            transaction_type,
            &self.account_number,
            self.context.now(),
            transaction_id,
        );
        log::debug!("Issued confirmation code {code}");
        Ok(code)
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.timezone == other.timezone
            && self.balance == other.balance
            && self.account_number == other.account_number
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("account_number", &self.account_number)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("timezone", &self.timezone)
            .field("balance", &self.balance)
            .finish_non_exhaustive()
    }
}

fn validate_name(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidFormat {
            field,
            violation: FormatViolation::Empty,
        });
    }
    Ok(value)
}

fn balance_overflow(balance: Decimal, operation: &str) -> ValidationError {
    log::debug!("[{operation}] balance {balance} would overflow");
    ValidationError::out_of_range("balance", balance, "the representable Decimal range")
}

fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount < MIN_TRANSACTION_AMOUNT {
        return Err(ValidationError::out_of_range("amount", amount, ">= 0.01"));
    }
    Ok(())
}
