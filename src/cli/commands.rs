pub(crate) use clap::Parser;
use bank_account::bank::{parse_real, ValidationError};
use clap::{Args as ClapArgs, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bank-account",
    author,
    version,
    about = "A single bank account with auditable confirmation codes",
    long_about = None,
    after_help = "OUTPUT:\n    Results are printed to stdout in CSV format.\n    Use shell redirection to save to a file:\n\n    bank-account process ops.csv --account-number A100 --first-name Eric --last-name Idle > receipts.csv"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a CSV of operations against a new account and print the receipts
    Process {
        /// Path to the input operations CSV file
        #[arg(
            index = 1,
            value_name = "FILE",
            help = "Input CSV file with columns: type, amount"
        )]
        input_file: PathBuf,

        #[arg(long)]
        account_number: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[command(flatten)]
        timezone: TimeZoneArgs,

        /// Opening balance
        #[arg(long, default_value = "0", allow_negative_numbers = true, value_parser = parse_balance)]
        balance: Decimal,

        /// Interest rate in percent
        #[arg(
            long,
            default_value = "0.5",
            allow_negative_numbers = true,
            value_parser = parse_interest_rate
        )]
        interest_rate: Decimal,
    },
    /// Decode a confirmation code
    Decode {
        #[arg(index = 1, value_name = "CODE")]
        code: String,

        #[command(flatten)]
        timezone: TimeZoneArgs,
    },
}

/// Time zone given as its three constructor arguments.
#[derive(ClapArgs, Debug)]
pub struct TimeZoneArgs {
    #[arg(long, default_value = "UTC")]
    pub tz_name: String,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub tz_hours: i32,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub tz_minutes: i32,
}

fn parse_balance(raw: &str) -> Result<Decimal, ValidationError> {
    parse_real("balance", raw)
}

fn parse_interest_rate(raw: &str) -> Result<Decimal, ValidationError> {
    parse_real("interest rate", raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const BASE: [&str; 9] = [
        "bank-account",
        "process",
        "ops.csv",
        "--account-number",
        "A100",
        "--first-name",
        "Eric",
        "--last-name",
        "Idle",
    ];

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(BASE.iter().chain(extra).copied())
    }

    #[test]
    fn test_defaults() {
        let Command::Process {
            balance,
            interest_rate,
            timezone,
            ..
        } = parse(&[]).unwrap().command
        else {
            panic!("expected process");
        };
        assert_eq!(balance, Decimal::ZERO);
        assert_eq!(interest_rate, dec!(0.5));
        assert_eq!(timezone.tz_name, "UTC");
    }

    #[test]
    fn test_rates_accept_scientific_notation() {
        let Command::Process { interest_rate, .. } =
            parse(&["--interest-rate", "1e-1"]).unwrap().command
        else {
            panic!("expected process");
        };
        assert_eq!(interest_rate, dec!(0.1));
    }

    #[test]
    fn test_non_numeric_rate_is_a_type_mismatch() {
        assert!(matches!(
            parse_interest_rate("abc"),
            Err(ValidationError::TypeMismatch { field: "interest rate", .. })
        ));
        let err = parse(&["--interest-rate", "abc"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("Wrong input type for interest rate"));
    }
}
