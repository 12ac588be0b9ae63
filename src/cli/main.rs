mod commands;

use std::rc::Rc;

use anyhow::{Context, Result};
use bank_account::{parse_confirmation_code, Account, AccountContext, Teller, TimeZone};
use commands::{Args, Command, Parser, TimeZoneArgs};

fn main() -> Result<()> {
    // Parse the CLI arguments
    let args = Args::parse();

    // Initialize logger with default level of info (can be overridden with RUST_LOG)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match args.command {
        Command::Process {
            input_file,
            account_number,
            first_name,
            last_name,
            timezone,
            balance,
            interest_rate,
        } => {
            // 1. Open the account
            let timezone = build_timezone(&timezone)?;
            let context = Rc::new(
                AccountContext::default()
                    .with_interest_rate(interest_rate)
                    .context("Invalid interest rate")?,
            );
            let account = Account::new(
                &context,
                account_number,
                first_name,
                last_name,
                Some(timezone),
                balance,
            )
            .context("Failed to open account")?;
            let mut teller = Teller::new(account);

            // 2. Open and process the input file
            log::info!("Processing operations from {}", input_file.display());
            let file = std::fs::File::open(&input_file)
                .with_context(|| format!("Failed to open input file: {}", input_file.display()))?;

            teller
                .process_operations(file)
                .context("Failed to process operations")?;

            log::info!(
                "Processing complete, final balance {}",
                teller.account().balance()
            );

            // 3. Export the receipts to stdout
            teller
                .export_receipts(std::io::stdout())
                .context("Failed to export receipts to stdout")?;
        }
        Command::Decode { code, timezone } => {
            let timezone = build_timezone(&timezone)?;
            let parsed = parse_confirmation_code(&code, Some(&timezone))
                .with_context(|| format!("Failed to decode confirmation code: {code}"))?;

            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer
                .serialize(&parsed)
                .context("Failed to write decoded code")?;
            writer.flush().context("Failed to flush stdout")?;
        }
    }

    log::info!("Done");
    Ok(())
}

fn build_timezone(args: &TimeZoneArgs) -> Result<TimeZone> {
    TimeZone::new(args.tz_hours, args.tz_minutes, &args.tz_name)
        .with_context(|| format!("Invalid time zone: {}", args.tz_name))
}
