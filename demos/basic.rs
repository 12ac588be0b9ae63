//! Basic example of using an `Account`.
//!
//! Run with: `cargo run --example basic`

use std::rc::Rc;

use bank_account::{parse_confirmation_code, Account, AccountContext, Decimal, TimeZone};

fn main() {
    // Initialize logger (optional, but shows what's happening)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let context = Rc::new(AccountContext::default());
    let mts = TimeZone::new(-2, 0, "MTS").expect("valid time zone");
    let mut account = Account::new(
        &context,
        "123456",
        "Eric",
        "Idle",
        Some(mts.clone()),
        Decimal::from(1000),
    )
    .expect("valid account");

    println!("{} opened with {}", account.full_name(), account.balance());
    account.set_first_name("Daniel").expect("valid name");
    println!("Renamed to {}", account.full_name());

    let deposit = account.deposit(Decimal::from(100)).expect("valid deposit");
    println!("{deposit} -> balance {}", account.balance());

    if let Err(e) = account.deposit(Decimal::from(-100)) {
        println!("Deposit refused: {e}");
    }
    if let Err(e) = account.withdrawal(Decimal::from(-100)) {
        println!("Withdrawal refused: {e}");
    }

    // Insufficient funds is not an error, it yields an X code
    let rejected = account.withdrawal(Decimal::from(2000)).expect("valid amount");
    println!("{rejected} -> balance {}", account.balance());

    let interest = account.pay_interest().expect("balance fits");
    println!("{interest} -> balance {}", account.balance());

    println!("\n=== Decoded ===");
    for code in [&deposit, &rejected, &interest] {
        let parsed = parse_confirmation_code(code.as_str(), Some(&mts)).expect("well-formed code");
        println!("{parsed:?}");
    }
}
