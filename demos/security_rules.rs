//! Security rules check for the bill store.
//!
//! 1. Alice creates `Bills/testBill` and reads it back
//! 2. Bob tries to read Alice's bill and is denied
//!
//! Run with: `cargo run --example security_rules [path/to/rules.toml]`

use std::process::ExitCode;

use billwise_rules::harness::{assert_fails, assert_succeeds, TestConfig, TestEnvironment};
use billwise_rules::Rules;
use serde_json::json;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let rules = match std::env::args().nth(1) {
        Some(path) => match Rules::load(&path) {
            Ok(rules) => rules,
            Err(e) => {
                tracing::error!(%path, error = %e, "failed to load rules");
                return ExitCode::FAILURE;
            }
        },
        None => Rules::default(),
    };

    let env = TestEnvironment::initialize(TestConfig::new("billwise-test").with_rules(rules));
    let result = run(&env);
    env.cleanup();

    match result {
        Ok(()) => {
            println!("✅ Security Rules Test: PASSED");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            println!("❌ Security Rules Test: FAILED ({})", failure);
            ExitCode::FAILURE
        }
    }
}

fn run(env: &TestEnvironment) -> Result<(), billwise_rules::AssertionFailure> {
    let alice = env.authenticated_context("alice");
    let bob = env.authenticated_context("bob");

    // Alice: should succeed
    let bill = json!({ "user_id": "alice", "title": "My Bill" });
    assert_succeeds(alice.set("Bills/testBill", bill))?;
    assert_succeeds(alice.get("Bills/testBill"))?;

    // Bob: should fail reading Alice's bill
    assert_fails(bob.get("Bills/testBill"))?;

    Ok(())
}
