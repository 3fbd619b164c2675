// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use crumena::application::WalletService;
use crumena::domain::Cents;

pub const ADA: (&str, &str, &str) = ("Ada", "ada@example.com", "pw-ada");
pub const BOB: (&str, &str, &str) = ("Bob", "bob@example.com", "pw-bob");
pub const CORA: (&str, &str, &str) = ("Cora", "cora@example.com", "pw-cora");

/// Test fixture: standard registered users
pub struct StandardUsers;

impl StandardUsers {
    /// Register Ada and Bob; Ada ends up logged in.
    pub fn register_pair(service: &mut WalletService) -> Result<()> {
        service.register(ADA.0, ADA.1, ADA.2)?;
        service.register(BOB.0, BOB.1, BOB.2)?;
        service.login(ADA.1, ADA.2)?;
        Ok(())
    }

    /// Register Ada, Bob, and Cora; Ada ends up logged in.
    pub fn register_trio(service: &mut WalletService) -> Result<()> {
        Self::register_pair(service)?;
        service.register(CORA.0, CORA.1, CORA.2)?;
        service.login(ADA.1, ADA.2)?;
        Ok(())
    }
}

/// Helper to create a service with Ada and Bob registered and Ada's wallet
/// funded with the given amount.
pub fn funded_service(amount_cents: Cents) -> Result<WalletService> {
    let mut service = WalletService::new();
    StandardUsers::register_pair(&mut service)?;
    service.deposit(amount_cents)?;
    Ok(service)
}
