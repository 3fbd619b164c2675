use serde::{Deserialize, Serialize};

use super::{Cents, Transaction};

/// A per-user balance plus its ordered transaction history. Insertion order
/// is chronological order; history is append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: Cents,
    pub transactions: Vec<Transaction>,
}

impl Wallet {
    /// A fresh wallet as created at registration: zero balance, no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a credit and file its transaction.
    pub(crate) fn credit(&mut self, transaction: Transaction) {
        self.balance += transaction.amount_cents;
        self.transactions.push(transaction);
    }

    /// Apply a debit and file its transaction. Callers must have checked
    /// funds sufficiency; the non-negative balance invariant is enforced
    /// here as a last line.
    pub(crate) fn debit(&mut self, transaction: Transaction) {
        debug_assert!(self.balance >= transaction.amount_cents);
        self.balance -= transaction.amount_cents;
        self.transactions.push(transaction);
    }

    pub fn can_cover(&self, amount_cents: Cents) -> bool {
        self.balance >= amount_cents
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
