use std::collections::{HashMap, HashSet};

use super::{Cents, Transaction, User, UserId, Wallet};

/// Recompute a wallet's balance by replaying its transaction history.
/// Balance = deposits + incoming transfer legs - outgoing transfer legs.
pub fn replay_balance(owner: UserId, transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .fold(0, |balance, tx| balance + tx.signed_amount_for(owner))
}

/// A single inconsistency found while auditing the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// Stored balance disagrees with the replay of the wallet's history.
    BalanceMismatch {
        user_id: UserId,
        stored: Cents,
        replayed: Cents,
    },
    /// A wallet balance went below zero.
    NegativeBalance { user_id: UserId, balance: Cents },
    /// A user has no wallet, or a wallet has no user.
    OrphanWallet { user_id: UserId },
    MissingWallet { user_id: UserId },
    /// Two users share an email address.
    DuplicateEmail { email: String },
    /// The session points at a user that does not exist.
    DanglingSession { user_id: UserId },
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityIssue::BalanceMismatch {
                user_id,
                stored,
                replayed,
            } => write!(
                f,
                "wallet {user_id}: stored balance {stored} but history replays to {replayed}"
            ),
            IntegrityIssue::NegativeBalance { user_id, balance } => {
                write!(f, "wallet {user_id}: negative balance {balance}")
            }
            IntegrityIssue::OrphanWallet { user_id } => {
                write!(f, "wallet {user_id} has no matching user")
            }
            IntegrityIssue::MissingWallet { user_id } => {
                write!(f, "user {user_id} has no wallet")
            }
            IntegrityIssue::DuplicateEmail { email } => {
                write!(f, "email {email} registered more than once")
            }
            IntegrityIssue::DanglingSession { user_id } => {
                write!(f, "logged-in user {user_id} does not exist")
            }
        }
    }
}

/// Result of a full ledger audit.
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub user_count: usize,
    pub wallet_count: usize,
    pub transaction_count: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Audit users, wallets, and session against the ledger invariants.
pub fn build_integrity_report(
    users: &[User],
    wallets: &HashMap<UserId, Wallet>,
    logged_in: Option<UserId>,
) -> IntegrityReport {
    let mut issues = Vec::new();
    let user_ids: HashSet<UserId> = users.iter().map(|u| u.id).collect();

    let mut seen_emails = HashSet::new();
    for user in users {
        if !seen_emails.insert(user.email.as_str()) {
            issues.push(IntegrityIssue::DuplicateEmail {
                email: user.email.clone(),
            });
        }
        if !wallets.contains_key(&user.id) {
            issues.push(IntegrityIssue::MissingWallet { user_id: user.id });
        }
    }

    let mut transaction_count = 0;
    for (user_id, wallet) in wallets {
        transaction_count += wallet.transactions.len();

        if !user_ids.contains(user_id) {
            issues.push(IntegrityIssue::OrphanWallet { user_id: *user_id });
        }
        if wallet.balance < 0 {
            issues.push(IntegrityIssue::NegativeBalance {
                user_id: *user_id,
                balance: wallet.balance,
            });
        }
        let replayed = replay_balance(*user_id, &wallet.transactions);
        if replayed != wallet.balance {
            issues.push(IntegrityIssue::BalanceMismatch {
                user_id: *user_id,
                stored: wallet.balance,
                replayed,
            });
        }
    }

    if let Some(user_id) = logged_in {
        if !user_ids.contains(&user_id) {
            issues.push(IntegrityIssue::DanglingSession { user_id });
        }
    }

    IntegrityReport {
        user_count: users.len(),
        wallet_count: wallets.len(),
        transaction_count,
        issues,
    }
}
