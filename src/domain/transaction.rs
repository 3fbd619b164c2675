use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, UserId};

pub type TransactionId = Uuid;

/// What kind of event a transaction records. A transfer carries both parties
/// so either wallet's copy can name its counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum TransactionKind {
    Deposit,
    Transfer { from: UserId, to: UserId },
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Transfer { .. } => "transfer",
        }
    }
}

/// An immutable record of a single balance-affecting event in one wallet's
/// history. A peer-to-peer transfer appends one of these to each party's
/// wallet: distinct ids, identical kind and amount, the same timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(flatten)]
    pub kind: TransactionKind,
    /// Amount in cents (always positive; direction comes from the kind and
    /// which wallet holds the record)
    pub amount_cents: Cents,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Record a deposit into a wallet.
    pub fn deposit(amount_cents: Cents, date: DateTime<Utc>) -> Self {
        assert!(amount_cents > 0, "transaction amount must be positive");
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Deposit,
            amount_cents,
            date,
        }
    }

    /// Record one leg of a transfer. The caller passes the shared timestamp
    /// so both legs carry the same instant.
    pub fn transfer_leg(from: UserId, to: UserId, amount_cents: Cents, date: DateTime<Utc>) -> Self {
        assert!(amount_cents > 0, "transaction amount must be positive");
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Transfer { from, to },
            amount_cents,
            date,
        }
    }

    /// The signed effect of this transaction on the wallet identified by
    /// `owner`: deposits and incoming legs add, outgoing legs subtract.
    /// Zero for a transfer leg filed in an uninvolved wallet.
    pub fn signed_amount_for(&self, owner: UserId) -> Cents {
        match self.kind {
            TransactionKind::Deposit => self.amount_cents,
            TransactionKind::Transfer { from, to } => {
                if to == owner {
                    self.amount_cents
                } else if from == owner {
                    -self.amount_cents
                } else {
                    0
                }
            }
        }
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self.kind, TransactionKind::Transfer { .. })
    }
}
