use crate::domain::{Cents, IntegrityReport, Transaction, TransactionKind, User, UserId};
use crate::store::{LedgerStore, StoreSnapshot, TransferReceipt};

use super::AppError;

/// The presentation layer's side of the split-validation contract: amount
/// positivity, recipient selection, and funds sufficiency are all checked
/// here before the store is invoked, and the store re-checks on its own.
/// This is the primary interface for any client (shell, tests, export).
pub struct WalletService {
    store: LedgerStore,
}

/// How a history entry affected the wallet it is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Deposit,
    Sent,
    Received,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Deposit => "deposit",
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }
}

/// One transaction prepared for display: classified by direction, with the
/// counterparty id resolved to a name where one applies.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub transaction: Transaction,
    pub direction: Direction,
    pub counterparty: Option<String>,
}

impl HistoryEntry {
    /// Signed amount as the owning wallet experienced it.
    pub fn signed_amount(&self) -> Cents {
        match self.direction {
            Direction::Sent => -self.transaction.amount_cents,
            _ => self.transaction.amount_cents,
        }
    }
}

/// Result of a completed transfer, with names resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub receipt: TransferReceipt,
    pub recipient_name: String,
}

impl WalletService {
    pub fn new() -> Self {
        Self {
            store: LedgerStore::new(),
        }
    }

    pub fn with_store(store: LedgerStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    // ========================
    // Session
    // ========================

    pub fn register(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<User, AppError> {
        Ok(self.store.register(name, email, password)?)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User, AppError> {
        Ok(self.store.login(email, password)?)
    }

    pub fn logout(&mut self) {
        self.store.logout();
    }

    /// Called on navigation between the login and register pages.
    pub fn clear_error_messages(&mut self) {
        self.store.clear_error_messages();
    }

    pub fn current_user(&self) -> Result<&User, AppError> {
        self.store.logged_in_user().ok_or(AppError::NotLoggedIn)
    }

    pub fn register_error(&self) -> Option<&str> {
        self.store.session().register_error.as_deref()
    }

    pub fn login_error(&self) -> Option<&str> {
        self.store.session().login_error.as_deref()
    }

    // ========================
    // Wallet
    // ========================

    /// Deposit into the logged-in user's wallet.
    pub fn deposit(&mut self, amount_cents: Cents) -> Result<Transaction, AppError> {
        let user_id = self.current_user()?.id;
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(amount_cents));
        }
        Ok(self.store.deposit(user_id, amount_cents)?)
    }

    /// Transfer from the logged-in user to the recipient with the given
    /// email. Every check here is a pre-check; the store re-validates.
    pub fn transfer_to(
        &mut self,
        recipient_email: &str,
        amount_cents: Cents,
    ) -> Result<TransferOutcome, AppError> {
        let sender = self.current_user()?;
        let sender_id = sender.id;

        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(amount_cents));
        }

        let recipient = self
            .store
            .user_by_email(recipient_email)
            .ok_or_else(|| AppError::RecipientNotFound(recipient_email.to_string()))?;
        let recipient_id = recipient.id;
        let recipient_name = recipient.name.clone();

        if recipient_id == sender_id {
            return Err(AppError::TransferToSelf);
        }

        let balance = self.balance()?;
        if balance < amount_cents {
            return Err(AppError::InsufficientFunds {
                balance,
                required: amount_cents,
            });
        }

        let receipt = self.store.transfer(sender_id, recipient_id, amount_cents)?;
        Ok(TransferOutcome {
            receipt,
            recipient_name,
        })
    }

    pub fn balance(&self) -> Result<Cents, AppError> {
        let user_id = self.current_user()?.id;
        self.store
            .wallet(user_id)
            .map(|w| w.balance)
            .ok_or(AppError::Ledger(
                crate::store::LedgerError::WalletNotFound(user_id),
            ))
    }

    /// The logged-in user's history, newest last, with counterparty names
    /// resolved for display.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, AppError> {
        let user_id = self.current_user()?.id;
        let wallet = self.store.wallet(user_id).ok_or(AppError::Ledger(
            crate::store::LedgerError::WalletNotFound(user_id),
        ))?;

        Ok(wallet
            .transactions
            .iter()
            .map(|tx| self.classify(user_id, tx.clone()))
            .collect())
    }

    fn classify(&self, owner: UserId, transaction: Transaction) -> HistoryEntry {
        let (direction, counterparty_id) = match transaction.kind {
            TransactionKind::Deposit => (Direction::Deposit, None),
            TransactionKind::Transfer { from, to } if from == owner => {
                (Direction::Sent, Some(to))
            }
            TransactionKind::Transfer { from, .. } => (Direction::Received, Some(from)),
        };

        let counterparty = counterparty_id
            .map(|id| self.resolve_name(id));

        HistoryEntry {
            transaction,
            direction,
            counterparty,
        }
    }

    fn resolve_name(&self, id: UserId) -> String {
        self.store
            .user(id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    // ========================
    // Directory & inspection
    // ========================

    /// All registered users, for recipient selection.
    pub fn users(&self) -> &[User] {
        self.store.users()
    }

    pub fn check_integrity(&self) -> IntegrityReport {
        self.store.check_integrity()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }
}

impl Default for WalletService {
    fn default() -> Self {
        Self::new()
    }
}
