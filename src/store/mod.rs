use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    build_integrity_report, Cents, IntegrityReport, Transaction, User, UserId, Wallet,
};

/// Rejections signaled by the store itself. The presentation layer performs
/// its own pre-checks; these fire anyway when the store is called directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("No wallet for user: {0}")]
    WalletNotFound(UserId),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Cents),

    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: Cents, required: Cents },

    #[error("Cannot transfer to the sending wallet")]
    TransferToSelf,
}

/// Who is authenticated, plus the pending error messages the UI reads back
/// after a failed register or login. The messages are cleared explicitly on
/// navigation, not as a side effect of unrelated operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: Option<UserId>,
    pub register_error: Option<String>,
    pub login_error: Option<String>,
}

/// Both legs of a completed transfer, as appended to the two wallets.
/// Same kind, amount, and timestamp; distinct ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub from: UserId,
    pub to: UserId,
    pub amount_cents: Cents,
    pub date: DateTime<Utc>,
    pub sender_leg: Transaction,
    pub receiver_leg: Transaction,
}

/// Serializable view of the entire store, for export and inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub users: Vec<User>,
    pub wallets: HashMap<UserId, Wallet>,
    pub session: Session,
}

/// The single authority over users, wallets, and session state.
///
/// All operations are synchronous and total: a failed operation returns an
/// error and leaves every user, wallet, and balance untouched. The store is
/// an ordinary value; build one per app, or one per test.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    users: Vec<User>,
    wallets: HashMap<UserId, Wallet>,
    session: Session,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Session operations
    // ========================

    /// Register a new user and log them in. On a duplicate email nothing
    /// changes except the register error message.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<User, LedgerError> {
        let email = email.into();
        if self.users.iter().any(|u| u.email == email) {
            self.session.register_error = Some("The email is already registered.".to_string());
            return Err(LedgerError::EmailTaken(email));
        }

        let user = User::new(name, email, password);
        self.wallets.insert(user.id, Wallet::new());
        self.users.push(user.clone());
        self.session.logged_in = Some(user.id);
        self.session.register_error = None;
        Ok(user)
    }

    /// Authenticate by exact email and password match. The error does not
    /// distinguish an unknown email from a wrong password.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, LedgerError> {
        match self
            .users
            .iter()
            .find(|u| u.credentials_match(email, password))
        {
            Some(user) => {
                let user = user.clone();
                self.session.logged_in = Some(user.id);
                self.session.login_error = None;
                Ok(user)
            }
            None => {
                self.session.logged_in = None;
                self.session.login_error = Some("Incorrect email or password.".to_string());
                Err(LedgerError::InvalidCredentials)
            }
        }
    }

    /// Clear the authenticated user. Error messages, users, and wallets are
    /// left alone.
    pub fn logout(&mut self) {
        self.session.logged_in = None;
    }

    /// Reset both pending error messages, as on navigation between pages.
    pub fn clear_error_messages(&mut self) {
        self.session.register_error = None;
        self.session.login_error = None;
    }

    // ========================
    // Wallet operations
    // ========================

    /// Credit a wallet and append the deposit to its history.
    pub fn deposit(&mut self, user_id: UserId, amount_cents: Cents) -> Result<Transaction, LedgerError> {
        if amount_cents <= 0 {
            return Err(LedgerError::NonPositiveAmount(amount_cents));
        }
        let wallet = self
            .wallets
            .get_mut(&user_id)
            .ok_or(LedgerError::WalletNotFound(user_id))?;

        let transaction = Transaction::deposit(amount_cents, Utc::now());
        wallet.credit(transaction.clone());
        Ok(transaction)
    }

    /// Move funds between two wallets, appending one transfer leg to each.
    /// All checks run before any mutation, so a rejected transfer changes
    /// nothing.
    pub fn transfer(
        &mut self,
        from: UserId,
        to: UserId,
        amount_cents: Cents,
    ) -> Result<TransferReceipt, LedgerError> {
        if amount_cents <= 0 {
            return Err(LedgerError::NonPositiveAmount(amount_cents));
        }
        if from == to {
            return Err(LedgerError::TransferToSelf);
        }
        if !self.wallets.contains_key(&to) {
            return Err(LedgerError::WalletNotFound(to));
        }
        let balance = self
            .wallets
            .get(&from)
            .map(|w| w.balance)
            .ok_or(LedgerError::WalletNotFound(from))?;
        if balance < amount_cents {
            return Err(LedgerError::InsufficientFunds {
                balance,
                required: amount_cents,
            });
        }

        // One timestamp shared by both legs; each leg gets its own id.
        let at = Utc::now();
        let sender_leg = Transaction::transfer_leg(from, to, amount_cents, at);
        let receiver_leg = Transaction::transfer_leg(from, to, amount_cents, at);

        let receipt = TransferReceipt {
            from,
            to,
            amount_cents,
            date: at,
            sender_leg: sender_leg.clone(),
            receiver_leg: receiver_leg.clone(),
        };

        // Both wallets were checked above.
        if let Some(wallet) = self.wallets.get_mut(&from) {
            wallet.debit(sender_leg);
        }
        if let Some(wallet) = self.wallets.get_mut(&to) {
            wallet.credit(receiver_leg);
        }
        Ok(receipt)
    }

    // ========================
    // Reads
    // ========================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn logged_in_user(&self) -> Option<&User> {
        self.session.logged_in.and_then(|id| self.user(id))
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn wallet(&self, user_id: UserId) -> Option<&Wallet> {
        self.wallets.get(&user_id)
    }

    /// Replay every wallet's history and audit the ledger invariants.
    pub fn check_integrity(&self) -> IntegrityReport {
        build_integrity_report(&self.users, &self.wallets, self.session.logged_in)
    }

    /// Full serializable snapshot of the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            users: self.users.clone(),
            wallets: self.wallets.clone(),
            session: self.session.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered_store() -> (LedgerStore, UserId, UserId) {
        let mut store = LedgerStore::new();
        let ada = store.register("Ada", "ada@example.com", "pw1").unwrap();
        let bob = store.register("Bob", "bob@example.com", "pw2").unwrap();
        (store, ada.id, bob.id)
    }

    #[test]
    fn test_register_creates_user_and_empty_wallet_and_logs_in() {
        let mut store = LedgerStore::new();
        let user = store.register("Ada", "ada@example.com", "pw").unwrap();

        assert_eq!(store.users().len(), 1);
        let wallet = store.wallet(user.id).unwrap();
        assert_eq!(wallet.balance, 0);
        assert!(wallet.is_empty());
        assert_eq!(store.session().logged_in, Some(user.id));
        assert!(store.session().register_error.is_none());
    }

    #[test]
    fn test_register_duplicate_email_changes_nothing_but_error() {
        let mut store = LedgerStore::new();
        let first = store.register("Ada", "ada@example.com", "pw").unwrap();
        store.deposit(first.id, 500).unwrap();

        let err = store.register("Imposter", "ada@example.com", "other");
        assert_eq!(err, Err(LedgerError::EmailTaken("ada@example.com".into())));
        assert_eq!(store.users().len(), 1);
        assert_eq!(store.wallet(first.id).unwrap().balance, 500);
        assert!(store.session().register_error.is_some());
        // The original registrant stays logged in.
        assert_eq!(store.session().logged_in, Some(first.id));
    }

    #[test]
    fn test_login_success_and_failure() {
        let mut store = LedgerStore::new();
        let user = store.register("Ada", "ada@example.com", "pw1").unwrap();
        store.logout();

        let err = store.login("ada@example.com", "wrong");
        assert_eq!(err, Err(LedgerError::InvalidCredentials));
        assert!(store.session().logged_in.is_none());
        assert!(store.session().login_error.is_some());

        // Unknown email gets the same error as a wrong password.
        assert_eq!(
            store.login("nobody@example.com", "pw1"),
            Err(LedgerError::InvalidCredentials)
        );

        let back = store.login("ada@example.com", "pw1").unwrap();
        assert_eq!(back.id, user.id);
        assert_eq!(store.session().logged_in, Some(user.id));
        assert!(store.session().login_error.is_none());
    }

    #[test]
    fn test_failed_login_clears_previous_session() {
        let mut store = LedgerStore::new();
        let user = store.register("Ada", "ada@example.com", "pw1").unwrap();
        assert_eq!(store.session().logged_in, Some(user.id));

        let _ = store.login("ada@example.com", "wrong");
        assert!(store.session().logged_in.is_none());
    }

    #[test]
    fn test_logout_leaves_error_messages_alone() {
        let mut store = LedgerStore::new();
        store.register("Ada", "ada@example.com", "pw").unwrap();
        let _ = store.register("B", "ada@example.com", "pw");
        assert!(store.session().register_error.is_some());

        store.logout();
        assert!(store.session().logged_in.is_none());
        assert!(store.session().register_error.is_some());

        store.clear_error_messages();
        assert!(store.session().register_error.is_none());
        assert!(store.session().login_error.is_none());
    }

    #[test]
    fn test_deposit_updates_balance_and_history() {
        let (mut store, ada, _) = registered_store();

        let tx = store.deposit(ada, 2500).unwrap();
        assert_eq!(tx.amount_cents, 2500);

        let wallet = store.wallet(ada).unwrap();
        assert_eq!(wallet.balance, 2500);
        assert_eq!(wallet.transactions.len(), 1);
        assert_eq!(wallet.transactions[0].id, tx.id);
    }

    #[test]
    fn test_deposit_rejects_unknown_wallet_and_bad_amounts() {
        let (mut store, ada, _) = registered_store();
        let stranger = uuid::Uuid::new_v4();

        assert_eq!(
            store.deposit(stranger, 100),
            Err(LedgerError::WalletNotFound(stranger))
        );
        assert_eq!(store.deposit(ada, 0), Err(LedgerError::NonPositiveAmount(0)));
        assert_eq!(
            store.deposit(ada, -5),
            Err(LedgerError::NonPositiveAmount(-5))
        );
        assert!(store.wallet(ada).unwrap().is_empty());
    }

    #[test]
    fn test_transfer_moves_funds_and_appends_one_leg_each() {
        let (mut store, ada, bob) = registered_store();
        store.deposit(ada, 10000).unwrap();

        let receipt = store.transfer(ada, bob, 4000).unwrap();

        assert_eq!(store.wallet(ada).unwrap().balance, 6000);
        assert_eq!(store.wallet(bob).unwrap().balance, 4000);
        assert_eq!(store.wallet(ada).unwrap().transactions.len(), 2);
        assert_eq!(store.wallet(bob).unwrap().transactions.len(), 1);

        assert_ne!(receipt.sender_leg.id, receipt.receiver_leg.id);
        assert_eq!(receipt.sender_leg.date, receipt.receiver_leg.date);
        assert_eq!(receipt.sender_leg.kind, receipt.receiver_leg.kind);
        assert_eq!(receipt.sender_leg.amount_cents, 4000);
    }

    #[test]
    fn test_transfer_insufficient_funds_changes_nothing() {
        let (mut store, ada, bob) = registered_store();
        store.deposit(ada, 1000).unwrap();

        let err = store.transfer(ada, bob, 1001);
        assert_eq!(
            err,
            Err(LedgerError::InsufficientFunds {
                balance: 1000,
                required: 1001
            })
        );
        assert_eq!(store.wallet(ada).unwrap().balance, 1000);
        assert_eq!(store.wallet(bob).unwrap().balance, 0);
        assert_eq!(store.wallet(ada).unwrap().transactions.len(), 1);
        assert!(store.wallet(bob).unwrap().is_empty());
    }

    #[test]
    fn test_transfer_rejects_self_missing_wallets_and_bad_amounts() {
        let (mut store, ada, bob) = registered_store();
        store.deposit(ada, 1000).unwrap();
        let stranger = uuid::Uuid::new_v4();

        assert_eq!(store.transfer(ada, ada, 100), Err(LedgerError::TransferToSelf));
        assert_eq!(
            store.transfer(ada, stranger, 100),
            Err(LedgerError::WalletNotFound(stranger))
        );
        assert_eq!(
            store.transfer(stranger, bob, 100),
            Err(LedgerError::WalletNotFound(stranger))
        );
        assert_eq!(
            store.transfer(ada, bob, 0),
            Err(LedgerError::NonPositiveAmount(0))
        );

        assert_eq!(store.wallet(ada).unwrap().balance, 1000);
        assert!(store.wallet(bob).unwrap().is_empty());
    }

    #[test]
    fn test_exact_balance_transfer_drains_to_zero_not_below() {
        let (mut store, ada, bob) = registered_store();
        store.deposit(ada, 500).unwrap();

        store.transfer(ada, bob, 500).unwrap();
        assert_eq!(store.wallet(ada).unwrap().balance, 0);
        assert_eq!(
            store.transfer(ada, bob, 1),
            Err(LedgerError::InsufficientFunds {
                balance: 0,
                required: 1
            })
        );
    }

    #[test]
    fn test_integrity_holds_over_operation_sequences() {
        let (mut store, ada, bob) = registered_store();
        let cat = store.register("Cat", "cat@example.com", "pw3").unwrap().id;

        store.deposit(ada, 10000).unwrap();
        store.deposit(bob, 300).unwrap();
        store.transfer(ada, bob, 2500).unwrap();
        store.transfer(bob, cat, 2800).unwrap();
        let _ = store.transfer(cat, ada, 99999); // rejected, must not corrupt
        store.transfer(cat, ada, 100).unwrap();

        let report = store.check_integrity();
        assert!(report.is_clean(), "issues: {:?}", report.issues);
        assert_eq!(report.user_count, 3);
        assert_eq!(report.wallet_count, 3);

        // Deposits created all value in the system; transfers conserve it.
        let total: i64 = [ada, bob, cat]
            .iter()
            .map(|id| store.wallet(*id).unwrap().balance)
            .sum();
        assert_eq!(total, 10300);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let (mut store, ada, bob) = registered_store();
        store.deposit(ada, 100).unwrap();
        store.transfer(ada, bob, 40).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.users.len(), 2);
        assert_eq!(snapshot.wallets[&ada].balance, 60);
        assert_eq!(snapshot.wallets[&bob].balance, 40);
        assert_eq!(snapshot.session.logged_in, Some(bob));
    }
}
