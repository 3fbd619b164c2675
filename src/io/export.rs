use std::io::Write;

use anyhow::Result;

use crate::application::WalletService;
use crate::domain::format_cents;
use crate::store::StoreSnapshot;

/// Read-only exporter over the live in-memory state. Nothing here persists
/// or restores the store; exports are reporting output.
pub struct Exporter<'a> {
    service: &'a WalletService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a WalletService) -> Self {
        Self { service }
    }

    /// Export the logged-in user's transaction history to CSV.
    /// Returns the number of rows written.
    pub fn export_history_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let history = self.service.history()?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "date",
            "type",
            "direction",
            "counterparty",
            "amount",
        ])?;

        let mut count = 0;
        for entry in &history {
            csv_writer.write_record([
                entry.transaction.id.to_string(),
                entry.transaction.date.to_rfc3339(),
                entry.transaction.kind.as_str().to_string(),
                entry.direction.as_str().to_string(),
                entry.counterparty.clone().unwrap_or_default(),
                format_cents(entry.signed_amount()),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export every user's name, email, and balance to CSV.
    pub fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["name", "email", "balance"])?;

        let mut count = 0;
        for user in self.service.users() {
            let balance = self
                .service
                .store()
                .wallet(user.id)
                .map(|w| w.balance)
                .unwrap_or_default();
            csv_writer.write_record([
                user.name.clone(),
                user.email.clone(),
                format_cents(balance),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full store as a JSON snapshot.
    pub fn export_snapshot_json<W: Write>(&self, mut writer: W) -> Result<StoreSnapshot> {
        let snapshot = self.service.snapshot();

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
