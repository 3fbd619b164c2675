mod common;

use std::fs;

use anyhow::Result;
use common::{funded_service, BOB};
use crumena::io::Exporter;
use crumena::store::StoreSnapshot;
use tempfile::TempDir;

#[test]
fn test_history_csv_has_header_and_resolved_names() -> Result<()> {
    let mut service = funded_service(10000)?;
    service.transfer_to(BOB.1, 2500)?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service).export_history_csv(&mut buffer)?;

    let csv = String::from_utf8(buffer)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(count, 2);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "id,date,type,direction,counterparty,amount");
    assert!(lines[1].contains("deposit") && lines[1].contains("100.00"));
    assert!(lines[2].contains("sent"));
    assert!(lines[2].contains("Bob"));
    assert!(lines[2].contains("-25.00"));
    Ok(())
}

#[test]
fn test_balances_csv_lists_every_user() -> Result<()> {
    let mut service = funded_service(10000)?;
    service.transfer_to(BOB.1, 4000)?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service).export_balances_csv(&mut buffer)?;

    let csv = String::from_utf8(buffer)?;
    assert_eq!(count, 2);
    assert!(csv.contains("Ada,ada@example.com,60.00"));
    assert!(csv.contains("Bob,bob@example.com,40.00"));
    Ok(())
}

#[test]
fn test_snapshot_json_round_trips() -> Result<()> {
    let mut service = funded_service(10000)?;
    service.transfer_to(BOB.1, 2500)?;

    let mut buffer = Vec::new();
    Exporter::new(&service).export_snapshot_json(&mut buffer)?;

    let parsed: StoreSnapshot = serde_json::from_slice(&buffer)?;
    assert_eq!(parsed.users.len(), 2);
    assert_eq!(parsed.wallets.len(), 2);
    let ada = parsed
        .users
        .iter()
        .find(|u| u.name == "Ada")
        .expect("Ada in snapshot");
    assert_eq!(parsed.wallets[&ada.id].balance, 7500);
    assert_eq!(parsed.session.logged_in, Some(ada.id));
    Ok(())
}

#[test]
fn test_export_to_file() -> Result<()> {
    let mut service = funded_service(500)?;
    service.transfer_to(BOB.1, 100)?;

    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("history.csv");
    let file = fs::File::create(&path)?;
    Exporter::new(&service).export_history_csv(file)?;

    let written = fs::read_to_string(&path)?;
    assert!(written.starts_with("id,date,type,direction,counterparty,amount"));
    assert_eq!(written.lines().count(), 3);
    Ok(())
}
