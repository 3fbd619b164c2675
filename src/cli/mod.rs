use std::fs::File;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{HistoryEntry, WalletService};
use crate::domain::{format_cents, parse_cents};
use crate::io::Exporter;

/// Crumena - peer-to-peer wallet
#[derive(Parser)]
#[command(name = "crumena")]
#[command(about = "An in-memory peer-to-peer wallet with an interactive shell")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// One line of shell input. `no_binary_name` because lines arrive without an
/// argv[0].
#[derive(Parser)]
#[command(name = "crumena", no_binary_name = true, disable_version_flag = true)]
#[command(help_template = "Commands:\n{subcommands}")]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Register a new user and log in
    Register {
        /// Display name
        name: String,

        /// Email address (must be unique)
        email: String,

        /// Password
        password: String,
    },

    /// Log in with email and password
    Login {
        email: String,
        password: String,
    },

    /// Log out the current user
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Deposit into your wallet
    Deposit {
        /// Amount (e.g., "50.00" or "50")
        amount: String,
    },

    /// Transfer to another user
    Transfer {
        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Recipient email
        #[arg(long)]
        to: String,
    },

    /// Show your balance
    Balance,

    /// Show your transaction history
    History,

    /// List registered users
    Users,

    /// Verify ledger integrity
    Check,

    /// Export data to CSV or JSON
    Export {
        /// What to export: history, balances, snapshot
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Exit the shell
    #[command(alias = "exit")]
    Quit,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut service = WalletService::new();
        let stdin = io::stdin();

        println!("crumena {} - type 'help' for commands", env!("CARGO_PKG_VERSION"));

        loop {
            self.print_prompt(&service)?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                // EOF
                break;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            let parsed = match ShellLine::try_parse_from(tokens.iter().copied()) {
                Ok(parsed) => parsed,
                Err(e) => {
                    let _ = e.print();
                    continue;
                }
            };

            match self.dispatch(&mut service, parsed.command) {
                Ok(ShellFlow::Continue) => {}
                Ok(ShellFlow::Quit) => break,
                Err(e) => eprintln!("Error: {e}"),
            }
        }

        Ok(())
    }

    fn print_prompt(&self, service: &WalletService) -> Result<()> {
        let who = service
            .current_user()
            .map(|u| u.name.clone())
            .unwrap_or_else(|_| "guest".to_string());
        print!("{who}> ");
        io::stdout().flush()?;
        Ok(())
    }

    fn dispatch(&self, service: &mut WalletService, command: ShellCommand) -> Result<ShellFlow> {
        match command {
            ShellCommand::Register {
                name,
                email,
                password,
            } => {
                // Arriving at the form clears stale error messages.
                service.clear_error_messages();
                match service.register(&name, &email, &password) {
                    Ok(user) => {
                        println!("Registered and logged in as {} <{}>", user.name, user.email);
                    }
                    Err(_) => {
                        if let Some(message) = service.register_error() {
                            eprintln!("{message}");
                        }
                    }
                }
            }

            ShellCommand::Login { email, password } => {
                service.clear_error_messages();
                match service.login(&email, &password) {
                    Ok(user) => println!("Logged in as {} <{}>", user.name, user.email),
                    Err(_) => {
                        if let Some(message) = service.login_error() {
                            eprintln!("{message}");
                        }
                    }
                }
            }

            ShellCommand::Logout => {
                service.logout();
                println!("Logged out");
            }

            ShellCommand::Whoami => {
                let user = service.current_user()?;
                println!("{} <{}>", user.name, user.email);
            }

            ShellCommand::Deposit { amount } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                service.deposit(amount_cents)?;
                println!(
                    "Deposited {}. Balance: {}",
                    format_cents(amount_cents),
                    format_cents(service.balance()?)
                );
            }

            ShellCommand::Transfer { amount, to } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let outcome = service.transfer_to(&to, amount_cents)?;
                println!(
                    "Sent {} to {}. Balance: {}",
                    format_cents(outcome.receipt.amount_cents),
                    outcome.recipient_name,
                    format_cents(service.balance()?)
                );
                if self.verbose {
                    eprintln!(
                        "[transfer] sender leg {} / receiver leg {}",
                        outcome.receipt.sender_leg.id, outcome.receipt.receiver_leg.id
                    );
                }
            }

            ShellCommand::Balance => {
                println!("{}", format_cents(service.balance()?));
            }

            ShellCommand::History => {
                let history = service.history()?;
                if history.is_empty() {
                    println!("No transactions yet");
                } else {
                    for entry in &history {
                        println!("{}", render_history_line(entry));
                    }
                }
            }

            ShellCommand::Users => {
                let me = service.current_user().map(|u| u.id).ok();
                for user in service.users() {
                    let marker = if Some(user.id) == me { " (you)" } else { "" };
                    println!("{} <{}>{}", user.name, user.email, marker);
                }
            }

            ShellCommand::Check => {
                let report = service.check_integrity();
                println!(
                    "{} user(s), {} wallet(s), {} transaction(s)",
                    report.user_count, report.wallet_count, report.transaction_count
                );
                if report.is_clean() {
                    println!("Ledger is consistent");
                } else {
                    for issue in &report.issues {
                        eprintln!("Issue: {issue}");
                    }
                }
            }

            ShellCommand::Export {
                export_type,
                output,
            } => {
                self.run_export(service, &export_type, output.as_deref())?;
            }

            ShellCommand::Quit => return Ok(ShellFlow::Quit),
        }

        Ok(ShellFlow::Continue)
    }

    fn run_export(
        &self,
        service: &WalletService,
        export_type: &str,
        output: Option<&str>,
    ) -> Result<()> {
        let exporter = Exporter::new(service);

        let mut writer: Box<dyn Write> = match output {
            Some(path) => Box::new(
                File::create(path).with_context(|| format!("Cannot create file: {path}"))?,
            ),
            None => Box::new(io::stdout()),
        };

        match export_type {
            "history" => {
                let count = exporter.export_history_csv(&mut writer)?;
                if self.verbose {
                    eprintln!("[export] {count} history row(s)");
                }
            }
            "balances" => {
                let count = exporter.export_balances_csv(&mut writer)?;
                if self.verbose {
                    eprintln!("[export] {count} balance row(s)");
                }
            }
            "snapshot" => {
                exporter.export_snapshot_json(&mut writer)?;
            }
            other => anyhow::bail!("Unknown export type: {other} (use history, balances, snapshot)"),
        }

        Ok(())
    }
}

enum ShellFlow {
    Continue,
    Quit,
}

/// Date formatting happens only here, at the display boundary.
fn render_history_line(entry: &HistoryEntry) -> String {
    let date = entry.transaction.date.format("%Y-%m-%d %H:%M");
    let amount = format_cents(entry.signed_amount());
    match &entry.counterparty {
        Some(name) => format!(
            "{date}  {:<8}  {amount:>12}  ({name})",
            entry.direction.as_str()
        ),
        None => format!("{date}  {:<8}  {amount:>12}", entry.direction.as_str()),
    }
}
