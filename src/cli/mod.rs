use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::application::{TradingService, TransactionDraft};
use crate::domain::{
    format_cents, parse_cents, total_net_profit, BuyerPayment, Pricing, SupplierPayment,
};

/// Tradebook - Trade Record Keeper
#[derive(Parser)]
#[command(name = "tradebook")]
#[command(about = "A local-first record keeper for a small trading operation")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "tradebook.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record a new trade
    Add {
        /// Material name
        #[arg(short, long)]
        material: String,

        /// Company the material was purchased from
        #[arg(short, long)]
        supplier: String,

        /// Company the material was delivered to
        #[arg(short, long)]
        buyer: String,

        /// Purchase price (e.g., "100" or "100.00"); per kg when --quantity is given
        #[arg(long)]
        purchase_price: String,

        /// Delivery price (e.g., "150" or "150.00"); per kg when --quantity is given
        #[arg(long)]
        delivery_price: String,

        /// Transportation cost
        #[arg(long, default_value = "0")]
        transport_cost: String,

        /// Quantity in whole kilograms; switches prices to per-kg mode
        #[arg(short, long)]
        quantity: Option<i64>,

        /// Payment to supplier: pending, paid
        #[arg(long, default_value = "pending")]
        pay_supplier: String,

        /// Payment received from buyer: pending, received
        #[arg(long, default_value = "pending")]
        pay_received: String,

        /// Date of the trade (ISO 8601 format: YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List company names appearing as supplier or buyer
    Companies,

    /// Show the ledger for one company
    Ledger {
        /// Company name
        company: String,
    },

    /// Show the overall trading report
    Report,

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                TradingService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                material,
                supplier,
                buyer,
                purchase_price,
                delivery_price,
                transport_cost,
                quantity,
                pay_supplier,
                pay_received,
                date,
            } => {
                let service = TradingService::connect(&self.database).await?;

                let purchase = parse_cents(&purchase_price)
                    .context("Invalid purchase price format. Use '100.00' or '100'")?;
                let delivery = parse_cents(&delivery_price)
                    .context("Invalid delivery price format. Use '150.00' or '150'")?;
                let transport = parse_cents(&transport_cost)
                    .context("Invalid transport cost format. Use '10.00' or '10'")?;

                let pricing = match quantity {
                    Some(quantity_kg) => Pricing::PerKg {
                        quantity_kg,
                        purchase_price_per_kg: purchase,
                        delivery_price_per_kg: delivery,
                    },
                    None => Pricing::Flat {
                        purchase_price: purchase,
                        delivery_price: delivery,
                    },
                };

                let supplier_payment = SupplierPayment::from_str(&pay_supplier)
                    .with_context(|| {
                        format!(
                            "Invalid supplier payment status '{}'. Valid: pending, paid",
                            pay_supplier
                        )
                    })?;
                let buyer_payment = BuyerPayment::from_str(&pay_received).with_context(|| {
                    format!(
                        "Invalid buyer payment status '{}'. Valid: pending, received",
                        pay_received
                    )
                })?;

                let txn_date = match date {
                    Some(date_str) => parse_date(&date_str).with_context(|| {
                        format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)
                    })?,
                    None => Utc::now().date_naive(),
                };

                let transaction = service
                    .record_transaction(TransactionDraft {
                        date: txn_date,
                        material,
                        supplier,
                        buyer,
                        pricing,
                        transport_cost: transport,
                        supplier_payment,
                        buyer_payment,
                    })
                    .await?;

                println!(
                    "Recorded trade: {} {} -> {} (net {})",
                    transaction.material,
                    transaction.supplier,
                    transaction.buyer,
                    format_cents(transaction.net_amount)
                );
            }

            Commands::Companies => {
                let service = TradingService::connect(&self.database).await?;
                run_companies_command(&service).await?;
            }

            Commands::Ledger { company } => {
                let service = TradingService::connect(&self.database).await?;
                run_ledger_command(&service, &company).await?;
            }

            Commands::Report => {
                let service = TradingService::connect(&self.database).await?;
                run_report_command(&service).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = TradingService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(Into::into)
}

async fn run_companies_command(service: &TradingService) -> Result<()> {
    let companies = service.list_companies().await;
    if companies.is_empty() {
        println!("No transactions recorded yet.");
    } else {
        for company in companies {
            println!("{}", company);
        }
    }
    Ok(())
}

async fn run_ledger_command(service: &TradingService, company: &str) -> Result<()> {
    let ledger = service.company_ledger(company).await;

    if ledger.entries.is_empty() {
        println!("No transactions found for company: {}", company);
        return Ok(());
    }

    println!("Ledger for {}", ledger.company);
    println!(
        "{:<12} {:<20} {:<10} {:>12} {:>12} {:<10} {:<10}",
        "DATE", "MATERIAL", "ROLE", "PURCHASE", "DELIVERY", "SUPPLIER", "BUYER"
    );
    println!("{}", "-".repeat(92));

    for entry in &ledger.entries {
        let txn = &entry.transaction;
        println!(
            "{:<12} {:<20} {:<10} {:>12} {:>12} {:<10} {:<10}",
            txn.date.to_string(),
            txn.material,
            entry.role.to_string(),
            format_cents(txn.purchase_total()),
            format_cents(txn.delivery_total()),
            txn.supplier_payment.to_string(),
            txn.buyer_payment.to_string(),
        );
    }

    let transactions: Vec<_> = ledger
        .entries
        .iter()
        .map(|e| e.transaction.clone())
        .collect();
    println!("{}", "-".repeat(92));
    println!(
        "Net across these trades: {}",
        format_cents(total_net_profit(&transactions))
    );

    Ok(())
}

async fn run_report_command(service: &TradingService) -> Result<()> {
    let report = service.overall_report().await;

    if report.transactions.is_empty() {
        println!("No transactions recorded yet.");
        return Ok(());
    }

    println!(
        "{:<12} {:<20} {:<16} {:>12} {:>10} {:<16} {:>12} {:>12}",
        "DATE", "MATERIAL", "SUPPLIER", "PURCHASE", "TRANSPORT", "BUYER", "DELIVERY", "NET"
    );
    println!("{}", "-".repeat(118));

    for txn in &report.transactions {
        println!(
            "{:<12} {:<20} {:<16} {:>12} {:>10} {:<16} {:>12} {:>12}",
            txn.date.to_string(),
            txn.material,
            txn.supplier,
            format_cents(txn.purchase_total()),
            format_cents(txn.transport_cost),
            txn.buyer,
            format_cents(txn.delivery_total()),
            format_cents(txn.net_amount),
        );
    }

    println!("{}", "-".repeat(118));
    println!("Total net profit: {}", format_cents(report.total_net_profit));

    Ok(())
}

async fn run_export_command(
    service: &TradingService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "transactions" => {
            let count = exporter.export_transactions_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", snapshot.transactions.len());
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, full",
                export_type
            );
        }
    }

    Ok(())
}
