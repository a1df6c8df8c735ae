use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::TradingService;
use crate::domain::{format_cents, Transaction};

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeBookSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for converting recorded trades to tabular formats
pub struct Exporter<'a> {
    service: &'a TradingService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a TradingService) -> Self {
        Self { service }
    }

    /// Export all transactions to CSV format
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.load_transactions().await;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record([
            "id",
            "date",
            "material",
            "supplier",
            "buyer",
            "quantity_kg",
            "purchase_total",
            "delivery_total",
            "transport_cost",
            "pay_supplier",
            "pay_received",
            "net_amount",
        ])?;

        let mut count = 0;
        for transaction in &transactions {
            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.date.to_string(),
                transaction.material.clone(),
                transaction.supplier.clone(),
                transaction.buyer.clone(),
                transaction
                    .pricing
                    .quantity_kg()
                    .map(|q| q.to_string())
                    .unwrap_or_default(),
                format_cents(transaction.purchase_total()),
                format_cents(transaction.delivery_total()),
                format_cents(transaction.transport_cost),
                transaction.supplier_payment.to_string(),
                transaction.buyer_payment.to_string(),
                format_cents(transaction.net_amount),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full database as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<TradeBookSnapshot> {
        let transactions = self.service.load_transactions().await;

        let snapshot = TradeBookSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
