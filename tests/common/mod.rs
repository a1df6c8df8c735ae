// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;
use tradebook::application::{TradingService, TransactionDraft};
use tradebook::domain::{BuyerPayment, Cents, Pricing, SupplierPayment};

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(TradingService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = TradingService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Draft for a flat-priced trade with pending payments
pub fn flat_draft(
    supplier: &str,
    buyer: &str,
    purchase_price: Cents,
    delivery_price: Cents,
    transport_cost: Cents,
) -> TransactionDraft {
    TransactionDraft {
        date: parse_date("2024-03-15"),
        material: "Caustic Soda".into(),
        supplier: supplier.into(),
        buyer: buyer.into(),
        pricing: Pricing::Flat {
            purchase_price,
            delivery_price,
        },
        transport_cost,
        supplier_payment: SupplierPayment::Pending,
        buyer_payment: BuyerPayment::Pending,
    }
}

/// Draft for a per-kg trade with pending payments
pub fn per_kg_draft(
    supplier: &str,
    buyer: &str,
    quantity_kg: i64,
    purchase_price_per_kg: Cents,
    delivery_price_per_kg: Cents,
    transport_cost: Cents,
) -> TransactionDraft {
    TransactionDraft {
        date: parse_date("2024-03-15"),
        material: "Soda Ash".into(),
        supplier: supplier.into(),
        buyer: buyer.into(),
        pricing: Pricing::PerKg {
            quantity_kg,
            purchase_price_per_kg,
            delivery_price_per_kg,
        },
        transport_cost,
        supplier_payment: SupplierPayment::Pending,
        buyer_payment: BuyerPayment::Pending,
    }
}
