use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{BuyerPayment, Cents, Pricing, SupplierPayment, Transaction};

use super::MIGRATION_001_INITIAL;

const SELECT_COLUMNS: &str = "id, txn_date, material, supplier, buyer, quantity_kg, \
     purchase_price_per_kg, delivery_price_per_kg, purchase_total, delivery_total, \
     transport_cost, pay_supplier, pay_received, net_amount, recorded_at";

/// Repository for persisting and querying trade transactions.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Append one transaction row.
    pub async fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        let (quantity_kg, purchase_per_kg, delivery_per_kg) = match transaction.pricing {
            Pricing::Flat { .. } => (None, None, None),
            Pricing::PerKg {
                quantity_kg,
                purchase_price_per_kg,
                delivery_price_per_kg,
            } => (
                Some(quantity_kg),
                Some(purchase_price_per_kg),
                Some(delivery_price_per_kg),
            ),
        };

        sqlx::query(
            r#"
            INSERT INTO transactions (id, txn_date, material, supplier, buyer, quantity_kg, purchase_price_per_kg, delivery_price_per_kg, purchase_total, delivery_total, transport_cost, pay_supplier, pay_received, net_amount, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.date.to_string())
        .bind(&transaction.material)
        .bind(&transaction.supplier)
        .bind(&transaction.buyer)
        .bind(quantity_kg)
        .bind(purchase_per_kg)
        .bind(delivery_per_kg)
        .bind(transaction.purchase_total())
        .bind(transaction.delivery_total())
        .bind(transaction.transport_cost)
        .bind(transaction.supplier_payment.as_str())
        .bind(transaction.buyer_payment.as_str())
        .bind(transaction.net_amount)
        .bind(transaction.recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;

        Ok(())
    }

    /// List all transactions in insertion order.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        // rowid is SQLite's insertion order, the store's natural return order
        let query = format!("SELECT {} FROM transactions ORDER BY rowid", SELECT_COLUMNS);
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Sum net_amount over all rows using SQL aggregation.
    pub async fn total_net_amount(&self) -> Result<Cents> {
        let row = sqlx::query("SELECT COALESCE(SUM(net_amount), 0) as total FROM transactions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to compute total net amount")?;

        Ok(row.get("total"))
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let date_str: String = row.get("txn_date");
        let pay_supplier_str: String = row.get("pay_supplier");
        let pay_received_str: String = row.get("pay_received");
        let recorded_at_str: String = row.get("recorded_at");
        let quantity_kg: Option<i64> = row.get("quantity_kg");

        let pricing = match quantity_kg {
            Some(quantity_kg) => Pricing::PerKg {
                quantity_kg,
                purchase_price_per_kg: row
                    .get::<Option<Cents>, _>("purchase_price_per_kg")
                    .context("Per-kg row missing purchase_price_per_kg")?,
                delivery_price_per_kg: row
                    .get::<Option<Cents>, _>("delivery_price_per_kg")
                    .context("Per-kg row missing delivery_price_per_kg")?,
            },
            None => Pricing::Flat {
                purchase_price: row.get("purchase_total"),
                delivery_price: row.get("delivery_total"),
            },
        };

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").context("Invalid txn_date")?,
            material: row.get("material"),
            supplier: row.get("supplier"),
            buyer: row.get("buyer"),
            pricing,
            transport_cost: row.get("transport_cost"),
            supplier_payment: SupplierPayment::from_str(&pay_supplier_str).ok_or_else(|| {
                anyhow::anyhow!("Invalid supplier payment status: {}", pay_supplier_str)
            })?,
            buyer_payment: BuyerPayment::from_str(&pay_received_str).ok_or_else(|| {
                anyhow::anyhow!("Invalid buyer payment status: {}", pay_received_str)
            })?,
            net_amount: row.get("net_amount"),
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
