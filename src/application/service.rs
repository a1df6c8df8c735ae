use chrono::NaiveDate;

use crate::domain::{
    company_names, project_ledger, BuyerPayment, Cents, LedgerEntry, Pricing, SupplierPayment,
    Transaction,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing high-level operations for the trade book.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct TradingService {
    repo: Repository,
}

/// Everything the user submits for one trade. Net amount is not part of the
/// draft; it is derived at recording time.
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub material: String,
    pub supplier: String,
    pub buyer: String,
    pub pricing: Pricing,
    pub transport_cost: Cents,
    pub supplier_payment: SupplierPayment,
    pub buyer_payment: BuyerPayment,
}

/// The ledger view for one company.
pub struct CompanyLedger {
    pub company: String,
    pub entries: Vec<LedgerEntry>,
}

/// The overall report: full table plus aggregate net profit.
pub struct TradingReport {
    pub transactions: Vec<Transaction>,
    pub total_net_profit: Cents,
}

impl TradingService {
    /// Create a new trading service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Validate a draft, derive the net amount, and append exactly one row.
    /// A store fault means the record was not saved; the caller may resubmit.
    pub async fn record_transaction(
        &self,
        draft: TransactionDraft,
    ) -> Result<Transaction, AppError> {
        if draft.material.trim().is_empty() {
            return Err(AppError::MissingField("material"));
        }
        if draft.supplier.trim().is_empty() {
            return Err(AppError::MissingField("supplier"));
        }
        if draft.buyer.trim().is_empty() {
            return Err(AppError::MissingField("buyer"));
        }

        let (purchase_total, delivery_total) = validate_pricing(&draft.pricing)?;
        if draft.transport_cost < 0 {
            return Err(AppError::InvalidAmount {
                field: "transport cost",
                reason: "must not be negative".into(),
            });
        }
        if purchase_total
            .checked_add(draft.transport_cost)
            .and_then(|cost| delivery_total.checked_sub(cost))
            .is_none()
        {
            return Err(AppError::InvalidAmount {
                field: "net amount",
                reason: "exceeds the representable cents range".into(),
            });
        }

        let transaction = Transaction::new(
            draft.date,
            draft.material,
            draft.supplier,
            draft.buyer,
            draft.pricing,
            draft.transport_cost,
        )
        .with_supplier_payment(draft.supplier_payment)
        .with_buyer_payment(draft.buyer_payment);

        self.repo.save_transaction(&transaction).await?;
        Ok(transaction)
    }

    /// Load all transactions, falling back to an empty set when the read
    /// fails. Read views render their empty state in that case instead of
    /// surfacing an error.
    pub async fn load_transactions(&self) -> Vec<Transaction> {
        self.repo.list_transactions().await.unwrap_or_default()
    }

    /// Sorted distinct union of supplier and buyer names.
    pub async fn list_companies(&self) -> Vec<String> {
        company_names(&self.load_transactions().await)
    }

    /// The role-tagged ledger for one company: every transaction where it
    /// appears as supplier or buyer, in natural store order.
    pub async fn company_ledger(&self, company: &str) -> CompanyLedger {
        let transactions = self.load_transactions().await;
        CompanyLedger {
            company: company.to_string(),
            entries: project_ledger(&transactions, company),
        }
    }

    /// The overall report: every transaction plus the net profit total.
    pub async fn overall_report(&self) -> TradingReport {
        let transactions = self.load_transactions().await;
        let total_net_profit = self.repo.total_net_amount().await.unwrap_or(0);
        TradingReport {
            transactions,
            total_net_profit,
        }
    }
}

/// Validate a pricing draft and return its (purchase, delivery) totals.
fn validate_pricing(pricing: &Pricing) -> Result<(Cents, Cents), AppError> {
    match *pricing {
        Pricing::Flat {
            purchase_price,
            delivery_price,
        } => {
            if purchase_price < 0 {
                return Err(AppError::InvalidAmount {
                    field: "purchase price",
                    reason: "must not be negative".into(),
                });
            }
            if delivery_price < 0 {
                return Err(AppError::InvalidAmount {
                    field: "delivery price",
                    reason: "must not be negative".into(),
                });
            }
        }
        Pricing::PerKg {
            quantity_kg,
            purchase_price_per_kg,
            delivery_price_per_kg,
        } => {
            if quantity_kg <= 0 {
                return Err(AppError::InvalidAmount {
                    field: "quantity",
                    reason: "must be positive".into(),
                });
            }
            if purchase_price_per_kg < 0 {
                return Err(AppError::InvalidAmount {
                    field: "purchase price per kg",
                    reason: "must not be negative".into(),
                });
            }
            if delivery_price_per_kg < 0 {
                return Err(AppError::InvalidAmount {
                    field: "delivery price per kg",
                    reason: "must not be negative".into(),
                });
            }
        }
    }

    pricing.checked_totals().ok_or(AppError::InvalidAmount {
        field: "quantity",
        reason: "totals exceed the representable cents range".into(),
    })
}
