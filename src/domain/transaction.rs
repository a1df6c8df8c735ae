use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type TransactionId = Uuid;

/// Payment status towards the supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierPayment {
    Pending,
    Paid,
}

impl SupplierPayment {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierPayment::Pending => "pending",
            SupplierPayment::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(SupplierPayment::Pending),
            "paid" => Some(SupplierPayment::Paid),
            _ => None,
        }
    }
}

impl std::fmt::Display for SupplierPayment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status from the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyerPayment {
    Pending,
    Received,
}

impl BuyerPayment {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuyerPayment::Pending => "pending",
            BuyerPayment::Received => "received",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(BuyerPayment::Pending),
            "received" => Some(BuyerPayment::Received),
            _ => None,
        }
    }
}

impl std::fmt::Display for BuyerPayment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a trade was priced.
///
/// Flat trades carry whole-trade prices; per-kg trades carry a quantity in
/// whole kilograms and unit prices, with totals derived as quantity x unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pricing {
    Flat {
        purchase_price: Cents,
        delivery_price: Cents,
    },
    PerKg {
        quantity_kg: i64,
        purchase_price_per_kg: Cents,
        delivery_price_per_kg: Cents,
    },
}

impl Pricing {
    /// Total amount paid to the supplier.
    pub fn purchase_total(&self) -> Cents {
        match *self {
            Pricing::Flat { purchase_price, .. } => purchase_price,
            Pricing::PerKg {
                quantity_kg,
                purchase_price_per_kg,
                ..
            } => quantity_kg * purchase_price_per_kg,
        }
    }

    /// Total amount charged to the buyer.
    pub fn delivery_total(&self) -> Cents {
        match *self {
            Pricing::Flat { delivery_price, .. } => delivery_price,
            Pricing::PerKg {
                quantity_kg,
                delivery_price_per_kg,
                ..
            } => quantity_kg * delivery_price_per_kg,
        }
    }

    /// Purchase and delivery totals with overflow checking. None when
    /// quantity x unit price leaves the representable cents range.
    pub fn checked_totals(&self) -> Option<(Cents, Cents)> {
        match *self {
            Pricing::Flat {
                purchase_price,
                delivery_price,
            } => Some((purchase_price, delivery_price)),
            Pricing::PerKg {
                quantity_kg,
                purchase_price_per_kg,
                delivery_price_per_kg,
            } => Some((
                quantity_kg.checked_mul(purchase_price_per_kg)?,
                quantity_kg.checked_mul(delivery_price_per_kg)?,
            )),
        }
    }

    /// Quantity in kilograms, if the trade was priced per unit.
    pub fn quantity_kg(&self) -> Option<i64> {
        match *self {
            Pricing::Flat { .. } => None,
            Pricing::PerKg { quantity_kg, .. } => Some(quantity_kg),
        }
    }
}

/// One purchase/delivery trade. Transactions are immutable once recorded;
/// there is no edit or delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Date the trade took place
    pub date: NaiveDate,
    /// What was traded
    pub material: String,
    /// Who it was purchased from
    pub supplier: String,
    /// Who it was delivered to
    pub buyer: String,
    pub pricing: Pricing,
    pub transport_cost: Cents,
    pub supplier_payment: SupplierPayment,
    pub buyer_payment: BuyerPayment,
    /// Derived margin, denormalized at write time:
    /// delivery_total - (purchase_total + transport_cost)
    pub net_amount: Cents,
    /// When we recorded this trade in the system
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction. The net amount is derived here and never
    /// recomputed later.
    pub fn new(
        date: NaiveDate,
        material: impl Into<String>,
        supplier: impl Into<String>,
        buyer: impl Into<String>,
        pricing: Pricing,
        transport_cost: Cents,
    ) -> Self {
        let net_amount = pricing.delivery_total() - (pricing.purchase_total() + transport_cost);
        Self {
            id: Uuid::new_v4(),
            date,
            material: material.into(),
            supplier: supplier.into(),
            buyer: buyer.into(),
            pricing,
            transport_cost,
            supplier_payment: SupplierPayment::Pending,
            buyer_payment: BuyerPayment::Pending,
            net_amount,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_supplier_payment(mut self, status: SupplierPayment) -> Self {
        self.supplier_payment = status;
        self
    }

    pub fn with_buyer_payment(mut self, status: BuyerPayment) -> Self {
        self.buyer_payment = status;
        self
    }

    pub fn purchase_total(&self) -> Cents {
        self.pricing.purchase_total()
    }

    pub fn delivery_total(&self) -> Cents {
        self.pricing.delivery_total()
    }
}
