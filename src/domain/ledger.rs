use std::collections::BTreeSet;

use super::{Cents, Transaction};

/// Which side of a trade a company stood on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Supplier,
    Buyer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Supplier => "Supplier",
            Role::Buyer => "Buyer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One transaction as seen from a company's ledger.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub transaction: Transaction,
    pub role: Role,
}

/// Determine the role a company plays on a transaction, if any.
/// The supplier side is checked first, so a company appearing as both
/// supplier and buyer on the same row is labelled Supplier.
pub fn role_for(transaction: &Transaction, company: &str) -> Option<Role> {
    if transaction.supplier == company {
        Some(Role::Supplier)
    } else if transaction.buyer == company {
        Some(Role::Buyer)
    } else {
        None
    }
}

/// Project the ledger for one company: every transaction where the company
/// appears as supplier or buyer, tagged with its role, in the order given.
pub fn project_ledger(transactions: &[Transaction], company: &str) -> Vec<LedgerEntry> {
    transactions
        .iter()
        .filter_map(|txn| {
            role_for(txn, company).map(|role| LedgerEntry {
                transaction: txn.clone(),
                role,
            })
        })
        .collect()
}

/// Sorted distinct union of supplier and buyer names.
pub fn company_names(transactions: &[Transaction]) -> Vec<String> {
    let mut names = BTreeSet::new();
    for txn in transactions {
        names.insert(txn.supplier.clone());
        names.insert(txn.buyer.clone());
    }
    names.into_iter().collect()
}

/// Total net profit across all transactions. Zero for an empty set.
pub fn total_net_profit(transactions: &[Transaction]) -> Cents {
    transactions.iter().map(|t| t.net_amount).sum()
}
