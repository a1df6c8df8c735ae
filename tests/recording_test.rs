mod common;

use anyhow::Result;
use common::{flat_draft, per_kg_draft, test_service};
use tradebook::application::AppError;
use tradebook::domain::{BuyerPayment, SupplierPayment};

#[tokio::test]
async fn test_record_flat_transaction() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // purchase 100, transport 10, delivery 150 -> net 40
    let txn = service
        .record_transaction(flat_draft("Acme", "Blue Dye", 10000, 15000, 1000))
        .await?;

    assert_eq!(txn.net_amount, 4000);

    // Persisted exactly once, with the derived column intact
    let stored = service.load_transactions().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, txn.id);
    assert_eq!(stored[0].net_amount, 4000);
    assert_eq!(stored[0].material, "Caustic Soda");
    assert_eq!(stored[0].supplier, "Acme");
    assert_eq!(stored[0].buyer, "Blue Dye");

    Ok(())
}

#[tokio::test]
async fn test_record_per_kg_transaction() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // 50kg at 2/kg buy, 5/kg sell, transport 20 -> totals 100/250, net 130
    let txn = service
        .record_transaction(per_kg_draft("Acme", "Blue Dye", 50, 200, 500, 2000))
        .await?;

    assert_eq!(txn.purchase_total(), 10000);
    assert_eq!(txn.delivery_total(), 25000);
    assert_eq!(txn.net_amount, 13000);

    let stored = service.load_transactions().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].pricing.quantity_kg(), Some(50));
    assert_eq!(stored[0].purchase_total(), 10000);
    assert_eq!(stored[0].delivery_total(), 25000);
    assert_eq!(stored[0].net_amount, 13000);

    Ok(())
}

#[tokio::test]
async fn test_payment_statuses_survive_roundtrip() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let mut draft = flat_draft("Acme", "Blue Dye", 100, 200, 0);
    draft.supplier_payment = SupplierPayment::Paid;
    draft.buyer_payment = BuyerPayment::Received;
    service.record_transaction(draft).await?;

    let stored = service.load_transactions().await;
    assert_eq!(stored[0].supplier_payment, SupplierPayment::Paid);
    assert_eq!(stored[0].buyer_payment, BuyerPayment::Received);

    Ok(())
}

#[tokio::test]
async fn test_empty_material_rejected_without_write() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let mut draft = flat_draft("Acme", "Blue Dye", 100, 200, 0);
    draft.material = "  ".into();
    let result = service.record_transaction(draft).await;

    assert!(matches!(result, Err(AppError::MissingField("material"))));
    assert!(service.load_transactions().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_empty_supplier_rejected_without_write() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let draft = flat_draft("", "Blue Dye", 100, 200, 0);
    let result = service.record_transaction(draft).await;

    assert!(matches!(result, Err(AppError::MissingField("supplier"))));
    assert!(service.load_transactions().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_empty_buyer_rejected_without_write() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let draft = flat_draft("Acme", "", 100, 200, 0);
    let result = service.record_transaction(draft).await;

    assert!(matches!(result, Err(AppError::MissingField("buyer"))));
    assert!(service.load_transactions().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_negative_amounts_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service
        .record_transaction(flat_draft("Acme", "Blue Dye", -100, 200, 0))
        .await;
    assert!(matches!(result, Err(AppError::InvalidAmount { .. })));

    let result = service
        .record_transaction(flat_draft("Acme", "Blue Dye", 100, 200, -50))
        .await;
    assert!(matches!(result, Err(AppError::InvalidAmount { .. })));

    let result = service
        .record_transaction(per_kg_draft("Acme", "Blue Dye", 0, 200, 500, 0))
        .await;
    assert!(matches!(result, Err(AppError::InvalidAmount { .. })));

    assert!(service.load_transactions().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_overflowing_totals_rejected_without_write() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // quantity x unit price does not fit in i64 cents
    let result = service
        .record_transaction(per_kg_draft("Acme", "Blue Dye", i64::MAX, 200, 500, 0))
        .await;
    assert!(matches!(result, Err(AppError::InvalidAmount { .. })));

    // Totals fit individually but the net formula overflows
    let result = service
        .record_transaction(flat_draft("Acme", "Blue Dye", i64::MAX, 0, 1))
        .await;
    assert!(matches!(result, Err(AppError::InvalidAmount { .. })));

    assert!(service.load_transactions().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_loss_making_trade_is_recorded() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // Selling below cost is valid; net goes negative.
    let txn = service
        .record_transaction(flat_draft("Acme", "Blue Dye", 15000, 10000, 500))
        .await?;
    assert_eq!(txn.net_amount, -5500);

    Ok(())
}
