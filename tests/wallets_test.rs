mod common;

use anyhow::Result;
use common::{Fixture, amount, date, default_count, test_service};
use dompet::application::{AppError, ErrorKind};
use dompet::domain::{TransactionDraft, TransactionType, TransferDraft, WalletDraft};

#[tokio::test]
async fn test_first_wallet_becomes_default() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let cash = service.create_wallet(WalletDraft::new("Cash", 0)).await?;
    assert!(cash.is_default);

    let bank = service.create_wallet(WalletDraft::new("Bank", 0)).await?;
    assert!(!bank.is_default);
    assert_eq!(default_count(&service).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_create_default_wallet_takes_over_flag() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let cash = service.create_wallet(WalletDraft::new("Cash", 0)).await?;
    let bank = service
        .create_wallet(WalletDraft::new("Bank", 0).as_default(true))
        .await?;

    assert!(bank.is_default);
    assert!(!service.get_wallet(cash.id).await?.is_default);
    assert_eq!(default_count(&service).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_negative_opening_amount_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .create_wallet(WalletDraft::new("Cash", -1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(service.list_wallets().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_update_wallet_fields_and_default() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    let draft = WalletDraft::new("Savings", 75_000)
        .with_icon("🏦")
        .with_color("#3B82F6")
        .as_default(true);
    let updated = service.update_wallet(fx.b.id, draft).await?;

    assert_eq!(updated.name, "Savings");
    assert_eq!(updated.icon, "🏦");
    assert_eq!(updated.amount_cents, 75_000);
    assert!(updated.is_default);
    assert!(!service.get_wallet(fx.a.id).await?.is_default);
    assert_eq!(default_count(&service).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_update_with_default_false_keeps_current_default() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    let draft = WalletDraft::from(&fx.a).as_default(false);
    let updated = service.update_wallet(fx.a.id, draft).await?;

    assert!(updated.is_default);
    assert_eq!(default_count(&service).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_set_default_moves_flag() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    service.set_default(fx.b.id).await?;

    let default = service.default_wallet().await?.unwrap();
    assert_eq!(default.id, fx.b.id);
    assert_eq!(default_count(&service).await?, 1);

    // listing puts the default first
    let entries = service.list_wallets().await?;
    assert_eq!(entries[0].wallet.id, fx.b.id);

    Ok(())
}

#[tokio::test]
async fn test_set_default_unknown_wallet() -> Result<()> {
    let (service, _temp) = test_service().await?;
    Fixture::create(&service).await?;

    let err = service.set_default(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::WalletNotFound(_)));
    assert_eq!(default_count(&service).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_delete_default_promotes_oldest_remaining() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;
    let c = service.create_wallet(WalletDraft::new("C", 0)).await?;

    service.delete_wallet(fx.a.id).await?;

    let default = service.default_wallet().await?.unwrap();
    assert_eq!(default.id, fx.b.id);
    assert!(!service.get_wallet(c.id).await?.is_default);
    assert_eq!(default_count(&service).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_delete_non_default_wallet() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    let deleted = service.delete_wallet(fx.b.id).await?;
    assert_eq!(deleted.name, "B");

    let err = service.get_wallet(fx.b.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(service.default_wallet().await?.unwrap().id, fx.a.id);

    Ok(())
}

#[tokio::test]
async fn test_delete_last_wallet_fails() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let only = service.create_wallet(WalletDraft::new("Only", 100)).await?;
    let err = service.delete_wallet(only.id).await.unwrap_err();

    assert!(matches!(err, AppError::LastWallet));
    assert_eq!(err.kind(), ErrorKind::LastWallet);
    assert!(service.get_wallet(only.id).await?.is_default);

    Ok(())
}

#[tokio::test]
async fn test_delete_wallet_with_transactions_blocked() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    service
        .create_transaction(TransactionDraft::new(
            fx.food.id,
            fx.b.id,
            TransactionType::Expense,
            1_000,
            date("2024-03-01"),
        ))
        .await?;

    let err = service.delete_wallet(fx.b.id).await.unwrap_err();
    match err {
        AppError::HasDependents { entity, count, .. } => {
            assert_eq!(entity, "wallet");
            assert_eq!(count, 1);
        }
        other => panic!("expected HasDependents, got {other:?}"),
    }
    assert_eq!(amount(&service, &fx.b).await?, 49_000);

    Ok(())
}

#[tokio::test]
async fn test_delete_wallet_with_transfers_blocked() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    service
        .create_transfer(TransferDraft::new(
            fx.a.id,
            fx.b.id,
            10_000,
            date("2024-03-01"),
        ))
        .await?;

    let err = service.delete_wallet(fx.b.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HasDependents);

    Ok(())
}

#[tokio::test]
async fn test_list_wallets_counts_and_total() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    for day in ["2024-03-01", "2024-03-02"] {
        service
            .create_transaction(TransactionDraft::new(
                fx.salary.id,
                fx.a.id,
                TransactionType::Income,
                2_500,
                date(day),
            ))
            .await?;
    }

    let entries = service.list_wallets().await?;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].wallet.name, "A");
    assert_eq!(entries[0].transaction_count, 2);
    assert_eq!(entries[1].transaction_count, 0);
    assert_eq!(service.total_balance().await?, 155_000);

    Ok(())
}

#[tokio::test]
async fn test_seed_defaults_only_fills_empty_tables() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let first = service.seed_defaults().await?;
    assert_eq!(first.wallets, 3);
    assert_eq!(first.categories, 13);
    assert_eq!(service.default_wallet().await?.unwrap().name, "Cash");
    assert_eq!(default_count(&service).await?, 1);

    let second = service.seed_defaults().await?;
    assert_eq!(second.wallets, 0);
    assert_eq!(second.categories, 0);
    assert_eq!(service.list_wallets().await?.len(), 3);

    Ok(())
}
