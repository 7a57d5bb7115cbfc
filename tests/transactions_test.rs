mod common;

use anyhow::Result;
use common::{Fixture, amount, date, test_service};
use dompet::application::{AppError, ErrorKind};
use dompet::domain::{TransactionDraft, TransactionFilter, TransactionType};

#[tokio::test]
async fn test_expense_lifecycle_restores_wallet() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    let tx = service
        .create_transaction(
            TransactionDraft::new(
                fx.food.id,
                fx.a.id,
                TransactionType::Expense,
                15_000,
                date("2024-03-10"),
            )
            .with_description("Groceries"),
        )
        .await?;
    assert_eq!(amount(&service, &fx.a).await?, 85_000);

    let mut draft = TransactionDraft::from(&tx);
    draft.amount_cents = 20_000;
    let updated = service.update_transaction(tx.id, draft).await?;
    assert_eq!(updated.amount_cents, 20_000);
    assert_eq!(updated.description.as_deref(), Some("Groceries"));
    assert_eq!(amount(&service, &fx.a).await?, 80_000);

    service.delete_transaction(tx.id).await?;
    assert_eq!(amount(&service, &fx.a).await?, 100_000);

    let err = service.get_transaction(tx.id).await.unwrap_err();
    assert!(matches!(err, AppError::TransactionNotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_income_adds_to_wallet() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    service
        .create_transaction(TransactionDraft::new(
            fx.salary.id,
            fx.b.id,
            TransactionType::Income,
            300_000,
            date("2024-03-01"),
        ))
        .await?;

    assert_eq!(amount(&service, &fx.b).await?, 350_000);
    assert_eq!(amount(&service, &fx.a).await?, 100_000);

    Ok(())
}

#[tokio::test]
async fn test_expense_may_overdraw_wallet() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    service
        .create_transaction(TransactionDraft::new(
            fx.food.id,
            fx.b.id,
            TransactionType::Expense,
            60_000,
            date("2024-03-01"),
        ))
        .await?;

    assert_eq!(amount(&service, &fx.b).await?, -10_000);

    Ok(())
}

#[tokio::test]
async fn test_update_moves_effect_between_wallets() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    let tx = service
        .create_transaction(TransactionDraft::new(
            fx.food.id,
            fx.a.id,
            TransactionType::Expense,
            10_000,
            date("2024-03-10"),
        ))
        .await?;

    let mut draft = TransactionDraft::from(&tx);
    draft.wallet_id = fx.b.id;
    draft.category_id = fx.salary.id;
    draft.transaction_type = TransactionType::Income;
    draft.amount_cents = 5_000;
    service.update_transaction(tx.id, draft).await?;

    // A gets its 100 back, B gains 50 of income
    assert_eq!(amount(&service, &fx.a).await?, 100_000);
    assert_eq!(amount(&service, &fx.b).await?, 55_000);

    Ok(())
}

#[tokio::test]
async fn test_create_with_missing_references() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    let missing_wallet = service
        .create_transaction(TransactionDraft::new(
            fx.food.id,
            uuid::Uuid::new_v4(),
            TransactionType::Expense,
            100,
            date("2024-03-01"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(missing_wallet, AppError::WalletNotFound(_)));

    let missing_category = service
        .create_transaction(TransactionDraft::new(
            uuid::Uuid::new_v4(),
            fx.a.id,
            TransactionType::Expense,
            100,
            date("2024-03-01"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(missing_category, AppError::CategoryNotFound(_)));

    let listing = service
        .list_transactions(&TransactionFilter::default(), 1)
        .await?;
    assert_eq!(listing.total, 0);
    assert_eq!(amount(&service, &fx.a).await?, 100_000);

    Ok(())
}

#[tokio::test]
async fn test_negative_amount_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    let err = service
        .create_transaction(TransactionDraft::new(
            fx.food.id,
            fx.a.id,
            TransactionType::Expense,
            -500,
            date("2024-03-01"),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    Ok(())
}

#[tokio::test]
async fn test_update_missing_transaction() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    let draft = TransactionDraft::new(
        fx.food.id,
        fx.a.id,
        TransactionType::Expense,
        100,
        date("2024-03-01"),
    );
    let err = service
        .update_transaction(uuid::Uuid::new_v4(), draft)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = service
        .delete_transaction(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(amount(&service, &fx.a).await?, 100_000);

    Ok(())
}

#[tokio::test]
async fn test_list_filters_order_and_pages() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::create(&service).await?;

    for day in 1..=20 {
        service
            .create_transaction(TransactionDraft::new(
                fx.food.id,
                fx.a.id,
                TransactionType::Expense,
                100,
                date(&format!("2024-04-{day:02}")),
            ))
            .await?;
    }
    service
        .create_transaction(TransactionDraft::new(
            fx.salary.id,
            fx.b.id,
            TransactionType::Income,
            50_000,
            date("2024-03-31"),
        ))
        .await?;

    let all = TransactionFilter::default();
    let first = service.list_transactions(&all, 1).await?;
    assert_eq!(first.total, 21);
    assert_eq!(first.items.len(), 15);
    assert_eq!(first.items[0].transaction_date, date("2024-04-20"));
    assert!(first.has_next());

    let second = service.list_transactions(&all, 2).await?;
    assert_eq!(second.items.len(), 6);
    assert_eq!(second.items[5].transaction_type, TransactionType::Income);
    assert!(!second.has_next());

    let week = TransactionFilter {
        start_date: Some(date("2024-04-01")),
        end_date: Some(date("2024-04-07")),
        ..Default::default()
    };
    assert_eq!(service.list_transactions(&week, 1).await?.total, 7);

    let income = TransactionFilter {
        transaction_type: Some(TransactionType::Income),
        ..Default::default()
    };
    let page = service.list_transactions(&income, 1).await?;
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].wallet_id, fx.b.id);

    let by_wallet = TransactionFilter {
        wallet_id: Some(fx.a.id),
        category_id: Some(fx.food.id),
        ..Default::default()
    };
    assert_eq!(service.list_transactions(&by_wallet, 1).await?.total, 20);

    Ok(())
}

#[tokio::test]
async fn test_amount_overflow_rejected_and_wallet_still_readable() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fx = Fixture::with_amounts(&service, i64::MAX - 10, 0).await?;

    let err = service
        .create_transaction(TransactionDraft::new(
            fx.salary.id,
            fx.a.id,
            TransactionType::Income,
            100,
            date("2024-03-01"),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AtomicUnitFailure);

    assert_eq!(amount(&service, &fx.a).await?, i64::MAX - 10);
    let listing = service
        .list_transactions(&TransactionFilter::default(), 1)
        .await?;
    assert_eq!(listing.total, 0);

    Ok(())
}
