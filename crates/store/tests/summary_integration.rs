use fairy_core::signal::entity::FairyStockRecord;
use fairy_core::store::port::SummaryStore;
use fairy_store::summary::SqliteSummaryStore;
use tempfile::tempdir;

fn record(symbol: &str, reasons: &str, tip: Option<&str>) -> FairyStockRecord {
    FairyStockRecord {
        symbol: symbol.to_string(),
        reasons: reasons.to_string(),
        tip: tip.map(str::to_string),
    }
}

#[tokio::test]
async fn test_summary_upsert_replaces_by_symbol() -> anyhow::Result<()> {
    let tmp_dir = tempdir()?;
    let store = SqliteSummaryStore::open(&tmp_dir.path().join("fairy_stocks.db")).await?;

    let first = record("GME", "High volatility on 2024-01-02 09:30:00", Some("check news"));
    store.upsert(&first).await?;
    assert_eq!(store.get("GME").await?, Some(first.clone()));

    // 同一记录重复写入保持不变
    store.upsert(&first).await?;
    assert_eq!(store.list().await?, vec![first]);

    let second = record(
        "GME",
        "Unusual return rate on 2024-01-03 10:00:00, 2024-01-03 10:30:00; High volatility on 2024-01-03 10:00:00, 2024-01-03 10:30:00",
        None,
    );
    store.upsert(&second).await?;
    let stored = store.get("GME").await?.expect("record should exist");
    assert_eq!(stored, second);
    assert_eq!(stored.tip, None);
    assert_eq!(store.list().await?.len(), 1);

    store.close().await;
    Ok(())
}

#[tokio::test]
async fn test_summary_keeps_stale_records() -> anyhow::Result<()> {
    let tmp_dir = tempdir()?;
    let path = tmp_dir.path().join("fairy_stocks.db");

    {
        let store = SqliteSummaryStore::open(&path).await?;
        store.upsert(&record("VFS", "High trading volume on 2024-01-02 09:30:00", None)).await?;
        store.close().await;
    }

    let store = SqliteSummaryStore::open(&path).await?;
    store.upsert(&record("CVNA", "High volatility on 2024-01-02 09:30:00", None)).await?;

    let symbols: Vec<String> = store.list().await?.into_iter().map(|r| r.symbol).collect();
    assert_eq!(symbols, vec!["CVNA".to_string(), "VFS".to_string()]);
    assert!(store.get("AAPL").await?.is_none());
    Ok(())
}
