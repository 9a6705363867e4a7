use crate::sqlite::open_pool;
use async_trait::async_trait;
use fairy_core::signal::entity::FairyStockRecord;
use fairy_core::store::error::StoreError;
use fairy_core::store::port::SummaryStore;
use sqlx::SqlitePool;
use std::path::Path;

/// SummaryStore 的 SQLite 实现。
///
/// # Summary
/// 在独立的数据库文件中维护 `fairy_stocks_list` 表，以代码为主键保存妖股记录。
///
/// # Invariants
/// * 表结构在存储实例创建时初始化。
/// * 只做替换写入，从不删除记录。
pub struct SqliteSummaryStore {
    pool: SqlitePool,
}

impl SqliteSummaryStore {
    /// 打开汇总数据库并初始化表结构。
    ///
    /// # Logic
    /// 1. 打开 (必要时创建) 数据库文件。
    /// 2. 执行 DDL 创建 `fairy_stocks_list` 表。
    ///
    /// # Arguments
    /// * `path` - 数据库文件路径。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例或初始化错误。
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let pool = open_pool(path).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fairy_stocks_list (
                fairy_stock_symbol TEXT PRIMARY KEY,
                reasons_to_be_fairy_stocks TEXT,
                tip TEXT
            );
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::InitError(e.to_string()))?;

        Ok(Self { pool })
    }

    /// 关闭连接池，等待所有连接归还。
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SummaryStore for SqliteSummaryStore {
    /// # Summary
    /// 保存或替换一条妖股记录。
    ///
    /// # Logic
    /// 在 `fairy_stocks_list` 表上执行 `INSERT OR REPLACE`。
    ///
    /// # Arguments
    /// * `record` - 妖股记录。
    ///
    /// # Returns
    /// * `Result<(), StoreError>` - 写入失败返回 `StoreError::Write`。
    async fn upsert(&self, record: &FairyStockRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT OR REPLACE INTO fairy_stocks_list (fairy_stock_symbol, reasons_to_be_fairy_stocks, tip) VALUES (?, ?, ?)",
        )
        .bind(&record.symbol)
        .bind(&record.reasons)
        .bind(record.tip.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(())
    }

    /// # Summary
    /// 根据代码查询妖股记录。
    ///
    /// # Arguments
    /// * `symbol` - 股票代码。
    ///
    /// # Returns
    /// * `Result<Option<FairyStockRecord>, StoreError>`
    async fn get(&self, symbol: &str) -> Result<Option<FairyStockRecord>, StoreError> {
        let row = sqlx::query_as::<_, (String, Option<String>, Option<String>)>(
            "SELECT fairy_stock_symbol, reasons_to_be_fairy_stocks, tip FROM fairy_stocks_list WHERE fairy_stock_symbol = ?",
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.map(|r| FairyStockRecord {
            symbol: r.0,
            reasons: r.1.unwrap_or_default(),
            tip: r.2,
        }))
    }

    /// # Summary
    /// 列出全部妖股记录。
    ///
    /// # Returns
    /// * `Result<Vec<FairyStockRecord>, StoreError>` - 按代码升序。
    async fn list(&self) -> Result<Vec<FairyStockRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Option<String>, Option<String>)>(
            "SELECT fairy_stock_symbol, reasons_to_be_fairy_stocks, tip FROM fairy_stocks_list ORDER BY fairy_stock_symbol ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| FairyStockRecord {
                symbol: r.0,
                reasons: r.1.unwrap_or_default(),
                tip: r.2,
            })
            .collect())
    }
}
