use crate::sqlite::{open_pool, quote_ident};
use async_trait::async_trait;
use fairy_core::common::Ticker;
use fairy_core::common::time::{format_timestamp, parse_timestamp};
use fairy_core::market::entity::{AugmentedObservation, Observation};
use fairy_core::store::error::StoreError;
use fairy_core::store::port::WindowStore;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::debug;

/// 窗口表的一行: Date, Open, High, Low, Close, Volume, Log_Return
type WindowRow = (String, f64, f64, f64, f64, i64, Option<f64>);

/// WindowStore 的 SQLite 实现，采用"一股一表"策略。
///
/// # Summary
/// 所有标的共用一个数据库文件，每个标的一张以 `Ticker::table_name()` 命名的表，
/// 以 `Date` 为主键保存滚动窗口。
///
/// # Invariants
/// * `Date` 以 `YYYY-MM-DD HH:MM:SS` 文本存储，按文本排序即按时间排序。
/// * 单次 `ingest` 的 Upsert 与淘汰在同一事务内完成。
pub struct SqliteWindowStore {
    pool: SqlitePool,
}

impl SqliteWindowStore {
    /// 打开窗口数据库。
    ///
    /// # Arguments
    /// * `path` - 数据库文件路径，不存在时自动创建。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例或初始化错误。
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            pool: open_pool(path).await?,
        })
    }

    /// 关闭连接池，等待所有连接归还。
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ? COLLATE NOCASE")
                .bind(table)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(found.is_some())
    }
}

fn write_err(e: sqlx::Error) -> StoreError {
    StoreError::Write(e.to_string())
}

fn into_observation(row: WindowRow) -> Result<AugmentedObservation, StoreError> {
    let (date, open, high, low, close, volume, log_return) = row;
    let time = parse_timestamp(&date)
        .map_err(|e| StoreError::Corrupt(format!("bad Date {:?}: {}", date, e)))?;
    let volume = u64::try_from(volume)
        .map_err(|_| StoreError::Corrupt(format!("negative Volume at {}", date)))?;
    Ok(AugmentedObservation {
        bar: Observation {
            time,
            open,
            high,
            low,
            close,
            volume,
        },
        log_return,
    })
}

#[async_trait]
impl WindowStore for SqliteWindowStore {
    /// # Summary
    /// 将新数据合并进标的窗口并维持容量上限。
    ///
    /// # Logic
    /// 1. 开启事务，必要时建表。
    /// 2. 逐行 `INSERT OR REPLACE`。
    /// 3. 统计行数，超出 `max_rows` 时按 `Date ASC` 删除最旧的多余行。
    /// 4. 提交事务；任一步失败则事务随 drop 回滚，窗口保持原状。
    /// 5. 读取并返回提交后的窗口快照。
    ///
    /// # Arguments
    /// * `ticker` - 目标标的。
    /// * `rows` - 新数据。
    /// * `max_rows` - 容量上限，必须大于 0。
    ///
    /// # Returns
    /// * `Result<Vec<AugmentedObservation>, StoreError>` - 按时间升序的窗口快照。
    async fn ingest(
        &self,
        ticker: &Ticker,
        rows: &[AugmentedObservation],
        max_rows: usize,
    ) -> Result<Vec<AugmentedObservation>, StoreError> {
        if max_rows == 0 {
            return Err(StoreError::Write("max_rows must be positive".into()));
        }
        let limit = i64::try_from(max_rows).map_err(|e| StoreError::Write(e.to_string()))?;
        let table = quote_ident(&ticker.table_name());

        let mut tx = self.pool.begin().await.map_err(write_err)?;

        let create = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                Date TEXT PRIMARY KEY,
                Open REAL,
                High REAL,
                Low REAL,
                Close REAL,
                Volume INTEGER,
                Log_Return REAL
            );
            "#
        );
        sqlx::query(&create)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;

        let insert = format!(
            "INSERT OR REPLACE INTO {table} (Date, Open, High, Low, Close, Volume, Log_Return) \
             VALUES (?, ?, ?, ?, ?, ?, ?)"
        );
        for row in rows {
            let volume =
                i64::try_from(row.bar.volume).map_err(|e| StoreError::Write(e.to_string()))?;
            sqlx::query(&insert)
                .bind(format_timestamp(&row.bar.time))
                .bind(row.bar.open)
                .bind(row.bar.high)
                .bind(row.bar.low)
                .bind(row.bar.close)
                .bind(volume)
                .bind(row.log_return)
                .execute(&mut *tx)
                .await
                .map_err(write_err)?;
        }

        let count_sql = format!("SELECT COUNT(*) FROM {table}");
        let (count,): (i64,) = sqlx::query_as(&count_sql)
            .fetch_one(&mut *tx)
            .await
            .map_err(write_err)?;

        let excess = count - limit;
        if excess > 0 {
            let evict = format!(
                "DELETE FROM {table} WHERE Date IN (SELECT Date FROM {table} ORDER BY Date ASC LIMIT ?)"
            );
            sqlx::query(&evict)
                .bind(excess)
                .execute(&mut *tx)
                .await
                .map_err(write_err)?;
            debug!(ticker = %ticker, evicted = excess, "evicted oldest window rows");
        }

        tx.commit().await.map_err(write_err)?;

        self.load_window(ticker).await
    }

    /// # Summary
    /// 读取标的当前窗口。
    ///
    /// # Logic
    /// 1. 表不存在时返回空列表。
    /// 2. 按 `Date ASC` 读取全部行并还原为实体。
    ///
    /// # Arguments
    /// * `ticker` - 目标标的。
    ///
    /// # Returns
    /// * `Result<Vec<AugmentedObservation>, StoreError>`
    async fn load_window(&self, ticker: &Ticker) -> Result<Vec<AugmentedObservation>, StoreError> {
        let name = ticker.table_name();
        if !self.table_exists(&name).await? {
            return Ok(vec![]);
        }

        let select = format!(
            "SELECT Date, Open, High, Low, Close, Volume, Log_Return FROM {} ORDER BY Date ASC",
            quote_ident(&name)
        );
        let records = sqlx::query_as::<_, WindowRow>(&select)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        records.into_iter().map(into_observation).collect()
    }
}
