use thiserror::Error;

/// # Summary
/// 存储层错误枚举，处理数据库连接、读写失败等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum StoreError {
    /// 数据库操作失败 (读取或连接)
    #[error("Database error: {0}")]
    Database(String),
    /// 持久化写入未能完成，事务已回滚
    #[error("Storage write error: {0}")]
    Write(String),
    /// 已持久化的数据无法还原为实体
    #[error("Corrupt record: {0}")]
    Corrupt(String),
    /// 初始化存储失败
    #[error("Initialization error: {0}")]
    InitError(String),
}
