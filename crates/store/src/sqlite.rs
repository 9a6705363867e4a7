use fairy_core::store::error::StoreError;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::path::Path;

/// 打开 (必要时创建) 指定路径的 SQLite 数据库。
///
/// # Logic
/// 1. 确保数据库文件所在目录存在。
/// 2. 配置 SQLite 连接选项，开启 `create_if_missing`。
/// 3. 建立连接池。
///
/// # Arguments
/// * `path` - 数据库文件路径。
///
/// # Returns
/// * `Result<SqlitePool, StoreError>` - 连接池或初始化错误。
pub async fn open_pool(path: &Path) -> Result<SqlitePool, StoreError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).map_err(|e| StoreError::InitError(e.to_string()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .map_err(|e| StoreError::InitError(e.to_string()))
}

/// 为 SQLite 标识符加双引号。
///
/// 名称中的双引号按 SQL 规则转义为两个双引号。
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
