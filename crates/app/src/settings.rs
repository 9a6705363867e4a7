use config::{Config, ConfigError, Environment, File};
use fairy_core::config::AppConfig;
use std::path::Path;

/// 未设置 FAIRY_CONFIG 时读取的配置文件，格式按扩展名推断
const DEFAULT_CONFIG_FILE: &str = "fairy.toml";

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 以内置默认值为底。
/// 2. 叠加可选的 TOML 文件 (路径取自 `FAIRY_CONFIG`，默认 `fairy.toml`)。
/// 3. 叠加 `FAIRY__SECTION__KEY` 形式的环境变量。
///
/// # Returns
/// 合并后的 AppConfig，文件或变量无法解析时返回 ConfigError。
pub fn load() -> Result<AppConfig, ConfigError> {
    let path = std::env::var("FAIRY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    load_from(Path::new(&path), env_source())
}

fn env_source() -> Environment {
    Environment::with_prefix("FAIRY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("scan.tickers")
}

fn load_from(path: &Path, env: Environment) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(File::from(path).required(false))
        .add_source(env)
        .build()?
        .try_deserialize()
}
