mod settings;

use std::path::Path;
use std::sync::Arc;

use fairy_core::config::LogConfig;
use fairy_detect::detector_suite;
use fairy_feed::yahoo::YahooProvider;
use fairy_manager::report::render;
use fairy_manager::scan::ScanManager;
use fairy_store::summary::SqliteSummaryStore;
use fairy_store::window::SqliteWindowStore;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 ScanManager。
///
/// # Logic
/// 1. 加载配置并初始化全局日志。
/// 2. 实例化基础设施层（Feed、Store）。
/// 3. 构造应用服务层（ScanManager）并执行一轮扫描。
/// 4. 将命中的妖股输出到标准输出，关闭连接池。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 配置与日志
    let config = settings::load()?;
    let _guard = init_logging(&config.log);
    info!("Fairy stock scanner starting...");

    // 2. 实例化基础设施层
    let data_dir = Path::new(&config.database.data_dir);
    let feed = Arc::new(YahooProvider::new()?);
    let windows = Arc::new(SqliteWindowStore::open(&data_dir.join(&config.database.window_db)).await?);
    let summaries =
        Arc::new(SqliteSummaryStore::open(&data_dir.join(&config.database.summary_db)).await?);

    // 3. 构造应用服务层（注入 Core Trait 抽象）
    let manager = ScanManager::new(
        feed,
        windows.clone(),
        summaries.clone(),
        detector_suite(&config.detection),
        config.scan.clone(),
    );
    let report = manager.run_pass().await;

    // 4. 输出结果
    print!("{}", render(&report));

    windows.close().await;
    summaries.close().await;
    info!("Scan finished. Exiting...");

    Ok(())
}

/// # Summary
/// 初始化全局日志。
///
/// # Logic
/// 1. `RUST_LOG` 优先，否则使用配置中的默认级别。
/// 2. 终端日志写到 stderr，stdout 只留给扫描结果。
/// 3. 配置了日志目录时追加按天滚动的文件输出。
///
/// # Returns
/// 文件输出的后台写入守卫，需在 main 结束前保持存活。
fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "fairy.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}
