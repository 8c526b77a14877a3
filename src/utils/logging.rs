use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志输出
///
/// 默认 info 级别，可用 RUST_LOG 覆盖
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n机器人订单处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `order_page_url`: 下单页面地址
/// - `max_attempts`: 单个订单最大提交尝试次数
pub fn log_startup(order_page_url: &str, max_attempts: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 机器人订单处理模式");
    info!("🌐 下单页面: {}", order_page_url);
    info!("🔁 单订单最大尝试次数: {}", max_attempts);
    info!("{}", "=".repeat(60));
}

/// 记录订单加载信息
///
/// # 参数
/// - `total`: 订单总数
pub fn log_orders_loaded(total: usize) {
    info!("✓ 找到 {} 个待处理的订单", total);
    info!("📋 将按 CSV 顺序逐个处理\n");
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `archived`: 归档的收据数量
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(
    success: usize,
    failed: usize,
    total: usize,
    archived: usize,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("📦 已归档收据: {}", archived);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}
