//! 订单批处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责订单列表的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、连接/启动浏览器、创建 PageDriver
//! 2. **订单加载**：下载并解析 orders.csv（`Vec<Order>`）
//! 3. **串行处理**：按 CSV 顺序逐个处理订单，单个失败不影响其余
//! 4. **页面恢复**：订单失败后把页面带回下单表单再继续
//! 5. **资源管理**：持有 Browser 和 PageDriver，确保生命周期正确
//! 6. **归档与统计**：循环结束后归档收据，输出全局统计信息

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{error, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::Order;
use crate::services::{ArchiveService, OrderSource};
use crate::utils::logging;
use crate::workflow::{OrderCtx, OrderFlow, ProcessResult};

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    driver: PageDriver,
}

/// 处理统计
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(&config.order_page_url, config.max_order_attempts);

        // 无头模式自己启动浏览器，否则连接已开启调试端口的浏览器
        let (browser, page) = if config.headless {
            browser::launch_headless_browser(&config.order_page_url).await?
        } else {
            browser::connect_to_browser_and_page(
                config.browser_debug_port,
                &config.order_page_url,
            )
            .await?
        };

        // 创建 PageDriver（持有 page）
        let driver = PageDriver::new(page);

        Ok(Self {
            config,
            browser,
            driver,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 下载并解析订单列表
        let orders = OrderSource::new(&self.config).fetch().await?;

        if orders.is_empty() {
            warn!("⚠️ 订单列表为空，仅归档已有收据");
        } else {
            logging::log_orders_loaded(orders.len());
        }

        // 逐个处理订单
        let stats = self.process_all_orders(&orders).await?;

        // 无论每个订单成败，循环结束后都归档一次
        let archived = ArchiveService::new(&self.config).archive()?;

        // 输出最终统计
        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            archived,
            &self.config.output_log_file,
        );

        Ok(())
    }

    /// 按 CSV 顺序串行处理所有订单
    ///
    /// 单个订单失败只记录并计数，页面恢复后继续下一个
    async fn process_all_orders(&self, orders: &[Order]) -> Result<ProcessingStats> {
        let flow = OrderFlow::new(&self.config);
        let mut stats = ProcessingStats {
            total: orders.len(),
            ..Default::default()
        };

        for (idx, order) in orders.iter().enumerate() {
            let ctx = OrderCtx::new(order.order_number.clone(), idx + 1, orders.len());

            match flow.run(&self.browser, &self.driver, order, &ctx).await {
                Ok(ProcessResult::Success) => {
                    stats.success += 1;
                }
                Ok(ProcessResult::Failed) => {
                    stats.failed += 1;
                    self.recover_page().await;
                }
                Err(e) => {
                    error!("{} ❌ 处理过程中发生错误: {}", ctx, e);
                    stats.failed += 1;
                    self.recover_page().await;
                }
            }
        }

        Ok(stats)
    }

    /// 订单失败后把页面带回下单表单
    ///
    /// 恢复失败只告警，下一个订单的 goto 还会再试一次
    async fn recover_page(&self) {
        if let Err(e) = self.driver.goto(&self.config.order_page_url).await {
            warn!("⚠️ 页面恢复失败: {}", e);
        }
    }
}
