//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的完整处理流程
//!
//! 流程顺序：
//! 1. 进入下单页面 → 关闭模态框
//! 2. 填表提交 → 等待收据出现
//! 3. 收据存为 PDF → 机器人截图嵌入 PDF
//! 4. 点击 order-another 回到初始表单

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::FormError;
use crate::infrastructure::PageDriver;
use crate::models::Order;
use crate::services::{OrderForm, ReceiptService, WatermarkService};
use crate::workflow::order_ctx::OrderCtx;

/// 订单处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// 处理成功
    Success,
    /// 处理失败（本订单放弃，继续后续订单）
    Failed,
}

/// 订单处理流程
///
/// - 编排单个订单的完整处理流程
/// - 决定何时填表、何时存收据、何时复位页面
/// - 不持有任何资源（page / browser）
/// - 只依赖业务能力（services）
pub struct OrderFlow {
    order_page_url: String,
    order_form: OrderForm,
    receipt_service: ReceiptService,
    watermark_service: WatermarkService,
}

impl OrderFlow {
    /// 创建新的订单处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            order_page_url: config.order_page_url.clone(),
            order_form: OrderForm::new(config),
            receipt_service: ReceiptService::new(config),
            watermark_service: WatermarkService::new(config),
        }
    }

    /// 处理单个订单
    pub async fn run(
        &self,
        browser: &Browser,
        driver: &PageDriver,
        order: &Order,
        ctx: &OrderCtx,
    ) -> Result<ProcessResult> {
        info!("{} 📝 开始填写表单", ctx);

        // 每个订单都从下单页面重新开始，进入时会弹一次模态框
        driver.goto(&self.order_page_url).await?;
        self.order_form.close_modal(driver).await?;

        // 重试耗尽只放弃本订单，其他错误向上传播
        if let Err(e) = self.order_form.submit(driver, order).await {
            let outcome = classify_submit_error(e)?;
            warn!("{} ⚠️ 提交重试耗尽，收据未出现，放弃本订单", ctx);
            return Ok(outcome);
        }

        let receipt_path = self
            .receipt_service
            .capture(browser, driver, &ctx.order_number)
            .await?;

        self.watermark_service
            .embed(driver, &ctx.order_number, &receipt_path)
            .await?;

        // 回到初始表单，供下一个订单使用
        self.reset(driver).await?;

        info!("{} ✅ 处理完成", ctx);
        Ok(ProcessResult::Success)
    }

    /// 点击 order-another 回到初始表单
    ///
    /// 不验证导航结果，下一个订单进入时会重新 goto
    async fn reset(&self, driver: &PageDriver) -> Result<()> {
        driver.click("#order-another").await?;
        Ok(())
    }
}

/// 把提交错误归类：重试耗尽 → Failed（本订单放弃），其余错误向上传播
fn classify_submit_error(e: anyhow::Error) -> Result<ProcessResult> {
    match e.downcast_ref::<FormError>() {
        Some(FormError::ReceiptNotVisible { .. }) => Ok(ProcessResult::Failed),
        _ => Err(e),
    }
}
