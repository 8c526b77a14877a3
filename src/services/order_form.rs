//! 下单表单服务 - 业务能力层
//!
//! 只处理单个订单的表单填写与提交，不关心订单列表

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::FormError;
use crate::infrastructure::PageDriver;
use crate::models::Order;
use crate::utils::poll::poll_until;

/// 收据元素选择器，提交成功后出现
const RECEIPT_SELECTOR: &str = "#receipt";
/// 腿部部件输入框（页面上没有 id，只能按占位符定位）
const LEGS_INPUT_SELECTOR: &str = "input[placeholder='Enter the part number for the legs']";

/// 模态框等待轮询参数（进入页面后弹出略有延迟）
const MODAL_WAIT_ATTEMPTS: usize = 10;
const MODAL_WAIT_INTERVAL: Duration = Duration::from_millis(200);

/// 下单表单服务
///
/// 职责：
/// - 关闭进入下单页面时弹出的模态框
/// - 按订单内容填写表单
/// - 预览后反复点击 Order，直到收据出现或尝试次数耗尽
pub struct OrderForm {
    max_attempts: usize,
    retry_interval: Duration,
}

impl OrderForm {
    /// 创建新的下单表单服务
    pub fn new(config: &Config) -> Self {
        Self {
            max_attempts: config.max_order_attempts,
            retry_interval: Duration::from_millis(config.order_retry_interval_ms),
        }
    }

    /// 关闭下单页面弹出的模态框
    ///
    /// 每次进入下单页面都会弹出一次，点掉 "OK" 即可
    pub async fn close_modal(&self, driver: &PageDriver) -> Result<()> {
        let clicked = poll_until(MODAL_WAIT_ATTEMPTS, MODAL_WAIT_INTERVAL, || {
            driver.click_button_with_text("OK")
        })
        .await?;
        if clicked {
            debug!("已关闭模态框");
        } else {
            warn!("⚠️ 未发现模态框，跳过关闭");
        }
        Ok(())
    }

    /// 填写表单并提交，直到收据出现
    pub async fn submit(&self, driver: &PageDriver, order: &Order) -> Result<()> {
        self.fill(driver, order).await?;

        if !driver.click_button_with_text("Preview").await? {
            return Err(FormError::ElementNotFound {
                selector: "button 'Preview'".to_string(),
            }
            .into());
        }
        debug!("已点击 Preview");

        // 网站会随机提交失败，收据出现前反复点击 Order
        let clicks = click_until_receipt(
            &order.order_number,
            self.max_attempts,
            self.retry_interval,
            || driver.click_button_with_text("Order"),
            || driver.is_visible(RECEIPT_SELECTOR),
        )
        .await?;
        info!(
            "✓ 订单 {} 提交成功 (点击 Order {} 次)",
            order.order_number, clicks
        );
        Ok(())
    }

    /// 按订单内容填写表单字段
    async fn fill(&self, driver: &PageDriver, order: &Order) -> Result<()> {
        debug!(
            "填写表单: head={} body={} legs={} address={}",
            order.head, order.body, order.legs, order.address
        );

        driver.select_option("#head", &order.head).await?;
        driver.click(&format!("#id-body-{}", order.body)).await?;
        driver.fill(LEGS_INPUT_SELECTOR, &order.legs).await?;
        driver.fill("#address", &order.address).await?;

        Ok(())
    }
}

/// 点击 Order 直到收据出现
///
/// 每轮先查收据再点击：下单成功后 Order 按钮会消失，
/// 先点击会把已成功的订单误报为按钮缺失
///
/// # 返回
/// 返回收据出现前点击 Order 的次数
async fn click_until_receipt<C, V, CF, VF>(
    order_number: &str,
    max_attempts: usize,
    interval: Duration,
    mut click_order: C,
    mut receipt_visible: V,
) -> Result<usize>
where
    C: FnMut() -> CF,
    CF: Future<Output = Result<bool>>,
    V: FnMut() -> VF,
    VF: Future<Output = Result<bool>>,
{
    for attempt in 1..=max_attempts {
        if receipt_visible().await? {
            return Ok(attempt - 1);
        }
        if !click_order().await? {
            return Err(FormError::ElementNotFound {
                selector: "button 'Order'".to_string(),
            }
            .into());
        }
        debug!("订单 {} 第 {}/{} 次点击 Order", order_number, attempt, max_attempts);
        sleep(interval).await;
    }

    // 最后一次点击之后收据可能刚好出现
    if receipt_visible().await? {
        return Ok(max_attempts);
    }

    Err(FormError::ReceiptNotVisible {
        order_number: order_number.to_string(),
        attempts: max_attempts,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_retry_exhaustion_yields_receipt_not_visible() {
        let clicks = Cell::new(0usize);
        let result = click_until_receipt(
            "1443",
            3,
            Duration::ZERO,
            || {
                clicks.set(clicks.get() + 1);
                async { Ok(true) }
            },
            || async { Ok(false) },
        )
        .await;

        let err = result.expect_err("收据永不出现时应该报错");
        match err.downcast_ref::<FormError>() {
            Some(FormError::ReceiptNotVisible {
                order_number,
                attempts,
            }) => {
                assert_eq!(order_number, "1443");
                assert_eq!(*attempts, 3);
            }
            other => panic!("错误类型不对: {:?}", other),
        }
        assert_eq!(clicks.get(), 3);
    }

    #[tokio::test]
    async fn test_receipt_appears_after_retries() {
        let clicks = Cell::new(0usize);
        let clicked = click_until_receipt(
            "1",
            5,
            Duration::ZERO,
            || {
                clicks.set(clicks.get() + 1);
                async { Ok(true) }
            },
            || {
                let seen = clicks.get();
                async move { Ok(seen >= 2) }
            },
        )
        .await
        .expect("收据出现后应该成功");

        assert_eq!(clicked, 2);
    }

    #[tokio::test]
    async fn test_visible_receipt_wins_even_without_order_button() {
        // 收据已出现而 Order 按钮已消失时，应该算成功而不是报按钮缺失
        let clicked = click_until_receipt(
            "2",
            5,
            Duration::ZERO,
            || async { Ok(false) },
            || async { Ok(true) },
        )
        .await
        .expect("收据已出现时应该直接成功");

        assert_eq!(clicked, 0);
    }
}
