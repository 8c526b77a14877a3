//! 收据服务 - 业务能力层
//!
//! 只负责"把收据 HTML 渲染为 PDF"能力

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Browser;
use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::page_driver::js_quote;
use crate::infrastructure::PageDriver;

/// 收据服务
///
/// 职责：
/// - 读取页面上的收据 HTML
/// - 再开一个临时页面，用浏览器自身把 HTML 打印成 PDF
/// - 渲染结束后关闭临时页面，不留打开的句柄
pub struct ReceiptService {
    receipts_dir: PathBuf,
}

impl ReceiptService {
    /// 创建新的收据服务
    pub fn new(config: &Config) -> Self {
        Self {
            receipts_dir: PathBuf::from(&config.receipts_dir),
        }
    }

    /// 收据 PDF 的存放路径（由订单号唯一决定）
    pub fn receipt_path(&self, order_number: &str) -> PathBuf {
        self.receipts_dir.join(format!("{}_receipt.pdf", order_number))
    }

    /// 把当前页面上的收据保存为 PDF
    ///
    /// # 参数
    /// - `browser`: 用于开临时渲染页面
    /// - `driver`: 当前下单页面的驱动器（收据元素必须已可见）
    /// - `order_number`: 订单号
    ///
    /// # 返回
    /// 返回生成的 PDF 路径
    pub async fn capture(
        &self,
        browser: &Browser,
        driver: &PageDriver,
        order_number: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.receipts_dir)?;

        let receipt_html = driver.inner_html("#receipt").await?;
        debug!("收据 HTML 长度: {} 字符", receipt_html.len());

        let receipt_path = self.receipt_path(order_number);
        let document = format!("<html><body>{}</body></html>", receipt_html);
        render_html_to_pdf(browser, &document, &receipt_path).await?;

        info!("🧾 收据已保存: {:?}", receipt_path);
        Ok(receipt_path)
    }
}

/// 在临时页面把 HTML 打印成 PDF
///
/// 渲染成败都关闭临时页面，失败的捕获不会积累悬挂页面
pub async fn render_html_to_pdf(browser: &Browser, html: &str, output: &Path) -> Result<()> {
    let scratch = browser.new_page("about:blank").await?;

    let rendered: Result<()> = async {
        scratch
            .evaluate(format!(
                "document.open(); document.write({}); document.close();",
                js_quote(html)
            ))
            .await?;
        scratch
            .save_pdf(
                PrintToPdfParams {
                    print_background: Some(true),
                    ..Default::default()
                },
                output,
            )
            .await?;
        Ok(())
    }
    .await;

    let closed = scratch.close().await;
    rendered?;
    closed?;
    Ok(())
}
