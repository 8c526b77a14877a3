use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::BrowserError;

/// 启动无头浏览器并导航到下单页面
pub async fn launch_headless_browser(url: &str) -> Result<(Browser, Page)> {
    info!("🚀 启动无头浏览器...");
    debug!("目标 URL: {}", url);

    // 配置无头浏览器
    let config = BrowserConfig::builder()
        .new_headless_mode()
        .args(vec![
            "--disable-gpu",             // 无头模式下禁用 GPU
            "--no-sandbox",              // 禁用沙盒，防止权限问题导致的崩溃
            "--disable-dev-shm-usage",   // 防止共享内存不足
            "--remote-debugging-port=0", // 让浏览器自动选择端口
        ])
        .build()
        .map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            BrowserError::ConfigurationFailed(e)
        })?;

    // 启动浏览器
    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        BrowserError::PageCreationFailed {
            source: Box::new(e),
        }
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    // 创建新页面并导航
    let page = browser.new_page(url).await.map_err(|e| {
        error!("创建页面失败: {}", e);
        BrowserError::NavigationFailed {
            url: url.to_string(),
            source: Box::new(e),
        }
    })?;

    info!("✅ 无头浏览器已导航到: {}", url);

    Ok((browser, page))
}
