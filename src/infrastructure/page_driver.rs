//! 页面驱动器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露页面操作能力

use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::FormError;
use crate::utils::poll::poll_until;

/// 元素等待轮询参数（SPA 渲染有延迟，总计约 5 秒）
const ELEMENT_WAIT_ATTEMPTS: usize = 25;
const ELEMENT_WAIT_INTERVAL: Duration = Duration::from_millis(200);

/// 页面驱动器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval / click / fill 等页面能力
/// - 不认识 Order
/// - 不处理业务流程
pub struct PageDriver {
    page: Page,
}

impl PageDriver {
    /// 创建新的页面驱动器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 导航到指定 URL 并等待加载完成
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 判断元素当前是否存在于 DOM
    pub async fn exists(&self, selector: &str) -> Result<bool> {
        let script = format!(
            "!!document.querySelector({selector})",
            selector = js_quote(selector),
        );
        self.eval_as(script).await
    }

    /// 等待元素出现（有界轮询，耗尽后报 ElementNotFound）
    pub async fn wait_for_element(&self, selector: &str) -> Result<()> {
        let found = poll_until(ELEMENT_WAIT_ATTEMPTS, ELEMENT_WAIT_INTERVAL, || {
            self.exists(selector)
        })
        .await?;
        if !found {
            return Err(FormError::ElementNotFound {
                selector: selector.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// 点击匹配选择器的元素（先等待其出现）
    pub async fn click(&self, selector: &str) -> Result<()> {
        self.wait_for_element(selector).await?;
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| FormError::ElementNotFound {
                selector: selector.to_string(),
            })?;
        element.click().await?;
        Ok(())
    }

    /// 向匹配选择器的输入框填入文本（先等待其出现）
    pub async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.wait_for_element(selector).await?;
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| FormError::ElementNotFound {
                selector: selector.to_string(),
            })?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    /// 为下拉框选择指定值并触发 change 事件（先等待其出现）
    pub async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        self.wait_for_element(selector).await?;
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                if (!el) return false;
                el.value = {value};
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            selector = js_quote(selector),
            value = js_quote(value),
        );
        let found: bool = self.eval_as(script).await?;
        if !found {
            return Err(FormError::ElementNotFound {
                selector: selector.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// 点击文本内容完全匹配的按钮
    ///
    /// # 返回
    /// 返回是否找到并点击了按钮
    pub async fn click_button_with_text(&self, text: &str) -> Result<bool> {
        let script = format!(
            r#"
            (() => {{
                const target = {text};
                const btn = [...document.querySelectorAll('button')]
                    .find(b => b.textContent.trim() === target);
                if (!btn) return false;
                btn.click();
                return true;
            }})()
            "#,
            text = js_quote(text),
        );
        self.eval_as(script).await
    }

    /// 判断匹配选择器的元素当前是否可见
    pub async fn is_visible(&self, selector: &str) -> Result<bool> {
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                return !!(el && el.offsetParent !== null);
            }})()
            "#,
            selector = js_quote(selector),
        );
        self.eval_as(script).await
    }

    /// 读取匹配选择器的元素的内部 HTML
    pub async fn inner_html(&self, selector: &str) -> Result<String> {
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                return el ? el.innerHTML : null;
            }})()
            "#,
            selector = js_quote(selector),
        );
        let html: Option<String> = self.eval_as(script).await?;
        html.with_context(|| format!("未找到页面元素: {}", selector))
    }

    /// 截图匹配选择器的元素并保存为 PNG
    pub async fn screenshot_element(&self, selector: &str, output: impl AsRef<Path>) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| FormError::ElementNotFound {
                selector: selector.to_string(),
            })?;
        element
            .save_screenshot(CaptureScreenshotFormat::Png, output)
            .await?;
        Ok(())
    }
}

/// 将字符串安全地转换为 JS 字符串字面量
pub(crate) fn js_quote(s: &str) -> String {
    JsonValue::String(s.to_string()).to_string()
}
