//! 错误类型定义
//!
//! 按子系统分组的错误类型，应用层统一用 anyhow 传播

use std::path::PathBuf;

use thiserror::Error;

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
}

/// 订单数据源错误
#[derive(Debug, Error)]
pub enum SourceError {
    /// 下载订单 CSV 失败
    #[error("下载 {url} 失败: {source}")]
    DownloadFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 写入本地 CSV 副本失败
    #[error("写入 {path:?} 失败: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 解析 CSV 失败
    #[error("解析 {path:?} 失败: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// 表单提交错误
#[derive(Debug, Error)]
pub enum FormError {
    /// 页面元素未找到
    #[error("未找到页面元素: {selector}")]
    ElementNotFound { selector: String },
    /// 重试次数耗尽后收据仍未出现
    #[error("订单 {order_number} 提交 {attempts} 次后收据仍未出现")]
    ReceiptNotVisible {
        order_number: String,
        attempts: usize,
    },
}

/// PDF 处理错误
#[derive(Debug, Error)]
pub enum PdfError {
    /// 打开收据 PDF 失败
    #[error("打开 {path:?} 失败: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
    /// 收据 PDF 没有任何页面
    #[error("{path:?} 不包含任何页面")]
    EmptyDocument { path: PathBuf },
    /// 嵌入截图失败
    #[error("向 {path:?} 嵌入图片失败: {source}")]
    EmbedFailed {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
    /// 保存收据 PDF 失败
    #[error("保存 {path:?} 失败: {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 归档错误
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// 读取收据目录失败
    #[error("读取目录 {dir:?} 失败: {source}")]
    ReadDirFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入 zip 失败
    #[error("写入 {path:?} 失败: {source}")]
    ZipFailed {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}
