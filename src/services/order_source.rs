//! 订单数据源服务 - 业务能力层
//!
//! 只负责"下载并解析 orders.csv"能力，不关心流程

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::SourceError;
use crate::models::Order;

/// 订单数据源服务
///
/// 职责：
/// - 下载订单 CSV（覆盖本地副本）
/// - 按表头顺序解析为订单列表
/// - 不做重试，失败直接向上传播
pub struct OrderSource {
    csv_url: String,
    local_path: PathBuf,
}

impl OrderSource {
    /// 创建新的订单数据源服务
    pub fn new(config: &Config) -> Self {
        Self {
            csv_url: config.orders_csv_url.clone(),
            local_path: PathBuf::from(&config.orders_csv_path),
        }
    }

    /// 下载并解析订单列表
    ///
    /// # 返回
    /// 按 CSV 文件顺序返回订单
    pub async fn fetch(&self) -> Result<Vec<Order>> {
        self.download().await?;
        let orders = self.read_local()?;
        info!("✓ 已加载 {} 个订单", orders.len());
        Ok(orders)
    }

    /// 下载 CSV 并覆盖本地副本
    async fn download(&self) -> Result<()> {
        info!("⬇️ 正在下载订单列表: {}", self.csv_url);
        let response = reqwest::get(&self.csv_url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SourceError::DownloadFailed {
                url: self.csv_url.clone(),
                source: e,
            })?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::DownloadFailed {
                url: self.csv_url.clone(),
                source: e,
            })?;
        fs::write(&self.local_path, &bytes).map_err(|e| SourceError::WriteFailed {
            path: self.local_path.clone(),
            source: e,
        })?;
        debug!("CSV 已保存至 {:?} ({} 字节)", self.local_path, bytes.len());
        Ok(())
    }

    /// 解析本地 CSV 副本（首行为表头）
    pub fn read_local(&self) -> Result<Vec<Order>, SourceError> {
        let mut reader =
            csv::Reader::from_path(&self.local_path).map_err(|e| SourceError::ParseFailed {
                path: self.local_path.clone(),
                source: e,
            })?;
        reader
            .deserialize()
            .collect::<Result<Vec<Order>, csv::Error>>()
            .map_err(|e| SourceError::ParseFailed {
                path: self.local_path.clone(),
                source: e,
            })
    }
}
