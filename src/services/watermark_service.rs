//! 水印服务 - 业务能力层
//!
//! 只负责"截图机器人预览并嵌入收据 PDF"能力

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use lopdf::Document;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::PdfError;
use crate::infrastructure::PageDriver;

/// 机器人预览元素选择器
const ROBOT_PREVIEW_SELECTOR: &str = "#robot-preview";

/// 截图嵌入位置（PDF 坐标，原点在左下角，A4 纵向右下区域）
const WATERMARK_POSITION: (f32, f32) = (340.0, 420.0);
/// 截图嵌入尺寸（pt）
const WATERMARK_SIZE: (f32, f32) = (200.0, 266.0);

/// 水印服务
///
/// 职责：
/// - 截图机器人预览元素
/// - 把截图原样叠加到刚生成的收据 PDF（同一路径就地重写）
/// - 嵌入完成后立刻删除截图文件
pub struct WatermarkService {
    receipts_dir: PathBuf,
}

impl WatermarkService {
    /// 创建新的水印服务
    pub fn new(config: &Config) -> Self {
        Self {
            receipts_dir: PathBuf::from(&config.receipts_dir),
        }
    }

    /// 截图文件的存放路径（由订单号唯一决定，嵌入后即删除）
    pub fn screenshot_path(&self, order_number: &str) -> PathBuf {
        self.receipts_dir.join(format!("robot_{}.png", order_number))
    }

    /// 截图机器人预览并嵌入收据 PDF
    ///
    /// # 参数
    /// - `driver`: 当前下单页面的驱动器（预览元素必须已可见）
    /// - `order_number`: 订单号
    /// - `receipt_path`: 收据 PDF 路径（输入输出同一路径）
    pub async fn embed(
        &self,
        driver: &PageDriver,
        order_number: &str,
        receipt_path: &Path,
    ) -> Result<()> {
        let screenshot = self.screenshot_path(order_number);
        driver
            .screenshot_element(ROBOT_PREVIEW_SELECTOR, &screenshot)
            .await?;
        debug!("机器人截图已保存: {:?}", screenshot);

        embed_image_into_pdf(receipt_path, &screenshot, WATERMARK_POSITION, WATERMARK_SIZE)?;

        // 截图只在嵌入期间存在
        fs::remove_file(&screenshot)?;

        info!("🖼️ 截图已嵌入收据: {:?}", receipt_path);
        Ok(())
    }
}

/// 把图片叠加到 PDF 第一页并就地重写
pub fn embed_image_into_pdf(
    pdf_path: &Path,
    image_path: &Path,
    position: (f32, f32),
    size: (f32, f32),
) -> Result<(), PdfError> {
    let mut doc = Document::load(pdf_path).map_err(|e| PdfError::OpenFailed {
        path: pdf_path.to_path_buf(),
        source: e,
    })?;

    let first_page = doc
        .get_pages()
        .values()
        .next()
        .copied()
        .ok_or_else(|| PdfError::EmptyDocument {
            path: pdf_path.to_path_buf(),
        })?;

    let image = lopdf::xobject::image(image_path).map_err(|e| PdfError::EmbedFailed {
        path: pdf_path.to_path_buf(),
        source: e,
    })?;
    doc.insert_image(first_page, image, position, size)
        .map_err(|e| PdfError::EmbedFailed {
            path: pdf_path.to_path_buf(),
            source: e,
        })?;

    doc.save(pdf_path).map_err(|e| PdfError::SaveFailed {
        path: pdf_path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    })?;
    Ok(())
}
