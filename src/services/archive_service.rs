//! 归档服务 - 业务能力层
//!
//! 只负责"把收据目录打包为 zip"能力

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::Config;
use crate::error::ArchiveError;

/// 归档时排除的图片扩展名（残留截图不进包）
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// 归档服务
///
/// 职责：
/// - 扫描收据目录里当前实际存在的文件（而非内存中的列表）
/// - 打包所有非图片文件到单个 zip
/// - 每次运行整体重建 zip，新增收据重跑即可进包
pub struct ArchiveService {
    receipts_dir: PathBuf,
    archive_path: PathBuf,
}

impl ArchiveService {
    /// 创建新的归档服务
    pub fn new(config: &Config) -> Self {
        Self {
            receipts_dir: PathBuf::from(&config.receipts_dir),
            archive_path: PathBuf::from(&config.archive_path),
        }
    }

    /// 把收据目录打包为 zip
    ///
    /// # 返回
    /// 返回归档的文件数量
    pub fn archive(&self) -> Result<usize> {
        if !self.receipts_dir.is_dir() {
            warn!("⚠️ 收据目录 {:?} 不存在，跳过归档", self.receipts_dir);
            return Ok(0);
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(&self.receipts_dir)
            .map_err(|e| ArchiveError::ReadDirFailed {
                dir: self.receipts_dir.clone(),
                source: e,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && !is_image(path))
            .collect();
        // 固定归档顺序
        entries.sort();

        let file = File::create(&self.archive_path)?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut count = 0;
        for path in &entries {
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            zip.start_file(name.as_str(), options)
                .map_err(|e| ArchiveError::ZipFailed {
                    path: self.archive_path.clone(),
                    source: e,
                })?;
            let mut reader = File::open(path)?;
            io::copy(&mut reader, &mut zip)?;
            debug!("已归档: {}", name);
            count += 1;
        }

        zip.finish().map_err(|e| ArchiveError::ZipFailed {
            path: self.archive_path.clone(),
            source: e,
        })?;

        info!("📦 已归档 {} 个收据至 {:?}", count, self.archive_path);
        Ok(count)
    }
}

/// 判断文件是否为图片（按扩展名）
fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}
