//! # Robot Order Submit
//!
//! 一个从 RobotSpareBin Industries 自动订购机器人的 Rust 应用程序：
//! 下载订单 CSV → 逐单填表提交 → 收据存为 PDF → 嵌入机器人截图 → 打包归档。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageDriver` - 唯一的 page owner，提供 eval / click / fill 等能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个 Order
//! - `OrderSource` - 下载并解析 orders.csv 能力
//! - `OrderForm` - 填表、关模态框、有界重试提交能力
//! - `ReceiptService` - 收据 HTML 渲染为 PDF 能力
//! - `WatermarkService` - 截图嵌入收据 PDF 能力
//! - `ArchiveService` - 收据目录打包 zip 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个订单"的完整处理流程
//! - `OrderCtx` - 上下文封装（order_number + order_index）
//! - `OrderFlow` - 流程编排（填表 → 收据 → 截图 → 复位）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 订单批处理器，管理资源、串行调度和统计

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, launch_headless_browser};
pub use config::Config;
pub use error::{ArchiveError, BrowserError, FormError, PdfError, SourceError};
pub use infrastructure::PageDriver;
pub use models::Order;
pub use orchestrator::{App, ProcessingStats};
pub use workflow::{OrderCtx, OrderFlow, ProcessResult};
