//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整次运行的调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (处理 Vec<Order>)
//!     ↓
//! workflow::OrderFlow (处理单个 Order)
//!     ↓
//! services (能力层：source / form / receipt / watermark / archive)
//!     ↓
//! infrastructure (基础设施：PageDriver)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：App 管整次运行，OrderFlow 管单个订单
//! 2. **资源隔离**：只有编排层持有 Browser 和 PageDriver
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，不做具体页面操作

pub mod app;

pub use app::{App, ProcessingStats};
