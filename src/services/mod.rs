pub mod archive_service;
pub mod order_form;
pub mod order_source;
pub mod receipt_service;
pub mod watermark_service;

pub use archive_service::ArchiveService;
pub use order_form::OrderForm;
pub use order_source::OrderSource;
pub use receipt_service::ReceiptService;
pub use watermark_service::WatermarkService;
