/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 订单 CSV 下载地址
    pub orders_csv_url: String,
    /// 机器人下单页面地址
    pub order_page_url: String,
    /// 订单 CSV 本地保存路径（每次运行覆盖）
    pub orders_csv_path: String,
    /// 收据 PDF 输出目录
    pub receipts_dir: String,
    /// 收据 zip 归档路径
    pub archive_path: String,
    /// 浏览器调试端口（非无头模式下连接用）
    pub browser_debug_port: u16,
    /// 是否启动无头浏览器（否则连接已开启调试端口的浏览器）
    pub headless: bool,
    /// 单个订单最大提交尝试次数
    pub max_order_attempts: usize,
    /// 两次提交尝试之间的等待时间（毫秒）
    pub order_retry_interval_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            order_page_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            orders_csv_path: "orders.csv".to_string(),
            receipts_dir: "output/receipts".to_string(),
            archive_path: "receipts.zip".to_string(),
            browser_debug_port: 9222,
            headless: true,
            max_order_attempts: 10,
            order_retry_interval_ms: 1000,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            orders_csv_url: std::env::var("ORDERS_CSV_URL").unwrap_or(default.orders_csv_url),
            order_page_url: std::env::var("ORDER_PAGE_URL").unwrap_or(default.order_page_url),
            orders_csv_path: std::env::var("ORDERS_CSV_PATH").unwrap_or(default.orders_csv_path),
            receipts_dir: std::env::var("RECEIPTS_DIR").unwrap_or(default.receipts_dir),
            archive_path: std::env::var("ARCHIVE_PATH").unwrap_or(default.archive_path),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            max_order_attempts: std::env::var("MAX_ORDER_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_order_attempts),
            order_retry_interval_ms: std::env::var("ORDER_RETRY_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.order_retry_interval_ms),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
