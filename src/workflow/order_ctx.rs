//! 订单处理上下文
//!
//! 封装"我正在处理第几个订单"这一信息

use std::fmt::Display;

/// 订单处理上下文
///
/// 包含处理单个订单所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct OrderCtx {
    /// 订单号
    pub order_number: String,

    /// 订单索引（从1开始，仅用于日志显示）
    pub order_index: usize,

    /// 本次运行的订单总数
    pub total_orders: usize,
}

impl OrderCtx {
    /// 创建新的订单上下文
    pub fn new(order_number: String, order_index: usize, total_orders: usize) -> Self {
        Self {
            order_number,
            order_index,
            total_orders,
        }
    }
}

impl Display for OrderCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[订单 #{} {}/{}]",
            self.order_number, self.order_index, self.total_orders
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctx_display() {
        let ctx = OrderCtx::new("1443".to_string(), 3, 20);
        assert_eq!(ctx.to_string(), "[订单 #1443 3/20]");
    }
}
