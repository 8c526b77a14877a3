//! 订单数据模型
//!
//! 对应 orders.csv 的一行，字段名与 CSV 表头保持一致

use serde::Deserialize;

/// 单个机器人订单
///
/// 从 CSV 读出后不可变，以订单号唯一标识
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Order {
    /// 订单号
    #[serde(rename = "Order number")]
    pub order_number: String,
    /// 头部部件编号
    #[serde(rename = "Head")]
    pub head: String,
    /// 身体部件编号
    #[serde(rename = "Body")]
    pub body: String,
    /// 腿部部件编号
    #[serde(rename = "Legs")]
    pub legs: String,
    /// 收货地址
    #[serde(rename = "Address")]
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserialize_from_csv_headers() {
        let data = "Order number,Head,Body,Legs,Address\n1,1,2,3,Test St 1\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let orders: Vec<Order> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .expect("CSV 解析失败");

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_number, "1");
        assert_eq!(orders[0].head, "1");
        assert_eq!(orders[0].body, "2");
        assert_eq!(orders[0].legs, "3");
        assert_eq!(orders[0].address, "Test St 1");
    }
}
