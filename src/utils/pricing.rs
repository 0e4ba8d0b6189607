//! 课程价格计算

/// 按折扣百分比计算折后价，保留两位小数
pub fn final_price(list_price: f64, discount: f64) -> f64 {
    let discounted = list_price - (discount / 100.0) * list_price;
    round_to(discounted.max(0.0), 2)
}

/// 四舍五入到指定小数位
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_price() {
        assert_eq!(final_price(100.0, 20.0), 80.0);
        assert_eq!(final_price(100.0, 0.0), 100.0);
        assert_eq!(final_price(100.0, 100.0), 0.0);
        assert_eq!(final_price(49.99, 15.0), 42.49);
        assert_eq!(final_price(0.0, 50.0), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 1), 3.1);
        assert_eq!(round_to(4.25, 1), 4.3);
        assert_eq!(round_to(66.666, 2), 66.67);
    }
}
