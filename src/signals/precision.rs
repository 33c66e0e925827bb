/// Display decimals for a price: 2 from 1000 up, 3 from 100, 4 from 1, otherwise 5
pub fn price_precision(price: f64) -> usize {
    match price.abs() {
        p if p >= 1000.0 => 2,
        p if p >= 100.0 => 3,
        p if p >= 1.0 => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_bands() {
        assert_eq!(price_precision(42_500.0), 2);
        assert_eq!(price_precision(1000.0), 2);
        assert_eq!(price_precision(999.99), 3);
        assert_eq!(price_precision(100.0), 3);
        assert_eq!(price_precision(1.0842), 4);
        assert_eq!(price_precision(0.6543), 5);
        assert_eq!(price_precision(f64::NAN), 5);
    }
}
