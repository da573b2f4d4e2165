//! Quoting conventions per instrument.

pub const METAL: &str = "XAUUSD";

pub fn is_metal(pair: &str) -> bool {
    pair == METAL
}

pub fn is_jpy_quoted(pair: &str) -> bool {
    pair.contains("JPY")
}

/// How many pips one unit of raw price represents.
pub fn pips_per_unit(pair: &str) -> f64 {
    if is_metal(pair) {
        1.0
    } else if is_jpy_quoted(pair) {
        100.0
    } else {
        10_000.0
    }
}

/// Absolute distance between two prices, in pips.
pub fn pip_distance(pair: &str, a: f64, b: f64) -> f64 {
    (a - b).abs() * pips_per_unit(pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventions() {
        assert!((pip_distance("XAUUSD", 4300.0, 4200.0) - 100.0).abs() < 1e-9);
        assert!((pip_distance("GBPJPY", 206.84, 205.84) - 100.0).abs() < 1e-9);
        assert!((pip_distance("EURUSD", 1.1698, 1.1598) - 100.0).abs() < 1e-6);
    }
}
