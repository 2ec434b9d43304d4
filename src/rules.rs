use crate::config::daytime_thresholds::{ANY_MIN_LENGTH, TANKER_MIN_LENGTH};
use crate::types::ShipRecord;

/// Ship-type fragments that mark a vessel carrying dangerous cargo.
const TANKER_KEYWORDS: &[&str] = &["TANKER", "TANK", "PETROL", "CHEMICAL", "GAS", "OIL"];

/// `ship_type_upper` must already be upper-cased.
pub fn is_tanker(ship_type_upper: &str) -> bool {
    TANKER_KEYWORDS.iter().any(|k| ship_type_upper.contains(k))
}

/// Large tankers and very large ships of any type are restricted to daylight transit.
/// A NaN length counts as 0.
pub fn is_daytime_only(ship: &ShipRecord) -> bool {
    let length = if ship.length.is_nan() { 0.0 } else { ship.length };
    let ship_type = ship.ship_type.to_uppercase();
    (is_tanker(&ship_type) && length >= TANKER_MIN_LENGTH) || length >= ANY_MIN_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(ship_type: &str, length: f64) -> ShipRecord {
        ShipRecord {
            ship_type: ship_type.to_string(),
            length,
            ..Default::default()
        }
    }

    #[test]
    fn tanker_keywords() {
        assert!(is_tanker("CRUDE OIL TANKER"));
        assert!(is_tanker("LPG GAS CARRIER"));
        assert!(is_tanker("CHEMICAL/PRODUCTS"));
        assert!(is_tanker("PETROL"));
        assert!(!is_tanker("BULK CARRIER"));
        assert!(!is_tanker("container ship"));
        assert!(!is_tanker(""));
    }

    #[test]
    fn tanker_threshold_is_200() {
        assert!(!is_daytime_only(&ship("OIL TANKER", 199.9)));
        assert!(is_daytime_only(&ship("OIL TANKER", 200.0)));
    }

    #[test]
    fn any_ship_threshold_is_250() {
        assert!(!is_daytime_only(&ship("BULK CARRIER", 249.9)));
        assert!(is_daytime_only(&ship("BULK CARRIER", 250.0)));
    }

    #[test]
    fn ship_type_is_upper_cased_before_matching() {
        assert!(is_daytime_only(&ship("chemical tanker", 210.0)));
    }

    #[test]
    fn nan_length_is_never_daytime_only() {
        assert!(!is_daytime_only(&ship("OIL TANKER", f64::NAN)));
        assert!(!is_daytime_only(&ship("", f64::NAN)));
    }
}
