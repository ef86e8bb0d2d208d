//! The slice of the FIT profile that sportgems interprets.

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z).
pub const FIT_EPOCH_OFFSET: i64 = 631_065_600;

/// Degrees per semicircle: a full ±180° maps onto the signed 32-bit range.
pub const SEMICIRCLES_TO_DEGREES: f64 = 180.0 / 2_147_483_648.0;

/// Altitude is stored as `(meters + 500) * 5`.
pub const ALTITUDE_SCALE: f64 = 5.0;
pub const ALTITUDE_OFFSET: f64 = 500.0;

/// Global message numbers.
pub const MESG_SESSION: u16 = 18;
pub const MESG_RECORD: u16 = 20;

/// Field numbers of the record message.
pub mod record {
    pub const POSITION_LAT: u8 = 0;
    pub const POSITION_LONG: u8 = 1;
    pub const ALTITUDE: u8 = 2;
    pub const ENHANCED_ALTITUDE: u8 = 78;
}

/// Field numbers of the session message.
pub mod session {
    pub const TOTAL_CALORIES: u8 = 11;
}

/// Field number shared by every message that carries a timestamp.
pub const FIELD_TIMESTAMP: u8 = 253;

/// Convert a raw semicircle value to degrees.
pub fn semicircles_to_degrees(value: f64) -> f64 {
    value * SEMICIRCLES_TO_DEGREES
}

/// Convert a raw FIT timestamp to Unix seconds.
pub fn fit_to_unix_seconds(value: f64) -> f64 {
    value + FIT_EPOCH_OFFSET as f64
}

/// Convert a raw (enhanced) altitude to meters.
pub fn raw_altitude_to_meters(value: f64) -> f64 {
    value / ALTITUDE_SCALE - ALTITUDE_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semicircles() {
        assert_eq!(semicircles_to_degrees(0.0), 0.0);
        assert_eq!(semicircles_to_degrees(2_147_483_648.0), 180.0);
        assert_eq!(semicircles_to_degrees(-1_073_741_824.0), -90.0);
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(fit_to_unix_seconds(0.0), 631_065_600.0);
        // 2019-09-14T15:27:21Z
        assert_eq!(fit_to_unix_seconds(937_409_241.0), 1_568_474_841.0);
    }

    #[test]
    fn test_altitude() {
        assert_eq!(raw_altitude_to_meters(2500.0), 0.0);
        assert_eq!(raw_altitude_to_meters(3775.0), 255.0);
        assert!((raw_altitude_to_meters(3774.0) - 254.8).abs() < 1e-9);
        assert_eq!(raw_altitude_to_meters(0.0), -500.0);
    }
}
