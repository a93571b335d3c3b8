//! Outward-facing temperature envelope.

use serde::{Deserialize, Serialize};

/// Fahrenheit from Celsius.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// Kelvin from Celsius, using a 273 offset.
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.0
}

/// A temperature in three scales, all derived from one Celsius reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl WeatherEnvelope {
    pub fn from_celsius(city: Option<String>, celsius: f64) -> Self {
        Self {
            city,
            temp_c: celsius,
            temp_f: celsius_to_fahrenheit(celsius),
            temp_k: celsius_to_kelvin(celsius),
        }
    }

    /// Whether the Fahrenheit and Kelvin fields match the Celsius one.
    pub fn is_consistent(&self) -> bool {
        self.temp_f == celsius_to_fahrenheit(self.temp_c)
            && self.temp_k == celsius_to_kelvin(self.temp_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert_eq!(celsius_to_kelvin(0.0), 273.0);
        assert_eq!(celsius_to_kelvin(-3.5), 269.5);
    }

    #[test]
    fn test_serializes_with_scale_suffixes() {
        let envelope = WeatherEnvelope::from_celsius(Some("São Paulo".into()), 20.5);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "city": "São Paulo",
                "temp_C": 20.5,
                "temp_F": 68.9,
                "temp_K": 293.5
            })
        );
    }

    #[test]
    fn test_city_omitted_when_absent() {
        let envelope = WeatherEnvelope::from_celsius(None, 25.0);
        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(json, r#"{"temp_C":25.0,"temp_F":77.0,"temp_K":298.0}"#);
    }

    #[test]
    fn test_rederiving_from_serialized_celsius_is_exact() {
        for celsius in [20.5, -3.5, 0.0, 21.3, 37.77, -89.2, 56.7] {
            let envelope = WeatherEnvelope::from_celsius(None, celsius);
            let decoded: WeatherEnvelope =
                serde_json::from_str(&serde_json::to_string(&envelope).unwrap()).unwrap();
            assert!(decoded.is_consistent(), "{celsius} drifted through JSON");
            assert_eq!(decoded.temp_f.to_bits(), celsius_to_fahrenheit(decoded.temp_c).to_bits());
        }
    }
}
