use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of the forecast. Serialized as
/// `{"date":"2024-05-02","temperatureC":12,"temperatureF":53,"summary":"Cool"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub temperature_f: i32,
    pub summary: Option<String>,
}

impl WeatherForecast {
    /// Builds a forecast, deriving °F from °C.
    pub fn new(date: NaiveDate, temperature_c: i32, summary: impl Into<String>) -> Self {
        Self {
            date,
            temperature_c,
            temperature_f: fahrenheit(temperature_c),
            summary: Some(summary.into()),
        }
    }
}

/// `32 + trunc(c / 0.5556)`, truncating toward zero.
pub fn fahrenheit(celsius: i32) -> i32 {
    32 + (f64::from(celsius) / 0.5556) as i32
}

/// Batch averages recorded on the request span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastStats {
    pub count: usize,
    pub avg_temperature_c: f32,
    pub avg_temperature_f: f32,
}

impl ForecastStats {
    pub fn of(forecasts: &[WeatherForecast]) -> Self {
        let count = forecasts.len();
        if count == 0 {
            return Self {
                count,
                avg_temperature_c: 0.0,
                avg_temperature_f: 0.0,
            };
        }
        let total_c: i32 = forecasts.iter().map(|f| f.temperature_c).sum();
        let total_f: i32 = forecasts.iter().map(|f| f.temperature_f).sum();
        Self {
            count,
            avg_temperature_c: total_c as f32 / count as f32,
            avg_temperature_f: total_f as f32 / count as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fahrenheit_truncates_toward_zero() {
        assert_eq!(fahrenheit(0), 32);
        assert_eq!(fahrenheit(20), 67); // 35.997...
        assert_eq!(fahrenheit(-20), -3); // 32 - 35.997... -> 32 - 35
        assert_eq!(fahrenheit(54), 129);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let value = serde_json::to_value(WeatherForecast::new(day, 12, "Cool")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "date": "2024-05-02",
                "temperatureC": 12,
                "temperatureF": 53,
                "summary": "Cool"
            })
        );
    }

    #[test]
    fn stats_average_both_scales() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let stats = ForecastStats::of(&[
            WeatherForecast::new(day, 10, "Cool"),
            WeatherForecast::new(day, 20, "Mild"),
        ]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.avg_temperature_c, 15.0);
        assert_eq!(stats.avg_temperature_f, (49.0 + 67.0) / 2.0);
    }
}
