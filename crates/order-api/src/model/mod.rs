//! Wire types shared by the order API and its callers.

pub mod failed_order;
pub mod forecast;
pub mod order;
pub mod subscription;

pub use failed_order::FailedOrder;
pub use forecast::{ForecastStats, WeatherForecast};
pub use order::{Order, TopicEvent};
pub use subscription::Subscription;
