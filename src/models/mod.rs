pub mod condition;
pub mod hourly;
pub mod reading;
pub mod summary;

pub use condition::WeatherCondition;
pub use hourly::HourlyRecord;
pub use reading::{EnrichedReading, Reading, ReadingBuilder};
pub use summary::{format_2dp, DailyRegionalAggregate, RegionalDailySummary, SeverityRow};
