pub mod schema;

pub use schema::{
    AffectConfig, BonusTier, CalendarConfig, Config, FeedbackConfig, HeuristicWeights,
    MAX_ATTEMPTS, MAX_WINDOW_DAYS, ObservabilityConfig, ScheduleConfig, StorageConfig,
};
