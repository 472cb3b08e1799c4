mod affect;
mod core;
mod feedback;
mod pipeline;

pub use affect::{AffectConfig, BonusTier, HeuristicWeights};
pub use core::Config;
pub use feedback::{FeedbackConfig, MAX_ATTEMPTS};
pub(crate) use feedback::secs_or;
pub use pipeline::{
    CalendarConfig, MAX_WINDOW_DAYS, ObservabilityConfig, ScheduleConfig, StorageConfig,
};
