pub mod bridge;

pub use bridge::{BridgeStrategy, current_strategy, run_blocking};
