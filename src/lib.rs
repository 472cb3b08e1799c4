#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod affect;
pub mod app;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod intent;
pub mod media;
pub mod net;
#[doc(hidden)]
pub mod observability;
pub mod orchestrator;
pub mod runtime;
pub mod schedule;
pub mod storage;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::BreathuError;
pub use orchestrator::{Orchestrator, ResponseEnvelope};
