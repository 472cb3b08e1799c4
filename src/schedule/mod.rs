//! Stress-aware slot budgeting and first-in-first-out task placement.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    /// 1-based position.
    pub index: usize,
    pub label: String,
}

impl fmt::Display for ScheduleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot {}: {}", self.index, self.label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub slots: Vec<ScheduleSlot>,
    pub available_slots: usize,
    pub total_tasks: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Schedule {
    /// One `"Tarefa: <task>"` slot per task, up to `budget`.
    pub fn fallback(tasks: &[String], budget: usize) -> Self {
        Self {
            slots: tasks
                .iter()
                .take(budget)
                .enumerate()
                .map(|(i, task)| ScheduleSlot {
                    index: i + 1,
                    label: format!("Tarefa: {task}"),
                })
                .collect(),
            available_slots: budget,
            total_tasks: tasks.len(),
            notes: Some("fallback schedule".into()),
        }
    }

    /// Slot lines as shown to the user.
    pub fn lines(&self) -> Vec<String> {
        self.slots.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleAllocator {
    config: ScheduleConfig,
}

impl ScheduleAllocator {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// Fewer slots under higher stress. NaN gets the relaxed budget.
    pub fn slots_for(&self, stress: f64) -> usize {
        if stress > self.config.high_stress {
            self.config.high_stress_slots
        } else if stress > self.config.moderate_stress {
            self.config.moderate_slots
        } else {
            self.config.relaxed_slots
        }
    }

    /// Place tasks in arrival order, one per slot, until either runs out.
    pub fn allocate(tasks: &[String], budget: usize) -> Vec<ScheduleSlot> {
        tasks
            .iter()
            .take(budget)
            .enumerate()
            .map(|(i, task)| ScheduleSlot {
                index: i + 1,
                label: task.clone(),
            })
            .collect()
    }

    pub fn plan(&self, tasks: &[String], stress: f64) -> Result<Schedule, ScheduleError> {
        if !stress.is_finite() {
            return Err(ScheduleError::InvalidStress(stress));
        }
        let budget = self.slots_for(stress);
        Ok(Schedule {
            slots: Self::allocate(tasks, budget),
            available_slots: budget,
            total_tasks: tasks.len(),
            notes: None,
        })
    }
}
