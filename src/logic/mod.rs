//! Court assignment logic: randomization, validation, and the game timer.

mod randomize;
mod timer;
mod validation;

pub use randomize::{
    calculate_court_capacity, capacity_per_court, randomize_assignments, shuffle, shuffled,
};
pub use timer::{CountdownTimer, TimerAction, TimerError, TimerState, CRITICAL_SECONDS};
pub use validation::{check_assignment, validate_assignment};
