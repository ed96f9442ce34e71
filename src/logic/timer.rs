//! Countdown game timer: idle -> running <-> paused -> completed, one tick per second.

use crate::models::GameLength;
use serde::{Deserialize, Serialize};

/// Below this many seconds a running timer counts as critical.
pub const CRITICAL_SECONDS: u32 = 60;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

/// Something a caller asked the timer to do.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerAction {
    Start,
    Pause,
    Resume,
    Reset,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TimerError {
    /// The configuration has no game length to count down from.
    NoGameLength,
    /// The action makes no sense in the current state.
    InvalidTransition { from: TimerState, action: TimerAction },
}

impl std::fmt::Display for TimerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerError::NoGameLength => write!(f, "No game length configured"),
            TimerError::InvalidTransition { from, action } => {
                write!(f, "Cannot {:?} a timer that is {:?}", action, from)
            }
        }
    }
}

impl std::error::Error for TimerError {}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CountdownTimer {
    length: Option<GameLength>,
    remaining_seconds: u32,
    state: TimerState,
}

impl CountdownTimer {
    pub fn new(length: Option<GameLength>) -> Self {
        Self {
            length,
            remaining_seconds: length.map_or(0, |l| l.total_seconds()),
            state: TimerState::Idle,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn length(&self) -> Option<GameLength> {
        self.length
    }

    pub fn remaining(&self) -> GameLength {
        GameLength::from_total_seconds(self.remaining_seconds)
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_critical(&self) -> bool {
        self.is_running() && self.remaining_seconds <= CRITICAL_SECONDS
    }

    /// Start from idle or completed, reloading the full length.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if !matches!(self.state, TimerState::Idle | TimerState::Completed) {
            return Err(self.invalid(TimerAction::Start));
        }
        let length = self.length.ok_or(TimerError::NoGameLength)?;
        self.remaining_seconds = length.total_seconds();
        self.state = TimerState::Running;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.state != TimerState::Running {
            return Err(self.invalid(TimerAction::Pause));
        }
        self.state = TimerState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), TimerError> {
        if self.state != TimerState::Paused {
            return Err(self.invalid(TimerAction::Resume));
        }
        self.state = TimerState::Running;
        Ok(())
    }

    /// Back to idle with the full length. Allowed from any state.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.length.map_or(0, |l| l.total_seconds());
        self.state = TimerState::Idle;
    }

    pub fn apply(&mut self, action: TimerAction) -> Result<(), TimerError> {
        match action {
            TimerAction::Start => self.start(),
            TimerAction::Pause => self.pause(),
            TimerAction::Resume => self.resume(),
            TimerAction::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// One second passes. Returns true when this tick completed the game.
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        if self.remaining_seconds <= 1 {
            self.remaining_seconds = 0;
            self.state = TimerState::Completed;
            return true;
        }
        self.remaining_seconds -= 1;
        false
    }

    /// New configured length; the timer goes back to idle.
    pub fn set_length(&mut self, length: Option<GameLength>) {
        self.length = length;
        self.reset();
    }

    fn invalid(&self, action: TimerAction) -> TimerError {
        TimerError::InvalidTransition {
            from: self.state,
            action,
        }
    }
}
