//! Progress reporting for installations
//!
//! The engine reports through [`ProgressSink`], the only notification
//! interface exposed to callers. One update is emitted at each phase
//! transition and one per executed step, so a dry run and a real run drive
//! tooling identically.

use indicatif::{ProgressBar, ProgressStyle};

/// Pipeline phase of an installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Planning,
    Validating,
    Installing,
    RollingBack,
    Complete,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::Validating => "validating",
            Phase::Installing => "installing",
            Phase::RollingBack => "rolling-back",
            Phase::Complete => "complete",
            Phase::Failed => "failed",
        }
    }
}

/// One progress notification
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub phase: Phase,
    /// Steps completed so far within the installing phase
    pub current: usize,
    /// Total number of steps in the plan
    pub total: usize,
    /// Component the current step belongs to, if any
    pub component_id: Option<String>,
}

impl ProgressUpdate {
    pub fn phase_only(phase: Phase, total: usize) -> Self {
        Self {
            phase,
            current: 0,
            total,
            component_id: None,
        }
    }
}

/// Receiver for progress updates
pub trait ProgressSink {
    fn update(&mut self, update: &ProgressUpdate);
}

/// Sink that discards all updates (library callers, tests)
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn update(&mut self, _update: &ProgressUpdate) {}
}

/// Sink that records every update it receives, for assertions in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub updates: Vec<ProgressUpdate>,
}

#[cfg(test)]
impl ProgressSink for RecordingProgress {
    fn update(&mut self, update: &ProgressUpdate) {
        self.updates.push(update.clone());
    }
}

/// Terminal progress bar for installations
pub struct ProgressDisplay {
    step_pb: Option<ProgressBar>,
}

impl ProgressDisplay {
    pub fn new() -> Self {
        Self { step_pb: None }
    }

    fn init_bar(&mut self, total: usize) {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(total as u64);
        pb.set_style(style);
        self.step_pb = Some(pb);
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressDisplay {
    fn update(&mut self, update: &ProgressUpdate) {
        match update.phase {
            Phase::Planning | Phase::Validating => {}
            Phase::Installing => {
                if self.step_pb.is_none() && update.total > 0 {
                    self.init_bar(update.total);
                }
                if let Some(ref pb) = self.step_pb {
                    if let Some(ref id) = update.component_id {
                        pb.set_message(id.clone());
                    }
                    pb.set_position(update.current as u64);
                }
            }
            Phase::Complete => {
                if let Some(ref pb) = self.step_pb {
                    pb.finish_with_message("done");
                }
            }
            Phase::RollingBack | Phase::Failed => {
                if let Some(ref pb) = self.step_pb {
                    pb.abandon_with_message(update.phase.as_str());
                }
            }
        }
    }
}
