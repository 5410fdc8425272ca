//! Global hotkey chords.
//!
//! A chord such as `Ctrl+Y+E+S` is recognized as a sequence of OS-level
//! accelerators (`Ctrl+Y`, `Ctrl+E`, `Ctrl+S`), one per stage. Each press
//! advances [`HotkeySequenceEngine`]'s progress; the last stage completes the
//! chord. A press out of order, or a pause longer than the reset window,
//! sends the chord back to stage 0.
//!
//! OS registration is behind [`AcceleratorHost`] and the reset window behind
//! [`Scheduler`], so the engine runs the same against `global_hotkey` and
//! against test fakes.

use std::collections::HashMap;
use std::time::Duration;

use global_hotkey::{hotkey::HotKey, Error as HotkeyError, GlobalHotKeyManager};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::StatusError;
use crate::platform::Platform;
use crate::scheduler::{Scheduler, TimerId};
use crate::shortcuts::{Accelerator, ChordSpec};

/// Inactivity window after which a half-typed chord is forgotten.
pub const DEFAULT_CHORD_TIMEOUT: Duration = Duration::from_millis(1500);

// =============================================================================
// Accelerator capability
// =============================================================================

/// Identifier the OS (or a fake) hands back for a registered accelerator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AcceleratorId(pub u32);

/// Why a single accelerator could not be bound.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("key '{0}' has no system key code")]
    UnsupportedKey(String),
    #[error("'{0}' is already registered by another application")]
    AlreadyRegistered(String),
    #[error("system rejected '{accelerator}': {reason}")]
    Rejected { accelerator: String, reason: String },
}

/// Capability to bind accelerators system-wide.
pub trait AcceleratorHost {
    fn register(&mut self, accelerator: &Accelerator) -> Result<AcceleratorId, RegistrationError>;
    /// Best-effort; failures are logged by the implementation, never surfaced.
    fn unregister(&mut self, id: AcceleratorId);
}

/// [`AcceleratorHost`] backed by `global_hotkey`.
///
/// NOTE: Must be created on the main thread.
pub struct GlobalHotkeyHost {
    manager: GlobalHotKeyManager,
    platform: Platform,
    registered: HashMap<AcceleratorId, HotKey>,
}

impl GlobalHotkeyHost {
    pub fn new(platform: Platform) -> Result<Self, StatusError> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| StatusError::Hotkey(format!("failed to create hotkey manager: {e}")))?;
        Ok(Self {
            manager,
            platform,
            registered: HashMap::new(),
        })
    }
}

impl AcceleratorHost for GlobalHotkeyHost {
    fn register(&mut self, accelerator: &Accelerator) -> Result<AcceleratorId, RegistrationError> {
        let label = accelerator.display();
        let hotkey = accelerator
            .to_hotkey(self.platform)
            .ok_or_else(|| RegistrationError::UnsupportedKey(accelerator.key.to_string()))?;
        self.manager
            .register(hotkey)
            .map_err(|e| to_registration_error(e, &label))?;
        let id = AcceleratorId(hotkey.id());
        self.registered.insert(id, hotkey);
        debug!(accelerator = %label, id = id.0, "Registered accelerator");
        Ok(id)
    }

    fn unregister(&mut self, id: AcceleratorId) {
        if let Some(hotkey) = self.registered.remove(&id) {
            if let Err(e) = self.manager.unregister(hotkey) {
                warn!(id = id.0, error = %e, "Failed to unregister accelerator");
            }
        }
    }
}

/// Translate a `global_hotkey` failure into a user-facing diagnostic.
fn to_registration_error(e: HotkeyError, display: &str) -> RegistrationError {
    match e {
        HotkeyError::AlreadyRegistered(_) => RegistrationError::AlreadyRegistered(display.into()),
        HotkeyError::FailedToRegister(msg) => RegistrationError::Rejected {
            accelerator: display.into(),
            reason: msg,
        },
        HotkeyError::OsError(os_err) => RegistrationError::Rejected {
            accelerator: display.into(),
            reason: os_err.to_string(),
        },
        other => RegistrationError::Rejected {
            accelerator: display.into(),
            reason: other.to_string(),
        },
    }
}

// =============================================================================
// Install reporting
// =============================================================================

/// What to do when only some stages of a chord can be bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationPolicy {
    /// Any failed stage rolls back the whole chord.
    #[default]
    AllOrNothing,
    /// Keep whatever registered; the chord may be unreachable.
    BestEffort,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: usize,
    pub accelerator: String,
    pub error: RegistrationError,
}

/// Result of a successful [`HotkeySequenceEngine::install`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallReport {
    pub display: String,
    pub registered_stages: Vec<usize>,
    /// Non-empty only under [`RegistrationPolicy::BestEffort`].
    pub failures: Vec<StageFailure>,
}

impl InstallReport {
    /// True when some stage is unbound and the chord cannot complete.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn diagnostic(&self) -> Option<String> {
        self.is_partial().then(|| {
            format!(
                "chord '{}' is unreachable: {}",
                self.display,
                summarize(&self.failures)
            )
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    #[error("could not register '{display}': {}", summarize(.failures))]
    NothingRegistered {
        display: String,
        failures: Vec<StageFailure>,
    },
    #[error("could not register every stage of '{display}': {}", summarize(.failures))]
    Incomplete {
        display: String,
        failures: Vec<StageFailure>,
    },
}

impl InstallError {
    pub fn failures(&self) -> &[StageFailure] {
        match self {
            Self::NothingRegistered { failures, .. } | Self::Incomplete { failures, .. } => {
                failures
            }
        }
    }
}

fn summarize(failures: &[StageFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("stage {} ({})", f.stage + 1, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Sequence engine
// =============================================================================

/// Chord progress. `progress` is the index of the next stage expected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchState {
    pub progress: usize,
    pub pending_reset: Option<TimerId>,
}

/// What a stage press did to the chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    /// Progress moved forward; the reset window was (re)armed.
    Advanced { progress: usize },
    /// The final stage matched. Progress is back at 0.
    Completed,
    /// Out-of-order press; progress is back at 0.
    Reset,
    /// No chord installed, or the id/stage does not belong to it.
    Ignored,
}

#[derive(Clone, Debug)]
struct Binding {
    id: AcceleratorId,
    accelerator: Accelerator,
    /// Stages sharing this accelerator (a chord may repeat a key).
    stages: Vec<usize>,
}

pub struct HotkeySequenceEngine {
    host: Box<dyn AcceleratorHost>,
    scheduler: Box<dyn Scheduler>,
    reset_after: Duration,
    policy: RegistrationPolicy,
    spec: Option<ChordSpec>,
    bindings: Vec<Binding>,
    state: MatchState,
    completions: u64,
}

impl HotkeySequenceEngine {
    pub fn new(host: Box<dyn AcceleratorHost>, scheduler: Box<dyn Scheduler>) -> Self {
        Self {
            host,
            scheduler,
            reset_after: DEFAULT_CHORD_TIMEOUT,
            policy: RegistrationPolicy::default(),
            spec: None,
            bindings: Vec::new(),
            state: MatchState::default(),
            completions: 0,
        }
    }

    pub fn with_reset_after(mut self, reset_after: Duration) -> Self {
        self.reset_after = reset_after;
        self
    }

    pub fn with_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn spec(&self) -> Option<&ChordSpec> {
        self.spec.as_ref()
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn progress(&self) -> usize {
        self.state.progress
    }

    /// Number of completed chords since construction.
    pub fn completions(&self) -> u64 {
        self.completions
    }

    pub fn registered_stages(&self) -> Vec<usize> {
        stages_of(&self.bindings)
    }

    /// Replace the installed chord.
    ///
    /// Every current binding is released and progress reset before the new
    /// stages are bound. If the new chord is rejected the previous one is
    /// bound again, so a bad shortcut never leaves the user without one.
    pub fn install(&mut self, spec: ChordSpec) -> Result<InstallReport, InstallError> {
        let previous = self.spec.take();
        self.release_bindings();
        self.reset();

        let label = spec.display().to_string();
        let (bindings, failures) = self.bind(&spec);
        let registered = stages_of(&bindings);

        let rejected = if registered.is_empty() {
            Some(InstallError::NothingRegistered {
                display: label.clone(),
                failures: failures.clone(),
            })
        } else if !failures.is_empty() && self.policy == RegistrationPolicy::AllOrNothing {
            Some(InstallError::Incomplete {
                display: label.clone(),
                failures: failures.clone(),
            })
        } else {
            None
        };

        if let Some(err) = rejected {
            for binding in &bindings {
                self.host.unregister(binding.id);
            }
            warn!(chord = %label, error = %err, "Hotkey chord rejected");
            if let Some(previous) = previous {
                self.restore(previous);
            }
            return Err(err);
        }

        let report = InstallReport {
            display: label.clone(),
            registered_stages: registered,
            failures,
        };
        if let Some(diagnostic) = report.diagnostic() {
            warn!(chord = %label, %diagnostic, "Hotkey chord partially registered");
        } else {
            info!(chord = %label, stages = spec.len(), "Hotkey chord installed");
        }
        self.bindings = bindings;
        self.spec = Some(spec);
        Ok(report)
    }

    /// Release every binding and cancel any pending reset. Safe to call twice.
    pub fn teardown(&mut self) {
        self.release_bindings();
        self.reset();
        if self.spec.take().is_some() {
            info!("Hotkey chord torn down");
        }
    }

    /// Route an OS accelerator press to its stage.
    pub fn on_accelerator(&mut self, id: AcceleratorId) -> StageOutcome {
        let Some(binding) = self.bindings.iter().find(|b| b.id == id) else {
            return StageOutcome::Ignored;
        };
        let stage = if binding.stages.contains(&self.state.progress) {
            self.state.progress
        } else {
            binding.stages[0]
        };
        self.on_stage(stage)
    }

    /// Feed one stage press into the state machine.
    pub fn on_stage(&mut self, stage: usize) -> StageOutcome {
        let Some(len) = self.spec.as_ref().map(ChordSpec::len) else {
            return StageOutcome::Ignored;
        };
        if stage >= len {
            return StageOutcome::Ignored;
        }

        if stage == 0 {
            self.state.progress = 1;
        } else if self.state.progress == stage {
            self.state.progress = stage + 1;
        } else {
            debug!(
                stage,
                progress = self.state.progress,
                "Out-of-order chord stage, resetting"
            );
            self.reset();
            return StageOutcome::Reset;
        }

        if self.state.progress == len {
            self.reset();
            self.completions += 1;
            info!(completions = self.completions, "Hotkey chord completed");
            return StageOutcome::Completed;
        }

        self.arm_reset_timer();
        debug!(progress = self.state.progress, of = len, "Hotkey chord advanced");
        StageOutcome::Advanced {
            progress: self.state.progress,
        }
    }

    /// Deliver a due timer. Returns true when it reset an in-progress chord.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.state.pending_reset != Some(id) {
            return false;
        }
        debug!(progress = self.state.progress, "Hotkey chord timed out");
        self.state = MatchState::default();
        true
    }

    fn bind(&mut self, spec: &ChordSpec) -> (Vec<Binding>, Vec<StageFailure>) {
        let mut bindings: Vec<Binding> = Vec::new();
        let mut failures = Vec::new();
        for (stage, key) in spec.sequence().iter().enumerate() {
            let accelerator = Accelerator::new(spec.modifiers(), key.clone());
            if let Some(existing) = bindings.iter_mut().find(|b| b.accelerator == accelerator) {
                existing.stages.push(stage);
                continue;
            }
            match self.host.register(&accelerator) {
                Ok(id) => bindings.push(Binding {
                    id,
                    accelerator,
                    stages: vec![stage],
                }),
                Err(error) => failures.push(StageFailure {
                    stage,
                    accelerator: accelerator.display(),
                    error,
                }),
            }
        }
        (bindings, failures)
    }

    fn restore(&mut self, previous: ChordSpec) {
        let (bindings, failures) = self.bind(&previous);
        if !failures.is_empty() {
            warn!(
                chord = previous.display(),
                failures = %summarize(&failures),
                "Previous hotkey chord only partially restored"
            );
        }
        if bindings.is_empty() {
            return;
        }
        self.bindings = bindings;
        self.spec = Some(previous);
    }

    fn release_bindings(&mut self) {
        for binding in self.bindings.drain(..) {
            self.host.unregister(binding.id);
        }
    }

    fn arm_reset_timer(&mut self) {
        if let Some(id) = self.state.pending_reset.take() {
            self.scheduler.cancel(id);
        }
        self.state.pending_reset = Some(self.scheduler.schedule(self.reset_after));
    }

    fn reset(&mut self) {
        if let Some(id) = self.state.pending_reset.take() {
            self.scheduler.cancel(id);
        }
        self.state.progress = 0;
    }
}

fn stages_of(bindings: &[Binding]) -> Vec<usize> {
    let mut stages: Vec<usize> = bindings
        .iter()
        .flat_map(|b| b.stages.iter().copied())
        .collect();
    stages.sort_unstable();
    stages
}

#[cfg(test)]
#[path = "hotkeys_tests.rs"]
mod tests;
