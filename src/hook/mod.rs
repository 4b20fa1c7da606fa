//! Lifecycle hooks the orchestration engine calls around each operation.
//!
//! Every [`Hook`] method has a no-op default, so implementations only
//! override the points they care about. Hook failures are advisory: engines
//! route results through [`advisory`] (or a [`HookSet`]) which logs errors and
//! keeps the primary operation running.

pub mod debug;
pub mod types;

use std::error::Error as StdError;
use std::sync::Arc;

use crate::error::DebugError;

pub use debug::DebugHook;
pub use types::{InstanceDiff, InstanceInfo, InstanceState, ResourceAttrDiff, State};

/// What the engine should do after a hook returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookAction {
    #[default]
    Continue,
    Halt,
}

pub type HookResult = Result<HookAction, DebugError>;

/// Callbacks around apply, diff, provisioning, refresh, and import.
///
/// Any argument may be absent; implementations must skip what is missing.
#[allow(unused_variables)]
pub trait Hook: Send + Sync {
    fn pre_apply(
        &self,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
        diff: Option<&InstanceDiff>,
    ) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn post_apply(
        &self,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
        error: Option<&(dyn StdError + 'static)>,
    ) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn pre_diff(&self, info: Option<&InstanceInfo>, state: Option<&InstanceState>) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn post_diff(&self, info: Option<&InstanceInfo>, diff: Option<&InstanceDiff>) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn pre_provision_resource(
        &self,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
    ) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn post_provision_resource(
        &self,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
    ) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn pre_provision(&self, info: Option<&InstanceInfo>, provisioner: &str) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn post_provision(&self, info: Option<&InstanceInfo>, provisioner: &str) -> HookResult {
        Ok(HookAction::Continue)
    }

    /// Streamed provisioner output. Cannot halt the run.
    fn provision_output(&self, info: Option<&InstanceInfo>, provisioner: &str, output: &str) {}

    fn pre_refresh(&self, info: Option<&InstanceInfo>, state: Option<&InstanceState>) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn post_refresh(
        &self,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
    ) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn pre_import_state(&self, info: Option<&InstanceInfo>, import_id: &str) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn post_import_state(
        &self,
        info: Option<&InstanceInfo>,
        states: &[InstanceState],
    ) -> HookResult {
        Ok(HookAction::Continue)
    }

    fn post_state_update(&self, state: Option<&State>) -> HookResult {
        Ok(HookAction::Continue)
    }
}

/// Best-effort policy for hook results: errors are logged and never reach
/// the engine's control flow.
pub fn advisory(event: &str, result: HookResult) -> HookAction {
    match result {
        Ok(action) => action,
        Err(err) => {
            tracing::warn!(event, error = %err, "Hook failed; continuing");
            HookAction::Continue
        }
    }
}

/// Ordered collection of hooks invoked together at each lifecycle point.
#[derive(Clone, Default)]
pub struct HookSet {
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hook: Arc<dyn Hook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run `call` on every hook. Returns `Halt` if any hook asked to halt;
    /// hook errors are handled by [`advisory`].
    pub fn dispatch<F>(&self, event: &str, call: F) -> HookAction
    where
        F: Fn(&dyn Hook) -> HookResult,
    {
        let mut action = HookAction::Continue;
        for hook in &self.hooks {
            if advisory(event, call(hook.as_ref())) == HookAction::Halt {
                action = HookAction::Halt;
            }
        }
        action
    }
}
