//! Debug-archive adapter for the lifecycle hooks.

use std::error::Error as StdError;

use crate::error::DebugError;
use crate::hook::types::{InstanceDiff, InstanceInfo, InstanceState, State};
use crate::hook::{Hook, HookAction, HookResult};
use crate::recorder::DebugInfo;

pub const PRE_APPLY: &str = "hook-PreApply";
pub const POST_APPLY: &str = "hook-PostApply";
pub const PRE_DIFF: &str = "hook-PreDiff";
pub const POST_DIFF: &str = "hook-PostDiff";
pub const PRE_PROVISION_RESOURCE: &str = "hook-PreProvisionResource";
pub const POST_PROVISION_RESOURCE: &str = "hook-PostProvisionResource";
pub const PRE_PROVISION: &str = "hook-PreProvision";
pub const POST_PROVISION: &str = "hook-PostProvision";
pub const PROVISION_OUTPUT: &str = "hook-ProvisionOutput";
pub const PRE_REFRESH: &str = "hook-PreRefresh";
pub const POST_REFRESH: &str = "hook-PostRefresh";
pub const PRE_IMPORT_STATE: &str = "hook-PreImportState";
pub const POST_IMPORT_STATE: &str = "hook-PostImportState";

/// Records every lifecycle callback as an entry in the debug archive.
///
/// Holds no state besides the recorder handle. When the handle is disabled,
/// each method returns before rendering anything. Archive write and payload
/// rendering failures are returned to the caller, which decides what to do
/// with them (see [`crate::hook::advisory`]).
#[derive(Debug, Clone, Default)]
pub struct DebugHook {
    debug: DebugInfo,
}

impl DebugHook {
    pub fn new(debug: DebugInfo) -> Self {
        Self { debug }
    }

    fn record(&self, event: &'static str, payload: Payload) -> Result<(), DebugError> {
        self.debug.write_file(event, payload.as_bytes())
    }

    fn record_state(
        &self,
        event: &'static str,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
    ) -> HookResult {
        if !self.debug.is_enabled() {
            return Ok(HookAction::Continue);
        }
        let mut payload = Payload::default();
        payload.info(info).state(state);
        self.record(event, payload)?;
        Ok(HookAction::Continue)
    }

    fn record_provisioner(
        &self,
        event: &'static str,
        info: Option<&InstanceInfo>,
        provisioner: &str,
    ) -> HookResult {
        if !self.debug.is_enabled() {
            return Ok(HookAction::Continue);
        }
        let mut payload = Payload::default();
        payload.info(info).line(provisioner);
        self.record(event, payload)?;
        Ok(HookAction::Continue)
    }
}

impl Hook for DebugHook {
    fn pre_apply(
        &self,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
        diff: Option<&InstanceDiff>,
    ) -> HookResult {
        if !self.debug.is_enabled() {
            return Ok(HookAction::Continue);
        }
        let mut payload = Payload::default();
        payload.info(info).state(state).diff(diff)?;
        self.record(PRE_APPLY, payload)?;
        Ok(HookAction::Continue)
    }

    fn post_apply(
        &self,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
        error: Option<&(dyn StdError + 'static)>,
    ) -> HookResult {
        if !self.debug.is_enabled() {
            return Ok(HookAction::Continue);
        }
        let mut payload = Payload::default();
        payload.info(info).state(state);
        if let Some(error) = error {
            payload.text(&error.to_string());
        }
        self.record(POST_APPLY, payload)?;
        Ok(HookAction::Continue)
    }

    fn pre_diff(&self, info: Option<&InstanceInfo>, state: Option<&InstanceState>) -> HookResult {
        self.record_state(PRE_DIFF, info, state)
    }

    fn post_diff(&self, info: Option<&InstanceInfo>, diff: Option<&InstanceDiff>) -> HookResult {
        if !self.debug.is_enabled() {
            return Ok(HookAction::Continue);
        }
        let mut payload = Payload::default();
        payload.info(info).diff(diff)?;
        self.record(POST_DIFF, payload)?;
        Ok(HookAction::Continue)
    }

    fn pre_provision_resource(
        &self,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
    ) -> HookResult {
        self.record_state(PRE_PROVISION_RESOURCE, info, state)
    }

    fn post_provision_resource(
        &self,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
    ) -> HookResult {
        self.record_state(POST_PROVISION_RESOURCE, info, state)
    }

    fn pre_provision(&self, info: Option<&InstanceInfo>, provisioner: &str) -> HookResult {
        self.record_provisioner(PRE_PROVISION, info, provisioner)
    }

    fn post_provision(&self, info: Option<&InstanceInfo>, provisioner: &str) -> HookResult {
        self.record_provisioner(POST_PROVISION, info, provisioner)
    }

    fn provision_output(&self, info: Option<&InstanceInfo>, provisioner: &str, output: &str) {
        if !self.debug.is_enabled() {
            return;
        }
        let mut payload = Payload::default();
        payload.info(info).line(provisioner).line(output);
        if let Err(err) = self.record(PROVISION_OUTPUT, payload) {
            tracing::warn!(event = PROVISION_OUTPUT, error = %err, "Hook failed; continuing");
        }
    }

    fn pre_refresh(&self, info: Option<&InstanceInfo>, state: Option<&InstanceState>) -> HookResult {
        self.record_state(PRE_REFRESH, info, state)
    }

    fn post_refresh(
        &self,
        info: Option<&InstanceInfo>,
        state: Option<&InstanceState>,
    ) -> HookResult {
        self.record_state(POST_REFRESH, info, state)
    }

    fn pre_import_state(&self, info: Option<&InstanceInfo>, import_id: &str) -> HookResult {
        self.record_provisioner(PRE_IMPORT_STATE, info, import_id)
    }

    fn post_import_state(
        &self,
        info: Option<&InstanceInfo>,
        states: &[InstanceState],
    ) -> HookResult {
        if !self.debug.is_enabled() {
            return Ok(HookAction::Continue);
        }
        let mut payload = Payload::default();
        payload.info(info);
        for state in states {
            payload.state(Some(state));
        }
        self.record(POST_IMPORT_STATE, payload)?;
        Ok(HookAction::Continue)
    }

    // Never recorded: the full state can be arbitrarily large.
    fn post_state_update(&self, _state: Option<&State>) -> HookResult {
        Ok(HookAction::Continue)
    }
}

/// Text rendering of one hook invocation. Absent sections are skipped.
#[derive(Default)]
struct Payload {
    buf: Vec<u8>,
}

impl Payload {
    fn text(&mut self, text: &str) -> &mut Self {
        self.buf.extend_from_slice(text.as_bytes());
        self
    }

    fn line(&mut self, text: &str) -> &mut Self {
        self.text(text);
        self.buf.push(b'\n');
        self
    }

    fn info(&mut self, info: Option<&InstanceInfo>) -> &mut Self {
        if let Some(info) = info {
            self.line(&info.human_id());
        }
        self
    }

    fn state(&mut self, state: Option<&InstanceState>) -> &mut Self {
        if let Some(state) = state {
            self.line(&state.to_string());
        }
        self
    }

    fn diff(&mut self, diff: Option<&InstanceDiff>) -> Result<&mut Self, DebugError> {
        if let Some(diff) = diff {
            let json = serde_json::to_vec_pretty(diff)?;
            self.buf.extend_from_slice(&json);
        }
        Ok(self)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}
