//! Integration tests for the lifecycle hook adapter
//!
//! Tests the flow: engine workers -> HookSet -> DebugHook -> recorder ->
//! archive, the way an orchestration run drives it.

use std::sync::Arc;
use std::thread;

use debug_archive::archive::SharedBuffer;
use debug_archive::hook::{InstanceDiff, InstanceInfo, InstanceState, ResourceAttrDiff};
use debug_archive::{DebugError, DebugHook, DebugInfo, Hook, HookAction, HookSet};

use super::common::file_entries;
use super::common::sinks::FlakySink;

fn resource(i: usize) -> (InstanceInfo, InstanceState, InstanceDiff) {
    let info = InstanceInfo::new(format!("aws_instance.web{i}"));
    let state = InstanceState::new(format!("i-{i:04}")).with_attribute("ami", "ami-abc");
    let diff = InstanceDiff::default().with_attribute(
        "ami",
        ResourceAttrDiff {
            old: "ami-abc".to_string(),
            new: "ami-def".to_string(),
            ..ResourceAttrDiff::default()
        },
    );
    (info, state, diff)
}

/// A parallel apply records a pre/post pair for every resource
#[test]
fn test_parallel_apply_records_every_hook() {
    const RESOURCES: usize = 12;

    let buf = SharedBuffer::new();
    let debug = DebugInfo::open("apply-run", buf.clone()).unwrap();
    debug.set_phase("apply");
    let hooks = HookSet::new().with(Arc::new(DebugHook::new(debug.clone())));

    let handles: Vec<_> = (0..RESOURCES)
        .map(|i| {
            let hooks = hooks.clone();
            thread::spawn(move || {
                let (info, state, diff) = resource(i);
                let action = hooks.dispatch("pre-apply", |h| {
                    h.pre_apply(Some(&info), Some(&state), Some(&diff))
                });
                assert_eq!(action, HookAction::Continue);
                hooks.dispatch("post-apply", |h| h.post_apply(Some(&info), Some(&state), None));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    debug.close().unwrap();

    let entries = file_entries(&buf.contents());
    assert_eq!(entries.len(), RESOURCES * 2);

    for (step, entry) in entries.iter().enumerate() {
        assert_eq!(entry.step(), Some(step as u64));
    }

    for i in 0..RESOURCES {
        let id = format!("aws_instance.web{i}\n");
        let pre = entries
            .iter()
            .position(|e| e.file_name().ends_with("hook-PreApply") && e.data.starts_with(id.as_bytes()))
            .unwrap();
        let post = entries
            .iter()
            .position(|e| e.file_name().ends_with("hook-PostApply") && e.data.starts_with(id.as_bytes()))
            .unwrap();
        assert!(pre < post, "pre-apply for resource {i} must precede post-apply");
    }
}

/// A full diff/refresh/provision/import cycle under changing phases
#[test]
fn test_lifecycle_catalog_under_phases() {
    let buf = SharedBuffer::new();
    let debug = DebugInfo::open("cycle", buf.clone()).unwrap();
    let hook = DebugHook::new(debug.clone());
    let (info, state, diff) = resource(1);

    debug.set_phase("refresh");
    hook.pre_refresh(Some(&info), Some(&state)).unwrap();
    hook.post_refresh(Some(&info), Some(&state)).unwrap();

    debug.set_phase("plan");
    hook.pre_diff(Some(&info), Some(&state)).unwrap();
    hook.post_diff(Some(&info), Some(&diff)).unwrap();

    debug.set_phase("apply");
    hook.pre_provision_resource(Some(&info), Some(&state)).unwrap();
    hook.pre_provision(Some(&info), "local-exec").unwrap();
    hook.provision_output(Some(&info), "local-exec", "done");
    hook.post_provision(Some(&info), "local-exec").unwrap();
    hook.post_provision_resource(Some(&info), Some(&state)).unwrap();

    debug.set_phase("import");
    hook.pre_import_state(Some(&info), "i-0001").unwrap();
    hook.post_import_state(Some(&info), &[state.clone()]).unwrap();
    hook.post_state_update(None).unwrap();
    debug.close().unwrap();

    let names: Vec<String> = file_entries(&buf.contents())
        .iter()
        .map(|e| e.file_name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "0-refresh-hook-PreRefresh",
            "1-refresh-hook-PostRefresh",
            "2-plan-hook-PreDiff",
            "3-plan-hook-PostDiff",
            "4-apply-hook-PreProvisionResource",
            "5-apply-hook-PreProvision",
            "6-apply-hook-ProvisionOutput",
            "7-apply-hook-PostProvision",
            "8-apply-hook-PostProvisionResource",
            "9-import-hook-PreImportState",
            "10-import-hook-PostImportState",
        ]
    );
}

/// A full disk on the archive never stops the run
#[test]
fn test_archive_failure_is_advisory() {
    let sink = FlakySink::new();
    let debug = DebugInfo::open("disk-full", sink.clone()).unwrap();
    let hooks = HookSet::new().with(Arc::new(DebugHook::new(debug.clone())));
    let (info, state, diff) = resource(0);

    sink.set_failing(true);
    let err = DebugHook::new(debug.clone())
        .pre_apply(Some(&info), Some(&state), Some(&diff))
        .unwrap_err();
    assert!(matches!(err, DebugError::Io(_)), "{err:?}");

    let action = hooks.dispatch("pre-apply", |h| {
        h.pre_apply(Some(&info), Some(&state), Some(&diff))
    });
    assert_eq!(action, HookAction::Continue);
    let _ = debug.close();
}

/// The disabled handle makes the adapter silent
#[test]
fn test_disabled_adapter_is_silent() {
    let hook = DebugHook::new(DebugInfo::disabled());
    let (info, state, diff) = resource(0);
    assert_eq!(
        hook.pre_apply(Some(&info), Some(&state), Some(&diff)).unwrap(),
        HookAction::Continue
    );
    hook.provision_output(Some(&info), "p", "o");
}
