//! End-to-end dispatch tests: resolution, memoization, and response shaping.

mod common;

use cog_bundle::{
    Bundle, BundleConfig, BundleError, CommandOutcome, Disposition, NamespaceRegistry,
    UnitCatalog,
};
use common::*;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

const BUNDLE: &str = "mybundle";

fn dispatch(
    registry: &NamespaceRegistry,
    loader: Arc<RecordingLoader>,
    transport: Arc<RecordingTransport>,
    command: &str,
) -> Bundle {
    let config = BundleConfig::new(command).with_base_dir("/opt/bundles/mybundle");
    Bundle::from_config(BUNDLE, &config, registry, loader, transport)
}

#[test]
fn abort_produces_one_terminating_response() {
    let registry = NamespaceRegistry::new();
    let boom = scripted(CommandOutcome::abort("boom"));
    let catalog = UnitCatalog::new();
    catalog.register_command(BUNDLE, "explode", boom.factory.clone());
    let loader = Arc::new(RecordingLoader::new(catalog));
    let transport = Arc::new(RecordingTransport::new());

    let mut bundle = dispatch(&registry, loader, transport.clone(), "explode");
    bundle.run_command().expect("abort is handled by the wrapper");

    assert_eq!(transport.wire(), vec![json!({"content": "boom", "disposition": "abort"})]);
    let response = &transport.responses()[0];
    assert!(response.is_aborted());
    assert!(response.is_sent());
    assert_eq!(boom.executions(), 1);
}

#[test]
fn stop_produces_one_continuing_response() {
    let registry = NamespaceRegistry::new();
    let done = scripted(CommandOutcome::stop("done"));
    let catalog = UnitCatalog::new();
    catalog.register_command(BUNDLE, "finish", done.factory.clone());
    let loader = Arc::new(RecordingLoader::new(catalog));
    let transport = Arc::new(RecordingTransport::new());

    let mut bundle = dispatch(&registry, loader, transport.clone(), "finish");
    bundle.run_command().expect("stop is handled by the wrapper");

    assert_eq!(transport.wire(), vec![json!({"body": "done", "disposition": "normal"})]);
    assert_eq!(transport.responses()[0].disposition(), Disposition::Normal);
}

#[test]
fn normal_completion_leaves_responses_to_the_command() {
    let registry = NamespaceRegistry::new();
    let quiet = scripted(CommandOutcome::Completed);
    let catalog = UnitCatalog::new();
    catalog.register_command(BUNDLE, "echo", quiet.factory.clone());
    let loader = Arc::new(RecordingLoader::new(catalog));
    let transport = Arc::new(RecordingTransport::new());

    let mut bundle = dispatch(&registry, loader, transport.clone(), "echo");
    bundle.run_command().unwrap();

    assert_eq!(transport.count(), 0);
    assert_eq!(quiet.executions(), 1);
}

#[test]
fn hyphenated_command_loads_split_path_but_looks_up_whole_class() {
    let registry = NamespaceRegistry::new();
    let sub = scripted(CommandOutcome::stop("sub ran"));
    let catalog = UnitCatalog::new();
    let definition = sub.factory.clone();
    catalog.register_unit("lib/cog_cmd/mybundle/sub/cmd", move |namespace| {
        namespace.register("Sub::Cmd", definition.clone());
    });
    let loader = Arc::new(RecordingLoader::new(catalog));
    let transport = Arc::new(RecordingTransport::new());

    let mut bundle = dispatch(&registry, loader.clone(), transport.clone(), "sub-cmd");
    bundle.run_command().unwrap();

    assert_eq!(
        loader.requested_paths(),
        vec![PathBuf::from("lib/cog_cmd/mybundle/sub/cmd")]
    );
    assert_eq!(bundle.namespace().class_names(), vec!["Sub::Cmd".to_string()]);
    assert_eq!(transport.wire(), vec![json!({"body": "sub ran", "disposition": "normal"})]);
}

#[test]
fn resolution_is_memoized_per_bundle() {
    let registry = NamespaceRegistry::new();
    let echo = scripted(CommandOutcome::Completed);
    let catalog = UnitCatalog::new();
    catalog.register_command(BUNDLE, "echo", echo.factory.clone());
    let loader = Arc::new(RecordingLoader::new(catalog));

    let mut bundle = dispatch(&registry, loader.clone(), Arc::default(), "echo");
    let first = bundle.command().unwrap() as *mut dyn cog_bundle::Command as *mut u8;
    let second = bundle.command().unwrap() as *mut dyn cog_bundle::Command as *mut u8;

    assert_eq!(first, second);
    assert_eq!(loader.requested_paths().len(), 1);
    assert_eq!(echo.constructed(), 1);
}

#[test]
fn bundles_with_the_same_name_share_a_namespace() {
    let registry = NamespaceRegistry::new();
    let loader = Arc::new(RecordingLoader::default());

    let first = dispatch(&registry, loader.clone(), Arc::default(), "echo");
    let second = dispatch(&registry, loader, Arc::default(), "status");

    assert!(Arc::ptr_eq(first.namespace(), second.namespace()));
    assert_ne!(first.invocation_id(), second.invocation_id());
}

#[test]
fn unit_loaded_by_one_bundle_is_visible_to_the_next() {
    let registry = NamespaceRegistry::new();
    let echo = scripted(CommandOutcome::Completed);
    let catalog = UnitCatalog::new();
    catalog.register_command(BUNDLE, "echo", echo.factory.clone());
    let loader = Arc::new(RecordingLoader::new(catalog));

    let mut first = dispatch(&registry, loader.clone(), Arc::default(), "echo");
    first.run_command().unwrap();

    let second = dispatch(&registry, loader.clone(), Arc::default(), "echo");
    assert!(second.namespace().is_defined("Echo"));
    assert!(loader.catalog.is_loaded("lib/cog_cmd/mybundle/echo", second.namespace()));
}

#[test]
fn missing_unit_fails_with_load_error_and_no_response() {
    let registry = NamespaceRegistry::new();
    let loader = Arc::new(RecordingLoader::default());
    let transport = Arc::new(RecordingTransport::new());

    let mut bundle = dispatch(&registry, loader.clone(), transport.clone(), "nope-missing");
    let error = bundle.run_command().unwrap_err();

    match error {
        BundleError::UnitNotFound { path } => assert_eq!(
            path,
            PathBuf::from("/opt/bundles/mybundle/lib/cog_cmd/mybundle/nope/missing")
        ),
        other => panic!("expected load error, got {other:?}"),
    }
    assert_eq!(transport.count(), 0);
    assert_eq!(
        loader.requested_paths(),
        vec![PathBuf::from("lib/cog_cmd/mybundle/nope/missing")]
    );
}

#[test]
fn command_failure_propagates_without_response() {
    let registry = NamespaceRegistry::new();
    let catalog = UnitCatalog::new();
    catalog.register_command(BUNDLE, "parse", failing());
    let loader = Arc::new(RecordingLoader::new(catalog));
    let transport = Arc::new(RecordingTransport::new());

    let mut bundle = dispatch(&registry, loader, transport.clone(), "parse");
    let error = bundle.run_command().unwrap_err();

    assert!(matches!(error, BundleError::CommandFailed { .. }));
    assert!(error.to_string().starts_with("Command 'parse' failed:"));
    assert_eq!(transport.count(), 0);
}
