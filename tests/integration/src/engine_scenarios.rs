//! End-to-end engine scenarios over the in-memory store: deep dependency
//! trees, diamonds, upgrades that pull in new dependencies, and the full
//! install → upgrade → uninstall lifecycle.

use std::sync::Arc;

use ext_engine::{
    HandlerRegistry, InstallError, Installer, LifecycleEvent, Uninstaller,
};
use ext_model::InstallScope;
use ext_repository::{CoreExtensionSet, LocalExtensionStore, MemoryStore};
use ext_test_utils::{
    RecordingHandler, RecordingSink, ScriptedResolver, descriptor, id, namespace, version,
};
use pretty_assertions::assert_eq;

struct Engine {
    resolver: Arc<ScriptedResolver>,
    store: Arc<MemoryStore>,
    handler: RecordingHandler,
    sink: RecordingSink,
    installer: Installer,
    uninstaller: Uninstaller,
}

fn engine() -> Engine {
    engine_with_core(CoreExtensionSet::new())
}

fn engine_with_core(core: CoreExtensionSet) -> Engine {
    let resolver = Arc::new(ScriptedResolver::new());
    let store = Arc::new(MemoryStore::new());
    let handler = RecordingHandler::new();
    let sink = RecordingSink::new();

    let mut registry = HandlerRegistry::new();
    registry.register("jar", Arc::new(handler.clone()));
    registry.register("xar", Arc::new(handler.clone()));
    let registry = Arc::new(registry);

    let installer = Installer::new(
        resolver.clone(),
        store.clone(),
        Arc::new(core),
        registry.clone(),
        Arc::new(sink.clone()),
    );
    let uninstaller = Uninstaller::new(store.clone(), registry, Arc::new(sink.clone()));

    Engine {
        resolver,
        store,
        handler,
        sink,
        installer,
        uninstaller,
    }
}

#[test]
fn test_transitive_chain_installs_leaf_first() {
    let engine = engine();
    engine.resolver.publish(
        descriptor("wiki-app", "1.0.0")
            .of_type("xar")
            .depends_on("macro-suite", "1.0.0")
            .build(),
    );
    engine.resolver.publish(
        descriptor("macro-suite", "1.0.0")
            .depends_on("scripting-core", "2.0.0")
            .build(),
    );
    engine
        .resolver
        .publish(descriptor("scripting-core", "2.0.0").build());

    let report = engine
        .installer
        .install(&id("wiki-app", "1.0.0"), &InstallScope::Root);
    assert!(report.is_success());

    assert_eq!(
        engine.handler.call_names(),
        vec!["scripting-core", "macro-suite", "wiki-app"]
    );

    // Every intermediate node carries the dependency marker; only the
    // requested extension does not.
    let top = engine.store.installed("wiki-app", None).unwrap().unwrap();
    assert!(!top.dependency);
    assert_eq!(top.extension_type, "xar");
    for name in ["macro-suite", "scripting-core"] {
        assert!(engine.store.installed(name, None).unwrap().unwrap().dependency);
    }
}

#[test]
fn test_diamond_dependency_installs_once() {
    let engine = engine();
    engine.resolver.publish(
        descriptor("dashboard", "1.0.0")
            .depends_on("chart-left", "1.0.0")
            .depends_on("chart-right", "1.0.0")
            .build(),
    );
    engine.resolver.publish(
        descriptor("chart-left", "1.0.0")
            .depends_on("chart-base", "1.0.0")
            .build(),
    );
    engine.resolver.publish(
        descriptor("chart-right", "1.0.0")
            .depends_on("chart-base", "1.0.0")
            .build(),
    );
    engine
        .resolver
        .publish(descriptor("chart-base", "1.0.0").build());

    let report = engine
        .installer
        .install(&id("dashboard", "1.0.0"), &InstallScope::Root);
    assert!(report.is_success());

    // The shared leaf is installed on the first encounter and skipped as
    // already satisfied on the second.
    assert_eq!(
        engine.handler.call_names(),
        vec!["chart-base", "chart-left", "chart-right", "dashboard"]
    );
    assert_eq!(engine.store.len(), 4);
}

#[test]
fn test_upgrade_pulls_in_newly_declared_dependencies() {
    let engine = engine();
    engine.resolver.publish(descriptor("blog", "1.0.0").build());
    engine.resolver.publish(
        descriptor("blog", "2.0.0")
            .depends_on("comment-core", "1.0.0")
            .build(),
    );
    engine
        .resolver
        .publish(descriptor("comment-core", "1.0.0").build());

    let first = engine
        .installer
        .install(&id("blog", "1.0.0"), &InstallScope::Root);
    assert!(first.is_success());

    let second = engine
        .installer
        .install(&id("blog", "2.0.0"), &InstallScope::Root);
    assert!(second.is_success());

    // The new dependency lands before the upgrade is applied.
    assert_eq!(
        engine.handler.call_names(),
        vec!["blog", "comment-core", "blog"]
    );
    assert_eq!(engine.store.len(), 2);
    let blog = engine.store.installed("blog", None).unwrap().unwrap();
    assert_eq!(blog.id.version, version("2.0.0"));
}

#[test]
fn test_full_lifecycle_event_stream() {
    let engine = engine();
    engine.resolver.publish(descriptor("forum", "1.0.0").build());
    engine.resolver.publish(descriptor("forum", "1.1.0").build());

    engine
        .installer
        .install(&id("forum", "1.0.0"), &InstallScope::Root);
    engine
        .installer
        .install(&id("forum", "1.1.0"), &InstallScope::Root);
    engine.uninstaller.uninstall("forum", None).unwrap();

    let events = engine.sink.events();
    assert_eq!(events.len(), 3);
    assert!(matches!(
        &events[0],
        LifecycleEvent::Installed { record } if record.id.version == version("1.0.0")
    ));
    assert!(matches!(
        &events[1],
        LifecycleEvent::Upgraded { record, previous }
            if record.id.version == version("1.1.0") && previous.id.version == version("1.0.0")
    ));
    assert!(matches!(
        &events[2],
        LifecycleEvent::Uninstalled { record } if record.id.version == version("1.1.0")
    ));
    assert!(engine.store.is_empty());
}

#[test]
fn test_mixed_core_and_installed_dependencies() {
    let mut core = CoreExtensionSet::new();
    core.register("rendering", Some(version("3.1.0")));
    let engine = engine_with_core(core);

    engine.resolver.publish(
        descriptor("diagram", "1.0.0")
            .depends_on("rendering", "3.0.0")
            .depends_on("svg-export", "1.0.0")
            .build(),
    );
    engine
        .resolver
        .publish(descriptor("svg-export", "1.0.0").build());

    let report = engine
        .installer
        .install(&id("diagram", "1.0.0"), &InstallScope::Root);
    assert!(report.is_success());

    // The core extension never hits the store or the handlers.
    assert_eq!(engine.handler.call_names(), vec!["svg-export", "diagram"]);
    assert!(engine.store.installed("rendering", None).unwrap().is_none());
}

#[test]
fn test_dependency_tree_per_namespace() {
    let engine = engine();
    engine.resolver.publish(
        descriptor("aggregator", "1.0.0")
            .depends_on("feed-core", "1.0.0")
            .build(),
    );
    engine
        .resolver
        .publish(descriptor("feed-core", "1.0.0").build());

    let sales = namespace("wiki:sales");
    let hr = namespace("wiki:hr");
    let scope: InstallScope = [sales.clone(), hr.clone()].into_iter().collect();
    let report = engine.installer.install(&id("aggregator", "1.0.0"), &scope);
    assert!(report.is_success());

    // Each namespace got its own dependency install; four records total.
    assert_eq!(engine.store.len(), 4);
    for ns in [&sales, &hr] {
        assert!(engine.store.installed("feed-core", Some(ns)).unwrap().is_some());
        assert!(engine.store.installed("aggregator", Some(ns)).unwrap().is_some());
    }
}

#[test]
fn test_failed_unit_reports_the_deepest_cause() {
    let engine = engine();
    engine.resolver.publish(
        descriptor("portal", "1.0.0")
            .depends_on("widget-kit", "1.0.0")
            .build(),
    );
    engine.resolver.publish(
        descriptor("widget-kit", "1.0.0")
            .depends_on("ghost", "1.0.0")
            .build(),
    );

    let mut report = engine
        .installer
        .install(&id("portal", "1.0.0"), &InstallScope::Root);
    let err = report.outcomes.remove(0).result.unwrap_err();

    // The top-level error names the direct dependency...
    assert!(matches!(
        err,
        InstallError::DependencyFailed { ref dependency, .. } if dependency == "widget-kit"
    ));
    // ...and the chain bottoms out at the unresolvable extension.
    assert!(matches!(
        err.deepest(),
        InstallError::ResolutionFailed { id, .. } if id.name == "ghost"
    ));
}
