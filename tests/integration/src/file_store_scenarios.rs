//! End-to-end engine scenarios over the file-backed store, including
//! persistence across reopen.

use std::sync::Arc;

use ext_engine::{HandlerRegistry, Installer, Uninstaller};
use ext_model::InstallScope;
use ext_repository::{CoreExtensionSet, FileStore, LocalExtensionStore};
use ext_test_utils::{
    RecordingHandler, RecordingSink, ScriptedResolver, descriptor, id, namespace, version,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn installer_over(store: Arc<FileStore>, resolver: Arc<ScriptedResolver>) -> Installer {
    let handler = RecordingHandler::new();
    let mut registry = HandlerRegistry::new();
    registry.register("jar", Arc::new(handler.clone()));
    registry.register("xar", Arc::new(handler));

    Installer::new(
        resolver,
        store,
        Arc::new(CoreExtensionSet::new()),
        Arc::new(registry),
        Arc::new(RecordingSink::new()),
    )
}

#[test]
fn test_installed_tree_survives_reopen() {
    let tmp = TempDir::new().unwrap();

    {
        let store = Arc::new(FileStore::open(tmp.path()).unwrap());
        let resolver = Arc::new(ScriptedResolver::new());
        resolver.publish(
            descriptor("aggregator", "1.0.0")
                .depends_on("feed-core", "1.0.0")
                .build(),
        );
        resolver.publish(descriptor("feed-core", "1.0.0").build());

        let report = installer_over(store, resolver)
            .install(&id("aggregator", "1.0.0"), &InstallScope::Root);
        assert!(report.is_success());
    }

    let reopened = FileStore::open(tmp.path()).unwrap();
    let top = reopened.installed("aggregator", None).unwrap().unwrap();
    assert!(!top.dependency);
    let dep = reopened.installed("feed-core", None).unwrap().unwrap();
    assert!(dep.dependency);

    let names: Vec<String> = reopened
        .list(None)
        .unwrap()
        .into_iter()
        .map(|r| r.id.name)
        .collect();
    assert_eq!(names, vec!["aggregator", "feed-core"]);
}

#[test]
fn test_upgrade_persists_only_the_new_version() {
    let tmp = TempDir::new().unwrap();
    let resolver = Arc::new(ScriptedResolver::new());
    resolver.publish(descriptor("blog", "1.0.0").build());
    resolver.publish(descriptor("blog", "2.0.0").build());

    {
        let store = Arc::new(FileStore::open(tmp.path()).unwrap());
        let installer = installer_over(store, resolver);
        assert!(installer.install(&id("blog", "1.0.0"), &InstallScope::Root).is_success());
        assert!(installer.install(&id("blog", "2.0.0"), &InstallScope::Root).is_success());
    }

    let reopened = FileStore::open(tmp.path()).unwrap();
    assert_eq!(reopened.list(None).unwrap().len(), 1);
    let record = reopened.installed("blog", None).unwrap().unwrap();
    assert_eq!(record.id.version, version("2.0.0"));
}

#[test]
fn test_namespaced_installs_reload_into_their_scopes() {
    let tmp = TempDir::new().unwrap();
    let resolver = Arc::new(ScriptedResolver::new());
    resolver.publish(descriptor("blog", "1.0.0").build());

    let sales = namespace("wiki:sales");
    let hr = namespace("wiki:hr");
    {
        let store = Arc::new(FileStore::open(tmp.path()).unwrap());
        let installer = installer_over(store, resolver);
        let scope: InstallScope = [sales.clone(), hr.clone()].into_iter().collect();
        assert!(installer.install(&id("blog", "1.0.0"), &scope).is_success());
    }

    let reopened = FileStore::open(tmp.path()).unwrap();
    assert!(reopened.installed("blog", Some(&sales)).unwrap().is_some());
    assert!(reopened.installed("blog", Some(&hr)).unwrap().is_some());
    assert!(reopened.installed("blog", None).unwrap().is_none());
    assert_eq!(reopened.list(Some(&sales)).unwrap().len(), 1);
}

#[test]
fn test_uninstall_removes_the_descriptor_durably() {
    let tmp = TempDir::new().unwrap();
    let resolver = Arc::new(ScriptedResolver::new());
    resolver.publish(descriptor("blog", "1.0.0").build());

    let store = Arc::new(FileStore::open(tmp.path()).unwrap());
    let handler = RecordingHandler::new();
    let mut registry = HandlerRegistry::new();
    registry.register("jar", Arc::new(handler.clone()));
    let registry = Arc::new(registry);

    let installer = Installer::new(
        resolver,
        store.clone(),
        Arc::new(CoreExtensionSet::new()),
        registry.clone(),
        Arc::new(RecordingSink::new()),
    );
    assert!(installer.install(&id("blog", "1.0.0"), &InstallScope::Root).is_success());

    let uninstaller = Uninstaller::new(store, registry, Arc::new(RecordingSink::new()));
    uninstaller.uninstall("blog", None).unwrap();

    let reopened = FileStore::open(tmp.path()).unwrap();
    assert!(reopened.installed("blog", None).unwrap().is_none());
    assert!(reopened.list(None).unwrap().is_empty());
}
