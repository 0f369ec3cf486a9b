use modsync::events::{fingerprint, sync_if_changed, FsRevisionCursor, RevisionCursor};
use modsync::models::settings::SharingSettings;
use modsync::report::ConsoleNotifier;
use modsync::store::{ConfigStore, FsStore, SettingsStore, CONFIG_PAGE, SETTINGS_PAGE};
use modsync::sync::{sync_community, SyncFailureReason};
use std::fs;
use std::path::Path;

// Integration-style tests over a filesystem store in temp dirs

fn write_page(root: &Path, community: &str, page: &str, content: &str) {
    let dir = root.join(community);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(page), content).unwrap();
}

fn open_sharing_json() -> &'static str {
    r#"{"enableSharingToAll": true, "subList": [], "alternateWikiPages": []}"#
}

#[test]
fn sync_merges_shared_rule_and_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    write_page(
        root,
        "home",
        CONFIG_PAGE,
        "#include src cyrillic\ntitle: 'Old'\npriority: -1\nset_locked: true\n---\ntype: submission\ntitle: 'Unrelated'",
    );
    write_page(
        root,
        "src",
        CONFIG_PAGE,
        "#share cyrillic\ntitle (regex): [\"[\\U00000400-\\U000004FF]+\"]\npriority: -5",
    );
    write_page(root, "src", SETTINGS_PAGE, open_sharing_json());

    let store = FsStore::new(root);
    let results = sync_community("home", &store, &store);
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].update_needed, Some(true));

    let rewritten = store.fetch_config("home").unwrap();
    assert!(rewritten.starts_with("#include src cyrillic\n# This rule has been synchronised from src."));
    // Shared matching logic adopted, escape tokens intact.
    assert!(rewritten.contains("\\U00000400"));
    assert!(rewritten.contains("\\U000004FF"));
    // Local enforcement actions restored.
    assert!(rewritten.contains("priority: -1"));
    assert!(rewritten.contains("set_locked: true"));
    assert!(!rewritten.contains("priority: -5"));
    // Unrelated block untouched.
    assert!(rewritten.contains("\n---\ntype: submission\ntitle: 'Unrelated'"));

    // A second pass finds nothing to change.
    let again = sync_community("home", &store, &store);
    assert_eq!(again[0].update_needed, Some(false));
    assert_eq!(store.fetch_config("home").unwrap(), rewritten);
}

#[test]
fn preserve_actions_flag_takes_shared_rule_verbatim() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    write_page(
        root,
        "home",
        CONFIG_PAGE,
        "#include src -p flagged\nold: content",
    );
    write_page(
        root,
        "src",
        CONFIG_PAGE,
        "#share flagged\ntitle: 'Pirate'\ncomment: 'flag \u{1F3F4} here'\npriority: -5",
    );
    write_page(root, "src", SETTINGS_PAGE, open_sharing_json());

    let store = FsStore::new(root);
    let results = sync_community("home", &store, &store);
    assert!(results[0].success);

    let rewritten = store.fetch_config("home").unwrap();
    assert!(rewritten.contains("#include src -p flagged"));
    // The shared rule's own enforcement attributes win under -p.
    assert!(rewritten.contains("priority: -5"));
    // Astral code points are written back in escaped form.
    assert!(rewritten.contains("\\U0001F3F4"));
    assert!(!rewritten.contains('\u{1F3F4}'));
}

#[test]
fn sharing_gate_honours_settings_page() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    write_page(
        root,
        "home",
        CONFIG_PAGE,
        "#include src myrule\npriority: -1",
    );
    write_page(root, "src", CONFIG_PAGE, "#share myrule\ntitle: 'x'");
    write_page(
        root,
        "src",
        SETTINGS_PAGE,
        r#"{"enableSharingToAll": false, "subList": ["othersub"], "alternateWikiPages": []}"#,
    );

    let store = FsStore::new(root);
    let results = sync_community("home", &store, &store);
    assert_eq!(results[0].reason, Some(SyncFailureReason::NotSharing));

    // Listing the home community (any casing) opens the gate.
    write_page(
        root,
        "src",
        SETTINGS_PAGE,
        r#"{"enableSharingToAll": false, "subList": ["HOME"], "alternateWikiPages": []}"#,
    );
    let results = sync_community("home", &store, &store);
    assert!(results[0].success);
}

#[test]
fn missing_settings_page_means_no_sharing() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    write_page(
        root,
        "home",
        CONFIG_PAGE,
        "#include src myrule\npriority: -1",
    );
    write_page(root, "src", CONFIG_PAGE, "#share myrule\ntitle: 'x'");

    let store = FsStore::new(root);
    assert_eq!(store.fetch_sharing_settings("src"), SharingSettings::default());
    let results = sync_community("home", &store, &store);
    assert_eq!(results[0].reason, Some(SyncFailureReason::NotSharing));
}

#[test]
fn no_includes_short_circuits_without_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    let original = "type: comment\ntitle: 'Nothing shared here'";
    write_page(root, "home", CONFIG_PAGE, original);

    let store = FsStore::new(root);
    let results = sync_community("home", &store, &store);
    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
    assert_eq!(results[0].reason, Some(SyncFailureReason::NoIncludes));
    assert_eq!(store.fetch_config("home").unwrap(), original);
}

#[test]
fn alternate_pages_extend_the_shared_rule_set() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    write_page(
        root,
        "home",
        CONFIG_PAGE,
        "#include src draftrule\ntitle: 'Old'",
    );
    write_page(root, "src", CONFIG_PAGE, "type: comment");
    write_page(root, "src", "drafts", "#share draftrule\ntitle: 'Draft'");
    write_page(
        root,
        "src",
        SETTINGS_PAGE,
        r#"{"enableSharingToAll": true, "subList": [], "alternateWikiPages": ["drafts", "missing-page"]}"#,
    );

    let store = FsStore::new(root);
    let results = sync_community("home", &store, &store);
    assert!(results[0].success);
    assert!(store.fetch_config("home").unwrap().contains("title: 'Draft'"));
}

#[test]
fn edit_trigger_skips_unchanged_revisions() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    write_page(
        root,
        "home",
        CONFIG_PAGE,
        "#include src myrule\ntitle: 'Old'",
    );
    write_page(root, "src", CONFIG_PAGE, "#share myrule\ntitle: 'New'");
    write_page(root, "src", SETTINGS_PAGE, open_sharing_json());

    let store = FsStore::new(root);
    let cursor = FsRevisionCursor::new(root);

    let first = sync_if_changed("home", &store, &store, &cursor, &ConsoleNotifier, "mod");
    assert!(first.is_some());

    // Nothing changed since the pass recorded its own write.
    let second = sync_if_changed("home", &store, &store, &cursor, &ConsoleNotifier, "mod");
    assert!(second.is_none());

    // An external edit invalidates the cursor.
    let edited = format!(
        "{}\n---\nnew: block",
        store.fetch_config("home").unwrap()
    );
    write_page(root, "home", CONFIG_PAGE, &edited);
    assert_ne!(Some(fingerprint(&edited)), cursor.last_processed("home"));
    let third = sync_if_changed("home", &store, &store, &cursor, &ConsoleNotifier, "mod");
    assert!(third.is_some());
}
