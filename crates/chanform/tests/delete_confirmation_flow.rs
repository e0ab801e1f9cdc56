mod support;

use chanform::prelude::*;
use support::{RecordingService, run};

fn rules_store() -> ChannelStore {
    let store = ChannelStore::new();
    store.insert(Channel::new("srv", "c9", "rules", 0b10));
    store
}

#[test]
fn mismatched_name_never_reaches_the_service() {
    let store = rules_store();
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c9");
    let mut dialog = form.open_delete().expect("channel exists");

    assert_eq!(dialog.title(), "Delete rules");
    dialog.input("rule");
    assert!(!dialog.can_confirm());

    let result = run(async { dialog.confirm_and_delete(&cx, &service).await });
    assert!(matches!(result, Err(Error::ValidationGate { .. })));
    assert!(service.deletes().is_empty());
    assert_eq!(dialog.state(), DeleteState::Open);
    assert!(store.contains("c9"));
}

#[test]
fn exact_name_deletes_and_routes_to_channel_list() {
    let store = rules_store();
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c9");
    let mut dialog = form.open_delete().unwrap();

    dialog.input("rules");
    assert!(dialog.can_confirm());

    let route = run(async { dialog.confirm_and_delete(&cx, &service).await });
    assert_eq!(
        route,
        Ok(Some("/app/servers/srv/settings/channels".to_string()))
    );
    assert_eq!(service.deletes(), vec![ChannelKey::new("srv", "c9")]);
    assert_eq!(dialog.state(), DeleteState::Closed(CloseReason::Deleted));
    assert!(!store.contains("c9"));
    assert!(!form.is_available());
}

#[test]
fn failed_delete_reopens_with_error_then_retries() {
    let store = rules_store();
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c9");
    let mut dialog = form.open_delete().unwrap();
    dialog.input("rules");
    service.fail_next("missing permission");

    let first = run(async { dialog.confirm_and_delete(&cx, &service).await });
    assert_eq!(first, Ok(None));
    assert_eq!(dialog.state(), DeleteState::Open);
    assert_eq!(dialog.error(), Some("missing permission"));
    assert_eq!(dialog.typed(), "rules");
    assert!(store.contains("c9"));

    let second = run(async { dialog.confirm_and_delete(&cx, &service).await });
    assert_eq!(
        second,
        Ok(Some("/app/servers/srv/settings/channels".to_string()))
    );
    assert_eq!(dialog.error(), None);
    assert_eq!(service.deletes().len(), 2);
}

#[test]
fn channel_removed_elsewhere_closes_dialog_without_request() {
    let store = rules_store();
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c9");
    let mut dialog = form.open_delete().unwrap();
    dialog.input("rules");

    store.remove("c9");
    assert_eq!(
        dialog.observe(),
        DeleteState::Closed(CloseReason::Vanished)
    );

    let result = run(async { dialog.confirm_and_delete(&cx, &service).await });
    assert_eq!(result, Ok(None));
    assert!(service.deletes().is_empty());
}

#[test]
fn rename_elsewhere_moves_the_guard() {
    let store = rules_store();
    let mut form = ChannelSettings::for_channel(&store, "c9");
    let mut dialog = form.open_delete().unwrap();
    dialog.input("rules");
    assert!(dialog.can_confirm());

    store
        .apply_patch("c9", &Patch::new().with("name", "house-rules"))
        .unwrap();
    assert_eq!(dialog.observe(), DeleteState::Open);
    assert!(!dialog.can_confirm());
    assert_eq!(dialog.title(), "Delete house-rules");

    dialog.input("house-rules");
    assert!(dialog.can_confirm());
}

#[test]
fn cancel_closes_and_ignores_late_input() {
    let store = rules_store();
    let mut form = ChannelSettings::for_channel(&store, "c9");
    let mut dialog = form.open_delete().unwrap();

    dialog.cancel();
    assert_eq!(dialog.state(), DeleteState::Closed(CloseReason::Cancelled));
    dialog.input("rules");
    assert_eq!(dialog.typed(), "");
    assert!(!dialog.can_confirm());
}

#[test]
fn removed_channel_is_never_deleted_even_without_observe() {
    let store = rules_store();
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c9");
    let mut dialog = form.open_delete().unwrap();
    dialog.input("rules");

    store.remove("c9");
    let result = run(async { dialog.confirm_and_delete(&cx, &service).await });

    assert_eq!(result, Ok(None));
    assert!(service.deletes().is_empty());
    assert_eq!(dialog.state(), DeleteState::Closed(CloseReason::Vanished));
}

#[test]
fn stale_name_is_rejected_even_without_observe() {
    let store = rules_store();
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c9");
    let mut dialog = form.open_delete().unwrap();

    store
        .apply_patch("c9", &Patch::new().with("name", "house-rules"))
        .unwrap();
    dialog.input("rules");
    assert!(!dialog.can_confirm());

    let result = run(async { dialog.confirm_and_delete(&cx, &service).await });
    assert!(matches!(result, Err(Error::ValidationGate { .. })));
    assert!(service.deletes().is_empty());
    assert!(store.contains("c9"));
}
