mod support;

use std::cell::RefCell;
use std::rc::Rc;

use chanform::prelude::*;
use chanform::{Baseline, SyncOutcome, settle};
use support::{RecordingService, general_store, run};

#[test]
fn rename_and_toggle_sends_exactly_the_diff() {
    let store = general_store();
    let service = RecordingService::detached();
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c1");

    form.set_name("general-chat").unwrap();
    form.set_permission(2, true).unwrap();

    let expected = Patch::new()
        .with("name", "general-chat")
        .with("permissions", 0b0100_u64);
    assert_eq!(form.diff(), expected);
    assert!(form.can_save());

    let request = form.begin_save().expect("save starts");
    assert_eq!(request.key, ChannelKey::new("srv", "c1"));
    assert_eq!(request.patch, expected);

    // Second press while in flight: no request, still saving.
    assert!(form.begin_save().is_none());
    assert_eq!(form.save_state(), &SaveState::Saving);

    let outcome = run(service.update_channel(&cx, &request.key, &request.patch));
    form.finish_save(settle(outcome));

    assert_eq!(service.updates(), vec![(request.key.clone(), expected.clone())]);
    assert_eq!(form.save_state(), &SaveState::Idle);
    // Not committed yet: the diff stays until the store catches up.
    assert_eq!(form.diff(), expected);

    store.apply_patch("c1", &request.patch).unwrap();
    assert!(form.diff().is_empty());
    assert!(!form.can_save());
    assert_eq!(form.header_title(), "Settings - general-chat");
}

#[test]
fn async_save_settles_once_store_commits() {
    let store = general_store();
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c1");

    form.set_permission(0, true).unwrap();
    run(async {
        let state = form.save(&cx, &service).await;
        assert_eq!(state, &SaveState::Idle);
    });

    assert_eq!(service.updates().len(), 1);
    assert_eq!(store.get("c1").unwrap().permissions, 0b1);
    assert!(form.diff().is_empty());
    assert_eq!(form.error(), None);
}

#[test]
fn async_save_without_changes_sends_nothing() {
    let store = general_store();
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c1");

    run(async {
        let state = form.save(&cx, &service).await;
        assert_eq!(state, &SaveState::Idle);
    });
    assert!(service.updates().is_empty());
}

#[test]
fn edits_during_flight_go_into_the_next_save() {
    let store = general_store();
    let mut form = ChannelSettings::for_channel(&store, "c1");

    form.set_name("general-chat").unwrap();
    let first = form.begin_save().unwrap();

    form.set_permission(1, true).unwrap();
    assert!(!form.can_save());

    form.finish_save(Ok(()));
    store.apply_patch("c1", &first.patch).unwrap();

    let second = form.begin_save().unwrap();
    assert_eq!(second.patch, Patch::new().with("permissions", 0b10_u64));
    assert_eq!(form.name(), "general-chat");
}

#[test]
fn rejected_update_keeps_the_working_copy() {
    let store = general_store();
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c1");

    form.set_name("general-chat").unwrap();
    form.set_permission(2, true).unwrap();
    service.fail_next("rate limited");

    run(async {
        form.save(&cx, &service).await;
    });

    assert_eq!(
        form.save_state(),
        &SaveState::Failed("rate limited".to_string())
    );
    assert_eq!(form.error(), Some("rate limited"));
    assert_eq!(form.name(), "general-chat");
    assert_eq!(form.permission_mask(), 0b0100);
    assert_eq!(form.diff().len(), 2);
    assert_eq!(store.get("c1").unwrap().name, "general");

    // Retrying clears the error as soon as the request starts.
    let retry = form.begin_save().unwrap();
    assert_eq!(form.error(), None);
    assert_eq!(retry.patch.len(), 2);
}

#[test]
fn remote_changes_flow_into_untouched_fields() {
    let store = general_store();
    let mut form = ChannelSettings::for_channel(&store, "c1");

    form.set_name("mine").unwrap();
    store
        .apply_patch("c1", &Patch::new().with("permissions", 0b11_u64))
        .unwrap();

    assert_eq!(form.sync(), SyncOutcome::Rebased);
    assert_eq!(form.name(), "mine");
    assert_eq!(form.permission_mask(), 0b11);
    assert_eq!(form.diff(), Patch::new().with("name", "mine"));
}

#[test]
fn switching_channels_discards_pending_edits() {
    let store = general_store();
    store.insert(Channel::new("srv", "c2", "random", 0b1));

    let current = Rc::new(RefCell::new("c1".to_string()));
    let projector = {
        let store = store.clone();
        let current = Rc::clone(&current);
        move || -> Option<Baseline<ChannelKey, ChannelFields>> {
            store.get(&current.borrow()).map(|c| c.baseline())
        }
    };
    let mut form = ChannelSettings::new(projector);

    form.set_name("renamed").unwrap();
    form.set_permission(2, true).unwrap();
    assert!(form.has_changes());

    *current.borrow_mut() = "c2".to_string();
    assert_eq!(form.sync(), SyncOutcome::Reinitialized);
    assert!(form.diff().is_empty());
    assert_eq!(form.name(), "random");
    assert_eq!(form.key(), Some(ChannelKey::new("srv", "c2")));
}

#[test]
fn unknown_permission_bits_survive_a_save() {
    let store = ChannelStore::new();
    store.insert(Channel::new("srv", "c1", "general", (1 << 33) | 0b1));
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c1");

    assert_eq!(form.permissions().len(), 3);
    form.set_permission(1, true).unwrap();
    run(async {
        form.save(&cx, &service).await;
    });

    assert_eq!(store.get("c1").unwrap().permissions, (1 << 33) | 0b11);
    assert!(form.diff().is_empty());
}

#[test]
fn channel_deleted_elsewhere_hides_the_form() {
    let store = general_store();
    let mut form = ChannelSettings::for_channel(&store, "c1");
    form.set_name("doomed").unwrap();

    store.remove("c1");
    assert!(!form.is_available());
    assert!(form.diff().is_empty());
    assert!(matches!(
        form.set_name("again"),
        Err(Error::EntityVanished(_))
    ));
}

#[test]
fn cancelled_update_releases_the_save_guard() {
    let store = general_store();
    let service = RecordingService::committing(&store);
    let cx = Cx::for_testing();
    let mut form = ChannelSettings::for_channel(&store, "c1");

    form.set_name("general-chat").unwrap();
    service.cancel_next();
    run(async {
        form.save(&cx, &service).await;
    });

    assert!(matches!(form.save_state(), SaveState::Failed(_)));
    assert!(form.error().is_some_and(|msg| !msg.is_empty()));
    assert!(form.can_save());
    assert_eq!(store.get("c1").unwrap().name, "general");

    run(async {
        let state = form.save(&cx, &service).await;
        assert_eq!(state, &SaveState::Idle);
    });
    assert!(form.diff().is_empty());
    assert_eq!(service.updates().len(), 2);
}
