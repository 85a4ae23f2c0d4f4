//! Console behaviour against the in-memory directory.
//!
//! These tests go through the public console API only and check what ends up
//! stored.

use std::sync::Arc;

use admin_console::domain::ports::{DirectoryStore, NoOpNotifier};
use admin_console::domain::{
    BusinessUnitId, ConsoleActions, EditPhase, Email, ErrorCode, ManagementConsole, User, UserId,
    UserRole,
};
use admin_console::outbound::memory::InMemoryDirectory;
use rstest::{fixture, rstest};

fn user(id: &str, role: UserRole) -> User {
    User::new(
        UserId::new(id).expect("user id"),
        Email::new(format!("{id}@example.com")).expect("email"),
        role,
    )
}

#[fixture]
fn directory() -> Arc<InMemoryDirectory> {
    Arc::new(InMemoryDirectory::with_users(vec![
        user("ada", UserRole::Employee),
        user("grace", UserRole::Manager),
        user("linus", UserRole::Employee),
    ]))
}

fn console(directory: &Arc<InMemoryDirectory>) -> ManagementConsole {
    let store: Arc<dyn DirectoryStore> = directory.clone();
    ManagementConsole::new(ConsoleActions::new(store, Arc::new(NoOpNotifier)))
}

async fn create_unit(console: &mut ManagementConsole, name: &str) -> BusinessUnitId {
    console.set_business_unit_name(name);
    console
        .create_business_unit()
        .await
        .expect("business unit created")
        .id()
        .clone()
}

#[rstest]
#[tokio::test]
async fn saving_a_user_stores_exactly_the_selection(directory: Arc<InMemoryDirectory>) {
    let mut console = console(&directory);
    let unit = create_unit(&mut console, "Engineering").await;
    let before = directory.users();

    console
        .begin_edit(&UserId::new("ada").expect("user id"))
        .expect("editor opens");
    console.select_role(UserRole::Manager).expect("role selected");
    console
        .select_business_unit(Some(&unit))
        .expect("unit selected");
    let saved = console.save_user().await.expect("user saved");

    assert_eq!(saved.role(), UserRole::Manager);
    assert_eq!(saved.business_unit_id(), Some(&unit));
    assert_eq!(console.view().edit.phase, EditPhase::Idle);
    for (old, new) in before.iter().zip(directory.users()) {
        if old.id().as_ref() != "ada" {
            assert_eq!(old, &new);
        }
    }
}

#[rstest]
#[tokio::test]
async fn repeated_assignment_keeps_one_record(directory: Arc<InMemoryDirectory>) {
    let mut console = console(&directory);
    let unit = create_unit(&mut console, "Ops").await;

    for _ in 0..3 {
        console.select_manager("grace");
        console.select_manager_unit(unit.as_ref());
        console.assign_manager().await.expect("manager assigned");
    }

    assert_eq!(directory.manager_roles().len(), 1);
}

#[rstest]
#[case("", "eng")]
#[case("grace", "")]
#[case("  ", "  ")]
#[tokio::test]
async fn incomplete_pairs_write_nothing(
    directory: Arc<InMemoryDirectory>,
    #[case] user_id: &str,
    #[case] unit_id: &str,
) {
    let mut console = console(&directory);
    console.select_manager(user_id);
    console.select_manager_unit(unit_id);

    let error = console.assign_manager().await.expect_err("precondition");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(directory.manager_roles().is_empty());
}

#[rstest]
#[tokio::test]
async fn removal_deletes_only_the_named_role(directory: Arc<InMemoryDirectory>) {
    let mut console = console(&directory);
    let unit = create_unit(&mut console, "Ops").await;
    let mut ids = Vec::new();
    for manager in ["grace", "linus"] {
        console.select_manager(manager);
        console.select_manager_unit(unit.as_ref());
        ids.push(console.assign_manager().await.expect("assigned").id().clone());
    }

    console.remove_manager(&ids[0]).await.expect("removed");
    console
        .remove_manager(&ids[0])
        .await
        .expect("missing ids are not fatal");

    let remaining = directory.manager_roles();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), &ids[1]);
}

#[rstest]
#[tokio::test]
async fn blank_names_write_nothing(directory: Arc<InMemoryDirectory>) {
    let mut console = console(&directory);
    console.set_business_unit_name(" \t ");
    let error = console
        .create_business_unit()
        .await
        .expect_err("blank name");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(directory.business_units().is_empty());
}

#[rstest]
#[tokio::test]
async fn console_sees_writes_from_other_sessions(directory: Arc<InMemoryDirectory>) {
    let mut watcher = console(&directory);
    let mut writer = console(&directory);

    create_unit(&mut writer, "Research").await;
    tokio::time::timeout(std::time::Duration::from_secs(1), watcher.changed())
        .await
        .expect("change observed");

    let view = watcher.view();
    assert_eq!(view.business_units.len(), 1);
    assert_eq!(view.business_units[0].name().as_ref(), "Research");
}
