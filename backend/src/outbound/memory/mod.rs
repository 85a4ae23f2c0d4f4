//! In-memory document directory.
//!
//! Each collection is held by a `tokio::sync::watch` sender. Subscribers get
//! the latest snapshot immediately and are woken on every change, which gives
//! the console its live-query behaviour. Writes are applied one document at a
//! time; concurrent writers race and the last one wins.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use crate::domain::ports::{DirectoryError, DirectoryStore, LiveQuery};
use crate::domain::{
    BusinessUnit, BusinessUnitId, BusinessUnitName, ManagerRole, ManagerRoleId, User,
    UserAssignment, UserId,
};

type Collection<T> = watch::Sender<Option<Vec<T>>>;

fn collection<T>(items: Vec<T>) -> Collection<T> {
    watch::Sender::new(Some(items))
}

/// Process-local [`DirectoryStore`].
#[derive(Debug)]
pub struct InMemoryDirectory {
    users: Collection<User>,
    business_units: Collection<BusinessUnit>,
    manager_roles: Collection<ManagerRole>,
    available: AtomicBool,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    /// Empty directory with every collection already loaded.
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    /// Directory primed with `users`.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: collection(users),
            business_units: collection(Vec::new()),
            manager_roles: collection(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle availability. While unavailable every write fails with
    /// [`DirectoryError::Connection`]; reads keep serving the last snapshot.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), DirectoryError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DirectoryError::connection("directory is unavailable"))
        }
    }

    /// Current manager roles, for assertions and diagnostics.
    pub fn manager_roles(&self) -> Vec<ManagerRole> {
        self.manager_roles.borrow().clone().unwrap_or_default()
    }

    /// Current business units.
    pub fn business_units(&self) -> Vec<BusinessUnit> {
        self.business_units.borrow().clone().unwrap_or_default()
    }

    /// Current users.
    pub fn users(&self) -> Vec<User> {
        self.users.borrow().clone().unwrap_or_default()
    }
}

fn upsert<T, K: PartialEq>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> &K) {
    match items.iter_mut().find(|existing| key(existing) == key(&item)) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectory {
    fn subscribe_users(&self) -> LiveQuery<User> {
        LiveQuery::new(self.users.subscribe())
    }

    fn subscribe_business_units(&self) -> LiveQuery<BusinessUnit> {
        LiveQuery::new(self.business_units.subscribe())
    }

    fn subscribe_manager_roles(&self) -> LiveQuery<ManagerRole> {
        LiveQuery::new(self.manager_roles.subscribe())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        Ok(self
            .users
            .borrow()
            .iter()
            .flatten()
            .find(|user| user.id() == id)
            .cloned())
    }

    async fn put_user(&self, user: &User) -> Result<(), DirectoryError> {
        self.ensure_available()?;
        self.users.send_modify(|users| {
            upsert(users.get_or_insert_with(Vec::new), user.clone(), User::id);
        });
        debug!(user_id = %user.id(), "user stored");
        Ok(())
    }

    async fn update_user(&self, assignment: &UserAssignment) -> Result<User, DirectoryError> {
        self.ensure_available()?;
        let mut updated = None;
        self.users.send_if_modified(|users| {
            let target = users
                .iter_mut()
                .flatten()
                .find(|user| user.id() == &assignment.user_id);
            match target {
                Some(user) => {
                    user.apply(assignment);
                    updated = Some(user.clone());
                    true
                }
                None => false,
            }
        });
        let user = updated.ok_or_else(|| {
            DirectoryError::missing_document("users", assignment.user_id.to_string())
        })?;
        debug!(user_id = %user.id(), role = %user.role(), "user updated");
        Ok(user)
    }

    async fn add_business_unit(
        &self,
        name: &BusinessUnitName,
    ) -> Result<BusinessUnit, DirectoryError> {
        self.ensure_available()?;
        let unit = BusinessUnit::new(BusinessUnitId::generate(), name.clone());
        self.business_units.send_modify(|units| {
            units.get_or_insert_with(Vec::new).push(unit.clone());
        });
        Ok(unit)
    }

    async fn set_manager_role(&self, role: &ManagerRole) -> Result<(), DirectoryError> {
        self.ensure_available()?;
        self.manager_roles.send_modify(|roles| {
            upsert(roles.get_or_insert_with(Vec::new), role.clone(), ManagerRole::id);
        });
        Ok(())
    }

    async fn delete_manager_role(&self, id: &ManagerRoleId) -> Result<(), DirectoryError> {
        self.ensure_available()?;
        let removed = self.manager_roles.send_if_modified(|roles| {
            let Some(roles) = roles else {
                return false;
            };
            let before = roles.len();
            roles.retain(|role| role.id() != id);
            roles.len() != before
        });
        debug!(manager_role_id = %id, removed, "manager role delete applied");
        Ok(())
    }
}
