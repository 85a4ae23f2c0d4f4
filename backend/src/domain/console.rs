//! Management console orchestration.
//!
//! [`ConsoleActions`] performs the four mutating actions and reports each
//! outcome through the [`Notifier`]. [`ManagementConsole`] wraps it with the
//! per-session state: live collections, the edit dialog and the two inline
//! forms.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{DirectoryStore, LiveQuery, Notifier};
use crate::domain::{
    AssignmentForm, BusinessUnit, BusinessUnitId, BusinessUnitRegistrar, ConsoleAction,
    ConsoleView, EditFlow, EditView, Error, LoadingState, ManagerRole, ManagerRoleAssignor,
    ManagerRoleId, RegistrationForm, Roster, User, UserAssignment, UserEditor, UserId, UserRole,
};

/// Stateless console writes. Every call emits exactly one notification.
#[derive(Clone)]
pub struct ConsoleActions {
    directory: Arc<dyn DirectoryStore>,
    notifier: Arc<dyn Notifier>,
    assignor: ManagerRoleAssignor,
    registrar: BusinessUnitRegistrar,
}

impl ConsoleActions {
    pub fn new(directory: Arc<dyn DirectoryStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            assignor: ManagerRoleAssignor::new(Arc::clone(&directory)),
            registrar: BusinessUnitRegistrar::new(Arc::clone(&directory)),
            directory,
            notifier,
        }
    }

    pub fn directory(&self) -> &Arc<dyn DirectoryStore> {
        &self.directory
    }

    /// Same notifier, different directory.
    pub fn rebind(&self, directory: Arc<dyn DirectoryStore>) -> Self {
        Self::new(directory, Arc::clone(&self.notifier))
    }

    /// One-off view built from the current snapshots.
    pub fn snapshot_view(&self) -> ConsoleView {
        let users = self.directory.subscribe_users();
        let units = self.directory.subscribe_business_units();
        let roles = self.directory.subscribe_manager_roles();
        let (users_loaded, units_loaded, roles_loaded) =
            (users.snapshot(), units.snapshot(), roles.snapshot());
        let roster = Roster::new(&users_loaded, &units_loaded, &roles_loaded);
        ConsoleView::from_roster(
            &roster,
            LoadingState {
                users: users.is_loading(),
                business_units: units.is_loading(),
                manager_roles: roles.is_loading(),
            },
        )
    }

    /// Write the role and business unit selected in the editor.
    pub async fn save_user(&self, assignment: &UserAssignment) -> Result<User, Error> {
        let result = self
            .directory
            .update_user(assignment)
            .await
            .map_err(Error::from);
        self.report(ConsoleAction::UpdateUser, result)
    }

    pub async fn assign_manager(
        &self,
        user_id: &str,
        business_unit_id: &str,
    ) -> Result<ManagerRole, Error> {
        let result = self.assignor.assign(user_id, business_unit_id).await;
        self.report(ConsoleAction::AssignManager, result)
    }

    pub async fn remove_manager(&self, id: &ManagerRoleId) -> Result<(), Error> {
        let result = self.assignor.remove(id).await;
        self.report(ConsoleAction::RemoveManager, result)
    }

    pub async fn create_business_unit(&self, name: &str) -> Result<BusinessUnit, Error> {
        let result = self.registrar.register(name).await;
        self.report(ConsoleAction::CreateBusinessUnit, result)
    }

    /// Notify a failure raised before the action reached the directory.
    pub fn reject<T>(&self, action: ConsoleAction, error: Error) -> Result<T, Error> {
        self.report(action, Err(error))
    }

    fn report<T>(&self, action: ConsoleAction, result: Result<T, Error>) -> Result<T, Error> {
        let notification = match &result {
            Ok(_) => action.succeeded(),
            Err(error) => action.failed(error),
        };
        self.notifier.notify(notification);
        result
    }
}

/// Live console bound to one admin session.
pub struct ManagementConsole {
    actions: ConsoleActions,
    users: LiveQuery<User>,
    business_units: LiveQuery<BusinessUnit>,
    manager_roles: LiveQuery<ManagerRole>,
    edit: EditFlow,
    assignment: AssignmentForm,
    registration: RegistrationForm,
}

impl ManagementConsole {
    /// Subscribe to all three collections.
    pub fn new(actions: ConsoleActions) -> Self {
        let directory = actions.directory();
        Self {
            users: directory.subscribe_users(),
            business_units: directory.subscribe_business_units(),
            manager_roles: directory.subscribe_manager_roles(),
            actions,
            edit: EditFlow::Idle,
            assignment: AssignmentForm::default(),
            registration: RegistrationForm::default(),
        }
    }

    /// Switch to another directory handle, dropping the old subscriptions.
    ///
    /// Dialog and form state survive the switch.
    pub fn rebind(&mut self, directory: Arc<dyn DirectoryStore>) {
        debug!("rebinding console subscriptions");
        self.actions = self.actions.rebind(directory);
        let directory = self.actions.directory();
        self.users = directory.subscribe_users();
        self.business_units = directory.subscribe_business_units();
        self.manager_roles = directory.subscribe_manager_roles();
        self.sync_editor_units();
    }

    pub fn view(&self) -> ConsoleView {
        let (users, units, roles) = (
            self.users.snapshot(),
            self.business_units.snapshot(),
            self.manager_roles.snapshot(),
        );
        let roster = Roster::new(&users, &units, &roles);
        let mut view = ConsoleView::from_roster(
            &roster,
            LoadingState {
                users: self.users.is_loading(),
                business_units: self.business_units.is_loading(),
                manager_roles: self.manager_roles.is_loading(),
            },
        );
        view.edit = EditView {
            phase: self.edit.phase(),
            editor: self.edit.editor().map(UserEditor::view),
        };
        view.assignment = self.assignment.view();
        view.registration = self.registration.view();
        view
    }

    /// Wait until any collection publishes a new snapshot.
    pub async fn changed(&mut self) {
        tokio::select! {
            () = self.users.changed() => {}
            () = self.business_units.changed() => {}
            () = self.manager_roles.changed() => {}
        }
        self.sync_editor_units();
    }

    fn sync_editor_units(&mut self) {
        if let EditFlow::Editing(editor) | EditFlow::Saving(editor) = &mut self.edit {
            editor.offer_units(self.business_units.snapshot());
        }
    }

    /// Open the editor for `user_id`, or retarget the open one.
    pub fn begin_edit(&mut self, user_id: &UserId) -> Result<(), Error> {
        let target = self
            .users
            .snapshot()
            .into_iter()
            .find(|user| user.id() == user_id)
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
        if let Some(editor) = self.edit.editor_mut() {
            editor.retarget(target);
            return Ok(());
        }
        self.edit
            .begin(UserEditor::new(target, self.business_units.snapshot()))?;
        Ok(())
    }

    pub fn editor_mut(&mut self) -> Option<&mut UserEditor> {
        self.edit.editor_mut()
    }

    fn open_editor(&mut self) -> Result<&mut UserEditor, Error> {
        self.edit
            .editor_mut()
            .ok_or_else(|| Error::invalid_request("No user is being edited."))
    }

    pub fn select_role(&mut self, role: UserRole) -> Result<(), Error> {
        self.open_editor()?.select_role(role);
        Ok(())
    }

    /// Select a business unit in the editor; `None` clears the selection.
    pub fn select_business_unit(&mut self, id: Option<&BusinessUnitId>) -> Result<(), Error> {
        let editor = self.open_editor()?;
        match id {
            Some(id) => editor.select_business_unit(id)?,
            None => editor.clear_business_unit(),
        }
        Ok(())
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.edit.cancel()
    }

    /// Submit the editor. On failure the editor stays open with its
    /// selection intact.
    pub async fn save_user(&mut self) -> Result<User, Error> {
        let assignment = match self.edit.start_save() {
            Ok(assignment) => assignment,
            Err(err) => return self.actions.reject(ConsoleAction::UpdateUser, err.into()),
        };
        let result = self.actions.save_user(&assignment).await;
        self.edit.finish_save(result.is_ok());
        result
    }

    pub fn select_manager(&mut self, user_id: impl Into<String>) {
        self.assignment.select_user(user_id);
    }

    pub fn select_manager_unit(&mut self, business_unit_id: impl Into<String>) {
        self.assignment.select_business_unit(business_unit_id);
    }

    /// Assign the selected pair; the form clears on success.
    pub async fn assign_manager(&mut self) -> Result<ManagerRole, Error> {
        let (user_id, business_unit_id) = match self.assignment.begin_submit() {
            Ok(selection) => selection,
            Err(err) => return self.actions.reject(ConsoleAction::AssignManager, err.into()),
        };
        let result = self
            .actions
            .assign_manager(&user_id, &business_unit_id)
            .await;
        self.assignment.finish_submit(result.is_ok());
        result
    }

    pub async fn remove_manager(&mut self, id: &ManagerRoleId) -> Result<(), Error> {
        self.actions.remove_manager(id).await
    }

    pub fn set_business_unit_name(&mut self, name: impl Into<String>) {
        self.registration.set_name(name);
    }

    /// Create a unit from the name field; the field clears on success.
    pub async fn create_business_unit(&mut self) -> Result<BusinessUnit, Error> {
        let name = match self.registration.begin_submit() {
            Ok(name) => name,
            Err(err) => {
                return self
                    .actions
                    .reject(ConsoleAction::CreateBusinessUnit, err.into());
            }
        };
        let result = self.actions.create_business_unit(&name).await;
        self.registration.finish_submit(result.is_ok());
        result
    }
}
