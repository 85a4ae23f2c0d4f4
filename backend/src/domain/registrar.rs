//! Business-unit creation.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::DirectoryStore;
use crate::domain::{BusinessUnit, BusinessUnitName, Error};

/// Appends new business units to the directory.
#[derive(Clone)]
pub struct BusinessUnitRegistrar {
    directory: Arc<dyn DirectoryStore>,
}

impl BusinessUnitRegistrar {
    pub fn new(directory: Arc<dyn DirectoryStore>) -> Self {
        Self { directory }
    }

    /// Create a unit named `name`, trimmed. Blank names are rejected without
    /// a write. Names need not be unique.
    pub async fn register(&self, name: &str) -> Result<BusinessUnit, Error> {
        let name =
            BusinessUnitName::new(name).map_err(|err| Error::invalid_request(err.to_string()))?;
        let unit = self.directory.add_business_unit(&name).await?;
        debug!(business_unit_id = %unit.id(), name = %unit.name(), "business unit registered");
        Ok(unit)
    }
}
