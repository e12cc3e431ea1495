//! Reader configuration as it appears in job definitions.

use crate::{
    DEFAULT_PAGE_SIZE,
    error::ConfigError,
    reader::{DEFAULT_READER_NAME, Isolation},
};
use serde::{Deserialize, Serialize};

///
/// ReaderConfig
///
/// Every field has a default, so a job definition only states what it
/// changes:
///
/// ```json
/// { "name": "product_backup", "page_size": 500, "isolation": "shared" }
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    pub name: String,
    pub page_size: u32,
    pub isolation: Isolation,
    pub max_item_count: Option<u64>,
}

impl ReaderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        Ok(())
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_READER_NAME.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            isolation: Isolation::default(),
            max_item_count: None,
        }
    }
}
