//! Account / profile kinds.
//!
//! These must match the `CHECK` constraints in the `users` and `profiles`
//! migrations.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const USER_TYPE_CUSTOMER: &str = "customer";
pub const USER_TYPE_DESIGNER: &str = "designer";
pub const USER_TYPE_CARPENTER: &str = "carpenter";

/// Valid user type values.
const VALID_USER_TYPES: &[&str] = &[USER_TYPE_CUSTOMER, USER_TYPE_DESIGNER, USER_TYPE_CARPENTER];

/// Who a profile belongs to. Fixed when the account or profile is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Customer,
    Designer,
    Carpenter,
}

impl UserType {
    /// Parse from the database / query-string value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            USER_TYPE_CUSTOMER => Ok(Self::Customer),
            USER_TYPE_DESIGNER => Ok(Self::Designer),
            USER_TYPE_CARPENTER => Ok(Self::Carpenter),
            other => Err(CoreError::Validation(format!(
                "Unknown user type '{other}'. Must be one of: {VALID_USER_TYPES:?}"
            ))),
        }
    }

    /// Database / wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Customer => USER_TYPE_CUSTOMER,
            Self::Designer => USER_TYPE_DESIGNER,
            Self::Carpenter => USER_TYPE_CARPENTER,
        }
    }

    /// Designers and carpenters offer services; customers browse them.
    pub fn is_provider(self) -> bool {
        !matches!(self, Self::Customer)
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
