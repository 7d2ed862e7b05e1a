//! Per-request session state derived from the identity gateway.

use serde::Serialize;

use crate::ports::Identity;
use crate::user_type::UserType;

/// Which screen an account lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Browse and rate provider profiles.
    Catalog,
    /// Create and edit one's own profile.
    Authoring,
}

impl ViewKind {
    pub fn for_user_type(user_type: UserType) -> Self {
        if user_type.is_provider() {
            Self::Authoring
        } else {
            Self::Catalog
        }
    }
}

/// The logged-in account plus the view it is entitled to.
///
/// Never persisted; rebuilt from the bearer token on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub identity: Identity,
    pub view: ViewKind,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        let view = ViewKind::for_user_type(identity.user_type);
        Self { identity, view }
    }

    pub fn user_type(&self) -> UserType {
        self.identity.user_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(user_type: UserType) -> Identity {
        Identity {
            user_id: 1,
            email: "a@example.com".into(),
            user_type,
        }
    }

    #[test]
    fn customers_see_the_catalog() {
        assert_eq!(Session::new(identity(UserType::Customer)).view, ViewKind::Catalog);
    }

    #[test]
    fn providers_see_the_authoring_view() {
        assert_eq!(Session::new(identity(UserType::Designer)).view, ViewKind::Authoring);
        assert_eq!(Session::new(identity(UserType::Carpenter)).view, ViewKind::Authoring);
    }

    #[test]
    fn view_serialises_as_snake_case() {
        let json = serde_json::to_value(Session::new(identity(UserType::Customer))).unwrap();
        assert_eq!(json["view"], "catalog");
        assert_eq!(json["identity"]["user_type"], "customer");
    }
}
