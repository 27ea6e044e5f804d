//! Default role and permission assignment for new accounts

#[cfg(test)]
use mockall::automock;

/// Roles and permissions granted to an account at registration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultGrants {
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl DefaultGrants {
    pub fn new(
        roles: impl IntoIterator<Item = impl Into<String>>,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decides what a newly registered account starts with
#[cfg_attr(test, automock)]
pub trait RoleAssigner: Send + Sync {
    fn grants_for(&self, email: &str) -> DefaultGrants;
}

/// Grants the same roles and permissions to every account
#[derive(Debug, Clone)]
pub struct StaticRoleAssigner {
    grants: DefaultGrants,
}

impl StaticRoleAssigner {
    pub fn new(grants: DefaultGrants) -> Self {
        Self { grants }
    }
}

impl Default for StaticRoleAssigner {
    fn default() -> Self {
        Self::new(DefaultGrants::new(["user"], ["files.read", "files.write"]))
    }
}

impl RoleAssigner for StaticRoleAssigner {
    fn grants_for(&self, _email: &str) -> DefaultGrants {
        self.grants.clone()
    }
}
