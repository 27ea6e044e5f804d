//! Access rules for user records

use super::entity::User;
use crate::domain::authorization::{Actor, Policy, PolicyDecision};

pub const ADMIN_ROLE: &str = "admin";

/// A user may see and change their own record; admins may see and change any
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPolicy;

impl Policy<User> for UserPolicy {
    fn decide(&self, actor: &Actor, action: &str, user: &User) -> PolicyDecision {
        match action {
            "view" | "update" | "delete" => {
                if actor.has_role(ADMIN_ROLE) || actor.id() == user.id().to_string() {
                    PolicyDecision::Allow
                } else {
                    PolicyDecision::deny("users may only access their own account")
                }
            }
            _ => PolicyDecision::Abstain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::EntityId;
    use crate::domain::user::UserId;

    fn user() -> User {
        User::new(UserId::generate(), "Ada", "ada@example.com", "h")
    }

    #[test]
    fn test_self_access() {
        let user = user();
        let actor = Actor::new(user.id().to_string());

        for action in ["view", "update", "delete"] {
            assert_eq!(UserPolicy.decide(&actor, action, &user), PolicyDecision::Allow);
        }
    }

    #[test]
    fn test_admin_access() {
        let actor = Actor::new("someone").with_role(ADMIN_ROLE);
        assert_eq!(UserPolicy.decide(&actor, "delete", &user()), PolicyDecision::Allow);
    }

    #[test]
    fn test_other_user_denied() {
        let actor = Actor::new("someone-else");
        assert!(matches!(
            UserPolicy.decide(&actor, "view", &user()),
            PolicyDecision::Deny(_)
        ));
    }

    #[test]
    fn test_unknown_action_abstains() {
        let actor = Actor::new("someone-else");
        assert_eq!(
            UserPolicy.decide(&actor, "export", &user()),
            PolicyDecision::Abstain
        );
    }
}
