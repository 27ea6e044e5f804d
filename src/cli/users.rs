//! Account commands

use clap::Args;
use serde::Serialize;

use crate::domain::{Actor, UserId};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "PMP_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "PMP_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct ShowUserArgs {
    /// Account id
    pub id: UserId,

    /// Actor id to fetch as; defaults to the account itself
    #[arg(long)]
    pub actor: Option<String>,

    /// Roles held by the actor
    #[arg(long = "role")]
    pub roles: Vec<String>,
}

impl ShowUserArgs {
    fn actor(&self) -> Actor {
        let id = self.actor.clone().unwrap_or_else(|| self.id.to_string());
        Actor::new(id).with_roles(self.roles.iter().cloned())
    }
}

pub async fn register(args: RegisterArgs) -> anyhow::Result<()> {
    let state = super::bootstrap().await?;
    let summary = state
        .users
        .register(&args.name, &args.email, &args.password)
        .await?;

    print_json(&summary)
}

pub async fn login(args: LoginArgs) -> anyhow::Result<()> {
    let state = super::bootstrap().await?;

    match state.users.authenticate(&args.email, &args.password).await? {
        Some(summary) => print_json(&summary),
        None => anyhow::bail!("User doesn't exist or credentials are wrong"),
    }
}

pub async fn show_user(args: ShowUserArgs) -> anyhow::Result<()> {
    let state = super::bootstrap().await?;
    let summary = state.users.get_user(&args.actor(), &args.id).await?;

    print_json(&summary)
}

pub async fn list_users() -> anyhow::Result<()> {
    let state = super::bootstrap().await?;
    let users = state.users.list_users().await?;

    print_json(&users)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityId;

    #[test]
    fn test_actor_defaults_to_account() {
        let id = UserId::generate();
        let args = ShowUserArgs {
            id,
            actor: None,
            roles: vec![],
        };

        let actor = args.actor();
        assert_eq!(actor.id(), id.to_string());
        assert!(!actor.has_role("admin"));
    }

    #[test]
    fn test_actor_override_with_roles() {
        let args = ShowUserArgs {
            id: UserId::generate(),
            actor: Some("ops".to_string()),
            roles: vec!["admin".to_string()],
        };

        let actor = args.actor();
        assert_eq!(actor.id(), "ops");
        assert!(actor.has_role("admin"));
    }
}
