use clap::Parser;
use pmp_data_layer::cli::{users, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Register(args) => users::register(args).await,
        Command::Login(args) => users::login(args).await,
        Command::ShowUser(args) => users::show_user(args).await,
        Command::ListUsers => users::list_users().await,
    }
}
