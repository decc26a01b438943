mod generate;
mod meals;
mod plans;

pub use generate::*;
pub use meals::*;
pub use plans::*;

use clap::Args;
use mealweek_shared::user::CurrentUser;
use serde::Serialize;

/// Identity flags standing in for the auth collaborator; HTTP deployments
/// would resolve these from the session instead.
#[derive(Args, Clone)]
pub struct UserArgs {
    /// Acting user id
    #[arg(long)]
    pub user_id: String,

    /// Acting user email
    #[arg(long, default_value = "")]
    pub email: String,
}

impl From<UserArgs> for CurrentUser {
    fn from(value: UserArgs) -> Self {
        CurrentUser {
            id: value.user_id,
            email: value.email,
        }
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}
