//! Role command - grant or withdraw the admin role.

use crate::cli::args::RoleArgs;
use crate::config::Config;
use crate::domain::UserRole;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, UserRepository, UserStore};

/// Execute the role command
pub async fn execute(args: RoleArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let users = UserStore::new(db.get_connection());
    let role = UserRole::from(args.role);

    let user = users
        .set_role(&args.username, role)
        .await?
        .ok_or_else(|| AppError::validation("username", "No such user"))?;

    tracing::info!(user_id = %user.id, username = %user.username, role = %role, "Role updated");
    println!("{} is now {}", user.username, role);

    Ok(())
}
