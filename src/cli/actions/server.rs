use crate::api::{self, handlers::auth::AuthConfig};
use crate::cli::actions::Action;
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            production,
            logout_redirect,
        } => {
            let config = AuthConfig::new(production).with_logout_redirect(logout_redirect);

            api::new(port, dsn, config).await?;
        }
    }

    Ok(())
}
