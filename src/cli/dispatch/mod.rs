use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
        production: matches.get_flag("production"),
        logout_redirect: matches
            .get_one("logout-redirect")
            .map(|s: &String| s.to_string())
            .unwrap_or_else(|| "https://rummage.cc".to_string()),
    })
}
