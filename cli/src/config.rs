use anyhow::{anyhow, Result};
use healthcare_client::{deid::Settings, Config, Token, DEFAULT_ENDPOINT};
use log::{debug, warn};

use crate::{args::Args, utils::io::read_token_from_stdin};

pub const TOKEN_ENV_VARIABLE_NAME: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Dataset and store identifiers from the environment, with command line overrides applied.
pub fn read_settings(args: &Args, lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let from_env = Settings::from_lookup(lookup);
    let or_env = |arg: &Option<String>, env: Option<String>| {
        arg.clone()
            .filter(|value| !value.trim().is_empty())
            .or(env)
    };

    let settings = Settings {
        project: or_env(&args.project, from_env.project),
        location: or_env(&args.location, from_env.location),
        dataset: or_env(&args.dataset, from_env.dataset),
        source_store: or_env(&args.source_store, from_env.source_store),
        destination_store: or_env(&args.destination_store, from_env.destination_store),
    };
    debug!("Using settings {:?}", settings);
    settings
}

pub fn client_config(args: &Args, lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let token = match args
        .token
        .clone()
        .or_else(|| lookup(TOKEN_ENV_VARIABLE_NAME))
        .filter(|token| !token.trim().is_empty())
    {
        Some(token) => token,
        None => read_token_from_stdin()?.ok_or_else(|| {
            anyhow!(
                "No access token: pass --token or set {}",
                TOKEN_ENV_VARIABLE_NAME
            )
        })?,
    };

    if args.accept_invalid_certificates {
        warn!(concat!(
            "TLS certificate verification is disabled. ",
            "Do NOT use this over an insecure network."
        ));
    }

    Ok(Config {
        endpoint: args
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.clone()),
        token: Token(token),
        accept_invalid_certificates: args.accept_invalid_certificates,
        proxy: args.proxy.clone(),
        ..Default::default()
    })
}
