pub mod deidentify;
pub mod run;
pub mod store;

use anyhow::{anyhow, Context, Result};
use healthcare_client::deid::PollConfig;
use std::time::Duration;
use structopt::StructOpt;

/// Options controlling how the de-identification operation is waited on.
#[derive(Debug, StructOpt)]
pub struct PollArgs {
    #[structopt(long = "poll-interval", default_value = "1", parse(try_from_str = parse_seconds))]
    /// Seconds to wait before polling the operation again.
    poll_interval: Duration,

    #[structopt(long = "poll-backoff", default_value = "1")]
    /// Factor the wait is multiplied by after every poll. 1 keeps a fixed interval.
    poll_backoff: f64,

    #[structopt(long = "max-poll-interval", parse(try_from_str = parse_seconds))]
    /// Upper bound in seconds on a single wait between polls.
    max_poll_interval: Option<Duration>,

    #[structopt(long = "timeout", parse(try_from_str = parse_seconds))]
    /// Give up after waiting this many seconds for the operation. Waits forever if not set.
    timeout: Option<Duration>,
}

impl PollArgs {
    pub fn poll_config(&self) -> Result<PollConfig> {
        if !self.poll_backoff.is_finite() || self.poll_backoff < 1.0 {
            return Err(anyhow!(
                "--poll-backoff must be at least 1, got {}",
                self.poll_backoff
            ));
        }
        Ok(PollConfig {
            interval: self.poll_interval,
            backoff_factor: self.poll_backoff,
            max_interval: self.max_poll_interval,
            timeout: self.timeout,
        })
    }
}

fn parse_seconds(string: &str) -> Result<Duration> {
    let seconds: f64 = string
        .parse()
        .with_context(|| format!("Expected a number of seconds, got `{string}`"))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|error| anyhow!("Invalid number of seconds `{}`: {}", string, error))
}
