#![deny(clippy::all)]
mod args;
mod commands;
mod config;
mod printer;
mod utils;

use anyhow::{Context, Result};
use healthcare_client::Client;
use log::error;
use std::{env, io, process};
use structopt::{clap::Shell as ClapShell, StructOpt};

use crate::{
    args::{Args, Command, Shell},
    commands::{deidentify, run as run_command, store},
    printer::Printer,
    utils::io::init_env_logger,
};

fn run(args: Args) -> Result<()> {
    let printer = Printer::new(args.output);
    let lookup = |name: &str| env::var(name).ok();

    match &args.command {
        Command::Completion { shell } => {
            let mut app = Args::clap();
            let clap_shell = match shell {
                Shell::Zsh => ClapShell::Zsh,
                Shell::Bash => ClapShell::Bash,
            };
            app.gen_completions_to("dicom-deid", clap_shell, &mut io::stdout());
            Ok(())
        }
        Command::Store(store_args) => {
            let settings = config::read_settings(&args, lookup);
            let source = settings
                .source_store()
                .context("Unable to resolve the source DICOM store")?;
            store::run(
                store_args,
                &source,
                &client_from_args(&args)?,
                settings,
                &printer,
            )
        }
        Command::Deidentify(deidentify_args) => {
            let request = config::read_settings(&args, lookup)
                .transform_request()
                .context("Unable to build the de-identification request")?;
            deidentify::run(
                deidentify_args,
                &request,
                &client_from_args(&args)?,
                &printer,
            )
        }
        Command::Run(run_args) => {
            let settings = config::read_settings(&args, lookup);
            let request = settings
                .transform_request()
                .context("Unable to build the de-identification request")?;
            run_command::run(
                run_args,
                &request,
                &client_from_args(&args)?,
                settings,
                &printer,
            )
        }
    }
}

fn client_from_args(args: &Args) -> Result<Client> {
    let config = config::client_config(args, |name| env::var(name).ok())?;
    Client::new(config).context("Failed to initialise the Cloud Healthcare API client.")
}

fn main() {
    let args = Args::from_args();
    init_env_logger(args.verbose);

    if let Err(error) = run(args) {
        error!("An error occurred:");
        for cause in error.chain() {
            error!(" |- {cause}");
        }

        #[cfg(feature = "backtrace")]
        {
            error!("{}", error.backtrace());
        }

        process::exit(1);
    }
}
