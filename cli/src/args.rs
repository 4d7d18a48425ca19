use crate::{
    commands::{deidentify::DeidentifyArgs, run::RunArgs, store::StoreArgs},
    printer::OutputFormat,
};
use anyhow::{anyhow, Error, Result};
use std::str::FromStr;
use structopt::StructOpt;
use url::Url;

/// dicom-deid stores DICOM files and de-identifies DICOM stores on the Cloud Healthcare API.
///
/// The dataset and stores are read from GCP_PROJECT, GCLOUD_PROJECT_LOCATION,
/// GCLOUD_PROJECT_DATASET_ID, SOURCE_DICOM_STORE and DESTINATION_DICOM_STORE unless overridden
/// with the options below.
#[derive(Debug, StructOpt)]
#[structopt(
    global_settings = &[
        structopt::clap::AppSettings::ColoredHelp,
        structopt::clap::AppSettings::InferSubcommands,
    ]
)]
pub struct Args {
    #[structopt(short = "v", long = "verbose")]
    /// Enable more verbose logging.
    pub verbose: bool,

    #[structopt(short = "o", long = "output", default_value = "pretty")]
    /// Output format. One of: pretty, json
    pub output: OutputFormat,

    #[structopt(long = "endpoint", parse(try_from_str))]
    /// Specify what endpoint to use. Defaults to https://healthcare.googleapis.com/v1.
    pub endpoint: Option<Url>,

    #[structopt(short = "k", long = "accept-invalid-certificates")]
    /// Do not verify TLS certificates.
    pub accept_invalid_certificates: bool,

    #[structopt(long = "proxy", parse(try_from_str))]
    /// URL of a proxy to send every request through.
    pub proxy: Option<Url>,

    #[structopt(long = "token")]
    /// OAuth access token. Defaults to GOOGLE_OAUTH_ACCESS_TOKEN, then a prompt on stdin.
    pub token: Option<String>,

    #[structopt(long = "project")]
    /// Google Cloud project. Overrides GCP_PROJECT.
    pub project: Option<String>,

    #[structopt(long = "location")]
    /// Location of the dataset. Overrides GCLOUD_PROJECT_LOCATION.
    pub location: Option<String>,

    #[structopt(long = "dataset")]
    /// Healthcare dataset. Overrides GCLOUD_PROJECT_DATASET_ID.
    pub dataset: Option<String>,

    #[structopt(long = "source-store")]
    /// DICOM store instances are uploaded to and de-identified from. Overrides
    /// SOURCE_DICOM_STORE.
    pub source_store: Option<String>,

    #[structopt(long = "destination-store")]
    /// DICOM store receiving de-identified instances. Overrides DESTINATION_DICOM_STORE.
    pub destination_store: Option<String>,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(name = "completion")]
    /// Output shell completion code for the specified shell (bash or zsh)
    Completion { shell: Shell },

    #[structopt(name = "store")]
    /// Store a DICOM file in the source store
    Store(StoreArgs),

    #[structopt(name = "deidentify")]
    /// De-identify the source store into the destination store and wait for it to finish
    Deidentify(DeidentifyArgs),

    #[structopt(name = "run")]
    /// Store a DICOM file, then de-identify the source store into the destination store
    Run(RunArgs),
}

#[derive(Debug)]
pub enum Shell {
    Bash,
    Zsh,
}

impl FromStr for Shell {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        match string {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            _ => Err(anyhow!("unknown shell: '{}'", string)),
        }
    }
}
