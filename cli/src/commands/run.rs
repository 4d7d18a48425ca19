use anyhow::{Context, Result};
use healthcare_client::{
    deid::{pipeline, Ingestor, Settings, TransformOrchestrator},
    Client, TransformRequest,
};
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

use super::PollArgs;
use crate::printer::Printer;

#[derive(Debug, StructOpt)]
pub struct RunArgs {
    #[structopt(name = "dicom-file", parse(from_os_str))]
    /// Path to the DICOM file to store before de-identifying.
    file: PathBuf,

    #[structopt(flatten)]
    poll: PollArgs,
}

pub fn run(
    args: &RunArgs,
    request: &TransformRequest,
    client: &Client,
    settings: Settings,
    printer: &Printer,
) -> Result<()> {
    let orchestrator = TransformOrchestrator::new(client, args.poll.poll_config()?);
    let ingestor = Ingestor::new(client, settings);

    let completed = pipeline::run(&ingestor, &orchestrator, &args.file, request)
        .context("Unable to store and de-identify DICOMs")?;

    printer.print_uploaded(&completed.uploaded)?;
    info!(
        "DICOM successfully de-identified into `{}`",
        request.destination()
    );
    Ok(())
}
