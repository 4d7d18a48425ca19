use anyhow::{Context, Result};
use healthcare_client::{deid::TransformOrchestrator, Client, TransformRequest};
use log::info;
use structopt::StructOpt;

use super::PollArgs;
use crate::printer::Printer;

#[derive(Debug, StructOpt)]
pub struct DeidentifyArgs {
    #[structopt(flatten)]
    poll: PollArgs,
}

pub fn run(
    args: &DeidentifyArgs,
    request: &TransformRequest,
    client: &Client,
    printer: &Printer,
) -> Result<()> {
    let operation = TransformOrchestrator::new(client, args.poll.poll_config()?)
        .transform(request)
        .context("Unable to de-identify DICOMs in the source store")?;
    printer.print_operation(&operation)?;
    info!(
        "De-identified `{}` into `{}`",
        request.source(),
        request.destination()
    );
    Ok(())
}
