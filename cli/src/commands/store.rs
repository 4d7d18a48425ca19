use anyhow::{Context, Result};
use healthcare_client::{
    deid::{Ingestor, Settings},
    Client, StoreReference,
};
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

use crate::printer::Printer;

#[derive(Debug, StructOpt)]
pub struct StoreArgs {
    #[structopt(name = "dicom-file", parse(from_os_str))]
    /// Path to the DICOM file to store.
    file: PathBuf,
}

pub fn run(
    args: &StoreArgs,
    source: &StoreReference,
    client: &Client,
    settings: Settings,
    printer: &Printer,
) -> Result<()> {
    let uploaded = Ingestor::new(client, settings)
        .upload_to(source, &args.file)
        .context("Unable to create a DICOM instance in the source store")?;
    printer.print_uploaded(&uploaded)?;
    info!(
        "Stored `{}` ({} bytes) in `{}`",
        uploaded.path.display(),
        uploaded.num_bytes,
        uploaded.store
    );
    Ok(())
}
