use log::info;
use std::path::Path;

use super::{
    ingest::{Ingestor, Uploaded},
    poll::Sleeper,
    transform::TransformOrchestrator,
    HealthcareService, Result,
};
use crate::resources::{deidentify::TransformRequest, operation::Operation};

pub trait Ingest {
    fn upload(&self, file_path: &Path) -> Result<Uploaded>;
}

pub trait Transform {
    fn transform(&self, request: &TransformRequest) -> Result<Operation>;
}

impl<ServiceT: HealthcareService> Ingest for Ingestor<ServiceT> {
    fn upload(&self, file_path: &Path) -> Result<Uploaded> {
        Ingestor::upload(self, file_path)
    }
}

impl<ServiceT: HealthcareService, SleeperT: Sleeper> Transform
    for TransformOrchestrator<ServiceT, SleeperT>
{
    fn transform(&self, request: &TransformRequest) -> Result<Operation> {
        TransformOrchestrator::transform(self, request)
    }
}

#[derive(Debug, Clone)]
pub struct Completed {
    pub uploaded: Uploaded,
    pub operation: Operation,
}

/// Store `file_path`, then de-identify the source store. The de-identification is only
/// submitted once the store accepted the file.
pub fn run(
    ingestor: &impl Ingest,
    orchestrator: &impl Transform,
    file_path: &Path,
    request: &TransformRequest,
) -> Result<Completed> {
    let uploaded = ingestor.upload(file_path)?;
    info!(
        "Uploaded {} bytes, starting de-identification",
        uploaded.num_bytes
    );
    let operation = orchestrator.transform(request)?;
    Ok(Completed {
        uploaded,
        operation,
    })
}
