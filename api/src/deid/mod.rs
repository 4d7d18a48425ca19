//! Storing DICOM instances and de-identifying whole stores.
//!
//! [`ingest::Ingestor`] pushes one file into the source store, [`transform::TransformOrchestrator`]
//! submits a de-identification of the source store into the destination store and polls the
//! resulting long-running operation, and [`pipeline::run`] chains the two.

pub mod ingest;
pub mod pipeline;
pub mod poll;
pub mod transform;

#[cfg(test)]
pub(crate) mod fake;

use reqwest::StatusCode;
use std::{io, path::PathBuf, time::Duration};

use crate::{
    resources::{
        deidentify::TransformRequest,
        instance::StoreInstancesResponse,
        operation::{Operation, OperationError, OperationName},
        store::{FullName as StoreFullName, StoreReference},
    },
    Client,
};

pub use self::{
    ingest::{Ingestor, Uploaded},
    pipeline::{Completed, Ingest, Transform},
    poll::{CancellationToken, PollConfig, Sleeper, ThreadSleeper},
    transform::TransformOrchestrator,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{}` is not set", setting)]
    Config { setting: &'static str },

    #[error("`{}` is not a valid value for `{}`", value, setting)]
    BadSetting {
        setting: &'static str,
        value: String,
    },

    #[error("Could not read DICOM file `{}`", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Could not store instance in `{}`", store)]
    RemoteCall {
        store: StoreFullName,
        source: crate::Error,
    },

    #[error(
        "Storing instance in `{}` was rejected with status {} {}: {}",
        store,
        status_code.as_u16(),
        status_text,
        String::from_utf8_lossy(body).trim()
    )]
    RemoteRejected {
        store: StoreFullName,
        status_code: StatusCode,
        status_text: String,
        body: Vec<u8>,
    },

    #[error("Could not submit de-identification of `{}`", store)]
    Submit {
        store: StoreFullName,
        source: crate::Error,
    },

    #[error("Could not fetch operation `{}`", operation)]
    PollFailed {
        operation: OperationName,
        source: crate::Error,
    },

    #[error("De-identification operation `{}` failed with {}", operation, error)]
    OperationFailed {
        operation: OperationName,
        error: OperationError,
    },

    #[error("Stopped waiting for operation `{}`: cancelled", operation)]
    Cancelled { operation: OperationName },

    #[error("Operation `{}` still running after {:?}", operation, elapsed)]
    DeadlineExceeded {
        operation: OperationName,
        elapsed: Duration,
    },
}

/// The remote calls the ingestion and de-identification steps rely on.
pub trait HealthcareService {
    fn store_instances(
        &self,
        store: &StoreReference,
        content_type: &str,
        data: Vec<u8>,
    ) -> crate::Result<StoreInstancesResponse>;

    fn deidentify_store(&self, request: &TransformRequest) -> crate::Result<Operation>;

    fn get_operation(&self, name: &OperationName) -> crate::Result<Operation>;
}

impl HealthcareService for Client {
    fn store_instances(
        &self,
        store: &StoreReference,
        content_type: &str,
        data: Vec<u8>,
    ) -> crate::Result<StoreInstancesResponse> {
        Client::store_instances(self, store, content_type, data)
    }

    fn deidentify_store(&self, request: &TransformRequest) -> crate::Result<Operation> {
        Client::deidentify_store(self, request)
    }

    fn get_operation(&self, name: &OperationName) -> crate::Result<Operation> {
        Client::get_operation(self, name)
    }
}

impl<ServiceT: HealthcareService + ?Sized> HealthcareService for &ServiceT {
    fn store_instances(
        &self,
        store: &StoreReference,
        content_type: &str,
        data: Vec<u8>,
    ) -> crate::Result<StoreInstancesResponse> {
        (**self).store_instances(store, content_type, data)
    }

    fn deidentify_store(&self, request: &TransformRequest) -> crate::Result<Operation> {
        (**self).deidentify_store(request)
    }

    fn get_operation(&self, name: &OperationName) -> crate::Result<Operation> {
        (**self).get_operation(name)
    }
}

pub const PROJECT_SETTING: &str = "GCP_PROJECT";
pub const LOCATION_SETTING: &str = "GCLOUD_PROJECT_LOCATION";
pub const DATASET_SETTING: &str = "GCLOUD_PROJECT_DATASET_ID";
pub const SOURCE_STORE_SETTING: &str = "SOURCE_DICOM_STORE";
pub const DESTINATION_STORE_SETTING: &str = "DESTINATION_DICOM_STORE";

/// Identifiers of the dataset and the two stores, read once by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub project: Option<String>,
    pub location: Option<String>,
    pub dataset: Option<String>,
    pub source_store: Option<String>,
    pub destination_store: Option<String>,
}

impl Settings {
    /// Reads every setting by name. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Settings {
            project: read(PROJECT_SETTING),
            location: read(LOCATION_SETTING),
            dataset: read(DATASET_SETTING),
            source_store: read(SOURCE_STORE_SETTING),
            destination_store: read(DESTINATION_STORE_SETTING),
        }
    }

    pub fn source_store(&self) -> Result<StoreReference> {
        self.store(&self.source_store, SOURCE_STORE_SETTING)
    }

    pub fn destination_store(&self) -> Result<StoreReference> {
        self.store(&self.destination_store, DESTINATION_STORE_SETTING)
    }

    pub fn transform_request(&self) -> Result<TransformRequest> {
        Ok(TransformRequest::new(
            self.source_store()?,
            self.destination_store()?,
        ))
    }

    fn store(&self, store: &Option<String>, store_setting: &'static str) -> Result<StoreReference> {
        let store = required(store, store_setting)?;
        let project = required(&self.project, PROJECT_SETTING)?;
        let location = required(&self.location, LOCATION_SETTING)?;
        let dataset = required(&self.dataset, DATASET_SETTING)?;

        StoreReference::new(project, location, dataset, store).map_err(|_| {
            [
                (PROJECT_SETTING, project),
                (LOCATION_SETTING, location),
                (DATASET_SETTING, dataset),
                (store_setting, store),
            ]
            .into_iter()
            .find(|(_, value)| value.contains('/'))
            .map_or_else(
                || Error::Config {
                    setting: store_setting,
                },
                |(setting, value)| Error::BadSetting {
                    setting,
                    value: value.to_owned(),
                },
            )
        })
    }
}

fn required<'a>(value: &'a Option<String>, setting: &'static str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Config { setting }),
    }
}
