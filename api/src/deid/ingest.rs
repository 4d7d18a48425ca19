use log::{debug, info};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{Error, HealthcareService, Result, Settings};
use crate::resources::{
    instance::{StoreInstancesResponse, DICOM_CONTENT_TYPE},
    store::StoreReference,
};

/// A DICOM file the store accepted.
#[derive(Debug, Clone)]
pub struct Uploaded {
    pub store: StoreReference,
    pub path: PathBuf,
    pub num_bytes: usize,
    pub response: StoreInstancesResponse,
}

impl Uploaded {
    /// The store's response as a DICOM JSON tag tree, for display only.
    pub fn response_json(&self) -> Option<Value> {
        self.response.json_body()
    }
}

/// Uploads single DICOM files into the configured source store.
pub struct Ingestor<ServiceT> {
    service: ServiceT,
    settings: Settings,
}

impl<ServiceT: HealthcareService> Ingestor<ServiceT> {
    pub fn new(service: ServiceT, settings: Settings) -> Self {
        Self { service, settings }
    }

    /// Store the file at `file_path` in the source store. The store must be configured before
    /// the file is read.
    pub fn upload(&self, file_path: impl AsRef<Path>) -> Result<Uploaded> {
        let store = self.settings.source_store()?;
        self.upload_to(&store, file_path)
    }

    pub fn upload_to(&self, store: &StoreReference, file_path: impl AsRef<Path>) -> Result<Uploaded> {
        let path = file_path.as_ref();
        let data = fs::read(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        let num_bytes = data.len();
        debug!(
            "Storing `{}` ({} bytes) in `{}`",
            path.display(),
            num_bytes,
            store
        );

        let response = self
            .service
            .store_instances(store, DICOM_CONTENT_TYPE, data)
            .map_err(|source| Error::RemoteCall {
                store: store.full_name(),
                source,
            })?;

        if response.status_code.as_u16() >= 300 {
            return Err(Error::RemoteRejected {
                store: store.full_name(),
                status_code: response.status_code,
                status_text: response.status_text().to_owned(),
                body: response.body,
            });
        }

        info!("Stored `{}` in `{}`", path.display(), store);
        Ok(Uploaded {
            store: store.clone(),
            path: path.to_owned(),
            num_bytes,
            response,
        })
    }
}
