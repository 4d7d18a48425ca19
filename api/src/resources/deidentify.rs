use serde::{Deserialize, Serialize};

use crate::resources::store::{FullName as StoreFullName, StoreReference};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterProfile {
    MinimalKeepListProfile,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextRedactionMode {
    RedactSensitiveText,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DicomConfig {
    pub filter_profile: FilterProfile,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub text_redaction_mode: TextRedactionMode,
}

/// De-identification policy. The default keeps the minimal list of DICOM tags and redacts
/// sensitive text burnt into pixel data.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DeidentifyConfig {
    pub dicom: DicomConfig,
    pub image: ImageConfig,
}

impl Default for DeidentifyConfig {
    fn default() -> Self {
        DeidentifyConfig {
            dicom: DicomConfig {
                filter_profile: FilterProfile::MinimalKeepListProfile,
            },
            image: ImageConfig {
                text_redaction_mode: TextRedactionMode::RedactSensitiveText,
            },
        }
    }
}

/// Body of `POST {source}:deidentify`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeidentifyStoreRequest<'request> {
    pub destination_store: StoreFullName,
    pub config: &'request DeidentifyConfig,
}

/// One source to destination de-identification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    source: StoreReference,
    destination: StoreReference,
    config: DeidentifyConfig,
}

impl TransformRequest {
    pub fn new(source: StoreReference, destination: StoreReference) -> Self {
        TransformRequest {
            source,
            destination,
            config: DeidentifyConfig::default(),
        }
    }

    pub fn source(&self) -> &StoreReference {
        &self.source
    }

    pub fn destination(&self) -> &StoreReference {
        &self.destination
    }

    pub fn config(&self) -> &DeidentifyConfig {
        &self.config
    }

    pub(crate) fn to_store_request(&self) -> DeidentifyStoreRequest<'_> {
        DeidentifyStoreRequest {
            destination_store: self.destination.full_name(),
            config: &self.config,
        }
    }
}
