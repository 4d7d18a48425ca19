use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct ProjectId(pub String);

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct Location(pub String);

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct DatasetId(pub String);

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct StoreId(pub String);

/// Fully qualified dataset name, `projects/<p>/locations/<l>/datasets/<d>`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct DatasetName(pub String);

/// Fully qualified DICOM store name,
/// `projects/<p>/locations/<l>/datasets/<d>/dicomStores/<s>`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct FullName(pub String);

impl Display for FullName {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        write!(formatter, "{}", self.0)
    }
}

/// A DICOM store inside a dataset. Every component is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreReference {
    project: ProjectId,
    location: Location,
    dataset: DatasetId,
    store: StoreId,
}

impl StoreReference {
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        dataset: impl Into<String>,
        store: impl Into<String>,
    ) -> Result<Self> {
        let (project, location, dataset, store) =
            (project.into(), location.into(), dataset.into(), store.into());

        if [&project, &location, &dataset, &store]
            .iter()
            .any(|component| component.is_empty() || component.contains('/'))
        {
            return Err(Error::BadStoreReference {
                identifier: format!(
                    "projects/{project}/locations/{location}/datasets/{dataset}/dicomStores/{store}"
                ),
            });
        }

        Ok(StoreReference {
            project: ProjectId(project),
            location: Location(location),
            dataset: DatasetId(dataset),
            store: StoreId(store),
        })
    }

    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn dataset(&self) -> &DatasetId {
        &self.dataset
    }

    pub fn store(&self) -> &StoreId {
        &self.store
    }

    pub fn dataset_name(&self) -> DatasetName {
        DatasetName(format!(
            "projects/{}/locations/{}/datasets/{}",
            self.project.0, self.location.0, self.dataset.0
        ))
    }

    pub fn full_name(&self) -> FullName {
        FullName(format!(
            "{}/dicomStores/{}",
            self.dataset_name().0,
            self.store.0
        ))
    }

    /// Another store in the same dataset.
    pub fn sibling(&self, store: impl Into<String>) -> Result<Self> {
        StoreReference::new(
            self.project.0.clone(),
            self.location.0.clone(),
            self.dataset.0.clone(),
            store,
        )
    }
}

impl Display for StoreReference {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        write!(formatter, "{}", self.full_name())
    }
}

impl FromStr for StoreReference {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        let bad_reference = || Error::BadStoreReference {
            identifier: string.into(),
        };
        match string.split('/').collect::<Vec<_>>()[..] {
            ["projects", project, "locations", location, "datasets", dataset, "dicomStores", store] => {
                StoreReference::new(project, location, dataset, store).map_err(|_| bad_reference())
            }
            _ => Err(bad_reference()),
        }
    }
}
