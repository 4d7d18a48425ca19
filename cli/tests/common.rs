use once_cell::sync::Lazy;
use std::{
    ffi::OsStr,
    io::Write,
    path::PathBuf,
    process::{Command, Output, Stdio},
};
use tempfile::NamedTempFile;

const SETTINGS_ENV_VARIABLES: [&str; 6] = [
    "GCP_PROJECT",
    "GCLOUD_PROJECT_LOCATION",
    "GCLOUD_PROJECT_DATASET_ID",
    "SOURCE_DICOM_STORE",
    "DESTINATION_DICOM_STORE",
    "GOOGLE_OAUTH_ACCESS_TOKEN",
];

pub struct TestCli {
    cli_path: PathBuf,
}

impl TestCli {
    pub fn get() -> &'static Self {
        static TEST_CLI: Lazy<TestCli> = Lazy::new(|| TestCli {
            cli_path: PathBuf::from(env!("CARGO_BIN_EXE_dicom-deid")),
        });

        &TEST_CLI
    }

    /// A command talking to the mock server, with no settings inherited from the environment.
    pub fn command(&self) -> Command {
        let mut command = self.command_without_token();
        command.arg("--token").arg("test-token");
        command
    }

    /// Like `command`, but with no access token and an empty stdin.
    pub fn command_without_token(&self) -> Command {
        let mut command = Command::new(&self.cli_path);
        for name in SETTINGS_ENV_VARIABLES {
            command.env_remove(name);
        }

        command
            .env_remove("RUST_LOG")
            .stdin(Stdio::null())
            .arg("--endpoint")
            .arg(format!("{}/v1", mockito::server_url()));

        command
    }

    /// Same as `command`, with every store setting pointing at `acme/us-central1/imaging`.
    pub fn command_with_stores(&self, source_store: &str, destination_store: &str) -> Command {
        let mut command = self.command();
        command
            .env("GCP_PROJECT", "acme")
            .env("GCLOUD_PROJECT_LOCATION", "us-central1")
            .env("GCLOUD_PROJECT_DATASET_ID", "imaging")
            .env("SOURCE_DICOM_STORE", source_store)
            .env("DESTINATION_DICOM_STORE", destination_store);
        command
    }

    pub fn output(&self, command: &mut Command) -> String {
        let output = command.output().unwrap();

        if !output.status.success() {
            panic!(
                "failed to run command:\n{}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        String::from_utf8(output.stdout).unwrap()
    }

    pub fn output_error(&self, command: &mut Command) -> String {
        let output: Output = command.output().unwrap();

        if output.status.success() {
            panic!(
                "succeeded running command (expected failure):\n{}",
                String::from_utf8_lossy(&output.stdout)
            );
        }
        assert_eq!(output.status.code(), Some(1));

        String::from_utf8(output.stderr).unwrap()
    }

    pub fn run(&self, command: &mut Command, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> String {
        self.output(command.args(args))
    }

    pub fn run_and_error(
        &self,
        command: &mut Command,
        args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    ) -> String {
        self.output_error(command.args(args))
    }
}

/// A throwaway file standing in for a DICOM instance.
pub fn dicom_file(num_bytes: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let mut data = b"DICM".to_vec();
    data.resize(num_bytes, 0);
    file.write_all(&data).unwrap();
    file
}

pub fn store_path(store: &str) -> String {
    format!("/v1/projects/acme/locations/us-central1/datasets/imaging/dicomStores/{store}")
}

pub fn operation_name(id: &str) -> String {
    format!("projects/acme/locations/us-central1/datasets/imaging/operations/{id}")
}
