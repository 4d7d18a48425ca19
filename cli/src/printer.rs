use anyhow::{anyhow, Context, Error, Result};
use colored::Colorize;
use healthcare_client::{deid::Uploaded, Operation};
use serde_json::Value;
use std::{
    io::{self, Write},
    str::FromStr,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        if string == "pretty" {
            Ok(OutputFormat::Pretty)
        } else if string == "json" {
            Ok(OutputFormat::Json)
        } else {
            Err(anyhow!("{}", string))
        }
    }
}

pub struct Printer {
    output: OutputFormat,
}

impl Printer {
    pub fn new(output: OutputFormat) -> Self {
        Self { output }
    }

    /// Print what the store returned for an accepted instance: the DICOM JSON tag tree if the
    /// body is one, the raw body otherwise.
    pub fn print_uploaded(&self, uploaded: &Uploaded) -> Result<()> {
        self.write_uploaded(uploaded, io::stdout().lock())
    }

    pub fn print_operation(&self, operation: &Operation) -> Result<()> {
        let value = serde_json::to_value(operation).context("Could not serialise operation.")?;
        self.write_json(&value, io::stdout().lock())
    }

    fn write_uploaded(&self, uploaded: &Uploaded, mut writer: impl Write) -> Result<()> {
        match uploaded.response_json() {
            Some(value) => self.write_json(&value, writer),
            None if uploaded.response.body.is_empty() => Ok(()),
            None => {
                let body = String::from_utf8_lossy(&uploaded.response.body);
                let body = match self.output {
                    OutputFormat::Pretty => body.dimmed().to_string(),
                    OutputFormat::Json => body.into_owned(),
                };
                writeln!(writer, "{body}").context("Failed to write store response.")
            }
        }
    }

    fn write_json(&self, value: &Value, mut writer: impl Write) -> Result<()> {
        match self.output {
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut writer, value),
            OutputFormat::Json => serde_json::to_writer(&mut writer, value),
        }
        .context("Could not serialise response.")
        .and_then(|_| writeln!(writer).context("Failed to write JSON response to writer."))
    }
}
