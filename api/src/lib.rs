#![deny(clippy::all)]
mod error;
pub mod deid;
pub mod resources;

use http::Method;
use log::debug;
use once_cell::sync::Lazy;
use reqwest::{
    blocking::{Client as HttpClient, RequestBuilder, Response as HttpResponse},
    header::{self, HeaderMap, HeaderValue},
    redirect::Policy as RedirectPolicy,
    Proxy,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::resources::into_result;

pub use http::StatusCode;

pub use crate::{
    error::{Error, Result},
    resources::{
        deidentify::{
            DeidentifyConfig, DicomConfig, FilterProfile, ImageConfig, TextRedactionMode,
            TransformRequest,
        },
        instance::{StoreInstancesResponse, DICOM_CONTENT_TYPE, DICOM_JSON_CONTENT_TYPE},
        operation::{
            Operation, OperationError, OperationMetadata, OperationName, OperationStatus,
            ProgressCounter,
        },
        store::{
            DatasetId, DatasetName, FullName as StoreFullName, Location, ProjectId, StoreId,
            StoreReference,
        },
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token(pub String);

pub struct Config {
    pub endpoint: Url,
    pub token: Token,
    pub accept_invalid_certificates: bool,
    pub proxy: Option<Url>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.clone(),
            token: Token("".to_owned()),
            accept_invalid_certificates: false,
            proxy: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
        }
    }
}

#[derive(Debug)]
pub struct Client {
    endpoints: Endpoints,
    http_client: HttpClient,
    headers: HeaderMap,
}

impl Client {
    /// Create a new API client.
    pub fn new(config: Config) -> Result<Client> {
        let http_client = build_http_client(&config)?;
        let headers = build_headers(&config)?;
        let endpoints = Endpoints::new(config.endpoint)?;
        Ok(Client {
            endpoints,
            http_client,
            headers,
        })
    }

    /// Store a single DICOM instance (STOW-RS). The response is returned whatever its status.
    pub fn store_instances(
        &self,
        store: &StoreReference,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoreInstancesResponse> {
        let url = self.endpoints.store_instances(store)?;
        debug!("Attempting POST `{}` ({} bytes)", url, data.len());

        let http_response = self
            .request(Method::POST, url)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::ACCEPT, DICOM_JSON_CONTENT_TYPE)
            .body(data)
            .send()
            .map_err(|source| Error::ReqwestError {
                source,
                message: "POST operation failed.".to_owned(),
            })?;

        let status_code = http_response.status();
        let body = read_body(http_response)?;
        Ok(StoreInstancesResponse { status_code, body })
    }

    /// Start de-identifying every instance of the source store into the destination store.
    pub fn deidentify_store(&self, request: &TransformRequest) -> Result<Operation> {
        self.post(
            self.endpoints.deidentify(request.source())?,
            request.to_store_request(),
        )
    }

    /// Fetch the current record of a long-running operation.
    pub fn get_operation(&self, name: &OperationName) -> Result<Operation> {
        self.get(self.endpoints.operation(name)?)
    }

    fn get<SuccessT>(&self, url: Url) -> Result<SuccessT>
    where
        for<'de> SuccessT: Deserialize<'de>,
    {
        self.json_request(Method::GET, url, None::<()>)
    }

    fn post<RequestT, SuccessT>(&self, url: Url, body: RequestT) -> Result<SuccessT>
    where
        RequestT: Serialize,
        for<'de> SuccessT: Deserialize<'de>,
    {
        self.json_request(Method::POST, url, Some(body))
    }

    fn json_request<RequestT, SuccessT>(
        &self,
        method: Method,
        url: Url,
        body: Option<RequestT>,
    ) -> Result<SuccessT>
    where
        RequestT: Serialize,
        for<'de> SuccessT: Deserialize<'de>,
    {
        debug!("Attempting {} `{}`", method, url);
        let request = self.request(method.clone(), url);
        let request = match &body {
            Some(body) => request.json(body),
            None => request,
        };
        let http_response = request.send().map_err(|source| Error::ReqwestError {
            source,
            message: format!("{method} operation failed."),
        })?;

        let status = http_response.status();
        let body = read_body(http_response)?;
        into_result(status, &body)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .headers(self.headers.clone())
    }
}

fn read_body(http_response: HttpResponse) -> Result<Vec<u8>> {
    let status: StatusCode = http_response.status();
    http_response
        .bytes()
        .map(|bytes| bytes.to_vec())
        .map_err(|source| Error::ReqwestError {
            source,
            message: format!("Could not read response body ({status})."),
        })
}

#[derive(Debug)]
struct Endpoints {
    base: Url,
}

fn construct_endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut endpoint = base.clone();

    let mut endpoint_segments = endpoint
        .path_segments_mut()
        .map_err(|_| Error::BadEndpoint {
            endpoint: base.clone(),
        })?;

    endpoint_segments.pop_if_empty();
    for segment in segments {
        endpoint_segments.push(segment);
    }

    drop(endpoint_segments);

    Ok(endpoint)
}

fn resource_segments(name: &str) -> Vec<&str> {
    name.split('/').filter(|segment| !segment.is_empty()).collect()
}

impl Endpoints {
    pub fn new(base: Url) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(Error::BadEndpoint { endpoint: base });
        }
        Ok(Endpoints { base })
    }

    fn store_instances(&self, store: &StoreReference) -> Result<Url> {
        let full_name = store.full_name();
        let mut segments = resource_segments(&full_name.0);
        segments.extend(["dicomWeb", "studies"]);
        construct_endpoint(&self.base, &segments)
    }

    fn deidentify(&self, source: &StoreReference) -> Result<Url> {
        let dataset_name = source.dataset_name();
        let deidentify = format!("{}:deidentify", source.store().0);
        let mut segments = resource_segments(&dataset_name.0);
        segments.extend(["dicomStores", deidentify.as_str()]);
        construct_endpoint(&self.base, &segments)
    }

    fn operation(&self, name: &OperationName) -> Result<Url> {
        let segments = resource_segments(&name.0);
        if segments.is_empty() {
            return Err(Error::BadOperationName {
                name: name.0.clone(),
            });
        }
        construct_endpoint(&self.base, &segments)
    }
}

const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 120;

fn build_http_client(config: &Config) -> Result<HttpClient> {
    let mut builder = HttpClient::builder()
        .gzip(true)
        .redirect(RedirectPolicy::none())
        .danger_accept_invalid_certs(config.accept_invalid_certificates)
        .timeout(Some(config.timeout));

    if let Some(proxy) = config.proxy.clone() {
        builder = builder.proxy(Proxy::all(proxy).map_err(Error::BuildHttpClient)?);
    }
    builder.build().map_err(Error::BuildHttpClient)
}

fn build_headers(config: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", &config.token.0)).map_err(|_| {
            Error::BadToken {
                token: config.token.0.clone(),
            }
        })?,
    );
    Ok(headers)
}

pub static DEFAULT_ENDPOINT: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://healthcare.googleapis.com/v1").expect("Default URL is well-formed")
});
