use reqwest::StatusCode;
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    time::Duration,
};

use super::{HealthcareService, Sleeper};
use crate::{
    resources::{
        deidentify::TransformRequest,
        instance::StoreInstancesResponse,
        operation::{Operation, OperationError, OperationName},
        store::StoreReference,
    },
    Error, Result,
};

pub const OPERATION: &str = "projects/acme/locations/us-central1/datasets/imaging/operations/42";

pub fn pending() -> Result<Operation> {
    Ok(Operation {
        name: OperationName(OPERATION.to_owned()),
        done: false,
        error: None,
        metadata: None,
    })
}

pub fn succeeded() -> Result<Operation> {
    Ok(Operation {
        done: true,
        ..pending()?
    })
}

pub fn failed(code: i32, message: &str) -> Result<Operation> {
    Ok(Operation {
        done: true,
        error: Some(OperationError {
            code,
            message: message.to_owned(),
        }),
        ..pending()?
    })
}

pub fn transport_error(message: &str) -> Error {
    Error::Api {
        status_code: StatusCode::SERVICE_UNAVAILABLE,
        message: message.to_owned(),
    }
}

/// Scripted remote service that records every call it receives.
#[derive(Default)]
pub struct FakeService {
    pub store_responses: RefCell<VecDeque<Result<StoreInstancesResponse>>>,
    pub submissions: RefCell<VecDeque<Result<Operation>>>,
    pub polls: RefCell<VecDeque<Result<Operation>>>,

    pub stored: RefCell<Vec<(StoreReference, String, Vec<u8>)>>,
    pub submitted: RefCell<Vec<TransformRequest>>,
    pub num_polls: Cell<usize>,
}

impl FakeService {
    pub fn with_store_status(status_code: u16) -> Self {
        let service = FakeService::default();
        service
            .store_responses
            .borrow_mut()
            .push_back(Ok(StoreInstancesResponse {
                status_code: StatusCode::from_u16(status_code).unwrap(),
                body: b"{}".to_vec(),
            }));
        service
    }

    pub fn with_polls(polls: impl IntoIterator<Item = Result<Operation>>) -> Self {
        let service = FakeService::default();
        service.submissions.borrow_mut().push_back(pending());
        service.polls.borrow_mut().extend(polls);
        service
    }
}

impl HealthcareService for FakeService {
    fn store_instances(
        &self,
        store: &StoreReference,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoreInstancesResponse> {
        self.stored
            .borrow_mut()
            .push((store.clone(), content_type.to_owned(), data));
        self.store_responses
            .borrow_mut()
            .pop_front()
            .expect("unexpected store_instances call")
    }

    fn deidentify_store(&self, request: &TransformRequest) -> Result<Operation> {
        self.submitted.borrow_mut().push(request.clone());
        self.submissions
            .borrow_mut()
            .pop_front()
            .expect("unexpected deidentify_store call")
    }

    fn get_operation(&self, name: &OperationName) -> Result<Operation> {
        assert_eq!(name.0, OPERATION);
        self.num_polls.set(self.num_polls.get() + 1);
        self.polls
            .borrow_mut()
            .pop_front()
            .expect("unexpected get_operation call")
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: RefCell<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
