use log::{debug, info};
use std::time::Instant;

use super::{
    poll::{CancellationToken, PollConfig, Sleeper, ThreadSleeper},
    Error, HealthcareService, Result,
};
use crate::resources::{
    deidentify::TransformRequest,
    operation::{Operation, OperationName, OperationStatus},
};

/// Runs one de-identification from a source store into a destination store and waits for the
/// resulting long-running operation to finish.
pub struct TransformOrchestrator<ServiceT, SleeperT = ThreadSleeper> {
    service: ServiceT,
    poll_config: PollConfig,
    sleeper: SleeperT,
    cancellation: CancellationToken,
}

impl<ServiceT: HealthcareService> TransformOrchestrator<ServiceT> {
    pub fn new(service: ServiceT, poll_config: PollConfig) -> Self {
        Self {
            service,
            poll_config,
            sleeper: ThreadSleeper,
            cancellation: CancellationToken::new(),
        }
    }
}

impl<ServiceT: HealthcareService, SleeperT: Sleeper> TransformOrchestrator<ServiceT, SleeperT> {
    pub fn with_sleeper<OtherSleeperT: Sleeper>(
        self,
        sleeper: OtherSleeperT,
    ) -> TransformOrchestrator<ServiceT, OtherSleeperT> {
        TransformOrchestrator {
            service: self.service,
            poll_config: self.poll_config,
            sleeper,
            cancellation: self.cancellation,
        }
    }

    pub fn with_cancellation(self, cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            ..self
        }
    }

    /// A token which stops the poll loop before its next fetch when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Submit the request and block until the operation is done. Returns the final operation
    /// record on success.
    pub fn transform(&self, request: &TransformRequest) -> Result<Operation> {
        let source = request.source().full_name();
        let submitted = self
            .service
            .deidentify_store(request)
            .map_err(|source_error| Error::Submit {
                store: source.clone(),
                source: source_error,
            })?;
        info!(
            "Submitted de-identification of `{}` into `{}` as `{}`",
            source,
            request.destination(),
            submitted.name
        );

        let operation = self.wait(&submitted.name)?;
        info!(
            "Created de-identified store `{}` from `{}`",
            request.destination(),
            source
        );
        Ok(operation)
    }

    fn wait(&self, name: &OperationName) -> Result<Operation> {
        let started = Instant::now();
        let mut i_poll: u32 = 0;
        loop {
            if self.cancellation.is_cancelled() {
                return Err(Error::Cancelled {
                    operation: name.clone(),
                });
            }

            let operation =
                self.service
                    .get_operation(name)
                    .map_err(|source| Error::PollFailed {
                        operation: name.clone(),
                        source,
                    })?;

            match operation.status() {
                OperationStatus::Succeeded => return Ok(operation),
                OperationStatus::Failed(error) => {
                    return Err(Error::OperationFailed {
                        operation: name.clone(),
                        error,
                    })
                }
                OperationStatus::Pending => {}
            }

            let elapsed = started.elapsed();
            let mut wait = self.poll_config.wait_after(i_poll);
            if let Some(timeout) = self.poll_config.timeout {
                if elapsed >= timeout {
                    return Err(Error::DeadlineExceeded {
                        operation: name.clone(),
                        elapsed,
                    });
                }
                wait = wait.min(timeout - elapsed);
            }

            match operation.counter() {
                Some(counter) => debug!(
                    "Operation `{}` running: {} succeeded, {} failed, {} pending - polling again in {:?}",
                    name, counter.success, counter.failure, counter.pending, wait
                ),
                None => debug!("Operation `{}` running - polling again in {:?}", name, wait),
            }
            self.sleeper.sleep(wait);
            i_poll = i_poll.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        deid::fake::{failed, pending, succeeded, transport_error, FakeService, RecordingSleeper},
        resources::store::StoreReference,
    };
    use std::time::Duration;

    fn request() -> TransformRequest {
        let source = StoreReference::new("acme", "us-central1", "imaging", "raw-images").unwrap();
        TransformRequest::new(source.clone(), source.sibling("clean-images").unwrap())
    }

    #[test]
    fn test_polls_until_done() {
        for num_pending in [0, 1, 5] {
            let service = FakeService::with_polls(
                (0..num_pending)
                    .map(|_| pending())
                    .chain(std::iter::once(succeeded())),
            );
            let sleeper = RecordingSleeper::default();
            let orchestrator =
                TransformOrchestrator::new(&service, PollConfig::default()).with_sleeper(&sleeper);

            let operation = orchestrator.transform(&request()).unwrap();

            assert!(operation.done);
            assert_eq!(service.num_polls.get(), num_pending + 1);
            assert_eq!(
                *sleeper.sleeps.borrow(),
                vec![Duration::from_secs(1); num_pending]
            );
        }
    }

    #[test]
    fn test_submits_fixed_policy() {
        let service = FakeService::with_polls([succeeded()]);
        let sleeper = RecordingSleeper::default();
        TransformOrchestrator::new(&service, PollConfig::default())
            .with_sleeper(&sleeper)
            .transform(&request())
            .unwrap();

        let submitted = service.submitted.borrow();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0], request());
    }

    #[test]
    fn test_operation_error_stops_immediately() {
        let service = FakeService::with_polls([failed(3, "invalid DICOM tag"), pending()]);
        let sleeper = RecordingSleeper::default();
        let result = TransformOrchestrator::new(&service, PollConfig::default())
            .with_sleeper(&sleeper)
            .transform(&request());

        match result {
            Err(Error::OperationFailed { operation, error }) => {
                assert_eq!(operation.0, crate::deid::fake::OPERATION);
                assert_eq!(error.code, 3);
                assert_eq!(error.message, "invalid DICOM tag");
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(service.num_polls.get(), 1);
        assert!(sleeper.sleeps.borrow().is_empty());
    }

    #[test]
    fn test_submit_failure_never_polls() {
        let service = FakeService::default();
        service
            .submissions
            .borrow_mut()
            .push_back(Err(transport_error("connection refused")));
        let sleeper = RecordingSleeper::default();

        let result = TransformOrchestrator::new(&service, PollConfig::default())
            .with_sleeper(&sleeper)
            .transform(&request());

        assert!(matches!(result, Err(Error::Submit { .. })));
        assert_eq!(service.num_polls.get(), 0);
    }

    #[test]
    fn test_poll_failure_is_not_retried() {
        let service =
            FakeService::with_polls([pending(), Err(transport_error("timed out")), succeeded()]);
        let sleeper = RecordingSleeper::default();

        let result = TransformOrchestrator::new(&service, PollConfig::default())
            .with_sleeper(&sleeper)
            .transform(&request());

        assert!(matches!(result, Err(Error::PollFailed { .. })));
        assert_eq!(service.num_polls.get(), 2);
        assert_eq!(sleeper.sleeps.borrow().len(), 1);
    }

    #[test]
    fn test_cancelled_before_first_poll() {
        let service = FakeService::with_polls([succeeded()]);
        let sleeper = RecordingSleeper::default();
        let orchestrator =
            TransformOrchestrator::new(&service, PollConfig::default()).with_sleeper(&sleeper);
        orchestrator.cancellation_token().cancel();

        assert!(matches!(
            orchestrator.transform(&request()),
            Err(Error::Cancelled { .. })
        ));
        assert_eq!(service.submitted.borrow().len(), 1);
        assert_eq!(service.num_polls.get(), 0);
    }

    struct CancellingSleeper(CancellationToken);

    impl Sleeper for CancellingSleeper {
        fn sleep(&self, _duration: Duration) {
            self.0.cancel();
        }
    }

    #[test]
    fn test_cancelled_while_waiting() {
        let service = FakeService::with_polls([pending(), succeeded()]);
        let token = CancellationToken::new();
        let orchestrator = TransformOrchestrator::new(&service, PollConfig::default())
            .with_cancellation(token.clone())
            .with_sleeper(CancellingSleeper(token));

        assert!(matches!(
            orchestrator.transform(&request()),
            Err(Error::Cancelled { .. })
        ));
        assert_eq!(service.num_polls.get(), 1);
    }

    #[test]
    fn test_deadline_exceeded() {
        let service = FakeService::with_polls([pending(), succeeded()]);
        let sleeper = RecordingSleeper::default();
        let result = TransformOrchestrator::new(
            &service,
            PollConfig {
                timeout: Some(Duration::ZERO),
                ..Default::default()
            },
        )
        .with_sleeper(&sleeper)
        .transform(&request());

        assert!(matches!(result, Err(Error::DeadlineExceeded { .. })));
        assert_eq!(service.num_polls.get(), 1);
        assert!(sleeper.sleeps.borrow().is_empty());
    }

    #[test]
    fn test_backoff_between_polls() {
        let service = FakeService::with_polls([pending(), pending(), pending(), succeeded()]);
        let sleeper = RecordingSleeper::default();
        TransformOrchestrator::new(
            &service,
            PollConfig {
                interval: Duration::from_millis(250),
                backoff_factor: 2.0,
                max_interval: Some(Duration::from_millis(750)),
                timeout: None,
            },
        )
        .with_sleeper(&sleeper)
        .transform(&request())
        .unwrap();

        assert_eq!(
            *sleeper.sleeps.borrow(),
            vec![
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_millis(750)
            ]
        );
    }

    #[test]
    fn test_negative_backoff_polls_at_fixed_interval() {
        let service = FakeService::with_polls([pending(), pending(), succeeded()]);
        let sleeper = RecordingSleeper::default();
        TransformOrchestrator::new(
            &service,
            PollConfig {
                backoff_factor: -2.0,
                ..Default::default()
            },
        )
        .with_sleeper(&sleeper)
        .transform(&request())
        .unwrap();

        assert_eq!(*sleeper.sleeps.borrow(), vec![Duration::from_secs(1); 2]);
    }
}
