#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::time::Duration;
use wsdyn_core::{InvocationRequest, Transport, TransportError};

type Handler = Box<dyn Fn(&InvocationRequest) -> Result<Value, TransportError> + Send + Sync>;

// An in-process transport that records every request it receives
// and answers through a configurable handler.
pub struct MockTransport {
    calls: Mutex<Vec<InvocationRequest>>,
    delay: Option<Duration>,
    handler: Handler,
}

impl MockTransport {
    pub fn new(
        handler: impl Fn(&InvocationRequest) -> Result<Value, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            delay: None,
            handler: Box::new(handler),
        }
    }

    /// Sums every integer argument.
    pub fn summing() -> Self {
        Self::new(|request| {
            let sum: i64 = request
                .arguments
                .iter()
                .filter_map(|(_, value)| value.as_i64())
                .sum();
            Ok(json!(sum))
        })
    }

    /// Always answers with `value`.
    pub fn returning(value: Value) -> Self {
        Self::new(move |_| Ok(value.clone()))
    }

    /// Answers with the first argument.
    pub fn echo() -> Self {
        Self::new(|request| {
            Ok(request
                .arguments
                .first()
                .map(|(_, value)| value.clone())
                .unwrap_or(Value::Null))
        })
    }

    pub fn failing(make_error: impl Fn() -> TransportError + Send + Sync + 'static) -> Self {
        Self::new(move |_| Err(make_error()))
    }

    /// Waits `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<InvocationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn perform_call(&self, request: InvocationRequest) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(&request)
    }
}

// Bounds a slow transport, reporting the elapsed deadline as a timeout.
pub struct Deadline<T> {
    pub inner: T,
    pub timeout: Duration,
}

#[async_trait]
impl<T: Transport> Transport for Deadline<T> {
    async fn perform_call(&self, request: InvocationRequest) -> Result<Value, TransportError> {
        tokio::time::timeout(self.timeout, self.inner.perform_call(request))
            .await
            .map_err(|_| TransportError::Timeout)?
    }
}
