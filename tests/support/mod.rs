//! Shared test doubles for the integration suites.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use strata::{
    DataError, Deferred, DeleteDataSource, GetDataSource, PutDataSource, Query,
};

/// Test entity with a server-assignable id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<String>,
    pub name: String,
}

pub fn user(id: Option<&str>, name: &str) -> User {
    User {
        id: id.map(str::to_string),
        name: name.to_string(),
    }
}

/// Scripted response for a put invocation.
pub enum PutResponse<T> {
    /// Answer with the input value (the usual storage behavior).
    Echo,
    /// Answer with a fixed value (e.g. a server-assigned form).
    Value(T),
    Error(DataError),
}

/// Scripted data source that records every invocation into a log shared
/// across sources, so cross-source ordering can be asserted.
///
/// Responses are queued per method and consumed front-to-back; an empty
/// queue falls back to a neutral default (`NotFound` for reads, `Echo`
/// for writes, `Ok` for deletes).
pub struct MockDataSource<T> {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    get_responses: Mutex<VecDeque<Result<T, DataError>>>,
    get_all_responses: Mutex<VecDeque<Result<Vec<T>, DataError>>>,
    put_responses: Mutex<VecDeque<PutResponse<T>>>,
    delete_responses: Mutex<VecDeque<Result<(), DataError>>>,
    put_inputs: Mutex<Vec<Option<T>>>,
    put_all_inputs: Mutex<Vec<Vec<T>>>,
}

impl<T: Clone + Send + 'static> MockDataSource<T> {
    pub fn named(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(MockDataSource {
            name,
            log,
            get_responses: Mutex::new(VecDeque::new()),
            get_all_responses: Mutex::new(VecDeque::new()),
            put_responses: Mutex::new(VecDeque::new()),
            delete_responses: Mutex::new(VecDeque::new()),
            put_inputs: Mutex::new(Vec::new()),
            put_all_inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn new(name: &'static str) -> Arc<Self> {
        Self::named(name, Arc::new(Mutex::new(Vec::new())))
    }

    pub fn on_get(&self, response: Result<T, DataError>) -> &Self {
        self.get_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn on_get_all(&self, response: Result<Vec<T>, DataError>) -> &Self {
        self.get_all_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn on_put(&self, response: PutResponse<T>) -> &Self {
        self.put_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn on_delete(&self, response: Result<(), DataError>) -> &Self {
        self.delete_responses.lock().unwrap().push_back(response);
        self
    }

    /// Every call recorded so far, as `"source.method"` strings.
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// How many times `method` was invoked on this source.
    pub fn count(&self, method: &str) -> usize {
        let tag = format!("{}.{}", self.name, method);
        self.log.lock().unwrap().iter().filter(|c| **c == tag).count()
    }

    /// The values handed to `put`, in call order.
    pub fn put_inputs(&self) -> Vec<Option<T>> {
        self.put_inputs.lock().unwrap().clone()
    }

    /// The batches handed to `put_all`, in call order.
    pub fn put_all_inputs(&self) -> Vec<Vec<T>> {
        self.put_all_inputs.lock().unwrap().clone()
    }

    fn record(&self, method: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}.{}", self.name, method));
    }
}

impl<T: Clone + Send + 'static> GetDataSource<T> for MockDataSource<T> {
    fn get(&self, _query: Arc<dyn Query>) -> Deferred<T> {
        self.record("get");
        let response = self
            .get_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(DataError::NotFound));
        Deferred::of_result(response)
    }

    fn get_all(&self, _query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        self.record("get_all");
        let response = self
            .get_all_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(DataError::NotFound));
        Deferred::of_result(response)
    }
}

impl<T: Clone + Send + 'static> PutDataSource<T> for MockDataSource<T> {
    fn put(&self, value: Option<T>, _query: Arc<dyn Query>) -> Deferred<T> {
        self.record("put");
        self.put_inputs.lock().unwrap().push(value.clone());
        let response = self
            .put_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PutResponse::Echo);
        match response {
            PutResponse::Echo => match value {
                Some(value) => Deferred::of_value(value),
                None => Deferred::of_error(DataError::IllegalArgument(
                    "mock put requires a value".into(),
                )),
            },
            PutResponse::Value(value) => Deferred::of_value(value),
            PutResponse::Error(error) => Deferred::of_error(error),
        }
    }

    fn put_all(&self, values: Vec<T>, _query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        self.record("put_all");
        self.put_all_inputs.lock().unwrap().push(values.clone());
        let response = self
            .put_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PutResponse::Echo);
        match response {
            PutResponse::Echo => Deferred::of_value(values),
            PutResponse::Value(value) => Deferred::of_value(vec![value]),
            PutResponse::Error(error) => Deferred::of_error(error),
        }
    }
}

impl<T: Clone + Send + 'static> DeleteDataSource for MockDataSource<T> {
    fn delete(&self, _query: Arc<dyn Query>) -> Deferred<()> {
        self.record("delete");
        let response = self
            .delete_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()));
        Deferred::of_result(response)
    }

    fn delete_all(&self, _query: Arc<dyn Query>) -> Deferred<()> {
        self.record("delete_all");
        let response = self
            .delete_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()));
        Deferred::of_result(response)
    }
}
