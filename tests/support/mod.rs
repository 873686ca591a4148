//! Scripted transport shared by the integration suites.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use oraclewire_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, OracleConfig, OraclePipeline,
};
use serde_json::Value;

pub enum Scripted {
    Respond(HttpResponse),
    Fail(HttpError),
    Stall(Duration),
}

/// Replays scripted outcomes in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedHttpClient {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn replying(body: Value) -> Arc<Self> {
        let client = Self::new();
        client.push(Scripted::Respond(HttpResponse::ok_json(body.to_string())));
        client
    }

    pub fn push(&self, outcome: Scripted) {
        self.script.lock().expect("script lock").push_back(outcome);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    pub fn only_request(&self) -> HttpRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().expect("one request")
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("requests lock").push(request);
        let next = self.script.lock().expect("script lock").pop_front();
        Box::pin(async move {
            match next {
                Some(Scripted::Respond(response)) => Ok(response),
                Some(Scripted::Fail(error)) => Err(error),
                Some(Scripted::Stall(delay)) => {
                    tokio::time::sleep(delay).await;
                    Err(HttpError::new("stalled transport gave up"))
                }
                None => Err(HttpError::new("no scripted response left")),
            }
        })
    }
}

pub fn config() -> OracleConfig {
    OracleConfig::new("test-key").expect("valid config")
}

pub fn dedicated(client: &Arc<ScriptedHttpClient>) -> OraclePipeline {
    OraclePipeline::new(config(), client.clone())
}

pub fn generalized(client: &Arc<ScriptedHttpClient>) -> OraclePipeline {
    OraclePipeline::generalized(config(), client.clone())
}

/// `{ "success": true, "data": [record] }`
pub fn records(data: Value) -> Value {
    serde_json::json!({ "success": true, "message": "ok", "data": data })
}

pub fn wei(decimal: &str) -> oraclewire_core::U256 {
    oraclewire_core::U256::from_dec_str(decimal).expect("decimal literal")
}
