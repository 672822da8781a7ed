// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test doubles for the Kubernetes API, external commands, and status listings.

use crate::command::{CommandOutput, CommandRunner};
use crate::error::{DeployError, Result};
use crate::readiness::StatusSource;
use crate::types::DeploymentStatusSnapshot;
use async_trait::async_trait;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(("GET".to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Build a kube Client using `default` as its namespace
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json("path", &path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock DeploymentList response from (name, replicas, available) triples
pub fn deployment_list_json(deployments: &[(&str, i32, Option<i32>)]) -> String {
    let items: Vec<_> = deployments
        .iter()
        .map(|(name, replicas, available)| {
            let mut status = serde_json::json!({ "replicas": replicas });
            if let Some(available) = available {
                status["availableReplicas"] = serde_json::json!(available);
            }
            serde_json::json!({
                "apiVersion": "apps/v1",
                "kind": "Deployment",
                "metadata": { "name": name, "namespace": "default" },
                "spec": {
                    "replicas": replicas,
                    "selector": { "matchLabels": { "app": name } },
                    "template": { "metadata": { "labels": { "app": name } } }
                },
                "status": status
            })
        })
        .collect();

    serde_json::json!({
        "apiVersion": "apps/v1",
        "kind": "DeploymentList",
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
    .to_string()
}

/// Create a `kubectl get deploy -ojson` style listing
pub fn kubectl_list_json(deployments: &[(&str, i32, i32)]) -> String {
    let items: Vec<_> = deployments
        .iter()
        .map(|(name, replicas, available)| {
            serde_json::json!({
                "apiVersion": "apps/v1",
                "kind": "Deployment",
                "metadata": { "name": name },
                "spec": { "replicas": replicas },
                "status": { "availableReplicas": available }
            })
        })
        .collect();

    serde_json::json!({ "apiVersion": "v1", "kind": "List", "items": items }).to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Shared count of calls made to a test double
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

enum Step {
    List(Vec<DeploymentStatusSnapshot>),
    Error(String),
    Hang,
}

/// A status source that replays scripted listings in order
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    repeat: Option<Vec<DeploymentStatusSnapshot>>,
    calls: CallCounter,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            repeat: None,
            calls: CallCounter::default(),
        }
    }

    pub fn then_list(self, snapshots: Vec<DeploymentStatusSnapshot>) -> Self {
        self.push(Step::List(snapshots))
    }

    pub fn then_error(self, message: &str) -> Self {
        self.push(Step::Error(message.to_string()))
    }

    /// The next listing never completes
    pub fn then_hang(self) -> Self {
        self.push(Step::Hang)
    }

    /// Listing returned once the scripted steps are used up
    pub fn repeat_list(mut self, snapshots: Vec<DeploymentStatusSnapshot>) -> Self {
        self.repeat = Some(snapshots);
        self
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    fn push(self, step: Step) -> Self {
        self.steps.lock().unwrap().push_back(step);
        self
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn list_deployments(&self) -> Result<Vec<DeploymentStatusSnapshot>> {
        self.calls.bump();

        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::List(snapshots)) => Ok(snapshots),
            Some(Step::Error(message)) => Err(DeployError::CommandFailed {
                command: "scripted listing".to_string(),
                output: message,
            }),
            Some(Step::Hang) => std::future::pending().await,
            None => Ok(self.repeat.clone().unwrap_or_default()),
        }
    }
}

/// A command runner that answers with canned outputs and records every call
#[derive(Clone, Default)]
pub struct FakeRunner {
    responses: Arc<Mutex<Vec<(Vec<String>, CommandOutput)>>>,
    invocations: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any command line starting with `prefix` (program included)
    pub fn on(self, prefix: &[&str], output: CommandOutput) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push((prefix.iter().map(|s| s.to_string()).collect(), output));
        self
    }

    /// Every command line run so far, program first
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let line: Vec<String> = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect();
        self.invocations.lock().unwrap().push(line.clone());

        let output = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::failed(format!("unexpected command: {}", line.join(" "))));

        Ok(output)
    }
}
