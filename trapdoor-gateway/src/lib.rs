//! Thin HTTP binding for the invocation bridge.
//!
//! Two routes: `POST /trapdoor/invoke` carrying the wire-named request
//! body and `GET /trapdoor/components` listing registered identifiers.
//! Captured invocation failures come back as HTTP 200 with a structured
//! error body (the method ran; its failure is the payload); everything
//! rejected before the method ran is a 400.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing_subscriber::EnvFilter;
use trapdoor::{
    bind, Component, InvocationBridge, InvocationRequest, InvocationResponse, MethodDescriptor,
    ParamSpec, StaticRegistry, TypeTag,
};

/// Installs the process-wide subscriber. The default `fmt` subscriber
/// already bridges the core library's `log` records, so no separate
/// logger is registered here.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
}

pub fn router(bridge: Arc<InvocationBridge>) -> Router {
    Router::new()
        .route("/trapdoor/invoke", post(invoke))
        .route("/trapdoor/components", get(components))
        .with_state(bridge)
}

async fn invoke(
    State(bridge): State<Arc<InvocationBridge>>,
    Json(request): Json<InvocationRequest>,
) -> (StatusCode, Json<InvocationResponse>) {
    tracing::debug!(component = %request.target, method = %request.method, "invoke");
    match bridge.invoke(request).await {
        Ok(outcome) => (StatusCode::OK, Json(InvocationResponse::ok(outcome))),
        Err(err) => {
            let status = if err.is_pre_invocation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::OK
            };
            (status, Json(InvocationResponse::err(&err)))
        }
    }
}

async fn components(State(bridge): State<Arc<InvocationBridge>>) -> Json<Vec<String>> {
    Json(bridge.identifiers())
}

/// Small standalone registry so the gateway binary can run and be poked
/// at without a hosting application.
pub fn demo_registry() -> StaticRegistry {
    let clock = Component::builder("demo.clock.ClockService")
        .method(
            MethodDescriptor::public("now")
                .returns("String")
                .bind(|_| bind::value(&chrono::Utc::now().to_rfc3339())),
        )
        .method(
            MethodDescriptor::private("epochSeconds")
                .returns("Long")
                .bind(|_| bind::value(&chrono::Utc::now().timestamp())),
        )
        .build();

    let echo = Component::builder("demo.echo.EchoService")
        .method(
            MethodDescriptor::public("echo")
                .param(ParamSpec::required("message", "String", TypeTag::Text))
                .returns("String")
                .bind(|args| {
                    let message: String = bind::arg(&args, 0, "String")?;
                    bind::value(&message)
                }),
        )
        .method(
            MethodDescriptor::public("fail")
                .param(ParamSpec::required("reason", "String", TypeTag::Text))
                .returns("String")
                .bind(|args| {
                    let reason: String = bind::arg(&args, 0, "String")?;
                    Err(bind::fault_with("IllegalStateException", reason))
                }),
        )
        .method(
            MethodDescriptor::public("repeat")
                .param(ParamSpec::required("message", "String", TypeTag::Text))
                .param(ParamSpec::required("times", "Integer", TypeTag::Int))
                .returns("String")
                .bind(|args| {
                    let message: String = bind::arg(&args, 0, "String")?;
                    let times: usize = bind::arg(&args, 1, "Integer")?;
                    bind::value(&message.repeat(times))
                }),
        )
        .build();

    StaticRegistry::builder()
        .component(clock)
        .component(echo)
        .build()
}
