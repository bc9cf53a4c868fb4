//! API Gateway handler
//!
//! Logs the request, stores the posted movie (or the default one when the
//! request has no body) and answers with a fixed success message. Errors are
//! not turned into HTTP responses: they fail the invocation.

use lambda_http::http::header::{CONTENT_TYPE, USER_AGENT};
use lambda_http::request::RequestContext;
use lambda_http::{Body, Error as LambdaError, Request, RequestExt, Response};
use movies_core::{
    Config, Error, Invocation, MessageResponse, MovieItem, MovieStore, RequestDetails, Result, SecurityEvent,
    SecurityEventType, SecurityLog, WriteDetails,
};
use serde::Serialize;
use tracing::{error, info};

pub struct MovieHandler<S, L> {
    config: Config,
    store: S,
    security_log: L,
}

impl<S: MovieStore, L: SecurityLog> MovieHandler<S, L> {
    pub fn new(config: Config, store: S, security_log: L) -> Self {
        Self {
            config,
            store,
            security_log,
        }
    }

    pub async fn handle(&self, event: Request) -> std::result::Result<Response<Body>, LambdaError> {
        let invocation = invocation(&event);
        let details = request_details(&event);
        info!(
            request_id = %invocation.request_id,
            xray_trace_id = invocation.xray_trace_id.as_deref().unwrap_or(""),
            "Processing request"
        );

        match self.process(&invocation, &details, event.body()).await {
            Ok(reply) => json_response(&reply),
            Err(e) => {
                error!(
                    code = e.code(),
                    error = %e,
                    request_id = %invocation.request_id,
                    xray_trace_id = invocation.xray_trace_id.as_deref().unwrap_or(""),
                    "Invocation failed"
                );
                Err(e.into())
            }
        }
    }

    /// Run one invocation against the store
    ///
    /// Emits `api_request` before touching the body and `dynamodb_write`
    /// only after the item is stored.
    pub async fn process(&self, invocation: &Invocation, request: &RequestDetails, body: &[u8]) -> Result<MessageResponse> {
        self.record(SecurityEventType::ApiRequest, invocation, request)?;

        let table = self.config.table_name.as_str();
        info!(table = %table, "Loaded table name from environment variable TABLE_NAME");

        let (movie, default_data) = match payload(body)? {
            Some(raw) => {
                let movie = MovieItem::from_body(raw)?;
                info!(year = movie.year, title = %movie.title, id = %movie.id, "Received payload");
                (movie, false)
            }
            None => {
                info!("Received request without a payload");
                (MovieItem::default_with_new_id(), true)
            }
        };

        self.store.put_movie(table, &movie).await?;

        let mut write = WriteDetails::put_item(table, &movie.id);
        if default_data {
            write = write.with_default_data();
        }
        self.record(SecurityEventType::DynamodbWrite, invocation, &write)?;

        Ok(MessageResponse::inserted())
    }

    fn record<D: Serialize>(&self, event_type: SecurityEventType, invocation: &Invocation, details: &D) -> Result<()> {
        let event = SecurityEvent::new(event_type, invocation, details)?;
        self.security_log.record(&event);
        Ok(())
    }
}

/// The request body as text, `None` when absent or empty
fn payload(body: &[u8]) -> Result<Option<&str>> {
    let text = std::str::from_utf8(body).map_err(|e| Error::Parse(format!("body is not valid UTF-8: {}", e)))?;
    Ok(Some(text).filter(|t| !t.is_empty()))
}

fn invocation(event: &Request) -> Invocation {
    event
        .lambda_context_ref()
        .map(|ctx| Invocation {
            request_id: ctx.request_id.clone(),
            function_name: ctx.env_config.function_name.clone(),
            xray_trace_id: ctx.xray_trace_id.clone(),
        })
        .unwrap_or_default()
}

/// Method, path and caller identity of the request
///
/// REST (v1) payloads carry the caller in `requestContext.identity`, HTTP API
/// (v2) payloads in `requestContext.http`. The `User-Agent` header is used
/// when the context has no user agent.
fn request_details(event: &Request) -> RequestDetails {
    let (source_ip, user_agent) = match event.request_context_ref() {
        Some(RequestContext::ApiGatewayV1(ctx)) => (ctx.identity.source_ip.clone(), ctx.identity.user_agent.clone()),
        Some(RequestContext::ApiGatewayV2(ctx)) => (ctx.http.source_ip.clone(), ctx.http.user_agent.clone()),
        _ => (None, None),
    };

    let user_agent = user_agent.or_else(|| {
        event
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    });

    RequestDetails {
        http_method: Some(event.method().as_str().to_string()),
        path: Some(request_path(event).to_string()),
        source_ip,
        user_agent,
    }
}

/// Path as sent by the client
///
/// REST (v1) events put the stage in front of the URI path; the raw path
/// from the event does not carry it.
fn request_path(event: &Request) -> &str {
    let raw = event.raw_http_path();
    if raw.is_empty() {
        event.uri().path()
    } else {
        raw
    }
}

fn json_response(reply: &MessageResponse) -> std::result::Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(200)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(reply.to_body()?))?)
}
