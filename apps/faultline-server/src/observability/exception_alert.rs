//! Exception alert middleware - reports unhandled request errors to the
//! alerter before the error response leaves the server.

use actix_web::{
    Error, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use faultline_core::ExceptionAlerter;
use faultline_core::domain::{ExceptionContext, SourceLocation, StackFrame, TypeHierarchy};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use crate::middleware::error::AppError;

/// Errors that know how to describe themselves to the alerter.
pub trait Reportable {
    /// Type identifier matched against ignore lists.
    fn type_name(&self) -> &str;
    /// HTTP status carried by the error itself, if it is an HTTP-level error.
    fn status_code(&self) -> Option<u16>;
    fn origin(&self) -> SourceLocation;
    fn stack_frames(&self) -> Vec<StackFrame>;
}

/// Type identifier used for errors raised by the framework itself.
pub const FRAMEWORK_ERROR: &str = "FrameworkError";

/// Middleware that runs the alerter for every response carrying an error.
///
/// The alert is awaited on the request's own task; the response is returned
/// unchanged whatever the alerting outcome.
pub struct ExceptionAlertMiddleware {
    alerter: Arc<ExceptionAlerter>,
    hierarchy: Arc<TypeHierarchy>,
}

impl ExceptionAlertMiddleware {
    pub fn new(alerter: Arc<ExceptionAlerter>, hierarchy: Arc<TypeHierarchy>) -> Self {
        Self { alerter, hierarchy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ExceptionAlertMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = ExceptionAlertService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ExceptionAlertService {
            service,
            alerter: self.alerter.clone(),
            hierarchy: self.hierarchy.clone(),
        }))
    }
}

pub struct ExceptionAlertService<S> {
    service: S,
    alerter: Arc<ExceptionAlerter>,
    hierarchy: Arc<TypeHierarchy>,
}

/// Request details captured before the handler runs.
#[derive(Debug, Clone)]
struct RequestSnapshot {
    method: String,
    uri: String,
    user_agent: Option<String>,
    referer: Option<String>,
}

impl RequestSnapshot {
    fn capture(req: &HttpRequest) -> Self {
        let header_value = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };

        Self {
            method: req.method().to_string(),
            uri: req.uri().to_string(),
            user_agent: header_value(header::USER_AGENT),
            referer: header_value(header::REFERER),
        }
    }
}

impl<S, B> Service<ServiceRequest> for ExceptionAlertService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let snapshot = RequestSnapshot::capture(req.request());
        let alerter = self.alerter.clone();
        let hierarchy = self.hierarchy.clone();
        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    if let Some(err) = res.response().error() {
                        let ctx = exception_context(err, &snapshot, &hierarchy);
                        alerter.on_unhandled_exception(&ctx).await;
                    }
                    Ok(res)
                }
                Err(err) => {
                    let ctx = exception_context(&err, &snapshot, &hierarchy);
                    alerter.on_unhandled_exception(&ctx).await;
                    Err(err)
                }
            }
        })
    }
}

fn exception_context(
    err: &Error,
    request: &RequestSnapshot,
    hierarchy: &TypeHierarchy,
) -> ExceptionContext {
    let ctx = match err.as_error::<AppError>() {
        Some(app_error) => from_reportable(app_error),
        None => {
            // Framework errors (extractors, payload limits, routing) always
            // carry a status of their own.
            let status = err.as_response_error().status_code().as_u16();
            ExceptionContext::new(
                FRAMEWORK_ERROR,
                err.to_string(),
                SourceLocation::new("actix-web", 0),
            )
            .with_status(status)
        }
    };

    let lineage = hierarchy.lineage(&ctx.exception_type);
    ctx.with_lineage(lineage)
        .with_request(request.method.clone(), request.uri.clone())
        .with_user_agent(request.user_agent.clone())
        .with_referer(request.referer.clone())
}

fn from_reportable(error: &(impl Reportable + ToString)) -> ExceptionContext {
    let ctx = ExceptionContext::new(error.type_name(), error.to_string(), error.origin())
        .with_stack_frames(error.stack_frames());

    match error.status_code() {
        Some(status) => ctx.with_status(status),
        None => ctx,
    }
}
