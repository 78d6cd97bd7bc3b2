//! Request tracing middleware.
//!
//! Every request gets a fresh [`TraceId`] in task-local scope, runs inside a
//! `request` span carrying the method, path, and trace id, and ends with one
//! completion event recording status and latency. The id is echoed back in
//! the `trace-id` response header.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, error, info, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware factory. Wrap the outermost app with it.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use authgate::Trace;
///
/// let _app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

fn attach_header<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.response_mut()
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => error!(%error, %trace_id, "failed to encode trace identifier header"),
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let span = info_span!(
            "request",
            method = %req.method(),
            path = %req.path(),
            trace_id = %trace_id,
        );
        let started = Instant::now();

        // Extractors run inside `call`, so the scope must be entered before it.
        let fut = {
            let _entered = span.enter();
            TraceId::sync_scope(trace_id, || self.service.call(req))
        };

        Box::pin(
            TraceId::scope(trace_id, async move {
                let outcome = fut.await;
                let elapsed_ms = started.elapsed().as_millis();
                match outcome {
                    Ok(mut res) => {
                        info!(status = res.status().as_u16(), elapsed_ms, "request completed");
                        attach_header(&mut res, trace_id);
                        Ok(res)
                    }
                    Err(err) => {
                        error!(error = %err, elapsed_ms, "request failed");
                        Err(err)
                    }
                }
            })
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error as DomainError;
    use actix_web::{App, HttpResponse, test, web};

    async fn call_root<F, Fut, Res>(handler: F) -> ServiceResponse
    where
        F: Fn() -> Fut + Clone + 'static,
        Fut: std::future::Future<Output = Res> + 'static,
        Res: actix_web::Responder + 'static,
    {
        let app =
            test::init_service(App::new().wrap(Trace).route("/", web::get().to(handler))).await;
        test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await
    }

    fn header_trace_id(res: &ServiceResponse) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned()
    }

    #[actix_web::test]
    async fn every_response_carries_a_uuid_trace_id() {
        let res = call_root(|| async { HttpResponse::Ok().finish() }).await;
        let raw = header_trace_id(&res);
        assert!(raw.parse::<TraceId>().is_ok());
    }

    #[actix_web::test]
    async fn handlers_see_the_same_trace_id() {
        let res = call_root(|| async {
            let id = TraceId::current().expect("trace id in scope");
            HttpResponse::Ok().body(id.to_string())
        })
        .await;
        let trace_id = header_trace_id(&res);
        let body = test::read_body(res).await;
        assert_eq!(std::str::from_utf8(&body).expect("utf8 body"), trace_id);
    }

    #[actix_web::test]
    async fn error_bodies_carry_the_trace_id() {
        let res = call_root(|| async {
            Err::<HttpResponse, _>(DomainError::unauthorized("unauthorized"))
        })
        .await;
        let trace_id = header_trace_id(&res);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["traceId"], trace_id);
    }
}
