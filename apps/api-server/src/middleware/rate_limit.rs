//! Rate limiting middleware.

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use devlink_core::ports::{IdentityProvider, RateDecision, RateLimiter};
use devlink_shared::ErrorResponse;
use futures::future::{FutureExt, LocalBoxFuture};

use crate::middleware::auth::bearer_token;
use crate::observability::RequestId;

/// Rate limiting middleware factory.
///
/// Only mutating requests are counted. The key is the authenticated user
/// when the request carries a valid token, the peer address otherwise.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Arc<dyn RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method().is_safe() {
            return self.forward(req);
        }

        let key = client_key(&req);
        match self.limiter.check(&key) {
            Ok(RateDecision::Limited { retry_after }) => {
                let retry_secs = retry_after.as_secs().max(1);
                tracing::warn!(key = %key, retry_after = retry_secs, "Rate limit exceeded");

                let mut error = ErrorResponse::too_many_requests().with_detail(format!(
                    "Rate limit exceeded. Try again in {} seconds.",
                    retry_secs
                ));
                if let Some(request_id) = req.extensions().get::<RequestId>() {
                    error = error.with_request_id(request_id.as_str());
                }

                let response = HttpResponse::TooManyRequests()
                    .insert_header(("X-RateLimit-Remaining", "0"))
                    .insert_header(("Retry-After", retry_secs.to_string()))
                    .json(error);

                let (http_req, _payload) = req.into_parts();
                let srv_response = ServiceResponse::new(http_req, response);
                async move { Ok(srv_response.map_into_right_body()) }.boxed_local()
            }
            Ok(RateDecision::Allowed) => self.forward(req),
            Err(e) => {
                tracing::error!(error = %e, "Rate limiter error, failing open");
                self.forward(req)
            }
        }
    }
}

impl<S, B> RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn forward(
        &self,
        req: ServiceRequest,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let fut = self.service.call(req);
        async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        }
        .boxed_local()
    }
}

fn client_key(req: &ServiceRequest) -> String {
    let caller = req
        .app_data::<web::Data<Arc<dyn IdentityProvider>>>()
        .and_then(|provider| {
            let token = bearer_token(req.request()).ok()??;
            provider.current_caller(Some(token)).ok()
        });

    match caller {
        Some(caller) => format!("user:{}", caller.id),
        None => format!(
            "ip:{}",
            req.connection_info().realip_remote_addr().unwrap_or("unknown")
        ),
    }
}
