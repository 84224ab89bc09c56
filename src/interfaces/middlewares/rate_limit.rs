use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    web, Error, ResponseError,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{api_errors::ApiError, utils::get_client_ip::get_client_ip, AppState};

const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Applies the route's limiter before the handler runs. Rejected requests
/// never reach the handler.
pub struct RateLimitMiddleware;

impl<S> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in rate limit middleware");
                return service.call(req).await;
            };

            let Some(limiter) = state.limits.for_route(req.method(), req.path()) else {
                return service.call(req).await;
            };

            let client = get_client_ip(req.request(), state.config.trust_x_forwarded_for);
            let decision = limiter.check(&client);

            if !decision.allowed {
                tracing::warn!(
                    %client,
                    method = %req.method(),
                    path = %req.path(),
                    retry_after = decision.retry_after_secs(),
                    "Rate limit exceeded"
                );
                let rejection = ApiError::RateLimited {
                    retry_after: decision.retry_after_secs(),
                };
                return Ok(req.into_response(rejection.error_response()));
            }

            let mut res = service.call(req).await?;
            res.headers_mut()
                .insert(REMAINING_HEADER, HeaderValue::from(decision.remaining));
            Ok(res)
        })
    }
}
