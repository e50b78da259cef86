//! Per-client token-bucket rate limiting for the public lookup API.
//!
//! Buckets live in a `DashMap` keyed by the proxy-supplied client IP; a
//! request with no client header passes through unlimited (direct local
//! traffic, probes). Refill is continuous at `rate_per_sec` up to `burst`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use dashmap::DashMap;
use tower::{Layer, Service};
use tracing::debug;

const CLIENT_HEADER: &str = "x-forwarded-for";

#[derive(Clone)]
pub struct RateLimitLayer {
    limits: Arc<Limits>,
}

impl RateLimitLayer {
    pub fn new(rate_per_sec: u32, burst: u32) -> Self {
        Self {
            limits: Arc::new(Limits {
                rate_per_sec: f64::from(rate_per_sec),
                burst: f64::from(burst),
                buckets: DashMap::new(),
            }),
        }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimit<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimit {
            inner,
            limits: Arc::clone(&self.limits),
        }
    }
}

#[derive(Clone)]
pub struct RateLimit<S> {
    inner: S,
    limits: Arc<Limits>,
}

struct Limits {
    rate_per_sec: f64,
    burst: f64,
    buckets: DashMap<String, Bucket>,
}

struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

impl Limits {
    /// Take one token from the client's bucket, refilling for elapsed time
    /// first. Returns `false` when the bucket is dry.
    fn try_take(&self, client: &str) -> bool {
        let mut bucket = self.buckets.entry(client.to_string()).or_insert(Bucket {
            tokens: self.burst,
            refilled_at: Instant::now(),
        });
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(bucket.refilled_at).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec).min(self.burst);
        bucket.refilled_at = now;
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

impl<S, B> Service<Request<B>> for RateLimit<S>
where
    S: Service<Request<B>, Response = Response<Body>> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let client = req
            .headers()
            .get(CLIENT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|ip| ip.trim().to_string());

        if let Some(client) = client
            && !self.limits.try_take(&client)
        {
            debug!("rate limited {client}");
            return Box::pin(async move {
                Ok(Response::builder()
                    .status(StatusCode::TOO_MANY_REQUESTS)
                    .body(Body::from("rate limited"))
                    .unwrap())
            });
        }

        let fut = self.inner.call(req);
        Box::pin(fut)
    }
}
