use axum::{body::Body, http::Request, response::Response};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt, Tracer},
    Context, KeyValue,
};
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context as TaskContext, Poll},
};
use tower::{Layer, Service};

use crate::auth::jwt::Claims;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Keep the LoggerProvider alive for the process lifetime.
static LOGGER_PROVIDER: OnceLock<opentelemetry_sdk::logs::SdkLoggerProvider> = OnceLock::new();

/// Runtime for the gRPC exporters. Tonic's lazy connect spawns onto the
/// ambient tokio runtime, which may not be entered when `dioxus::serve`
/// calls the init closure.
static OTEL_RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

/// Endpoint settings shared by the span and log exporters.
struct ExportTarget {
    endpoint: String,
    tls: bool,
}

impl ExportTarget {
    fn from_env() -> Option<Self> {
        let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|e| !e.is_empty())?;
        Some(Self {
            tls: endpoint.starts_with("https://"),
            endpoint,
        })
    }

    fn apply<B: WithExportConfig + WithTonicConfig>(&self, builder: B) -> B {
        let builder = builder.with_endpoint(&self.endpoint);
        if self.tls {
            builder.with_tls_config(
                opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new()
                    .with_native_roots(),
            )
        } else {
            builder
        }
    }
}

/// Set up OTLP export of HTTP spans and `log` records.
///
/// Dioxus owns the `tracing` subscriber; this only registers the global
/// tracer provider used by [`OtelTraceLayer`] and bridges the `log` crate.
///
/// Environment:
///   - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector gRPC address; export is
///     skipped when unset
///   - `OTEL_SERVICE_NAME`: service name (default `sitebook`)
///   - `DEPLOY_ENV`: deployment environment (default `development`)
pub fn init_telemetry() {
    let _ = dotenvy::dotenv();

    let Some(target) = ExportTarget::from_env() else {
        tracing::info!("OTEL_EXPORTER_OTLP_ENDPOINT not set, skipping OTLP telemetry");
        return;
    };

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "sitebook".to_string());
    let environment = std::env::var("DEPLOY_ENV").unwrap_or_else(|_| "development".to_string());

    if OTEL_RUNTIME.get().is_some() {
        tracing::warn!("telemetry already initialized");
        return;
    }
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(1)
        .build()
    {
        Ok(rt) => OTEL_RUNTIME.get_or_init(|| rt),
        Err(e) => {
            tracing::error!(error = %e, "failed to start telemetry runtime");
            return;
        }
    };
    let _guard = rt.enter();

    let span_exporter = match target
        .apply(opentelemetry_otlp::SpanExporter::builder().with_tonic())
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing::error!(error = %e, "failed to create OTLP span exporter");
            return;
        }
    };

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name)
        .with_attribute(KeyValue::new("service.version", APP_VERSION))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(provider);

    let log_exporter = match target
        .apply(opentelemetry_otlp::LogExporter::builder().with_tonic())
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing::error!(error = %e, "failed to create OTLP log exporter");
            return;
        }
    };

    let logger_provider = LOGGER_PROVIDER.get_or_init(|| {
        opentelemetry_sdk::logs::SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .with_resource(resource)
            .build()
    });

    let bridge = opentelemetry_appender_log::OpenTelemetryLogBridge::new(logger_provider);
    match log::set_boxed_logger(Box::new(bridge)) {
        Ok(()) => log::set_max_level(log::LevelFilter::Info),
        Err(_) => tracing::warn!("log bridge skipped, a logger is already installed"),
    }

    log::info!("telemetry initialized v{APP_VERSION}, exporting to {}", target.endpoint);
}

/// Low-cardinality span name for a request path: UUID and numeric segments
/// become `{id}`. Returns the project id when the path addresses one.
fn route_template(path: &str) -> (String, Option<String>) {
    let mut project_id = None;
    let mut previous = "";
    let segments: Vec<String> = path
        .split('/')
        .map(|segment| {
            let is_id = uuid::Uuid::parse_str(segment).is_ok()
                || (!segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()));
            let templated = if is_id {
                if previous == "projects" && project_id.is_none() {
                    project_id = Some(segment.to_string());
                }
                "{id}".to_string()
            } else {
                segment.to_string()
            };
            previous = segment;
            templated
        })
        .collect();
    (segments.join("/"), project_id)
}

/// Tower layer that creates an OpenTelemetry span for each HTTP request.
///
/// Records method, templated route, request ID, response status, the
/// authenticated user (if any) and the addressed project id.
#[derive(Clone)]
pub struct OtelTraceLayer;

impl<S> Layer<S> for OtelTraceLayer {
    type Service = OtelTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelTraceService { inner }
    }
}

#[derive(Clone)]
pub struct OtelTraceService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for OtelTraceService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracer = global::tracer("sitebook");
        let method = req.method().to_string();
        let (route, project_id) = route_template(req.uri().path());

        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let mut attributes = vec![
            KeyValue::new("http.method", method.clone()),
            KeyValue::new("http.route", route.clone()),
            KeyValue::new("http.request_id", request_id),
        ];
        if let Some(id) = project_id {
            attributes.push(KeyValue::new("project.id", id));
        }
        match req.extensions().get::<Claims>() {
            Some(claims) => attributes.extend([
                KeyValue::new("user.id", claims.sub),
                KeyValue::new("user.platform_role", claims.role.clone()),
                KeyValue::new("auth.status", "authenticated"),
            ]),
            None => attributes.push(KeyValue::new("auth.status", "anonymous")),
        }

        let span = tracer
            .span_builder(format!("{method} {route}"))
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        let cx = Context::current_with_span(span);
        let mut inner = self.inner.clone();

        let guard = cx.clone().attach();
        let future = inner.call(req);
        drop(guard);

        Box::pin(async move {
            let response = future.await?;

            let span = cx.span();
            let status = response.status();
            span.set_attribute(KeyValue::new("http.status_code", status.as_u16() as i64));

            if status.is_server_error() {
                span.set_status(opentelemetry::trace::Status::error(status.to_string()));
            } else if status.is_client_error() {
                span.set_attribute(KeyValue::new("error.type", "client_error"));
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_paths_are_templated() {
        let id = "6f1c2b1e-9a3d-4c55-8b7e-0d2f4a6c8e10";
        let (route, project) = route_template(&format!("/api/projects/{id}/members/42"));
        assert_eq!(route, "/api/projects/{id}/members/{id}");
        assert_eq!(project.as_deref(), Some(id));
    }

    #[test]
    fn static_paths_are_unchanged() {
        let (route, project) = route_template("/api/roles");
        assert_eq!(route, "/api/roles");
        assert_eq!(project, None);
        assert_eq!(route_template("/").0, "/");
    }

    #[test]
    fn non_project_ids_are_not_reported_as_projects() {
        let (route, project) = route_template("/api/users/17");
        assert_eq!(route, "/api/users/{id}");
        assert_eq!(project, None);
    }
}
