//! Request dispatch for the development server.
//!
//! Every request goes through one fallback handler which tries, in order:
//! the package namespace, a compiled source file, a raw source file, and the
//! static directory. Nothing is cached; each request compiles from scratch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use sprig_bundler::{BundleCapability, CompileOptions, OutputFile};
use sprig_core::Asset;
use sprig_core::asset::{content_type_for, is_compiled_source};
use percent_encoding::percent_decode_str;
use tower_http::services::ServeDir;
use tracing::{debug, warn};

use super::DevServerConfig;

/// Body of every 404 produced by the router itself.
pub const NOT_FOUND_BODY: &str = "404 - Not Found";

const JAVASCRIPT: &str = "text/javascript; charset=utf-8";

struct DevState {
    config: DevServerConfig,
    bundler: Arc<dyn BundleCapability>,
    options: CompileOptions,
}

/// Router for the development server.
pub fn dev_router(config: DevServerConfig, bundler: Arc<dyn BundleCapability>) -> Router {
    let options = CompileOptions::new(config.mode);
    let state = Arc::new(DevState {
        config,
        bundler,
        options,
    });
    Router::new().fallback(handle_request).with_state(state)
}

/// Router serving `dir` as-is.
pub fn static_router(dir: &Path) -> Router {
    Router::new().fallback_service(ServeDir::new(dir))
}

/// Normalize a request path into a path relative to a served root.
///
/// A trailing `/` maps to `index.html`; `.` and `..` segments are resolved
/// without ever climbing above the root. Returns `None` for paths that do not
/// start with `/`.
pub fn clean_request_path(path: &str) -> Option<String> {
    if !path.starts_with('/') {
        return None;
    }
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let mut cleaned = segments.join("/");
    if path.ends_with('/') {
        if !cleaned.is_empty() {
            cleaned.push('/');
        }
        cleaned.push_str("index.html");
    }
    Some(cleaned)
}

/// Percent-decode a request path. `None` if the bytes are not UTF-8.
pub fn decode_request_path(path: &str) -> Option<String> {
    percent_decode_str(path)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        NOT_FOUND_BODY,
    )
        .into_response()
}

fn compile_failed(message: impl Into<String>) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message.into(),
    )
        .into_response()
}

fn file_response(content_type: &'static str, contents: Vec<u8>) -> Response {
    let mut response = (StatusCode::OK, Body::from(contents)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

/// Exactly one compiled file, or a 503 naming what went wrong.
fn single_output(
    what: &str,
    result: sprig_bundler::Result<Vec<OutputFile>>,
) -> Result<OutputFile, Response> {
    match result {
        Ok(mut outputs) if outputs.len() == 1 => Ok(outputs.remove(0)),
        Ok(outputs) => {
            warn!(
                "[sprig-server] {} produced {} outputs, expected 1",
                what,
                outputs.len()
            );
            Err(compile_failed(format!(
                "{what} produced {} output files, expected exactly one",
                outputs.len()
            )))
        }
        Err(e) => {
            warn!("[sprig-server] failed to compile {}: {}", what, e);
            Err(compile_failed(format!("Failed to compile {what}:\n{e}")))
        }
    }
}

async fn handle_request(State(state): State<Arc<DevState>>, request: Request) -> Response {
    if request.method() != Method::GET {
        return not_found();
    }
    let Some(relative) =
        decode_request_path(request.uri().path()).and_then(|path| clean_request_path(&path))
    else {
        return not_found();
    };
    let request_path = format!("/{relative}");
    debug!("[sprig-server] GET {}", request_path);

    let namespace = &state.config.namespace;
    if namespace.contains(&request_path) {
        return match namespace.specifier_for(&request_path) {
            Ok(Some(specifier)) => serve_package(&state, &specifier).await,
            _ => not_found(),
        };
    }

    let source = state.config.source_dir.join(&relative);
    let is_file = tokio::fs::metadata(&source)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        return serve_static(&state.config.static_dir, request).await;
    }

    if is_compiled_source(&source) {
        return serve_compiled(&state, source).await;
    }

    let mut asset = Asset::new(source);
    let contents = asset.load().await.map(<[u8]>::to_vec);
    match contents {
        Ok(contents) => file_response(content_type_for(&asset.path), contents),
        Err(e) => {
            warn!("[sprig-server] {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read {relative}"),
            )
                .into_response()
        }
    }
}

async fn serve_package(state: &DevState, specifier: &str) -> Response {
    let result = state.bundler.bundle_package(specifier, &state.options).await;
    match single_output(specifier, result) {
        Ok(file) => file_response(JAVASCRIPT, file.contents),
        Err(response) => response,
    }
}

async fn serve_compiled(state: &DevState, source: PathBuf) -> Response {
    let what = source.display().to_string();
    let result = if state.config.bundle {
        state
            .bundler
            .bundle(std::slice::from_ref(&source), &state.options)
            .await
    } else {
        state
            .bundler
            .transform(&source, &state.options)
            .await
            .map(|file| vec![file])
    };
    match single_output(&what, result) {
        Ok(file) => file_response(JAVASCRIPT, file.contents),
        Err(response) => response,
    }
}

async fn serve_static(dir: &Path, request: Request) -> Response {
    match ServeDir::new(dir).try_call(request).await {
        Ok(response) => response.map(Body::new),
        Err(e) => {
            warn!("[sprig-server] failed to serve from {}: {}", dir.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read static file",
            )
                .into_response()
        }
    }
}
