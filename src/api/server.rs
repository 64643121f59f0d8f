//! HTTP shell around the processing pipeline.
//!
//! The shell does nothing but move bytes: it accepts exactly one spreadsheet
//! per request, hands the bytes to the pipeline, and returns either a JSON
//! preview or the processed workbook as a download.
//!
//! # API Endpoints
//!
//! | Method | Path            | Description                          |
//! |--------|-----------------|--------------------------------------|
//! | GET    | `/health`       | Health check                         |
//! | POST   | `/api/upload`   | Process a report, return JSON preview|
//! | POST   | `/api/download` | Process a report, return the XLSX    |
//! | GET    | `/api/logs`     | SSE stream for real-time logs        |

use axum::{
    extract::Multipart,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::LOG_BROADCASTER;
use super::types::{error_response, UploadResponse};
use crate::pipeline::{process_bytes, ProcessOptions};
use crate::xlsx::XLSX_MIME;

/// File name offered for the processed download.
pub const DOWNLOAD_FILE_NAME: &str = "processed_data.xlsx";

/// Start the HTTP server.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/download", post(download))
        .route("/api/logs", get(sse_logs))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("caseflat server running on http://localhost:{}", port);
    println!("   POST /api/upload   - Process a report, JSON preview");
    println!("   POST /api/download - Process a report, XLSX download");
    println!("   GET  /api/logs     - SSE log stream");
    println!("   GET  /health       - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "caseflat",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "download": "POST /api/download",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming.
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Process an uploaded report and return the JSON preview.
async fn upload(multipart: Multipart) -> Result<Json<UploadResponse>, (StatusCode, Json<Value>)> {
    let bytes = file_field(multipart).await?;
    let result = process_bytes(&bytes, &ProcessOptions::default()).map_err(|e| {
        eprintln!("Processing error: {}", e);
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(error_response(&e.to_string())),
        )
    })?;

    Ok(Json(UploadResponse::from(result)))
}

/// Process an uploaded report and return the XLSX as a download.
async fn download(multipart: Multipart) -> Result<(HeaderMap, Vec<u8>), (StatusCode, Json<Value>)> {
    let bytes = file_field(multipart).await?;
    let result = process_bytes(&bytes, &ProcessOptions::default()).map_err(|e| {
        eprintln!("Processing error: {}", e);
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(error_response(&e.to_string())),
        )
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME))
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(error_response(&e.to_string())),
                )
            })?,
    );

    Ok((headers, result.xlsx))
}

/// Pull the single `file` field out of a multipart request.
async fn file_field(mut multipart: Multipart) -> Result<Vec<u8>, (StatusCode, Json<Value>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response(&format!("Multipart error: {}", e))),
        )
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(error_response(&format!("Read error: {}", e))),
                        )
                    })?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response("No file provided")),
        )
    })?;

    println!(
        "Upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    );

    Ok(bytes)
}
