//! Minimal HTTP/1.1 responder for the timetable page.
//!
//! Connections are served one at a time: read the request line, look the
//! path up in the route table, render a fresh grid from the record source and
//! answer with the filled template.  Any fetch or render failure yields a
//! `500` without a partial grid.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::config::GridConfig;
use crate::page::Template;
use crate::pipeline::render_timetable;
use crate::source::RecordSource;

/// Maximum number of request bytes read per connection.
pub const REQUEST_BUFFER_SIZE: usize = 2048;

// ── Response ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::InternalServerError => "Internal Server Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub body: String,
}

impl Response {
    fn new(status: Status, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Serialise status line, headers and body.
    pub fn to_http(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: text/html; charset=UTF-8\r\nConnection: close\r\n\r\n{}",
            self.status.code(),
            self.status.reason(),
            self.body.len(),
            self.body
        )
    }
}

// ── TimetableService ──────────────────────────────────────────────────────────

/// Route table, record source and render settings for the responder.
pub struct TimetableService {
    config: GridConfig,
    source: Box<dyn RecordSource + Send + Sync>,
    routes: BTreeMap<String, Template>,
}

impl TimetableService {
    /// Load every template named in `config.template.routes`.
    ///
    /// # Errors
    /// Returns an error if a template file cannot be read.
    pub fn new(config: GridConfig, source: Box<dyn RecordSource + Send + Sync>) -> Result<Self> {
        let mut routes = BTreeMap::new();
        for (path, file) in &config.template.routes {
            let template = Template::load(file)
                .with_context(|| format!("Failed to load template for route '{path}'"))?;
            routes.insert(path.clone(), template);
        }
        info!(routes = routes.len(), "templates loaded");

        Ok(Self::with_routes(config, source, routes))
    }

    /// Build a service from already loaded templates.
    pub fn with_routes(
        config: GridConfig,
        source: Box<dyn RecordSource + Send + Sync>,
        routes: BTreeMap<String, Template>,
    ) -> Self {
        Self {
            config,
            source,
            routes,
        }
    }

    /// Produce the response for one raw request.
    pub fn respond(&self, request: &[u8]) -> Response {
        let text = String::from_utf8_lossy(request);
        let mut parts = text.lines().next().unwrap_or_default().split_whitespace();
        let method = parts.next();
        let Some(target) = parts.next() else {
            warn!(?method, "request without path");
            return Response::new(Status::BadRequest, "Bad Request");
        };
        let path = target.split('?').next().unwrap_or(target);
        debug!(?method, path, "request");

        let Some(template) = self.routes.get(path) else {
            warn!(path, "no route");
            return Response::new(Status::NotFound, "Not Found");
        };

        match self.render_page(template) {
            Ok(page) => Response::new(Status::Ok, page),
            Err(e) => {
                error!(path, "failed to render timetable: {:#}", e);
                Response::new(Status::InternalServerError, "Internal Server Error")
            }
        }
    }

    /// Fetch, render and fill `template` for one request.
    pub fn render_page(&self, template: &Template) -> Result<String> {
        let records = self.source.fetch()?;
        let grid = render_timetable(records, &self.config.render)?;
        Ok(template.fill(&self.config.template.placeholder, &grid))
    }
}

// ── Accept loop ───────────────────────────────────────────────────────────────

/// Bind the listener described by `config.server`.
pub async fn bind(config: &GridConfig) -> Result<TcpListener> {
    let addr = (config.server.host.as_str(), config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {}:{}", addr.0, addr.1))?;
    info!(addr = %listener.local_addr()?, "listening");
    Ok(listener)
}

/// Serve connections sequentially until accepting fails.
pub async fn serve(listener: TcpListener, service: TimetableService) -> Result<()> {
    loop {
        let (mut stream, peer) = listener.accept().await.context("accept failed")?;
        debug!(%peer, "connection accepted");

        if let Err(e) = handle_client(&mut stream, &service).await {
            warn!(%peer, "connection failed: {:#}", e);
        }
    }
}

async fn handle_client(stream: &mut TcpStream, service: &TimetableService) -> Result<()> {
    let mut buffer = [0u8; REQUEST_BUFFER_SIZE];
    let read = stream.read(&mut buffer).await.context("recv failed")?;

    let response = service.respond(&buffer[..read]);
    info!(status = response.status.code(), bytes = response.body.len(), "response");

    stream
        .write_all(response.to_http().as_bytes())
        .await
        .context("send failed")?;
    stream.shutdown().await.context("shutdown failed")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
