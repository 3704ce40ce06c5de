use crate::page::render_index;
use crate::{AssembleError, HTML, JSON, ObserveQuery, Rendered, SnapshotService};
use jetsam_kernel::ChainReader;
use jetsam_ledger::BlockStore;
use serde_json::json;
use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// How long a connection may sit idle on a read or write.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub bind: SocketAddr,
    pub io_timeout: Duration,
}

impl HttpServerConfig {
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpServeError {
    #[error("bind failed: {0}")]
    Bind(std::io::Error),
    #[error("accept failed: {0}")]
    Accept(std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HttpResponse {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl HttpResponse {
    fn ok(rendered: Rendered) -> Self {
        Self {
            status: 200,
            content_type: rendered.content_type,
            body: rendered.body,
        }
    }

    fn error(status: u16, message: impl std::fmt::Display) -> Self {
        let body = json!({ "error": message.to_string() });
        Self {
            status,
            content_type: JSON,
            body: serde_json::to_vec(&body).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Index,
    Healthz,
    Query(ObserveQuery),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
enum RouteError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unknown route: {0}")]
    NotFound(String),
}

/// Serve the snapshot API until accepting fails. Each connection gets its
/// own thread and runs the pipeline from scratch.
pub fn serve_snapshot_api<C, S>(
    config: HttpServerConfig,
    service: &SnapshotService<C, S>,
) -> Result<(), HttpServeError>
where
    C: ChainReader + Sync,
    S: BlockStore + Sync,
{
    let listener = TcpListener::bind(config.bind).map_err(HttpServeError::Bind)?;
    info!(bind = %config.bind, address = service.address(), "listening");
    serve_listener(listener, service, config.io_timeout, None)
}

fn serve_listener<C, S>(
    listener: TcpListener,
    service: &SnapshotService<C, S>,
    io_timeout: Duration,
    max_requests: Option<usize>,
) -> Result<(), HttpServeError>
where
    C: ChainReader + Sync,
    S: BlockStore + Sync,
{
    thread::scope(|scope| {
        let mut served = 0usize;
        for stream in listener.incoming() {
            match stream {
                Ok(mut stream) => {
                    scope.spawn(move || {
                        if let Err(err) = stream
                            .set_read_timeout(Some(io_timeout))
                            .and_then(|()| stream.set_write_timeout(Some(io_timeout)))
                        {
                            warn!(error = %err, "failed to set connection timeouts");
                            return;
                        }
                        if let Err(err) = handle_connection(&mut stream, service) {
                            warn!(error = %err, "connection failed");
                            let _ = write_response(
                                &mut stream,
                                HttpResponse::error(500, format!("internal server error: {err}")),
                            );
                        }
                    });
                    served += 1;
                    if max_requests == Some(served) {
                        break;
                    }
                }
                Err(err) => return Err(HttpServeError::Accept(err)),
            }
        }
        Ok(())
    })
}

fn handle_connection<C, S>(
    stream: &mut TcpStream,
    service: &SnapshotService<C, S>,
) -> Result<(), std::io::Error>
where
    C: ChainReader,
    S: BlockStore,
{
    let (method, target) = match read_request_line(stream) {
        Ok(line) => line,
        Err(err) => return write_response(stream, HttpResponse::error(400, err)),
    };

    let response = if method != "GET" {
        HttpResponse::error(405, "method not allowed; use GET")
    } else {
        match parse_route_target(&target) {
            Ok(route) => execute_route(service, route),
            Err(err @ RouteError::NotFound(_)) => HttpResponse::error(404, err),
            Err(err @ RouteError::BadRequest(_)) => HttpResponse::error(400, err),
        }
    };

    info!(%method, %target, status = response.status, "request");
    write_response(stream, response)
}

fn read_request_line(stream: &mut TcpStream) -> Result<(String, String), RouteError> {
    let mut buf = [0u8; 8192];
    let n = stream.read(&mut buf).map_err(|e| match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => {
            RouteError::BadRequest("timed out waiting for request".to_string())
        }
        _ => RouteError::BadRequest(format!("failed to read request: {e}")),
    })?;
    if n == 0 {
        return Err(RouteError::BadRequest("empty request".to_string()));
    }
    let req = String::from_utf8_lossy(&buf[..n]);
    let line = req
        .lines()
        .next()
        .ok_or_else(|| RouteError::BadRequest("missing request line".to_string()))?;
    parse_request_line(line)
}

fn parse_request_line(line: &str) -> Result<(String, String), RouteError> {
    let mut parts = line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| RouteError::BadRequest("missing method".to_string()))?;
    let target = parts
        .next()
        .ok_or_else(|| RouteError::BadRequest("missing target".to_string()))?;
    Ok((method.to_string(), target.to_string()))
}

fn parse_route_target(target: &str) -> Result<Route, RouteError> {
    let path = match target.split_once('?') {
        Some((path, _)) => path,
        None => target,
    };

    match path {
        "/" => Ok(Route::Index),
        "/healthz" => Ok(Route::Healthz),
        "/v0/snapshot" => Ok(Route::Query(ObserveQuery::Snapshot)),
        "/v0/state" => Ok(Route::Query(ObserveQuery::State)),
        "/v0/declaration" => Ok(Route::Query(ObserveQuery::Declaration)),
        "/v0/svg" => Ok(Route::Query(ObserveQuery::Svg)),
        "/v0/logs" => Ok(Route::Query(ObserveQuery::Logs)),
        "/v0/highest_index" => Ok(Route::Query(ObserveQuery::HighestIndex)),
        _ => Err(RouteError::NotFound(path.to_string())),
    }
}

fn execute_route<C, S>(service: &SnapshotService<C, S>, route: Route) -> HttpResponse
where
    C: ChainReader,
    S: BlockStore,
{
    let result = match route {
        Route::Healthz => {
            return HttpResponse {
                status: 200,
                content_type: JSON,
                body: br#"{"ok":true}"#.to_vec(),
            };
        }
        Route::Index => index(service),
        Route::Query(query) => service.query(query),
    };

    match result {
        Ok(rendered) => HttpResponse::ok(rendered),
        Err(err) => pipeline_error_response(route, err),
    }
}

fn index<C, S>(service: &SnapshotService<C, S>) -> Result<Rendered, AssembleError>
where
    C: ChainReader,
    S: BlockStore,
{
    let snapshot = service.snapshot_json()?;
    Ok(Rendered {
        content_type: HTML,
        body: render_index(&String::from_utf8_lossy(&snapshot)).into_bytes(),
    })
}

fn pipeline_error_response(route: Route, err: AssembleError) -> HttpResponse {
    warn!(?route, error = %err, "pipeline failed");
    HttpResponse::error(500, err)
}

fn write_response(stream: &mut TcpStream, response: HttpResponse) -> std::io::Result<()> {
    let status_text = reason_phrase(response.status);
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nAccess-Control-Allow-Origin: *\r\nAccess-Control-Allow-Methods: GET\r\nConnection: close\r\n\r\n",
        response.status,
        status_text,
        response.content_type,
        response.body.len()
    );
    stream.write_all(header.as_bytes())?;
    stream.write_all(&response.body)?;
    stream.flush()
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
