//! Minimal blocking HTTP/1.1 over any Read + Write stream
//!
//! Limited surface:
//! - One request per connection (no keep-alive)
//! - No chunked transfer encoding (rejected)
//! - Request bodies are read when a Content-Length is given, then ignored
//! - Header cap: 32 KiB, body cap: 64 KiB

use std::io::{Read, Write};

/// Maximum header section size (32 KiB)
const MAX_HEADER_SIZE: usize = 32 * 1024;

/// Maximum request body size (64 KiB)
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Parsed HTTP request
#[derive(Debug)]
pub struct HttpRequest {
    pub method: String,
    /// Request target as sent, including any query string
    pub target: String,
    /// Drained so the connection closes cleanly; no route reads it
    pub body: Vec<u8>,
}

/// HTTP response to write back
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A JSON response
    pub fn json(status: u16, value: &impl serde::Serialize) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    /// A JSON `{"error": message}` response
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, &serde_json::json!({ "error": message }))
    }
}

/// Reason phrase for the status codes the server uses
fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Read and parse one HTTP request from a stream
///
/// Returns None if the connection closed before any bytes arrived, and
/// Some(Err) for malformed requests.
pub fn read_request(stream: &mut impl Read) -> Option<Result<HttpRequest, String>> {
    let mut header_buf = Vec::with_capacity(1024);
    let mut byte = [0u8; 1];

    loop {
        match stream.read(&mut byte) {
            Ok(0) => {
                if header_buf.is_empty() {
                    return None;
                }
                return Some(Err("Connection closed mid-request".to_string()));
            }
            Ok(_) => {
                header_buf.push(byte[0]);
                if header_buf.len() > MAX_HEADER_SIZE {
                    return Some(Err("Headers too large".to_string()));
                }
                if header_buf.ends_with(b"\r\n\r\n") {
                    break;
                }
            }
            Err(e) => {
                if header_buf.is_empty() {
                    return None;
                }
                return Some(Err(format!("Read error: {}", e)));
            }
        }
    }

    let mut parsed_headers = [httparse::EMPTY_HEADER; 64];
    let mut req = httparse::Request::new(&mut parsed_headers);

    match req.parse(&header_buf) {
        Ok(httparse::Status::Complete(_)) => {}
        Ok(httparse::Status::Partial) => {
            return Some(Err("Incomplete HTTP request".to_string()));
        }
        Err(e) => {
            return Some(Err(format!("HTTP parse error: {}", e)));
        }
    }

    let method = req.method.unwrap_or("").to_string();
    let target = req.path.unwrap_or("/").to_string();

    let mut content_length: Option<usize> = None;
    let mut chunked = false;

    for h in req.headers.iter() {
        let name = h.name;
        let value = String::from_utf8_lossy(h.value);

        if name.eq_ignore_ascii_case("Content-Length") {
            content_length = value.trim().parse().ok();
        }
        if name.eq_ignore_ascii_case("Transfer-Encoding")
            && value.to_lowercase().contains("chunked")
        {
            chunked = true;
        }
    }

    if chunked {
        return Some(Err("Chunked transfer encoding not supported".to_string()));
    }

    let mut body = Vec::new();
    if let Some(len) = content_length {
        if len > MAX_BODY_SIZE {
            return Some(Err("Request body too large".to_string()));
        }
        if let Err(e) = stream.take(len as u64).read_to_end(&mut body) {
            return Some(Err(format!("Read error: {}", e)));
        }
    }

    Some(Ok(HttpRequest {
        method,
        target,
        body,
    }))
}

/// Write an HTTP response to a stream
///
/// Write errors are ignored; the client may already be gone.
pub fn write_response(stream: &mut impl Write, response: &HttpResponse) {
    let mut header_block = format!(
        "HTTP/1.1 {} {}\r\n",
        response.status,
        reason(response.status)
    );
    header_block.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    header_block.push_str("Connection: close\r\n");

    for (name, value) in &response.headers {
        header_block.push_str(&format!("{}: {}\r\n", name, value));
    }
    header_block.push_str("\r\n");

    let _ = stream.write_all(header_block.as_bytes());
    if !response.body.is_empty() {
        let _ = stream.write_all(&response.body);
    }
    let _ = stream.flush();
}
