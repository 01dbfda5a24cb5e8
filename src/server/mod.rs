//! Loopback HTTP control surface
//!
//! Lets a game overlay or script trigger backups and restores without
//! shelling out. The listener binds to 127.0.0.1 only.
//!
//! Design: blocking HTTP microserver, one request per connection, requests
//! handled in order on the accepting thread against the one owned `Storage`.
//!
//! # Routes
//!
//! - `GET /list` - the whole registry
//! - `GET /{game}` - one game
//! - `GET|POST /{game}/backup?note=...` - new save
//! - `GET|POST /{game}/restore/{index}` - restored save
//! - `GET|POST /{game}/delete/{id|from-to}` - `{"deleted": n, "error": ...}`

pub mod microserver;
pub mod routes;

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};

use tracing::{info, warn};

use crate::error::{SaverError, SaverResult};
use crate::storage::Storage;
use microserver::HttpResponse;

pub use routes::{route, status_for};

/// Handle one connection on any Read + Write stream
pub fn handle_connection(stream: &mut (impl Read + Write), storage: &mut Storage) {
    let req = match microserver::read_request(stream) {
        Some(Ok(req)) => req,
        Some(Err(msg)) => {
            warn!("rejected request: {}", msg);
            microserver::write_response(stream, &HttpResponse::error(400, &msg));
            return;
        }
        None => return,
    };

    info!("Request to {} {}", req.method, req.target);
    let response = route(storage, &req.method, &req.target);
    if response.status >= 400 {
        warn!("{} {} -> {}", req.method, req.target, response.status);
    }
    microserver::write_response(stream, &response);
}

/// Serve until the process is killed
pub fn serve(mut storage: Storage, port: u16) -> SaverResult<()> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr)
        .map_err(|e| SaverError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Starting Web UI at http://{}", addr);
    println!("Listening on http://{}", addr);
    println!("Press Ctrl+C to stop");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                handle_connection(&mut stream, &mut storage);
                let _ = stream.shutdown(Shutdown::Write);
            }
            Err(e) => warn!("accept error: {}", e),
        }
    }
    Ok(())
}
