//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves one static body for every path. HEAD announces the size (or omits /
//! mangles it), GET streams the body, optionally in throttled chunks.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// What HEAD reports as `Content-Length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadLength {
    Exact,
    Missing,
    Garbage,
}

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    pub head_length: HeadLength,
    /// Status line code for GET responses.
    pub get_status: u16,
    /// Send the GET body in chunks of this size with `delay` between them.
    pub throttle: Option<(usize, Duration)>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            head_length: HeadLength::Exact,
            get_status: 200,
            throttle: None,
        }
    }
}

pub struct TestServer {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub base: String,
    gets: Arc<AtomicUsize>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Number of GET requests received so far.
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

pub fn start(body: Vec<u8>) -> TestServer {
    start_with_options(body, ServerOptions::default())
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start_with_options(body: Vec<u8>, opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let gets = Arc::new(AtomicUsize::new(0));
    let gets_srv = Arc::clone(&gets);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let gets = Arc::clone(&gets_srv);
            thread::spawn(move || handle(stream, &body, opts, &gets));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        gets,
    }
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: ServerOptions, gets: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let method = request.split_whitespace().next().unwrap_or("");

    if method.eq_ignore_ascii_case("HEAD") {
        let length = match opts.head_length {
            HeadLength::Exact => format!("Content-Length: {}\r\n", body.len()),
            HeadLength::Missing => String::new(),
            HeadLength::Garbage => "Content-Length: lots\r\n".to_string(),
        };
        let response = format!(
            "HTTP/1.1 200 OK\r\n{}Content-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
            length
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if method.eq_ignore_ascii_case("GET") {
        gets.fetch_add(1, Ordering::SeqCst);
        let reason = if opts.get_status == 200 { "OK" } else { "Error" };
        let payload: &[u8] = if opts.get_status == 200 { body } else { b"nope" };
        let header = format!(
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            opts.get_status,
            reason,
            payload.len()
        );
        if stream.write_all(header.as_bytes()).is_err() {
            return;
        }
        match opts.throttle {
            None => {
                let _ = stream.write_all(payload);
            }
            Some((chunk, delay)) => {
                for (i, part) in payload.chunks(chunk.max(1)).enumerate() {
                    if i > 0 {
                        thread::sleep(delay);
                    }
                    if stream.write_all(part).is_err() {
                        return;
                    }
                    let _ = stream.flush();
                }
            }
        }
        return;
    }

    let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n");
}
