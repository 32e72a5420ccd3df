//! Throwaway HTTP/1.1 server for exercising the fetcher without a network.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// Minimal HTTP server: answers every connection using `respond(path)`
/// and records each request head.
pub fn serve<F>(respond: F) -> (String, Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str) -> String + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { return };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let head = String::from_utf8_lossy(&buf).to_string();
            let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
            log.lock().unwrap().push(head);
            let _ = stream.write_all(respond(&path).as_bytes());
        }
    });

    (base, seen)
}

/// A complete `Connection: close` response.
pub fn http(status: &str, headers: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n{headers}\r\n{body}",
        body.len()
    )
}

/// A listing body holding one child per URL.
pub fn listing(urls: &[&str]) -> String {
    let children: Vec<String> = urls
        .iter()
        .map(|u| format!(r#"{{"data": {{"url": "{u}"}}}}"#))
        .collect();
    format!(r#"{{"data": {{"children": [{}]}}}}"#, children.join(","))
}
