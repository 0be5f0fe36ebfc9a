use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::config::ServeConfig;

/// Headers appended to every response so pages opened from another origin
/// can fetch the served files.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, OPTIONS"),
    ("Access-Control-Allow-Headers", "*"),
];

const INDEX_FILE: &str = "index.html";

// ---------------------------------------------------------------------------
// Reply – transport-independent response
// ---------------------------------------------------------------------------

/// What to send back for one request, before HTTP framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    /// Redirect target for `301`.
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl Reply {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type),
            location: None,
            body,
        }
    }

    fn status(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: Some("text/plain; charset=utf-8"),
            location: None,
            body: message.as_bytes().to_vec(),
        }
    }

    fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            location: None,
            body: Vec::new(),
        }
    }

    fn redirect(location: String) -> Self {
        Self {
            status: 301,
            content_type: None,
            location: Some(location),
            body: Vec::new(),
        }
    }

    /// Frame as a tiny_http response, CORS headers included.
    pub fn into_response(self) -> Result<Response<Cursor<Vec<u8>>>> {
        let mut response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        if let Some(ct) = self.content_type {
            response.add_header(header("Content-Type", ct)?);
        }
        if let Some(location) = &self.location {
            response.add_header(header("Location", location)?);
        }
        for (name, value) in CORS_HEADERS {
            response.add_header(header(name, value)?);
        }
        Ok(response)
    }
}

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| anyhow!("invalid header {name}: {value:?}"))
}

// ---------------------------------------------------------------------------
// Request handling
// ---------------------------------------------------------------------------

/// Decide the reply for `method url` against the files under `root`.
pub fn respond(root: &Path, method: &Method, url: &str) -> Reply {
    match method {
        Method::Get | Method::Head => serve_path(root, url),
        Method::Options => Reply::empty(204),
        _ => Reply::status(501, "Unsupported method"),
    }
}

fn serve_path(root: &Path, url: &str) -> Reply {
    let url_path = url.split(['?', '#']).next().unwrap_or("/");
    let Some(decoded) = percent_decode(url_path) else {
        return Reply::status(400, "Bad request path");
    };

    let mut path = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Reply::status(403, "Forbidden"),
            s if s.contains(['\\', '\0']) => return Reply::status(400, "Bad request path"),
            s => path.push(s),
        }
    }

    if path.is_dir() {
        if !url_path.ends_with('/') {
            return Reply::redirect(format!("{url_path}/"));
        }
        let index = path.join(INDEX_FILE);
        if index.is_file() {
            return read_file(&index);
        }
        return match directory_listing(&path, &decoded) {
            Ok(html) => Reply::ok("text/html; charset=utf-8", html.into_bytes()),
            Err(e) => io_failure(&e),
        };
    }

    read_file(&path)
}

fn read_file(path: &Path) -> Reply {
    match std::fs::read(path) {
        Ok(body) => Reply::ok(content_type_for(path), body),
        Err(e) => io_failure(&e),
    }
}

fn io_failure(e: &std::io::Error) -> Reply {
    match e.kind() {
        ErrorKind::NotFound => Reply::status(404, "File not found"),
        ErrorKind::PermissionDenied => Reply::status(403, "Forbidden"),
        _ => Reply::status(500, "Internal server error"),
    }
}

/// Decode `%XX` escapes. `None` on malformed escapes or non-UTF-8 output.
pub fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn percent_encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn directory_listing(dir: &Path, display_path: &str) -> std::io::Result<String> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let mut name = entry.file_name().to_string_lossy().into_owned();
        let mut href = percent_encode_segment(&name);
        if entry.file_type()?.is_dir() {
            name.push('/');
            href.push('/');
        }
        names.push((name, href));
    }
    names.sort();

    let title = html_escape(&format!("Directory listing for {display_path}"));
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for (name, href) in &names {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            html_escape(href),
            html_escape(name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

/// Content type guessed from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "html" | "htm" => "text/html",
        "js" | "mjs" => "text/javascript",
        "css" => "text/css",
        "json" => "application/json",
        "txt" => "text/plain",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

/// Blocking static file server rooted at one directory.
pub struct StaticServer {
    server: Server,
    root: PathBuf,
}

impl StaticServer {
    /// Bind to `config.host:config.port`.
    pub fn bind(config: &ServeConfig) -> Result<Self> {
        let addr = config.bind_addr();
        let server = Server::http(&addr).map_err(|e| anyhow!("binding {addr}: {e}"))?;
        log::debug!("listening on {}", server.server_addr());
        Ok(Self {
            server,
            root: config.root.clone(),
        })
    }

    /// Port actually bound (useful when binding port 0).
    pub fn port(&self) -> Option<u16> {
        self.server.server_addr().to_ip().map(|addr| addr.port())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve requests one at a time until the process is interrupted.
    pub fn run(&self) {
        for request in self.server.incoming_requests() {
            self.handle(request);
        }
    }

    fn handle(&self, request: Request) {
        let reply = respond(&self.root, request.method(), request.url());
        log::info!("{} {} -> {}", request.method(), request.url(), reply.status);

        let response = match reply.into_response() {
            Ok(response) => response,
            Err(e) => {
                log::error!("building response: {e:#}");
                return;
            }
        };
        if let Err(e) = request.respond(response) {
            log::warn!("sending response: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>fractal</h1>").unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data").join("EFG7 a.json"), "{}").unwrap();
        dir
    }

    #[test]
    fn serves_file_with_content_type() {
        let dir = site();
        let reply = respond(dir.path(), &Method::Get, "/index.html?v=2");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, Some("text/html"));
        assert_eq!(reply.body, b"<h1>fractal</h1>");
    }

    #[test]
    fn decodes_escaped_names() {
        let dir = site();
        let reply = respond(dir.path(), &Method::Get, "/data/EFG7%20a.json");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, Some("application/json"));
    }

    #[test]
    fn root_serves_index() {
        let dir = site();
        let reply = respond(dir.path(), &Method::Get, "/");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, b"<h1>fractal</h1>");
    }

    #[test]
    fn directory_without_slash_redirects() {
        let dir = site();
        let reply = respond(dir.path(), &Method::Get, "/data");
        assert_eq!(reply.status, 301);
        assert_eq!(reply.location.as_deref(), Some("/data/"));
    }

    #[test]
    fn directory_without_index_is_listed() {
        let dir = site();
        let reply = respond(dir.path(), &Method::Get, "/data/");
        assert_eq!(reply.status, 200);
        let html = String::from_utf8(reply.body).unwrap();
        assert!(html.contains("href=\"EFG7%20a.json\""));
        assert!(html.contains(">EFG7 a.json<"));
    }

    #[test]
    fn missing_file_is_404() {
        let dir = site();
        assert_eq!(respond(dir.path(), &Method::Get, "/nope.js").status, 404);
    }

    #[test]
    fn parent_segments_are_forbidden() {
        let dir = site();
        assert_eq!(respond(dir.path(), &Method::Get, "/../secret").status, 403);
        assert_eq!(respond(dir.path(), &Method::Get, "/data/%2e%2e/x").status, 403);
    }

    #[test]
    fn options_and_other_methods() {
        let dir = site();
        assert_eq!(respond(dir.path(), &Method::Options, "/index.html").status, 204);
        assert_eq!(respond(dir.path(), &Method::Post, "/index.html").status, 501);
    }

    #[test]
    fn every_response_carries_cors_headers() {
        let response = Reply::status(404, "File not found").into_response().unwrap();
        for (name, value) in CORS_HEADERS {
            assert!(
                response
                    .headers()
                    .iter()
                    .any(|h| h.field.equiv(name) && h.value.as_str() == value),
                "missing {name}"
            );
        }
    }

    #[test]
    fn percent_decode_handles_bad_input() {
        assert_eq!(percent_decode("/a%20b").as_deref(), Some("/a b"));
        assert_eq!(percent_decode("/a%2"), None);
        assert_eq!(percent_decode("/a%zz"), None);
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(content_type_for(Path::new("x.mat")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("app.JS")), "text/javascript");
    }
}
