use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Converter configuration
// ---------------------------------------------------------------------------

/// Where the batch converter reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Directory scanned for `.mat` files when no file is given.
    pub input_dir: PathBuf,
    /// Directory receiving `<stem>.json`; created on demand.
    pub output_dir: PathBuf,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("EFG7Program"),
            output_dir: PathBuf::from("data"),
        }
    }
}

// ---------------------------------------------------------------------------
// Preview server configuration
// ---------------------------------------------------------------------------

/// Settings for the local preview server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    /// Interface to bind; `0.0.0.0` listens on all of them.
    pub host: String,
    /// TCP port; `0` picks a free one.
    pub port: u16,
    /// Directory whose files are served.
    pub root: PathBuf,
    /// Page opened in the browser after binding.
    pub index_page: String,
    pub open_browser: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            root: PathBuf::from("."),
            index_page: "index.html".to_string(),
            open_browser: true,
        }
    }
}

impl ServeConfig {
    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL announced to the operator and opened in the browser.
    pub fn page_url(&self, port: u16) -> String {
        format!("http://localhost:{port}/{}", self.index_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_defaults() {
        let cfg = ConvertConfig::default();
        assert_eq!(cfg.input_dir, PathBuf::from("EFG7Program"));
        assert_eq!(cfg.output_dir, PathBuf::from("data"));
    }

    #[test]
    fn serve_defaults_and_urls() {
        let cfg = ServeConfig::default();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
        assert_eq!(cfg.page_url(8000), "http://localhost:8000/index.html");
        assert!(cfg.open_browser);
    }
}
