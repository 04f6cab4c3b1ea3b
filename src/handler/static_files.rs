//! Static file serving module
//!
//! Serves the documentation bundle mounted under a path prefix. Independent
//! of the route table and strictly read-only.

use std::path::{Path, PathBuf};

use hyper::body::Bytes;
use hyper::Method;
use tokio::fs;

use super::Request;
use crate::config::StaticAssetsConfig;
use crate::http::{self, mime, HttpResponse};

const ALLOWED_METHODS: &str = "GET, HEAD";

/// Outcome of resolving a request path against the root directory
#[derive(Debug, PartialEq, Eq)]
enum Resolved {
    File(PathBuf),
    /// Directory requested without its trailing slash
    Redirect,
    /// Directory without any index file
    Forbidden,
    NotFound,
}

/// Static asset server bound to one prefix and root directory
#[derive(Debug, Clone)]
pub struct StaticAssets {
    prefix: String,
    root: PathBuf,
    index_files: Vec<String>,
}

impl StaticAssets {
    pub fn new(prefix: &str, root: impl Into<PathBuf>, index_files: Vec<String>) -> Self {
        // Always keep exactly one trailing slash on the prefix
        let prefix = format!("{}/", prefix.trim_end_matches('/'));
        Self {
            prefix,
            root: root.into(),
            index_files,
        }
    }

    pub fn from_config(config: &StaticAssetsConfig) -> Self {
        Self::new(&config.prefix, &config.root, config.index_files.clone())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Path relative to the root if `path` lies under the prefix
    ///
    /// The bare prefix without its trailing slash (`/swagger-ui`) maps to the root.
    pub fn strip_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.prefix.as_str())
            .or_else(|| (path == self.prefix.trim_end_matches('/')).then_some(""))
    }

    /// Serve a request whose path is under the prefix
    pub async fn serve(&self, req: &Request) -> HttpResponse {
        let is_head = req.method() == Method::HEAD;
        if req.method() != Method::GET && !is_head {
            return http::build_405_response(ALLOWED_METHODS);
        }

        let path = req.uri().path();
        let Some(relative) = self.strip_prefix(path) else {
            return http::build_404_response();
        };
        let Some(segments) = decode_segments(relative) else {
            return http::build_404_response();
        };

        match self.resolve(&segments, path.ends_with('/')).await {
            Resolved::File(file) => match fs::read(&file).await {
                Ok(content) => http::build_file_response(
                    Bytes::from(content),
                    mime::content_type_for(&file),
                    is_head,
                ),
                Err(e) => {
                    tracing::error!(file = %file.display(), error = %e, "failed to read file");
                    http::build_404_response()
                }
            },
            // Relative links inside an index page only work from the slash form
            Resolved::Redirect => {
                let location = match req.uri().query() {
                    Some(query) => format!("{path}/?{query}"),
                    None => format!("{path}/"),
                };
                http::build_301_response(&location)
            }
            Resolved::Forbidden => http::build_403_response(),
            Resolved::NotFound => http::build_404_response(),
        }
    }

    async fn resolve(&self, segments: &[String], directory_form: bool) -> Resolved {
        let mut candidate = self.root.clone();
        candidate.extend(segments);

        let Ok(meta) = fs::metadata(&candidate).await else {
            return Resolved::NotFound;
        };

        let file = if meta.is_dir() {
            if !directory_form {
                return if self.within_root(&candidate).await {
                    Resolved::Redirect
                } else {
                    Resolved::NotFound
                };
            }
            match self.find_index(&candidate).await {
                Some(index) => index,
                None => return Resolved::Forbidden,
            }
        } else {
            candidate
        };

        if self.within_root(&file).await {
            Resolved::File(file)
        } else {
            Resolved::NotFound
        }
    }

    /// Symlinks must not lead outside the root
    async fn within_root(&self, path: &Path) -> bool {
        let (Ok(root), Ok(canonical)) =
            (fs::canonicalize(&self.root).await, fs::canonicalize(path).await)
        else {
            return false;
        };
        if canonical.starts_with(&root) {
            return true;
        }
        tracing::warn!(
            path = %path.display(),
            resolved = %canonical.display(),
            "path escapes static root"
        );
        false
    }

    async fn find_index(&self, dir: &Path) -> Option<PathBuf> {
        for name in &self.index_files {
            let path = dir.join(name);
            if fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
                return Some(path);
            }
        }
        None
    }
}

/// Percent-decode each segment of a relative request path
///
/// Returns `None` for segments that are not UTF-8 once decoded, or that
/// would step out of their directory (`..`, or an encoded separator).
fn decode_segments(relative: &str) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    for raw in relative.split('/') {
        let Ok(segment) = urlencoding::decode(raw) else {
            tracing::warn!(path = relative, "path segment is not valid UTF-8");
            return None;
        };
        match segment.as_ref() {
            "" | "." => {}
            ".." => {
                tracing::warn!(path = relative, "path traversal attempt blocked");
                return None;
            }
            s if s.contains(['/', '\\', '\0']) => {
                tracing::warn!(path = relative, "encoded separator in path segment");
                return None;
            }
            _ => segments.push(segment.into_owned()),
        }
    }
    Some(segments)
}
