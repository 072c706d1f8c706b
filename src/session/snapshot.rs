// src/session/snapshot.rs
// Replays saved pages. No live client runtime: scripts evaluate to null and
// the performance log is always empty, so only markup-based strategies fire.
use std::{collections::HashMap, fs, io, path::{Path, PathBuf}};

use serde_json::Value;

use super::{BrowserSession, PerfLogEntry, SessionResult};
use crate::config::consts::BASE_URL;
use crate::error::SessionError;

#[derive(Debug, Default)]
pub struct SnapshotSession {
    root: Option<PathBuf>,
    pages: HashMap<String, String>,
    current: Option<(String, String)>, // (url, markup)
}

impl SnapshotSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages live under `root` as `<kind>/<id>.html`, e.g.
    /// `athletes/123.html` for `https://www.strava.com/athletes/123`.
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()), ..Self::default() }
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    fn load(&self, url: &str) -> SessionResult<String> {
        if let Some(html) = self.pages.get(url) {
            return Ok(html.clone());
        }
        let root = self.root.as_deref().ok_or_else(|| SessionError::Navigation(s!(url)))?;
        let path = page_path(root, url).ok_or_else(|| SessionError::Navigation(s!(url)))?;
        match fs::read_to_string(&path) {
            Ok(html) => Ok(html),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SessionError::Navigation(s!(url))),
            Err(e) => Err(e.into()),
        }
    }
}

/// `<BASE_URL>/<kind>/<id>` → `<root>/<kind>/<id>.html`
fn page_path(root: &Path, url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix(BASE_URL)?.trim_matches('/');
    let mut parts = rest.split('/');
    let (kind, id) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || kind.is_empty() || id.is_empty() {
        return None;
    }
    Some(root.join(kind).join(join!(id, ".html")))
}

impl BrowserSession for SnapshotSession {
    fn navigate(&mut self, url: &str) -> SessionResult<()> {
        let html = self.load(url)?;
        self.current = Some((s!(url), html));
        Ok(())
    }

    fn page_source(&self) -> SessionResult<String> {
        self.current.as_ref().map(|(_, html)| html.clone()).ok_or(SessionError::NoPage)
    }

    fn current_url(&self) -> SessionResult<String> {
        self.current.as_ref().map(|(url, _)| url.clone()).ok_or(SessionError::NoPage)
    }

    fn execute_script(&self, _script: &str) -> SessionResult<Value> {
        Ok(Value::Null)
    }

    fn performance_log(&self) -> SessionResult<Vec<PerfLogEntry>> {
        Ok(Vec::new())
    }

    fn response_body(&self, request_id: &str) -> SessionResult<String> {
        Err(SessionError::ResponseBody(s!(request_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_pages_serve_markup() {
        let mut s = SnapshotSession::new().with_page("https://www.strava.com/activities/1", "<p>hi</p>");
        assert!(matches!(s.page_source(), Err(SessionError::NoPage)));
        s.navigate("https://www.strava.com/activities/1").unwrap();
        assert_eq!(s.page_source().unwrap(), "<p>hi</p>");
        assert_eq!(s.current_url().unwrap(), "https://www.strava.com/activities/1");
        assert_eq!(s.execute_script("return 1;").unwrap(), Value::Null);
        assert!(s.performance_log().unwrap().is_empty());
    }

    #[test]
    fn unknown_page_is_navigation_error() {
        let mut s = SnapshotSession::new();
        assert!(matches!(s.navigate("https://www.strava.com/activities/2"), Err(SessionError::Navigation(_))));
    }

    #[test]
    fn page_paths_map_kind_and_id() {
        let root = Path::new("/snap");
        assert_eq!(
            page_path(root, "https://www.strava.com/athletes/123"),
            Some(PathBuf::from("/snap/athletes/123.html"))
        );
        assert_eq!(page_path(root, "https://example.com/athletes/123"), None);
        assert_eq!(page_path(root, "https://www.strava.com/athletes"), None);
        assert_eq!(page_path(root, "https://www.strava.com/a/b/c"), None);
    }
}
