//! HubSpot page-view tracking for a single-page docs site.
//!
//! The loader script tracks the first page itself. After that the host router
//! reports every navigation to a [`PageViewTracker`], which emits a page view
//! only when the path actually changed.

use serde::Serialize;
use serde_json::{Value, json};
use strum::{AsRefStr, Display};
use tracing::{debug, trace};
use url::Url;

/// HubSpot portal the docs site reports to.
pub const DEFAULT_PORTAL_ID: &str = "7230102";

const LOADER_ID: &str = "hs-script-loader";
const LOADER_HOST: &str = "js.hs-scripts.com";
const RELATIVE_BASE: &str = "http://localhost/";

/// The external loader tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoaderScript {
    pub portal_id: String,
}

impl LoaderScript {
    pub fn new(portal_id: impl Into<String>) -> Self {
        Self {
            portal_id: portal_id.into(),
        }
    }

    /// Protocol-relative script URL.
    pub fn src(&self) -> String {
        format!("//{LOADER_HOST}/{}.js", self.portal_id)
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<script type="text/javascript" id="{LOADER_ID}" async defer src="{}"></script>"#,
            self.src()
        )
    }
}

impl Default for LoaderScript {
    fn default() -> Self {
        Self::new(DEFAULT_PORTAL_ID)
    }
}

/// Receives page views from a [`PageViewTracker`].
pub trait PageViewSink {
    fn track_page_view(&mut self, path: &str);
}

/// Records commands the way the `_hsq` queue receives them:
/// `["setPath", path]` followed by `["trackPageView"]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubSpotQueue {
    commands: Vec<Value>,
}

impl HubSpotQueue {
    pub fn commands(&self) -> &[Value] {
        &self.commands
    }
}

impl PageViewSink for HubSpotQueue {
    fn track_page_view(&mut self, path: &str) {
        self.commands.push(json!(["setPath", path]));
        self.commands.push(json!(["trackPageView"]));
    }
}

/// What the host router observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum NavigationSource {
    PushState,
    ReplaceState,
    TitleChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub source: NavigationSource,
    /// Full URL or path of the page after the navigation.
    pub location: String,
}

impl NavigationEvent {
    pub fn new(source: NavigationSource, location: impl Into<String>) -> Self {
        Self {
            source,
            location: location.into(),
        }
    }
}

/// Path and query of `location`, without scheme, host or fragment. Relative
/// locations are resolved against the site root.
pub fn normalize_path(location: &str) -> String {
    let parsed = Url::parse(location)
        .or_else(|_| Url::parse(RELATIVE_BASE).and_then(|base| base.join(location)));
    let Ok(url) = parsed else {
        return location.to_string();
    };

    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

/// Emits a page view for each navigation that lands on a new path.
#[derive(Debug)]
pub struct PageViewTracker<S: PageViewSink> {
    last_path: String,
    sink: S,
}

impl<S: PageViewSink> PageViewTracker<S> {
    /// `initial_location` is the page the loader already tracked.
    pub fn new(initial_location: &str, sink: S) -> Self {
        Self {
            last_path: normalize_path(initial_location),
            sink,
        }
    }

    /// Returns `true` when a page view was emitted.
    pub fn on_navigation(&mut self, event: &NavigationEvent) -> bool {
        let path = normalize_path(&event.location);
        if path == self.last_path {
            trace!("{} to {path}, already tracked", event.source);
            return false;
        }

        debug!("{} to {path}, tracking page view", event.source);
        self.sink.track_page_view(&path);
        self.last_path = path;
        true
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
