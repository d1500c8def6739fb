use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Selectors for the page regions the portfolio script drives.
pub mod selectors {
    pub const STATUS: &str = "#github-status";
    pub const GRID: &str = "#github-projects";
    pub const YEAR: &str = "#year";
    pub const MENU_BUTTON: &str = ".menu-btn";
    pub const MENU_PANEL: &str = ".mobile-menu";
    pub const MENU_LINK: &str = "a";
    pub const REVEAL: &str = ".reveal";
    pub const CURSOR_DOT: &str = ".cursor-dot";
    pub const STAT_REPOS: &str = "#ghRepos";
    pub const STAT_FOLLOWERS: &str = "#ghFollowers";
    pub const STAT_STARS: &str = "#ghStars";
}

/// Opaque handle to an element owned by a [`Host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One intersection-observer notification for an observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub intersection_ratio: f64,
}

/// The rendering surface the portfolio runs against.
///
/// Queries on elements that are no longer attached return `None`/empty and
/// mutations on them are ignored.
pub trait Host: Send {
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Descendants of `root` (excluding `root`) that match `selector`.
    fn query_within(&self, root: ElementId, selector: &str) -> Vec<ElementId>;

    /// First element matching `selector`, if any.
    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    fn text(&self, element: ElementId) -> Option<String>;
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Replaces all children of `element` with the parsed `html`.
    fn set_inner_html(&mut self, element: ElementId, html: &str);

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    fn has_class(&self, element: ElementId, class: &str) -> bool;
    fn add_class(&mut self, element: ElementId, class: &str);
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Flips `class` and returns whether it is now present.
    fn toggle_class(&mut self, element: ElementId, class: &str) -> bool {
        if self.has_class(element, class) {
            self.remove_class(element, class);
            false
        } else {
            self.add_class(element, class);
            true
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    fn observe_intersection(&mut self, element: ElementId, threshold: f64);
    fn unobserve_intersection(&mut self, element: ElementId);

    /// Viewport width and height.
    fn viewport(&self) -> (f64, f64);

    fn now(&self) -> DateTime<Utc>;
}

/// A host shared between the fetchers, the controller and the frame loop.
pub type SharedHost<H> = Arc<Mutex<H>>;

pub fn share<H: Host>(host: H) -> SharedHost<H> {
    Arc::new(Mutex::new(host))
}
