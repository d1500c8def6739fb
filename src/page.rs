use crate::dom::{ElementId, Host, IntersectionEntry};
use chrono::{DateTime, Utc};
use ego_tree::NodeId;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{CaseSensitivity, ElementRef, Html, Node, Selector};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Markup containing every region the portfolio script drives.
pub const DEFAULT_TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Portfolio</title></head>
<body>
  <div class="cursor-dot" aria-hidden="true"></div>
  <header>
    <button class="menu-btn" aria-expanded="false" aria-label="Open menu">Menu</button>
    <nav class="mobile-menu" aria-hidden="true">
      <a href="#projects">Projects</a>
      <a href="#stats">Stats</a>
      <a href="#contact">Contact</a>
    </nav>
  </header>
  <section id="stats" class="reveal">
    <div><strong id="ghRepos">—</strong> repos</div>
    <div><strong id="ghFollowers">—</strong> followers</div>
    <div><strong id="ghStars">—</strong> stars</div>
  </section>
  <section id="projects" class="reveal">
    <p id="github-status"></p>
    <div id="github-projects" class="grid"></div>
  </section>
  <footer>&copy; <span id="year"></span></footer>
</body>
</html>"##;

/// In-memory document implementing [`Host`].
///
/// Wraps a `scraper::Html` tree. Every element gets a stable [`ElementId`]
/// when it enters the tree; elements detached by `set_text` or
/// `set_inner_html` lose theirs, so later calls with a stale id are no-ops.
#[derive(Debug, Clone)]
pub struct Page {
    document: Html,
    elements: Vec<NodeId>,
    ids: HashMap<NodeId, ElementId>,
    observed: BTreeMap<ElementId, f64>,
    viewport: (f64, f64),
    clock: Option<DateTime<Utc>>,
}

impl Default for Page {
    fn default() -> Self {
        Page::parse(DEFAULT_TEMPLATE)
    }
}

impl Page {
    /// Parses a full HTML document.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let root = document.tree.root().id();

        let mut page = Page {
            document,
            elements: Vec::new(),
            ids: HashMap::new(),
            observed: BTreeMap::new(),
            viewport: (1280.0, 800.0),
            clock: None,
        };
        page.register(root);
        page
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = (width, height);
        self
    }

    /// Pins the clock returned by [`Host::now`].
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    // Assigns ids to the elements of the subtree at `node`, in document order.
    fn register(&mut self, node: NodeId) {
        let Some(node) = self.document.tree.get(node) else {
            return;
        };
        let fresh: Vec<NodeId> = node
            .descendants()
            .filter(|n| n.value().is_element())
            .map(|n| n.id())
            .collect();

        for node_id in fresh {
            let id = ElementId(self.elements.len());
            self.elements.push(node_id);
            self.ids.insert(node_id, id);
        }
    }

    fn node_id(&self, id: ElementId) -> Option<NodeId> {
        let node_id = *self.elements.get(id.0)?;
        self.ids.contains_key(&node_id).then_some(node_id)
    }

    fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        let node = self.document.tree.get(self.node_id(id)?)?;
        ElementRef::wrap(node)
    }

    fn select(&self, scope: ElementRef<'_>, include_scope: bool, selector: &str) -> Vec<ElementId> {
        let selector = match Selector::parse(selector) {
            Ok(selector) => selector,
            Err(e) => {
                debug!(selector, error = ?e, "Ignoring invalid selector");
                return Vec::new();
            }
        };

        let scope_match = include_scope
            .then_some(scope)
            .filter(|element| selector.matches(element));
        scope_match
            .into_iter()
            .chain(scope.select(&selector))
            .filter_map(|element| self.ids.get(&element.id()).copied())
            .collect()
    }

    // Detaches every child of `parent` and forgets the ids below it.
    fn detach_children(&mut self, parent: NodeId) {
        let Some(node) = self.document.tree.get(parent) else {
            return;
        };
        let children: Vec<NodeId> = node.children().map(|child| child.id()).collect();

        for child in children {
            let detached: Vec<NodeId> = match self.document.tree.get(child) {
                Some(node) => node.descendants().map(|n| n.id()).collect(),
                None => continue,
            };
            for node_id in detached {
                if let Some(id) = self.ids.remove(&node_id) {
                    self.observed.remove(&id);
                }
            }
            if let Some(mut child) = self.document.tree.get_mut(child) {
                child.detach();
            }
        }
    }

    // Copies the children of `source` under `parent` and returns the copies.
    fn graft(&mut self, parent: NodeId, source: ElementRef<'_>) -> Vec<NodeId> {
        let mut appended = Vec::new();
        for child in source.children() {
            let Some(mut target) = self.document.tree.get_mut(parent) else {
                break;
            };
            let copy = target.append(child.value().clone()).id();
            appended.push(copy);
            if let Some(element) = ElementRef::wrap(child) {
                self.graft(copy, element);
            }
        }
        appended
    }

    // Element attributes are cached by scraper, so edits rebuild the element.
    fn rewrite_attributes<F>(&mut self, element: ElementId, edit: F)
    where
        F: FnOnce(&mut Vec<Attribute>),
    {
        let Some(node_id) = self.node_id(element) else {
            return;
        };
        let Some(mut node) = self.document.tree.get_mut(node_id) else {
            return;
        };
        let Node::Element(current) = node.value() else {
            return;
        };

        let name = current.name.clone();
        let mut attributes: Vec<Attribute> = current
            .attrs
            .iter()
            .map(|(name, value)| {
                let value: &str = value;
                Attribute {
                    name: name.clone(),
                    value: value.into(),
                }
            })
            .collect();
        edit(&mut attributes);

        *node.value() = Node::Element(Element::new(name, attributes));
    }

    /// Serialized children of an attached element.
    pub fn inner_html(&self, id: ElementId) -> Option<String> {
        self.element(id).map(|element| element.inner_html())
    }

    pub fn outer_html(&self, id: ElementId) -> Option<String> {
        self.element(id).map(|element| element.html())
    }

    pub fn to_html(&self) -> String {
        self.document.html()
    }

    pub fn tag(&self, id: ElementId) -> Option<String> {
        self.element(id).map(|element| element.value().name().to_string())
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<String> {
        let style = self.attribute(id, "style")?;
        parse_style(&style)
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Nodes held by the underlying tree, detached ones included.
    pub fn node_count(&self) -> usize {
        self.document.tree.nodes().count()
    }

    pub fn is_observed(&self, id: ElementId) -> bool {
        self.observed.contains_key(&id)
    }

    pub fn observed(&self) -> Vec<ElementId> {
        self.observed.keys().copied().collect()
    }

    /// Notification the host would deliver when `id` scrolls to `ratio`
    /// visibility; `None` unless the element is observed.
    pub fn intersection(&self, id: ElementId, ratio: f64) -> Option<IntersectionEntry> {
        self.observed.get(&id).map(|_| IntersectionEntry {
            target: id,
            intersection_ratio: ratio,
        })
    }
}

impl Host for Page {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.select(self.document.root_element(), true, selector)
    }

    fn query_within(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        match self.element(root) {
            Some(scope) => self.select(scope, false, selector),
            None => Vec::new(),
        }
    }

    fn text(&self, element: ElementId) -> Option<String> {
        self.element(element).map(|element| element.text().collect())
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        let Some(node_id) = self.node_id(element) else {
            return;
        };

        // A lone text child is rewritten in place.
        let lone_text = self.document.tree.get(node_id).and_then(|node| {
            let child = node.first_child()?;
            (child.value().is_text() && child.next_sibling().is_none()).then(|| child.id())
        });
        if let Some(mut child) = lone_text.and_then(|id| self.document.tree.get_mut(id)) {
            *child.value() = Node::Text(Text { text: text.into() });
            return;
        }

        self.detach_children(node_id);
        if let Some(mut node) = self.document.tree.get_mut(node_id) {
            node.append(Node::Text(Text { text: text.into() }));
        }
    }

    fn set_inner_html(&mut self, element: ElementId, html: &str) {
        let Some(node_id) = self.node_id(element) else {
            return;
        };
        self.detach_children(node_id);

        let fragment = Html::parse_fragment(html);
        for child in self.graft(node_id, fragment.root_element()) {
            self.register(child);
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.value().attr(name).map(str::to_string)
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        self.rewrite_attributes(element, |attributes| {
            match attributes.iter_mut().find(|a| &*a.name.local == name) {
                Some(attribute) => attribute.value = value.into(),
                None => attributes.push(Attribute {
                    name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
                    value: value.into(),
                }),
            }
        });
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element(element)
            .map(|element| element.value().has_class(class, CaseSensitivity::CaseSensitive))
            .unwrap_or(false)
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if self.element(element).is_none() || self.has_class(element, class) {
            return;
        }
        let mut classes = self.attribute(element, "class").unwrap_or_default();
        if !classes.trim().is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
        self.set_attribute(element, "class", classes.trim());
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if !self.has_class(element, class) {
            return;
        }
        let Some(classes) = self.attribute(element, "class") else {
            return;
        };
        let remaining: Vec<&str> = classes.split_whitespace().filter(|c| *c != class).collect();
        self.set_attribute(element, "class", &remaining.join(" "));
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if self.element(element).is_none() {
            return;
        }
        let mut declarations = parse_style(&self.attribute(element, "style").unwrap_or_default());
        match declarations.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }
        let style = declarations
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attribute(element, "style", &style);
    }

    fn observe_intersection(&mut self, element: ElementId, threshold: f64) {
        if self.element(element).is_some() {
            self.observed.insert(element, threshold);
        }
    }

    fn unobserve_intersection(&mut self, element: ElementId) {
        self.observed.remove(&element);
    }

    fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_declarations() {
        let parsed = parse_style("left: 10px; top:20px;");
        assert_eq!(
            parsed,
            vec![
                ("left".to_string(), "10px".to_string()),
                ("top".to_string(), "20px".to_string()),
            ]
        );
    }

    #[test]
    fn test_every_element_gets_an_id() {
        let page = Page::parse("<body><div><p>a</p><p>b</p></div></body>");
        // html, head, body, div, p, p
        assert_eq!(page.elements.len(), 6);
        assert_eq!(page.ids.len(), 6);
    }
}
