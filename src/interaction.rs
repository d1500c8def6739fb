use crate::dom::{selectors, ElementId, Host, IntersectionEntry, Point, SharedHost};
use crate::events::{EventKind, SubscriptionId, Subscriptions, UiEvent};
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

pub const OPEN_CLASS: &str = "open";
pub const VISIBLE_CLASS: &str = "is-visible";
pub const REVEAL_THRESHOLD: f64 = 0.12;
pub const CURSOR_DAMPING: f64 = 0.18;

/// Collapsible navigation driven by a button with `aria-expanded`.
#[derive(Debug, Clone)]
pub struct MobileMenu {
    button: ElementId,
    panel: ElementId,
    links: Vec<ElementId>,
}

impl MobileMenu {
    /// `None` unless both the button and the panel exist.
    pub fn attach<H: Host + ?Sized>(host: &H) -> Option<Self> {
        let button = host.query(selectors::MENU_BUTTON)?;
        let panel = host.query(selectors::MENU_PANEL)?;
        let links = host.query_within(panel, selectors::MENU_LINK);
        Some(Self {
            button,
            panel,
            links,
        })
    }

    pub fn button(&self) -> ElementId {
        self.button
    }

    pub fn panel(&self) -> ElementId {
        self.panel
    }

    pub fn links(&self) -> &[ElementId] {
        &self.links
    }

    pub fn is_open<H: Host + ?Sized>(&self, host: &H) -> bool {
        host.attribute(self.button, "aria-expanded").as_deref() == Some("true")
    }

    /// Flips the menu and returns the new open state.
    pub fn toggle<H: Host + ?Sized>(&self, host: &mut H) -> bool {
        let was_open = self.is_open(&*host);
        host.set_attribute(self.button, "aria-expanded", &(!was_open).to_string());
        host.toggle_class(self.panel, OPEN_CLASS);
        host.set_attribute(self.panel, "aria-hidden", &was_open.to_string());
        !was_open
    }

    pub fn close<H: Host + ?Sized>(&self, host: &mut H) {
        host.remove_class(self.panel, OPEN_CLASS);
        host.set_attribute(self.button, "aria-expanded", "false");
        host.set_attribute(self.panel, "aria-hidden", "true");
    }
}

/// Adds [`VISIBLE_CLASS`] to observed elements once they cross the threshold.
/// The class is never removed.
#[derive(Debug, Clone, Copy)]
pub struct RevealObserver {
    threshold: f64,
}

impl Default for RevealObserver {
    fn default() -> Self {
        Self::new(REVEAL_THRESHOLD)
    }
}

impl RevealObserver {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn observe<H: Host + ?Sized>(&self, host: &mut H, element: ElementId) {
        host.observe_intersection(element, self.threshold);
    }

    pub fn observe_all<H: Host + ?Sized>(&self, host: &mut H, selector: &str) -> usize {
        let elements = host.query_all(selector);
        for &element in &elements {
            self.observe(host, element);
        }
        elements.len()
    }

    /// Registers every reveal-marked descendant of `root`.
    pub fn observe_within<H: Host + ?Sized>(&self, host: &mut H, root: ElementId) -> usize {
        let elements = host.query_within(root, selectors::REVEAL);
        for &element in &elements {
            self.observe(host, element);
        }
        elements.len()
    }

    /// Returns how many elements became visible.
    pub fn handle<H: Host + ?Sized>(&self, host: &mut H, entries: &[IntersectionEntry]) -> usize {
        let mut revealed = 0;
        for entry in entries {
            if entry.intersection_ratio >= self.threshold
                && !host.has_class(entry.target, VISIBLE_CLASS)
            {
                host.add_class(entry.target, VISIBLE_CLASS);
                revealed += 1;
            }
        }
        revealed
    }
}

/// Moves `current` a `damping` fraction of the way to `target` on each axis.
pub fn ease(current: Point, target: Point, damping: f64) -> Point {
    Point::new(
        current.x + (target.x - current.x) * damping,
        current.y + (target.y - current.y) * damping,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub frames: u64,
    pub position: Point,
}

/// Dot that eases toward the last pointer position every frame.
#[derive(Debug)]
pub struct CursorDot {
    element: ElementId,
    origin: Point,
    target: watch::Sender<Point>,
}

impl CursorDot {
    /// Both positions start at the viewport centre.
    pub fn attach<H: Host + ?Sized>(host: &H) -> Option<Self> {
        let element = host.query(selectors::CURSOR_DOT)?;
        let (width, height) = host.viewport();
        let origin = Point::new(width / 2.0, height / 2.0);
        let (target, _) = watch::channel(origin);
        Some(Self {
            element,
            origin,
            target,
        })
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn track(&self, position: Point) {
        self.target.send_replace(position);
    }

    pub fn target(&self) -> Point {
        *self.target.borrow()
    }

    /// Starts the per-frame loop. It runs until the returned handle is
    /// cancelled or dropped.
    pub fn spawn<H: Host + 'static>(&self, host: SharedHost<H>, interval: Duration) -> AnimationHandle {
        let element = self.element;
        let target = self.target.subscribe();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let (state_tx, state_rx) = watch::channel(FrameState {
            frames: 0,
            position: self.origin,
        });
        let mut current = self.origin;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut frames = 0u64;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        current = ease(current, *target.borrow(), CURSOR_DAMPING);
                        {
                            let mut host = host.lock().await;
                            host.set_style(element, "left", &format!("{}px", current.x));
                            host.set_style(element, "top", &format!("{}px", current.y));
                        }
                        frames += 1;
                        state_tx.send_replace(FrameState { frames, position: current });
                    }
                }
            }

            debug!(frames, "Cursor animation stopped");
        });

        AnimationHandle {
            stop: Some(stop_tx),
            task,
            state: state_rx,
        }
    }
}

/// Cancellation handle for the cursor frame loop.
#[derive(Debug)]
pub struct AnimationHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    state: watch::Receiver<FrameState>,
}

impl AnimationHandle {
    pub fn state(&self) -> FrameState {
        *self.state.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the loop and waits for the task to exit.
    pub async fn cancel(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = self.task.await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listener {
    ToggleMenu,
    CloseMenu,
    TrackPointer,
    Reveal,
}

/// Menu, scroll reveal and cursor tracking wired to host events.
#[derive(Debug)]
pub struct Interactions {
    menu: Option<MobileMenu>,
    reveal: RevealObserver,
    cursor: Option<CursorDot>,
    subscriptions: Subscriptions<Listener>,
}

impl Interactions {
    pub fn attach<H: Host + ?Sized>(host: &mut H) -> Self {
        let mut subscriptions = Subscriptions::new();

        let menu = MobileMenu::attach(&*host);
        if let Some(menu) = &menu {
            subscriptions.subscribe(EventKind::Click, Some(menu.button), Listener::ToggleMenu);
            for &link in &menu.links {
                subscriptions.subscribe(EventKind::Click, Some(link), Listener::CloseMenu);
            }
        }

        let reveal = RevealObserver::default();
        let observed = reveal.observe_all(host, selectors::REVEAL);
        subscriptions.subscribe(EventKind::Intersection, None, Listener::Reveal);

        let cursor = CursorDot::attach(&*host);
        if cursor.is_some() {
            subscriptions.subscribe(EventKind::PointerMove, None, Listener::TrackPointer);
        }

        info!(
            menu = menu.is_some(),
            observed,
            cursor = cursor.is_some(),
            "Interactions attached"
        );

        Self {
            menu,
            reveal,
            cursor,
            subscriptions,
        }
    }

    pub fn menu(&self) -> Option<&MobileMenu> {
        self.menu.as_ref()
    }

    pub fn reveal(&self) -> &RevealObserver {
        &self.reveal
    }

    pub fn cursor(&self) -> Option<&CursorDot> {
        self.cursor.as_ref()
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = (SubscriptionId, EventKind, Option<ElementId>)> + '_ {
        self.subscriptions.iter()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(id)
    }

    /// Drops every listener; later events are ignored.
    pub fn detach(&mut self) {
        self.subscriptions.clear();
    }

    /// Routes `event` to its listeners and returns how many ran.
    pub fn dispatch<H: Host + ?Sized>(&self, host: &mut H, event: &UiEvent) -> usize {
        let listeners = self.subscriptions.listeners_for(event);
        for listener in &listeners {
            match (listener, event) {
                (Listener::ToggleMenu, _) => {
                    if let Some(menu) = &self.menu {
                        menu.toggle(host);
                    }
                }
                (Listener::CloseMenu, _) => {
                    if let Some(menu) = &self.menu {
                        menu.close(host);
                    }
                }
                (Listener::TrackPointer, UiEvent::PointerMove(position)) => {
                    if let Some(cursor) = &self.cursor {
                        cursor.track(*position);
                    }
                }
                (Listener::Reveal, UiEvent::Intersection(entries)) => {
                    self.reveal.handle(host, entries);
                }
                _ => {}
            }
        }
        listeners.len()
    }
}
