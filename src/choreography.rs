//! Timed sequencing of page transitions.
//!
//! [`TransitionDirector`] drives a [`TransitionStore`] through its phases on
//! tokio timers: cover, navigate, settle, reveal, reset. Every delay comes from
//! [`TransitionTimings`]. Pending timers are aborted when the director is
//! cancelled or dropped, so a torn-down host never sees late state changes.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{TransitionStore, TransitionTimings};

/// How a link target relates to the current page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    /// Another route in this application
    Internal,
    /// The route already being shown
    SamePage,
    /// Another origin or a non-HTTP scheme
    External,
    /// A fragment on the current page
    Anchor,
}

impl LinkKind {
    /// Only internal routes are animated.
    #[inline]
    pub fn is_animated(self) -> bool {
        self == LinkKind::Internal
    }
}

/// Classify a link target relative to the current path.
///
/// ## Example
///
/// ```rust
/// use ascii_stage::{classify_link, LinkKind};
///
/// assert_eq!(classify_link("/about", "/"), LinkKind::Internal);
/// assert_eq!(classify_link("/about", "/about"), LinkKind::SamePage);
/// assert_eq!(classify_link("https://example.com", "/"), LinkKind::External);
/// assert_eq!(classify_link("#contact", "/"), LinkKind::Anchor);
/// ```
pub fn classify_link(href: &str, current_path: &str) -> LinkKind {
    const EXTERNAL_PREFIXES: [&str; 4] = ["http", "//", "mailto:", "tel:"];

    if href.starts_with('#') {
        LinkKind::Anchor
    } else if EXTERNAL_PREFIXES.iter().any(|prefix| href.starts_with(prefix)) {
        LinkKind::External
    } else if href == current_path {
        LinkKind::SamePage
    } else {
        LinkKind::Internal
    }
}

/// The router's navigation primitive.
///
/// Navigation failures are not reported back; the transition still runs to
/// completion.
pub trait Navigator: Send + Sync + 'static {
    fn push(&self, url: &str);
}

/// Result of asking the director to follow a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The transition sequence was started
    Started,
    /// The link should be followed without animation
    PassThrough(LinkKind),
    /// A transition is already in flight; the click was ignored
    Ignored,
}

/// Owns the timed sequence that moves a [`TransitionStore`] through its
/// phases.
///
/// ## Example
///
/// ```rust
/// use ascii_stage::{Navigator, NavigationOutcome, TransitionDirector, TransitionStore, TransitionTimings};
///
/// struct Router;
/// impl Navigator for Router {
///     fn push(&self, _url: &str) {}
/// }
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().start_paused(true).build().unwrap().block_on(async {
/// let store = TransitionStore::new();
/// let mut director = TransitionDirector::new(store.clone(), TransitionTimings::default(), Router);
///
/// assert_eq!(director.navigate("/about", "/"), NavigationOutcome::Started);
/// assert!(store.is_transitioning());
///
/// director.wait().await;
/// assert!(!store.is_transitioning());
/// # });
/// ```
#[derive(Debug)]
pub struct TransitionDirector<N> {
    store: TransitionStore,
    timings: TransitionTimings,
    navigator: Arc<N>,
    sequence: Option<JoinHandle<()>>,
}

impl<N: Navigator> TransitionDirector<N> {
    pub fn new(store: TransitionStore, timings: TransitionTimings, navigator: N) -> Self {
        Self {
            store,
            timings,
            navigator: Arc::new(navigator),
            sequence: None,
        }
    }

    #[inline]
    pub fn store(&self) -> &TransitionStore {
        &self.store
    }

    #[inline]
    pub fn timings(&self) -> &TransitionTimings {
        &self.timings
    }

    /// Follow a link, animating if it is an internal route.
    ///
    /// Must be called from within a tokio runtime.
    pub fn navigate(&mut self, href: &str, current_path: &str) -> NavigationOutcome {
        let kind = classify_link(href, current_path);
        if !kind.is_animated() {
            tracing::debug!(href, ?kind, "link passes through without transition");
            return NavigationOutcome::PassThrough(kind);
        }

        if !self.store.start_transition(href) {
            return NavigationOutcome::Ignored;
        }

        let store = self.store.clone();
        let navigator = Arc::clone(&self.navigator);
        let timings = self.timings;
        let url = href.to_string();

        self.replace_sequence(tokio::spawn(async move {
            tokio::time::sleep(timings.cover_duration()).await;
            tracing::debug!(url = %url, "overlay covered, navigating");
            navigator.push(&url);

            tokio::time::sleep(timings.settle_duration()).await;
            store.complete_enter();

            tokio::time::sleep(timings.reveal_duration()).await;
            store.complete_transition();
        }));

        NavigationOutcome::Started
    }

    /// Show the startup overlay if the initial load has not completed yet.
    pub fn start_initial_load(&mut self) -> bool {
        if self.store.is_initial_load_complete() {
            return false;
        }
        self.store.start_initial_load()
    }

    /// Start fading the startup overlay and go idle after `initial_exit_ms`.
    ///
    /// Does nothing unless the startup overlay is covering the page; a
    /// navigation in flight keeps its own sequence.
    ///
    /// Must be called from within a tokio runtime.
    pub fn complete_initial_load(&mut self) {
        if !self.store.complete_initial_enter() {
            return;
        }

        let store = self.store.clone();
        let delay = self.timings.initial_exit_duration();
        self.replace_sequence(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.complete_transition();
        }));
    }

    /// Run the whole startup sequence.
    ///
    /// The overlay stays up until both `min_display_ms` has passed and
    /// `ready` resolves (for example when page resources finish loading),
    /// then fades out. Returns once the store is idle again, or immediately
    /// when the initial load already ran.
    pub async fn run_initial_load<F>(&mut self, ready: F)
    where
        F: Future<Output = ()>,
    {
        if !self.start_initial_load() {
            return;
        }

        let min_display = tokio::time::sleep(self.timings.min_display_duration());
        tokio::join!(min_display, ready);
        tracing::debug!("initial load ready, revealing page");

        self.complete_initial_load();
        self.wait().await;
    }

    /// Wait for the in-flight sequence to finish.
    pub async fn wait(&mut self) {
        if let Some(handle) = self.sequence.take() {
            // A cancelled sequence surfaces as a JoinError; nothing to report
            let _ = handle.await;
        }
    }

    /// Abort pending timers and drop the overlay back to idle.
    ///
    /// Dropping the director only aborts the timers and leaves the store in
    /// whatever phase it reached.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.sequence.take() {
            handle.abort();
            tracing::debug!(phase = ?self.store.phase(), "transition sequence cancelled");
        }
        self.store.reset();
    }

    fn replace_sequence(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.sequence.replace(handle) {
            previous.abort();
        }
    }
}

impl<N> Drop for TransitionDirector<N> {
    fn drop(&mut self) {
        if let Some(handle) = self.sequence.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::{TransitionKind, TransitionPhase};
    use pretty_assertions::assert_eq;

    #[derive(Clone, Default)]
    struct RecordingNavigator {
        pushed: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNavigator {
        fn pushed(&self) -> Vec<String> {
            self.pushed.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn push(&self, url: &str) {
            self.pushed.lock().unwrap().push(url.to_string());
        }
    }

    fn director() -> (TransitionDirector<RecordingNavigator>, RecordingNavigator, TransitionStore) {
        let navigator = RecordingNavigator::default();
        let store = TransitionStore::new();
        let director = TransitionDirector::new(store.clone(), TransitionTimings::default(), navigator.clone());
        (director, navigator, store)
    }

    async fn advance_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn test_classify_link() {
        assert_eq!(classify_link("/blog", "/"), LinkKind::Internal);
        assert_eq!(classify_link("/", "/"), LinkKind::SamePage);
        assert_eq!(classify_link("http://example.com", "/"), LinkKind::External);
        assert_eq!(classify_link("https://example.com/x", "/"), LinkKind::External);
        assert_eq!(classify_link("//cdn.example.com/a.gif", "/"), LinkKind::External);
        assert_eq!(classify_link("mailto:me@example.com", "/"), LinkKind::External);
        assert_eq!(classify_link("tel:+100", "/"), LinkKind::External);
        assert_eq!(classify_link("#top", "/"), LinkKind::Anchor);
        assert!(!LinkKind::Anchor.is_animated());
        assert!(LinkKind::Internal.is_animated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_sequence() {
        let (mut director, navigator, store) = director();

        assert_eq!(director.navigate("/about", "/"), NavigationOutcome::Started);
        assert_eq!(store.phase(), TransitionPhase::Entering);
        assert_eq!(store.state().kind, TransitionKind::Navigation);

        // Not navigated until the overlay fully covers the page
        advance_ms(790).await;
        assert!(navigator.pushed().is_empty());

        advance_ms(20).await; // t = 810
        assert_eq!(navigator.pushed(), vec!["/about".to_string()]);
        assert_eq!(store.phase(), TransitionPhase::Entering);

        advance_ms(800).await; // t = 1610
        assert_eq!(store.phase(), TransitionPhase::Exiting);
        assert!(store.is_transitioning());

        advance_ms(800).await; // t = 2410
        assert_eq!(store.phase(), TransitionPhase::Idle);
        assert_eq!(store.state().target_url, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pass_through_links() {
        let (mut director, navigator, store) = director();

        assert_eq!(director.navigate("/", "/"), NavigationOutcome::PassThrough(LinkKind::SamePage));
        assert_eq!(
            director.navigate("https://github.com", "/"),
            NavigationOutcome::PassThrough(LinkKind::External)
        );
        assert_eq!(director.navigate("#skills", "/"), NavigationOutcome::PassThrough(LinkKind::Anchor));

        advance_ms(3000).await;
        assert!(navigator.pushed().is_empty());
        assert!(!store.is_transitioning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_click_ignored_in_flight() {
        let (mut director, navigator, store) = director();

        director.navigate("/about", "/");
        advance_ms(100).await;
        assert_eq!(director.navigate("/blog", "/"), NavigationOutcome::Ignored);

        director.wait().await;
        assert_eq!(navigator.pushed(), vec!["/about".to_string()]);
        assert!(!store.is_transitioning());

        // Accepted again once idle
        assert_eq!(director.navigate("/blog", "/about"), NavigationOutcome::Started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_pending_timers() {
        let (mut director, navigator, store) = director();

        director.navigate("/about", "/");
        advance_ms(100).await;
        director.cancel();
        assert_eq!(store.phase(), TransitionPhase::Idle);
        assert_eq!(store.state().target_url, None);

        advance_ms(5000).await;
        assert!(navigator.pushed().is_empty());
        assert_eq!(store.phase(), TransitionPhase::Idle);

        // The director is usable again
        assert_eq!(director.navigate("/blog", "/"), NavigationOutcome::Started);
        director.wait().await;
        assert_eq!(navigator.pushed(), vec!["/blog".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_pending_timers() {
        let (mut director, navigator, store) = director();
        director.navigate("/about", "/");
        advance_ms(900).await;
        drop(director);

        advance_ms(5000).await;
        assert_eq!(navigator.pushed().len(), 1);
        assert_eq!(store.phase(), TransitionPhase::Entering);
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_initial_load_waits_before_idle() {
        let (mut director, _navigator, store) = director();

        assert!(director.start_initial_load());
        director.complete_initial_load();
        assert_eq!(store.phase(), TransitionPhase::Exiting);

        advance_ms(890).await;
        assert_eq!(store.phase(), TransitionPhase::Exiting);
        assert!(!store.is_initial_load_complete());

        advance_ms(20).await;
        assert_eq!(store.phase(), TransitionPhase::Idle);
        assert!(store.is_initial_load_complete());

        assert!(!director.start_initial_load());
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_initial_load_leaves_navigation_alone() {
        let (mut director, navigator, store) = director();

        director.navigate("/about", "/");
        advance_ms(100).await;
        director.complete_initial_load();
        assert_eq!(store.phase(), TransitionPhase::Entering);
        assert_eq!(store.state().kind, TransitionKind::Navigation);

        advance_ms(5000).await;
        assert_eq!(navigator.pushed(), vec!["/about".to_string()]);
        assert_eq!(store.phase(), TransitionPhase::Idle);
        assert!(!store.is_initial_load_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_initial_load_honours_min_display() {
        let (mut director, _navigator, store) = director();
        let started = tokio::time::Instant::now();

        // Resources are ready immediately; the overlay still shows for 800 ms
        director.run_initial_load(async {}).await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(800 + 900), "{elapsed:?}");
        assert!(store.is_initial_load_complete());
        assert!(!store.is_transitioning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_initial_load_waits_for_ready() {
        let (mut director, _navigator, store) = director();
        let started = tokio::time::Instant::now();

        director
            .run_initial_load(tokio::time::sleep(Duration::from_millis(2000)))
            .await;

        assert!(started.elapsed() >= Duration::from_millis(2000 + 900));
        assert!(store.is_initial_load_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_initial_load_only_once() {
        let (mut director, _navigator, store) = director();
        director.run_initial_load(async {}).await;

        let started = tokio::time::Instant::now();
        director.run_initial_load(async {}).await;
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(store.is_initial_load_complete());
    }
}
