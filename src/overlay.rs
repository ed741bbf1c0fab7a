//! Overlay layer animation descriptors.
//!
//! A transition shows two full-screen layers. Their target position, shape and
//! timing depend only on the transition state and [`TransitionTimings`]; this
//! module computes them so any backend (CSS, canvas, terminal) can animate
//! towards the returned frame.

use crate::{TransitionKind, TransitionPhase, TransitionState, TransitionTimings};

/// Horizontal offset of a layer resting off screen, in percent of the viewport.
pub const OFFSCREEN_OFFSET: f64 = 100.0;

/// Corner radius applied while a layer slides away.
pub const EXIT_BORDER_RADIUS_PX: f64 = 48.0;

/// The two overlay layers, bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayLayer {
    /// Accent-coloured layer; first in, last out
    Backdrop,
    /// Page-coloured layer carrying the loading indicator; last in, first out
    Curtain,
}

impl OverlayLayer {
    pub const ALL: [OverlayLayer; 2] = [OverlayLayer::Backdrop, OverlayLayer::Curtain];

    /// Stacking order for the layer.
    pub fn z_index(self) -> i32 {
        match self {
            OverlayLayer::Backdrop => 9998,
            OverlayLayer::Curtain => 9999,
        }
    }
}

/// Animation easing curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseInOut,
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Easing used by navigation overlays.
    pub const NAVIGATION: Easing = Easing::CubicBezier(0.76, 0.0, 0.24, 1.0);

    pub fn css(&self) -> String {
        match self {
            Easing::Linear => "linear".to_string(),
            Easing::EaseInOut => "ease-in-out".to_string(),
            Easing::CubicBezier(x1, y1, x2, y2) => format!("cubic-bezier({x1}, {y1}, {x2}, {y2})"),
        }
    }
}

/// Target appearance of one overlay layer and how to animate towards it.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerFrame {
    pub layer: OverlayLayer,
    /// Horizontal offset in percent of the viewport width
    pub offset_x_percent: f64,
    /// Opacity in `[0, 1]`
    pub opacity: f64,
    pub border_radius_px: f64,
    pub duration_ms: u64,
    pub delay_ms: u64,
    pub easing: Easing,
}

impl LayerFrame {
    /// Resting position of a layer before it enters.
    pub fn resting(layer: OverlayLayer) -> Self {
        Self {
            layer,
            offset_x_percent: OFFSCREEN_OFFSET,
            opacity: 1.0,
            border_radius_px: 0.0,
            duration_ms: 0,
            delay_ms: 0,
            easing: Easing::Linear,
        }
    }

    /// Time until this layer reaches its target.
    #[inline]
    pub fn settled_after_ms(&self) -> u64 {
        self.delay_ms + self.duration_ms
    }

    pub fn transform_css(&self) -> String {
        format!("translateX({}%)", self.offset_x_percent)
    }

    pub fn border_radius_css(&self) -> String {
        format!("{}px", self.border_radius_px)
    }

    pub fn opacity_css(&self) -> String {
        format!("{}", self.opacity)
    }

    /// CSS `transition` shorthand covering every animated property.
    pub fn transition_css(&self) -> String {
        let easing = self.easing.css();
        ["transform", "border-radius", "opacity"]
            .iter()
            .map(|prop| format!("{prop} {}ms {easing} {}ms", self.duration_ms, self.delay_ms))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Compute both layer frames for the given state.
///
/// Returns `None` when no transition is in progress.
///
/// ## Example
///
/// ```rust
/// use ascii_stage::{overlay_frames, TransitionStore, TransitionTimings};
///
/// let store = TransitionStore::new();
/// let timings = TransitionTimings::default();
/// assert!(overlay_frames(&store.state(), &timings).is_none());
///
/// store.start_transition("/about");
/// let [backdrop, curtain] = overlay_frames(&store.state(), &timings).unwrap();
/// assert_eq!(backdrop.offset_x_percent, 0.0);
/// assert_eq!(curtain.delay_ms, timings.layer_stagger_ms);
/// ```
pub fn overlay_frames(state: &TransitionState, timings: &TransitionTimings) -> Option<[LayerFrame; 2]> {
    if !state.is_transitioning {
        return None;
    }

    let frames = match (state.kind, state.phase) {
        (_, TransitionPhase::Idle) => return None,
        (TransitionKind::Navigation, TransitionPhase::Entering) => OverlayLayer::ALL.map(|layer| LayerFrame {
            layer,
            offset_x_percent: 0.0,
            opacity: 1.0,
            border_radius_px: 0.0,
            duration_ms: timings.enter_ms,
            delay_ms: match layer {
                OverlayLayer::Backdrop => 0,
                OverlayLayer::Curtain => timings.layer_stagger_ms,
            },
            easing: Easing::NAVIGATION,
        }),
        (TransitionKind::Navigation, TransitionPhase::Exiting) => OverlayLayer::ALL.map(|layer| LayerFrame {
            layer,
            offset_x_percent: match layer {
                OverlayLayer::Backdrop => 120.0,
                OverlayLayer::Curtain => OFFSCREEN_OFFSET,
            },
            opacity: 1.0,
            border_radius_px: EXIT_BORDER_RADIUS_PX,
            duration_ms: timings.exit_ms,
            delay_ms: match layer {
                OverlayLayer::Backdrop => timings.layer_stagger_ms,
                OverlayLayer::Curtain => 0,
            },
            easing: Easing::NAVIGATION,
        }),
        // The startup overlay is already in place on first paint
        (TransitionKind::Initial, TransitionPhase::Entering) => OverlayLayer::ALL.map(|layer| LayerFrame {
            offset_x_percent: 0.0,
            ..LayerFrame::resting(layer)
        }),
        (TransitionKind::Initial, TransitionPhase::Exiting) => OverlayLayer::ALL.map(|layer| LayerFrame {
            layer,
            offset_x_percent: 0.0,
            opacity: 0.0,
            border_radius_px: 0.0,
            duration_ms: timings.initial_fade_ms,
            delay_ms: 0,
            easing: Easing::EaseInOut,
        }),
    };

    Some(frames)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::TransitionStore;
    use pretty_assertions::assert_eq;

    fn frames_for(store: &TransitionStore) -> [LayerFrame; 2] {
        overlay_frames(&store.state(), &TransitionTimings::default()).unwrap()
    }

    #[test]
    fn test_idle_has_no_overlay() {
        let store = TransitionStore::new();
        assert_eq!(overlay_frames(&store.state(), &TransitionTimings::default()), None);
    }

    #[test]
    fn test_navigation_enter_covers_before_navigation() {
        let timings = TransitionTimings::default();
        let store = TransitionStore::new();
        store.start_transition("/about");

        let frames = frames_for(&store);
        for frame in &frames {
            assert_eq!(frame.offset_x_percent, 0.0);
            assert_eq!(frame.easing, Easing::NAVIGATION);
            assert!(Duration::from_millis(frame.settled_after_ms()) <= timings.cover_duration());
        }
        assert_eq!(frames[0].layer, OverlayLayer::Backdrop);
        assert_eq!(frames[0].delay_ms, 0);
        assert_eq!(frames[1].delay_ms, 150);
    }

    #[test]
    fn test_navigation_exit_clears_before_reset() {
        let timings = TransitionTimings::default();
        let store = TransitionStore::new();
        store.start_transition("/about");
        store.complete_enter();

        let [backdrop, curtain] = frames_for(&store);
        assert_eq!(backdrop.offset_x_percent, 120.0);
        assert_eq!(curtain.offset_x_percent, 100.0);
        assert_eq!(backdrop.border_radius_px, EXIT_BORDER_RADIUS_PX);
        assert_eq!(curtain.delay_ms, 0);
        assert_eq!(backdrop.delay_ms, 150);
        for frame in [&backdrop, &curtain] {
            assert!(Duration::from_millis(frame.settled_after_ms()) <= timings.reveal_duration());
        }
    }

    #[test]
    fn test_initial_load_fades() {
        let timings = TransitionTimings::default();
        let store = TransitionStore::new();
        store.start_initial_load();
        let frames = frames_for(&store);
        assert!(frames.iter().all(|f| f.opacity == 1.0 && f.duration_ms == 0));

        store.complete_enter();
        let frames = frames_for(&store);
        for frame in &frames {
            assert_eq!(frame.opacity, 0.0);
            assert_eq!(frame.easing, Easing::EaseInOut);
            assert!(Duration::from_millis(frame.settled_after_ms()) <= timings.initial_exit_duration());
        }
    }

    #[test]
    fn test_css_output() {
        let frame = LayerFrame {
            layer: OverlayLayer::Curtain,
            offset_x_percent: 120.0,
            opacity: 1.0,
            border_radius_px: 48.0,
            duration_ms: 650,
            delay_ms: 150,
            easing: Easing::NAVIGATION,
        };
        assert_eq!(frame.transform_css(), "translateX(120%)");
        assert_eq!(frame.border_radius_css(), "48px");
        assert_eq!(frame.opacity_css(), "1");
        assert_eq!(
            frame.transition_css(),
            "transform 650ms cubic-bezier(0.76, 0, 0.24, 1) 150ms, \
             border-radius 650ms cubic-bezier(0.76, 0, 0.24, 1) 150ms, \
             opacity 650ms cubic-bezier(0.76, 0, 0.24, 1) 150ms"
        );
    }

    #[test]
    fn test_layer_order() {
        assert!(OverlayLayer::Curtain.z_index() > OverlayLayer::Backdrop.z_index());
    }
}
