//! DOM helpers for hosts running in the browser.
//!
//! Playback and sequencing stay in the platform-agnostic modules; these
//! functions only write their output onto elements.

use web_sys::{Element, HtmlElement};

use crate::config::RendererConfig;
use crate::overlay::LayerFrame;

/// Apply a layer frame's target styles and transition to an overlay element.
///
/// ## Example
///
/// ```rust,ignore
/// use ascii_stage::{overlay_frames, web::apply_layer_frame};
///
/// if let Some(frames) = overlay_frames(&store.state(), &timings) {
///     for (element, frame) in overlay_elements.iter().zip(frames.iter()) {
///         apply_layer_frame(element, frame)?;
///     }
/// }
/// ```
pub fn apply_layer_frame(element: &HtmlElement, frame: &LayerFrame) -> Result<(), String> {
    let style = element.style();
    let z_index = frame.layer.z_index().to_string();
    let properties = [
        ("position", "fixed".to_string()),
        ("inset", "0".to_string()),
        ("z-index", z_index),
        ("transition", frame.transition_css()),
        ("transform", frame.transform_css()),
        ("border-radius", frame.border_radius_css()),
        ("opacity", frame.opacity_css()),
    ];

    for (name, value) in &properties {
        style
            .set_property(name, value)
            .map_err(|_| format!("Failed to set overlay style {name}"))?;
    }
    Ok(())
}

/// Style an element as the ASCII text block.
pub fn style_ascii_block(element: &HtmlElement, config: &RendererConfig) -> Result<(), String> {
    let style = element.style();
    let font_size = format!("{}px", config.font_size_px);
    let properties = [
        ("font-family", "monospace"),
        ("white-space", "pre"),
        ("letter-spacing", "0"),
        ("pointer-events", "none"),
        ("font-size", font_size.as_str()),
        ("line-height", font_size.as_str()),
    ];

    for (name, value) in properties {
        style
            .set_property(name, value)
            .map_err(|_| format!("Failed to set text style {name}"))?;
    }
    element
        .set_attribute("aria-hidden", "true")
        .map_err(|_| "Failed to set aria-hidden".to_string())?;
    Ok(())
}

/// Replace the element's text with a rendered ASCII frame.
pub fn write_text(element: &Element, text: &str) {
    element.set_text_content(Some(text));
}
