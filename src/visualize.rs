//! Visualization payload handed to a diagram front end.

use errflow_parser::{ErrorFlow, Frame, render_diagram};
use serde::Serialize;

/// Everything a renderer needs to draw one error flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationPayload {
    /// Mermaid flowchart source.
    pub diagram: String,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
    pub frames: Vec<Frame>,
}

impl VisualizationPayload {
    pub fn from_flow(flow: &ErrorFlow) -> Self {
        Self {
            diagram: render_diagram(flow),
            error_type: flow.error_type.clone(),
            error_message: flow.error_message.clone(),
            frames: flow.frames.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Render Mermaid source to an SVG document.
#[cfg(feature = "mermaid")]
pub fn render_svg(diagram: &str) -> anyhow::Result<String> {
    let opts = mermaid_rs_renderer::RenderOptions {
        theme: mermaid_rs_renderer::Theme::modern(),
        layout: mermaid_rs_renderer::LayoutConfig::default(),
    };
    let svg = mermaid_rs_renderer::render_with_options(diagram, opts)
        .map_err(|e| anyhow::anyhow!("Mermaid render failed: {e}"))?;
    log::debug!("Mermaid SVG generated ({} bytes)", svg.len());
    Ok(svg)
}

#[cfg(not(feature = "mermaid"))]
pub fn render_svg(_diagram: &str) -> anyhow::Result<String> {
    anyhow::bail!("SVG output requires errflow to be built with the `mermaid` feature")
}
