//! Mermaid flowchart rendering of an [`ErrorFlow`].
//!
//! The diagram is a single linear chain:
//! `Start([Run]) --> F1["..."] --> ... --> Error["..."]`.

use crate::types::{ErrorFlow, MAX_ERROR_NODE_CHARS, truncate_chars};

/// Mermaid header line for the rendered flowchart.
pub const FLOWCHART_HEADER: &str = "flowchart TD";

/// Render the full flowchart description (header plus chain).
pub fn render_diagram(flow: &ErrorFlow) -> String {
    format!("{FLOWCHART_HEADER}\n    {}\n", render_chain(flow))
}

/// Render only the node chain, without the flowchart header.
pub fn render_chain(flow: &ErrorFlow) -> String {
    let mut nodes = Vec::with_capacity(flow.frames.len() + 2);
    nodes.push("Start([Run])".to_string());
    nodes.extend(
        flow.frames
            .iter()
            .enumerate()
            .map(|(i, frame)| format!("F{}[\"{}\"]", i + 1, escape_node_text(&frame.label))),
    );
    nodes.push(format!("Error[\"{}\"]", escape_node_text(&error_node_text(flow))));
    nodes.join(" --> ")
}

/// Terminal node text: `type: message`, `type`, or `Error`, capped at 50 chars.
pub fn error_node_text(flow: &ErrorFlow) -> String {
    let text = match (&flow.error_type, &flow.error_message) {
        (Some(kind), Some(message)) => format!("{kind}: {message}"),
        (Some(kind), None) => kind.clone(),
        _ => "Error".to_string(),
    };
    truncate_chars(&text, MAX_ERROR_NODE_CHARS)
}

/// Replace characters that would break Mermaid node syntax.
fn escape_node_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '"' => '\'',
            '[' | ']' | '(' | ')' => ' ',
            other => other,
        })
        .collect()
}
