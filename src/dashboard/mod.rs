//! Terminal presentation of the scan session
//!
//! Turns the session state into text. All display formatting (confidence
//! percentages, unknown placeholders) happens here and never in the stored
//! identification.

pub mod console;

use std::fmt::Write;

use crate::app::ScanSession;
use crate::shared::ScanState;
use crate::vision::PlantIdentification;

/// What to include when rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include the wiki description of a match
    pub show_description: bool,
    /// Probe and print the preview's pixel dimensions
    pub probe_preview: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_description: true,
            probe_preview: true,
        }
    }
}

/// Confidence as a percentage with one decimal, e.g. `0.97` -> `"97.0%"`
pub fn format_confidence(probability: Option<f64>) -> Option<String> {
    probability.map(|p| format!("{:.1}%", p * 100.0))
}

/// Render the current session state
pub fn render(session: &ScanSession, options: &RenderOptions) -> String {
    render_state(session.state(), options)
}

/// Render a scan state as a block of text
pub fn render_state(state: &ScanState, options: &RenderOptions) -> String {
    let mut out = String::new();

    let Some(image) = state.image() else {
        out.push_str("No image selected. Use `open <path>` to scan a plant.\n");
        return out;
    };

    let _ = writeln!(out, "Image:   {}", image.name);
    let _ = write!(out, "Preview: {}", image.preview.uri());
    if options.probe_preview {
        if let Some((w, h)) = image.preview.dimensions() {
            let _ = write!(out, " ({}x{})", w, h);
        }
    }
    out.push('\n');

    match state {
        ScanState::Idle => {}
        ScanState::Previewing { .. } => out.push_str("Status:  Preparing scan...\n"),
        ScanState::Scanning { .. } => out.push_str("Status:  Identifying plant...\n"),
        ScanState::Success { result, .. } => {
            out.push_str("Status:  Identified\n");
            render_identification(&mut out, result, options);
        }
        ScanState::Failed { reason, .. } => {
            let _ = writeln!(out, "Status:  Failed ({})", reason);
        }
    }

    out
}

fn render_identification(out: &mut String, result: &PlantIdentification, options: &RenderOptions) {
    let unknown = "Unknown";

    let _ = writeln!(
        out,
        "Species:      {}",
        result.scientific_name.as_deref().unwrap_or(unknown)
    );
    let common = match &result.common_names {
        Some(names) if !names.is_empty() => names.join(", "),
        Some(_) => "None listed".to_string(),
        None => unknown.to_string(),
    };
    let _ = writeln!(out, "Common names: {}", common);
    let _ = writeln!(
        out,
        "Confidence:   {}",
        format_confidence(result.probability).as_deref().unwrap_or(unknown)
    );
    let _ = writeln!(out, "Family:       {}", result.family.as_deref().unwrap_or(unknown));
    let _ = writeln!(out, "Genus:        {}", result.genus.as_deref().unwrap_or(unknown));

    if options.show_description {
        if let Some(description) = &result.description {
            let _ = writeln!(out, "\n{}", description.trim());
        }
    }
}
