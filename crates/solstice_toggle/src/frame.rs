//! Frame snapshots and SVG output

use crate::decoration::{ElementGeometry, ElementId};
use crate::icon::{IconState, PoseKey, RAY_PATHS, STAR_PATHS, VIEW_BOX};
use crate::reveal::ClipCircle;
use solstice_path::ring::{format_number, outline_center};
use std::fmt::Write;

/// Everything a host needs to draw the toggle for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct ToggleFrame {
    pub icon: IconState,
    pub animation_complete: bool,
    pub pose: PoseKey,
    pub progress: f32,
    pub body_path: String,
    pub elements: Vec<(ElementId, ElementGeometry)>,
    /// Clip applied to the incoming theme while a reveal runs
    pub clip: Option<ClipCircle>,
}

impl ToggleFrame {
    pub fn geometry(&self, element: ElementId) -> ElementGeometry {
        self.elements
            .iter()
            .find(|(id, _)| *id == element)
            .map(|(_, geometry)| *geometry)
            .unwrap_or_default()
    }
}

fn path_data_for(element: ElementId, body: &str) -> &str {
    match element {
        ElementId::Container => "",
        ElementId::Body => body,
        ElementId::Ray(i) => RAY_PATHS.get(i as usize).copied().unwrap_or_default(),
        ElementId::Star(i) => STAR_PATHS.get(i as usize).copied().unwrap_or_default(),
    }
}

/// SVG transform scaling and rotating about `origin`
fn transform(geometry: &ElementGeometry, origin: (f32, f32)) -> Option<String> {
    let identity = geometry.x == 0.0
        && geometry.y == 0.0
        && geometry.rotate == 0.0
        && geometry.scale == 1.0;
    if identity {
        return None;
    }
    let (ox, oy) = origin;
    Some(format!(
        "translate({} {}) rotate({}) scale({}) translate({} {})",
        format_number(ox + geometry.x),
        format_number(oy + geometry.y),
        format_number(geometry.rotate),
        format_number(geometry.scale),
        format_number(-ox),
        format_number(-oy)
    ))
}

fn origin_of(data: &str) -> (f32, f32) {
    solstice_path::parse_path(data)
        .ok()
        .and_then(|path| outline_center(&path))
        .map_or((VIEW_BOX / 2.0, VIEW_BOX / 2.0), |center| (center.x, center.y))
}

/// Render a frame as a standalone 22x22 SVG document
///
/// Strokes use `currentColor` so the host theme decides the color.
pub fn render_svg(frame: &ToggleFrame) -> String {
    let size = format_number(VIEW_BOX);
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">"#
    );

    let container = frame.geometry(ElementId::Container);
    let center = VIEW_BOX / 2.0;
    match transform(&container, (center, center)) {
        Some(t) => {
            let _ = writeln!(svg, r#"  <g transform="{t}">"#);
        }
        None => svg.push_str("  <g>\n"),
    }

    for (element, geometry) in &frame.elements {
        if *element == ElementId::Container {
            continue;
        }
        let data = path_data_for(*element, &frame.body_path);
        if data.is_empty() {
            continue;
        }

        let _ = write!(svg, r#"    <path data-element="{element}" d="{data}""#);
        if let Some(t) = transform(geometry, origin_of(data)) {
            let _ = write!(svg, r#" transform="{t}""#);
        }
        if *element != ElementId::Body {
            let length = geometry.path_length.clamp(0.0, 1.0);
            let _ = write!(
                svg,
                r#" pathLength="1" stroke-dasharray="{} 1""#,
                format_number(length)
            );
            if length <= 0.0 || geometry.scale <= 0.0 {
                svg.push_str(r#" opacity="0""#);
            }
        }
        svg.push_str("/>\n");
    }

    svg.push_str("  </g>\n</svg>\n");
    svg
}
