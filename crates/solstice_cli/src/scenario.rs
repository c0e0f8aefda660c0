//! Headless toggle scenarios
//!
//! A scenario describes the starting theme, the page around the toggle, and
//! a list of input steps:
//!
//! ```json
//! {
//!   "theme": "light",
//!   "steps": [
//!     { "type": "click" },
//!     { "type": "wait", "ms": 300 },
//!     { "type": "select_theme", "theme": "dark" }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solstice_core::{Rect, Size};
use solstice_theme::{ColorScheme, InMemoryThemeProvider, SwitchPlan, ThemePreference, ThemeProvider};
use solstice_toggle::{
    HeadlessEnvironment, IconState, Phase, PoseKey, ToggleConfig, ToggleCoordinator, ToggleStats,
};
use std::path::Path;

/// Upper bound on the settle phase after the last step
const SETTLE_LIMIT_MS: f32 = 10_000.0;

/// Starting conditions and input steps
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default)]
    pub system: ColorScheme,
    /// Width and height in pixels
    #[serde(default = "default_viewport")]
    pub viewport: [f32; 2],
    /// Toggle bounds as x, y, width, height; `null` when not laid out
    #[serde(default = "default_bounds")]
    pub bounds: Option<[f32; 4]>,
    #[serde(default)]
    pub reduced_motion: bool,
    #[serde(default = "default_true")]
    pub view_transitions: bool,
    /// Hold view transitions until a `ready` step
    #[serde(default)]
    pub manual_ready: bool,
    /// Keep ticking after the last step until nothing animates
    #[serde(default = "default_true")]
    pub settle: bool,
    pub steps: Vec<ScenarioStep>,
}

fn default_viewport() -> [f32; 2] {
    [800.0, 600.0]
}

fn default_bounds() -> Option<[f32; 4]> {
    Some([100.0, 50.0, 40.0, 40.0])
}

fn default_true() -> bool {
    true
}

impl Scenario {
    /// Load a scenario from JSON text
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn environment(&self) -> HeadlessEnvironment {
        let [width, height] = self.viewport;
        let bounds = self.bounds.map(|[x, y, w, h]| Rect::new(x, y, w, h));
        let environment = HeadlessEnvironment::new(Size::new(width, height), bounds)
            .with_reduced_motion(self.reduced_motion)
            .with_view_transitions(self.view_transitions);
        if self.manual_ready {
            environment.manual_ready()
        } else {
            environment
        }
    }
}

/// One scripted input
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Click,
    HoverEnter,
    HoverLeave,
    SelectTheme { theme: ThemePreference },
    /// Flip the OS color scheme
    SystemTheme { scheme: ColorScheme },
    Wait { ms: u32 },
    Tick { frames: u32 },
    /// Resolve pending view transitions
    Ready,
    /// Abandon pending view transitions
    Abort,
}

impl ScenarioStep {
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::Click => "click",
            ScenarioStep::HoverEnter => "hover_enter",
            ScenarioStep::HoverLeave => "hover_leave",
            ScenarioStep::SelectTheme { .. } => "select_theme",
            ScenarioStep::SystemTheme { .. } => "system_theme",
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::Ready => "ready",
            ScenarioStep::Abort => "abort",
        }
    }
}

/// Frame pacing for a run
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub frame_ms: f32,
}

impl RunOptions {
    pub fn from_fps(fps: u32) -> Self {
        Self {
            frame_ms: 1000.0 / fps.max(1) as f32,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_fps(60)
    }
}

/// State right after a step was applied
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub step: &'static str,
    pub elapsed_ms: f64,
    pub icon: IconState,
    pub animation_complete: bool,
    pub resolved: ColorScheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<SwitchPlan>,
}

/// Reveal that ran during the scenario
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RevealSummary {
    pub center: [f32; 2],
    pub max_radius: f32,
}

/// Outcome of a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub frames: u64,
    pub elapsed_ms: f64,
    pub steps: Vec<StepRecord>,
    pub icon: IconState,
    pub animation_complete: bool,
    pub phase: Phase,
    pub pose: PoseKey,
    pub progress: f32,
    pub theme: ThemePreference,
    pub resolved: ColorScheme,
    pub stats: ToggleStats,
    pub last_reveal: Option<RevealSummary>,
}

type HeadlessToggle = ToggleCoordinator<InMemoryThemeProvider, HeadlessEnvironment>;

fn advance(toggle: &mut HeadlessToggle, ms: f32, options: RunOptions) {
    let mut elapsed = 0.0;
    while elapsed < ms {
        toggle.tick(options.frame_ms);
        elapsed += options.frame_ms;
    }
}

/// Execute a scenario against a headless toggle
pub fn run_scenario(scenario: &Scenario, config: ToggleConfig, options: RunOptions) -> Result<RunReport> {
    let provider = InMemoryThemeProvider::new(scenario.theme, scenario.system);
    let mut toggle = ToggleCoordinator::mount(provider, scenario.environment(), config)
        .context("Failed to mount toggle")?;

    let mut records = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let mut plan = None;
        match step {
            ScenarioStep::Click => toggle.click(),
            ScenarioStep::HoverEnter => toggle.hover_enter(),
            ScenarioStep::HoverLeave => toggle.hover_leave(),
            ScenarioStep::SelectTheme { theme } => plan = Some(toggle.select_theme(*theme)),
            ScenarioStep::SystemTheme { scheme } => toggle.provider_mut().set_system_theme(*scheme),
            ScenarioStep::Wait { ms } => advance(&mut toggle, *ms as f32, options),
            ScenarioStep::Tick { frames } => {
                for _ in 0..*frames {
                    toggle.tick(options.frame_ms);
                }
            }
            ScenarioStep::Ready => {
                toggle.environment_mut().resolve_ready();
            }
            ScenarioStep::Abort => {
                toggle.environment_mut().abort_pending();
            }
        }
        tracing::debug!("scenario: step {} {}", index, step.name());

        let state = toggle.state();
        records.push(StepRecord {
            index,
            step: step.name(),
            elapsed_ms: toggle.scheduler().elapsed_ms(),
            icon: state.current_index,
            animation_complete: state.animation_complete,
            resolved: toggle.provider().resolved_theme(),
            plan,
        });
    }

    if scenario.settle {
        let mut waited = 0.0;
        while toggle.is_animating() && waited < SETTLE_LIMIT_MS {
            toggle.tick(options.frame_ms);
            waited += options.frame_ms;
        }
        if toggle.is_animating() {
            tracing::warn!("scenario: still animating after {} ms", SETTLE_LIMIT_MS);
        }
    }

    let state = toggle.state();
    let last_reveal = toggle.reveal().geometry().map(|geometry| RevealSummary {
        center: [geometry.center.x, geometry.center.y],
        max_radius: geometry.max_radius,
    });

    Ok(RunReport {
        frames: toggle.scheduler().frame(),
        elapsed_ms: toggle.scheduler().elapsed_ms(),
        steps: records,
        icon: state.current_index,
        animation_complete: state.animation_complete,
        phase: toggle.phase(),
        pose: toggle.decoration().pose(),
        progress: toggle.morph().progress(),
        theme: toggle.provider().theme(),
        resolved: toggle.provider().resolved_theme(),
        stats: toggle.stats(),
        last_reveal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_parse_from_tagged_json() {
        let scenario = Scenario::from_json(
            r#"{"steps":[
                {"type":"click"},
                {"type":"wait","ms":300},
                {"type":"select_theme","theme":"system"},
                {"type":"system_theme","scheme":"dark"},
                {"type":"ready"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(scenario.steps.len(), 5);
        assert!(matches!(scenario.steps[1], ScenarioStep::Wait { ms: 300 }));
        assert!(matches!(
            scenario.steps[2],
            ScenarioStep::SelectTheme {
                theme: ThemePreference::System
            }
        ));
        assert_eq!(scenario.theme, ThemePreference::System);
        assert_eq!(scenario.bounds, Some([100.0, 50.0, 40.0, 40.0]));
        assert!(scenario.settle);
    }

    #[test]
    fn unknown_step_is_rejected() {
        assert!(Scenario::from_json(r#"{"steps":[{"type":"double_click"}]}"#).is_err());
    }

    #[test]
    fn null_bounds_means_unmeasured() {
        let scenario = Scenario::from_json(r#"{"bounds":null,"steps":[]}"#).unwrap();
        assert_eq!(scenario.bounds, None);
    }

    #[test]
    fn frame_pacing() {
        assert!((RunOptions::from_fps(50).frame_ms - 20.0).abs() < 1e-6);
        assert!(RunOptions::from_fps(0).frame_ms.is_finite());
    }
}
