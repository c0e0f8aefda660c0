//! End-to-end scenario runs

use solstice_cli::{run_scenario, RunOptions, Scenario};
use solstice_theme::{ColorScheme, SwitchPlan, ThemePreference};
use solstice_toggle::{IconState, Phase, PoseKey, ToggleConfig};
use std::io::Write;

#[test]
fn bundled_reveal_scenario() {
    let scenario = Scenario::from_json(include_str!("../scenarios/reveal.json")).unwrap();
    let report = run_scenario(&scenario, ToggleConfig::default(), RunOptions::default()).unwrap();

    let plans: Vec<SwitchPlan> = report.steps.iter().filter_map(|step| step.plan).collect();
    assert_eq!(plans, vec![SwitchPlan::CommitWithReveal, SwitchPlan::CommitWithReveal]);

    assert_eq!(report.theme, ThemePreference::System);
    assert_eq!(report.resolved, ColorScheme::Dark);
    assert_eq!(report.icon, IconState::Sun);
    assert_eq!(report.pose, PoseKey::Sun);
    assert_eq!(report.phase, Phase::Idle);
    assert!(report.animation_complete);
    assert_eq!(report.stats.clicks, 3);
    assert_eq!(report.stats.reveals_finished, 2);

    let reveal = report.last_reveal.unwrap();
    assert_eq!(reveal.center, [120.0, 70.0]);
    assert!((reveal.max_radius - 862.3).abs() < 0.2);
}

#[test]
fn clicks_alternate_icon_per_step() {
    let scenario = Scenario::from_json(
        r#"{"theme":"dark","system":"light","steps":[
            {"type":"click"},
            {"type":"click"},
            {"type":"click"}
        ]}"#,
    )
    .unwrap();
    let report = run_scenario(&scenario, ToggleConfig::default(), RunOptions::default()).unwrap();

    let icons: Vec<IconState> = report.steps.iter().map(|step| step.icon).collect();
    assert_eq!(icons, vec![IconState::Moon, IconState::Sun, IconState::Moon]);
    assert!(report.steps.iter().all(|step| !step.animation_complete));

    // Settling runs until every tween is done
    assert!(report.animation_complete);
    assert_eq!(report.progress, 1.0);
    // Clicks never touch the theme
    assert_eq!(report.resolved, ColorScheme::Dark);
}

#[test]
fn manual_ready_and_abort() {
    let scenario = Scenario::from_json(
        r#"{"theme":"light","manual_ready":true,"steps":[
            {"type":"select_theme","theme":"dark"},
            {"type":"wait","ms":100},
            {"type":"abort"}
        ]}"#,
    )
    .unwrap();
    let report = run_scenario(&scenario, ToggleConfig::default(), RunOptions::from_fps(30)).unwrap();

    assert_eq!(report.stats.reveals_requested, 1);
    assert_eq!(report.stats.reveals_aborted, 1);
    assert_eq!(report.stats.reveals_started, 0);
    assert!(report.last_reveal.is_none());
    assert_eq!(report.resolved, ColorScheme::Dark);
}

#[test]
fn scenario_from_file_and_json_report() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"reduced_motion":true,"steps":[{{"type":"select_theme","theme":"dark"}}]}}"#
    )
    .unwrap();

    let scenario = Scenario::from_path(file.path()).unwrap();
    let report = run_scenario(&scenario, ToggleConfig::default(), RunOptions::default()).unwrap();
    assert_eq!(report.steps[0].plan, Some(SwitchPlan::Commit));
    assert_eq!(report.stats.reveals_skipped, 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["resolved"], "dark");
    assert_eq!(json["steps"][0]["plan"], "commit");
    assert_eq!(json["phase"], "idle");
}

#[test]
fn missing_scenario_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Scenario::from_path(&dir.path().join("nope.json")).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.json"));
}
