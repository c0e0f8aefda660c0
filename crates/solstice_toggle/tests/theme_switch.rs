//! Theme selection, reveal transitions and environment fallbacks

use solstice_core::{Point, Rect, Size};
use solstice_theme::{ColorScheme, InMemoryThemeProvider, SwitchPlan, ThemePreference, ThemeProvider};
use solstice_toggle::{HeadlessEnvironment, IconState, ToggleConfig, ToggleCoordinator};

type Toggle = ToggleCoordinator<InMemoryThemeProvider, HeadlessEnvironment>;

fn mount(theme: ThemePreference, system: ColorScheme, environment: HeadlessEnvironment) -> Toggle {
    ToggleCoordinator::mount(
        InMemoryThemeProvider::new(theme, system),
        environment,
        ToggleConfig::default(),
    )
    .unwrap()
}

fn run_for(toggle: &mut Toggle, ms: f32) {
    let mut elapsed = 0.0;
    while elapsed < ms {
        toggle.tick(16.0);
        elapsed += 16.0;
    }
}

#[test]
fn system_matching_os_commits_quietly() {
    let mut toggle = mount(ThemePreference::Light, ColorScheme::Light, HeadlessEnvironment::default());

    assert_eq!(toggle.select_theme(ThemePreference::System), SwitchPlan::Commit);
    run_for(&mut toggle, 100.0);

    assert_eq!(toggle.provider().theme(), ThemePreference::System);
    assert_eq!(toggle.environment().transitions_started(), 0);
    assert_eq!(toggle.reveal().play_count(), 0);
    assert_eq!(toggle.current_icon(), IconState::Moon);
}

#[test]
fn system_when_already_system_does_nothing() {
    let mut toggle = mount(ThemePreference::System, ColorScheme::Dark, HeadlessEnvironment::default());
    assert_eq!(toggle.select_theme(ThemePreference::System), SwitchPlan::Ignore);
    assert_eq!(toggle.provider().commit_count(), 0);
    assert_eq!(toggle.environment().transitions_started(), 0);
}

#[test]
fn selecting_the_resolved_theme_commits_quietly() {
    let mut toggle = mount(ThemePreference::System, ColorScheme::Dark, HeadlessEnvironment::default());
    assert_eq!(toggle.select_theme(ThemePreference::Dark), SwitchPlan::Commit);
    assert_eq!(toggle.provider().theme(), ThemePreference::Dark);
    assert_eq!(toggle.environment().transitions_started(), 0);
}

#[test]
fn dark_from_light_reveals_from_control_center() {
    let environment = HeadlessEnvironment::new(
        Size::new(800.0, 600.0),
        Some(Rect::new(100.0, 50.0, 40.0, 40.0)),
    );
    let mut toggle = mount(ThemePreference::Light, ColorScheme::Light, environment);

    assert_eq!(toggle.select_theme(ThemePreference::Dark), SwitchPlan::CommitWithReveal);
    // The swap is committed inside the transition, before any reveal frame
    assert_eq!(toggle.provider().resolved_theme(), ColorScheme::Dark);
    assert!(toggle.reveal().is_active());

    toggle.tick(16.0);
    assert_eq!(toggle.environment().transitions_started(), 1);
    assert_eq!(toggle.reveal().play_count(), 1);

    let geometry = toggle.reveal().geometry().unwrap();
    assert_eq!(geometry.center, Point::new(120.0, 70.0));
    assert!((geometry.max_radius - 680.0f32.hypot(530.0)).abs() < 1e-3);
    assert!((geometry.max_radius - 862.3).abs() < 0.2);

    let clip = toggle.frame().clip.unwrap();
    assert_eq!(clip.center, Point::new(120.0, 70.0));
    assert!(clip.to_css().starts_with("circle("));

    run_for(&mut toggle, 900.0);
    assert!(!toggle.reveal().is_active());
    assert!(toggle.frame().clip.is_none());
    assert_eq!(toggle.stats().reveals_finished, 1);
    assert_eq!(toggle.reveal().play_count(), 1);

    // The page went dark, so the icon followed to the sun
    assert_eq!(toggle.current_icon(), IconState::Sun);
}

#[test]
fn reduced_motion_skips_reveal() {
    let environment = HeadlessEnvironment::default().with_reduced_motion(true);
    let mut toggle = mount(ThemePreference::Light, ColorScheme::Light, environment);

    assert_eq!(toggle.select_theme(ThemePreference::Dark), SwitchPlan::Commit);
    run_for(&mut toggle, 100.0);

    assert_eq!(toggle.provider().resolved_theme(), ColorScheme::Dark);
    assert_eq!(toggle.environment().transitions_started(), 0);
    assert_eq!(toggle.reveal().play_count(), 0);
    assert_eq!(toggle.stats().reveals_skipped, 1);
}

#[test]
fn missing_support_or_bounds_skips_reveal() {
    let unsupported = HeadlessEnvironment::default().with_view_transitions(false);
    let mut toggle = mount(ThemePreference::Dark, ColorScheme::Dark, unsupported);
    assert_eq!(toggle.select_theme(ThemePreference::Light), SwitchPlan::Commit);
    assert_eq!(toggle.provider().resolved_theme(), ColorScheme::Light);
    assert_eq!(toggle.environment().transitions_started(), 0);

    let unmeasured = HeadlessEnvironment::new(Size::new(800.0, 600.0), None);
    let mut toggle = mount(ThemePreference::Dark, ColorScheme::Dark, unmeasured);
    assert_eq!(toggle.select_theme(ThemePreference::Light), SwitchPlan::Commit);
    assert_eq!(toggle.environment().transitions_started(), 0);
}

#[test]
fn reveal_waits_for_ready() {
    let environment = HeadlessEnvironment::default().manual_ready();
    let mut toggle = mount(ThemePreference::Light, ColorScheme::Light, environment);

    toggle.select_theme(ThemePreference::Dark);
    run_for(&mut toggle, 200.0);
    assert_eq!(toggle.reveal().play_count(), 0);
    assert!(toggle.reveal().is_active());
    assert!(toggle.frame().clip.is_none());

    // A second selection while the first is in flight does not stack reveals
    assert_eq!(toggle.select_theme(ThemePreference::Light), SwitchPlan::Commit);
    assert_eq!(toggle.environment().transitions_started(), 1);

    toggle.environment_mut().resolve_ready();
    toggle.tick(16.0);
    assert_eq!(toggle.reveal().play_count(), 1);
    assert!(toggle.frame().clip.is_some());
}

#[test]
fn abandoned_transition_keeps_theme() {
    let environment = HeadlessEnvironment::default().manual_ready();
    let mut toggle = mount(ThemePreference::Light, ColorScheme::Light, environment);

    toggle.select_theme(ThemePreference::Dark);
    toggle.environment_mut().abort_pending();
    toggle.tick(16.0);

    assert!(!toggle.reveal().is_active());
    assert_eq!(toggle.reveal().play_count(), 0);
    assert_eq!(toggle.stats().reveals_aborted, 1);
    assert_eq!(toggle.provider().resolved_theme(), ColorScheme::Dark);
}

#[test]
fn click_during_reveal_only_moves_icon() {
    let mut toggle = mount(ThemePreference::Light, ColorScheme::Light, HeadlessEnvironment::default());
    toggle.select_theme(ThemePreference::Dark);
    run_for(&mut toggle, 100.0);
    assert!(toggle.reveal().is_active());

    toggle.click();
    run_for(&mut toggle, 1000.0);

    assert_eq!(toggle.reveal().play_count(), 1);
    assert_eq!(toggle.stats().reveals_finished, 1);
    assert_eq!(toggle.provider().resolved_theme(), ColorScheme::Dark);
    assert_eq!(toggle.current_icon(), IconState::Moon);
}

#[test]
fn dropping_unsubscribes() {
    let mut provider = InMemoryThemeProvider::new(ThemePreference::Light, ColorScheme::Light);
    {
        let toggle = ToggleCoordinator::mount(
            &mut provider,
            HeadlessEnvironment::default(),
            ToggleConfig::default(),
        )
        .unwrap();
        assert!(toggle.is_mounted());
    }
    assert_eq!(provider.listener_count(), 0);
    provider.set_system_theme(ColorScheme::Dark);
}
