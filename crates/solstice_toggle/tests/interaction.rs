//! Click and hover behavior of the mounted toggle

use solstice_theme::{ColorScheme, InMemoryThemeProvider, ThemePreference};
use solstice_toggle::{
    ElementId, HeadlessEnvironment, IconState, Phase, PoseKey, ToggleConfig, ToggleCoordinator,
};

type Toggle = ToggleCoordinator<InMemoryThemeProvider, HeadlessEnvironment>;

const FRAME_MS: f32 = 16.0;

/// Mounted on a dark page, so the sun (index 0) is showing
fn dark_toggle() -> Toggle {
    ToggleCoordinator::mount(
        InMemoryThemeProvider::new(ThemePreference::Dark, ColorScheme::Light),
        HeadlessEnvironment::default(),
        ToggleConfig::default(),
    )
    .unwrap()
}

fn run_for(toggle: &mut Toggle, ms: f32) {
    let mut elapsed = 0.0;
    while elapsed < ms {
        toggle.tick(FRAME_MS);
        elapsed += FRAME_MS;
    }
}

fn settle(toggle: &mut Toggle) {
    run_for(toggle, 2000.0);
    assert!(!toggle.is_animating());
}

#[test]
fn click_count_parity() {
    let mut toggle = dark_toggle();
    assert_eq!(toggle.current_icon(), IconState::Sun);

    for clicks in 1..=6 {
        toggle.click();
        settle(&mut toggle);
        assert_eq!(toggle.current_icon().index(), clicks % 2);
    }
}

#[test]
fn double_click_mid_flight_returns_to_start() {
    let mut toggle = dark_toggle();
    toggle.click();
    run_for(&mut toggle, 100.0);
    toggle.click();
    settle(&mut toggle);
    assert_eq!(toggle.current_icon(), IconState::Sun);
    assert_eq!(toggle.morph().progress(), 0.0);
}

#[test]
fn click_sets_rest_pose_synchronously() {
    let mut toggle = dark_toggle();
    for clicks in 1..=5usize {
        toggle.click();
        let expected = IconState::from_index(clicks % 2).unwrap();
        assert_eq!(toggle.decoration().pose(), PoseKey::rest(expected));
        assert!(!toggle.decoration().pose().is_hover());
        // Interleave partial progress so some clicks land mid-transition
        run_for(&mut toggle, 120.0 * clicks as f32);
    }
}

#[test]
fn rest_geometry_after_settling() {
    let mut toggle = dark_toggle();
    toggle.click();
    settle(&mut toggle);

    let table = toggle.decoration().table().clone();
    for element in ElementId::all() {
        assert_eq!(
            toggle.decoration().geometry(element),
            table.resting_geometry(element, PoseKey::Moon),
            "{element}"
        );
    }
}

#[test]
fn hover_ignored_while_transitioning() {
    let mut toggle = dark_toggle();
    toggle.click();
    run_for(&mut toggle, 50.0);
    assert!(!toggle.state().animation_complete);

    let pose = toggle.decoration().pose();
    let generation = toggle.decoration().generation();
    toggle.hover_enter();
    assert_eq!(toggle.decoration().pose(), pose);
    assert_eq!(toggle.decoration().generation(), generation);
    toggle.hover_leave();
    assert_eq!(toggle.decoration().generation(), generation);
    assert_eq!(toggle.stats().hover_plays, 0);
}

#[test]
fn hover_plays_once_complete() {
    let mut toggle = dark_toggle();
    toggle.hover_enter();
    assert_eq!(toggle.decoration().pose(), PoseKey::SunHover);
    settle(&mut toggle);
    assert_eq!(toggle.decoration().geometry(ElementId::Body).scale, 0.8);
    assert_eq!(toggle.phase(), Phase::Idle);

    toggle.hover_leave();
    assert_eq!(toggle.decoration().pose(), PoseKey::Sun);
    settle(&mut toggle);
    assert_eq!(toggle.decoration().geometry(ElementId::Body).scale, 1.0);

    toggle.click();
    settle(&mut toggle);
    toggle.hover_enter();
    assert_eq!(toggle.decoration().pose(), PoseKey::MoonHover);
    settle(&mut toggle);
    let container = toggle.decoration().geometry(ElementId::Container);
    assert_eq!((container.rotate, container.scale), (-15.0, 0.9));
}

#[test]
fn completion_flag_flips_exactly_at_sentinel() {
    let mut toggle = dark_toggle();
    let mut observed = vec![toggle.state().animation_complete];

    toggle.click();
    observed.push(toggle.state().animation_complete);

    // Sun -> Moon: stars finish last at 200 ms delay + 200 ms
    let mut settled_at = None;
    let mut elapsed = 0.0;
    while elapsed < 1000.0 {
        toggle.tick(10.0);
        elapsed += 10.0;
        let complete = toggle.state().animation_complete;
        if complete != *observed.last().unwrap() {
            observed.push(complete);
            settled_at.get_or_insert(elapsed);
        }
    }

    assert_eq!(observed, vec![true, false, true]);
    let settled_at = settled_at.unwrap();
    assert!((400.0..=410.0).contains(&settled_at), "settled at {settled_at}");
}

#[test]
fn completion_waits_for_staggered_rays() {
    let mut toggle = dark_toggle();
    toggle.click();
    settle(&mut toggle);

    // Moon -> Sun: the last ray starts 480 ms late and runs 200 ms
    toggle.click();
    assert_eq!(toggle.decoration().sentinel(), Some(ElementId::Ray(7)));
    run_for(&mut toggle, 640.0);
    assert!(!toggle.state().animation_complete);
    run_for(&mut toggle, 64.0);
    assert!(toggle.state().animation_complete);
}

#[test]
fn rapid_triple_click_settles_on_moon() {
    let mut toggle = dark_toggle();
    toggle.click();
    run_for(&mut toggle, 48.0);
    toggle.click();
    run_for(&mut toggle, 48.0);
    toggle.click();
    assert_eq!(toggle.current_icon(), IconState::Moon);

    let mut previous = toggle.morph().progress();
    let mut elapsed = 0.0;
    while elapsed < 2000.0 {
        toggle.tick(FRAME_MS);
        elapsed += FRAME_MS;
        // After the last click the sweep only moves towards the moon
        let progress = toggle.morph().progress();
        assert!(progress >= previous - 1e-5, "{progress} < {previous}");
        previous = progress;
    }

    assert_eq!(toggle.current_icon().index(), 1);
    assert_eq!(toggle.morph().progress(), 1.0);
    assert_eq!(toggle.frame().body_path, solstice_toggle::icon::MOON_PATH);
    assert!(toggle.state().animation_complete);
}

#[test]
fn later_click_outranks_earlier_system_flip() {
    let mut toggle = ToggleCoordinator::mount(
        InMemoryThemeProvider::new(ThemePreference::System, ColorScheme::Light),
        HeadlessEnvironment::default(),
        ToggleConfig::default(),
    )
    .unwrap();
    assert_eq!(toggle.current_icon(), IconState::Moon);

    toggle.click();
    toggle.tick(FRAME_MS);

    // The OS goes dark mid-transition; the change waits for the settle
    toggle.provider_mut().set_system_theme(ColorScheme::Dark);
    toggle.tick(FRAME_MS);
    assert_eq!(toggle.deferred_sync(), Some(IconState::Sun));

    toggle.click();
    assert_eq!(toggle.deferred_sync(), None);
    settle(&mut toggle);

    assert_eq!(toggle.current_icon(), IconState::Moon);
    assert_eq!(toggle.morph().progress(), 1.0);
    assert_eq!(toggle.phase(), Phase::Idle);
    assert_eq!(toggle.stats().external_syncs, 0);
}
