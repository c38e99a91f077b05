use std::rc::Rc;
use std::time::{Duration, Instant};

use tabkeep_common::{Event, TabId};
use tabkeep_config::TabkeepConfig;
use tabkeep_webview::{
    BridgeSignal, MemorySurfaceFactory, PageLoadState, SurfaceFactory, WebViewEvent,
};
use tempfile::TempDir;
use tokio::sync::broadcast;

use super::*;
use crate::diagnostics::DiagnosticLog;
use crate::keep_alive::RecordingService;
use crate::store::{keys, JsonFileStore, MemoryStore};
use crate::testing::TestHost;

const GRACE: Duration = Duration::from_secs(120);
const SWEEP: Duration = Duration::from_secs(10);

fn started(config: TabkeepConfig) -> (TestHost, Instant) {
    let mut th = TestHost::new(config);
    let t0 = Instant::now();
    th.host.init(t0).unwrap();
    (th, t0)
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn current_surface(th: &TestHost) -> tabkeep_common::SurfaceId {
    th.host.tabs().current().unwrap().surface_id()
}

fn sticky_config() -> TabkeepConfig {
    let mut config = TabkeepConfig::default();
    config.back_guard.blocked_domains = "video.example, https://music.example/x".into();
    config
}

// -- Init -------------------------------------------------------------------

#[test]
fn init_opens_home_page_and_schedules_sweep() {
    let (th, t0) = started(TabkeepConfig::default());

    assert_eq!(th.host.tabs().len(), 1);
    let tab = th.host.tabs().current().unwrap();
    assert_eq!(tab.url, "https://www.google.com");
    assert_eq!(
        th.current_probe().unwrap().url().as_deref(),
        Some("https://www.google.com")
    );
    assert_eq!(th.host.next_deadline(), Some(t0 + SWEEP));
}

#[test]
fn init_restores_previous_session() {
    let (mut first, t0) = started(TabkeepConfig::default());
    let a = first.host.tabs().current_id().cloned().unwrap();
    let b = first.host.new_tab(Some("https://b.example"), t0).unwrap();
    first.host.switch_to(&a, t0);
    let saved = first.host.tabs().snapshot();
    first.host.shutdown();

    let mut second = TestHost::with_parts(TabkeepConfig::default(), first.store.clone(), None);
    second.host.init(t0).unwrap();

    assert_eq!(second.host.tabs().snapshot(), saved);
    assert_eq!(second.host.tabs().current_id(), Some(&a));
    assert!(second.host.tabs().get(&b).is_some());
}

#[test]
fn malformed_session_falls_back_to_one_fresh_tab() {
    let store = Rc::new(MemoryStore::new());
    store.put(keys::TAB_LIST, "not json").unwrap();
    let mut th = TestHost::with_parts(TabkeepConfig::default(), store, None);

    th.host.init(Instant::now()).unwrap();
    assert_eq!(th.host.tabs().len(), 1);
    assert!(th.host.tabs().current().is_some());
}

#[test]
fn corrupt_state_file_is_replaced_by_next_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{\"tab_list\": [").unwrap();

    let store = Rc::new(JsonFileStore::open_or_reset(&path).unwrap());
    let mut host = Host::new(
        TabkeepConfig::default(),
        store,
        Box::new(MemorySurfaceFactory::new()),
        RecordingService::new(),
        None,
    );
    let t0 = Instant::now();
    host.init(t0).unwrap();
    host.new_tab(Some("https://second.example/"), t0).unwrap();

    let saved = JsonFileStore::open(&path).unwrap();
    let tabs = saved.get(keys::TAB_LIST).unwrap().unwrap();
    assert!(tabs.contains("https://second.example/"));
}

#[test]
fn restore_disabled_ignores_saved_tabs() {
    let (mut first, t0) = started(TabkeepConfig::default());
    first.host.new_tab(Some("https://b.example"), t0).unwrap();
    first.host.shutdown();

    let mut config = TabkeepConfig::default();
    config.browser.restore_tabs = false;
    let mut second = TestHost::with_parts(config, first.store.clone(), None);
    second.host.init(t0).unwrap();
    assert_eq!(second.host.tabs().len(), 1);
}

#[test]
fn last_page_is_reopened_when_enabled() {
    let mut config = TabkeepConfig::default();
    config.browser.restore_tabs = false;
    config.browser.restore_last_page = true;
    let store = Rc::new(MemoryStore::new());
    store.put(keys::LAST_URL, "https://last.example/").unwrap();

    let mut th = TestHost::with_parts(config, store, None);
    th.host.init(Instant::now()).unwrap();
    assert_eq!(th.host.tabs().current().unwrap().url, "https://last.example/");
}

// -- Tabs -------------------------------------------------------------------

#[test]
fn closing_only_tab_then_sweeping_leaves_one_current_tab() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let only = th.host.tabs().current_id().cloned().unwrap();

    assert!(th.host.close_tab(&only, t0).unwrap());
    th.host.fire_due(t0 + SWEEP);

    assert_eq!(th.host.tabs().len(), 1);
    let current = th.host.tabs().current().unwrap();
    assert_ne!(current.id(), &only);
    assert!(!current.is_background_paused());
}

#[test]
fn failed_replacement_still_drops_closed_tab_holds() {
    let factory = MemorySurfaceFactory::new();
    let mut created = 0;
    let flaky = {
        let mut inner = factory.clone();
        move || {
            created += 1;
            if created > 1 {
                return Err(tabkeep_common::SurfaceError::Backend("no surfaces left".into()));
            }
            inner.create()
        }
    };
    let service = RecordingService::new();
    let mut host = Host::new(
        TabkeepConfig::default(),
        Rc::new(MemoryStore::new()),
        Box::new(flaky),
        service.clone(),
        None,
    );
    let t0 = Instant::now();
    host.init(t0).unwrap();
    let only = host.tabs().current_id().cloned().unwrap();
    let s = host.tabs().current().unwrap().surface_id();
    host.handle_signal(s, BridgeSignal::Acquire, t0);

    assert!(host.close_tab(&only, t0).is_err());
    assert_eq!(host.keep_alive().holder_count(), 0);
    assert!(host.timers().is_pending(TimerKey::KeepAliveStop));

    host.fire_due(t0 + GRACE);
    assert!(!host.keep_alive().is_service_active());
    assert_eq!(service.stops(), 1);
}

#[test]
fn tab_events_are_published() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let mut rx = th.host.subscribe();

    let b = th.host.new_tab(None, t0).unwrap();
    th.host.close_tab(&b, t0).unwrap();

    let events = drain(&mut rx);
    assert!(matches!(events[0], Event::TabOpened(ref id) if *id == b));
    assert!(events.iter().any(|e| matches!(e, Event::TabClosed(id) if *id == b)));
    assert!(events.iter().any(|e| matches!(e, Event::TabsChanged(_))));
    assert!(matches!(events.last(), Some(Event::TabSwitched(_))));
}

#[test]
fn closing_unknown_tab_is_noop() {
    let (mut th, t0) = started(TabkeepConfig::default());
    assert!(!th.host.close_tab(&TabId::new(), t0).unwrap());
    assert_eq!(th.host.tabs().len(), 1);
}

#[test]
fn sweep_timer_pauses_idle_background_tabs() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let background = th.host.tabs().current().unwrap().surface_id();
    th.host.new_tab(None, t0).unwrap();

    let mut now = t0;
    for _ in 0..7 {
        now += SWEEP;
        th.host.fire_due(now);
    }
    let tab = th.host.tabs().by_surface(background).unwrap();
    assert!(tab.is_background_paused());
    assert!(th.factory.probe(background).unwrap().is_paused());
    assert!(!th.host.tabs().current().unwrap().is_background_paused());
}

#[test]
fn holding_background_tab_survives_sweeps() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let holder = current_surface(&th);
    th.host.handle_signal(holder, BridgeSignal::Acquire, t0);
    th.host.new_tab(None, t0).unwrap();

    let mut now = t0;
    for _ in 0..60 {
        now += SWEEP;
        th.host.fire_due(now);
    }
    let tab = th.host.tabs().by_surface(holder).unwrap();
    assert!(tab.is_keep_alive_active());
    assert!(!tab.is_background_paused());
}

// -- Keep-alive -------------------------------------------------------------

#[test]
fn acquire_release_grace_stops_service_once() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let mut rx = th.host.subscribe();
    let s = current_surface(&th);

    th.host.handle_signal(s, BridgeSignal::Acquire, t0);
    th.host.handle_signal(s, BridgeSignal::Release, t0);
    th.host.fire_due(t0 + GRACE);
    th.host.fire_due(t0 + GRACE * 2);

    assert_eq!(th.service.starts(), 1);
    assert_eq!(th.service.stops(), 1);
    let events = drain(&mut rx);
    let started = events.iter().filter(|e| matches!(e, Event::ServiceStarted)).count();
    let stopped = events.iter().filter(|e| matches!(e, Event::ServiceStopped)).count();
    assert_eq!((started, stopped), (1, 1));
}

#[test]
fn reacquire_in_grace_keeps_service() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let s = current_surface(&th);

    th.host.handle_signal(s, BridgeSignal::Acquire, t0);
    th.host.handle_signal(s, BridgeSignal::Release, t0);
    th.host
        .handle_signal(s, BridgeSignal::Acquire, t0 + Duration::from_secs(90));
    th.host.fire_due(t0 + GRACE * 3);

    assert_eq!(th.service.stops(), 0);
    assert!(th.host.keep_alive().is_service_active());
}

#[test]
fn closing_holding_tab_drops_stale_holder() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let first = th.host.tabs().current_id().cloned().unwrap();
    let s = current_surface(&th);
    th.host.handle_signal(s, BridgeSignal::Acquire, t0);
    th.host.new_tab(None, t0).unwrap();

    th.host.close_tab(&first, t0).unwrap();
    assert_eq!(th.host.keep_alive().holder_count(), 0);

    // A late release from the dead page is ignored.
    th.host.handle_signal(s, BridgeSignal::Release, t0);
    th.host.fire_due(t0 + GRACE);
    assert_eq!(th.service.stops(), 1);
}

#[test]
fn page_start_drops_holds_of_previous_document() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let s = current_surface(&th);
    th.host.handle_signal(s, BridgeSignal::Acquire, t0);

    th.host.handle_webview_event(
        WebViewEvent::PageLoad {
            surface: s,
            state: PageLoadState::Started,
            url: "https://next.example/".into(),
        },
        t0,
    );

    let tab = th.host.tabs().by_surface(s).unwrap();
    assert!(!tab.is_keep_alive_active());
    assert_eq!(tab.url, "https://next.example/");
    assert_eq!(th.factory.probe(s).unwrap().scripts_evaluated(), 2);
    assert!(th.host.timers().is_pending(TimerKey::KeepAliveStop));
}

#[test]
fn page_finish_updates_tab_and_last_url() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let s = current_surface(&th);

    th.host
        .on_page_finished(s, "https://done.example/", Some("Done"), t0);
    th.host.on_title_changed(s, "Renamed");

    let tab = th.host.tabs().current().unwrap();
    assert_eq!(tab.url, "https://done.example/");
    assert_eq!(tab.title, "Renamed");
    assert_eq!(
        th.store.get(keys::LAST_URL).unwrap().as_deref(),
        Some("https://done.example/")
    );
    let saved = th.store.get(keys::TAB_LIST).unwrap().unwrap();
    assert!(saved.contains("Renamed"));
}

#[test]
fn navigation_allowlist() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let s = current_surface(&th);
    assert!(th.host.on_navigation_requested(s, "https://ok.example", t0));
    assert!(!th.host.on_navigation_requested(s, "intent://scan", t0));
}

// -- Screen -----------------------------------------------------------------

#[test]
fn screen_off_timeout_force_releases_everything() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let mut surfaces = vec![current_surface(&th)];
    for _ in 0..2 {
        th.host.new_tab(None, t0).unwrap();
        surfaces.push(current_surface(&th));
    }
    for s in &surfaces {
        th.host.handle_signal(*s, BridgeSignal::Acquire, t0);
    }
    th.host.handle_signal(surfaces[0], BridgeSignal::Release, t0);
    th.host.handle_signal(surfaces[0], BridgeSignal::Acquire, t0);
    let mut rx = th.host.subscribe();

    let deadline = th.host.on_screen_off(t0).unwrap();
    assert_eq!(deadline, t0 + Duration::from_secs(30 * 60));
    th.host.fire_due(deadline);

    for s in &surfaces {
        assert!(!th.host.tabs().by_surface(*s).unwrap().is_keep_alive_active());
    }
    assert!(!th.host.keep_alive().is_service_active());
    assert!(!th.host.timers().is_pending(TimerKey::KeepAliveStop));
    assert_eq!(th.service.stops(), 1);
    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(e, Event::Notice(_))));
}

#[test]
fn screen_on_disarms_force_release() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let s = current_surface(&th);
    th.host.handle_signal(s, BridgeSignal::Acquire, t0);

    let deadline = th.host.on_screen_off(t0).unwrap();
    th.host.on_screen_on();
    th.host.fire_due(deadline);

    assert!(th.host.keep_alive().is_service_active());
    assert!(th.host.is_screen_on());
}

#[test]
fn non_positive_timeout_disables_valve() {
    let mut config = TabkeepConfig::default();
    config.keep_alive.screen_off_timeout = "0".into();
    let (mut th, t0) = started(config);
    assert_eq!(th.host.on_screen_off(t0), None);
    assert!(!th.host.timers().is_pending(TimerKey::ScreenOffRelease));
}

#[test]
fn oversized_timeout_is_clamped_to_a_week() {
    let mut config = TabkeepConfig::default();
    config.keep_alive.screen_off_timeout = "200000000000000000".into();
    let (mut th, t0) = started(config);
    let s = current_surface(&th);
    th.host.handle_signal(s, BridgeSignal::Acquire, t0);

    let deadline = th.host.on_screen_off(t0).unwrap();
    assert_eq!(deadline, t0 + Duration::from_secs(7 * 24 * 60 * 60));
    th.host.fire_due(deadline);
    assert!(!th.host.keep_alive().is_service_active());
}

// -- Back -------------------------------------------------------------------

#[test]
fn back_goes_through_history_then_exits() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let id = th.host.tabs().current_id().cloned().unwrap();
    th.host.navigate(&id, "https://second.example/", t0);

    assert_eq!(th.host.on_back_pressed(t0), BackOutcome::WentBack);
    assert_eq!(th.host.tabs().current().unwrap().url, "https://www.google.com");
    assert_eq!(th.host.on_back_pressed(t0), BackOutcome::Exit);
}

#[test]
fn sticky_domain_needs_three_quick_presses() {
    let (mut th, t0) = started(sticky_config());
    let s = current_surface(&th);
    th.host.on_page_finished(s, "https://www.Video.Example/watch", None, t0);
    let mut rx = th.host.subscribe();
    let ms = Duration::from_millis;

    assert_eq!(th.host.on_back_pressed(t0), BackOutcome::Blocked { remaining: 2 });
    assert_eq!(
        th.host.on_back_pressed(t0 + ms(3000)),
        BackOutcome::Blocked { remaining: 2 }
    );
    assert_eq!(
        th.host.on_back_pressed(t0 + ms(3500)),
        BackOutcome::Blocked { remaining: 1 }
    );
    assert_eq!(th.host.on_back_pressed(t0 + ms(4000)), BackOutcome::Exit);

    let notices: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            Event::Notice(text) => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(notices[0], "Press 2 more times to go back");
}

#[test]
fn url_shaped_blocked_entry_matches_its_host() {
    let (mut th, t0) = started(sticky_config());
    let s = current_surface(&th);
    th.host.on_page_finished(s, "https://music.example/album", None, t0);
    assert!(matches!(th.host.on_back_pressed(t0), BackOutcome::Blocked { .. }));
}

// -- Config, bookmarks, diagnostics, shutdown ------------------------------

#[test]
fn apply_config_reschedules_sweep() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let mut rx = th.host.subscribe();
    let later = t0 + Duration::from_secs(3);

    let mut config = TabkeepConfig::default();
    config.tabs.sweep_interval_secs = 30;
    th.host.apply_config(config, later);

    assert_eq!(
        th.host.timers().deadline(TimerKey::Sweep),
        Some(later + Duration::from_secs(30))
    );
    let events = drain(&mut rx);
    assert!(matches!(events.as_slice(), [Event::ConfigReloaded]));
}

#[test]
fn bookmark_current_tab() {
    let (mut th, t0) = started(TabkeepConfig::default());
    let s = current_surface(&th);
    th.host.on_page_finished(s, "https://read.example/", Some("Read"), t0);
    let id = th.host.tabs().current_id().cloned().unwrap();

    let added = th.host.bookmark_tab(&id).unwrap().unwrap();
    assert_eq!(added.name, "Read");
    assert_eq!(th.host.bookmarks().list(), vec![added]);
    assert!(th.host.bookmark_tab(&TabId::new()).unwrap().is_none());
}

#[test]
fn diagnostic_log_records_holds() {
    let dir = TempDir::new().unwrap();
    let mut config = TabkeepConfig::default();
    config.keep_alive.enable_wakelock_log = true;
    let log = DiagnosticLog::new(dir.path().join("wakelock_logs.txt"), false);
    let mut th = TestHost::with_parts(config, Rc::new(MemoryStore::new()), Some(log));
    let t0 = Instant::now();
    th.host.init(t0).unwrap();
    let s = current_surface(&th);
    th.host.on_title_changed(s, "Radio");

    th.host.handle_signal(s, BridgeSignal::Acquire, t0);
    th.host.handle_signal(s, BridgeSignal::Release, t0);
    let deadline = th.host.on_screen_off(t0).unwrap();
    th.host.handle_signal(s, BridgeSignal::Acquire, t0);
    th.host.fire_due(deadline);

    let text = th.host.diagnostic_log().unwrap().read();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("Acquired keep-alive for tab: Radio"));
    assert!(lines[1].ends_with("Released keep-alive for tab: Radio"));
    assert!(lines[3].contains("Force releasing"));
}

#[test]
fn shutdown_tears_down_once() {
    let (mut th, t0) = started(TabkeepConfig::default());
    th.host.new_tab(None, t0).unwrap();
    let s = current_surface(&th);
    th.host.handle_signal(s, BridgeSignal::Acquire, t0);

    th.host.shutdown();
    th.host.shutdown();

    assert!(th.host.is_shut_down());
    assert_eq!(th.host.next_deadline(), None);
    assert_eq!(th.service.stops(), 1);
    for probe in th.factory.probes() {
        assert_eq!(probe.destroy_count(), 1);
    }
    assert!(th.store.get(keys::TAB_LIST).unwrap().is_some());
}
