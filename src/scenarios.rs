//! End-to-end behaviour of the filler, the controller and the scroller on an
//! in-memory track.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::Timeline;
use crate::fill::CloneFiller;
use crate::host::MemoryHost;
use crate::{FillerOptions, PluginRegistry, ReelEventKind, ReelOptions, Reeller};

fn track(container_width: f64) -> MemoryHost {
    MemoryHost::new("#reel", container_width).with_items(&[100.0, 100.0, 100.0])
}

fn filler_options(overflow: bool, finish: bool, min: usize) -> FillerOptions {
    FillerOptions {
        container: Some("#reel".to_owned()),
        clones_overflow: overflow,
        clones_finish: finish,
        clones_min: min,
        ..FillerOptions::default()
    }
}

fn reel_options() -> ReelOptions {
    ReelOptions {
        container: Some("#reel".to_owned()),
        ..ReelOptions::default()
    }
}

fn clone_sources(host: &MemoryHost) -> Vec<usize> {
    host.children()
        .filter(|n| n.classes.iter().any(|c| c == "-clone"))
        .map(|n| n.source)
        .collect()
}

#[test]
fn remainder_is_covered_with_two_clones() {
    let filler = CloneFiller::new(track(500.0), filler_options(false, false, 0)).unwrap();
    let result = filler.result();
    assert_eq!(result.clones_count, 2);
    assert_eq!(result.clones_width, 200.0);
    assert_eq!(filler.host().count_with_class("-clone"), 2);
}

#[test]
fn minimum_clones_win_over_width() {
    let filler = CloneFiller::new(track(500.0), filler_options(false, false, 5)).unwrap();
    assert_eq!(filler.result().clones_count, 5);
    assert_eq!(filler.host().count_with_class("-clone"), 5);
}

#[test]
fn finished_cycle_rounds_up() {
    let filler = CloneFiller::new(track(400.0), filler_options(true, true, 0)).unwrap();
    assert_eq!(filler.result().clones_count, 6);
    assert_eq!(clone_sources(filler.host()), vec![0, 1, 2, 0, 1, 2]);
}

#[test]
fn coverage_floor_and_cycle_hold_across_widths() {
    for width in [0.0, 50.0, 299.0, 300.0, 301.0, 999.0, 2500.0] {
        for overflow in [false, true] {
            for (finish, min) in [(false, 0), (true, 0), (false, 4), (true, 4)] {
                let filler =
                    CloneFiller::new(track(width), filler_options(overflow, finish, min)).unwrap();
                let r = filler.result();
                if overflow {
                    assert!(r.clones_width >= r.container_width, "width {width}");
                } else {
                    assert!(r.full_width >= r.container_width, "width {width}");
                }
                assert!(r.clones_count >= min);
                if finish {
                    assert_eq!(r.clones_count % 3, 0);
                }
            }
        }
    }
}

#[test]
fn repeated_update_is_stable() {
    let mut filler = CloneFiller::new(track(750.0), filler_options(true, false, 0)).unwrap();
    let first = filler.update().clone();
    let created = filler.host().clones_created();
    let removed = filler.host().nodes_removed();

    let second = filler.update().clone();
    assert_eq!(first, second);
    assert_eq!(filler.host().clones_created(), created);
    assert_eq!(filler.host().nodes_removed(), removed);
}

#[test]
fn reconcile_continues_the_cycle_and_trims_the_tail() {
    let mut filler = CloneFiller::new(track(500.0), filler_options(false, false, 0)).unwrap();
    assert_eq!(clone_sources(filler.host()), vec![0, 1]);

    filler.reconcile(5);
    assert_eq!(clone_sources(filler.host()), vec![0, 1, 2, 0, 1]);

    filler.reconcile(3);
    assert_eq!(clone_sources(filler.host()), vec![0, 1, 2]);
    assert_eq!(filler.host().nodes_removed(), 2);
}

#[test]
fn track_without_items_yields_empty_plan() {
    let host = MemoryHost::new("#reel", 800.0);
    let filler = CloneFiller::new(host, filler_options(true, true, 3)).unwrap();
    assert_eq!(filler.result().clones_count, 0);
    assert_eq!(filler.result().full_width, 0.0);
}

#[test]
fn resize_grows_the_track_and_moves_the_loop() {
    let mut reel = Reeller::new(track(500.0), reel_options(), &PluginRegistry::new()).unwrap();
    assert!(reel.on_visibility(true));
    // Seeked to the end of the pass, which is the loop point.
    assert_eq!(reel.tick(0.0), Some(0.0));
    assert_eq!(reel.host().offset(), Some(0.0));

    reel.host_mut().set_container_width(1200.0);
    assert!(reel.on_resize());
    assert_eq!(reel.filler().clones_count(), 12);
    assert!(reel.tick(0.5).is_some());
}

#[test]
fn explicit_pause_survives_visibility_changes() {
    let mut reel = Reeller::new(track(500.0), reel_options(), &PluginRegistry::new()).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in [ReelEventKind::Pause, ReelEventKind::Resume] {
        let sink = Rc::clone(&log);
        let _ = reel.on(kind, move |event| {
            sink.borrow_mut().push(format!("{event:?}"));
            Ok(())
        });
    }

    assert!(reel.on_visibility(true));
    reel.pause();
    assert!(!reel.on_visibility(false));
    assert!(!reel.on_visibility(true));
    assert!(reel.is_paused());
    assert!(reel.timeline().is_paused());

    reel.resume();
    assert!(!reel.timeline().is_paused());
    assert_eq!(*log.borrow(), vec!["Resume", "Pause", "Resume"]);
}

fn scroll_reel(stop_on_end: bool) -> Reeller<MemoryHost> {
    let mut plugins = crate::options::PluginOptionsMap::new();
    let _ = plugins.insert(
        "scroller".to_owned(),
        serde_json::json!({
            "multiplier": 0.5,
            "threshold": 1.0,
            "ease": "none",
            "stop_on_end": stop_on_end,
        }),
    );
    let options = ReelOptions {
        paused: false,
        auto_stop: false,
        plugins,
        ..reel_options()
    };
    Reeller::new(track(500.0), options, &PluginRegistry::with_builtins()).unwrap()
}

fn scroll_time_scales(reel: &mut Reeller<MemoryHost>, positions: &[f64]) -> Vec<f64> {
    positions
        .iter()
        .map(|&y| {
            reel.host_mut().set_scroll_position(y);
            // One-second frames let every speed tween finish within its frame.
            let _ = reel.tick(1.0);
            reel.timeline().time_scale()
        })
        .collect()
}

#[test]
fn scroll_velocity_sets_speed_then_creeps() {
    let mut reel = scroll_reel(false);
    assert_eq!(reel.plugin_names().collect::<Vec<_>>(), vec!["scroller"]);
    assert_eq!(scroll_time_scales(&mut reel, &[10.0, 10.0, 10.0]), vec![5.0, 1.0, 1.0]);
}

#[test]
fn scroll_velocity_sets_speed_then_stops() {
    let mut reel = scroll_reel(true);
    assert_eq!(scroll_time_scales(&mut reel, &[10.0, 10.0, 10.0]), vec![5.0, 0.0, 0.0]);
}

#[test]
fn destroy_twice_releases_everything_once() {
    let mut reel = Reeller::new(track(500.0), reel_options(), &PluginRegistry::with_builtins())
        .unwrap();
    let destroyed = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&destroyed);
    let _ = reel.on(ReelEventKind::Destroy, move |_| {
        *sink.borrow_mut() += 1;
        Ok(())
    });

    reel.destroy(true, true);
    reel.destroy(true, true);

    assert_eq!(*destroyed.borrow(), 1);
    let host = reel.host();
    assert_eq!(host.resize_observer().connects, 1);
    assert_eq!(host.resize_observer().disconnects, 1);
    assert_eq!(host.visibility_observer().disconnects, 1);
    assert_eq!(host.count_with_class("-clone"), 0);
    assert!(reel.timeline().is_killed());
}

#[test]
fn options_file_drives_the_reel() {
    let options = ReelOptions::from_toml(
        r##"
        container = "#reel"
        speed = 2.0
        loop = false
        auto_stop = false
        paused = false
        clones_overflow = false

        [plugins.scroller]
        threshold = 2.0
        "##,
    )
    .unwrap();
    let mut reel = Reeller::new(track(500.0), options, &PluginRegistry::with_builtins()).unwrap();
    assert!(!reel.is_paused());
    assert_eq!(reel.filler().clones_count(), 2);
    assert!(reel.plugin_errors().is_empty());
    // Not moving, not paused: the speed is left alone.
    let _ = reel.tick(0.1);
    assert_eq!(reel.timeline().time_scale(), 1.0);
}
