//! Integration test: drive the engine through the timelines a viewer
//! actually produces (bursts, pauses, overflow) and check lane choice,
//! fading and retirement timing.

use danmaku_core::{Admission, Engine};
use danmaku_protocol::{AuthorType, CommentRecord, Overflow, OverlayCommand, Settings, Viewport};

const SURFACE: Viewport = Viewport {
    width: 1000.0,
    height: 200.0,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn engine(overflow: Overflow) -> Engine<u32> {
    init_logging();
    Engine::with_settings(Settings {
        rows: 2,
        speed: 5.0,
        overflow,
        opacity: 0.5,
        ..Settings::default()
    })
    .expect("valid settings")
}

fn comment() -> CommentRecord {
    CommentRecord::new(AuthorType::Viewer, 100.0)
}

fn retired(commands: &[OverlayCommand<u32>]) -> Vec<u32> {
    commands
        .iter()
        .filter_map(|cmd| match cmd {
            OverlayCommand::Retire { handle, .. } => Some(*handle),
            _ => None,
        })
        .collect()
}

#[test]
fn burst_fills_rows_then_stacks() {
    let mut engine = engine(Overflow::Stack);
    let lanes: Vec<_> = (0..3)
        .map(|handle| {
            engine
                .offer(&comment(), handle, 0.0, &SURFACE)
                .expect("admission")
        })
        .collect();

    assert_eq!(
        lanes.iter().map(Admission::lane).collect::<Vec<_>>(),
        vec![Some(0), Some(1), Some(2)]
    );
    let Admission::Admitted { placement, .. } = lanes[2] else {
        panic!("third comment should stack");
    };
    assert_eq!(placement.row, 0);
    assert_eq!(placement.depth, 1);
    assert!((placement.opacity - 0.25).abs() < f64::EPSILON);
    assert_eq!(engine.stats().stacked, 1);
}

#[test]
fn burst_overflows_under_hidden() {
    let mut engine = engine(Overflow::Hidden);
    let outcomes: Vec<_> = (0..3)
        .map(|handle| {
            engine
                .offer(&comment(), handle, 0.0, &SURFACE)
                .expect("admission")
        })
        .collect();

    assert_eq!(outcomes[0].lane(), Some(0));
    assert_eq!(outcomes[1].lane(), Some(1));
    assert_eq!(outcomes[2], Admission::Overflowed { lane: 2 });
    assert_eq!(engine.lanes().lane_count(), 2);
    assert_eq!(engine.stats().overflowed, 1);

    let commands = engine.take_commands();
    assert_eq!(commands.last(), Some(&OverlayCommand::Discard { handle: 2 }));
}

#[test]
fn single_comment_retires_after_crossing() {
    let mut engine = engine(Overflow::Hidden);
    engine.offer(&comment(), 7, 0.0, &SURFACE).expect("admission");
    engine.take_commands();

    engine.tick(4.999);
    assert!(retired(&engine.take_commands()).is_empty());
    assert_eq!(engine.lanes().len(), 1);

    engine.tick(5.0);
    assert_eq!(retired(&engine.take_commands()), vec![7]);
    assert!(engine.lanes().is_empty());
    assert_eq!(engine.stats().retired, 1);
}

#[test]
fn pause_shifts_retirement_by_its_length() {
    let mut engine = engine(Overflow::Hidden);
    engine.offer(&comment(), 1, 0.0, &SURFACE).expect("admission");

    engine.tick(2.0);
    engine.pause(2.0);
    engine.tick(4.0);
    engine.resume(5.0);
    engine.take_commands();

    engine.tick(7.9);
    assert!(retired(&engine.take_commands()).is_empty());
    engine.tick(8.0);
    assert_eq!(retired(&engine.take_commands()), vec![1]);
}

#[test]
fn comments_during_pause_are_dropped_not_queued() {
    let mut engine = engine(Overflow::Hidden);
    engine.pause(0.0);
    for handle in 0..5 {
        let out = engine
            .offer(&comment(), handle, 0.5, &SURFACE)
            .expect("admission");
        assert_eq!(out, Admission::Paused);
    }
    engine.resume(1.0);
    engine.tick(10.0);

    assert!(engine.lanes().is_empty());
    assert_eq!(engine.stats().dropped_paused, 5);
    assert_eq!(engine.stats().admitted, 0);
    let starts = engine
        .take_commands()
        .iter()
        .filter(|cmd| matches!(cmd, OverlayCommand::Start { .. }))
        .count();
    assert_eq!(starts, 0);
}

#[test]
fn spaced_comments_share_a_lane() {
    let mut engine = engine(Overflow::Hidden);
    // A 100-wide banner clears the entry edge after 100/220 s.
    assert_eq!(
        engine.offer(&comment(), 0, 0.0, &SURFACE).expect("admission").lane(),
        Some(0)
    );
    assert_eq!(
        engine.offer(&comment(), 1, 0.2, &SURFACE).expect("admission").lane(),
        Some(1)
    );
    assert_eq!(
        engine.offer(&comment(), 2, 0.5, &SURFACE).expect("admission").lane(),
        Some(0)
    );
    let lane0: Vec<_> = engine
        .lanes()
        .lane(0)
        .map(|lane| lane.iter().map(|banner| banner.handle).collect())
        .unwrap_or_default();
    assert_eq!(lane0, vec![0, 2]);

    engine.tick(5.5);
    assert_eq!(retired(&engine.take_commands()), vec![0, 1, 2]);
}

#[test]
fn settings_change_applies_to_next_admission() {
    let mut engine = engine(Overflow::Hidden);
    engine.offer(&comment(), 0, 0.0, &SURFACE).expect("admission");
    engine.offer(&comment(), 1, 0.0, &SURFACE).expect("admission");
    assert_eq!(
        engine.offer(&comment(), 2, 0.0, &SURFACE).expect("admission"),
        Admission::Overflowed { lane: 2 }
    );

    engine
        .update_settings_json(r#"{"rows":2,"speed":5,"overflow":"stack","opacity":0.5}"#)
        .expect("valid settings");
    assert_eq!(
        engine.offer(&comment(), 3, 0.0, &SURFACE).expect("admission").lane(),
        Some(2)
    );
}

#[test]
fn positions_freeze_while_paused() {
    let mut engine = engine(Overflow::Hidden);
    engine.offer(&comment(), 0, 0.0, &SURFACE).expect("admission");
    engine.tick(1.0);
    let before: Vec<f64> = engine.positions(SURFACE.width).map(|(_, x)| x).collect();
    assert!((before[0] - 780.0).abs() < 1e-9);

    engine.pause(1.0);
    engine.tick(30.0);
    let during: Vec<f64> = engine.positions(SURFACE.width).map(|(_, x)| x).collect();
    assert_eq!(before, during);

    engine.resume(30.0);
    engine.tick(31.0);
    let after: Vec<f64> = engine.positions(SURFACE.width).map(|(_, x)| x).collect();
    assert!((after[0] - 560.0).abs() < 1e-9);
}
