//! Property tests for the simulation and persistence invariants

use ball_panels::persistence::{BallRecord, FileStorage, MemoryStorage, Storage};
use ball_panels::settings::{PanelSettings, Settings};
use ball_panels::sim::{
    Ball, BallId, Board, DragCapture, Panel, PhysicsParams, Rect, Rgb, Spawner, integrate,
    throw_velocity, ticks_to_rest,
};
use glam::DVec2;
use proptest::prelude::*;

const DIAMETER: f64 = 20.0;
const THRESHOLD: f64 = 0.01;
/// Slack for overlaps and overshoots left over when motion stops
const SETTLE_EPS: f64 = 0.5;
const WIDTH: f64 = 420.0;
const HEIGHT: f64 = 320.0;

fn physics() -> PhysicsParams {
    PhysicsParams {
        diameter: DIAMETER,
        velocity_threshold: THRESHOLD,
    }
}

fn record() -> impl Strategy<Value = BallRecord> {
    (
        0.0..(WIDTH - DIAMETER),
        0.0..(HEIGHT - DIAMETER),
        -10.0..10.0f64,
        -10.0..10.0f64,
        any::<[u8; 3]>(),
    )
        .prop_map(|(x, y, u, v, color)| BallRecord::new(0, x, y, u, v, Rgb(color)))
}

fn settled_panel(records: &[BallRecord], friction: f64) -> Panel {
    let settings = PanelSettings {
        friction,
        initial_balls: 0,
    };
    let mut panel = Panel::new(0, &settings, physics());
    panel.resize(Rect::new(0.0, 0.0, WIDTH, HEIGHT));
    let mut spawner = Spawner::new(0);
    panel.restore(records, &mut spawner);

    let mut frames = 0;
    while panel.frame() {
        frames += 1;
        assert!(frames < 200_000, "panel never came to rest");
    }
    panel
}

proptest! {
    #[test]
    fn throw_velocity_is_scaled_average(
        sx in -500.0..500.0f64, sy in -500.0..500.0f64,
        ex in -500.0..500.0f64, ey in -500.0..500.0f64,
        t0 in 0.0..10_000.0f64, dt in 1.0..2_000.0f64,
        scale in 0.5..10.0f64,
    ) {
        let start = DragCapture { pointer: DVec2::new(sx, sy), time: t0 };
        let vel = throw_velocity(start, DVec2::new(ex, ey), t0 + dt, scale);
        let elapsed = (t0 + dt) - t0;
        prop_assert!((vel.x - (ex - sx) / elapsed * scale).abs() < 1e-9);
        prop_assert!((vel.y - (ey - sy) / elapsed * scale).abs() < 1e-9);
    }

    #[test]
    fn motion_stops_within_bound(
        u in -20.0..20.0f64, v in -20.0..20.0f64, friction in 0.5..0.99f64,
    ) {
        let mut balls = [Ball::new(BallId(1), DVec2::ZERO, DVec2::new(u, v), Rgb([1, 1, 1]))];
        let speed = u.abs().max(v.abs());
        let bound = ticks_to_rest(speed, friction, THRESHOLD);

        let mut ticks = 0;
        while integrate(&mut balls, friction, THRESHOLD) {
            ticks += 1;
            prop_assert!(ticks <= bound + 1);
        }
        prop_assert_eq!(balls[0].vel, DVec2::ZERO);
    }

    #[test]
    fn settled_panel_is_contained_and_separated(
        records in prop::collection::vec(record(), 1..=5),
        friction in 0.8..0.95f64,
    ) {
        let panel = settled_panel(&records, friction);
        let extent = panel.extent();
        let balls = panel.balls();
        prop_assert_eq!(balls.len(), records.len());

        for b in balls {
            prop_assert_eq!(b.vel, DVec2::ZERO);
            prop_assert!(b.pos.x >= -SETTLE_EPS && b.pos.x <= extent.x + SETTLE_EPS, "{:?}", b.pos);
            prop_assert!(b.pos.y >= -SETTLE_EPS && b.pos.y <= extent.y + SETTLE_EPS, "{:?}", b.pos);
        }
        for (i, a) in balls.iter().enumerate() {
            for b in &balls[i + 1..] {
                prop_assert!(a.pos.distance(b.pos) >= DIAMETER - SETTLE_EPS);
            }
        }
    }

    #[test]
    fn undersized_panel_comes_to_rest(
        width in 0.0..(2.0 * DIAMETER), height in 0.0..DIAMETER,
        records in prop::collection::vec(record(), 1..=5),
    ) {
        let settings = PanelSettings { friction: 0.95, initial_balls: 0 };
        let mut panel = Panel::new(0, &settings, physics());
        panel.resize(Rect::new(0.0, 0.0, width, height));
        let mut spawner = Spawner::new(0);
        panel.restore(&records, &mut spawner);

        let mut frames = 0;
        while panel.frame() {
            frames += 1;
            prop_assert!(frames < 200_000, "panel never came to rest");
        }
        let extent = panel.extent();
        prop_assert_eq!(extent.y, 0.0);
        for b in panel.balls() {
            prop_assert_eq!(b.vel, DVec2::ZERO);
            prop_assert_eq!(b.pos.y, 0.0);
            prop_assert!(b.pos.x >= 0.0 && b.pos.x <= extent.x + SETTLE_EPS);
        }
    }

    #[test]
    fn frame_at_rest_changes_nothing(
        records in prop::collection::vec(record(), 1..=4),
    ) {
        let mut panel = settled_panel(&records, 0.85);
        let before: Vec<(DVec2, DVec2)> = panel.balls().iter().map(|b| (b.pos, b.vel)).collect();

        panel.schedule_frame();
        prop_assert!(panel.frame());
        prop_assert!(!panel.frame_pending());

        let after: Vec<(DVec2, DVec2)> = panel.balls().iter().map(|b| (b.pos, b.vel)).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn file_storage_round_trip(
        records in prop::collection::vec(
            (0usize..3, record()).prop_map(|(panel, r)| BallRecord { panel, ..r }),
            1..20,
        ),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("save.json"));
        storage.save(&records).unwrap();
        let loaded = storage.load().unwrap().unwrap();

        for panel in 0..3 {
            let expected: Vec<&BallRecord> = records.iter().filter(|r| r.panel == panel).collect();
            let actual: Vec<&BallRecord> = loaded.iter().filter(|r| r.panel == panel).collect();
            prop_assert_eq!(expected.len(), actual.len());
            for (e, a) in expected.iter().zip(&actual) {
                prop_assert!((e.x - a.x).abs() < 1e-6 && (e.y - a.y).abs() < 1e-6);
                prop_assert!((e.u - a.u).abs() < 1e-6 && (e.v - a.v).abs() < 1e-6);
                prop_assert_eq!(e.color, a.color);
            }
        }
    }
}

#[test]
fn board_throw_keeps_every_ball_owned_once() {
    let settings = Settings {
        ball_diameter: DIAMETER,
        panels: vec![
            PanelSettings {
                friction: 0.9,
                initial_balls: 8,
            },
            PanelSettings {
                friction: 0.85,
                initial_balls: 2,
            },
        ],
        ..Default::default()
    };
    let mut board = Board::new(&settings, MemoryStorage::new(), 2024).unwrap();
    board.resize(0, Rect::new(0.0, 0.0, WIDTH, HEIGHT)).unwrap();
    board.resize(1, Rect::new(WIDTH + 10.0, 0.0, WIDTH, HEIGHT)).unwrap();
    board.restore().unwrap();

    let ids: Vec<BallId> = board.panel(0).unwrap().balls().iter().map(|b| b.id).collect();
    for (n, id) in ids.iter().enumerate() {
        let t = n as f64 * 1000.0;
        assert!(board.begin_drag(*id, DVec2::new(100.0, 100.0), t));
        let drop = DVec2::new(WIDTH + 60.0 + n as f64 * 20.0, 150.0);
        board.drop_ball(*id, 1, drop, t + 120.0).unwrap();
        board.frame();

        let owners: usize = board.panels().iter().filter(|p| p.contains(*id)).count();
        assert_eq!(owners, 1);
        assert_eq!(board.ball_count(), 10);
    }

    board.run_until_quiescent(500_000);
    assert!(board.is_quiescent());
    assert!(board.panel(0).unwrap().balls().is_empty());
    assert_eq!(board.panel(1).unwrap().balls().len(), 10);
}
