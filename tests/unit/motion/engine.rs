use super::*;

#[test]
fn right_edge_bounce_scenario() {
    let s = MotionState::new(Point::new(900, 10), Velocity::new(6, 5), Size::new(320, 240));
    let (next, bounce) = s.tick(Size::new(1000, 800));
    assert_eq!(next.position, Point::new(680, 15));
    assert_eq!(next.velocity, Velocity::new(-6, 5));
    assert_eq!(bounce, Bounce { x: true, y: false });
}

#[test]
fn left_and_top_edges_clamp_to_zero() {
    let s = MotionState::new(Point::new(3, 2), Velocity::new(-6, -5), Size::new(10, 10));
    let (next, bounce) = s.tick(Size::new(100, 100));
    assert_eq!(next.position, Point::new(0, 0));
    assert_eq!(next.velocity, Velocity::new(6, 5));
    assert_eq!(bounce, Bounce { x: true, y: true });
}

#[test]
fn extreme_velocities_bounce_without_overflow() {
    let s = MotionState::new(Point::new(5, 5), Velocity::new(i32::MIN, 1), Size::new(10, 10));
    let (next, bounce) = s.tick(Size::new(100, 100));
    assert_eq!(next.position, Point::new(0, 6));
    assert_eq!(next.velocity, Velocity::new(i32::MAX, 1));
    assert_eq!(bounce, Bounce { x: true, y: false });

    let (next, _) = next.tick(Size::new(100, 100));
    assert_eq!(next.position, Point::new(90, 7));
    assert_eq!(next.velocity, Velocity::new(-i32::MAX, 1));

    let wide = MotionState::new(Point::new(0, 0), Velocity::new(i32::MIN, 0), Size::new(200, 10));
    let (next, _) = wide.tick(Size::new(100, 100));
    assert_eq!(next.position.x, 0);
    assert_eq!(next.velocity.vx, i32::MAX);
}

#[test]
fn corner_hit_flips_both_axes() {
    let s = MotionState::new(Point::new(88, 89), Velocity::new(6, 5), Size::new(10, 10));
    let (next, bounce) = s.tick(Size::new(100, 100));
    assert_eq!(next.position, Point::new(90, 90));
    assert_eq!(next.velocity, Velocity::new(-6, -5));
    assert_eq!(bounce, Bounce { x: true, y: true });
}

#[test]
fn stays_in_bounds_and_keeps_speed_over_many_ticks() {
    let bounds = Size::new(1000, 800);
    let size = Size::new(320, 240);
    let mut s = MotionState::new(Point::new(500, 300), Velocity::new(6, 5), size);
    for _ in 0..10_000 {
        let before = s.velocity;
        let (next, bounce) = s.tick(bounds);
        assert!((0..=680).contains(&next.position.x));
        assert!((0..=560).contains(&next.position.y));
        assert_eq!(next.velocity.vx.abs(), 6);
        assert_eq!(next.velocity.vy.abs(), 5);
        assert_eq!(bounce.x, next.velocity.vx != before.vx);
        assert_eq!(bounce.y, next.velocity.vy != before.vy);
        s = next;
    }
}

#[test]
fn oversized_sprite_is_pinned_to_origin() {
    let s = MotionState::new(Point::new(0, 0), Velocity::new(4, 0), Size::new(200, 10));
    let (next, bounce) = s.tick(Size::new(100, 100));
    assert_eq!(next.position.x, 0);
    assert!(bounce.x);
}

#[test]
fn engine_only_ticks_while_running() {
    let state = MotionState::new(Point::new(0, 0), Velocity::new(1, 1), Size::new(1, 1));
    let mut e = MotionEngine::new(state, Duration::from_millis(16));
    assert_eq!(e.tick(Size::new(10, 10)), None);

    assert_eq!(e.start(), Duration::from_millis(16));
    assert!(e.tick(Size::new(10, 10)).is_some());
    assert_eq!(e.position(), Point::new(1, 1));
    assert_eq!(e.ticks(), 1);

    assert!(e.stop());
    assert!(!e.stop());
    assert_eq!(e.tick(Size::new(10, 10)), None);
    assert_eq!(e.position(), Point::new(1, 1));
}
