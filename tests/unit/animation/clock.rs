use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn reschedules_with_newly_active_frame_duration() {
    let mut clock = AnimationClock::new();
    let table = DurationTable::from_centiseconds(Some(&[5, 10, 1]), 3);
    assert_eq!(clock.start(table).unwrap(), ms(50));

    let expected = [(1, 100), (2, 10), (0, 50), (1, 100)];
    for (frame_index, delay) in expected {
        assert_eq!(
            clock.tick(),
            Some(ClockTick {
                frame_index,
                next_delay: ms(delay),
            })
        );
    }
}

#[test]
fn index_steps_by_exactly_one_modulo_frame_count() {
    let mut clock = AnimationClock::new();
    clock.start(DurationTable::uniform(20, 7)).unwrap();
    let mut prev = clock.active_frame().unwrap();
    for _ in 0..50 {
        let t = clock.tick().unwrap();
        assert_eq!(t.frame_index, (prev + 1) % 7);
        prev = t.frame_index;
    }
}

#[test]
fn single_frame_stays_on_zero() {
    let mut clock = AnimationClock::new();
    clock.start(DurationTable::uniform(30, 1)).unwrap();
    for _ in 0..3 {
        assert_eq!(clock.tick().unwrap().frame_index, 0);
    }
}

#[test]
fn empty_table_starts_with_default_delay() {
    let mut clock = AnimationClock::new();
    assert_eq!(
        clock.start(DurationTable::uniform(40, 0)).unwrap(),
        ms(u64::from(DEFAULT_FRAME_DELAY_MS))
    );
    assert_eq!(clock.tick().unwrap().frame_index, 0);
}

#[test]
fn idle_and_stopped_never_tick() {
    let mut clock = AnimationClock::new();
    assert_eq!(clock.tick(), None);

    clock.start(DurationTable::uniform(20, 2)).unwrap();
    assert!(clock.stop());
    assert_eq!(clock.phase(), ClockPhase::Stopped);
    assert_eq!(clock.tick(), None);

    assert!(!clock.stop());
    assert_eq!(clock.phase(), ClockPhase::Stopped);
}

#[test]
fn start_requires_idle_and_reset_rearms() {
    let mut clock = AnimationClock::new();
    clock.start(DurationTable::uniform(20, 2)).unwrap();
    assert!(clock.start(DurationTable::uniform(20, 2)).is_err());

    clock.stop();
    assert!(clock.start(DurationTable::uniform(20, 2)).is_err());

    clock.reset();
    assert_eq!(clock.phase(), ClockPhase::Idle);
    assert!(clock.start(DurationTable::uniform(20, 2)).is_ok());
    assert_eq!(clock.active_frame(), Some(0));
}
