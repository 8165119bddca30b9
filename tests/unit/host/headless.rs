use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn host() -> HeadlessHost {
    HeadlessHost::new(Size::new(640, 480), HostClock::Virtual)
}

#[test]
fn timers_fire_in_deadline_order_and_repeat() {
    let mut h = host();
    h.set_timer(TimerId::Motion, ms(16));
    h.set_timer(TimerId::Animation, ms(40));

    let mut seen = Vec::new();
    for _ in 0..4 {
        let ev = h.next_event().unwrap();
        seen.push((h.now(), ev));
    }
    assert_eq!(
        seen,
        vec![
            (ms(16), HostEvent::Timer(TimerId::Motion)),
            (ms(32), HostEvent::Timer(TimerId::Motion)),
            (ms(40), HostEvent::Timer(TimerId::Animation)),
            (ms(48), HostEvent::Timer(TimerId::Motion)),
        ]
    );
}

#[test]
fn rearming_replaces_the_previous_deadline() {
    let mut h = host();
    h.set_timer(TimerId::Animation, ms(100));
    h.set_timer(TimerId::Animation, ms(10));
    assert_eq!(h.next_event(), Some(HostEvent::Timer(TimerId::Animation)));
    assert_eq!(h.now(), ms(10));
    assert_eq!(h.timer_period(TimerId::Animation), Some(ms(10)));
}

#[test]
fn killed_timers_never_fire_and_empty_loop_ends() {
    let mut h = host();
    h.set_timer(TimerId::Motion, ms(16));
    assert!(h.kill_timer(TimerId::Motion));
    assert!(!h.kill_timer(TimerId::Motion));
    assert_eq!(h.next_event(), None);
}

#[test]
fn hotkey_press_is_delivered_only_when_registered() {
    let mut h = host();
    h.schedule(ms(5), ScriptedSignal::PressHotkey(Hotkey::EXIT_DEFAULT));
    assert_eq!(h.next_event(), None);

    let mut h = host();
    let id = h.register_hotkey(Hotkey::EXIT_DEFAULT).unwrap();
    h.schedule(ms(5), ScriptedSignal::PressHotkey(Hotkey::EXIT_DEFAULT));
    assert_eq!(h.next_event(), Some(HostEvent::Hotkey(id)));
    assert_eq!(h.now(), ms(5));
}

#[test]
fn hotkeys_cannot_be_registered_twice() {
    let mut h = host();
    let id = h.register_hotkey(Hotkey::EXIT_DEFAULT).unwrap();
    assert!(h.register_hotkey(Hotkey::EXIT_DEFAULT).is_err());
    h.unregister_hotkey(id).unwrap();
    assert!(h.unregister_hotkey(id).is_err());
    assert_eq!(h.registered_hotkeys().count(), 0);
}

#[test]
fn scripted_signals_win_ties_with_timers() {
    let mut h = host();
    h.set_timer(TimerId::Motion, ms(16));
    h.schedule(ms(16), ScriptedSignal::Close);
    assert_eq!(h.next_event(), Some(HostEvent::CloseRequested));
    assert_eq!(h.next_event(), Some(HostEvent::Timer(TimerId::Motion)));
}

#[test]
fn surface_loss_and_restore() {
    let mut h = host();
    h.schedule(ms(1), ScriptedSignal::LoseSurface);
    h.schedule(ms(2), ScriptedSignal::RestoreSurface);
    assert_eq!(h.next_event(), Some(HostEvent::SurfaceRestored));
    assert!(h.headless_surface().is_alive());

    let buf = PixelBuffer::allocate(Size::new(1, 1)).unwrap();
    h.schedule(ms(3), ScriptedSignal::DestroySurface);
    assert_eq!(h.next_event(), Some(HostEvent::SurfaceDestroyed));
    let err = h
        .surface()
        .update_layered(&buf, Point::new(0, 0), BlendFunction::PER_PIXEL_OVER)
        .unwrap_err();
    assert!(matches!(err, OverlayError::Present(_)));
    assert!(!h.headless_surface().is_visible());
}

#[test]
fn surface_becomes_visible_on_first_accepted_frame() {
    let mut h = host();
    h.capture_frames(true);
    h.headless_surface_mut().fail_next(1);
    let buf = PixelBuffer::allocate(Size::new(2, 1)).unwrap();

    assert!(
        h.surface()
            .update_layered(&buf, Point::new(4, 5), BlendFunction::PER_PIXEL_OVER)
            .is_err()
    );
    assert!(!h.headless_surface().is_visible());

    h.surface()
        .update_layered(&buf, Point::new(4, 5), BlendFunction::PER_PIXEL_OVER)
        .unwrap();
    let s = h.headless_surface();
    assert!(s.is_visible());
    assert_eq!(s.attempts(), 2);
    assert_eq!(s.accepted(), 1);
    assert_eq!(s.last_position(), Some(Point::new(4, 5)));
    assert_eq!(s.last_frame().unwrap().dimensions(), (2, 1));
}

#[test]
fn style_and_notifications_are_recorded() {
    let mut h = host();
    h.apply_overlay_style(OverlayStyle::overlay()).unwrap();
    assert_eq!(h.style(), OverlayStyle::overlay());
    h.notify_error("bouncegif", "boom");
    assert_eq!(
        h.notifications(),
        &[("bouncegif".to_string(), "boom".to_string())]
    );

    let mut h = host();
    h.refuse_style();
    assert!(h.apply_overlay_style(OverlayStyle::overlay()).is_err());
}
