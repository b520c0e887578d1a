// MIT/Apache2 License

use lyon_geom::{euclid::Size2D, Point, Rect};
use slate::{
    AcceleratedSurface, Color, FailureCause, HeadlessToolkit, MirrorStatus, RenderOutcome, ShapeStyle,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn blit_reflects_pixels() {
    init();
    let mut tk = HeadlessToolkit::new(1024, 768);
    let target = tk.create_target(4, 4).unwrap();

    let mut s = AcceleratedSurface::new(2, 2, true).unwrap();
    s.clear(0x80_00_00_FF);
    s.set_pixel(1, 1, 0xFF_FF_00_00);

    assert!(s.render(&mut tk, target, 1, 1).unwrap().succeeded());

    let out = tk.target_pixels(target).unwrap();
    assert_eq!(out[1 + 4], 0x80_00_00_FF);
    assert_eq!(out[2 + 2 * 4], 0xFF_FF_00_00);
    assert_eq!(out[0], 0);
}

#[test]
fn recovers_from_display_mode_change() {
    init();
    let mut tk = HeadlessToolkit::default();
    let target = tk.create_target(2, 2).unwrap();
    let mut s = AcceleratedSurface::new(1, 1, false).unwrap();

    s.render(&mut tk, target, 0, 0).unwrap();
    let first = s.mirror_image().unwrap();

    tk.change_display_mode(1920, 1080);
    let outcome = s.render(&mut tk, target, 0, 0).unwrap();
    assert_eq!(outcome, RenderOutcome::Rendered { attempts: 1 });
    assert_ne!(s.mirror_image(), Some(first));
    assert_eq!(tk.image_pixels(first), None);
    assert_eq!(tk.stats().flushed_with_live_context, 0);
}

#[test]
fn recovers_lost_contents_from_pixels() {
    init();
    let mut tk = HeadlessToolkit::default();
    let target = tk.create_target(1, 1).unwrap();
    let mut s = AcceleratedSurface::new(1, 1, true).unwrap();
    s.set_pixel(0, 0, 0x12_34_56_78);

    s.render(&mut tk, target, 0, 0).unwrap();
    tk.reclaim_memory();

    let outcome = s.render(&mut tk, target, 0, 0).unwrap();
    assert_eq!(outcome.attempts(), 1);
    assert_eq!(
        tk.image_pixels(s.mirror_image().unwrap()).unwrap(),
        &[0x12_34_56_78]
    );
    assert_eq!(tk.target_pixels(target).unwrap(), &[0x12_34_56_78]);
}

#[test]
fn mixed_failures_report_the_last_cause() {
    init();
    let mut tk = HeadlessToolkit::default();
    let target = tk.create_target(1, 1).unwrap();
    let mut s = AcceleratedSurface::new(1, 1, false).unwrap();

    tk.script_validation(vec![
        MirrorStatus::Incompatible,
        MirrorStatus::Restored,
        MirrorStatus::Incompatible,
        MirrorStatus::Incompatible,
        MirrorStatus::Restored,
    ]);

    let outcome = s.render(&mut tk, target, 0, 0).unwrap();
    assert_eq!(outcome.failure_cause(), Some(FailureCause::DataLoss));

    // exhaustion is not sticky
    assert!(s.render(&mut tk, target, 0, 0).unwrap().succeeded());
}

#[test]
fn drawing_goes_to_the_mirror() {
    init();
    let mut tk = HeadlessToolkit::default();
    let target = tk.create_target(2, 1).unwrap();

    let mut stamp = AcceleratedSurface::new(1, 1, false).unwrap();
    stamp.set_pixel(0, 0, 0xAB);
    stamp.accelerate(&mut tk).unwrap();

    let mut s = AcceleratedSurface::new(2, 1, true).unwrap();
    s.accelerate(&mut tk).unwrap();
    s.set_draw_color(&mut tk, Color::WHITE).unwrap();
    s.draw_image(&mut tk, stamp.mirror_image().unwrap(), 1, 0)
        .unwrap();

    let mirror = s.mirror_image().unwrap();
    assert_eq!(tk.image_pixels(mirror).unwrap(), &[0, 0xFF_00_00_AB]);

    s.render(&mut tk, target, 0, 0).unwrap();
    assert_eq!(tk.target_pixels(target).unwrap(), &[0, 0xFF_00_00_AB]);

    s.destroy(&mut tk);
    stamp.destroy(&mut tk);
    // only the target is left
    assert_eq!(tk.live_images(), 1);
    assert_eq!(tk.live_contexts(), 1);
    assert_eq!(tk.stats().flushed_with_live_context, 0);
}

#[test]
fn shapes_on_the_mirror_do_not_survive_recovery() {
    init();
    let mut tk = HeadlessToolkit::default();
    let target = tk.create_target(2, 2).unwrap();
    let mut s = AcceleratedSurface::new(2, 2, true).unwrap();
    s.clear(0x40_00_FF_00);

    s.accelerate(&mut tk).unwrap();
    s.set_draw_color(&mut tk, Color::WHITE).unwrap();
    let rect = Rect::new(Point::new(0.0, 0.0), Size2D::new(2.0, 2.0));
    s.draw_shape(&mut tk, &rect.into(), ShapeStyle::Fill).unwrap();

    s.render(&mut tk, target, 0, 0).unwrap();
    assert_eq!(tk.target_pixels(target).unwrap(), &[Color::WHITE.argb(); 4]);

    tk.reclaim_memory();
    let outcome = s.render(&mut tk, target, 0, 0).unwrap();
    assert_eq!(outcome.attempts(), 1);
    assert_eq!(tk.target_pixels(target).unwrap(), &[0x40_00_FF_00; 4]);
    assert_eq!(tk.stats().flushed_with_live_context, 0);
}
