use image::{Rgba, RgbaImage};
use paint_canvas::canvas::input::{PointerButton, PointerEvent, PointerSample};
use paint_canvas::canvas::model::{Color, DeviceKind, PenPath, PenPoint, PointerId};
use paint_canvas::canvas::raster::RasterSurface;
use paint_canvas::canvas::render::{render_frame, render_stroke};
use paint_canvas::canvas::surface::{BlendMode, FillPaint, StrokePaint, Surface};
use paint_canvas::canvas::PaintCanvas;
use paint_canvas::settings::CanvasSettings;

#[derive(Default)]
struct PaintLog {
    lines: Vec<StrokePaint>,
    circles: Vec<(f32, FillPaint)>,
    polylines: Vec<(Vec<(f32, f32)>, StrokePaint)>,
}

impl Surface for PaintLog {
    fn clear(&mut self) {}

    fn draw_image_at_origin(&mut self, _image: &RgbaImage) {}

    fn draw_line(&mut self, _from: (f32, f32), _to: (f32, f32), paint: &StrokePaint) {
        self.lines.push(*paint);
    }

    fn draw_circle(&mut self, _center: (f32, f32), radius: f32, paint: &FillPaint) {
        self.circles.push((radius, *paint));
    }

    fn draw_polyline(&mut self, points: &[(f32, f32)], paint: &StrokePaint) {
        self.polylines.push((points.to_vec(), *paint));
    }

    fn flush(&mut self) {}
}

fn pen_point(x: f32, y: f32, pressure: f32, radius: f32) -> PenPoint {
    PenPoint {
        x,
        y,
        pressure: Some(pressure),
        radius,
        is_pen: true,
    }
}

fn mouse_event(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(PointerSample {
        pointer_id: PointerId(1),
        device: DeviceKind::Mouse,
        position: (x, y),
        pressure: None,
        button: Some(PointerButton::Primary),
    })
}

#[test]
fn mouse_scenario_renders_single_red_polyline_of_width_twenty() {
    let settings = CanvasSettings {
        brush_color: Color::RED,
        brush_size: 10.0,
        ..CanvasSettings::default()
    };
    let mut canvas = PaintCanvas::new(&settings, (64, 64));
    canvas.on_pointer_down(&mouse_event(0.0, 0.0));
    canvas.on_pointer_move(&mouse_event(10.0, 0.0));
    canvas.on_pointer_up(&mouse_event(10.0, 10.0));

    let mut log = PaintLog::default();
    canvas.render(&mut log, true);

    assert!(log.lines.is_empty());
    assert!(log.circles.is_empty());
    assert_eq!(log.polylines.len(), 1);
    let (points, paint) = &log.polylines[0];
    assert_eq!(points, &vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    assert_eq!(paint.width, 20.0);
    assert_eq!(paint.color, Color::RED);
    assert_eq!(paint.blend, BlendMode::SourceOver);
}

#[test]
fn erase_pen_scenario_uses_cutout_blend_with_pressure_width() {
    let mut eraser = PenPath::new(Color::RED, true);
    eraser.push(pen_point(0.0, 0.0, 0.5, 8.0));
    eraser.push(pen_point(6.0, 0.0, 0.5, 8.0));
    eraser.push(pen_point(12.0, 0.0, 0.5, 8.0));

    let mut log = PaintLog::default();
    render_stroke(&mut log, &eraser);

    assert!(log.polylines.is_empty());
    assert_eq!(log.lines.len(), 2);
    for paint in &log.lines {
        assert_eq!(paint.width, 10.0);
        assert_eq!(paint.blend, BlendMode::Clear);
        assert_eq!(paint.color.a, 0);
    }
    for (radius, paint) in &log.circles {
        assert_eq!(*radius, 5.0);
        assert_eq!(paint.blend, BlendMode::Clear);
    }
}

#[test]
fn rendering_twice_is_pixel_identical() {
    let background = RgbaImage::from_fn(32, 32, |x, y| Rgba([x as u8 * 8, y as u8 * 8, 40, 255]));
    let layer = RgbaImage::from_pixel(32, 32, Rgba([0, 0, 255, 96]));
    let mut stroke = PenPath::new(Color::rgba(255, 255, 0, 200), false);
    for i in 0..8 {
        stroke.push(pen_point(i as f32 * 4.0, 16.0 + (i % 3) as f32, 0.2 + i as f32 * 0.1, 3.0));
    }
    let mut eraser = PenPath::new(Color::BLACK, true);
    eraser.push(PenPoint {
        x: 4.0,
        y: 4.0,
        pressure: None,
        radius: 2.0,
        is_pen: false,
    });
    eraser.push(PenPoint {
        x: 28.0,
        y: 28.0,
        pressure: None,
        radius: 2.0,
        is_pen: false,
    });

    let render = || {
        let mut surface = RasterSurface::new(32, 32);
        render_frame(
            &mut surface,
            Some(&background),
            std::slice::from_ref(&layer),
            std::slice::from_ref(&eraser),
            std::slice::from_ref(&stroke),
            true,
        );
        surface.into_image()
    };

    assert_eq!(render(), render());
}

#[test]
fn cleared_canvas_renders_only_background_and_layers() {
    let background = RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 255]));
    let mut canvas = PaintCanvas::new(&CanvasSettings::default(), (16, 16));
    canvas.set_background(Some(background.clone()));
    canvas.on_pointer_down(&mouse_event(2.0, 2.0));
    canvas.on_pointer_up(&mouse_event(12.0, 12.0));

    canvas.clear_all();

    assert_eq!(canvas.snapshot(true), background);
    assert!(canvas.snapshot(false).pixels().all(|px| px.0 == [0, 0, 0, 0]));
}

#[test]
fn later_committed_strokes_draw_on_top() {
    let settings = CanvasSettings {
        brush_size: 3.0,
        ..CanvasSettings::default()
    };
    let mut canvas = PaintCanvas::new(&settings, (16, 16));
    canvas.brush_mut().color = Color::RED;
    canvas.on_pointer_down(&mouse_event(0.0, 8.0));
    canvas.on_pointer_up(&mouse_event(16.0, 8.0));
    canvas.brush_mut().color = Color::rgba(0, 0, 255, 255);
    canvas.on_pointer_down(&mouse_event(8.0, 0.0));
    canvas.on_pointer_up(&mouse_event(8.0, 16.0));

    let image = canvas.snapshot(true);
    assert_eq!(image.get_pixel(8, 8).0, [0, 0, 255, 255]);
    assert_eq!(image.get_pixel(2, 8).0, [255, 0, 0, 255]);
}
