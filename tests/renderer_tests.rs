//! Integration tests for the guideline renderer and its widget

use ratatui::buffer::Buffer as TuiBuffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use guideline::plugins::guidelines::settings::parse_hex_color;
use guideline::plugins::guidelines::{
    GuidelineOverlay, GuidelineRenderer, GuidelineSettings, GuidelineWidget,
};
use guideline::workspace::{ScrollSurface, SurfaceId, SurfaceKind};

fn surface(id: u64, kind: SurfaceKind, viewport: Rect) -> ScrollSurface {
    ScrollSurface {
        id: SurfaceId(id),
        kind,
        viewport,
        gutter_width: 5,
        horizontal_scroll: 0,
    }
}

fn bg(buf: &TuiBuffer, x: u16, y: u16) -> Color {
    buf[(x, y)].bg
}

fn settings(columns: i64, color: &str, enabled: bool) -> GuidelineSettings {
    GuidelineSettings {
        columns,
        column_color: color.to_string(),
        enabled,
    }
}

#[test]
fn test_render_is_idempotent() {
    let mut renderer = GuidelineRenderer::new(GuidelineSettings::default());
    let surfaces = [surface(1, SurfaceKind::Primary, Rect::new(0, 0, 100, 30))];

    renderer.render_guidelines(&surfaces);
    renderer.render_guidelines(&surfaces);
    renderer.render_guidelines(&surfaces);

    assert_eq!(renderer.overlay_count(), 1);
    assert_eq!(renderer.render_passes(), 3);

    let overlay = renderer.overlay(SurfaceId(1)).unwrap();
    assert_eq!(overlay.min_height, 30);
    assert_eq!(overlay.column, 80);
    assert_eq!(overlay.color, Color::Rgb(0xB0, 0xB4, 0xB9));
}

#[test]
fn test_disabled_renderer_draws_nothing() {
    let mut renderer = GuidelineRenderer::new(settings(40, "#000000", false));
    let surfaces = [surface(1, SurfaceKind::Primary, Rect::new(0, 0, 100, 30))];

    renderer.render_guidelines(&surfaces);

    assert_eq!(renderer.overlay_count(), 0);
    assert_eq!(renderer.render_passes(), 0);
}

#[test]
fn test_out_of_range_columns_fall_back_to_default() {
    for columns in [0, -5, 1001] {
        let mut renderer = GuidelineRenderer::new(settings(columns, "#B0B4B9", true));
        renderer.render_guidelines(&[surface(1, SurfaceKind::Primary, Rect::new(0, 0, 120, 10))]);

        assert_eq!(renderer.overlay(SurfaceId(1)).unwrap().column, 80, "columns = {columns}");
    }
}

#[test]
fn test_boundary_columns_are_used_as_is() {
    for columns in [1, 1000] {
        let mut renderer = GuidelineRenderer::new(settings(columns, "#B0B4B9", true));
        renderer.render_guidelines(&[surface(1, SurfaceKind::Primary, Rect::new(0, 0, 120, 10))]);

        assert_eq!(
            renderer.overlay(SurfaceId(1)).unwrap().column,
            columns as u16
        );
    }
}

#[test]
fn test_nested_surfaces_each_get_an_overlay() {
    let mut renderer = GuidelineRenderer::new(GuidelineSettings::default());
    let surfaces = [
        surface(1, SurfaceKind::Primary, Rect::new(0, 0, 100, 30)),
        surface(2, SurfaceKind::Inline, Rect::new(0, 4, 100, 6)),
    ];

    renderer.render_guidelines(&surfaces);

    assert_eq!(renderer.overlay_count(), 2);
    assert_eq!(renderer.overlay(SurfaceId(1)).unwrap().min_height, 30);
    assert_eq!(renderer.overlay(SurfaceId(2)).unwrap().min_height, 6);
}

#[test]
fn test_overlays_of_vanished_surfaces_are_dropped() {
    let mut renderer = GuidelineRenderer::new(GuidelineSettings::default());
    let primary = surface(1, SurfaceKind::Primary, Rect::new(0, 0, 100, 30));
    let inline = surface(2, SurfaceKind::Inline, Rect::new(0, 4, 100, 6));

    renderer.render_guidelines(&[primary, inline]);
    assert_eq!(renderer.overlay_count(), 2);

    renderer.render_guidelines(&[primary]);
    assert_eq!(renderer.overlay_count(), 1);
    assert!(renderer.overlay(SurfaceId(2)).is_none());
}

#[test]
fn test_overlay_tracks_viewport_height() {
    let mut renderer = GuidelineRenderer::new(GuidelineSettings::default());

    renderer.render_guidelines(&[surface(1, SurfaceKind::Primary, Rect::new(0, 0, 100, 30))]);
    renderer.render_guidelines(&[surface(1, SurfaceKind::Primary, Rect::new(0, 0, 100, 12))]);

    assert_eq!(renderer.overlay_count(), 1);
    assert_eq!(renderer.overlay(SurfaceId(1)).unwrap().min_height, 12);
}

#[test]
fn test_refresh_settings_only_clears_on_change() {
    let mut renderer = GuidelineRenderer::new(GuidelineSettings::default());
    let surfaces = [surface(1, SurfaceKind::Primary, Rect::new(0, 0, 100, 30))];
    renderer.render_guidelines(&surfaces);

    assert!(!renderer.refresh_settings(GuidelineSettings::default()));
    assert_eq!(renderer.overlay_count(), 1);

    assert!(renderer.refresh_settings(settings(40, "#abc", true)));
    assert_eq!(renderer.overlay_count(), 0);

    renderer.render_guidelines(&surfaces);
    let overlay = renderer.overlay(SurfaceId(1)).unwrap();
    assert_eq!(overlay.column, 40);
    assert_eq!(overlay.color, Color::Rgb(0xAA, 0xBB, 0xCC));
}

#[test]
fn test_parse_hex_color() {
    assert_eq!(parse_hex_color("#B0B4B9"), Some(Color::Rgb(176, 180, 185)));
    assert_eq!(parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
    assert_eq!(parse_hex_color("#000"), Some(Color::Rgb(0, 0, 0)));
    assert_eq!(parse_hex_color("B0B4B9"), None);
    assert_eq!(parse_hex_color("#B0B4B"), None);
    assert_eq!(parse_hex_color("#ggg"), None);
}

#[test]
fn test_widget_paints_the_guideline_column() {
    let area = Rect::new(0, 0, 40, 10);
    let surface = surface(1, SurfaceKind::Primary, area);
    let overlay = GuidelineOverlay {
        surface: SurfaceId(1),
        min_height: 10,
        column: 10,
        color: Color::Rgb(1, 2, 3),
    };
    let mut buf = TuiBuffer::empty(area);

    let widget = GuidelineWidget::new(&overlay, &surface);
    assert_eq!(widget.screen_x(), Some(15));
    widget.render(area, &mut buf);

    for y in 0..10 {
        assert_eq!(bg(&buf, 15, y), Color::Rgb(1, 2, 3));
        assert_eq!(bg(&buf, 14, y), Color::Reset);
        assert_eq!(bg(&buf, 16, y), Color::Reset);
    }
}

#[test]
fn test_widget_respects_min_height() {
    let area = Rect::new(0, 0, 40, 10);
    let surface = surface(1, SurfaceKind::Primary, area);
    let overlay = GuidelineOverlay {
        surface: SurfaceId(1),
        min_height: 3,
        column: 10,
        color: Color::Red,
    };
    let mut buf = TuiBuffer::empty(area);

    GuidelineWidget::new(&overlay, &surface).render(area, &mut buf);

    assert_eq!(bg(&buf, 15, 2), Color::Red);
    assert_eq!(bg(&buf, 15, 3), Color::Reset);
}

#[test]
fn test_widget_stays_inside_nested_viewport() {
    let area = Rect::new(0, 0, 40, 10);
    let inline = surface(2, SurfaceKind::Inline, Rect::new(0, 4, 40, 3));
    let overlay = GuidelineOverlay {
        surface: SurfaceId(2),
        min_height: 3,
        column: 10,
        color: Color::Green,
    };
    let mut buf = TuiBuffer::empty(area);

    GuidelineWidget::new(&overlay, &inline).render(area, &mut buf);

    assert_eq!(bg(&buf, 15, 3), Color::Reset);
    assert_eq!(bg(&buf, 15, 4), Color::Green);
    assert_eq!(bg(&buf, 15, 6), Color::Green);
    assert_eq!(bg(&buf, 15, 7), Color::Reset);
}

#[test]
fn test_widget_follows_horizontal_scroll() {
    let mut surface = surface(1, SurfaceKind::Primary, Rect::new(0, 0, 40, 10));
    let overlay = GuidelineOverlay {
        surface: SurfaceId(1),
        min_height: 10,
        column: 10,
        color: Color::Red,
    };

    surface.horizontal_scroll = 4;
    assert_eq!(GuidelineWidget::new(&overlay, &surface).screen_x(), Some(11));

    surface.horizontal_scroll = 11;
    assert_eq!(GuidelineWidget::new(&overlay, &surface).screen_x(), None);
}

#[test]
fn test_widget_skips_columns_past_the_text_area() {
    let area = Rect::new(0, 0, 40, 10);
    let surface = surface(1, SurfaceKind::Primary, area);
    let overlay = GuidelineOverlay {
        surface: SurfaceId(1),
        min_height: 10,
        column: 80,
        color: Color::Red,
    };
    let mut buf = TuiBuffer::empty(area);

    let widget = GuidelineWidget::new(&overlay, &surface);
    assert_eq!(widget.screen_x(), None);
    widget.render(area, &mut buf);

    assert!((0..40).all(|x| bg(&buf, x, 0) == Color::Reset));
}
