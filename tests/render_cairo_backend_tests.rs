#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use jasper_charts::ChartError;
use jasper_charts::api::{ChartEngine, ChartEngineConfig};
use jasper_charts::chart::{
    GaugeChart, GaugeData, PieChart, PieChartData, PieSlice, RadarChart, RadarChartData,
    RadarSubject,
};
use jasper_charts::core::{TextMeasurer, Viewport};
use jasper_charts::render::{CairoRenderer, Color, PangoTextMeasurer};

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn pango_measurer_reports_positive_bounds() {
    let measurer = PangoTextMeasurer::new().expect("measurer");
    let bounds = measurer.measure("english", 14.0);
    assert!(bounds.width > 0.0);
    assert!(bounds.height > 0.0);
    assert_eq!(measurer.measure("", 14.0).width, 0.0);
}

#[test]
fn cairo_renderer_draws_full_radar_chart() {
    let renderer = CairoRenderer::new(480, 480).expect("renderer");
    let measurer = PangoTextMeasurer::new().expect("measurer");
    let config = ChartEngineConfig::new(Viewport::new(480, 480));
    let mut engine =
        ChartEngine::new(RadarChart::default(), renderer, measurer, config).expect("engine init");
    engine
        .chart_mut()
        .set_data(
            RadarChartData::new(vec![
                RadarSubject::new("math", 62.0),
                RadarSubject::new("english", 48.0),
                RadarSubject::new("science", 71.0),
            ]),
            false,
        )
        .expect("valid data");
    engine.chart_mut().set_progress(1.0);

    engine.render().expect("render");
    let stats = engine.into_renderer().last_stats();
    assert_eq!(stats.paths_drawn, 2);
    assert_eq!(stats.lines_drawn, 3);
    assert!(stats.circles_drawn > 0);
    assert!(stats.texts_drawn >= 3);
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let renderer = CairoRenderer::new(300, 300).expect("renderer");
    let config = ChartEngineConfig::new(Viewport::new(300, 300));
    let mut engine =
        ChartEngine::with_monospace_text(PieChart::default(), renderer, config).expect("init");
    engine
        .chart_mut()
        .set_data(PieChartData::new(vec![
            PieSlice::new(0.6, Color::rgb(0.9, 0.3, 0.2)),
            PieSlice::new(0.4, Color::rgb(0.2, 0.5, 0.9)),
        ]))
        .expect("valid data");

    let surface = ImageSurface::create(Format::ARgb32, 300, 300).expect("surface");
    let context = Context::new(&surface).expect("context");
    engine
        .render_on_cairo_context(&context)
        .expect("render on context");
    assert!(!engine.needs_redraw());

    let stats = engine.into_renderer().last_stats();
    assert_eq!(stats.arcs_drawn, 2);
    assert_eq!(stats.texts_drawn, 2);
}

#[test]
fn gauge_renders_ring_and_value_arc() {
    let renderer = CairoRenderer::new(200, 200).expect("renderer");
    let config = ChartEngineConfig::new(Viewport::new(200, 200));
    let mut engine =
        ChartEngine::with_monospace_text(GaugeChart::default(), renderer, config).expect("init");
    engine
        .chart_mut()
        .set_data(GaugeData::new(3.0, 4.0).with_unit("h"))
        .expect("valid data");

    assert!(engine.render_if_needed().expect("render"));
    let stats = engine.renderer().last_stats();
    assert_eq!(stats.circles_drawn, 1);
    assert_eq!(stats.arcs_drawn, 1);
    assert_eq!(stats.texts_drawn, 2);
}
