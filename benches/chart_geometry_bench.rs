use criterion::{Criterion, criterion_group, criterion_main};
use jasper_charts::api::{ChartEngine, ChartEngineConfig};
use jasper_charts::chart::{GraphLine, LineChart, LineChartData, polygon_vertices};
use jasper_charts::core::{
    AxisLabel, Coordinate, LayoutInput, LayoutStyle, MonospaceTextMeasurer, Viewport, YAxisTick,
    compute_layout,
};
use jasper_charts::render::{Color, NullRenderer};
use std::hint::black_box;

fn bench_polygon_vertices_12(c: &mut Criterion) {
    let center = Coordinate::new(540.0, 540.0);
    let ratios: Vec<f64> = (0..12).map(|i| 0.3 + f64::from(i) * 0.05).collect();
    let labels: Vec<String> = (0..12).map(|i| format!("subject {i}")).collect();

    c.bench_function("polygon_vertices_12", |b| {
        b.iter(|| {
            let _ = polygon_vertices(
                black_box(&center),
                black_box(400.0),
                black_box(&ratios),
                black_box(&labels),
                black_box(0.75),
            )
            .expect("vertices should build");
        })
    });
}

fn bench_compute_layout_31(c: &mut Criterion) {
    let x_labels: Vec<AxisLabel> = (1..=31)
        .map(|day| AxisLabel::new([format!("5/{day}"), "Mon".to_owned()]).expect("valid label"))
        .collect();
    let y_ticks: Vec<YAxisTick> = (0..=4)
        .map(|i| YAxisTick::new(format!("{}h", i * 2), f64::from(i * 2)))
        .collect();
    let measurer = MonospaceTextMeasurer::default();
    let style = LayoutStyle::default();

    c.bench_function("compute_layout_31", |b| {
        b.iter(|| {
            let input = LayoutInput {
                x_labels: &x_labels,
                y_ticks: &y_ticks,
                value_labels: &[],
                y_min: 0.0,
                y_max: 8.0,
            };
            let _ = compute_layout(
                black_box(Viewport::new(1080, 720)),
                &input,
                &measurer,
                &style,
            )
            .expect("layout should succeed");
        })
    });
}

fn bench_line_chart_frame_60(c: &mut Criterion) {
    let config = ChartEngineConfig::new(Viewport::new(1600, 900)).with_density(2.0);
    let mut engine =
        ChartEngine::with_monospace_text(LineChart::default(), NullRenderer::default(), config)
            .expect("engine init");

    let lines = (0..4)
        .map(|series| {
            let values = (0..60)
                .map(|i| (i % 7 != series).then(|| f64::from((i * 13 + series * 17) % 100)))
                .collect();
            GraphLine::new(
                format!("student-{series}"),
                Color::rgb(0.2 * f64::from(series), 0.4, 0.6),
                values,
            )
        })
        .collect();
    engine
        .chart_mut()
        .set_data(LineChartData {
            x_axis_labels: (0..60).map(|i| AxisLabel::single(format!("#{i}"))).collect(),
            y_min: 0.0,
            y_max: 100.0,
            y_step: 10.0,
            lines,
        })
        .expect("valid data");
    engine.chart_mut().select_key("student-1");

    c.bench_function("line_chart_frame_60", |b| {
        b.iter(|| {
            let _ = engine
                .build_render_frame()
                .expect("frame build should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_polygon_vertices_12,
    bench_compute_layout_31,
    bench_line_chart_frame_60
);
criterion_main!(benches);
