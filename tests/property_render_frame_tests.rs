use jasper_charts::api::{ChartEngine, ChartEngineConfig};
use jasper_charts::chart::{
    BarChart, BarChartData, GraphLine, LineChart, LineChartData, PieChart, PieChartData, PieSlice,
    RadarChart, RadarChartData, RadarSubject,
};
use jasper_charts::core::{AxisLabel, Viewport, YAxisTick};
use jasper_charts::render::{Color, NullRenderer};
use proptest::prelude::*;

const PALETTE: [Color; 3] = [
    Color::rgb(0.9, 0.2, 0.2),
    Color::rgb(0.2, 0.6, 0.9),
    Color::rgb(0.3, 0.8, 0.4),
];

fn viewport() -> impl Strategy<Value = Viewport> {
    (1u32..1600u32, 1u32..1200u32).prop_map(|(width, height)| Viewport::new(width, height))
}

proptest! {
    #[test]
    fn line_frames_are_deterministic_and_finite(
        viewport in viewport(),
        y_min in -500.0f64..500.0,
        span in 0.0f64..1000.0,
        steps in 1u32..12,
        samples in prop::collection::vec(prop::option::of(-1000.0f64..1000.0), 0..24),
        select in any::<bool>(),
    ) {
        let y_max = y_min + span;
        let y_step = if span > 0.0 { span / f64::from(steps) } else { 1.0 };
        let data = LineChartData {
            x_axis_labels: (0..samples.len())
                .map(|index| AxisLabel::single(format!("{index}")))
                .collect(),
            y_min,
            y_max,
            y_step,
            lines: vec![
                GraphLine::new("a", PALETTE[0], samples.clone()),
                GraphLine::new("b", PALETTE[1], samples.iter().rev().copied().collect()),
            ],
        };

        let config = ChartEngineConfig::new(viewport);
        let mut engine =
            ChartEngine::with_monospace_text(LineChart::default(), NullRenderer::default(), config)
                .expect("engine init");
        engine.chart_mut().set_data(data).expect("valid data");
        if select {
            engine.chart_mut().select_key("a");
        }

        let first = engine.build_render_frame().expect("first frame");
        let second = engine.build_render_frame().expect("second frame");
        prop_assert_eq!(&first, &second);
        prop_assert!(first.validate().is_ok());
        prop_assert!(first.lines().all(|line| line.stroke_width > 0.0));
    }

    #[test]
    fn bar_frames_are_finite_for_any_stack(
        viewport in viewport(),
        stacks in prop::collection::vec(prop::collection::vec(0.0f64..500.0, 0..5), 0..16),
        y_max in 0.0f64..1000.0,
    ) {
        let data = BarChartData {
            x_axis: (0..stacks.len())
                .map(|index| AxisLabel::single(format!("d{index}")))
                .collect(),
            y_axis: vec![YAxisTick::new("0", 0.0), YAxisTick::new("max", y_max)],
            values: stacks,
            labels: Vec::new(),
            colors: PALETTE.to_vec(),
            y_max,
        };

        let config = ChartEngineConfig::new(viewport);
        let mut engine =
            ChartEngine::with_monospace_text(BarChart::default(), NullRenderer::default(), config)
                .expect("engine init");
        engine.chart_mut().set_data(data).expect("valid data");

        let frame = engine.build_render_frame().expect("frame");
        prop_assert!(frame.validate().is_ok());
        prop_assert!(frame.rects().all(|rect| rect.height >= 0.0 && rect.width >= 0.0));
    }

    #[test]
    fn pie_sweeps_never_exceed_their_share(
        viewport in viewport(),
        values in prop::collection::vec(0.0f64..0.3, 0..8),
    ) {
        let data = PieChartData::new(
            values
                .iter()
                .enumerate()
                .map(|(index, value)| PieSlice::new(*value, PALETTE[index % PALETTE.len()]))
                .collect(),
        );
        let total = data.total();

        let config = ChartEngineConfig::new(viewport);
        let mut engine =
            ChartEngine::with_monospace_text(PieChart::default(), NullRenderer::default(), config)
                .expect("engine init");
        engine.chart_mut().set_data(data).expect("valid data");

        let frame = engine.build_render_frame().expect("frame");
        prop_assert!(frame.validate().is_ok());
        let swept: f64 = frame.arcs().map(|arc| arc.sweep_degrees).sum();
        prop_assert!((swept - total * 360.0).abs() < 1e-6);
    }

    #[test]
    fn radar_frames_are_finite_at_any_progress(
        viewport in viewport(),
        scores in prop::collection::vec(0.0f64..100.0, 0..10),
        progress in 0.0f64..1.0,
        use_deviation in any::<bool>(),
    ) {
        let data = RadarChartData::new(
            scores
                .iter()
                .enumerate()
                .map(|(index, score)| RadarSubject::new(format!("s{index}"), *score))
                .collect(),
        );

        let config = ChartEngineConfig::new(viewport);
        let mut engine =
            ChartEngine::with_monospace_text(RadarChart::default(), NullRenderer::default(), config)
                .expect("engine init");
        engine
            .chart_mut()
            .set_data(data, use_deviation)
            .expect("valid data");
        engine.chart_mut().set_progress(progress);

        let first = engine.build_render_frame().expect("first frame");
        let second = engine.build_render_frame().expect("second frame");
        prop_assert_eq!(&first, &second);
        prop_assert!(first.validate().is_ok());
    }
}
