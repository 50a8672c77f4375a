use approx::assert_abs_diff_eq;
use jasper_charts::ChartError;
use jasper_charts::chart::{
    ChartPainter, MAX_SCORE_LAYERS, RadarChart, RadarChartData, RadarChartStyle, RadarPalette,
    RadarSubject, adjust_label_position, polygon_vertices,
};
use jasper_charts::core::{Coordinate, MonospaceTextMeasurer, TextBounds, Viewport};
use jasper_charts::render::{CanvasLayerKind, DrawCommand, PaintStyle};

fn subjects(scores: &[f64]) -> RadarChartData {
    RadarChartData::new(
        scores
            .iter()
            .enumerate()
            .map(|(index, score)| RadarSubject::new(format!("subject {index}"), *score))
            .collect(),
    )
}

fn labels(count: usize) -> Vec<String> {
    (0..count).map(|index| index.to_string()).collect()
}

#[test]
fn four_full_ratios_form_an_axis_aligned_square() {
    let center = Coordinate::new(200.0, 200.0);
    let vertices =
        polygon_vertices(&center, 100.0, &[1.0; 4], &labels(4), 1.0).expect("vertices");

    let expected = [(200.0, 100.0), (300.0, 200.0), (200.0, 300.0), (100.0, 200.0)];
    for (vertex, (x, y)) in vertices.iter().zip(expected) {
        assert_abs_diff_eq!(vertex.x, x, epsilon = 1e-9);
        assert_abs_diff_eq!(vertex.y, y, epsilon = 1e-9);
    }
    assert_eq!(vertices[2].label.as_deref(), Some("2"));
}

#[test]
fn progress_scales_vertex_distance() {
    let center = Coordinate::new(0.0, 0.0);
    let vertices =
        polygon_vertices(&center, 100.0, &[0.5, 1.0, 0.25], &labels(3), 0.5).expect("vertices");

    assert_abs_diff_eq!(vertices[0].distance(&center), 25.0, epsilon = 1e-9);
    assert_abs_diff_eq!(vertices[1].distance(&center), 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(vertices[2].distance(&center), 12.5, epsilon = 1e-9);
}

#[test]
fn zero_progress_collapses_polygon_onto_center() {
    let center = Coordinate::new(50.0, 60.0);
    let vertices =
        polygon_vertices(&center, 100.0, &[1.0; 5], &labels(5), 0.0).expect("vertices");
    for vertex in vertices {
        assert_abs_diff_eq!(vertex.x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vertex.y, 60.0, epsilon = 1e-9);
    }
}

#[test]
fn mismatched_ratios_and_labels_are_rejected() {
    let err = polygon_vertices(&Coordinate::new(0.0, 0.0), 10.0, &[1.0; 3], &labels(2), 1.0)
        .expect_err("mismatch");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn label_reaching_past_ring_is_stretched_by_overlap() {
    let center = Coordinate::new(200.0, 200.0);
    let anchor = Coordinate::new(200.0, 90.0);

    // Nearest box point is (200, 95): 105px from center, 5px past the ring.
    let adjusted =
        adjust_label_position(&anchor, &center, 100.0, TextBounds::new(40.0, 10.0), 0.0);
    assert_abs_diff_eq!(adjusted.x, 200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(adjusted.y, 85.0, epsilon = 1e-9);
}

#[test]
fn label_inside_ring_is_left_alone() {
    let center = Coordinate::new(200.0, 200.0);
    let anchor = Coordinate::new(200.0, 150.0);
    let adjusted =
        adjust_label_position(&anchor, &center, 100.0, TextBounds::new(40.0, 10.0), 30.0);
    assert_eq!(adjusted, anchor);
}

#[test]
fn geometry_fits_the_smaller_dimension() {
    let chart = RadarChart::default();
    let (center, radius) = chart.geometry(Viewport::new(400, 300));
    assert_abs_diff_eq!(center.x, 200.0);
    assert_abs_diff_eq!(center.y, 150.0);
    // min(400 - 80, 300 - 20) / 2 * 0.8
    assert_abs_diff_eq!(radius, 112.0, epsilon = 1e-9);
}

#[test]
fn set_data_resets_progress_and_selects_palette() {
    let mut chart = RadarChart::default();
    chart.set_progress(1.0);
    chart
        .set_data(subjects(&[40.0, 55.0, 62.0, 71.0]), true)
        .expect("valid data");

    assert_eq!(chart.progress(), 0.0);
    assert!(chart.is_animating());
    assert!(chart.use_deviation());
    assert_eq!(chart.palette(), RadarPalette::deviation_score());
    assert!(chart.redraw_request().is_pending());

    chart
        .set_data(subjects(&[40.0, 55.0, 62.0]), false)
        .expect("valid data");
    assert_eq!(chart.palette(), RadarPalette::raw_score());
}

#[test]
fn animation_reaches_exactly_one_and_stops() {
    let mut chart = RadarChart::default();
    chart
        .set_data(subjects(&[40.0, 55.0, 62.0]), false)
        .expect("valid data");

    assert!(chart.advance(0.25));
    let midway = chart.progress();
    assert!((0.5..=1.0).contains(&midway), "progress {midway}");

    assert!(chart.advance(0.5));
    assert!(chart.advance(0.5));
    assert_eq!(chart.progress(), 1.0);
    assert!(!chart.is_animating());

    chart.redraw_request_mut().take();
    assert!(!chart.advance(0.1));
    assert!(!chart.redraw_request().is_pending());
}

#[test]
fn assigning_the_same_data_restarts_the_animation() {
    let mut chart = RadarChart::default();
    let data = subjects(&[40.0, 55.0, 62.0]);
    chart.set_data(data.clone(), false).expect("valid data");
    assert!(chart.advance(0.3));
    assert!(chart.progress() > 0.0);

    chart.redraw_request_mut().take();
    chart.set_data(data.clone(), false).expect("valid data");
    assert_eq!(chart.progress(), 0.0);
    assert!(chart.is_animating());
    assert_eq!(chart.data(), Some(&data));
    assert!(chart.redraw_request().is_pending());
}

#[test]
fn set_progress_cancels_animation() {
    let mut chart = RadarChart::default();
    chart
        .set_data(subjects(&[10.0, 20.0, 30.0]), false)
        .expect("valid data");
    chart.set_progress(2.0);
    assert_eq!(chart.progress(), 1.0);
    assert!(!chart.is_animating());
    assert!(!chart.advance(0.1));
}

#[test]
fn fewer_than_three_subjects_draws_rings_and_warning_only() {
    let mut chart = RadarChart::default();
    chart
        .set_data(subjects(&[40.0, 80.0]), false)
        .expect("valid data");
    chart.set_progress(1.0);

    let frame = chart
        .paint(Viewport::new(400, 400), &MonospaceTextMeasurer::default())
        .expect("paint")
        .into_frame();

    assert!(frame.circles().count() > 0);
    assert_eq!(frame.paths().count(), 0);
    assert_eq!(frame.lines().count(), 0);
    let texts: Vec<&str> = frame.texts().map(|text| text.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![RadarChartStyle::default().not_enough_subjects_message.as_str()]
    );
}

#[test]
fn full_chart_draws_spokes_labels_and_score_polygon() {
    let mut chart = RadarChart::default();
    chart
        .set_data(subjects(&[40.0, 55.0, 62.0, 71.0, 90.0]), false)
        .expect("valid data");
    chart.set_progress(1.0);

    let layered = chart
        .paint(Viewport::new(480, 480), &MonospaceTextMeasurer::default())
        .expect("paint");
    let frame = layered.flatten();
    frame.validate().expect("finite frame");

    // Raw mode rings: 0, 10, ..., 100; the midline is heavier.
    let rings: Vec<_> = frame.circles().collect();
    assert_eq!(rings.len(), 11);
    assert_eq!(rings[5].style.stroke_width(), Some(3.0));
    assert_eq!(rings[4].style.stroke_width(), Some(1.0));
    assert_eq!(frame.lines().count(), 5);

    let series = &layered
        .layer(CanvasLayerKind::Series)
        .expect("series layer")
        .commands;
    let paths: Vec<_> = series
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Path(path) => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|path| path.closed && path.points.len() == 5));
    let palette = RadarPalette::raw_score();
    assert_eq!(paths[0].style, PaintStyle::stroke(palette.line, 3.0));
    assert_eq!(paths[1].style, PaintStyle::Fill(palette.fill));

    let texts: Vec<&str> = frame.texts().map(|text| text.text.as_str()).collect();
    for expected in ["0", "50", "100", "subject 0", "subject 4", "62", "90"] {
        assert!(texts.contains(&expected), "missing label {expected}");
    }
}

#[test]
fn deviation_scores_use_one_decimal() {
    let data = subjects(&[45.26, 60.0]);
    assert_eq!(data.score_labels(false), vec!["45.3", "60.0"]);
    assert_eq!(data.score_labels(true), vec!["45", "60"]);
}

#[test]
fn tiny_viewport_draws_nothing() {
    let mut chart = RadarChart::default();
    chart
        .set_data(subjects(&[40.0, 55.0, 62.0]), false)
        .expect("valid data");
    let frame = chart
        .paint(Viewport::new(40, 10), &MonospaceTextMeasurer::default())
        .expect("paint")
        .into_frame();
    assert!(frame.is_empty());
}

#[test]
fn non_finite_scores_are_rejected() {
    let mut chart = RadarChart::default();
    let err = chart
        .set_data(subjects(&[1.0, f64::NAN, 3.0]), false)
        .expect_err("NaN score");
    assert!(matches!(err, ChartError::InvalidData(_)));
    assert!(chart.data().is_none());
}

#[test]
fn scores_needing_too_many_rings_are_rejected() {
    let mut chart = RadarChart::default();
    chart
        .set_data(subjects(&[40.0, 55.0, 62.0]), false)
        .expect("valid data");

    let err = chart
        .set_data(subjects(&[1e12, 55.0, 62.0]), false)
        .expect_err("ring count");
    assert!(matches!(err, ChartError::InvalidData(_)));
    assert_eq!(chart.data(), Some(&subjects(&[40.0, 55.0, 62.0])));

    chart
        .set_data(subjects(&[-9_900.0, 55.0, 62.0]), false)
        .expect("ring count at the limit");
}

#[test]
fn score_layers_stay_bounded_for_huge_scores() {
    let layers = subjects(&[1e12, 10.0, 20.0]).score_layers(10.0, 0.0, 100.0);
    assert_eq!(layers.len(), MAX_SCORE_LAYERS + 2);
    assert_eq!(layers.first().copied(), Some(0.0));
    assert_eq!(layers.last().copied(), Some(1e12));
}

#[test]
fn custom_style_message_is_drawn() {
    let style = RadarChartStyle::default().with_not_enough_subjects_message("need 3 subjects");
    let mut chart = RadarChart::new(style);
    chart
        .set_data(subjects(&[70.0]), false)
        .expect("valid data");

    let frame = chart
        .paint(Viewport::new(300, 300), &MonospaceTextMeasurer::default())
        .expect("paint")
        .into_frame();
    assert!(frame.texts().any(|text| text.text == "need 3 subjects"));
}
