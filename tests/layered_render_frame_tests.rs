use jasper_charts::chart::{ChartPainter, GraphLine, LineChart, LineChartData};
use jasper_charts::core::{AxisLabel, MonospaceTextMeasurer, Viewport};
use jasper_charts::render::{
    CanvasLayerKind, ChartLayerStack, CirclePrimitive, Color, DrawCommand, LayeredRenderFrame,
    LinePrimitive, PaintStyle, RectPrimitive,
};

fn selected_line_chart() -> LineChart {
    let mut chart = LineChart::default();
    chart
        .set_data(LineChartData {
            x_axis_labels: vec![AxisLabel::single("a"), AxisLabel::single("b")],
            y_min: 0.0,
            y_max: 10.0,
            y_step: 5.0,
            lines: vec![
                GraphLine::new("x", Color::rgb(1.0, 0.0, 0.0), vec![Some(1.0), Some(9.0)]),
                GraphLine::new("y", Color::rgb(0.0, 1.0, 0.0), vec![Some(4.0), Some(6.0)]),
            ],
        })
        .expect("valid data");
    chart.select_key("x");
    chart
}

#[test]
fn flatten_paints_layers_bottom_up_and_keeps_emission_order() {
    let mut frame = LayeredRenderFrame::canonical(Viewport::new(100, 100));
    let label_rect = RectPrimitive::new(0.0, 0.0, 5.0, 5.0, Color::WHITE);
    let grid_line = LinePrimitive::new(0.0, 10.0, 100.0, 10.0, 1.0, Color::BLACK);
    let first_dot = CirclePrimitive::new(1.0, 1.0, 2.0, PaintStyle::Fill(Color::BLACK));
    let second_dot = CirclePrimitive::new(2.0, 2.0, 2.0, PaintStyle::Fill(Color::BLACK));

    frame.push(CanvasLayerKind::Labels, label_rect);
    frame.push(CanvasLayerKind::Series, first_dot);
    frame.push(CanvasLayerKind::Grid, grid_line);
    frame.push(CanvasLayerKind::Series, second_dot);

    let flat = frame.flatten();
    assert_eq!(
        flat.commands,
        vec![
            DrawCommand::Line(grid_line),
            DrawCommand::Circle(first_dot),
            DrawCommand::Circle(second_dot),
            DrawCommand::Rect(label_rect),
        ]
    );
    assert_eq!(frame.clone().into_frame(), flat);
}

#[test]
fn flatten_layers_filters_by_kind() {
    let chart = selected_line_chart();
    let layered = chart
        .paint(Viewport::new(320, 240), &MonospaceTextMeasurer::default())
        .expect("paint");

    let emphasis_only = layered.flatten_layers(&[CanvasLayerKind::Emphasis]);
    let emphasis_count = layered
        .layer(CanvasLayerKind::Emphasis)
        .expect("emphasis")
        .commands
        .len();
    assert_eq!(emphasis_only.len(), emphasis_count);
    assert!(emphasis_count > 0);

    let all_kinds = ChartLayerStack::canonical().layers;
    assert_eq!(layered.flatten_layers(&all_kinds), layered.flatten());
    assert!(layered.flatten_layers(&[]).is_empty());
}

#[test]
fn selected_series_paints_above_unselected_series() {
    let chart = selected_line_chart();
    let flat = chart
        .paint(Viewport::new(320, 240), &MonospaceTextMeasurer::default())
        .expect("paint")
        .flatten();

    let path_widths: Vec<Option<f64>> = flat.paths().map(|path| path.style.stroke_width()).collect();
    assert_eq!(path_widths, vec![Some(1.0), Some(3.0)]);
}

#[test]
fn pushes_to_layers_missing_from_the_stack_are_dropped() {
    let stack = ChartLayerStack {
        layers: vec![CanvasLayerKind::Series],
    };
    let mut frame = LayeredRenderFrame::from_stack(Viewport::new(50, 50), stack);
    frame.push(
        CanvasLayerKind::Labels,
        RectPrimitive::new(0.0, 0.0, 1.0, 1.0, Color::BLACK),
    );
    frame.push(
        CanvasLayerKind::Series,
        RectPrimitive::new(0.0, 0.0, 2.0, 2.0, Color::BLACK),
    );

    assert!(frame.layer(CanvasLayerKind::Labels).is_none());
    assert_eq!(frame.flatten().len(), 1);
}
