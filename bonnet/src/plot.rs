//! The functions used to plot the motion envelope.
use crate::{view_box_for, LookupEntry, LookupTable};
pub use plotters::{prelude::*, *};

/// Get font setting.
pub fn font() -> TextStyle<'static> {
    ("Times New Roman", 24).into_font().color(&BLACK)
}

/// Plot the bonnet angle against the input offset.
pub fn plot_curve<B>(backend: B, table: &LookupTable) -> anyhow::Result<()>
where
    B: DrawingBackend,
    B::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let range = table.range();
    let cap = format!("Bonnet Opening (Max: {:.02} deg)", range.max_bonnet_angle);
    // Keep a non-empty span for the degenerate table
    let x_range = range.min_offset..range.max_offset.max(range.min_offset + 1.);
    let y_range = 0.0..range.max_bonnet_angle.max(1.);
    let mut chart = ChartBuilder::on(&root)
        .caption(cap, font())
        .set_label_area_size(LabelAreaPosition::Left, (10).percent())
        .set_label_area_size(LabelAreaPosition::Bottom, (6).percent())
        .margin((8).percent())
        .build_cartesian_2d(x_range, y_range)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Input Offset (deg)")
        .x_label_style(font())
        .y_desc("Bonnet Angle (deg)")
        .y_label_style(font())
        .draw()?;
    let curve = table.iter().map(|e| (e.input_offset, e.bonnet_angle));
    chart.draw_series(LineSeries::new(curve, &BLUE))?;
    Ok(())
}

/// Plot the joint traces of the whole table and a highlighted pose.
pub fn plot_linkage<B>(backend: B, table: &LookupTable, pose: &LookupEntry) -> anyhow::Result<()>
where
    B: DrawingBackend,
    B::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let [x_min, x_max, y_min, y_max] = bounding_box(table);
    let mut chart = ChartBuilder::on(&root)
        .caption("Linkage Envelope", font())
        .set_label_area_size(LabelAreaPosition::Left, (8).percent())
        .set_label_area_size(LabelAreaPosition::Bottom, (4).percent())
        .margin((8).percent())
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_label_style(font())
        .y_label_style(font())
        .draw()?;
    let traces: [(&str, fn(&LookupEntry) -> [f64; 2]); 2] = [
        ("Input-Coupler", |e| e.points2d.input_coupler),
        ("Coupler-Output", |e| e.points2d.coupler_output),
    ];
    for (i, (label, joint)) in traces.into_iter().enumerate() {
        let color = Palette99::pick(i);
        let trace = table.iter().map(joint).map(|[x, y]| (x, y));
        chart
            .draw_series(LineSeries::new(trace, &color))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    let pts = pose.points2d.to_array();
    let outline = pts.iter().chain(&pts[..1]).map(|&[x, y]| (x, y));
    chart
        .draw_series(LineSeries::new(outline, BLACK.stroke_width(3)))?
        .label("Pose")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));
    chart.draw_series(pts.iter().map(|&[x, y]| Circle::new((x, y), 5, BLACK.filled())))?;
    chart
        .configure_series_labels()
        .background_style(&WHITE)
        .border_style(&BLACK)
        .label_font(font())
        .draw()?;
    Ok(())
}

/// Get the square bounding box of the table.
pub fn bounding_box(table: &LookupTable) -> [f64; 4] {
    let vb = view_box_for(table);
    let [x_min, x_max, y_min, y_max] = [vb.min_x, vb.max_x(), vb.min_y, vb.max_y()];
    if vb.width > vb.height {
        let cen = (y_min + y_max) * 0.5;
        let r = vb.width * 0.5;
        [x_min, x_max, cen - r, cen + r]
    } else {
        let cen = (x_min + x_max) * 0.5;
        let r = vb.height * 0.5;
        [cen - r, cen + r, y_min, y_max]
    }
}
