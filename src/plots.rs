use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::session::Frame;

fn to_pixel((x, y): (f32, f32)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

/// Draws a frame onto a blank area: dots first, then the fitted line, then the text lines.
pub fn draw_frame<DB>(
    frame: &Frame,
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let style = &frame.style;

    for dot in &frame.dots {
        drawing_area.draw(&Circle::new(
            to_pixel((dot.x, dot.y)),
            style.dot_radius,
            dot.color.filled(),
        ))?;
    }

    if let Some((start, end)) = frame.line {
        drawing_area.draw(&PathElement::new(
            vec![to_pixel(start), to_pixel(end)],
            BLACK.stroke_width(style.line_width),
        ))?;
    }

    let (text_x, text_y) = style.text_origin;
    for (i, line) in frame.text.iter().enumerate() {
        drawing_area.draw(&Text::new(
            line.clone(),
            (text_x, text_y + i as i32 * style.line_spacing),
            ("sans-serif", style.text_size),
        ))?;
    }

    Ok(())
}

pub fn render_svg(frame: &Frame, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let svg_backend = SVGBackend::new(path, (frame.width, frame.height)).into_drawing_area();

    draw_frame(frame, &svg_backend)?;

    svg_backend.present()?;

    Ok(())
}
