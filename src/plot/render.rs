/// Rendering of mapped groups: draw-space polylines → PNG bytes or SVG text.
///
/// Mapped samples are already in pixel space, so curves are drawn straight
/// onto the root drawing area without a chart coordinate system. Groups are
/// overlaid; each keeps the extents it was mapped with.
use crate::mapping::MappedSample;
use crate::plot::types::*;
use image::codecs::png::PngEncoder;
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Background color (Catppuccin Mocha base).
const BG_COLOR: RGBColor = RGBColor(30, 30, 46);
/// Frame / grid color.
const AXIS_COLOR: RGBColor = RGBColor(88, 91, 112);
/// Grid cells along each axis.
const GRID_DIVISIONS: u32 = 10;

/// Render every group to a PNG image of `options.draw_width` × `draw_height`.
pub fn render_png(groups: &[FamilyGroup], options: &PlotOptions, style: &RenderStyle) -> Result<Vec<u8>, String> {
    check_size(options)?;
    let (width, height) = (options.draw_width, options.draw_height);
    let mut buf = vec![0u8; (width as usize) * (height as usize) * 3];

    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        draw_groups(&root, groups, options, style)?;
        root.present().map_err(|e| format!("present: {}", e))?;
    }

    encode_rgb_to_png(&buf, width, height)
}

/// Render every group to an SVG document.
pub fn render_svg(groups: &[FamilyGroup], options: &PlotOptions, style: &RenderStyle) -> Result<String, String> {
    check_size(options)?;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.draw_width, options.draw_height))
            .into_drawing_area();
        draw_groups(&root, groups, options, style)?;
        root.present().map_err(|e| format!("present: {}", e))?;
    }
    Ok(svg)
}

fn check_size(options: &PlotOptions) -> Result<(), String> {
    options.rect().validate().map_err(|e| e.to_string())
}

fn draw_groups<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    groups: &[FamilyGroup],
    options: &PlotOptions,
    style: &RenderStyle,
) -> Result<(), String> {
    root.fill(&BG_COLOR).map_err(|e| format!("fill: {}", e))?;

    let m = options.margin as i32;
    let (w, h) = (options.draw_width as i32, options.draw_height as i32);

    if style.grid {
        for i in 1..GRID_DIVISIONS {
            let gx = m + (w - 2 * m) * i as i32 / GRID_DIVISIONS as i32;
            let gy = m + (h - 2 * m) * i as i32 / GRID_DIVISIONS as i32;
            let line_style = AXIS_COLOR.mix(0.3);
            root.draw(&PathElement::new(vec![(gx, m), (gx, h - m)], line_style))
                .map_err(|e| format!("grid: {}", e))?;
            root.draw(&PathElement::new(vec![(m, gy), (w - m, gy)], line_style))
                .map_err(|e| format!("grid: {}", e))?;
        }
    }
    if style.frame || style.grid {
        root.draw(&Rectangle::new([(m, m), (w - m, h - m)], AXIS_COLOR.stroke_width(1)))
            .map_err(|e| format!("frame: {}", e))?;
    }

    let curves = groups.iter().flat_map(|g| {
        g.mapping
            .series
            .iter()
            .map(move |points| (g.family.is_angular(), points))
    });
    for (i, (angular, points)) in curves.enumerate() {
        let (r, g, b) = SERIES_COLORS[i % SERIES_COLORS.len()];
        let color = RGBColor(r, g, b);
        let segments = if angular {
            vec![to_pixels(points)]
        } else {
            split_segments(points)
        };

        for segment in &segments {
            match segment.as_slice() {
                [] => {}
                [single] => {
                    root.draw(&Circle::new(*single, 2, color.filled()))
                        .map_err(|e| format!("draw point: {}", e))?;
                }
                _ => {
                    root.draw(&PathElement::new(segment.clone(), color.stroke_width(2)))
                        .map_err(|e| format!("draw series: {}", e))?;
                }
            }
        }
    }
    Ok(())
}

fn to_pixels(points: &[MappedSample]) -> Vec<(i32, i32)> {
    points
        .iter()
        .map(|p| (p.draw_x.round() as i32, p.draw_y.round() as i32))
        .collect()
}

/// Split a curve where samples were dropped, so an asymptote is not bridged
/// by a line. A gap is a data-space `x` step more than 1.5× the smallest one.
fn split_segments(points: &[MappedSample]) -> Vec<Vec<(i32, i32)>> {
    let min_step = points
        .windows(2)
        .map(|w| w[1].x - w[0].x)
        .filter(|dx| *dx > 0.0)
        .fold(f64::INFINITY, f64::min);

    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 && points[i].x - points[i - 1].x > 1.5 * min_step && !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
        current.push((p.draw_x.round() as i32, p.draw_y.round() as i32));
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Encode a raw RGB pixel buffer to PNG.
fn encode_rgb_to_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, String> {
    let mut png = Vec::new();
    let encoder = PngEncoder::new(&mut png);
    encoder
        .write_image(rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| format!("PNG encode: {}", e))?;
    Ok(png)
}
