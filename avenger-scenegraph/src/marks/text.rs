use std::f64::consts::FRAC_PI_2;

use avenger_common::format::fmt_num;
use avenger_geometry::Bounds;
use avenger_text::metrics::{baseline_offset, TextMetrics};

use super::{pick_items, translate, AttributeSink};
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::style::{fill, stroke};
use crate::surface::DrawingSurface;

/// Baseline shift for the item's font size
fn offset(props: &ItemProps) -> f64 {
    baseline_offset(props.baseline, props.font_spec().height())
}

/// Anchor point with the polar `radius`/`theta` offset applied
fn anchor(props: &ItemProps) -> (f64, f64) {
    let (mut x, mut y) = (props.x(), props.y());
    if let Some(r) = props.radius.filter(|r| *r != 0.0) {
        let t = props.theta.unwrap_or(0.0) - FRAC_PI_2;
        x += r * t.cos();
        y += r * t.sin();
    }
    (x, y)
}

fn angle(props: &ItemProps) -> Option<f64> {
    props.angle.filter(|a| *a != 0.0)
}

/// The string rendered for the item, truncated to `limit` when set
pub fn text_value(props: &ItemProps, metrics: &TextMetrics) -> String {
    let Some(text) = &props.text else {
        return String::new();
    };
    metrics.text_value(
        &props.font_spec(),
        text,
        props.limit,
        props.ellipsis.as_deref(),
        props.is_rtl(),
    )
}

pub fn attr(emit: &mut dyn AttributeSink, props: &ItemProps) {
    let dx = props.dx.unwrap_or(0.0);
    let dy = props.dy.unwrap_or(0.0) + offset(props);
    let (x, y) = anchor(props);
    emit.attr(
        "text-anchor",
        Some(props.align.unwrap_or_default().anchor().to_string()),
    );
    let transform = match angle(props) {
        Some(a) => {
            let mut t = format!("{} rotate({})", translate(x, y), fmt_num(a));
            if dx != 0.0 || dy != 0.0 {
                t.push(' ');
                t.push_str(&translate(dx, dy));
            }
            t
        }
        None => translate(x + dx, y + dy),
    };
    emit.attr("transform", Some(transform));
}

/// Box of the rendered text. The top edge sits four fifths of the font
/// size above the baseline. With `no_rotate` the box stays axis aligned in
/// the text's own frame and is not padded.
pub fn bound(props: &ItemProps, metrics: &TextMetrics, no_rotate: bool) -> Bounds {
    let font = props.font_spec();
    let h = font.height();
    let (x, y) = anchor(props);
    let w = metrics.width(&font, &text_value(props, metrics));
    let dx = props.dx.unwrap_or(0.0) + props.align.unwrap_or_default().offset(w) + x;
    let dy = props.dy.unwrap_or(0.0) + offset(props) - (0.8 * h).round() + y;

    let mut bounds = Bounds::new();
    bounds.set(dx, dy, dx + w, dy + h);
    if let Some(a) = angle(props) {
        if !no_rotate {
            bounds.rotate(a.to_radians(), x, y);
        }
    }
    if !no_rotate && w != 0.0 {
        bounds.expand(1.0);
    }
    bounds
}

pub fn draw<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    scene.visit_items(mark, |id| {
        let item = scene.item(id);
        let props = &item.props;
        if clip.map_or(false, |b| !b.intersects(&item.bounds)) {
            return;
        }
        let text = text_value(props, scene.text_metrics());
        if text.is_empty() {
            return;
        }
        let opacity = props.opacity();
        if opacity == 0.0 {
            return;
        }

        surface.set_font(&props.font_spec().to_css(false));
        surface.set_text_align(props.align.unwrap_or_default());

        let (mut x, mut y) = anchor(props);
        let rotated = angle(props);
        if let Some(a) = rotated {
            surface.save();
            surface.translate(x, y);
            surface.rotate(a.to_radians());
            x = 0.0;
            y = 0.0;
        }
        x += props.dx.unwrap_or(0.0);
        y += props.dy.unwrap_or(0.0) + offset(props);

        if props.fill.is_some() && fill(surface, props, &item.bounds, opacity) {
            surface.fill_text(&text, x, y);
        }
        if props.stroke.is_some() && stroke(surface, props, &item.bounds, opacity) {
            surface.stroke_text(&text, x, y);
        }
        if rotated.is_some() {
            surface.restore();
        }
    });
}

/// Rotated text is hit tested in its unrotated frame
fn hit(props: &ItemProps, metrics: &TextMetrics, gx: f64, gy: f64) -> bool {
    if props.font_size.is_some_and(|s| s <= 0.0) {
        return false;
    }
    let Some(a) = angle(props) else {
        return true;
    };
    let bounds = bound(props, metrics, true);
    let (sin, cos) = (-a.to_radians()).sin_cos();
    let (ix, iy) = (props.x(), props.y());
    let px = cos * gx - sin * gy + (ix - ix * cos + iy * sin);
    let py = sin * gx + cos * gy + (iy - ix * sin - iy * cos);
    bounds.contains(px, py)
}

pub fn pick(scene: &Scene, mark: MarkId, gx: f64, gy: f64) -> Option<ItemId> {
    pick_items(scene, mark, gx, gy, |id| {
        hit(&scene.item(id).props, scene.text_metrics(), gx, gy)
    })
}
