//! Inline styles of rendered elements.

use avenger_common::format::fmt_num;
use avenger_common::types::Paint;
use avenger_scenegraph::ItemProps;

use crate::defs::Defs;

/// Style properties written for every item, in output order
pub const STYLE_NAMES: [&str; 11] = [
    "fill",
    "fill-opacity",
    "stroke",
    "stroke-width",
    "stroke-opacity",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-miterlimit",
    "opacity",
];

fn paint_value(paint: &Paint, defs: &mut Defs) -> String {
    match paint {
        Paint::Color(color) => color.clone(),
        Paint::Gradient(gradient) => defs.gradient_url(gradient),
    }
}

/// Style values of an item. A missing fill becomes `none`; other missing
/// values are `None`. Gradients are recorded in `defs`.
pub fn item_styles(props: &ItemProps, defs: &mut Defs) -> [(&'static str, Option<String>); 11] {
    let fill = Some(
        props
            .fill
            .as_ref()
            .map(|p| paint_value(p, defs))
            .unwrap_or_else(|| "none".to_string()),
    );
    let stroke = props.stroke.as_ref().map(|p| paint_value(p, defs));
    let values = [
        fill,
        props.fill_opacity.map(fmt_num),
        stroke,
        props.stroke_width.map(fmt_num),
        props.stroke_opacity.map(fmt_num),
        props.stroke_cap.map(|c| c.as_str().to_string()),
        props.stroke_join.map(|j| j.as_str().to_string()),
        props.stroke_dash.as_ref().map(|d| d.to_attr()),
        props.stroke_dash_offset.map(fmt_num),
        props.stroke_miter_limit.map(fmt_num),
        props.opacity.map(fmt_num),
    ];
    let mut out: [(&'static str, Option<String>); 11] = Default::default();
    for (i, value) in values.into_iter().enumerate() {
        out[i] = (STYLE_NAMES[i], value);
    }
    out
}

/// Font styles of a text item
pub fn text_styles(props: &ItemProps) -> [(&'static str, Option<String>); 5] {
    let font = props.font_spec();
    [
        ("font-family", Some(font.family().replace('"', "'"))),
        ("font-size", Some(format!("{}px", fmt_num(font.height())))),
        ("font-style", font.style.map(|s| s.as_str().to_string())),
        ("font-variant", font.variant.map(str::to_string)),
        ("font-weight", font.weight.map(|w| w.to_css())),
    ]
}

/// `style` attribute text of the entries with a value, `None` when empty
pub fn style_attribute<I>(entries: I) -> Option<String>
where
    I: IntoIterator<Item = (&'static str, Option<String>)>,
{
    let s = entries
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{name}: {v};")))
        .collect::<Vec<_>>()
        .join(" ");
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use avenger_common::types::{Gradient, StrokeCap, StrokeDash};

    #[test]
    fn test_missing_fill_is_none() {
        let mut defs = Defs::default();
        let styles = item_styles(&ItemProps::default(), &mut defs);
        assert_eq!(styles[0], ("fill", Some("none".to_string())));
        assert!(styles[1..].iter().all(|(_, v)| v.is_none()));
        assert_eq!(style_attribute(styles), Some("fill: none;".to_string()));
    }

    #[test]
    fn test_stroke_styles_and_gradient_fill() {
        let mut defs = Defs::default();
        let gradient = Gradient {
            id: "grad".to_string(),
            ..Gradient::default()
        };
        let props = ItemProps {
            fill: Some(Paint::Gradient(gradient)),
            stroke: Some(Paint::color("#333")),
            stroke_width: Some(2.5),
            stroke_cap: Some(StrokeCap::Round),
            stroke_dash: Some(StrokeDash::Array(vec![4.0, 2.0])),
            ..Default::default()
        };
        let styles = style_attribute(item_styles(&props, &mut defs)).unwrap();
        assert_eq!(
            styles,
            "fill: url(#grad); stroke: #333; stroke-width: 2.5; stroke-linecap: round; stroke-dasharray: 4,2;"
        );
        assert!(defs.gradients.contains_key("grad"));
    }

    #[test]
    fn test_text_styles() {
        let props = ItemProps {
            font: Some("\"Open Sans\", serif".to_string()),
            font_size: Some(12.0),
            ..Default::default()
        };
        let styles = text_styles(&props);
        assert_eq!(styles[0].1.as_deref(), Some("'Open Sans', serif"));
        assert_eq!(styles[1].1.as_deref(), Some("12px"));
        assert_eq!(styles[4].1, None);
    }
}
