//! Markup text helpers.

use avenger_common::format::fmt_num;
use avenger_scenegraph::Mark;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Namespace and version attributes of the root `svg` element
pub const METADATA: [(&str, &str); 3] = [
    ("version", "1.1"),
    ("xmlns", SVG_NS),
    ("xmlns:xlink", XLINK_NS),
];

/// Opening tag with the attributes that have a value, followed by `raw`
pub fn open_tag<'a, I>(tag: &str, attrs: I, raw: Option<&str>) -> String
where
    I: IntoIterator<Item = (&'a str, Option<String>)>,
{
    let mut s = format!("<{tag}");
    for (name, value) in attrs {
        if let Some(value) = value {
            s.push_str(&format!(" {name}=\"{}\"", escape_attr(&value)));
        }
    }
    if let Some(raw) = raw {
        s.push(' ');
        s.push_str(raw);
    }
    s.push('>');
    s
}

pub fn close_tag(tag: &str) -> String {
    format!("</{tag}>")
}

pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// Inline style text: `name: value;` entries separated by spaces
pub fn style_text<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries
        .into_iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `class` of a mark container: `mark-{type}`, then `role-{role}` and the
/// mark name when present
pub fn css_class(mark: &Mark) -> String {
    let mut class = format!("mark-{}", mark.marktype.as_str());
    if let Some(role) = mark.role.as_deref().filter(|r| !r.is_empty()) {
        class.push_str(" role-");
        class.push_str(role);
    }
    if let Some(name) = mark.name.as_deref().filter(|n| !n.is_empty()) {
        class.push(' ');
        class.push_str(name);
    }
    class
}

/// Attributes of the root `svg` element, in output order
pub fn root_attributes(class_name: &str, width: f64, height: f64) -> Vec<(&'static str, String)> {
    let (w, h) = (fmt_num(width), fmt_num(height));
    let mut attrs = vec![
        ("class", class_name.to_string()),
        ("width", w.clone()),
        ("height", h.clone()),
        ("viewBox", format!("0 0 {w} {h}")),
    ];
    attrs.extend(METADATA.iter().map(|(k, v)| (*k, v.to_string())));
    attrs
}

pub fn root_transform(origin: [f64; 2]) -> String {
    format!("translate({},{})", fmt_num(origin[0]), fmt_num(origin[1]))
}
