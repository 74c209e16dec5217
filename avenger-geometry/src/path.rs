//! SVG path mini-language: parsing into typed segments and replay onto a
//! [`PathSink`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;

use crate::arc::draw_arc;
use crate::sink::PathSink;

/// A single path command with its numeric arguments
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub command: char,
    pub args: Vec<f64>,
}

impl PathSegment {
    pub fn new(command: char, args: Vec<f64>) -> Self {
        Self { command, args }
    }
}

/// Number of arguments consumed by one instance of a command
pub fn command_arity(command: char) -> usize {
    match command.to_ascii_lowercase() {
        'm' | 'l' | 't' => 2,
        'h' | 'v' => 1,
        'c' => 6,
        's' | 'q' => 4,
        'a' => 7,
        _ => 0,
    }
}

fn is_command(c: char) -> bool {
    matches!(
        c,
        'M' | 'L' | 'H' | 'V' | 'C' | 'S' | 'Q' | 'T' | 'A' | 'Z'
            | 'm' | 'l' | 'h' | 'v' | 'c' | 's' | 'q' | 't' | 'a' | 'z'
    )
}

lazy_static! {
    static ref PATH_CACHE: Mutex<HashMap<String, Arc<[PathSegment]>>> =
        Mutex::new(HashMap::new());
}

pub(crate) fn clear_path_cache() {
    PATH_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}

/// Parse a path string, memoized process-wide by the literal input.
///
/// Calling this twice with the same string returns the same allocation.
pub fn parse_path(path: &str) -> Arc<[PathSegment]> {
    if let Some(cached) = PATH_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(path)
    {
        return cached.clone();
    }
    let parsed: Arc<[PathSegment]> = parse_path_uncached(path).into();
    PATH_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(path.to_string(), parsed.clone());
    parsed
}

/// Parse a path string without consulting the process-wide cache.
///
/// Chunks that are not numbers are dropped. When a command carries more
/// arguments than its arity, the arguments are split into repeated segments;
/// extra coordinate pairs after a moveto continue as lineto.
pub fn parse_path_uncached(path: &str) -> Vec<PathSegment> {
    let mut result = Vec::new();

    // Everything before the first command letter is discarded
    let mut commands: Vec<(char, String)> = Vec::new();
    for c in path.chars() {
        if is_command(c) {
            commands.push((c, String::new()));
        } else if let Some((_, body)) = commands.last_mut() {
            body.push(c);
        }
    }

    for (command, body) in commands {
        let args = parse_numbers(&body);
        let arity = command_arity(command);

        if arity > 0 && args.len() > arity {
            for (i, chunk) in args.chunks(arity).enumerate() {
                let command = match command {
                    'M' if i > 0 => 'L',
                    'm' if i > 0 => 'l',
                    c => c,
                };
                result.push(PathSegment::new(command, chunk.to_vec()));
            }
        } else {
            result.push(PathSegment::new(command, args));
        }
    }

    result
}

/// Split on whitespace and commas, and before a sign that directly follows a digit
fn parse_numbers(body: &str) -> Vec<f64> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in body.trim().chars() {
        if c.is_whitespace() || c == ',' {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
        } else if (c == '-' || c == '+') && prev.is_some_and(|p| p.is_ascii_digit()) {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current.push(c);
        } else {
            current.push(c);
        }
        prev = Some(c);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
        .iter()
        .filter_map(|chunk| chunk.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect()
}

fn scale_args(segment: &PathSegment, s: f64) -> Vec<f64> {
    if segment.command.eq_ignore_ascii_case(&'a') {
        // Flags and rotation are not lengths
        segment
            .args
            .iter()
            .enumerate()
            .map(|(i, v)| match i {
                0 | 1 | 5 | 6 => v * s,
                _ => *v,
            })
            .collect()
    } else {
        segment.args.iter().map(|v| v * s).collect()
    }
}

/// Replay parsed segments onto a sink, translated by `(l, t)` and scaled by `s`.
///
/// Segments that lack the arguments their command requires are skipped.
pub fn render_path(sink: &mut dyn PathSink, path: &[PathSegment], l: f64, t: f64, s: f64) {
    // Current point, start of the current subpath, and reflection sources
    let (mut x, mut y) = (0.0, 0.0);
    let (mut start_x, mut start_y) = (0.0, 0.0);
    let mut cubic_ctrl: Option<(f64, f64)> = None;
    let mut quad_ctrl: Option<(f64, f64)> = None;

    sink.begin_path();

    for segment in path {
        let scaled;
        let args: &[f64] = if s != 1.0 {
            scaled = scale_args(segment, s);
            &scaled
        } else {
            &segment.args
        };
        if args.len() < command_arity(segment.command) {
            continue;
        }

        let mut next_cubic = None;
        let mut next_quad = None;

        match segment.command {
            'l' => {
                x += args[0];
                y += args[1];
                sink.line_to(x + l, y + t);
            }
            'L' => {
                x = args[0];
                y = args[1];
                sink.line_to(x + l, y + t);
            }
            'h' => {
                x += args[0];
                sink.line_to(x + l, y + t);
            }
            'H' => {
                x = args[0];
                sink.line_to(x + l, y + t);
            }
            'v' => {
                y += args[0];
                sink.line_to(x + l, y + t);
            }
            'V' => {
                y = args[0];
                sink.line_to(x + l, y + t);
            }
            'm' => {
                x += args[0];
                y += args[1];
                start_x = x;
                start_y = y;
                sink.move_to(x + l, y + t);
            }
            'M' => {
                x = args[0];
                y = args[1];
                start_x = x;
                start_y = y;
                sink.move_to(x + l, y + t);
            }
            'c' | 'C' => {
                let (ox, oy) = if segment.command == 'c' { (x, y) } else { (0.0, 0.0) };
                let (x1, y1) = (ox + args[0], oy + args[1]);
                let (x2, y2) = (ox + args[2], oy + args[3]);
                let (ex, ey) = (ox + args[4], oy + args[5]);
                sink.bezier_curve_to(x1 + l, y1 + t, x2 + l, y2 + t, ex + l, ey + t);
                next_cubic = Some((x2, y2));
                x = ex;
                y = ey;
            }
            's' | 'S' => {
                let (ox, oy) = if segment.command == 's' { (x, y) } else { (0.0, 0.0) };
                let (x1, y1) = match cubic_ctrl {
                    Some((cx, cy)) => (2.0 * x - cx, 2.0 * y - cy),
                    None => (x, y),
                };
                let (x2, y2) = (ox + args[0], oy + args[1]);
                let (ex, ey) = (ox + args[2], oy + args[3]);
                sink.bezier_curve_to(x1 + l, y1 + t, x2 + l, y2 + t, ex + l, ey + t);
                next_cubic = Some((x2, y2));
                x = ex;
                y = ey;
            }
            'q' | 'Q' => {
                let (ox, oy) = if segment.command == 'q' { (x, y) } else { (0.0, 0.0) };
                let (x1, y1) = (ox + args[0], oy + args[1]);
                let (ex, ey) = (ox + args[2], oy + args[3]);
                sink.quadratic_curve_to(x1 + l, y1 + t, ex + l, ey + t);
                next_quad = Some((x1, y1));
                x = ex;
                y = ey;
            }
            't' | 'T' => {
                let (ox, oy) = if segment.command == 't' { (x, y) } else { (0.0, 0.0) };
                let (x1, y1) = match quad_ctrl {
                    Some((cx, cy)) => (2.0 * x - cx, 2.0 * y - cy),
                    None => (x, y),
                };
                let (ex, ey) = (ox + args[0], oy + args[1]);
                sink.quadratic_curve_to(x1 + l, y1 + t, ex + l, ey + t);
                next_quad = Some((x1, y1));
                x = ex;
                y = ey;
            }
            'a' | 'A' => {
                let (ox, oy) = if segment.command == 'a' { (x, y) } else { (0.0, 0.0) };
                let (ex, ey) = (ox + args[5], oy + args[6]);
                draw_arc(
                    sink,
                    x + l,
                    y + t,
                    [args[0], args[1], args[2], args[3], args[4], ex + l, ey + t],
                );
                x = ex;
                y = ey;
            }
            'z' | 'Z' => {
                sink.close_path();
                x = start_x;
                y = start_y;
            }
            _ => {}
        }

        cubic_ctrl = next_cubic;
        quad_ctrl = next_quad;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bounds;
    use crate::sink::{BoundsSink, PathStringBuilder};

    #[test]
    fn test_parse_simple_path() {
        let segments = parse_path_uncached("M10,20L30,40Z");
        assert_eq!(
            segments,
            vec![
                PathSegment::new('M', vec![10.0, 20.0]),
                PathSegment::new('L', vec![30.0, 40.0]),
                PathSegment::new('Z', vec![]),
            ]
        );
    }

    #[test]
    fn test_parse_splits_repeated_groups() {
        let segments = parse_path_uncached("M0 0 L1 1 2 2 3 3");
        assert_eq!(segments.len(), 4);
        assert!(segments[1..].iter().all(|s| s.command == 'L'));
        assert_eq!(segments[3].args, vec![3.0, 3.0]);
    }

    #[test]
    fn test_parse_moveto_continuation() {
        let segments = parse_path_uncached("m1,1 2,2");
        assert_eq!(segments[0].command, 'm');
        assert_eq!(segments[1].command, 'l');
    }

    #[test]
    fn test_parse_signs_after_digits() {
        let segments = parse_path_uncached("l10-20+5-1e-2");
        assert_eq!(segments[0].args, vec![10.0, -20.0]);
        assert_eq!(segments[1].args, vec![5.0, -0.01]);
    }

    #[test]
    fn test_parse_drops_non_numeric_chunks() {
        let segments = parse_path_uncached("M 10 foo 20");
        assert_eq!(segments[0].args, vec![10.0, 20.0]);
    }

    #[test]
    fn test_parse_is_cached_by_string() {
        let a = parse_path("M0,0h5v5z");
        let b = parse_path("M0,0h5v5z");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_render_relative_and_translate() {
        let segments = parse_path_uncached("m1,1 h2 v3 z");
        let mut sink = PathStringBuilder::new();
        render_path(&mut sink, &segments, 10.0, 20.0, 1.0);
        assert_eq!(sink.finish().as_deref(), Some("M11,21L13,21L13,24Z"));
    }

    #[test]
    fn test_render_scaled() {
        let segments = parse_path_uncached("M1,0L0,1");
        let mut sink = PathStringBuilder::new();
        render_path(&mut sink, &segments, 0.0, 0.0, 4.0);
        assert_eq!(sink.finish().as_deref(), Some("M4,0L0,4"));
    }

    #[test]
    fn test_render_smooth_cubic_reflects_control() {
        let segments = parse_path_uncached("M0,0C0,10 10,10 10,0S20,-10 20,0");
        let mut sink = PathStringBuilder::new();
        render_path(&mut sink, &segments, 0.0, 0.0, 1.0);
        assert_eq!(
            sink.finish().as_deref(),
            Some("M0,0C0,10,10,10,10,0C10,-10,20,-10,20,0")
        );
    }

    #[test]
    fn test_render_smooth_quadratic_without_previous_curve() {
        let segments = parse_path_uncached("M0,0L5,5T10,0");
        let mut sink = PathStringBuilder::new();
        render_path(&mut sink, &segments, 0.0, 0.0, 1.0);
        assert_eq!(sink.finish().as_deref(), Some("M0,0L5,5Q5,5,10,0"));
    }

    #[test]
    fn test_render_smooth_quadratic_chain() {
        let segments = parse_path_uncached("M0,0Q5,10 10,0T20,0");
        let mut sink = PathStringBuilder::new();
        render_path(&mut sink, &segments, 0.0, 0.0, 1.0);
        assert_eq!(
            sink.finish().as_deref(),
            Some("M0,0Q5,10,10,0Q15,-10,20,0")
        );
    }

    #[test]
    fn test_render_arc_bounds() {
        let segments = parse_path_uncached("M0,0A5,5 0 0 1 10,0");
        let mut bounds = Bounds::new();
        render_path(&mut BoundsSink::new(&mut bounds), &segments, 0.0, 0.0, 1.0);
        assert!(bounds.x1 >= -1e-9);
        assert!((bounds.x2 - 10.0).abs() < 1e-9);
        assert!(bounds.y1 < -4.0);
    }

    #[test]
    fn test_render_skips_incomplete_segment() {
        let segments = parse_path_uncached("M0,0L5");
        let mut sink = PathStringBuilder::new();
        render_path(&mut sink, &segments, 0.0, 0.0, 1.0);
        assert_eq!(sink.finish().as_deref(), Some("M0,0"));
    }
}
