//! SVG path data parsing
//!
//! Reads the `d` attribute grammar (absolute and relative `M L H V C S Q T A Z`,
//! implicit command repetition, compact number syntax such as `1.06.79` or
//! `4-4`) and emits an absolute `lyon` path. Arcs are converted to cubic
//! beziers.

use crate::error::{PathError, Result};
use lyon::geom::{ArcFlags, SvgArc};
use lyon::math::{point, vector, Angle, Point};
use lyon::path::Path;

/// Parse SVG path data into a `lyon` path
pub fn parse_path(data: &str) -> Result<Path> {
    let mut lexer = Lexer::new(data);
    let mut pen = Pen::new();
    let mut command: Option<u8> = None;

    loop {
        lexer.skip_separators();
        let Some(next) = lexer.peek() else {
            break;
        };

        if next.is_ascii_alphabetic() {
            lexer.bump();
            if command.is_none() && !matches!(next, b'M' | b'm') {
                return Err(PathError::MissingMoveTo);
            }
            command = Some(next);
        } else {
            command = match command {
                None => return Err(PathError::MissingMoveTo),
                // Coordinates after a move-to are implicit line-tos
                Some(b'M') => Some(b'L'),
                Some(b'm') => Some(b'l'),
                Some(b'Z' | b'z') => {
                    return Err(PathError::UnexpectedCharacter {
                        ch: next as char,
                        offset: lexer.pos,
                    })
                }
                other => other,
            };
        }

        let Some(cmd) = command else {
            break;
        };
        pen.apply(cmd, &mut lexer)?;
    }

    pen.finish()
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            bytes: data.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b',' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn number(&mut self) -> Result<f32> {
        self.skip_separators();
        let start = self.pos;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.bump();
        }
        let mut digits = 0;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.bump();
            digits += 1;
        }
        if self.peek() == Some(b'.') {
            self.bump();
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.bump();
                digits += 1;
            }
        }
        if digits == 0 {
            self.pos = start;
            return Err(match self.peek() {
                Some(b) if !b.is_ascii_alphabetic() => PathError::UnexpectedCharacter {
                    ch: b as char,
                    offset: start,
                },
                _ => PathError::ExpectedNumber { offset: start },
            });
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.bump();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.bump();
            }
            if self.peek().is_some_and(|b| b.is_ascii_digit()) {
                while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.bump();
                }
            } else {
                self.pos = mark;
            }
        }

        // Only ASCII was consumed, so the slice is valid UTF-8.
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| PathError::ExpectedNumber { offset: start })?;
        text.parse::<f32>()
            .map_err(|_| PathError::ExpectedNumber { offset: start })
    }

    fn flag(&mut self) -> Result<bool> {
        self.skip_separators();
        let offset = self.pos;
        match self.peek() {
            Some(b'0') => {
                self.bump();
                Ok(false)
            }
            Some(b'1') => {
                self.bump();
                Ok(true)
            }
            _ => Err(PathError::InvalidFlag { offset }),
        }
    }

    fn pair(&mut self) -> Result<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(point(x, y))
    }
}

/// Drawing state while walking the commands
struct Pen {
    builder: lyon::path::path::Builder,
    current: Point,
    subpath_start: Point,
    /// Last cubic control point, for `S`
    last_cubic_ctrl: Option<Point>,
    /// Last quadratic control point, for `T`
    last_quad_ctrl: Option<Point>,
    open: bool,
    segments: usize,
}

impl Pen {
    fn new() -> Self {
        Self {
            builder: Path::builder(),
            current: point(0.0, 0.0),
            subpath_start: point(0.0, 0.0),
            last_cubic_ctrl: None,
            last_quad_ctrl: None,
            open: false,
            segments: 0,
        }
    }

    fn ensure_open(&mut self) {
        if !self.open {
            self.builder.begin(self.current);
            self.subpath_start = self.current;
            self.open = true;
        }
    }

    fn relative(&self, cmd: u8, p: Point) -> Point {
        if cmd.is_ascii_lowercase() {
            self.current + p.to_vector()
        } else {
            p
        }
    }

    fn apply(&mut self, cmd: u8, lexer: &mut Lexer<'_>) -> Result<()> {
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match cmd {
            b'M' | b'm' => {
                let to = self.relative(cmd, lexer.pair()?);
                if self.open {
                    self.builder.end(false);
                    self.open = false;
                }
                self.current = to;
                self.ensure_open();
            }
            b'L' | b'l' => {
                let to = self.relative(cmd, lexer.pair()?);
                self.line_to(to);
            }
            b'H' | b'h' => {
                let x = lexer.number()?;
                let x = if cmd == b'h' { self.current.x + x } else { x };
                self.line_to(point(x, self.current.y));
            }
            b'V' | b'v' => {
                let y = lexer.number()?;
                let y = if cmd == b'v' { self.current.y + y } else { y };
                self.line_to(point(self.current.x, y));
            }
            b'C' | b'c' => {
                let c1 = self.relative(cmd, lexer.pair()?);
                let c2 = self.relative(cmd, lexer.pair()?);
                let to = self.relative(cmd, lexer.pair()?);
                self.cubic_to(c1, c2, to);
                cubic_ctrl = Some(c2);
            }
            b'S' | b's' => {
                let c2 = self.relative(cmd, lexer.pair()?);
                let to = self.relative(cmd, lexer.pair()?);
                let c1 = reflect(self.last_cubic_ctrl, self.current);
                self.cubic_to(c1, c2, to);
                cubic_ctrl = Some(c2);
            }
            b'Q' | b'q' => {
                let ctrl = self.relative(cmd, lexer.pair()?);
                let to = self.relative(cmd, lexer.pair()?);
                self.quad_to(ctrl, to);
                quad_ctrl = Some(ctrl);
            }
            b'T' | b't' => {
                let to = self.relative(cmd, lexer.pair()?);
                let ctrl = reflect(self.last_quad_ctrl, self.current);
                self.quad_to(ctrl, to);
                quad_ctrl = Some(ctrl);
            }
            b'A' | b'a' => {
                let rx = lexer.number()?;
                let ry = lexer.number()?;
                let rotation = lexer.number()?;
                let large_arc = lexer.flag()?;
                let sweep = lexer.flag()?;
                let to = self.relative(cmd, lexer.pair()?);
                self.arc_to(rx, ry, rotation, large_arc, sweep, to);
            }
            b'Z' | b'z' => {
                if self.open {
                    self.builder.end(true);
                    self.open = false;
                }
                self.current = self.subpath_start;
            }
            other => {
                return Err(PathError::UnexpectedCharacter {
                    ch: other as char,
                    offset: lexer.pos.saturating_sub(1),
                })
            }
        }

        self.last_cubic_ctrl = cubic_ctrl;
        self.last_quad_ctrl = quad_ctrl;
        Ok(())
    }

    fn line_to(&mut self, to: Point) {
        self.ensure_open();
        self.builder.line_to(to);
        self.current = to;
        self.segments += 1;
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) {
        self.ensure_open();
        self.builder.cubic_bezier_to(c1, c2, to);
        self.current = to;
        self.segments += 1;
    }

    fn quad_to(&mut self, ctrl: Point, to: Point) {
        self.ensure_open();
        self.builder.quadratic_bezier_to(ctrl, to);
        self.current = to;
        self.segments += 1;
    }

    fn arc_to(&mut self, rx: f32, ry: f32, rotation: f32, large_arc: bool, sweep: bool, to: Point) {
        let arc = SvgArc {
            from: self.current,
            to,
            radii: vector(rx.abs(), ry.abs()),
            x_rotation: Angle::degrees(rotation),
            flags: ArcFlags { large_arc, sweep },
        };
        if arc.is_straight_line() {
            self.line_to(to);
            return;
        }

        self.ensure_open();
        let builder = &mut self.builder;
        arc.for_each_cubic_bezier(&mut |segment| {
            builder.cubic_bezier_to(segment.ctrl1, segment.ctrl2, segment.to);
        });
        self.current = to;
        self.segments += 1;
    }

    fn finish(mut self) -> Result<Path> {
        if self.segments == 0 {
            return Err(PathError::Empty);
        }
        if self.open {
            self.builder.end(false);
        }
        Ok(self.builder.build())
    }
}

/// Reflect the previous control point about the current point
fn reflect(ctrl: Option<Point>, current: Point) -> Point {
    match ctrl {
        Some(c) => current + (current - c),
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::path::PathEvent;

    fn endpoints(path: &Path) -> Vec<(f32, f32)> {
        path.iter()
            .filter_map(|event| match event {
                PathEvent::Begin { at } => Some((at.x, at.y)),
                PathEvent::Line { to, .. }
                | PathEvent::Quadratic { to, .. }
                | PathEvent::Cubic { to, .. } => Some((to.x, to.y)),
                PathEvent::End { .. } => None,
            })
            .collect()
    }

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4
    }

    #[test]
    fn parses_absolute_and_relative_lines() {
        let path = parse_path("M1,1 L3,1 l0,2 H1 v-2").unwrap();
        let pts = endpoints(&path);
        let expected = [(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0), (1.0, 1.0)];
        assert_eq!(pts.len(), expected.len());
        for (a, b) in pts.iter().zip(expected) {
            assert!(close(*a, b), "{a:?} != {b:?}");
        }
    }

    #[test]
    fn implicit_repeats_after_move_are_lines() {
        let path = parse_path("m1 1 2 0 0 2").unwrap();
        let pts = endpoints(&path);
        assert!(close(pts[1], (3.0, 1.0)));
        assert!(close(pts[2], (3.0, 3.0)));
    }

    #[test]
    fn compact_numbers_split_correctly() {
        // "1.06.79.73" is three numbers; "4-4" is two
        let path = parse_path("M0,0c1.05,0,2,.4,2.71,1.06.79.73,1.28,1.77,1.28,2.93").unwrap();
        let pts = endpoints(&path);
        assert_eq!(pts.len(), 3);
        assert!(close(pts[1], (2.71, 1.06)));
        assert!(close(pts[2], (2.71 + 1.28, 1.06 + 2.93)));

        let path = parse_path("M0,0l4-4").unwrap();
        assert!(close(endpoints(&path)[1], (4.0, -4.0)));
    }

    #[test]
    fn smooth_cubic_reflects_previous_control() {
        let path = parse_path("M0,0 C0,1 1,1 1,0 S2,-1 2,0").unwrap();
        let cubic = path
            .iter()
            .filter_map(|event| match event {
                PathEvent::Cubic { ctrl1, .. } => Some(ctrl1),
                _ => None,
            })
            .nth(1)
            .unwrap();
        assert!(close((cubic.x, cubic.y), (1.0, -1.0)));
    }

    #[test]
    fn arcs_become_cubics_ending_at_target() {
        let path = parse_path("M0,10 A10,10 0 0,1 10,0").unwrap();
        let pts = endpoints(&path);
        assert!(close(*pts.last().unwrap(), (10.0, 0.0)));
        assert!(pts.len() >= 2);
    }

    #[test]
    fn exponent_notation() {
        let path = parse_path("M1e1,0L2.5E-1,1").unwrap();
        let pts = endpoints(&path);
        assert!(close(pts[0], (10.0, 0.0)));
        assert!(close(pts[1], (0.25, 1.0)));
    }

    #[test]
    fn close_returns_to_subpath_start() {
        let path = parse_path("M2,2h4v4z l1,1").unwrap();
        let pts = endpoints(&path);
        assert!(close(*pts.last().unwrap(), (3.0, 3.0)));
    }

    #[test]
    fn errors() {
        assert_eq!(parse_path("").err(), Some(PathError::Empty));
        assert_eq!(parse_path("L1,1").err(), Some(PathError::MissingMoveTo));
        assert_eq!(parse_path("M0,0").err(), Some(PathError::Empty));
        assert_eq!(
            parse_path("M0,0 L1").err(),
            Some(PathError::ExpectedNumber { offset: 7 })
        );
        assert_eq!(
            parse_path("M0,0 L1,#").err(),
            Some(PathError::UnexpectedCharacter { ch: '#', offset: 8 })
        );
        assert_eq!(
            parse_path("M0,0 A1,1 0 2 0 1,1").err(),
            Some(PathError::InvalidFlag { offset: 12 })
        );
    }
}
