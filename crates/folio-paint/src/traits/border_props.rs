use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::paint::Color;

use super::{BorderMode, BorderStyle};

/// Description of one border edge.
///
/// `radius_start` / `radius_end` are the corner radii this edge contributes at
/// its two adjoining corners, measured along the edge. Together with the
/// neighbouring edge's radius they define the corner ellipse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BorderProps {
    pub style: BorderStyle,
    pub width: i32,
    pub radius_start: i32,
    pub radius_end: i32,
    pub color: Color,
    pub mode: BorderMode,
}

impl BorderProps {
    #[inline]
    pub const fn new(style: BorderStyle, width: i32, color: Color, mode: BorderMode) -> Self {
        Self { style, width, radius_start: 0, radius_end: 0, color, mode }
    }

    /// Solid border in separate mode.
    #[inline]
    pub const fn solid(width: i32, color: Color) -> Self {
        Self::new(BorderStyle::Solid, width, color, BorderMode::Separate)
    }

    #[inline]
    pub const fn with_radii(mut self, radius_start: i32, radius_end: i32) -> Self {
        self.radius_start = radius_start;
        self.radius_end = radius_end;
        self
    }

    #[inline]
    pub const fn with_mode(mut self, mode: BorderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Width lying outside the painted rectangle. Half the width when
    /// collapsing, zero otherwise.
    #[inline]
    pub fn clipped_width(&self) -> i32 {
        match self.mode {
            BorderMode::Separate => 0,
            BorderMode::CollapseInner | BorderMode::CollapseOuter => self.width / 2,
        }
    }

    #[inline]
    pub fn is_collapse_outer(&self) -> bool {
        self.mode == BorderMode::CollapseOuter
    }
}

/// `(style,color,width[,mode][,radius-start,radius-end])`
///
/// The mode is written only when it is not `separate`, the radii only when
/// either is non-zero.
impl fmt::Display for BorderProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{}", self.style, self.color, self.width)?;
        if self.mode != BorderMode::Separate {
            write!(f, ",{}", self.mode.name())?;
        }
        if self.radius_start != 0 || self.radius_end != 0 {
            write!(f, ",{},{}", self.radius_start, self.radius_end)?;
        }
        f.write_str(")")
    }
}

/// Error returned when a border description cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderPropsParseError {
    pub input: String,
    pub reason: String,
}

impl fmt::Display for BorderPropsParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid border '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for BorderPropsParseError {}

impl FromStr for BorderProps {
    type Err = BorderPropsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason: String| BorderPropsParseError { input: s.to_string(), reason };
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| err("expected parenthesized list".into()))?;

        let fields: Vec<&str> = inner.split(',').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(err(format!("expected at least 3 fields, got {}", fields.len())));
        }

        let style = fields[0].parse::<BorderStyle>().map_err(|e| err(e.to_string()))?;
        let color = fields[1].parse::<Color>().map_err(|e| err(e.to_string()))?;
        let int = |v: &str| v.parse::<i32>().map_err(|_| err(format!("'{v}' is not an integer")));
        let width = int(fields[2])?;
        if width < 0 {
            return Err(err("negative width".into()));
        }

        let mut rest = &fields[3..];
        let mut mode = BorderMode::Separate;
        if let Some(first) = rest.first() {
            if let Ok(m) = first.parse::<BorderMode>() {
                mode = m;
                rest = &rest[1..];
            }
        }

        let (radius_start, radius_end) = match rest {
            [] => (0, 0),
            [rs, re] => (int(rs)?, int(re)?),
            _ => return Err(err("expected radius-start and radius-end".into())),
        };
        if radius_start < 0 || radius_end < 0 {
            return Err(err("negative radius".into()));
        }

        Ok(BorderProps { style, width, radius_start, radius_end, color, mode })
    }
}

/// The four (optional) edges of a bordered rectangle, in writing-mode
/// relative order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BorderSet {
    pub before: Option<BorderProps>,
    pub after: Option<BorderProps>,
    pub start: Option<BorderProps>,
    pub end: Option<BorderProps>,
}

impl BorderSet {
    #[inline]
    pub const fn new(
        before: Option<BorderProps>,
        after: Option<BorderProps>,
        start: Option<BorderProps>,
        end: Option<BorderProps>,
    ) -> Self {
        Self { before, after, start, end }
    }

    /// Same border on all four sides.
    #[inline]
    pub const fn all(props: BorderProps) -> Self {
        Self::new(Some(props), Some(props), Some(props), Some(props))
    }

    /// No border on any side.
    #[inline]
    pub const fn none() -> Self {
        Self::new(None, None, None, None)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none() && self.start.is_none() && self.end.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── text form ─────────────────────────────────────────────────────────

    #[test]
    fn display_minimal() {
        let b = BorderProps::solid(1000, Color::black());
        assert_eq!(b.to_string(), "(solid,#000000,1000)");
    }

    #[test]
    fn display_with_mode_and_radii() {
        let b = BorderProps::new(BorderStyle::Dashed, 500, Color::rgb(255, 0, 0), BorderMode::CollapseOuter)
            .with_radii(3000, 4000);
        assert_eq!(b.to_string(), "(dashed,#ff0000,500,collapse-outer,3000,4000)");
    }

    #[test]
    fn parse_all_forms() {
        let plain: BorderProps = "(solid,#000000,1000)".parse().unwrap();
        assert_eq!(plain, BorderProps::solid(1000, Color::black()));

        let radii: BorderProps = "(double, #00ff00, 3000, 200, 300)".parse().unwrap();
        assert_eq!(radii.style, BorderStyle::Double);
        assert_eq!((radii.radius_start, radii.radius_end), (200, 300));
        assert_eq!(radii.mode, BorderMode::Separate);

        let collapsed: BorderProps = "(ridge,#0000ff,800,collapse-inner)".parse().unwrap();
        assert_eq!(collapsed.mode, BorderMode::CollapseInner);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("solid,#000000,1000".parse::<BorderProps>().is_err());
        assert!("(solid,#000000)".parse::<BorderProps>().is_err());
        assert!("(solid,#000000,-5)".parse::<BorderProps>().is_err());
        assert!("(solid,#000000,10,1)".parse::<BorderProps>().is_err());
        assert!("(bogus,#000000,10)".parse::<BorderProps>().is_err());
    }

    #[test]
    fn parse_rejects_negative_radii() {
        let err = "(solid,#000000,10,-500,1500)".parse::<BorderProps>().unwrap_err();
        assert_eq!(err.to_string(), "invalid border '(solid,#000000,10,-500,1500)': negative radius");
        assert!("(solid,#000000,10,collapse-outer,500,-1)".parse::<BorderProps>().is_err());
        assert!("(solid,#000000,10,0,0)".parse::<BorderProps>().is_ok());
    }

    // ── clipped width ─────────────────────────────────────────────────────

    #[test]
    fn clipped_width_by_mode() {
        let b = BorderProps::solid(1001, Color::black());
        assert_eq!(b.clipped_width(), 0);
        assert_eq!(b.with_mode(BorderMode::CollapseInner).clipped_width(), 500);
        assert_eq!(b.with_mode(BorderMode::CollapseOuter).clipped_width(), 500);
        assert!(b.with_mode(BorderMode::CollapseOuter).is_collapse_outer());
        assert!(!b.with_mode(BorderMode::CollapseInner).is_collapse_outer());
    }

    #[test]
    fn border_set_helpers() {
        assert!(BorderSet::none().is_empty());
        assert!(!BorderSet::all(BorderProps::solid(1, Color::black())).is_empty());
    }
}
