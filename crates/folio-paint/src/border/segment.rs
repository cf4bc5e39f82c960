use crate::paint::Color;
use crate::traits::{BorderProps, BorderStyle};

/// Normalized view of one border edge.
///
/// Every edge is drawn in a frame where it runs left to right along the top
/// of the box, so the start/end radii of the after and start edges have to be
/// swapped (`flipped`). An absent edge reports zero for every geometric query
/// and has no style or color.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BorderSegment<'a> {
    props: Option<&'a BorderProps>,
    flipped: bool,
}

impl<'a> BorderSegment<'a> {
    #[inline]
    pub fn as_is(props: Option<&'a BorderProps>) -> Self {
        Self { props: sanitize(props), flipped: false }
    }

    #[inline]
    pub fn flipped(props: Option<&'a BorderProps>) -> Self {
        Self { props: sanitize(props), flipped: true }
    }

    #[inline]
    pub fn is_specified(&self) -> bool {
        self.props.is_some()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.props.map_or(0, |p| p.width)
    }

    #[inline]
    pub fn clipped_width(&self) -> i32 {
        self.props.map_or(0, BorderProps::clipped_width)
    }

    #[inline]
    pub fn radius_start(&self) -> i32 {
        match self.props {
            Some(p) if self.flipped => p.radius_end,
            Some(p) => p.radius_start,
            None => 0,
        }
    }

    #[inline]
    pub fn radius_end(&self) -> i32 {
        match self.props {
            Some(p) if self.flipped => p.radius_start,
            Some(p) => p.radius_end,
            None => 0,
        }
    }

    #[inline]
    pub fn is_collapse_outer(&self) -> bool {
        self.props.is_some_and(BorderProps::is_collapse_outer)
    }

    #[inline]
    pub fn style(&self) -> Option<BorderStyle> {
        self.props.map(|p| p.style)
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.props.map(|p| p.color)
    }
}

/// Zero-width edges are treated as absent.
#[inline]
pub fn sanitize(props: Option<&BorderProps>) -> Option<&BorderProps> {
    props.filter(|p| p.width > 0)
}
