use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Error returned when a style keyword is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyword {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownKeyword {}

/// Border line style.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    None,
    Hidden,
    Dotted,
    Dashed,
    Solid,
    Double,
    Groove,
    Ridge,
    Inset,
    Outset,
}

impl BorderStyle {
    pub const ALL: [BorderStyle; 10] = [
        BorderStyle::None,
        BorderStyle::Hidden,
        BorderStyle::Dotted,
        BorderStyle::Dashed,
        BorderStyle::Solid,
        BorderStyle::Double,
        BorderStyle::Groove,
        BorderStyle::Ridge,
        BorderStyle::Inset,
        BorderStyle::Outset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BorderStyle::None => "none",
            BorderStyle::Hidden => "hidden",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Solid => "solid",
            BorderStyle::Double => "double",
            BorderStyle::Groove => "groove",
            BorderStyle::Ridge => "ridge",
            BorderStyle::Inset => "inset",
            BorderStyle::Outset => "outset",
        }
    }
}

impl fmt::Display for BorderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BorderStyle {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BorderStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| UnknownKeyword { kind: "border style", value: s.to_string() })
    }
}

/// Rule (leader / horizontal line) style.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleStyle {
    None,
    Dotted,
    Dashed,
    Solid,
    Double,
    Groove,
    Ridge,
}

impl RuleStyle {
    pub const ALL: [RuleStyle; 7] = [
        RuleStyle::None,
        RuleStyle::Dotted,
        RuleStyle::Dashed,
        RuleStyle::Solid,
        RuleStyle::Double,
        RuleStyle::Groove,
        RuleStyle::Ridge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleStyle::None => "none",
            RuleStyle::Dotted => "dotted",
            RuleStyle::Dashed => "dashed",
            RuleStyle::Solid => "solid",
            RuleStyle::Double => "double",
            RuleStyle::Groove => "groove",
            RuleStyle::Ridge => "ridge",
        }
    }

    /// The border style used when a rule is rendered as a border line.
    pub fn as_border_style(self) -> BorderStyle {
        match self {
            RuleStyle::None => BorderStyle::None,
            RuleStyle::Dotted => BorderStyle::Dotted,
            RuleStyle::Dashed => BorderStyle::Dashed,
            RuleStyle::Solid => BorderStyle::Solid,
            RuleStyle::Double => BorderStyle::Double,
            RuleStyle::Groove => BorderStyle::Groove,
            RuleStyle::Ridge => BorderStyle::Ridge,
        }
    }
}

impl fmt::Display for RuleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleStyle {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| UnknownKeyword { kind: "rule style", value: s.to_string() })
    }
}

/// How a border participates in table border collapsing.
///
/// In the collapsing modes half of the border width lies outside the
/// rectangle handed to the painter (the "clipped" width).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderMode {
    #[default]
    Separate,
    CollapseInner,
    CollapseOuter,
}

impl BorderMode {
    pub fn name(self) -> &'static str {
        match self {
            BorderMode::Separate => "separate",
            BorderMode::CollapseInner => "collapse-inner",
            BorderMode::CollapseOuter => "collapse-outer",
        }
    }
}

impl FromStr for BorderMode {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "separate" => Ok(BorderMode::Separate),
            "collapse-inner" => Ok(BorderMode::CollapseInner),
            "collapse-outer" => Ok(BorderMode::CollapseOuter),
            _ => Err(UnknownKeyword { kind: "border mode", value: s.to_string() }),
        }
    }
}
