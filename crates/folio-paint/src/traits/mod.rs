//! Border and rule traits consumed by the painters.

mod border_props;
mod style;

pub use border_props::{BorderProps, BorderPropsParseError, BorderSet};
pub use style::{BorderMode, BorderStyle, RuleStyle, UnknownKeyword};
