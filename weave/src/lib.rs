pub mod directive;
pub mod display;
pub mod document;
pub mod fragment;

pub use directive::{Directive, DirectiveKind};
pub use fragment::{Fragment, Part};
