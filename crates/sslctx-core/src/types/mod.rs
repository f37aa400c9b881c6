mod action;
mod certificate;
mod collection;
mod display;
mod index;
mod links;

pub use action::*;
pub use certificate::*;
pub use collection::*;
pub use display::*;
pub use index::*;
pub use links::*;
