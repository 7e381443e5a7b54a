pub mod catalog;
pub mod locale;
pub mod text;

pub use catalog::*;
pub use locale::*;
pub use text::*;
