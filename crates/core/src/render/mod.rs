pub mod format;
pub mod html;
