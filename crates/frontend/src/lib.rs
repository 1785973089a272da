pub mod html;
pub mod views;

pub use html::HtmlRenderer;
pub use views::*;
