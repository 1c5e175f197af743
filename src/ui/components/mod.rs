pub mod footer;
pub mod toast;
