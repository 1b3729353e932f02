//! Reusable widgets for the marbles TUI.

pub mod lane;
pub mod operator_list;
pub mod status_bar;

pub use lane::Lane;
pub use operator_list::OperatorList;
pub use status_bar::{KeyHint, StatusBar};
