//! Slide-out drill-down menu.
//!
//! [`MenuController`] is the state machine, [`MenuView`] the seam to
//! whatever draws the menu, and [`MenuMarkup`] the class-name convention a
//! page uses. [`Menu`] renders markup the controller can bind to.

mod controller;
mod markup;
mod render;
mod stack;
mod view;

pub use controller::{MenuController, MenuPhase, MenuTask};
pub use markup::MenuMarkup;
pub use render::{Item, Menu, Submenu};
pub use stack::NavigationStack;
pub use view::MenuView;

pub(crate) use view::{DomMenuView, MenuNodes};
