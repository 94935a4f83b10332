//! # Screens
//!
//! One module per [`Screen`](crate::app::Screen). Screens edit form fields in
//! place and push [`UiAction`](crate::app::UiAction)s for anything that needs
//! the network.

pub mod collection;
pub mod create;
pub mod dashboard;
pub mod gallery;
pub mod manager;
pub mod swap;
