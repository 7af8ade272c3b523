//! HTTP handlers for the page shell and the pages API.

pub mod home;
pub mod pages;
pub use home::*;
pub use pages::*;
