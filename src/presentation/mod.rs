//! Presentation side: the view model that turns controller commands into
//! screen content.  Concrete presenters live in [`crate::adapters`].

pub mod view;
