//! Pointer gestures: touch classification on the text, drag and resize on
//! the container handles.

pub mod container;
pub mod tap;

pub use container::{ContainerEvent, ContainerGestureController, ContainerState, SafeArea};
pub use tap::{GestureDisambiguator, GestureIntent, Point};
