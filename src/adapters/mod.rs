//! Collaborator layer: outbound messaging and product lookup.
//!
//! The game core only talks to the outside world through the
//! [`Messenger`] and [`ProductSource`] traits. The bundled
//! implementations publish notices on the event bus and pick products
//! from a JSON catalog.

pub mod messenger;
pub mod product_source;

pub use messenger::{BusMessenger, Messenger};
pub use product_source::{CatalogProductSource, ProductSource};
