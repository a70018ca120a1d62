//! HTTP surface for the credentials form: request models, handlers and
//! document delivery.

pub mod delivery;
pub mod handlers;
pub mod model;
