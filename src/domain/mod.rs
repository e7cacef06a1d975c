// Domain layer: business rules, record model and ports. No I/O here.

pub mod dates;
pub mod finance;
pub mod hse;
pub mod model;
pub mod notifications;
pub mod ports;
pub mod workflow;
