//! The composition stages, in the order a request runs through them.
//!
//! Every stage takes its input [`Raster`](crate::Raster) by value and returns a new one.

pub(crate) mod background;
pub(crate) mod composite;
pub(crate) mod crop;
pub(crate) mod decode;
pub(crate) mod mask;
pub(crate) mod resize;
pub(crate) mod runner;
