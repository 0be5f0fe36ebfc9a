//! Convert MATLAB `.mat` files holding a `g` matrix and an `H` stack into the
//! JSON consumed by the fractal-zoom page, and serve that page locally.

pub mod config;
pub mod convert;
pub mod data;
pub mod logging;
pub mod server;
