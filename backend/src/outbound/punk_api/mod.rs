//! Punk API outbound adapter.
//!
//! This module provides a thin HTTP implementation of the `BeerSource` port.

mod dto;
mod http_source;

pub use http_source::PunkApiSource;
