//! Progress display during forecasting

pub mod reporter;
