pub mod model;
pub mod serve;
pub mod snapshot;
pub mod state;
pub mod svg;
