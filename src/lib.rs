pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod speech;
pub mod volume;
pub mod processing {
    pub mod layout;
}
pub mod render {
    pub mod canvas;
    pub mod caption;
    pub mod loader;
}
pub mod tasks {
    pub mod dispatcher;
    pub mod input;
}

pub use error::{Error, Result};
pub use processing::layout::{fit, try_fit, FitResult};
