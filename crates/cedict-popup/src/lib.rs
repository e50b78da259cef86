pub mod handlers;
pub mod loader;
pub mod rate_limit;
pub mod resolver;

pub use handlers::{AppState, router};
pub use loader::{IndexCache, LoaderConfig};
pub use resolver::{Resolution, resolve};
