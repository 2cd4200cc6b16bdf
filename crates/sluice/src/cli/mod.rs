mod app;
mod cat;
mod get;

pub use app::App;
