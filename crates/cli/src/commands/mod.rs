pub mod fetch;
pub mod screen;

pub use fetch::FetchArgs;
pub use screen::ScreenArgs;
