mod create;
mod get;
mod list;

pub use create::create;
pub use get::get;
pub use list::list;
