mod cookies;
mod entry;

pub use cookies::{CookieBrowser, Cookies};
pub use entry::FlatEntry;
