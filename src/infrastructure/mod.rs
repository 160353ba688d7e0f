pub mod cancel;
pub mod directories;
pub mod http;
pub mod logging;
