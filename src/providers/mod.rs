pub mod http;
pub mod util;
