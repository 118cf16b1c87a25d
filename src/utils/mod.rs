pub mod cookie_utils;
pub mod logging;
pub mod responses;
