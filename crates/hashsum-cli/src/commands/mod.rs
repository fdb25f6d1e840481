pub mod completions;
pub mod generate;
pub mod man_pages;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_WRITE_ERROR: u8 = 3;
