pub mod hex_text;
pub mod line_file;
pub mod logging;
pub mod monitor;
pub mod sjis;
