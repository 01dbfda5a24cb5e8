//! Display formatting for terminal output
//!
//! Provides utilities for formatting games and saves as fixed-width tables,
//! plus the size and timestamp renderings they share. Everything here returns
//! a `String`; printing is left to the CLI.

pub mod format;
pub mod game;
pub mod save;

pub use format::{format_size, format_timestamp, TIME_FORMAT};
pub use game::{
    format_checksums, format_game_details, format_game_header, format_game_info,
    format_game_list, format_game_row,
};
pub use save::{format_save_header, format_save_list, format_save_row};
