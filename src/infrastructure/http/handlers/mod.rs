//! HTTP Handlers

mod command;
mod listen;
mod ping;
mod voice;

pub use command::{say, set_voice, set_volume, stop};
pub use listen::channel_listener;
pub use ping::ping;
pub use voice::list_voices;
