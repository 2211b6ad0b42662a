//! Moonshot (Kimi) is Chat Completions compatible.

use amux_core::strng;
use amux_core::strng::Strng;

pub const NAME: Strng = strng::literal!("moonshot");
pub const DEFAULT_BASE_URL: &str = "https://api.moonshot.cn";
pub const DEFAULT_CHAT_PATH: &str = "/v1/chat/completions";
