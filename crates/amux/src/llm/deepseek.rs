//! DeepSeek speaks Chat Completions with a `reasoning_content` channel on
//! responses; parse/build delegate to the shared OpenAI wire.

use amux_core::strng;
use amux_core::strng::Strng;

pub const NAME: Strng = strng::literal!("deepseek");
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_CHAT_PATH: &str = "/v1/chat/completions";
