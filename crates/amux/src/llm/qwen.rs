//! Qwen (DashScope compatible mode). Chat Completions plus audio/video
//! input parts and the `enable_thinking` switch, both of which ride through
//! the shared OpenAI wire: media parts map to IR audio/video sources, and
//! the switch is read out of the extension map when resolving reasoning
//! mode.

use amux_core::strng;
use amux_core::strng::Strng;

pub const NAME: Strng = strng::literal!("qwen");
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com";
pub const DEFAULT_CHAT_PATH: &str = "/compatible-mode/v1/chat/completions";
