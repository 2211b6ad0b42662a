//! Zhipu (GLM) is Chat Completions compatible under its own path prefix.

use amux_core::strng;
use amux_core::strng::Strng;

pub const NAME: Strng = strng::literal!("zhipu");
pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn";
pub const DEFAULT_CHAT_PATH: &str = "/api/paas/v4/chat/completions";
