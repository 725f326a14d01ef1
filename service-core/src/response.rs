//! The `{code, data}` JSON envelope every HTTP response is wrapped in.

use serde::{Deserialize, Serialize};

pub const CODE_OK: i32 = 0;
pub const CODE_ERROR: i32 = -1;
pub const CODE_UNAUTHORIZED: i32 = -2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub data: T,
}

/// Human-readable message payload, in English and Chinese.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub msg: String,
    pub msg_zh: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: CODE_OK,
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_OK
    }
}

impl ApiResponse<MessageBody> {
    pub fn message(code: i32, msg: impl Into<String>, msg_zh: impl Into<String>) -> Self {
        Self {
            code,
            data: MessageBody {
                msg: msg.into(),
                msg_zh: msg_zh.into(),
            },
        }
    }
}
