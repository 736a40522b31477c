use thiserror::Error;
use tracing::warn;

/// Failures of an AI search call, classified by HTTP status or transport
/// error. The `Display` text is the message shown to the user.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    #[error("네트워크 연결을 확인해주세요.")]
    Network,
    #[error("잘못된 요청입니다.")]
    BadRequest,
    #[error("로그인이 필요합니다.")]
    Unauthorized,
    #[error("접근 권한이 없습니다.")]
    Forbidden,
    #[error("검색 서비스를 찾을 수 없습니다.")]
    NotFound,
    #[error("검색어 형식이 올바르지 않습니다. 다른 표현으로 다시 시도해주세요.")]
    InvalidQuery,
    #[error("요청이 너무 많습니다. 잠시 후 다시 시도해주세요.")]
    RateLimited,
    #[error("{}", client_message(.status, .detail))]
    Client { status: u16, detail: Option<String> },
    #[error("검색 서비스가 일시적으로 이용 불가합니다.")]
    Unavailable,
    #[error("검색 요청 시간이 초과되었습니다.")]
    Timeout,
    #[error("서버 오류가 발생했습니다. ({status})")]
    Server { status: u16 },
    /// Carries the decode detail for logs; not shown to the user
    #[error("검색 결과를 해석할 수 없습니다.")]
    InvalidResponse(String),
}

fn client_message(status: &u16, detail: &Option<String>) -> String {
    match detail.as_deref() {
        Some(detail) if !detail.trim().is_empty() => detail.trim().to_string(),
        _ => format!("요청을 처리할 수 없습니다. ({})", status),
    }
}

impl SearchError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            422 => Self::InvalidQuery,
            429 => Self::RateLimited,
            402..=499 => Self::Client { status, detail },
            503 => Self::Unavailable,
            504 => Self::Timeout,
            500..=599 => Self::Server { status },
            other => Self::InvalidResponse(format!("unexpected status {}", other)),
        }
    }

    /// Classify a transport-level failure (no usable response)
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            warn!("Undecodable AI search response: {}", error);
            Self::InvalidResponse(error.to_string())
        } else {
            Self::Network
        }
    }

    /// Message for the notification surface
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Pull `detail` out of a FastAPI-style error body, if it is a plain string.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(str::to_string)
}
