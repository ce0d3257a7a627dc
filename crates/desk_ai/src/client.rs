use desk_core::error::AppError;

/// Client for the local LLM endpoint. Strictly limited to `127.0.0.1`:
/// draft text never leaves the machine through this crate.
#[derive(Debug, Clone)]
pub struct LlmClient {
    base_url: String,
}

impl LlmClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        if !is_loopback_base_url(&base_url) {
            return Err(AppError::new(
                "AI_REMOTE_NOT_ALLOWED",
                "LLM base URL must be localhost (127.0.0.1)",
            )
            .with_details(format!("base_url={base_url}")));
        }

        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn health_check(&self) -> Result<(), AppError> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = ureq::get(&url)
            .timeout(std::time::Duration::from_millis(800))
            .call();

        match resp {
            Ok(r) if r.status() == 200 => Ok(()),
            Ok(r) => Err(
                AppError::new("AI_ENDPOINT_UNHEALTHY", "LLM endpoint health check failed")
                    .with_details(format!("status={}", r.status())),
            ),
            Err(e) => Err(AppError::new(
                "AI_ENDPOINT_UNREACHABLE",
                "Failed to reach LLM endpoint on 127.0.0.1",
            )
            .with_details(e.to_string())
            .with_retryable(true)),
        }
    }
}

// Accepts exactly `http://127.0.0.1` or `http://127.0.0.1:<port>` with a
// valid port. No path, no userinfo, no host suffix.
fn is_loopback_base_url(base_url: &str) -> bool {
    if base_url == "http://127.0.0.1" {
        return true;
    }
    let Some(port) = base_url.strip_prefix("http://127.0.0.1:") else {
        return false;
    };
    match port.parse::<u32>() {
        Ok(p) => (1..=65535).contains(&p),
        Err(_) => false,
    }
}
