//! Endpoint URL construction.

/// Join `base_url` and `endpoint` with exactly one slash between them.
///
/// ```
/// use chatlpt::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.openai.com/v1/", "/chat/completions"),
///     "https://api.openai.com/v1/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim().trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_duplicate_slashes() {
        for base in [
            "https://api.example.com/v1",
            "https://api.example.com/v1/",
            "https://api.example.com/v1///",
        ] {
            for endpoint in ["images/generations", "/images/generations", "//images/generations"] {
                assert_eq!(
                    construct_api_url(base, endpoint),
                    "https://api.example.com/v1/images/generations",
                    "base {base:?} endpoint {endpoint:?}"
                );
            }
        }
    }

    #[test]
    fn surrounding_whitespace_in_base_is_ignored() {
        assert_eq!(
            construct_api_url(" https://api.openai.com/v1 \n", "models"),
            "https://api.openai.com/v1/models"
        );
    }
}
