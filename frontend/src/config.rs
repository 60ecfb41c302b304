pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Base URL of the task API, fixed at build time through `TASKS_API_BASE_URL`.
pub fn api_base_url() -> String {
    resolve_base_url(option_env!("TASKS_API_BASE_URL"))
}

fn resolve_base_url(configured: Option<&str>) -> String {
    let url = configured
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_BASE_URL);
    url.trim_end_matches('/').to_string()
}
