pub const APP_NAME: &str = "Tech Trader";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Release tag when built from one, otherwise the crate version plus commit.
pub fn version_label() -> String {
    format_version(GIT_TAG, APP_VERSION, GIT_COMMIT)
}

fn format_version(tag: Option<&str>, version: &str, commit: Option<&str>) -> String {
    match (tag, commit) {
        (Some(tag), _) => tag.to_string(),
        (None, Some(commit)) => format!("v{version} ({commit})"),
        (None, None) => format!("v{version}"),
    }
}
