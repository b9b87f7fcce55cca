//! Chart archive upload

use std::path::Path;

use base64::Engine;
use reqwest::Method;
use url::Url;

use crate::error::{GoalError, Result};
use crate::registration::PushTarget;

/// Authorization header value for a push target
///
/// Basic when both username and password are set, otherwise bearer when a
/// token is set, otherwise none.
pub fn auth_header(target: &PushTarget) -> Option<String> {
    match (&target.username, &target.password, &target.token) {
        (Some(username), Some(password), _) => {
            let encoded = base64::engine::general_purpose::STANDARD
                .encode(format!("{}:{}", username, password));
            Some(format!("Basic {}", encoded))
        }
        (_, _, Some(token)) => Some(format!("Bearer {}", token)),
        _ => None,
    }
}

/// Stream a packaged chart to the target registry
///
/// Request options are applied last and may replace the method and the
/// `Authorization` header. Anything but a 2xx response is an upload failure.
pub async fn upload_chart(target: &PushTarget, archive: &Path) -> Result<()> {
    let options = &target.options;

    let method = match &options.method {
        Some(m) => Method::from_bytes(m.to_uppercase().as_bytes())
            .map_err(|_| GoalError::Configuration(format!("invalid upload method '{}'", m)))?,
        None => Method::POST,
    };

    let url = Url::parse(&target.registry).map_err(|e| {
        GoalError::Configuration(format!("invalid registry URL '{}': {}", target.registry, e))
    })?;

    let file = tokio::fs::File::open(archive).await?;

    let client = reqwest::Client::builder()
        .user_agent(concat!("chartgoal/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let mut request = client.request(method.clone(), url);

    let overrides_auth = options
        .headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case("authorization"));
    if let Some(auth) = auth_header(target).filter(|_| !overrides_auth) {
        request = request.header("Authorization", auth);
    }
    for (name, value) in &options.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(timeout) = options.timeout {
        request = request.timeout(timeout);
    }

    tracing::info!(
        archive = %archive.display(),
        registry = %target.registry,
        %method,
        "uploading chart"
    );

    let response = request.body(reqwest::Body::from(file)).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = match status.canonical_reason() {
            Some(reason) if body.trim().is_empty() => reason.to_string(),
            _ => body.trim().to_string(),
        };
        return Err(GoalError::Upload {
            status: Some(status.as_u16()),
            message,
        });
    }

    tracing::info!(status = status.as_u16(), "chart uploaded");
    Ok(())
}
