//! API command - runs the JSON API only (no web page)

use super::serve::run_with_mode;
use super::ServeArgs;
use crate::api::RouterMode;

/// Run the API-only server
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    run_with_mode(args, RouterMode::ApiOnly).await
}
