mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn root_endpoint_responds() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    Ok(())
}

#[tokio::test]
async fn health_endpoint_reports_database() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}
