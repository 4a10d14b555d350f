//! Strip workflow integration tests.

use axum::http::StatusCode;
use dbx_cli::commands::{run_strip, ApiClient, StripOptions};
use dbx_cli::CliError;
use serde_json::json;

use crate::common::{MockApi, TEST_TOKEN};

const APPLY: StripOptions = StripOptions { dry_run: false };

/// Tests that the account users grant is removed and the rest reduced.
#[tokio::test]
async fn test_account_users_grant_is_removed() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["bar"])
        .with_permissions(
            "bar",
            json!([
                {"group_name": "account users", "all_permissions": [{"permission_level": "CAN_USE", "inherited": false}]},
                {"user_name": "alice", "all_permissions": [{"permission_level": "CAN_USE", "inherited": false}]}
            ]),
        )
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    assert_eq!(
        env.api.puts(),
        vec![(
            "bar".to_string(),
            json!({"access_control_list": [
                {"user_name": "alice", "group_name": null, "permission_level": "CAN_USE"}
            ]})
        )]
    );
    assert_eq!(summary.apps, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.removed_grants, 1);
    Ok(())
}

/// Tests that only the first permission level survives.
#[tokio::test]
async fn test_only_first_permission_level_is_written() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["dash"])
        .with_permissions(
            "dash",
            json!([{
                "user_name": null,
                "group_name": "eng",
                "all_permissions": [
                    {"permission_level": "CAN_MANAGE"},
                    {"permission_level": "CAN_VIEW"}
                ]
            }]),
        )
        .start()
        .await?;

    run_strip(&env.credentials, &env.client, APPLY).await?;

    let puts = env.api.puts();
    assert_eq!(
        puts[0].1,
        json!({"access_control_list": [
            {"user_name": null, "group_name": "eng", "permission_level": "CAN_MANAGE"}
        ]})
    );
    Ok(())
}

/// Tests that a failed listing processes no apps.
#[tokio::test]
async fn test_listing_failure_processes_nothing() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps_response(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    assert_eq!(summary.apps, 0);
    let calls: Vec<_> = env
        .api
        .requests()
        .into_iter()
        .map(|r| (r.method, r.path))
        .collect();
    assert_eq!(
        calls,
        vec![
            ("POST", "/oidc/v1/token".to_string()),
            ("GET", "/api/2.0/apps".to_string()),
        ]
    );
    Ok(())
}

/// Tests that an undecodable listing is treated as no apps.
#[tokio::test]
async fn test_malformed_listing_processes_nothing() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps_response(StatusCode::OK, "<html>maintenance</html>")
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    assert_eq!(summary, Default::default());
    assert_eq!(env.api.requests().len(), 2);
    assert!(env.api.puts().is_empty());
    Ok(())
}

/// Tests that apps without a name are left out while the rest are processed.
#[tokio::test]
async fn test_unnamed_app_does_not_hide_others() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps_response(
            StatusCode::OK,
            json!({"apps": [{"name": "ok"}, {"url": "https://orphan"}, {"name": null}]}).to_string(),
        )
        .with_permissions("ok", json!([]))
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    let apps: Vec<String> = env.api.puts().into_iter().map(|(app, _)| app).collect();
    assert_eq!(apps, vec!["ok"]);
    assert_eq!(summary.apps, 1);
    Ok(())
}

/// Tests that unexpected grant metadata on one entry keeps every other grant.
#[tokio::test]
async fn test_drifted_metadata_keeps_other_grants() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["bar"])
        .with_permissions(
            "bar",
            json!([
                {"user_name": "alice", "all_permissions": [
                    {"permission_level": "CAN_MANAGE", "inherited_from_object": "/directories/1"}
                ]},
                {"group_name": "admins", "all_permissions": null},
                {"group_name": "account users", "all_permissions": [{"permission_level": "CAN_USE"}]}
            ]),
        )
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    assert_eq!(
        env.api.puts(),
        vec![(
            "bar".to_string(),
            json!({"access_control_list": [
                {"user_name": "alice", "group_name": null, "permission_level": "CAN_MANAGE"},
                {"user_name": null, "group_name": "admins", "permission_level": null}
            ]})
        )]
    );
    assert_eq!(summary.failed_reads, 0);
    assert_eq!(summary.removed_grants, 1);
    Ok(())
}

/// Tests that a list of the wrong shape leaves the app untouched.
#[tokio::test]
async fn test_unexpected_list_shape_skips_app() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["odd", "next"])
        .with_permissions_response(
            "odd",
            StatusCode::OK,
            json!({"access_control_list": "everyone"}).to_string(),
        )
        .with_permissions("next", json!([]))
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    let apps: Vec<String> = env.api.puts().into_iter().map(|(app, _)| app).collect();
    assert_eq!(apps, vec!["next"]);
    assert_eq!(summary.apps, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.updated, 1);
    Ok(())
}

/// Tests that an unreadable list is still written back, as empty.
#[tokio::test]
async fn test_missing_permissions_write_empty_list() -> anyhow::Result<()> {
    // "foo" has no canned permissions, so the mock answers 404.
    let env = MockApi::new().with_apps(&["foo"]).start().await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    assert_eq!(
        env.api.puts(),
        vec![("foo".to_string(), json!({"access_control_list": []}))]
    );
    assert_eq!(summary.failed_reads, 1);
    assert_eq!(summary.updated, 1);
    Ok(())
}

/// Tests that a non-JSON permissions body is treated as an empty list.
#[tokio::test]
async fn test_malformed_permissions_write_empty_list() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["foo"])
        .with_permissions_response("foo", StatusCode::OK, "not json")
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    assert_eq!(env.api.puts()[0].1, json!({"access_control_list": []}));
    assert_eq!(summary.failed_reads, 1);
    Ok(())
}

/// Tests that every listed app gets exactly one update, in listing order.
#[tokio::test]
async fn test_one_update_per_app() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["a", "b", "c"])
        .with_permissions(
            "a",
            json!([{"group_name": "account users", "all_permissions": [{"permission_level": "CAN_USE"}]}]),
        )
        .with_permissions(
            "c",
            json!([{"group_name": "admins", "all_permissions": [{"permission_level": "CAN_MANAGE"}]}]),
        )
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    let apps: Vec<String> = env.api.puts().into_iter().map(|(app, _)| app).collect();
    assert_eq!(apps, vec!["a", "b", "c"]);
    assert_eq!(summary.apps, 3);
    assert_eq!(summary.updated, 3);
    assert_eq!(summary.failed_reads, 1);
    Ok(())
}

/// Tests that a rejected update does not stop the next app.
#[tokio::test]
async fn test_write_failure_continues_with_next_app() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["first", "second"])
        .with_permissions("first", json!([]))
        .with_permissions("second", json!([]))
        .with_update_response("first", StatusCode::INTERNAL_SERVER_ERROR, "write refused")
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    assert_eq!(env.api.puts().len(), 2);
    assert_eq!(summary.failed_writes, 1);
    assert_eq!(summary.updated, 1);
    Ok(())
}

/// Tests that an unreadable update answer counts as a failed write.
#[tokio::test]
async fn test_undecodable_update_answer_is_failure() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["foo"])
        .with_permissions("foo", json!([]))
        .with_update_response("foo", StatusCode::OK, "<html>ok</html>")
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, APPLY).await?;

    assert_eq!(summary.failed_writes, 1);
    assert_eq!(summary.updated, 0);
    Ok(())
}

/// Tests that a dry run reads everything and writes nothing.
#[tokio::test]
async fn test_dry_run_sends_no_updates() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["a", "b"])
        .with_permissions(
            "a",
            json!([{"group_name": "account users", "all_permissions": [{"permission_level": "CAN_USE"}]}]),
        )
        .start()
        .await?;

    let summary = run_strip(&env.credentials, &env.client, StripOptions { dry_run: true }).await?;

    assert!(env.api.puts().is_empty());
    let reads = env
        .api
        .requests()
        .iter()
        .filter(|r| r.method == "GET" && r.path.starts_with("/api/2.0/permissions/"))
        .count();
    assert_eq!(reads, 2);
    assert_eq!(summary.apps, 2);
    assert_eq!(summary.removed_grants, 1);
    assert_eq!(summary.updated, 0);
    Ok(())
}

/// Tests that stripping an already clean list writes the same content again.
#[tokio::test]
async fn test_clean_list_is_rewritten_unchanged() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["clean"])
        .with_permissions(
            "clean",
            json!([
                {"user_name": "alice", "all_permissions": [{"permission_level": "CAN_USE"}]},
                {"group_name": "admins", "all_permissions": [{"permission_level": "CAN_MANAGE"}]}
            ]),
        )
        .start()
        .await?;

    run_strip(&env.credentials, &env.client, APPLY).await?;
    run_strip(&env.credentials, &env.client, APPLY).await?;

    let puts = env.api.puts();
    assert_eq!(puts.len(), 2);
    assert_eq!(puts[0], puts[1]);
    assert_eq!(
        puts[0].1["access_control_list"].as_array().map(Vec::len),
        Some(2)
    );
    Ok(())
}

/// Tests that every API call carries the bearer token.
#[tokio::test]
async fn test_requests_carry_bearer_token() -> anyhow::Result<()> {
    let env = MockApi::new()
        .with_apps(&["foo"])
        .with_permissions("foo", json!([]))
        .start()
        .await?;

    run_strip(&env.credentials, &env.client, APPLY).await?;

    let expected = format!("Bearer {TEST_TOKEN}");
    let api_calls: Vec<_> = env
        .api
        .requests()
        .into_iter()
        .filter(|r| r.path.starts_with("/api/"))
        .collect();
    assert_eq!(api_calls.len(), 3);
    assert!(api_calls
        .iter()
        .all(|r| r.authorization.as_deref() == Some(expected.as_str())));
    Ok(())
}

/// Tests that an unreachable server ends the run.
#[tokio::test]
async fn test_transport_failure_is_fatal() -> anyhow::Result<()> {
    let env = MockApi::new().start().await?;

    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let closed = format!("http://{}", listener.local_addr()?);
    drop(listener);

    let credentials = dbx_cli::Credentials::new(closed, "id", "secret");
    let client = ApiClient::new(&credentials, None)?;
    let result = run_strip(&credentials, &client, APPLY).await;

    assert!(matches!(result, Err(CliError::Http(_))));
    assert!(env.api.requests().is_empty());
    assert!(env.base_url.starts_with("http://127.0.0.1:"));
    Ok(())
}
