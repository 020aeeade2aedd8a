use crate::core::{ConfigProvider, MemberRecord, MemberSource};
use crate::utils::error::{Result, RosterError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct GroupEnvelope {
    response: Option<GroupPayload>,
}

#[derive(Debug, Deserialize)]
struct GroupPayload {
    #[serde(default)]
    members: Vec<MemberRecord>,
}

/// Reads the member list of one GroupMe group.
pub struct GroupMeClient {
    client: Client,
    members_url: String,
}

impl GroupMeClient {
    pub fn new(members_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            members_url,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C, timeout: Duration) -> Result<Self> {
        let url = config.members_url().ok_or_else(|| RosterError::MissingConfig {
            field: "source.group_id".to_string(),
        })?;
        Self::new(url, timeout)
    }
}

#[async_trait]
impl MemberSource for GroupMeClient {
    async fn fetch_members(&self) -> Result<Vec<MemberRecord>> {
        // The URL carries the access token, so only the path is logged.
        tracing::debug!(
            "Requesting group members from {}",
            self.members_url.split('?').next().unwrap_or_default()
        );
        let response = self.client.get(&self.members_url).send().await?;
        let status = response.status();
        tracing::debug!("Member API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Member API returned {}: {}", status, body);
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        let envelope: GroupEnvelope = serde_json::from_str(&body)?;
        let members = envelope.response.map(|group| group.members).unwrap_or_default();
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer, path: &str) -> GroupMeClient {
        GroupMeClient::new(server.url(path), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_members_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/groups/109951712")
                .query_param("token", "secret");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "response": {
                        "name": "Key Club",
                        "members": [
                            {"nickname": "Alice", "user_id": "1"},
                            {"nickname": "Bob", "user_id": "2", "muted": false}
                        ]
                    },
                    "meta": {"code": 200}
                }));
        });

        let client = client_for(&server, "/groups/109951712?token=secret");
        let members = client.fetch_members().await.unwrap();

        api_mock.assert();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Alice");
        assert_eq!(members[1].user_id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_fetch_members_non_success_is_empty() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/groups/1");
            then.status(401).body("unauthorized");
        });

        let members = client_for(&server, "/groups/1").fetch_members().await.unwrap();

        api_mock.assert();
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_members_missing_response_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/groups/1");
            then.status(200)
                .json_body(serde_json::json!({"response": null, "meta": {"code": 200}}));
        });

        let members = client_for(&server, "/groups/1").fetch_members().await.unwrap();
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_members_malformed_body_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/groups/1");
            then.status(200).body("not json");
        });

        let result = client_for(&server, "/groups/1").fetch_members().await;
        assert!(matches!(result, Err(RosterError::Serialization(_))));
    }

    #[test]
    fn test_from_config_requires_group() {
        struct NoGroup;

        impl ConfigProvider for NoGroup {
            fn group_name(&self) -> &str {
                "Key Club"
            }

            fn roster_path(&self) -> &str {
                "Key_Club.txt"
            }

            fn goal_hours(&self) -> f64 {
                15.0
            }

            fn members_url(&self) -> Option<String> {
                None
            }
        }

        let result = GroupMeClient::from_config(&NoGroup, Duration::from_secs(1));
        assert!(matches!(result, Err(RosterError::MissingConfig { .. })));
    }
}
