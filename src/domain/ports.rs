use crate::domain::model::MemberRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn group_name(&self) -> &str;
    fn roster_path(&self) -> &str;
    fn goal_hours(&self) -> f64;
    /// Fully-qualified members endpoint, `None` when no group is configured.
    fn members_url(&self) -> Option<String>;
}

/// Source of remote group members.
#[async_trait]
pub trait MemberSource: Send + Sync {
    /// One request, one response. Non-success responses yield an empty list.
    async fn fetch_members(&self) -> Result<Vec<MemberRecord>>;
}
