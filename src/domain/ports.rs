use crate::domain::model::{GroupingResult, Profile};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn timeout(&self) -> Option<Duration>;
    fn write_unmatched(&self) -> bool;
}

/// Output of the transform stage: the population is kept so the load stage can report leftovers.
#[derive(Debug, Clone)]
pub struct GroupingOutcome {
    pub population: Vec<Profile>,
    pub result: GroupingResult,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Profile>>;
    async fn transform(&self, population: Vec<Profile>) -> Result<GroupingOutcome>;
    async fn load(&self, outcome: GroupingOutcome) -> Result<String>;
}
