//! Externally fetched records and the collaborator that supplies them.

use crate::errors::FetchError;
use async_trait::async_trait;
use blockpress_blocks::RecordQuery;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Parent id of top-level records
pub const ROOT_PARENT: u64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(default)]
    pub parent: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub count: u64,
}

impl Record {
    pub fn new(id: u64, parent: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            parent,
            name: name.into(),
            link: String::new(),
            count: 0,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }
}

/// Data-fetch collaborator.
///
/// Implementations should stop work once `cancel` fires; callers never act
/// on a result that arrives after cancellation either way.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(
        &self,
        query: &RecordQuery,
        cancel: CancellationToken,
    ) -> Result<Vec<Record>, FetchError>;
}

/// Serves a fixed record set for any query
#[derive(Debug, Clone, Default)]
pub struct StaticRecords {
    records: Vec<Record>,
}

impl StaticRecords {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl RecordSource for StaticRecords {
    async fn fetch(
        &self,
        _query: &RecordQuery,
        cancel: CancellationToken,
    ) -> Result<Vec<Record>, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults() {
        let records: Vec<Record> =
            serde_json::from_str(r#"[{"id": 3, "name": "News"}]"#).unwrap();
        assert_eq!(records, vec![Record::new(3, ROOT_PARENT, "News")]);
    }

    #[tokio::test]
    async fn test_static_records_respect_cancellation() {
        let source = StaticRecords::new(vec![Record::new(1, 0, "A")]);
        let query = RecordQuery::new("categories");

        let token = CancellationToken::new();
        assert_eq!(source.fetch(&query, token.clone()).await.unwrap().len(), 1);

        token.cancel();
        assert_eq!(
            source.fetch(&query, token).await,
            Err(FetchError::Cancelled)
        );
    }
}
