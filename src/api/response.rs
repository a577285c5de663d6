// Copyright (c) 2025 - Cowboy AI, Inc.
//! Response envelopes
//!
//! Every response is wrapped in an object keyed by the operation's tag from
//! [`ResponseTags`]:
//!
//! ```json
//! { "listdiskofferingsresponse": { "count": 1, "diskoffering": [ { "id": 3, ... } ] } }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::ResponseTags;
use crate::domain::{DiskOffering, DomainId, OfferingId};

/// Wire form of a disk offering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskOfferingResponse {
    pub id: OfferingId,
    pub name: String,
    pub displaytext: String,
    pub disksize: u64,
    pub iscustomized: bool,
    pub ispublic: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domainid: Option<DomainId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub miniops: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxiops: Option<u64>,

    pub created: DateTime<Utc>,
}

impl DiskOfferingResponse {
    pub fn from_offering(offering: &DiskOffering, owner_name: Option<&str>) -> Self {
        Self {
            id: offering.id,
            name: offering.name.clone(),
            displaytext: offering.display_text.clone(),
            disksize: offering.disk_size_gb,
            iscustomized: offering.customized,
            ispublic: offering.is_public,
            domainid: offering.owner_domain_id,
            domain: owner_name.map(str::to_string),
            miniops: offering.min_iops,
            maxiops: offering.max_iops,
            created: offering.created_at,
        }
    }
}

/// Tagged list envelope
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse<T> {
    pub response_name: String,
    /// Item array key inside the envelope, e.g. `diskoffering`
    pub item_key: &'static str,
    /// Matches before paging
    pub count: usize,
    pub items: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(
        tags: &ResponseTags,
        operation: &str,
        item_key: &'static str,
        count: usize,
        items: Vec<T>,
    ) -> Self {
        Self {
            response_name: tags.tag_for(operation),
            item_key,
            count,
            items,
        }
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        let mut body = serde_json::Map::new();
        body.insert("count".to_string(), json!(self.count));
        if !self.items.is_empty() {
            body.insert(self.item_key.to_string(), serde_json::to_value(&self.items)?);
        }

        let mut envelope = serde_json::Map::new();
        envelope.insert(self.response_name.clone(), Value::Object(body));
        Ok(Value::Object(envelope))
    }
}

/// Job reference returned by asynchronous variants of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsyncJobResponse {
    pub response_name: String,
    pub job_id: Uuid,
}

impl AsyncJobResponse {
    pub fn new(tags: &ResponseTags, operation: &str, job_id: Uuid) -> Self {
        Self {
            response_name: tags.tag_for(operation),
            job_id,
        }
    }

    /// Reference to a freshly submitted job
    pub fn submitted(tags: &ResponseTags, operation: &str) -> Self {
        Self::new(tags, operation, Uuid::now_v7())
    }

    pub fn to_json(&self) -> Value {
        let mut envelope = serde_json::Map::new();
        envelope.insert(self.response_name.clone(), json!({ "jobid": self.job_id }));
        Value::Object(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::operations;
    use crate::domain::NewDiskOffering;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_envelope_shape() {
        let offering = NewDiskOffering::builder("small")
            .disk_size_gb(5)
            .owner(DomainId(2))
            .build()
            .into_offering(OfferingId(3));
        let items = vec![DiskOfferingResponse::from_offering(&offering, Some("eng"))];
        let response = ListResponse::new(
            &ResponseTags::default(),
            operations::LIST_DISK_OFFERINGS,
            "diskoffering",
            1,
            items,
        );

        let json = response.to_json().unwrap();
        let body = &json["listdiskofferingsresponse"];
        assert_eq!(body["count"], 1);
        assert_eq!(body["diskoffering"][0]["id"], 3);
        assert_eq!(body["diskoffering"][0]["domain"], "eng");
        assert_eq!(body["diskoffering"][0]["disksize"], 5);
        assert!(body["diskoffering"][0].get("miniops").is_none());
    }

    #[test]
    fn test_empty_list_has_only_count() {
        let response: ListResponse<DiskOfferingResponse> = ListResponse::new(
            &ResponseTags::default(),
            operations::LIST_DISK_OFFERINGS,
            "diskoffering",
            0,
            Vec::new(),
        );
        assert_eq!(
            response.to_json().unwrap(),
            json!({ "listdiskofferingsresponse": { "count": 0 } })
        );
    }

    #[test]
    fn test_async_job_envelope() {
        let job_id = Uuid::parse_str("01934f4a-0001-7000-8000-000000000001").unwrap();
        let response = AsyncJobResponse::new(&ResponseTags::default(), operations::QUERY_ASYNC_JOB, job_id);
        assert_eq!(
            response.to_json(),
            json!({ "queryasyncjobresultresponse": { "jobid": "01934f4a-0001-7000-8000-000000000001" } })
        );
    }
}
