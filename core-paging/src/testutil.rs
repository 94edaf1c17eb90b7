//! Shared fixtures for the unit tests in this crate.

use crate::repo::CatalogRepository;
use async_trait::async_trait;
use core_types::{
    CatalogEntity, CatalogError, CatalogResult, EntityType, Envelope, Filter, Sort, StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestEntity {
    pub id: i64,
    pub name: String,
}

impl CatalogEntity for TestEntity {
    const ENTITY_TYPE: EntityType = EntityType::Character;

    fn id(&self) -> i64 {
        self.id
    }
}

pub fn entity(id: i64) -> TestEntity {
    TestEntity {
        id,
        name: format!("entity-{id}"),
    }
}

pub fn envelope(
    offset: u32,
    limit: u32,
    page_results: u32,
    total_results: u32,
    ids: &[i64],
) -> CatalogResult<Envelope<TestEntity>> {
    Ok(Envelope {
        status_code: StatusCode::Ok,
        error: "OK".to_string(),
        limit,
        offset,
        number_of_page_results: page_results,
        number_of_total_results: total_results,
        results: ids.iter().copied().map(entity).collect(),
    })
}

pub fn service_envelope(
    status_code: StatusCode,
    error: &str,
) -> CatalogResult<Envelope<TestEntity>> {
    Ok(Envelope {
        status_code,
        error: error.to_string(),
        limit: 0,
        offset: 0,
        number_of_page_results: 0,
        number_of_total_results: 0,
        results: vec![],
    })
}

/// Scripted remote catalog: responses are queued with `push_ok`/`push_err`
/// and served newest-pushed-first, recording every request.
pub struct FakeRepo {
    responses: Mutex<Vec<CatalogResult<Envelope<TestEntity>>>>,
    requests: Mutex<Vec<(u32, u32)>>,
    filters: Mutex<Vec<Vec<Filter>>>,
    delay_ms: Mutex<u64>,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            filters: Mutex::new(Vec::new()),
            delay_ms: Mutex::new(0),
        }
    }

    pub fn push_ok(&self, response: CatalogResult<Envelope<TestEntity>>) {
        self.responses.lock().unwrap().push(response);
    }

    pub fn push_err(&self, error: CatalogError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    pub fn set_delay_ms(&self, ms: u64) {
        *self.delay_ms.lock().unwrap() = ms;
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<(u32, u32)> {
        self.requests.lock().unwrap().last().copied()
    }

    pub fn requests(&self) -> Vec<(u32, u32)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_filters(&self) -> Option<Vec<Filter>> {
        self.filters.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CatalogRepository<TestEntity> for FakeRepo {
    async fn get_items(
        &self,
        offset: u32,
        limit: u32,
        _sort: Option<&Sort>,
        filters: &[Filter],
    ) -> CatalogResult<Envelope<TestEntity>> {
        self.requests.lock().unwrap().push((offset, limit));
        self.filters.lock().unwrap().push(filters.to_vec());
        let delay = *self.delay_ms.lock().unwrap();
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(CatalogError::NetworkError("no scripted response".to_string())))
    }
}
