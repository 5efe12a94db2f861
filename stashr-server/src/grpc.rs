use stashr_core::Store;
use stashr_proto::kv_store_server::KvStore as KVStore;
use stashr_proto::{
    DeleteRequest, DeleteResponse, GetRequest, GetResponse, ListRequest, ListResponse, SetRequest,
    SetResponse,
};
use tonic::{Request, Response, Status};

use crate::validation::{truncate_key_for_log, ttl_from_seconds, validate_key, validate_value};

/// The gRPC service implementation
pub struct KvStoreService {
    store: Store,
}

impl KvStoreService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[tonic::async_trait]
impl KVStore for KvStoreService {
    async fn get(&self, request: Request<GetRequest>) -> Result<Response<GetResponse>, Status> {
        let key = &request.get_ref().key;
        validate_key(key)?;
        tracing::debug!("GET {}", truncate_key_for_log(key));

        let response = match self.store.get(key) {
            Some(value) => GetResponse { value, found: true },
            None => GetResponse {
                value: String::new(),
                found: false,
            },
        };
        Ok(Response::new(response))
    }

    async fn set(&self, request: Request<SetRequest>) -> Result<Response<SetResponse>, Status> {
        let req = request.into_inner();
        validate_key(&req.key)?;
        validate_value(&req.value)?;

        let ttl_display = if req.ttl_seconds > 0 {
            format!("{}s", req.ttl_seconds)
        } else {
            "never".to_string()
        };
        tracing::debug!("SET {} (ttl: {})", truncate_key_for_log(&req.key), ttl_display);

        self.store.set(req.key, req.value, ttl_from_seconds(req.ttl_seconds));
        Ok(Response::new(SetResponse {}))
    }

    async fn delete(
        &self,
        request: Request<DeleteRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let key = &request.get_ref().key;
        validate_key(key)?;
        tracing::debug!("DELETE {}", truncate_key_for_log(key));

        let deleted = self.store.delete(key);
        Ok(Response::new(DeleteResponse { deleted }))
    }

    async fn list(&self, _request: Request<ListRequest>) -> Result<Response<ListResponse>, Status> {
        tracing::debug!("LIST");

        let mut keys = self.store.list();
        keys.sort_unstable();
        Ok(Response::new(ListResponse { keys }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{MAX_KEY_LENGTH, MAX_VALUE_LENGTH};
    use stashr_core::StoreConfig;
    use std::time::Duration;

    /// Creates a test store whose sweeper stays out of the way.
    ///
    /// Must be called from within a `#[tokio::test]` context.
    fn create_test_store() -> Store {
        let config = StoreConfig::default().with_sweep_interval(Duration::from_secs(3600));
        Store::with_config(config)
    }

    fn set_request(key: &str, value: &str, ttl_seconds: i64) -> Request<SetRequest> {
        Request::new(SetRequest {
            key: key.to_string(),
            value: value.to_string(),
            ttl_seconds,
        })
    }

    #[tokio::test]
    async fn test_get_missing_key_is_not_an_error() {
        let service = KvStoreService::new(create_test_store());

        let response = service
            .get(Request::new(GetRequest { key: "missing".to_string() }))
            .await
            .unwrap()
            .into_inner();

        assert!(!response.found);
        assert_eq!(response.value, "");
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let service = KvStoreService::new(create_test_store());

        service.set(set_request("k", "v", 0)).await.unwrap();

        let response = service
            .get(Request::new(GetRequest { key: "k".to_string() }))
            .await
            .unwrap()
            .into_inner();

        assert!(response.found);
        assert_eq!(response.value, "v");
    }

    #[tokio::test]
    async fn test_set_with_ttl_expires() {
        let store = create_test_store();
        let service = KvStoreService::new(store.clone());

        service.set(set_request("temp", "v", 1)).await.unwrap();
        assert_eq!(store.get("temp"), Some("v".to_string()));

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let response = service
            .get(Request::new(GetRequest { key: "temp".to_string() }))
            .await
            .unwrap()
            .into_inner();
        assert!(!response.found);
    }

    #[tokio::test]
    async fn test_negative_ttl_never_expires() {
        let store = create_test_store();
        let service = KvStoreService::new(store.clone());

        service.set(set_request("k", "v", -1)).await.unwrap();

        assert_eq!(store.get("k"), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = create_test_store();
        store.set("k", "v", None);
        let service = KvStoreService::new(store);

        let first = service
            .delete(Request::new(DeleteRequest { key: "k".to_string() }))
            .await
            .unwrap()
            .into_inner();
        let second = service
            .delete(Request::new(DeleteRequest { key: "k".to_string() }))
            .await
            .unwrap()
            .into_inner();

        assert!(first.deleted);
        assert!(!second.deleted);
    }

    #[tokio::test]
    async fn test_list_sorted() {
        let store = create_test_store();
        store.set("b", "2", None);
        store.set("a", "1", None);
        store.set("c", "3", Some(Duration::from_secs(60)));
        let service = KvStoreService::new(store);

        let response = service
            .list(Request::new(ListRequest {}))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let service = KvStoreService::new(create_test_store());

        let status = service
            .get(Request::new(GetRequest { key: String::new() }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("empty"));
    }

    #[tokio::test]
    async fn test_key_too_long_rejected() {
        let service = KvStoreService::new(create_test_store());

        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        let status = service
            .delete(Request::new(DeleteRequest { key: long_key }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains(&MAX_KEY_LENGTH.to_string()));
    }

    #[tokio::test]
    async fn test_value_too_long_rejected() {
        let store = create_test_store();
        let service = KvStoreService::new(store.clone());

        let long_value = "x".repeat(MAX_VALUE_LENGTH + 1);
        let status = service
            .set(set_request("k", &long_value, 0))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(store.is_empty());
    }
}
