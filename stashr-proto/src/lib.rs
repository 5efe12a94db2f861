//! Stashr gRPC Protocol Definitions
//!
//! Generated code for the `kvstore.KVStore` service: request/response
//! messages, the server trait, the client, and the encoded descriptor set used
//! for server reflection.

/// Generated protobuf/gRPC code
pub mod kvstore {
    tonic::include_proto!("kvstore");
}

pub use kvstore::*;

/// Server side of `kvstore.KVStore` (`KVStore` trait, `KVStoreServer`)
pub use kvstore::kv_store_server as kv_store_server;

/// Client side of `kvstore.KVStore` (`KVStoreClient`)
pub use kvstore::kv_store_client as kv_store_client;

/// Encoded `FileDescriptorSet` for `kvstore.proto`
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("kvstore_descriptor");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_matches_wire_name() {
        assert_eq!(kv_store_server::SERVICE_NAME, "kvstore.KVStore");
    }

    #[test]
    fn test_descriptor_set_describes_service() {
        assert!(!FILE_DESCRIPTOR_SET.is_empty());
        let needle = b"KVStore";
        assert!(FILE_DESCRIPTOR_SET
            .windows(needle.len())
            .any(|window| window == needle));
    }
}
