//! In-memory object store mock for server tests.
//!
//! The filesystem backend cannot presign, so tests that exercise the
//! upload mediator use this mock, which returns a canned signed URL.

use amen_storage::{ObjectMeta, ObjectStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct MemoryBackend {
    objects: Mutex<HashMap<String, (Bytes, Option<String>)>>,
    /// When set, every call fails with an opaque transport error.
    pub fail_all: std::sync::atomic::AtomicBool,
}

#[allow(dead_code)]
impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            fail_all: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn check_failure(&self) -> StorageResult<()> {
        if self.fail_all.load(std::sync::atomic::Ordering::Relaxed) {
            return Err(StorageError::S3("injected transport failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.check_failure()?;
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn head(&self, key: &str) -> StorageResult<ObjectMeta> {
        self.check_failure()?;
        let objects = self.objects.lock().unwrap();
        let (data, content_type) = objects
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(ObjectMeta {
            size: data.len() as u64,
            last_modified: None,
            content_type: content_type.clone(),
        })
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.check_failure()?;
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> StorageResult<()> {
        self.check_failure()?;
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, content_type.map(String::from)));
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.check_failure()?;
        self.objects
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn presign_put(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        self.check_failure()?;
        Ok(format!(
            "https://signed.test.invalid/{key}?X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
