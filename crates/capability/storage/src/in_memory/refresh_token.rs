//! refresh token 台账内存存储实现

use crate::error::StorageError;
use crate::models::RefreshTokenRecord;
use crate::traits::RefreshTokenStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// refresh token 台账内存存储，以 token 字符串为键。
pub struct InMemoryRefreshTokenStore {
    tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// 当前台账条数（测试用）。
    pub fn len(&self) -> usize {
        self.tokens.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryRefreshTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StorageError {
    StorageError::new("refresh token store lock poisoned")
}

#[async_trait::async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn insert_refresh_token(&self, record: RefreshTokenRecord) -> Result<(), StorageError> {
        let mut map = self.tokens.write().map_err(|_| poisoned())?;
        if map.contains_key(&record.token) {
            return Err(StorageError::conflict("refresh token already recorded"));
        }
        map.insert(record.token.clone(), record);
        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError> {
        let map = self.tokens.read().map_err(|_| poisoned())?;
        Ok(map.get(token).cloned())
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool, StorageError> {
        let mut map = self.tokens.write().map_err(|_| poisoned())?;
        Ok(map.remove(token).is_some())
    }

    async fn take_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError> {
        let mut map = self.tokens.write().map_err(|_| poisoned())?;
        Ok(map.remove(token))
    }

    async fn delete_refresh_tokens_for_user(&self, user_id: i64) -> Result<u64, StorageError> {
        let mut map = self.tokens.write().map_err(|_| poisoned())?;
        let before = map.len();
        map.retain(|_, record| record.user_id != user_id);
        Ok((before - map.len()) as u64)
    }
}
