//! 用户内存存储实现
//!
//! email 唯一性在写锁内检查，注册并发时不会产生重复身份。

use crate::error::StorageError;
use crate::models::{NewUser, UserRecord};
use crate::traits::UserStore;
use std::collections::HashMap;
use std::sync::RwLock;

struct UserTable {
    next_id: i64,
    users: HashMap<i64, UserRecord>,
}

/// 用户内存存储
pub struct InMemoryUserStore {
    inner: RwLock<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(UserTable {
                next_id: 1,
                users: HashMap::new(),
            }),
        }
    }

    /// 当前用户数（测试用）。
    pub fn len(&self) -> usize {
        self.inner.read().map(|table| table.users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StorageError {
    StorageError::new("user store lock poisoned")
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let table = self.inner.read().map_err(|_| poisoned())?;
        Ok(table
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserRecord>, StorageError> {
        let table = self.inner.read().map_err(|_| poisoned())?;
        Ok(table.users.get(&user_id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StorageError> {
        let mut table = self.inner.write().map_err(|_| poisoned())?;
        if table.users.values().any(|existing| existing.email == user.email) {
            return Err(StorageError::conflict("email already registered"));
        }
        let user_id = table.next_id;
        table.next_id += 1;
        let record = UserRecord {
            user_id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            school_id: user.school_id,
        };
        table.users.insert(user_id, record.clone());
        Ok(record)
    }

    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let mut table = self.inner.write().map_err(|_| poisoned())?;
        match table.users.get_mut(&user_id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
