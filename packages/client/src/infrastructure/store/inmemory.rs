//! In-memory `KeyValueStore`.

use std::{collections::HashMap, sync::Mutex};

use crate::domain::{KeyValueStore, StoreError};

/// Substitute store living for the lifetime of the value
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // 書き込み途中で panic しても map 自体は壊れないので poison を無視する
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.entries().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key_is_none() {
        // テスト項目: 存在しないキーは None（未設定）として読める
        // given (前提条件):
        let store = InMemoryStore::new();

        // when (操作):
        let value = store.get("missing");

        // then (期待する結果):
        assert_eq!(value, None);
    }

    #[test]
    fn test_set_remove_clear() {
        // テスト項目: 書き込み・削除・全削除がそれぞれ独立に動作する
        // given (前提条件):
        let store = InMemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        // when (操作):
        store.remove("a").unwrap();

        // then (期待する結果):
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), Some("2".to_string()));
        store.clear().unwrap();
        assert_eq!(store.get("b"), None);
    }
}
