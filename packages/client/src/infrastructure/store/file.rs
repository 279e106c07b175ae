//! JSON ファイルに永続化する `KeyValueStore` 実装
//!
//! ## 責務
//!
//! - キーと値のマップを 1 つの JSON オブジェクトとして保存
//! - `set` / `remove` / `clear` のたびに同期的に書き込む
//!
//! ## 設計ノート
//!
//! ファイルが存在しない、または壊れている場合は空のストアとして扱います。
//! 書き込みは一時ファイルに書いてから rename するため、途中で中断されても
//! 既存のファイルが半端な内容になることはありません。

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::domain::{KeyValueStore, StoreError};

type Entries = BTreeMap<String, String>;

/// File-backed store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Entries {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Entries::new(),
            Err(e) => {
                tracing::warn!("Failed to read store {}: {}", self.path.display(), e);
                return Entries::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(
                "Ignoring unreadable store {}: {}",
                self.path.display(),
                e
            );
            Entries::new()
        })
    }

    fn save(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Entries)) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load();
        f(&mut entries);
        self.save(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })?;
        tracing::debug!("Persisted '{}' to {}", key, self.path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(|entries| entries.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - FileStore の永続化（別インスタンスから読めること）
    // - ファイルが存在しない・壊れている場合の扱い
    //
    // 【なぜこのテストが必要か】
    // - テーマ・クライアント ID・ニックネームはセッションをまたいで保持される必要がある
    // - 値が無いことは「未設定」であり、エラーにしてはいけない
    // ========================================

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("nested").join("preferences.json"))
    }

    #[test]
    fn test_values_survive_new_instance() {
        // テスト項目: 書き込んだ値は別の FileStore インスタンスから読める
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        // when (操作):
        store.set("chatfeed_theme", "dark").unwrap();
        store.set("chatfeed_nickname", "alice").unwrap();

        // then (期待する結果):
        let reopened = store_in(&dir);
        assert_eq!(reopened.get("chatfeed_theme"), Some("dark".to_string()));
        assert_eq!(reopened.get("chatfeed_nickname"), Some("alice".to_string()));
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        // テスト項目: ファイルが存在しない場合は未設定として読める
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        // when (操作):
        let value = store.get("chatfeed_theme");

        // then (期待する結果):
        assert_eq!(value, None);
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_overwritten() {
        // テスト項目: 壊れたファイルは空として扱われ、次の書き込みで上書きされる
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileStore::new(&path);

        // when (操作):
        let before = store.get("chatfeed_theme");
        store.set("chatfeed_theme", "light").unwrap();

        // then (期待する結果):
        assert_eq!(before, None);
        assert_eq!(store.get("chatfeed_theme"), Some("light".to_string()));
    }

    #[test]
    fn test_clear_removes_all_keys() {
        // テスト項目: clear で全てのキーが削除される
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("chatfeed_client_id", "abc").unwrap();
        store.set("chatfeed_nickname", "bob").unwrap();

        // when (操作):
        store.clear().unwrap();

        // then (期待する結果):
        assert_eq!(store.get("chatfeed_client_id"), None);
        assert_eq!(store.get("chatfeed_nickname"), None);
    }
}
