//! UseCase: クライアント ID の生成と永続化

use std::sync::Arc;

use crate::{
    domain::{ClientId, ClientIdGenerator, ClientSession, KeyValueStore},
    infrastructure::{CompositeGenerator, UuidGenerator},
};

use super::PreferenceStore;

pub const CLIENT_ID_KEY: &str = "chatfeed_client_id";

/// Stable per-store identifier used to attribute submitted messages
pub struct ClientIdentity {
    store: Arc<dyn KeyValueStore>,
    preferred: Arc<dyn ClientIdGenerator>,
    fallback: CompositeGenerator,
}

impl ClientIdentity {
    /// `preferred` is tried first; the time+random generator covers it when
    /// it yields nothing.
    pub fn new(store: Arc<dyn KeyValueStore>, preferred: Arc<dyn ClientIdGenerator>) -> Self {
        Self::with_fallback(store, preferred, CompositeGenerator::default())
    }

    pub fn with_fallback(
        store: Arc<dyn KeyValueStore>,
        preferred: Arc<dyn ClientIdGenerator>,
        fallback: CompositeGenerator,
    ) -> Self {
        Self {
            store,
            preferred,
            fallback,
        }
    }

    /// Identity backed by random UUIDs
    pub fn with_preferred_generator(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, Arc::new(UuidGenerator))
    }

    /// Return the persisted ID, generating and persisting one on first use.
    ///
    /// Never fails: if the store cannot be written the generated ID is still
    /// returned for this session.
    pub fn get_or_create_client_id(&self) -> ClientId {
        if let Some(existing) = self.store.get(CLIENT_ID_KEY)
            && let Ok(client_id) = ClientId::new(existing)
        {
            return client_id;
        }

        let client_id = self.preferred.try_generate().unwrap_or_else(|| {
            tracing::warn!("Preferred ID generator unavailable, using fallback");
            self.fallback.generate()
        });
        match self.store.set(CLIENT_ID_KEY, client_id.as_str()) {
            Ok(()) => tracing::info!("Generated client ID '{}'", client_id.as_str()),
            Err(e) => tracing::warn!(
                "Failed to persist client ID '{}': {}",
                client_id.as_str(),
                e
            ),
        }
        client_id
    }

    /// Current identity plus nickname
    pub fn session(&self, preferences: &PreferenceStore) -> ClientSession {
        ClientSession {
            client_id: self.get_or_create_client_id(),
            nickname: preferences.get_nickname(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::StoreError, infrastructure::InMemoryStore};
    use chatfeed_shared::time::FixedClock;

    struct ReadOnlyStore;

    /// 乱数源が使えない環境を模した生成器
    struct UnavailableGenerator;

    impl ClientIdGenerator for UnavailableGenerator {
        fn try_generate(&self) -> Option<ClientId> {
            None
        }
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("read-only")))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn clear(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn test_client_id_is_stable_within_store() {
        // テスト項目: 同じストアでは 2 回続けて呼んでも同じ ID が返る
        // given (前提条件):
        let store = Arc::new(InMemoryStore::new());
        let identity = ClientIdentity::with_preferred_generator(store.clone());

        // when (操作):
        let first = identity.get_or_create_client_id();
        let second = identity.get_or_create_client_id();

        // then (期待する結果):
        assert_eq!(first, second);
        assert_eq!(store.get(CLIENT_ID_KEY), Some(first.as_str().to_string()));
    }

    #[test]
    fn test_client_id_changes_after_store_cleared() {
        // テスト項目: ストアを消去した後は新しい ID が生成される
        // given (前提条件):
        let store = Arc::new(InMemoryStore::new());
        let identity = ClientIdentity::with_preferred_generator(store.clone());
        let first = identity.get_or_create_client_id();

        // when (操作):
        store.clear().unwrap();
        let second = identity.get_or_create_client_id();

        // then (期待する結果):
        assert_ne!(first, second);
    }

    #[test]
    fn test_blank_persisted_id_is_replaced() {
        // テスト項目: 空の ID が保存されている場合は未設定として扱い、新しく生成する
        // given (前提条件):
        let store = Arc::new(InMemoryStore::new());
        store.set(CLIENT_ID_KEY, "").unwrap();
        let identity = ClientIdentity::new(store.clone(), Arc::new(CompositeGenerator::default()));

        // when (操作):
        let client_id = identity.get_or_create_client_id();

        // then (期待する結果):
        assert!(client_id.as_str().starts_with("client-"));
    }

    #[test]
    fn test_unwritable_store_still_yields_id() {
        // テスト項目: ストアに書き込めなくても ID の取得は失敗しない
        // given (前提条件):
        let identity = ClientIdentity::with_preferred_generator(Arc::new(ReadOnlyStore));

        // when (操作):
        let client_id = identity.get_or_create_client_id();

        // then (期待する結果):
        assert!(!client_id.as_str().is_empty());
    }

    #[test]
    fn test_fallback_generator_used_when_preferred_unavailable() {
        // テスト項目: 優先生成器が使えない場合は時刻+乱数のフォールバック ID が生成・保存される
        // given (前提条件):
        let store = Arc::new(InMemoryStore::new());
        let identity = ClientIdentity::with_fallback(
            store.clone(),
            Arc::new(UnavailableGenerator),
            CompositeGenerator::new(Arc::new(FixedClock::new(1_700_000_000_000))),
        );

        // when (操作):
        let client_id = identity.get_or_create_client_id();

        // then (期待する結果):
        let suffix = client_id
            .as_str()
            .strip_prefix("client-1700000000000-")
            .unwrap();
        assert!(!suffix.is_empty());
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(store.get(CLIENT_ID_KEY), Some(client_id.as_str().to_string()));
        // 2 回目は保存済みの ID がそのまま返る
        assert_eq!(identity.get_or_create_client_id(), client_id);
    }
}
