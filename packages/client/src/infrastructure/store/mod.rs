//! `KeyValueStore` の実装
//!
//! - `inmemory`: テストや一時セッション用のインメモリ実装
//! - `file`: JSON ファイルに永続化する実装

pub mod file;
pub mod inmemory;

pub use file::FileStore;
pub use inmemory::InMemoryStore;
