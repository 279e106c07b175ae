//! UseCase: テーマとニックネームの永続化
//!
//! ### どのような状況を想定しているか
//! - 保存済みの値がある場合はそれを使う
//! - 保存済みのテーマが無い場合は OS の配色設定、それも無ければライト
//! - 値が無いことはエラーではない（ニックネームは空文字）

use std::sync::Arc;

use crate::domain::{ColorSchemeProbe, KeyValueStore, StoreError, Theme, ThemeIndicator};

pub const THEME_KEY: &str = "chatfeed_theme";
pub const NICKNAME_KEY: &str = "chatfeed_nickname";

/// Persisted display theme and nickname
pub struct PreferenceStore {
    /// 永続ストア（ClientIdentity と共有される）
    store: Arc<dyn KeyValueStore>,
    /// OS の配色設定
    color_scheme: Arc<dyn ColorSchemeProbe>,
    /// テーマ表示（トグルのラベルなど）
    indicator: Arc<dyn ThemeIndicator>,
}

impl PreferenceStore {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        color_scheme: Arc<dyn ColorSchemeProbe>,
        indicator: Arc<dyn ThemeIndicator>,
    ) -> Self {
        Self {
            store,
            color_scheme,
            indicator,
        }
    }

    /// Persisted theme, else the OS preference, else light
    pub fn get_theme(&self) -> Theme {
        if let Some(raw) = self.store.get(THEME_KEY) {
            match raw.parse::<Theme>() {
                Ok(theme) => return theme,
                Err(e) => tracing::debug!("{}, falling back to color scheme", e),
            }
        }

        if self.color_scheme.prefers_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Persist `theme` and show it.
    ///
    /// The indicator is updated even when the write fails.
    pub fn set_theme(&self, theme: Theme) -> Result<(), StoreError> {
        let result = self.store.set(THEME_KEY, theme.as_str());
        self.indicator.show_theme(theme);
        result
    }

    /// Switch to the other theme and return it
    pub fn toggle_theme(&self) -> Result<Theme, StoreError> {
        let next = self.get_theme().toggle();
        self.set_theme(next)?;
        Ok(next)
    }

    /// Show the resolved theme once at startup without persisting it
    pub fn apply_initial_theme(&self) -> Theme {
        let theme = self.get_theme();
        self.indicator.show_theme(theme);
        theme
    }

    pub fn get_nickname(&self) -> String {
        self.store.get(NICKNAME_KEY).unwrap_or_default()
    }

    /// Persist the trimmed nickname
    pub fn set_nickname(&self, nickname: &str) -> Result<(), StoreError> {
        self.store.set(NICKNAME_KEY, nickname.trim())
    }
}
