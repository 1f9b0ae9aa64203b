use crate::domain::model::{Balances, Category, NoticePolicy, Product};
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 樣板 webhook URL；視同未配置。
pub const PLACEHOLDER_WEBHOOK_URL: &str = "https://example.com/hooks/xxx";

pub const DEFAULT_SENDER_NAME: &str = "OmniQ";
pub const DEFAULT_ICON_URL: &str =
    "https://raw.githubusercontent.com/mattermost/mattermost/master/branding/icons/icon_36x36.png";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub notifications: NoticePolicy,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// 初始餘額;缺漏欄位預設為 0。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSection {
    #[serde(default)]
    pub frontend_balance: u32,
    #[serde(default)]
    pub backend_balance: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: Option<String>,
    pub username: Option<String>,
    pub icon_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl WebhookConfig {
    /// A missing URL and the documented placeholder both count as
    /// unconfigured.
    pub fn is_configured(&self) -> bool {
        match self.url.as_deref() {
            None | Some("") => false,
            Some(url) => url != PLACEHOLDER_WEBHOOK_URL,
        }
    }

    pub fn sender_name(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_SENDER_NAME)
    }

    pub fn icon_url(&self) -> &str {
        self.icon_url.as_deref().unwrap_or(DEFAULT_ICON_URL)
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CartError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WEBHOOK_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn initial_balances(&self) -> Balances {
        Balances::new(self.app.frontend_balance, self.app.backend_balance)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        // webhook URL 若有設定必須是 http(s)
        if let Some(url) = self.webhook.url.as_deref() {
            if !url.is_empty() && url != PLACEHOLDER_WEBHOOK_URL {
                validate_url("webhook.url", url)?;
            }
        }

        let category_ids: HashSet<_> = self.categories.iter().map(|c| c.id.clone()).collect();
        if category_ids.len() != self.categories.len() {
            return Err(CartError::ConfigError {
                message: "Duplicate category ids in [[categories]]".to_string(),
            });
        }

        let mut product_ids = HashSet::new();
        for product in &self.products {
            validate_non_empty_string("products.name", &product.name)?;

            if !product_ids.insert(product.id) {
                return Err(CartError::InvalidConfigValueError {
                    field: "products.id".to_string(),
                    value: product.id.to_string(),
                    reason: "Duplicate product id".to_string(),
                });
            }

            // 每個產品必須屬於已宣告的分類
            if !category_ids.contains(&product.category) {
                return Err(CartError::InvalidConfigValueError {
                    field: "products.category".to_string(),
                    value: product.category.to_string(),
                    reason: format!(
                        "Product '{}' references an undeclared category",
                        product.name
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
