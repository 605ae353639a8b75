use serde::Deserialize;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 与出题方约定的共享密钥
    pub secret: String,
    /// HTTP 服务监听地址
    pub bind_addr: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 浏览器配置 ---
    /// 浏览器可执行文件路径，为空时由 chromiumoxide 自动查找
    pub browser_executable: Option<String>,
    /// 题目内容所在元素
    pub content_selector: String,
    /// 等待内容元素出现的秒数
    pub selector_timeout_secs: u64,
    // --- 答题链配置 ---
    /// 单条答题链最多走多少步
    pub max_chain_length: usize,
    /// 每次外部调用的最大尝试次数（含第一次）
    pub retry_max_attempts: usize,
    /// 重试退避基数（毫秒）
    pub retry_base_delay_ms: u64,
    /// 重试退避上限（毫秒）
    pub retry_max_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret: String::new(),
            bind_addr: "0.0.0.0:5000".to_string(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            browser_executable: None,
            content_selector: "#result".to_string(),
            selector_timeout_secs: 15,
            max_chain_length: 50,
            retry_max_attempts: 3,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 8_000,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → `QUIZ_CONFIG` 指向的 TOML 文件 → 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("QUIZ_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_toml_file(&path)?,
            _ => Self::default(),
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 只从环境变量读取（未设置的项使用默认值）
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.to_string(),
                source,
            })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env_string("SECRET").unwrap_or(self.secret),
            bind_addr: env_string("BIND_ADDR").unwrap_or(self.bind_addr),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
            llm_api_key: env_string("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: env_string("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: env_string("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            browser_executable: env_string("BROWSER_EXECUTABLE").or(self.browser_executable),
            content_selector: env_string("CONTENT_SELECTOR").unwrap_or(self.content_selector),
            selector_timeout_secs: env_parse("SELECTOR_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.selector_timeout_secs),
            max_chain_length: env_parse("MAX_CHAIN_LENGTH", "usize")?
                .unwrap_or(self.max_chain_length),
            retry_max_attempts: env_parse("RETRY_MAX_ATTEMPTS", "usize")?
                .unwrap_or(self.retry_max_attempts),
            retry_base_delay_ms: env_parse("RETRY_BASE_DELAY_MS", "u64")?
                .unwrap_or(self.retry_base_delay_ms),
            retry_max_delay_ms: env_parse("RETRY_MAX_DELAY_MS", "u64")?
                .unwrap_or(self.retry_max_delay_ms),
        })
    }

    /// 校验必填项和取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "secret".to_string(),
                reason: "不能为空".to_string(),
            });
        }
        if self.max_chain_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_chain_length".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry_max_attempts".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}

fn env_string(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match env_string(var_name) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
