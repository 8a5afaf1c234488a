//! 容器配置加载
//!
//! 配置文件（可选）之上叠加 `BINDERY_` 前缀的环境变量，例如
//! `BINDERY_MAX_RESOLUTION_DEPTH=200`。

use bindery_common::{ConfigError, ConfigResult};
use di_abstractions::ContainerConfig;
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "BINDERY";

/// 加载容器配置
///
/// `path` 为 `None` 时只读取环境变量；给定的文件不存在时返回
/// [`ConfigError::FileNotFound`]。
pub fn load_container_config(path: Option<&Path>) -> ConfigResult<ContainerConfig> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        debug!("加载容器配置文件: {}", path.display());
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| {
            error!("配置构建失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

    let config: ContainerConfig = settings.try_deserialize().map_err(|e| {
        error!("容器配置绑定失败: {}", e);
        ConfigError::ParseError {
            source: Box::new(e),
        }
    })?;

    config.validate()?;
    debug!("容器配置加载成功: {:?}", config);
    Ok(config)
}
