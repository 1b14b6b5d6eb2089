//! 日志基础设施

use anyhow::Result;
use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 初始化日志系统
    ///
    /// - 控制台输出始终开启
    /// - `file_output` 为 true 时额外写入按日期分割的日志文件
    /// - `RUST_LOG` 存在时覆盖配置中的日志级别
    ///
    /// 返回的 guard 必须在进程生命周期内保持存活，否则文件日志会丢失。
    pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))?;

        let (file_layer, guard) = if config.file_output {
            std::fs::create_dir_all(&config.log_dir)?;

            let file_appender = rolling::daily(&config.log_dir, &config.file_prefix);
            let (writer, guard) = non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false) // 文件中不使用颜色
                .with_target(false)
                .with_thread_names(true);
            (Some(layer), Some(guard))
        } else {
            (None, None)
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().with_writer(io::stdout).with_ansi(true))
            .try_init()?;

        Ok(guard)
    }
}
