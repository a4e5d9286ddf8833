// src/logging/runtime_logger.rs

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration as StdDuration, SystemTime};
use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Duration};
use tracing_appender::rolling;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::MakeWriter;

const LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// 单条日志消息
pub struct LogEntry {
    pub level: String,
    pub content: String,
}

/// 运行日志管理器（RuntimeLogger）
/// 将运行时日志按日志级别分流到不同的日志文件中。
pub struct RuntimeLogger {
    sender: Mutex<Option<Sender<LogEntry>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
    cleaner: JoinHandle<()>,
}

impl RuntimeLogger {
    /// 创建一个新的 RuntimeLogger
    ///
    /// - `log_dir`: 日志文件存放目录
    /// - `file_prefix`: 文件前缀，例如 "runtime"（最终文件名形如 runtime_info.json 等）
    /// - `buffer_size`: mpsc 通道缓冲区大小
    /// - `batch_size`: 每个日志级别批量写入的日志条数
    /// - `flush_interval`: 定时刷新日志的时间间隔（毫秒）
    /// - `retention_hours`: 超过该时长未修改的日志文件会被清理
    pub fn new(
        log_dir: &str,
        file_prefix: &str,
        buffer_size: usize,
        batch_size: usize,
        flush_interval: u64,
        retention_hours: u64,
    ) -> Arc<Self> {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let mut log_files = HashMap::new();
        for level in LEVELS {
            let file_name = format!("{}_{}.json", file_prefix, level.to_lowercase());
            let appender = rolling::hourly(log_dir, &file_name);
            log_files.insert(level.to_string(), Arc::new(appender));
        }
        let writer = tokio::spawn(Self::background_log_writer(
            log_files,
            receiver,
            batch_size,
            flush_interval,
        ));
        // 后台定期清理过期日志文件，每小时扫描一次
        let cleaner = {
            let log_dir = log_dir.to_string();
            tokio::spawn(async move {
                let cleanup_interval = Duration::from_secs(3600);
                loop {
                    Self::cleanup_old_logs(&log_dir, retention_hours).await;
                    time::sleep(cleanup_interval).await;
                }
            })
        };
        Arc::new(Self {
            sender: Mutex::new(Some(sender)),
            writer: Mutex::new(Some(writer)),
            cleaner,
        })
    }

    /// 记录运行日志，未知级别归入 INFO
    pub async fn log(&self, level: &str, message: &str) {
        let level = normalize_level(level);
        let content = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": level,
            "message": message,
        })
        .to_string();
        self.send(LogEntry {
            level: level.to_string(),
            content,
        })
        .await;
    }

    /// 记录一条已经序列化好的 JSON 日志（例如 BidLog）
    pub async fn log_json(&self, level: &str, content: String) {
        self.send(LogEntry {
            level: normalize_level(level).to_string(),
            content,
        })
        .await;
    }

    async fn send(&self, entry: LogEntry) {
        // 先克隆 sender 再释放锁，避免跨 await 持锁
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match sender {
            Some(sender) => {
                if let Err(e) = sender.send(entry).await {
                    eprintln!("Failed to send runtime log message: {}", e);
                }
            }
            None => eprintln!("Runtime logger already shut down, dropping: {}", entry.content),
        }
    }

    /// 后台日志写入任务，通道关闭后写完剩余缓冲再退出
    async fn background_log_writer(
        log_files: HashMap<String, Arc<RollingFileAppender>>,
        mut receiver: Receiver<LogEntry>,
        batch_size: usize,
        flush_interval: u64,
    ) {
        // 每个日志级别独立的缓冲区
        let mut buffers: HashMap<String, Vec<String>> = HashMap::new();
        let mut interval = time::interval(Duration::from_millis(flush_interval));
        loop {
            tokio::select! {
                entry = receiver.recv() => {
                    let Some(entry) = entry else { break };
                    let buffer = buffers.entry(entry.level.clone()).or_default();
                    buffer.push(entry.content);
                    if buffer.len() >= batch_size {
                        if let Some(appender) = log_files.get(&entry.level) {
                            Self::write_logs_to_disk(appender.clone(), std::mem::take(buffer)).await;
                        }
                    }
                },
                _ = interval.tick() => {
                    Self::flush_all(&log_files, &mut buffers).await;
                }
            }
        }
        Self::flush_all(&log_files, &mut buffers).await;
    }

    async fn flush_all(
        log_files: &HashMap<String, Arc<RollingFileAppender>>,
        buffers: &mut HashMap<String, Vec<String>>,
    ) {
        for (level, buffer) in buffers.iter_mut() {
            if buffer.is_empty() {
                continue;
            }
            if let Some(appender) = log_files.get(level) {
                Self::write_logs_to_disk(appender.clone(), std::mem::take(buffer)).await;
            }
        }
    }

    async fn write_logs_to_disk(file: Arc<RollingFileAppender>, buffer: Vec<String>) {
        let content = buffer.join("\n") + "\n";
        let result = task::spawn_blocking(move || {
            let mut writer = file.make_writer();
            writer.write_all(content.as_bytes())
        })
        .await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => eprintln!("Failed to write runtime logs: {}", e),
            Err(e) => eprintln!("Runtime log writer task failed: {}", e),
        }
    }

    /// 删除超过保留时长的文件，返回删除数量
    pub async fn cleanup_old_logs(log_dir: &str, retention_hours: u64) -> usize {
        let retention_duration = StdDuration::from_secs(retention_hours * 3600);
        let now = SystemTime::now();
        let mut removed = 0;
        let mut dir = match tokio::fs::read_dir(Path::new(log_dir)).await {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("Failed to read log directory {}: {}", log_dir, e);
                return removed;
            }
        };
        while let Ok(Some(entry)) = dir.next_entry().await {
            let path = entry.path();
            let Ok(metadata) = entry.metadata().await else { continue };
            if !metadata.is_file() {
                continue;
            }
            let Ok(modified) = metadata.modified() else { continue };
            if now.duration_since(modified).unwrap_or_default() > retention_duration {
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    Err(e) => eprintln!("Failed to delete old log file {:?}: {}", path, e),
                }
            }
        }
        removed
    }

    /// 停止日志系统：关闭通道并等待后台任务把缓冲写入磁盘
    pub async fn shutdown(&self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.cleaner.abort();
        let writer = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(writer) = writer {
            if let Err(e) = writer.await {
                eprintln!("Runtime log writer task failed: {}", e);
            }
        }
    }
}

fn normalize_level(level: &str) -> &'static str {
    LEVELS
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(level))
        .unwrap_or("INFO")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_log_dir() -> String {
        let dir = std::env::temp_dir().join(format!("bidext-runtime-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.to_string_lossy().into_owned()
    }

    fn read_all(dir: &str) -> Vec<(String, String)> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                let content = std::fs::read_to_string(e.path()).unwrap_or_default();
                (name, content)
            })
            .collect()
    }

    #[test]
    fn levels_are_normalized() {
        assert_eq!(normalize_level("warn"), "WARN");
        assert_eq!(normalize_level("Error"), "ERROR");
        assert_eq!(normalize_level("verbose"), "INFO");
    }

    #[tokio::test]
    async fn entries_land_in_per_level_files() {
        let dir = temp_log_dir();
        let logger = RuntimeLogger::new(&dir, "runtime", 16, 100, 50, 72);
        logger.log("INFO", "server is starting").await;
        logger.log_json("ERROR", r#"{"status":"failure"}"#.to_string()).await;
        logger.shutdown().await;

        let files = read_all(&dir);
        let info = files
            .iter()
            .find(|(name, _)| name.starts_with("runtime_info.json"))
            .expect("info log file");
        assert!(info.1.contains("server is starting"));
        let error = files
            .iter()
            .find(|(name, _)| name.starts_with("runtime_error.json"))
            .expect("error log file");
        assert!(error.1.contains(r#"{"status":"failure"}"#));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn log_after_shutdown_is_dropped() {
        let dir = temp_log_dir();
        let logger = RuntimeLogger::new(&dir, "runtime", 4, 10, 50, 72);
        logger.shutdown().await;
        logger.log("INFO", "too late").await;

        let files = read_all(&dir);
        assert!(files.iter().all(|(_, content)| !content.contains("too late")));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn cleanup_keeps_fresh_files() {
        let dir = temp_log_dir();
        std::fs::write(Path::new(&dir).join("fresh.json"), "{}").unwrap();
        assert_eq!(RuntimeLogger::cleanup_old_logs(&dir, 72).await, 0);
        assert!(Path::new(&dir).join("fresh.json").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
