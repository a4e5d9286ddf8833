// src/bidding/token.rs

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// `cb` 字段的固定长度
pub const CB_TOKEN_LEN: usize = 10;

/// 随机 token 生成能力，注入到 AppState 中，测试时可替换为固定实现
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

impl<F> TokenGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// 进程级随机源，启动时播种一次，多请求共享，用 Mutex 串行化取数
pub struct AlphanumericToken {
    rng: Mutex<StdRng>,
    len: usize,
}

impl AlphanumericToken {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// 固定种子，便于复现
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            len: CB_TOKEN_LEN,
        }
    }
}

impl TokenGenerator for AlphanumericToken {
    fn generate(&self) -> String {
        // 持锁期间不会 panic，中毒时直接沿用内部状态
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..self.len)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect()
    }
}
