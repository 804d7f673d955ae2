//! Runtime tunables.
//!
//! There are no configuration files. Every field has a built-in default and an
//! optional `TIM_*` environment override read once at startup. A malformed
//! override is ignored with a `warn!` at target `config`; the default stays.
//!
//! | Field                | Default | Env                 |
//! |----------------------|---------|---------------------|
//! | `idle_tick`          | 16 ms   | `TIM_TICK_MS`       |
//! | `coalesce_window`    | 500 ms  | `TIM_COALESCE_MS`   |
//! | `undo_capacity`      | 100     | `TIM_UNDO_CAPACITY` |
//! | `blink_interval`     | 530 ms  | `TIM_BLINK_MS` (0 disables) |
//! | `multi_click_window` | 400 ms  | `TIM_CLICK_MS`      |
//! | `wheel_rows`         | 3       | `TIM_WHEEL_ROWS`    |
//! | `tab_width`          | 4       | `TIM_TAB_WIDTH`     |

use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub idle_tick: Duration,
    pub coalesce_window: Duration,
    pub undo_capacity: usize,
    /// `None` disables cursor blinking.
    pub blink_interval: Option<Duration>,
    pub multi_click_window: Duration,
    pub wheel_rows: usize,
    pub tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            idle_tick: Duration::from_millis(16),
            coalesce_window: Duration::from_millis(500),
            undo_capacity: 100,
            blink_interval: Some(Duration::from_millis(530)),
            multi_click_window: Duration::from_millis(400),
            wheel_rows: 3,
            tab_width: 4,
        }
    }
}

fn parse<T: FromStr>(key: &str, raw: Option<String>, min: T) -> Option<T>
where
    T: PartialOrd + Copy,
{
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(v) if v >= min => Some(v),
        _ => {
            warn!(target: "config", key, value = %raw, "ignoring_malformed_override");
            None
        }
    }
}

impl Config {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Defaults overridden through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(ms) = parse::<u64>("TIM_TICK_MS", lookup("TIM_TICK_MS"), 1) {
            cfg.idle_tick = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64>("TIM_COALESCE_MS", lookup("TIM_COALESCE_MS"), 0) {
            cfg.coalesce_window = Duration::from_millis(ms);
        }
        if let Some(n) = parse::<usize>("TIM_UNDO_CAPACITY", lookup("TIM_UNDO_CAPACITY"), 1) {
            cfg.undo_capacity = n;
        }
        if let Some(ms) = parse::<u64>("TIM_BLINK_MS", lookup("TIM_BLINK_MS"), 0) {
            cfg.blink_interval = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(ms) = parse::<u64>("TIM_CLICK_MS", lookup("TIM_CLICK_MS"), 0) {
            cfg.multi_click_window = Duration::from_millis(ms);
        }
        if let Some(n) = parse::<usize>("TIM_WHEEL_ROWS", lookup("TIM_WHEEL_ROWS"), 1) {
            cfg.wheel_rows = n;
        }
        if let Some(n) = parse::<usize>("TIM_TAB_WIDTH", lookup("TIM_TAB_WIDTH"), 1) {
            cfg.tab_width = n;
        }
        if cfg != Self::default() {
            info!(target: "config", ?cfg, "env_overrides_applied");
        }
        cfg
    }
}
