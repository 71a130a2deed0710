// ==========================================
// 工厂提货明细拆分系统 - 打印限频
// ==========================================
// 职责: 两次 batchPrintLabels 之间保持最小间隔
// 说明: 积加前端限制约 30s 内重复提交打印,过快会业务失败
// ==========================================

use std::time::{Duration, Instant};

pub const DEFAULT_PRINT_COOLDOWN: Duration = Duration::from_secs(35);

/// 时间源,测试注入假时钟
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 打印限频器。acquire_wait 返回调用方应睡眠的时长,并把本次
/// 提交点预约在睡眠结束的时刻,连续调用会自然排队。
pub struct PrintRateLimiter<C: Clock = SystemClock> {
    cooldown: Duration,
    last_submit: Option<Instant>,
    clock: C,
}

impl PrintRateLimiter<SystemClock> {
    pub fn new(cooldown: Duration) -> Self {
        Self::with_clock(cooldown, SystemClock)
    }
}

impl<C: Clock> PrintRateLimiter<C> {
    pub fn with_clock(cooldown: Duration, clock: C) -> Self {
        Self {
            cooldown,
            last_submit: None,
            clock,
        }
    }

    pub fn acquire_wait(&mut self) -> Duration {
        let now = self.clock.now();
        let wait = match self.last_submit {
            Some(last) => (last + self.cooldown)
                .checked_duration_since(now)
                .unwrap_or(Duration::ZERO),
            None => Duration::ZERO,
        };
        self.last_submit = Some(now + wait);
        wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct FakeClock {
        base: Instant,
        offset: Rc<Cell<Duration>>,
    }

    impl FakeClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Rc::new(Cell::new(Duration::ZERO)),
            }
        }

        fn advance(&self, d: Duration) {
            self.offset.set(self.offset.get() + d);
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            self.base + self.offset.get()
        }
    }

    #[test]
    fn test_first_acquire_is_free() {
        let clock = FakeClock::new();
        let mut rl = PrintRateLimiter::with_clock(Duration::from_secs(35), clock);
        assert_eq!(rl.acquire_wait(), Duration::ZERO);
    }

    #[test]
    fn test_second_acquire_waits_remainder() {
        let clock = FakeClock::new();
        let mut rl = PrintRateLimiter::with_clock(Duration::from_secs(35), clock.clone());
        rl.acquire_wait();
        clock.advance(Duration::from_secs(10));
        assert_eq!(rl.acquire_wait(), Duration::from_secs(25));
    }

    #[test]
    fn test_cooldown_elapsed_means_no_wait() {
        let clock = FakeClock::new();
        let mut rl = PrintRateLimiter::with_clock(Duration::from_secs(35), clock.clone());
        rl.acquire_wait();
        clock.advance(Duration::from_secs(40));
        assert_eq!(rl.acquire_wait(), Duration::ZERO);
    }

    #[test]
    fn test_back_to_back_calls_queue_up() {
        let clock = FakeClock::new();
        let mut rl = PrintRateLimiter::with_clock(Duration::from_secs(35), clock);
        rl.acquire_wait();
        // 预约点在 35s,再连续要两次应依次排到 35s、70s
        assert_eq!(rl.acquire_wait(), Duration::from_secs(35));
        assert_eq!(rl.acquire_wait(), Duration::from_secs(70));
    }
}
