use actix_web::HttpRequest;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct RateRule {
    pub max_requests: usize,
    pub window: Duration,
}

pub const LOGIN_RULE: RateRule = RateRule {
    max_requests: 5,
    window: Duration::from_secs(300),
};

pub const CONTACT_RULE: RateRule = RateRule {
    max_requests: 5,
    window: Duration::from_secs(600),
};

pub const SUBSCRIBE_RULE: RateRule = RateRule {
    max_requests: 10,
    window: Duration::from_secs(3600),
};

const LONGEST_WINDOW: Duration = Duration::from_secs(3600);

/// Sliding-window limiter keyed by scope and client address.
pub struct RateLimiter {
    requests: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Records the attempt and returns false once the rule's budget is spent.
    pub fn check(&self, scope: &str, client: &str, rule: RateRule) -> bool {
        let now = Instant::now();
        let mut requests = self
            .requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let entry = requests.entry(format!("{scope}:{client}")).or_default();
        entry.retain(|&at| now.duration_since(at) < rule.window);

        if entry.len() >= rule.max_requests {
            return false;
        }
        entry.push(now);

        // Forget clients idle for longer than any rule's window
        requests.retain(|_, times| {
            times
                .last()
                .is_some_and(|&last| now.duration_since(last) < LONGEST_WINDOW)
        });

        true
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}
