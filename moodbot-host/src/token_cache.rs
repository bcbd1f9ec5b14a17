//! Replay prevention for access cards
//!
//! A token is accepted once per epoch. The cache is wiped when the epoch runs
//! out, which also bounds its size. A second controller on the validation link
//! is consulted on first sight and kept in sync by answering its own queries.

use std::collections::HashSet;

use embassy_time::{Duration, Instant};
use log::{debug, info, warn};
use moodbot_messages::Token;
use moodbot_messages::validation::{parse_token, parse_verdict, token_line, verdict_line};
use serde::{Deserialize, Serialize};

use crate::error::{Fault, LinkError, Unconfirmed};
use crate::link::LineLink;

/// How much weight the validation link's answer carries
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemotePolicy {
    /// The answer is logged; the local cache alone decides
    #[default]
    Advisory,
    /// A "used" answer rejects the token
    Enforced,
}

#[derive(Debug)]
pub struct TokenCache {
    used: HashSet<Token>,
    epoch: Duration,
    epoch_start: Instant,
}

impl TokenCache {
    pub fn new(epoch: Duration, now: Instant) -> Self {
        Self {
            used: HashSet::new(),
            epoch,
            epoch_start: now,
        }
    }

    pub fn contains(&self, token: Token) -> bool {
        self.used.contains(&token)
    }

    /// Record a token as used. Returns false if it already was.
    pub fn insert(&mut self, token: Token) -> bool {
        self.used.insert(token)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Clear the cache once the epoch has run out. Returns true if it did.
    pub fn expire(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.epoch_start) > self.epoch {
            self.used.clear();
            self.epoch_start = now;
            true
        } else {
            false
        }
    }
}

pub struct TokenValidator<V> {
    link: V,
    cache: TokenCache,
    policy: RemotePolicy,
}

impl<V: LineLink> TokenValidator<V> {
    pub fn new(link: V, cache: TokenCache, policy: RemotePolicy) -> Self {
        Self {
            link,
            cache,
            policy,
        }
    }

    /// Decide whether a freshly scanned token may arm the vehicle. Any token
    /// that reaches the validation link ends up recorded as used.
    pub fn validate(&mut self, token: Token) -> bool {
        if self.cache.contains(token) {
            warn!("{}", Fault::InvalidToken(token));
            return false;
        }

        let remote = self.query(token);
        self.cache.insert(token);

        match remote {
            Ok(false) => true,
            Ok(true) => match self.policy {
                RemotePolicy::Advisory => {
                    warn!("Validation link reports token {token} as used, accepting on local cache");
                    true
                }
                RemotePolicy::Enforced => {
                    warn!("Validation link reports token {token} as used");
                    false
                }
            },
            Err(reason) => {
                warn!("{}", Fault::from(reason));
                true
            }
        }
    }

    /// Ask the other controller whether it has seen `token`
    fn query(&mut self, token: Token) -> Result<bool, Unconfirmed> {
        self.link.write_all(token_line(token).as_bytes())?;
        let line = self.link.read_line()?;
        Ok(parse_verdict(&line)?)
    }

    /// Answer one pending query from the other controller, if any. The
    /// candidate is recorded as used after answering.
    pub fn reconcile(&mut self) -> Option<Token> {
        let line = match self.link.read_line() {
            Ok(line) => line,
            Err(LinkError::Timeout) => return None,
            Err(err) => {
                debug!("Validation link read failed: {err}");
                return None;
            }
        };

        let Some(candidate) = parse_token(&line) else {
            debug!("Ignoring unexpected line on validation link: {:?}", line.as_slice());
            return None;
        };

        let used = !self.cache.insert(candidate);
        if let Err(err) = self.link.write_all(verdict_line(used).as_bytes()) {
            debug!("Failed to answer validation query for {candidate}: {err}");
        }
        Some(candidate)
    }

    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self.cache.expire(now);
        if expired {
            info!("Token epoch ended, used card list cleared");
        }
        expired
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }
}
