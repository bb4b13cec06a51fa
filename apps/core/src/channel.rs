#![allow(async_fn_in_trait)]

use std::time::Duration;

use crate::config::Config;
use crate::contract::PortMessage;
use crate::hotkey::{chord_from_event, KeyEvent, Platform};

/// Linear backoff: attempt `n` waits `n * base_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl From<&Config> for ReconnectPolicy {
    fn from(cfg: &Config) -> Self {
        Self {
            max_attempts: cfg.reconnect_max_attempts,
            base_delay: Duration::from_millis(cfg.reconnect_base_delay_ms),
        }
    }
}

impl ReconnectPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connected,
    Disconnected { attempts: u32 },
    /// Retry budget spent; stays inert until the page becomes visible again.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    Retry { attempt: u32, delay: Duration },
    /// Page hidden; wait for it to become visible.
    Wait,
    GiveUp,
}

/// Page-side end of the long-lived shortcut channel.
#[derive(Debug, Clone)]
pub struct ShortcutChannel {
    policy: ReconnectPolicy,
    state: ChannelState,
    visible: bool,
}

impl ShortcutChannel {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: ChannelState::Disconnected { attempts: 0 },
            visible: true,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ChannelState::Connected
    }

    pub fn on_connected(&mut self) {
        self.state = ChannelState::Connected;
    }

    /// Unexpected disconnect, or a failed reconnect attempt.
    pub fn on_disconnect(&mut self) -> ReconnectDecision {
        let attempts = match self.state {
            ChannelState::Connected => 0,
            ChannelState::Disconnected { attempts } => attempts,
            ChannelState::Exhausted => return ReconnectDecision::GiveUp,
        };

        if !self.visible {
            self.state = ChannelState::Disconnected { attempts };
            return ReconnectDecision::Wait;
        }

        if attempts >= self.policy.max_attempts {
            self.state = ChannelState::Exhausted;
            return ReconnectDecision::GiveUp;
        }

        let attempt = attempts + 1;
        self.state = ChannelState::Disconnected { attempts: attempt };
        ReconnectDecision::Retry {
            attempt,
            delay: self.policy.delay_for(attempt),
        }
    }

    /// Returns true when the page should reconnect right away.
    pub fn on_visibility_change(&mut self, visible: bool) -> bool {
        self.visible = visible;
        if !visible || self.is_connected() {
            return false;
        }
        self.state = ChannelState::Disconnected { attempts: 0 };
        true
    }

    /// `pageshow`; `persisted` is set when restored from the back/forward cache.
    pub fn on_page_show(&mut self, persisted: bool) -> bool {
        if !persisted {
            return false;
        }
        self.visible = true;
        self.state = ChannelState::Disconnected { attempts: 0 };
        true
    }

    /// Chord message to forward for a key press, if the channel is up.
    pub fn keydown_message(&self, event: &KeyEvent, platform: Platform) -> Option<PortMessage> {
        if !self.is_connected() {
            return None;
        }
        chord_from_event(event, platform).map(|shortcut| PortMessage::Keydown { shortcut })
    }
}

impl Default for ShortcutChannel {
    fn default() -> Self {
        Self::new(ReconnectPolicy::default())
    }
}

pub trait PortConnector {
    type Error: std::fmt::Display;

    async fn connect(&mut self) -> Result<(), Self::Error>;
}

/// Drives reconnect attempts after a disconnect until one succeeds or the
/// budget runs out. Returns whether the channel is connected.
pub async fn reconnect<C: PortConnector>(channel: &mut ShortcutChannel, connector: &mut C) -> bool {
    loop {
        match channel.on_disconnect() {
            ReconnectDecision::Retry { attempt, delay } => {
                tracing::debug!(event = "channel_reconnect_scheduled", attempt, delay_ms = delay.as_millis() as u64);
                tokio::time::sleep(delay).await;
                match connector.connect().await {
                    Ok(()) => {
                        channel.on_connected();
                        tracing::info!(event = "channel_reconnected", attempt);
                        return true;
                    }
                    Err(error) => {
                        tracing::debug!(event = "channel_reconnect_failed", attempt, %error);
                    }
                }
            }
            ReconnectDecision::Wait => return false,
            ReconnectDecision::GiveUp => {
                tracing::warn!(event = "channel_reconnect_exhausted");
                return false;
            }
        }
    }
}
