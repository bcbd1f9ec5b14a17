//! Arming state machine
//!
//! The vehicle starts `Locked`. A fresh card that validates as unused arms it
//! for a fixed number of seconds, during which joystick commands are framed and
//! sent every fast tick. When the countdown passes zero a single safe-stop frame
//! is sent and the machine locks again. While locked, the safe-stop frame is
//! sent as a keep-alive probe so battery telemetry keeps flowing.
//!
//! [ArmingController::tick] does one step and returns the delay until the next
//! one. The caller owns scheduling; time is passed in so the machine can be
//! driven deterministically.

use std::sync::Arc;

use embassy_time::{Duration, Instant};
use log::{debug, error, info, warn};
use moodbot_messages::{BatteryScale, Packet, SAFE_STOP, Token, decode_telemetry};

use crate::collaborators::notices::{MISSION_COMPLETE, SCAN_AGAIN, SCAN_CARD};
use crate::collaborators::{MotionSource, StatusDisplay};
use crate::error::{Fault, LinkError};
use crate::link::LineLink;
use crate::motion::MotionMapper;
use crate::scanner::{Scanner, TokenSlot};
use crate::token_cache::TokenValidator;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmingConfig {
    /// Seconds on the clock when a session starts
    pub session_limit: i32,
    /// Tick period while locked
    pub slow_poll: Duration,
    /// Tick period while armed
    pub fast_poll: Duration,
    /// Time per countdown second. Zero counts one second per armed tick.
    pub countdown_step: Duration,
    /// How long a completion or rejection notice stays up
    pub notice: Duration,
    pub max_consecutive_faults: Option<u32>,
    pub battery: BatteryScale,
}

impl Default for ArmingConfig {
    fn default() -> Self {
        Self {
            session_limit: 120,
            slow_poll: Duration::from_millis(1000),
            fast_poll: Duration::from_millis(50),
            countdown_step: Duration::from_secs(1),
            notice: Duration::from_secs(3),
            max_consecutive_faults: None,
            battery: BatteryScale::DEFAULT,
        }
    }
}

/// Everything the state machine talks to, owned in one place
pub struct Context<M, V, J, D> {
    /// Link to the motor controller
    pub motor: M,
    pub validator: TokenValidator<V>,
    pub motion: J,
    pub display: D,
    /// Filled by the RFID scanner thread
    pub tokens: Arc<TokenSlot>,
    pub scanner: Option<Scanner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Locked,
    Armed {
        armed_at: Instant,
        remaining_seconds: i32,
        /// When the next countdown second elapses
        next_step: Instant,
    },
}

pub struct ArmingController<M, V, J, D> {
    ctx: Context<M, V, J, D>,
    config: ArmingConfig,
    mapper: MotionMapper,
    session: Session,
    previous_token: Option<Token>,
    fault_streak: u32,
    notice_until: Option<Instant>,
}

impl<M, V, J, D> ArmingController<M, V, J, D>
where
    M: LineLink,
    V: LineLink,
    J: MotionSource,
    D: StatusDisplay,
{
    pub fn new(mut ctx: Context<M, V, J, D>, config: ArmingConfig, mapper: MotionMapper) -> Self {
        ctx.display.show_message(SCAN_CARD);
        Self {
            ctx,
            config,
            mapper,
            session: Session::Locked,
            previous_token: None,
            fault_streak: 0,
            notice_until: None,
        }
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.session, Session::Armed { .. })
    }

    pub fn context(&self) -> &Context<M, V, J, D> {
        &self.ctx
    }

    /// Run one step and return the delay until the next
    pub fn tick(&mut self, now: Instant) -> Duration {
        self.ctx.validator.expire(now);
        self.ctx.validator.reconcile();

        // A card held on the reader is scanned over and over; only a change
        // counts as a new scan
        let scanned = self.ctx.tokens.try_take();
        let fresh = scanned.filter(|token| Some(*token) != self.previous_token);
        self.previous_token = scanned;

        match self.session {
            Session::Locked => self.tick_locked(now, fresh),
            Session::Armed { .. } => {
                if let Some(token) = fresh {
                    debug!("Ignoring token {token} while armed");
                }
                self.tick_armed(now)
            }
        }
    }

    fn tick_locked(&mut self, now: Instant, fresh: Option<Token>) -> Duration {
        if let Some(token) = fresh {
            if self.ctx.validator.validate(token) {
                self.arm(now, token);
                return self.config.fast_poll;
            }
            self.notice(now, SCAN_AGAIN);
        }

        if self.notice_until.is_some_and(|until| now >= until) {
            self.notice_until = None;
            self.ctx.display.show_message(SCAN_CARD);
        }

        if let Err(fault) = self.exchange(&SAFE_STOP) {
            warn!("Status probe failed: {fault}");
        }
        self.config.slow_poll
    }

    fn tick_armed(&mut self, now: Instant) -> Duration {
        let step = self.config.countdown_step;
        let Session::Armed {
            remaining_seconds,
            next_step,
            ..
        } = &mut self.session
        else {
            return self.config.slow_poll;
        };

        let before = *remaining_seconds;
        if step == Duration::from_ticks(0) {
            *remaining_seconds = remaining_seconds.saturating_sub(1);
        } else {
            while now >= *next_step {
                *remaining_seconds = remaining_seconds.saturating_sub(1);
                *next_step += step;
            }
        }
        let remaining = *remaining_seconds;

        if remaining < 0 {
            self.send_safe_stop();
            self.disarm(now, "session timeout");
            return self.config.slow_poll;
        }
        if remaining != before {
            self.ctx.display.show_countdown(remaining);
        }

        let input = self.ctx.motion.read();
        let packet = self.mapper.map(&input).to_packet();

        match self.exchange(&packet) {
            Ok(()) => self.fault_streak = 0,
            Err(fault) => {
                self.fault_streak = self.fault_streak.saturating_add(1);
                warn!("Armed tick fault ({} in a row): {fault}", self.fault_streak);

                if let Some(limit) = self.config.max_consecutive_faults {
                    if self.fault_streak >= limit {
                        error!("Motor link failed {limit} times in a row");
                        self.send_safe_stop();
                        self.disarm(now, "persistent link fault");
                        return self.config.slow_poll;
                    }
                }
            }
        }

        self.config.fast_poll
    }

    fn arm(&mut self, now: Instant, token: Token) {
        let limit = self.config.session_limit;
        self.session = Session::Armed {
            armed_at: now,
            remaining_seconds: limit,
            next_step: now + self.config.countdown_step,
        };
        self.fault_streak = 0;
        self.notice_until = None;
        self.ctx.display.show_countdown(limit);
        info!("Armed by token {token} for {limit} s");
    }

    fn disarm(&mut self, now: Instant, reason: &str) {
        if let Session::Armed { armed_at, .. } = self.session {
            info!(
                "Disarm: {reason} after {} ms",
                now.saturating_duration_since(armed_at).as_millis()
            );
        }
        self.session = Session::Locked;
        self.fault_streak = 0;
        self.notice(now, MISSION_COMPLETE);
    }

    fn notice(&mut self, now: Instant, text: &str) {
        self.ctx.display.show_message(text);
        self.notice_until = Some(now + self.config.notice);
    }

    fn send_safe_stop(&mut self) {
        if let Err(fault) = self.exchange(&SAFE_STOP) {
            warn!("Safe-stop failed: {fault}");
        }
    }

    /// Send one frame and harvest the telemetry line that answers it. Only a
    /// transport failure is reported; a silent or garbled reply is not.
    fn exchange(&mut self, packet: &Packet) -> Result<(), Fault> {
        self.ctx.motor.write_all(&packet.to_bytes())?;

        let line = match self.ctx.motor.read_line() {
            Ok(line) => line,
            Err(LinkError::Timeout) => {
                debug!("{}", Fault::LinkTimeout);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        match decode_telemetry(&line) {
            Some(reading) => {
                let battery = &self.config.battery;
                self.ctx
                    .display
                    .show_battery_percent(reading.percent(battery), reading.is_low(battery));
            }
            None => debug!("{}: {:?}", Fault::MalformedTelemetry, line.as_slice()),
        }
        Ok(())
    }

    /// Best effort halt, then release the links and the scanner thread
    pub fn shutdown(self) {
        let Self { mut ctx, .. } = self;

        if let Err(err) = ctx.motor.write_all(&SAFE_STOP.to_bytes()) {
            warn!("Safe-stop on shutdown failed: {err}");
        }
        if let Some(scanner) = ctx.scanner.take() {
            scanner.shutdown();
        }
        info!("Links released");
    }
}
