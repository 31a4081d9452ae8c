//! Intent types and the intent channel
//!
//! The transport layer turns remote commands into [`LightChangeIntent`]s and
//! hands them to the render loop through an [`IntentChannel`]. The channel is
//! a bounded `heapless::Deque` behind a critical section, so it can be shared
//! between tasks or interrupt handlers.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{Deque, String};

use crate::effect::EffectId;

/// Maximum number of hex digits accepted in one payload
pub const HEX_PAYLOAD_CAPACITY: usize = 1024;

/// Hex digits of a custom-pixel stream or enable mask
pub type HexPayload = String<HEX_PAYLOAD_CAPACITY>;

/// Represents a user intent to change the light state.
///
/// Fields are applied in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightStateIntent {
    pub power: Option<bool>,
    /// Crossfade duration in seconds
    pub transition: Option<u16>,
    pub red: Option<u8>,
    pub green: Option<u8>,
    pub blue: Option<u8>,
    pub white: Option<u8>,
    pub brightness: Option<u8>,
    pub effect: Option<EffectId>,
}

impl LightStateIntent {
    /// Whether anything besides power and transition is set
    pub const fn has_parameters(&self) -> bool {
        self.red.is_some()
            || self.green.is_some()
            || self.blue.is_some()
            || self.white.is_some()
            || self.brightness.is_some()
            || self.effect.is_some()
    }
}

/// Intent to change light state or settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightChangeIntent {
    /// Change power, transition, color, white, brightness or effect
    State(LightStateIntent),
    /// Change gradient shape letter and extent (0-100 %)
    Gradient { mode: char, extent: u8 },
    /// Rewrite the custom buffer
    CustomPixels(HexPayload),
    /// Rewrite the enable mask
    EnabledMask(HexPayload),
    /// Start a sunrise with the given duration and power on
    WakeAlarm(u16),
}

impl LightChangeIntent {
    /// Build a hex payload intent, `None` if the payload is too long
    pub fn custom_pixels(hex: &str) -> Option<Self> {
        HexPayload::try_from(hex).ok().map(Self::CustomPixels)
    }

    /// Build an enable mask intent, `None` if the payload is too long
    pub fn enabled_mask(hex: &str) -> Option<Self> {
        HexPayload::try_from(hex).ok().map(Self::EnabledMask)
    }
}

/// Error returned when trying to send to a full channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrySendError(pub LightChangeIntent);

/// Error returned when trying to receive from an empty channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// Bounded intent queue shared between the transport and the render loop
pub struct IntentChannel<const SIZE: usize> {
    queue: Mutex<RefCell<Deque<LightChangeIntent, SIZE>>>,
}

impl<const SIZE: usize> Default for IntentChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> IntentChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> IntentSender<'_, SIZE> {
        IntentSender { channel: self }
    }

    pub const fn receiver(&self) -> IntentReceiver<'_, SIZE> {
        IntentReceiver { channel: self }
    }

    fn push(&self, intent: LightChangeIntent) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.queue.borrow(cs).borrow_mut();
            queue.push_back(intent).map_err(TrySendError)
        })
    }

    fn pop(&self) -> Result<LightChangeIntent, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.queue.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }
}

/// Sending half, held by the transport layer
#[derive(Clone, Copy)]
pub struct IntentSender<'a, const SIZE: usize> {
    channel: &'a IntentChannel<SIZE>,
}

impl<const SIZE: usize> IntentSender<'_, SIZE> {
    /// Queue an intent, handing it back if the channel is full
    pub fn try_send(&self, intent: LightChangeIntent) -> Result<(), TrySendError> {
        self.channel.push(intent)
    }
}

/// Receiving half, drained by the renderer once per frame
#[derive(Clone, Copy)]
pub struct IntentReceiver<'a, const SIZE: usize> {
    channel: &'a IntentChannel<SIZE>,
}

impl<const SIZE: usize> IntentReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Result<LightChangeIntent, TryReceiveError> {
        self.channel.pop()
    }
}
