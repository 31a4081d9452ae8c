use heapless::Deque;

use crate::effect::EffectId;
use crate::intent_processor::LightStateIntent;

/// Maximum number of operations a single state intent expands to
pub const MAX_STATE_OPERATIONS: usize = 8;

/// Single-field operations a state intent is split into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Switch the strip on or off
    SetPower(bool),
    /// Set the crossfade duration in seconds
    SetTransition(u16),
    SetRed(u8),
    SetGreen(u8),
    SetBlue(u8),
    SetWhite(u8),
    SetBrightness(u8),
    /// Switch to another effect
    SetEffect(EffectId),
}

/// Queue of operations, applied front to back
#[derive(Debug, Default)]
pub struct OperationQueue<const N: usize> {
    inner: Deque<Operation, N>,
}

impl<const N: usize> OperationQueue<N> {
    pub const fn new() -> Self {
        Self {
            inner: Deque::new(),
        }
    }

    /// Push an operation onto the queue
    ///
    /// Returns the operation if the queue is full
    pub fn push(&mut self, operation: Operation) -> Result<(), Operation> {
        self.inner.push_back(operation)
    }

    /// Pop the next operation
    ///
    /// Returns None if the queue is empty
    pub fn pop(&mut self) -> Option<Operation> {
        self.inner.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl OperationQueue<MAX_STATE_OPERATIONS> {
    /// Expand a state intent in the fixed field order:
    /// power, transition, red, green, blue, white, brightness, effect
    pub fn from_intent(intent: &LightStateIntent) -> Self {
        let mut queue = Self::new();
        let fields = [
            intent.power.map(Operation::SetPower),
            intent.transition.map(Operation::SetTransition),
            intent.red.map(Operation::SetRed),
            intent.green.map(Operation::SetGreen),
            intent.blue.map(Operation::SetBlue),
            intent.white.map(Operation::SetWhite),
            intent.brightness.map(Operation::SetBrightness),
            intent.effect.map(Operation::SetEffect),
        ];
        for operation in fields.into_iter().flatten() {
            // One slot per field, cannot overflow
            let _ = queue.push(operation);
        }
        queue
    }
}
