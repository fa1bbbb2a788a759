//! Serial Command Port
//!
//! USART2 receive side on a DMA ring buffer. The ring keeps filling while
//! the control loop is blocked in a bring-up, so the port can be drained
//! synchronously from a [`CancelCheck`] as well as from the tick loop.

use core::task::Poll;

use embassy_futures::poll_once;
use embassy_stm32::usart::RingBufferedUartRx;

use crate::config::COMMAND_BUFFER_SIZE;
use crate::hal::gpio::StopButton;
use crate::platform::CancelCheck;
use crate::protocol::{CommandInbox, HostCommand};

/// Command receiver feeding a [`CommandInbox`]
pub struct SerialPort<'d> {
    rx: RingBufferedUartRx<'d>,
    inbox: CommandInbox,
}

impl<'d> SerialPort<'d> {
    /// Wrap a ring-buffered receiver
    #[must_use]
    pub fn new(rx: RingBufferedUartRx<'d>) -> Self {
        Self {
            rx,
            inbox: CommandInbox::new(),
        }
    }

    /// Move everything the DMA ring holds into the inbox. Never waits.
    pub fn poll(&mut self) {
        let mut buf = [0u8; COMMAND_BUFFER_SIZE];
        loop {
            let polled = poll_once(self.rx.read(&mut buf));
            match polled {
                Poll::Ready(Ok(0)) | Poll::Pending => break,
                Poll::Ready(Ok(n)) => self.inbox.push_bytes(&buf[..n]),
                Poll::Ready(Err(_)) => {
                    warn!("USART receive error, dropping partial command");
                    self.inbox.discard_partial();
                    break;
                }
            }
        }
    }

    /// Next queued command, after draining the receiver
    pub fn next_command(&mut self) -> Option<HostCommand> {
        self.poll();
        self.inbox.next_command()
    }
}

impl CancelCheck for SerialPort<'_> {
    fn cancel_requested(&mut self) -> bool {
        self.poll();
        self.inbox.cancel_pending()
    }
}

/// Everything the operator can interrupt a bring-up with
pub struct OperatorInput<'d> {
    /// Emergency stop button
    pub button: StopButton<'d>,
    /// Serial command port
    pub serial: SerialPort<'d>,
}

impl CancelCheck for OperatorInput<'_> {
    fn cancel_requested(&mut self) -> bool {
        self.button.cancel_requested() || self.serial.cancel_requested()
    }
}
