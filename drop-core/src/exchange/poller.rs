// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Background workers of a running exchange.
//!
//! Two threads: the poller, which retrieves from every relay server and
//! then waits for the poll interval, and the send command listener. Both
//! are stopped and joined by [`RunningExchange::stop`] or on drop.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info};

use super::DropExchange;
use crate::command::{DropSender, SendCommandListener};
use crate::error::{DropError, DropResult};
use crate::events::DropEvent;

/// Stop flag with an interruptible wait.
#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    fn stop(&self) {
        *self.stopped.lock() = true;
        self.wake.notify_all();
    }

    fn is_stopped(&self) -> bool {
        *self.stopped.lock()
    }

    /// Waits up to `timeout`; returns whether stop was requested.
    fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut stopped = self.stopped.lock();
        while !*stopped {
            match deadline {
                Some(deadline) => {
                    if self.wake.wait_until(&mut stopped, deadline).timed_out() {
                        break;
                    }
                }
                None => self.wake.wait(&mut stopped),
            }
        }
        *stopped
    }
}

/// Handle to the workers of a started [`DropExchange`].
pub struct RunningExchange {
    exchange: DropExchange,
    stop: Arc<StopSignal>,
    poller: Option<JoinHandle<()>>,
    listener: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RunningExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningExchange")
            .field("running", &self.is_running())
            .finish()
    }
}

impl RunningExchange {
    pub(super) fn spawn(exchange: DropExchange) -> DropResult<Self> {
        let listener = exchange.command_bus().bind()?;
        let stop = Arc::new(StopSignal::default());

        let listener = {
            let exchange = exchange.clone();
            thread::Builder::new()
                .name("drop-send".into())
                .spawn(move || listen(exchange, listener))
                .map_err(|e| DropError::InvalidConfiguration(e.to_string()))?
        };

        let poller = {
            let exchange = exchange.clone();
            let stop = stop.clone();
            thread::Builder::new()
                .name("drop-poller".into())
                .spawn(move || poll(exchange, &stop))
        };

        let mut running = RunningExchange {
            exchange,
            stop,
            poller: None,
            listener: Some(listener),
        };
        match poller {
            Ok(poller) => {
                running.poller = Some(poller);
                Ok(running)
            }
            Err(e) => {
                running.shutdown()?;
                Err(DropError::InvalidConfiguration(e.to_string()))
            }
        }
    }

    /// Handle for sending through the running listener.
    pub fn sender(&self) -> DropSender {
        self.exchange.sender()
    }

    pub fn exchange(&self) -> &DropExchange {
        &self.exchange
    }

    /// Whether the poller is still polling.
    pub fn is_running(&self) -> bool {
        self.poller
            .as_ref()
            .is_some_and(|poller| !poller.is_finished())
    }

    /// Stops both workers and waits for them to exit.
    pub fn stop(mut self) -> DropResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> DropResult<()> {
        self.stop.stop();
        if let Some(listener) = &self.listener {
            if !listener.is_finished() {
                self.exchange.command_bus().shutdown();
            }
        }

        let poller = self.poller.take().map(JoinHandle::join);
        let listener = self.listener.take().map(JoinHandle::join);

        if matches!(poller, Some(Err(_))) {
            return Err(DropError::WorkerPanicked("poller"));
        }
        if matches!(listener, Some(Err(_))) {
            return Err(DropError::WorkerPanicked("send listener"));
        }
        Ok(())
    }
}

impl Drop for RunningExchange {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            error!(error = %err, "drop exchange did not shut down cleanly");
        }
    }
}

fn poll(exchange: DropExchange, stop: &StopSignal) {
    info!(interval = ?exchange.poll_interval(), "drop poller started");

    while !stop.is_stopped() {
        match exchange.poll_once() {
            Ok(received) => debug!(received, "poll cycle done"),
            Err(err) => {
                error!(error = %err, "drop poller failed");
                exchange.events().dispatch(DropEvent::Error {
                    message: err.to_string(),
                });
                break;
            }
        }

        if stop.wait(exchange.poll_interval()) {
            break;
        }
    }

    info!("drop poller stopped");
}

fn listen(exchange: DropExchange, listener: SendCommandListener) {
    while let Some(command) = listener.next_command() {
        let result = exchange.send(command.message(), command.contacts());
        if let Err(err) = &result {
            debug!(error = %err, "send command failed");
        }
        command.respond(result);
    }
    debug!("send command listener stopped");
}
