use crate::dispatch::InputDispatcher;
use crate::tracker::{MotionSink, RotationSource};
use crate::types::InputEvent;
use crate::{MotionError, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Capacity of the event channel. Sensor delivery at game rate is a few
/// hundred events per second; the pump thread drains far faster.
const CHANNEL_CAPACITY: usize = 256;

enum PumpMessage {
    Event(InputEvent),
    Pause,
    Resume,
}

/// Handle to a running event-delivery thread.
///
/// The tracker's contract is single-threaded cooperative delivery. Hosts
/// whose event sources live on other threads submit events here; the pump
/// thread owns the dispatcher and replays everything in submission order on
/// one thread, preserving that contract.
pub struct EventPump {
    sender: Sender<PumpMessage>,
    stop_flag: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl EventPump {
    /// Start the delivery thread around a dispatcher.
    pub fn start<R, S>(dispatcher: InputDispatcher<R, S>) -> Result<EventPump>
    where
        R: RotationSource + Send + 'static,
        S: MotionSink + Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(CHANNEL_CAPACITY);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = stop_flag.clone();

        let thread = std::thread::Builder::new()
            .name("echo-motion-pump".into())
            .spawn(move || {
                pump_loop(dispatcher, receiver, stop_clone);
            })
            .map_err(|e| MotionError::PumpStart(e.to_string()))?;

        Ok(EventPump {
            sender,
            stop_flag,
            thread: Some(thread),
        })
    }

    /// Submit one event for delivery. Blocks while the channel is full so
    /// no event is ever dropped.
    pub fn submit(&self, event: InputEvent) -> Result<()> {
        self.post(PumpMessage::Event(event), "submit")
    }

    /// Gate sensor delivery on the pump thread.
    pub fn pause(&self) -> Result<()> {
        self.post(PumpMessage::Pause, "pause")
    }

    /// Re-enable sensor delivery on the pump thread.
    pub fn resume(&self) -> Result<()> {
        self.post(PumpMessage::Resume, "resume")
    }

    fn post(&self, message: PumpMessage, label: &str) -> Result<()> {
        self.sender.send(message).map_err(|_| {
            log::warn!("{} failed: event pump stopped", label);
            MotionError::PumpStopped
        })
    }

    /// Check if the pump is still running.
    pub fn is_active(&self) -> bool {
        !self.stop_flag.load(Ordering::Relaxed)
    }

    /// Stop the pump and wait for the delivery thread to finish.
    /// Events still queued at this point are discarded.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn pump_loop<R: RotationSource, S: MotionSink>(
    mut dispatcher: InputDispatcher<R, S>,
    receiver: Receiver<PumpMessage>,
    stop_flag: Arc<AtomicBool>,
) {
    log::info!("event pump started");

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            log::info!("event pump stopping (stop flag set)");
            break;
        }

        // Timeout keeps the stop flag responsive while the host is idle.
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(PumpMessage::Event(event)) => dispatcher.dispatch(event),
            Ok(PumpMessage::Pause) => dispatcher.pause(),
            Ok(PumpMessage::Resume) => dispatcher.resume(),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                log::info!("event pump channel disconnected, stopping");
                break;
            }
        }
    }
}
