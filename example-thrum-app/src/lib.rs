use example_thrum_service_definition::calc::{
    CalcClient, CalcHandler, DivByZero, MemoryFull, calc_processor,
};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use thrum::protocol::loopback::{self, LoopbackInput, LoopbackOutput};
use thrum::protocol::{InputProtocol, OutputProtocol};
use thrum_processor::{HandlerError, ProcessError, Processor};

pub use example_thrum_service_definition::calc;

/// Default number of values a [`Calculator`] remembers.
pub const DEFAULT_MEMORY_CAPACITY: usize = 8;

/// Reference `Calc` handler.
///
/// `remember` pushes onto a bounded memory and `recall` returns the most
/// recent value.
pub struct Calculator {
    memory: Mutex<Vec<i32>>,
    capacity: usize,
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            memory: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CalcHandler for Calculator {
    fn add(&self, a: i32, b: i32) -> Result<i32, HandlerError> {
        // Overflow is not a declared outcome of `add`
        a.checked_add(b)
            .ok_or_else(|| format!("{} + {} overflows i32", a, b).into())
    }

    fn div(&self, a: i32, b: i32) -> Result<i32, HandlerError> {
        if b == 0 {
            return Err(DivByZero::new(format!("cannot divide {} by zero", a))
                .into_exception()?
                .into());
        }
        // `i32::MIN / -1` overflows, which is not a declared outcome of `div`
        a.checked_div(b)
            .ok_or_else(|| format!("{} / {} overflows i32", a, b).into())
    }

    fn ping(&self) -> Result<(), HandlerError> {
        tracing::debug!("ping");
        Ok(())
    }

    fn remember(&self, value: i32) -> Result<(), HandlerError> {
        let mut memory = self.memory.lock().map_err(|_| "calculator memory poisoned")?;

        if memory.len() >= self.capacity {
            let capacity = i32::try_from(self.capacity).unwrap_or(i32::MAX);
            return Err(MemoryFull {
                capacity: Some(capacity),
            }
            .into_exception()?
            .into());
        }

        memory.push(value);
        Ok(())
    }

    fn recall(&self) -> Result<Option<i32>, HandlerError> {
        let memory = self.memory.lock().map_err(|_| "calculator memory poisoned")?;
        Ok(memory.last().copied())
    }

    fn sum(&self, values: Vec<i32>) -> Result<i64, HandlerError> {
        Ok(values.into_iter().map(i64::from).sum())
    }
}

/// Answers calls until the peer disconnects.
///
/// A disconnect ends the loop with `Ok`. Any other failure, including an
/// undeclared handler error, ends it with that error; no reply is written
/// for the call that caused it.
pub fn serve<C, I, O>(
    processor: &Processor<C>,
    mut iprot: I,
    mut oprot: O,
) -> Result<(), ProcessError>
where
    I: InputProtocol,
    O: OutputProtocol,
{
    let mut served: u64 = 0;

    loop {
        match processor.process(&mut iprot, &mut oprot) {
            Ok(()) => served += 1,
            Err(err) if err.is_disconnect() => {
                tracing::info!(
                    "Peer of `{}` disconnected after {} messages",
                    processor.service().name(),
                    served
                );
                return Ok(());
            }
            Err(err) => {
                tracing::error!("Serving `{}` stopped: {}", processor.service().name(), err);
                return Err(err);
            }
        }
    }
}

/// Runs `handler` behind a `Calc` processor on its own thread, connected to
/// the returned client through an in-memory loopback.
///
/// Dropping the client disconnects the server, whose thread then finishes.
pub fn spawn_loopback<H: CalcHandler>(
    handler: H,
) -> Result<
    (
        CalcClient<LoopbackInput, LoopbackOutput>,
        JoinHandle<Result<(), ProcessError>>,
    ),
    ProcessError,
> {
    let processor = calc_processor(handler)?;
    let (client_end, server_end) = loopback::duplex();

    let server = thread::spawn(move || {
        let (iprot, oprot) = server_end.split();
        serve(&processor, iprot, oprot)
    });

    let (iprot, oprot) = client_end.split();
    Ok((CalcClient::new(iprot, oprot), server))
}
