use crate::{HandlerError, HandlerResult, Inbound, Invocation, MethodHandler, ProcessError};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use thrum::message::{
    ApplicationException, ApplicationExceptionKind, MessageType, UserException,
};
use thrum::payload::{Payload, Value};
use thrum::protocol::{InputProtocol, MessageIdentifier, OutputProtocol, TType};
use thrum_service::ServiceDescription;

/// Demultiplexes inbound `CALL` messages to registered handlers and writes
/// one reply per call.
///
/// Besides its handler table, a processor holds no state between
/// messages. The context `C` is shared by every handler invocation; if it
/// carries mutable state, it brings its own synchronization.
pub struct Processor<C> {
    service: &'static ServiceDescription,
    context: C,
    handlers: HashMap<u64, MethodHandler<C>>,
}

impl<C> Processor<C> {
    pub fn new(service: &'static ServiceDescription, context: C) -> Self {
        Self {
            service,
            context,
            handlers: HashMap::new(),
        }
    }

    pub fn service(&self) -> &'static ServiceDescription {
        self.service
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Registers the handler for one method of the service.
    pub fn register<F>(&mut self, method: &str, handler: F) -> Result<(), ProcessError>
    where
        F: Fn(&C, Payload) -> HandlerResult + Send + Sync + 'static,
    {
        let descriptor = self
            .service
            .method(method)
            .ok_or_else(|| ProcessError::UnknownMethod {
                service: self.service.name().to_string(),
                method: method.to_string(),
            })?;

        match self.handlers.entry(descriptor.id()) {
            Entry::Occupied(_) => Err(ProcessError::HandlerAlreadyRegistered(
                method.to_string(),
            )),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    /// Service methods that have no handler yet, in declaration order.
    pub fn missing_handlers(&self) -> Vec<&'static str> {
        self.service
            .methods()
            .filter(|method| !self.handlers.contains_key(&method.id()))
            .map(|method| method.name)
            .collect()
    }

    /// Reads one inbound message and resolves it against the service.
    ///
    /// An unknown method is skipped and turned into an `UNKNOWN_METHOD`
    /// rejection without touching any handler.
    pub fn decode<P>(&self, iprot: &mut P) -> Result<Inbound<C>, ProcessError>
    where
        P: InputProtocol + ?Sized,
    {
        let envelope = iprot.read_message_begin()?;

        tracing::trace!("Inbound envelope: {:?}", envelope);

        if envelope.message_type != MessageType::Call {
            tracing::trace!(
                "Treating {} message for `{}` as a call",
                envelope.message_type,
                envelope.name
            );
        }

        let Some(descriptor) = self.service.method(&envelope.name) else {
            tracing::warn!(
                "Unknown method `{}` on service `{}` (seqid {})",
                envelope.name,
                self.service.name(),
                envelope.sequence_number
            );

            iprot.skip(TType::Struct)?;
            iprot.read_message_end()?;

            return Ok(Inbound::Rejected {
                method: envelope.name,
                sequence_id: envelope.sequence_number,
                exception: ApplicationException::new(ApplicationExceptionKind::UnknownMethod),
            });
        };

        let mut args = descriptor.new_args();
        args.read(iprot)?;
        iprot.read_message_end()?;

        let handler = self
            .handlers
            .get(&descriptor.id())
            .cloned()
            .ok_or_else(|| ProcessError::HandlerNotRegistered(envelope.name.clone()))?;

        tracing::debug!(
            "Dispatching {}.{} (seqid {}): {}",
            self.service.name(),
            descriptor.name,
            envelope.sequence_number,
            args
        );

        Ok(Inbound::Call {
            method: envelope.name,
            sequence_id: envelope.sequence_number,
            result: descriptor.new_result(),
            invocation: Invocation::new(descriptor.name, handler, args),
        })
    }

    /// Runs the invocation and files its outcome into `result`.
    ///
    /// A returned value goes into the success slot. A returned
    /// [`UserException`] goes into the first exception slot declared for its
    /// kind. Any other failure is handed back as
    /// [`ProcessError::Undeclared`].
    pub fn execute(
        &self,
        invocation: Invocation<C>,
        result: &mut Payload,
    ) -> Result<(), ProcessError> {
        let method = invocation.method();

        match invocation.invoke(&self.context) {
            Ok(Some(value)) => match result.schema().success_slot() {
                Some(slot) => {
                    result
                        .set(slot.name, value)
                        .map_err(|source| ProcessError::Payload {
                            method: method.to_string(),
                            source,
                        })?;
                }
                None => {
                    tracing::warn!("`{}` is void; dropping returned value {}", method, value);
                }
            },
            Ok(None) => {}
            Err(err) => handle_exception(method, err, result)?,
        }

        Ok(())
    }

    /// Reads one call, runs it, and writes its reply.
    pub fn process<I, O>(&self, iprot: &mut I, oprot: &mut O) -> Result<(), ProcessError>
    where
        I: InputProtocol + ?Sized,
        O: OutputProtocol + ?Sized,
    {
        match self.decode(iprot)? {
            Inbound::Rejected {
                method,
                sequence_id,
                exception,
            } => send_exception(oprot, &method, sequence_id, &exception),
            Inbound::Call {
                method,
                sequence_id,
                mut result,
                invocation,
            } => {
                self.execute(invocation, &mut result)?;
                send_result(oprot, &method, sequence_id, &result)
            }
        }
    }
}

fn handle_exception(
    method: &str,
    err: HandlerError,
    result: &mut Payload,
) -> Result<(), ProcessError> {
    let undeclared = |source: HandlerError| {
        tracing::error!(
            "Handler for `{}` failed with an undeclared error: {}",
            method,
            source
        );
        ProcessError::Undeclared {
            method: method.to_string(),
            source,
        }
    };

    // Pure value or void methods have nothing to match against
    if result.schema().exception_slots().next().is_none() {
        return Err(undeclared(err));
    }

    let exception = match err.downcast::<UserException>() {
        Ok(exception) => *exception,
        Err(err) => return Err(undeclared(err)),
    };

    let Some(slot) = result.schema().exception_slot_for(exception.kind()) else {
        return Err(undeclared(Box::new(exception)));
    };

    tracing::debug!(
        "`{}` raised declared exception {} into `{}`",
        method,
        exception,
        slot.name
    );

    result
        .set(slot.name, Value::Struct(exception.into_payload()))
        .map_err(|source| ProcessError::Payload {
            method: method.to_string(),
            source,
        })?;

    Ok(())
}

/// Writes an `EXCEPTION` message carrying an application exception.
pub fn send_exception<O>(
    oprot: &mut O,
    method: &str,
    sequence_id: i32,
    exception: &ApplicationException,
) -> Result<(), ProcessError>
where
    O: OutputProtocol + ?Sized,
{
    oprot.write_message_begin(&MessageIdentifier::new(
        method,
        MessageType::Exception,
        sequence_id,
    ))?;
    exception.write(oprot)?;
    oprot.write_message_end()?;
    oprot.flush()?;
    Ok(())
}

/// Writes a `REPLY` message carrying a result payload.
pub fn send_result<O>(
    oprot: &mut O,
    method: &str,
    sequence_id: i32,
    result: &Payload,
) -> Result<(), ProcessError>
where
    O: OutputProtocol + ?Sized,
{
    oprot.write_message_begin(&MessageIdentifier::new(
        method,
        MessageType::Reply,
        sequence_id,
    ))?;
    result.write(oprot)?;
    oprot.write_message_end()?;
    oprot.flush()?;
    Ok(())
}
