use crate::{CallArgs, CallError, ClientOptions, ReplyValidation};
use thrum::message::{
    ApplicationException, ApplicationExceptionKind, MessageType, UserException,
};
use thrum::payload::{Payload, Value};
use thrum::protocol::{InputProtocol, MessageIdentifier, OutputProtocol, TType};
use thrum_service::{MethodDescriptor, ServiceDescription};

/// Turns method invocations into `CALL` messages and interprets the
/// matching `REPLY` or `EXCEPTION`.
///
/// A client owns its sequence counter and both protocol halves. Calls are
/// strictly sequential: a new call may only start once the previous reply
/// has been fully read, and one client must not be shared by concurrent
/// callers without outside synchronization.
pub struct Client<I, O> {
    service: &'static ServiceDescription,
    iprot: I,
    oprot: O,
    next_sequence_id: i32,
    options: ClientOptions,
}

impl<I, O> Client<I, O>
where
    I: InputProtocol,
    O: OutputProtocol,
{
    pub fn new(service: &'static ServiceDescription, iprot: I, oprot: O) -> Self {
        Self::with_options(service, iprot, oprot, ClientOptions::default())
    }

    pub fn with_options(
        service: &'static ServiceDescription,
        iprot: I,
        oprot: O,
        options: ClientOptions,
    ) -> Self {
        Self {
            service,
            iprot,
            oprot,
            next_sequence_id: options.initial_sequence_id,
            options,
        }
    }

    pub fn service(&self) -> &'static ServiceDescription {
        self.service
    }

    /// Names of the methods this client can call.
    pub fn method_names(&self) -> impl Iterator<Item = &'static str> {
        self.service.method_names()
    }

    /// The sequence id the next call will carry.
    pub fn sequence_id(&self) -> i32 {
        self.next_sequence_id
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn into_inner(self) -> (I, O) {
        (self.iprot, self.oprot)
    }

    /// Calls `method` and waits for its reply.
    ///
    /// Returns the success value, `None` for a void method, or the failure:
    /// a declared exception, an application exception, or a codec error.
    pub fn call(&mut self, method: &str, args: CallArgs) -> Result<Option<Value>, CallError> {
        let sequence_id = self.send_call(method, args)?;
        self.recv_reply(method, sequence_id)
    }

    fn descriptor(&self, method: &str) -> Result<MethodDescriptor, CallError> {
        self.service
            .method(method)
            .copied()
            .ok_or_else(|| CallError::UnknownMethod {
                service: self.service.name().to_string(),
                method: method.to_string(),
            })
    }

    /// Binds the arguments, writes the `CALL` message and flushes it.
    /// Returns the sequence id the call was sent with.
    pub fn send_call(&mut self, method: &str, args: CallArgs) -> Result<i32, CallError> {
        let descriptor = self.descriptor(method)?;
        let request = args.bind(&descriptor)?;

        let sequence_id = self.next_sequence_id;
        self.next_sequence_id = sequence_id.wrapping_add(1);

        tracing::debug!(
            "Calling {}.{} (seqid {}): {}",
            self.service.name(),
            method,
            sequence_id,
            request
        );

        self.oprot.write_message_begin(&MessageIdentifier::new(
            method,
            MessageType::Call,
            sequence_id,
        ))?;
        request.write(&mut self.oprot)?;
        self.oprot.write_message_end()?;
        self.oprot.flush()?;

        Ok(sequence_id)
    }

    /// Reads the reply to a call previously sent with [`Client::send_call`].
    pub fn recv_reply(
        &mut self,
        method: &str,
        sequence_id: i32,
    ) -> Result<Option<Value>, CallError> {
        let descriptor = self.descriptor(method)?;
        let envelope = self.iprot.read_message_begin()?;

        tracing::trace!(
            "Reply envelope for {} (seqid {}): {:?}",
            method,
            sequence_id,
            envelope
        );

        if !envelope.message_type.is_response() {
            self.drain_message()?;
            return Err(ApplicationException::with_message(
                ApplicationExceptionKind::InvalidMessageType,
                format!(
                    "expected REPLY or EXCEPTION for `{}`, got {}",
                    method, envelope.message_type
                ),
            )
            .into());
        }

        self.check_envelope(method, sequence_id, &envelope)?;

        if envelope.message_type == MessageType::Exception {
            let exception = ApplicationException::read(&mut self.iprot)?;
            self.iprot.read_message_end()?;
            tracing::debug!("{} raised application exception: {}", method, exception);
            return Err(exception.into());
        }

        let mut result = descriptor.new_result();
        result.read(&mut self.iprot)?;
        self.iprot.read_message_end()?;

        interpret_result(result)
    }

    /// Compares the reply envelope with the call it answers.
    fn check_envelope(
        &mut self,
        method: &str,
        sequence_id: i32,
        envelope: &MessageIdentifier,
    ) -> Result<(), CallError> {
        let mismatch = if envelope.name != method {
            Some(ApplicationException::with_message(
                ApplicationExceptionKind::WrongMethodName,
                format!("called `{}`, reply is for `{}`", method, envelope.name),
            ))
        } else if envelope.sequence_number != sequence_id {
            Some(ApplicationException::with_message(
                ApplicationExceptionKind::BadSequenceId,
                format!(
                    "called with seqid {}, reply has seqid {}",
                    sequence_id, envelope.sequence_number
                ),
            ))
        } else {
            None
        };

        let Some(mismatch) = mismatch else {
            return Ok(());
        };

        match self.options.reply_validation {
            ReplyValidation::Lenient => {
                tracing::warn!("Interpreting mismatched reply anyway: {}", mismatch);
                Ok(())
            }
            ReplyValidation::Strict => {
                self.drain_message()?;
                Err(mismatch.into())
            }
        }
    }

    /// Discards the body of the current message so the stream stays aligned.
    fn drain_message(&mut self) -> Result<(), CallError> {
        self.iprot.skip(TType::Struct)?;
        self.iprot.read_message_end()?;
        Ok(())
    }
}

/// Maps a decoded result payload to the outcome of the call.
fn interpret_result(mut result: Payload) -> Result<Option<Value>, CallError> {
    let schema = result.schema();
    let success = schema.success_slot();

    if let Some(value) = success.and_then(|slot| result.take(slot.name)) {
        return Ok(Some(value));
    }

    // Void method without declared exceptions
    if schema.is_empty() {
        return Ok(None);
    }

    for slot in schema.exception_slots() {
        if let Some(Value::Struct(payload)) = result.take(slot.name) {
            return Err(UserException::new(payload).into());
        }
    }

    if success.is_some() {
        return Err(ApplicationException::new(ApplicationExceptionKind::MissingResult).into());
    }

    Ok(None)
}
