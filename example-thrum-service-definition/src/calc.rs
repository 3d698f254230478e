use once_cell::sync::Lazy;
use thrum::message::{ApplicationException, ApplicationExceptionKind, UserException};
use thrum::payload::{FieldSpec, FieldType, Payload, PayloadError, PayloadSchema, Value};
use thrum::protocol::{InputProtocol, OutputProtocol};
use thrum_client::{CallArgs, CallError, Client, ClientOptions};
use thrum_processor::{HandlerError, ProcessError, Processor};
use thrum_service::{MethodDescriptor, ServiceDescription};

// --- Exceptions ---

static DIV_BY_ZERO_FIELDS: [FieldSpec; 1] = [FieldSpec::new(1, "message", FieldType::String)];
pub static DIV_BY_ZERO: PayloadSchema = PayloadSchema::new("DivByZero", &DIV_BY_ZERO_FIELDS);

static MEMORY_FULL_FIELDS: [FieldSpec; 1] = [FieldSpec::new(1, "capacity", FieldType::I32)];
pub static MEMORY_FULL: PayloadSchema = PayloadSchema::new("MemoryFull", &MEMORY_FULL_FIELDS);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivByZero {
    pub message: Option<String>,
}

impl DivByZero {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn into_exception(self) -> Result<UserException, PayloadError> {
        let mut payload = Payload::new(&DIV_BY_ZERO);
        if let Some(message) = self.message {
            payload.set("message", message)?;
        }
        Ok(UserException::new(payload))
    }

    pub fn from_exception(exception: &UserException) -> Option<Self> {
        if !exception.is(&DIV_BY_ZERO) {
            return None;
        }
        Some(Self {
            message: exception
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFull {
    pub capacity: Option<i32>,
}

impl MemoryFull {
    pub fn into_exception(self) -> Result<UserException, PayloadError> {
        let mut payload = Payload::new(&MEMORY_FULL);
        if let Some(capacity) = self.capacity {
            payload.set("capacity", capacity)?;
        }
        Ok(UserException::new(payload))
    }

    pub fn from_exception(exception: &UserException) -> Option<Self> {
        if !exception.is(&MEMORY_FULL) {
            return None;
        }
        Some(Self {
            capacity: match exception.get("capacity") {
                Some(Value::I32(capacity)) => Some(*capacity),
                _ => None,
            },
        })
    }
}

// --- Method schemas ---

static BINARY_I32_ARGS_FIELDS: [FieldSpec; 2] = [
    FieldSpec::new(1, "a", FieldType::I32),
    FieldSpec::new(2, "b", FieldType::I32),
];
pub static ADD_ARGS: PayloadSchema = PayloadSchema::new("add_args", &BINARY_I32_ARGS_FIELDS);
pub static DIV_ARGS: PayloadSchema = PayloadSchema::new("div_args", &BINARY_I32_ARGS_FIELDS);

static I32_RESULT_FIELDS: [FieldSpec; 1] = [FieldSpec::success(FieldType::I32)];
pub static ADD_RESULT: PayloadSchema = PayloadSchema::new("add_result", &I32_RESULT_FIELDS);
pub static RECALL_RESULT: PayloadSchema = PayloadSchema::new("recall_result", &I32_RESULT_FIELDS);

static DIV_RESULT_FIELDS: [FieldSpec; 2] = [
    FieldSpec::success(FieldType::I32),
    FieldSpec::exception(1, "divByZero", &DIV_BY_ZERO),
];
pub static DIV_RESULT: PayloadSchema = PayloadSchema::new("div_result", &DIV_RESULT_FIELDS);

pub static PING_ARGS: PayloadSchema = PayloadSchema::new("ping_args", &[]);
pub static PING_RESULT: PayloadSchema = PayloadSchema::new("ping_result", &[]);

static REMEMBER_ARGS_FIELDS: [FieldSpec; 1] = [FieldSpec::new(1, "value", FieldType::I32)];
pub static REMEMBER_ARGS: PayloadSchema =
    PayloadSchema::new("remember_args", &REMEMBER_ARGS_FIELDS);

static REMEMBER_RESULT_FIELDS: [FieldSpec; 1] =
    [FieldSpec::exception(1, "memoryFull", &MEMORY_FULL)];
pub static REMEMBER_RESULT: PayloadSchema =
    PayloadSchema::new("remember_result", &REMEMBER_RESULT_FIELDS);

pub static RECALL_ARGS: PayloadSchema = PayloadSchema::new("recall_args", &[]);

static SUM_ARGS_FIELDS: [FieldSpec; 1] =
    [FieldSpec::new(1, "values", FieldType::List(&FieldType::I32))];
pub static SUM_ARGS: PayloadSchema = PayloadSchema::new("sum_args", &SUM_ARGS_FIELDS);

static SUM_RESULT_FIELDS: [FieldSpec; 1] = [FieldSpec::success(FieldType::I64)];
pub static SUM_RESULT: PayloadSchema = PayloadSchema::new("sum_result", &SUM_RESULT_FIELDS);

pub static ADD: MethodDescriptor = MethodDescriptor::new("add", &ADD_ARGS, &ADD_RESULT);
pub static DIV: MethodDescriptor = MethodDescriptor::new("div", &DIV_ARGS, &DIV_RESULT);
pub static PING: MethodDescriptor = MethodDescriptor::new("ping", &PING_ARGS, &PING_RESULT);
pub static REMEMBER: MethodDescriptor =
    MethodDescriptor::new("remember", &REMEMBER_ARGS, &REMEMBER_RESULT);
pub static RECALL: MethodDescriptor =
    MethodDescriptor::new("recall", &RECALL_ARGS, &RECALL_RESULT);
pub static SUM: MethodDescriptor = MethodDescriptor::new("sum", &SUM_ARGS, &SUM_RESULT);

pub static CALC_SERVICE: Lazy<ServiceDescription> = Lazy::new(|| {
    ServiceDescription::new("Calc", [ADD, DIV, PING, REMEMBER, RECALL, SUM])
        .expect("generated Calc schemas are well formed")
});

// --- Client ---

fn required<T>(value: Option<Value>) -> Result<T, CallError>
where
    T: TryFrom<Value, Error = thrum::payload::ValueTypeError>,
{
    let value = value.ok_or_else(|| {
        CallError::Application(ApplicationException::new(
            ApplicationExceptionKind::MissingResult,
        ))
    })?;
    Ok(T::try_from(value)?)
}

/// Typed facade over [`Client`] with one method per `Calc` operation.
pub struct CalcClient<I, O> {
    inner: Client<I, O>,
}

impl<I, O> CalcClient<I, O>
where
    I: InputProtocol,
    O: OutputProtocol,
{
    pub fn new(iprot: I, oprot: O) -> Self {
        Self {
            inner: Client::new(&CALC_SERVICE, iprot, oprot),
        }
    }

    pub fn with_options(iprot: I, oprot: O, options: ClientOptions) -> Self {
        Self {
            inner: Client::with_options(&CALC_SERVICE, iprot, oprot, options),
        }
    }

    pub fn inner(&mut self) -> &mut Client<I, O> {
        &mut self.inner
    }

    pub fn add(&mut self, a: i32, b: i32) -> Result<i32, CallError> {
        required(self.inner.call("add", CallArgs::new().arg(a).arg(b))?)
    }

    pub fn div(&mut self, a: i32, b: i32) -> Result<i32, CallError> {
        required(self.inner.call("div", CallArgs::new().arg(a).arg(b))?)
    }

    pub fn ping(&mut self) -> Result<(), CallError> {
        self.inner.call("ping", CallArgs::new())?;
        Ok(())
    }

    pub fn remember(&mut self, value: i32) -> Result<(), CallError> {
        self.inner.call("remember", CallArgs::new().arg(value))?;
        Ok(())
    }

    pub fn recall(&mut self) -> Result<i32, CallError> {
        required(self.inner.call("recall", CallArgs::new())?)
    }

    pub fn sum(&mut self, values: &[i32]) -> Result<i64, CallError> {
        let values = Value::List(values.iter().copied().map(Value::I32).collect());
        required(self.inner.call("sum", CallArgs::new().arg(values))?)
    }
}

// --- Processor ---

/// Server-side implementation of `Calc`.
///
/// Declared exceptions are returned as the boxed [`UserException`] of the
/// matching exception struct, e.g. `DivByZero::new(..).into_exception()`.
pub trait CalcHandler: Send + Sync + 'static {
    fn add(&self, a: i32, b: i32) -> Result<i32, HandlerError>;
    fn div(&self, a: i32, b: i32) -> Result<i32, HandlerError>;
    fn ping(&self) -> Result<(), HandlerError>;
    fn remember(&self, value: i32) -> Result<(), HandlerError>;

    /// `None` leaves the success slot empty.
    fn recall(&self) -> Result<Option<i32>, HandlerError>;

    fn sum(&self, values: Vec<i32>) -> Result<i64, HandlerError>;
}

/// Builds a processor with every `Calc` method routed to `handler`.
pub fn calc_processor<H: CalcHandler>(handler: H) -> Result<Processor<H>, ProcessError> {
    let mut processor = Processor::new(&CALC_SERVICE, handler);

    processor.register("add", |h: &H, args: Payload| {
        Ok(Some(h.add(args.require("a")?, args.require("b")?)?.into()))
    })?;
    processor.register("div", |h: &H, args: Payload| {
        Ok(Some(h.div(args.require("a")?, args.require("b")?)?.into()))
    })?;
    processor.register("ping", |h: &H, _args: Payload| {
        h.ping()?;
        Ok(None)
    })?;
    processor.register("remember", |h: &H, args: Payload| {
        h.remember(args.require("value")?)?;
        Ok(None)
    })?;
    processor.register("recall", |h: &H, _args: Payload| {
        Ok(h.recall()?.map(Value::from))
    })?;
    processor.register("sum", |h: &H, args: Payload| {
        let values = match args.get("values") {
            Some(Value::List(items)) => items
                .iter()
                .cloned()
                .map(i32::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(PayloadError::MissingField {
                    schema: args.schema().name,
                    field: "values",
                }
                .into());
            }
        };
        Ok(Some(h.sum(values)?.into()))
    })?;

    Ok(processor)
}
