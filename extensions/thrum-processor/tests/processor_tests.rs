use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use thrum::message::{ApplicationException, ApplicationExceptionKind, MessageType, UserException};
use thrum::payload::{FieldSpec, FieldType, Payload, PayloadError, PayloadSchema, Value};
use thrum::protocol::loopback::{self, LoopbackInput, LoopbackOutput};
use thrum::protocol::{InputProtocol, MessageIdentifier, OutputProtocol};
use thrum_processor::{Inbound, ProcessError, Processor};
use thrum_service::{MethodDescriptor, ServiceDescription};

static OOPS_FIELDS: [FieldSpec; 1] = [FieldSpec::new(1, "why", FieldType::String)];
static OOPS: PayloadSchema = PayloadSchema::new("Oops", &OOPS_FIELDS);
static WORSE: PayloadSchema = PayloadSchema::new("Worse", &OOPS_FIELDS);

static PAIR_FIELDS: [FieldSpec; 2] = [
    FieldSpec::new(1, "a", FieldType::I32),
    FieldSpec::new(2, "b", FieldType::I32),
];
static DIV_ARGS: PayloadSchema = PayloadSchema::new("div_args", &PAIR_FIELDS);

// Two slots share a kind; the first one in schema order catches it
static DIV_RESULT_FIELDS: [FieldSpec; 4] = [
    FieldSpec::success(FieldType::I32),
    FieldSpec::exception(1, "first", &OOPS),
    FieldSpec::exception(2, "second", &OOPS),
    FieldSpec::exception(3, "worse", &WORSE),
];
static DIV_RESULT: PayloadSchema = PayloadSchema::new("div_result", &DIV_RESULT_FIELDS);

static EMPTY: PayloadSchema = PayloadSchema::new("empty", &[]);

static STORE_ARGS_FIELDS: [FieldSpec; 1] = [FieldSpec::new(1, "value", FieldType::I32)];
static STORE_ARGS: PayloadSchema = PayloadSchema::new("store_args", &STORE_ARGS_FIELDS);
static STORE_RESULT_FIELDS: [FieldSpec; 1] = [FieldSpec::exception(1, "oops", &OOPS)];
static STORE_RESULT: PayloadSchema = PayloadSchema::new("store_result", &STORE_RESULT_FIELDS);

static DIV: MethodDescriptor = MethodDescriptor::new("div", &DIV_ARGS, &DIV_RESULT);
static PING: MethodDescriptor = MethodDescriptor::new("ping", &EMPTY, &EMPTY);
static STORE: MethodDescriptor = MethodDescriptor::new("store", &STORE_ARGS, &STORE_RESULT);

static SERVICE: Lazy<ServiceDescription> =
    Lazy::new(|| ServiceDescription::new("Test", [DIV, PING, STORE]).unwrap());

/// Handler context; counts invocations so tests can tell whether a handler ran.
#[derive(Default)]
struct Counter {
    calls: AtomicUsize,
}

impl Counter {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn oops(why: &str) -> UserException {
    UserException::new(Payload::new(&OOPS).with("why", why).unwrap())
}

fn worse(why: &str) -> UserException {
    UserException::new(Payload::new(&WORSE).with("why", why).unwrap())
}

/// Client side of a processor under test.
struct Wire {
    calls: LoopbackOutput,
    replies: LoopbackInput,
}

impl Wire {
    fn send(&mut self, name: &str, message_type: MessageType, sequence_id: i32, args: &Payload) {
        self.calls
            .write_message_begin(&MessageIdentifier::new(name, message_type, sequence_id))
            .unwrap();
        args.write(&mut self.calls).unwrap();
        self.calls.write_message_end().unwrap();
        self.calls.flush().unwrap();
    }

    fn call(&mut self, name: &str, sequence_id: i32, args: &Payload) {
        self.send(name, MessageType::Call, sequence_id, args);
    }

    fn reply(&mut self, result_schema: &'static PayloadSchema) -> (MessageIdentifier, Payload) {
        let envelope = self.replies.read_message_begin().unwrap();
        let mut result = Payload::new(result_schema);
        result.read(&mut self.replies).unwrap();
        self.replies.read_message_end().unwrap();
        (envelope, result)
    }

    fn exception(&mut self) -> (MessageIdentifier, ApplicationException) {
        let envelope = self.replies.read_message_begin().unwrap();
        let exception = ApplicationException::read(&mut self.replies).unwrap();
        self.replies.read_message_end().unwrap();
        (envelope, exception)
    }

    fn nothing_replied(&mut self) -> bool {
        self.replies.try_next_token().is_none()
    }
}

/// Server side of a processor under test.
struct Server {
    iprot: LoopbackInput,
    oprot: LoopbackOutput,
}

impl Server {
    fn process(&mut self, processor: &Processor<Counter>) -> Result<(), ProcessError> {
        processor.process(&mut self.iprot, &mut self.oprot)
    }
}

fn connect() -> (Wire, Server) {
    let (calls, iprot) = loopback::pipe();
    let (oprot, replies) = loopback::pipe();
    (Wire { calls, replies }, Server { iprot, oprot })
}

fn div_args(a: i32, b: i32) -> Payload {
    Payload::new(&DIV_ARGS).with("a", a).unwrap().with("b", b).unwrap()
}

/// Registers a `div` that raises `oops` for a zero divisor and `worse` for a
/// negative one.
fn processor() -> Processor<Counter> {
    let mut processor = Processor::new(&SERVICE, Counter::default());

    processor
        .register("div", |counter: &Counter, args: Payload| {
            counter.hit();
            let a: i32 = args.require("a")?;
            let b: i32 = args.require("b")?;
            if b == 0 {
                return Err(Box::new(oops("zero")));
            }
            if b < 0 {
                return Err(Box::new(worse("negative")));
            }
            Ok(Some(Value::I32(a / b)))
        })
        .unwrap();
    processor
        .register("ping", |counter: &Counter, _args: Payload| {
            counter.hit();
            Ok(None)
        })
        .unwrap();
    processor
        .register("store", |counter: &Counter, args: Payload| {
            counter.hit();
            match args.get("value") {
                Some(Value::I32(v)) if *v > 100 => Err(Box::new(oops("too big"))),
                Some(Value::I32(v)) if *v < 0 => Err(Box::new(worse("negative"))),
                _ => Ok(None),
            }
        })
        .unwrap();

    processor
}

#[test]
fn registration_is_checked_against_the_service() {
    let mut processor = Processor::new(&SERVICE, Counter::default());
    assert_eq!(processor.missing_handlers(), ["div", "ping", "store"]);

    processor
        .register("ping", |_: &Counter, _| Ok(None))
        .unwrap();
    assert_eq!(processor.missing_handlers(), ["div", "store"]);

    assert!(matches!(
        processor.register("ping", |_: &Counter, _| Ok(None)),
        Err(ProcessError::HandlerAlreadyRegistered(ref method)) if method == "ping"
    ));
    assert!(matches!(
        processor.register("mul", |_: &Counter, _| Ok(None)),
        Err(ProcessError::UnknownMethod { ref method, .. }) if method == "mul"
    ));

    assert!(processor.service().contains("div"));
}

#[test]
fn call_reply_carries_the_success_value_and_seqid() {
    let processor = processor();
    let (mut wire, mut server) = connect();

    wire.call("div", 41, &div_args(9, 3));
    server.process(&processor).unwrap();

    let (envelope, result) = wire.reply(&DIV_RESULT);
    assert_eq!(envelope, MessageIdentifier::new("div", MessageType::Reply, 41));
    assert_eq!(result, Payload::new(&DIV_RESULT).with("success", 3).unwrap());
    assert_eq!(processor.context().count(), 1);
}

#[test]
fn unknown_method_is_answered_with_an_exception() {
    let processor = processor();
    let (mut wire, mut server) = connect();

    wire.call("mul", 7, &div_args(1, 2));
    wire.call("div", 8, &div_args(4, 2));

    server.process(&processor).unwrap();
    let (envelope, exception) = wire.exception();
    assert_eq!(envelope, MessageIdentifier::new("mul", MessageType::Exception, 7));
    assert_eq!(exception.kind(), ApplicationExceptionKind::UnknownMethod);
    assert_eq!(exception.describe(), "Unknown method");
    assert_eq!(processor.context().count(), 0);

    // The unknown call's arguments were skipped
    server.process(&processor).unwrap();
    let (_, result) = wire.reply(&DIV_RESULT);
    assert_eq!(result.get("success"), Some(&Value::I32(2)));
}

#[test]
fn declared_exception_fills_the_first_matching_slot() {
    let processor = processor();
    let (mut wire, mut server) = connect();

    wire.call("div", 1, &div_args(1, 0));
    server.process(&processor).unwrap();

    let (envelope, result) = wire.reply(&DIV_RESULT);
    assert_eq!(envelope.message_type, MessageType::Reply);
    assert!(!result.is_set("success"));
    assert!(!result.is_set("second"));
    let raised = result.get("first").and_then(Value::as_struct).unwrap();
    assert_eq!(raised.get("why"), Some(&Value::String("zero".into())));

    wire.call("div", 2, &div_args(1, -1));
    server.process(&processor).unwrap();

    let (_, result) = wire.reply(&DIV_RESULT);
    assert_eq!(result.len(), 1);
    assert!(result.get("worse").and_then(Value::as_struct).unwrap().schema().is(&WORSE));
}

#[test]
fn undeclared_error_writes_no_reply() {
    let processor = processor();
    let (mut wire, mut server) = connect();

    // `b` missing makes the handler's `require` fail
    wire.call("div", 1, &Payload::new(&DIV_ARGS).with("a", 1).unwrap());

    match server.process(&processor) {
        Err(ProcessError::Undeclared { method, source }) => {
            assert_eq!(method, "div");
            assert_eq!(
                source.downcast_ref::<PayloadError>(),
                Some(&PayloadError::MissingField {
                    schema: "div_args",
                    field: "b",
                })
            );
        }
        other => panic!("expected an undeclared error, got {other:?}"),
    }

    assert!(wire.nothing_replied());
}

#[test]
fn exception_of_an_undeclared_kind_is_undeclared() {
    let processor = processor();
    let (mut wire, mut server) = connect();

    wire.call("store", 1, &Payload::new(&STORE_ARGS).with("value", -5).unwrap());

    let err = server.process(&processor).unwrap_err();
    match err {
        ProcessError::Undeclared { source, .. } => {
            let exception = source.downcast_ref::<UserException>().unwrap();
            assert!(exception.is(&WORSE));
        }
        other => panic!("expected an undeclared error, got {other:?}"),
    }
    assert!(wire.nothing_replied());

    // A declared kind on the same method is fine
    wire.call("store", 2, &Payload::new(&STORE_ARGS).with("value", 500).unwrap());
    server.process(&processor).unwrap();
    let (_, result) = wire.reply(&STORE_RESULT);
    assert!(result.is_set("oops"));
}

#[test]
fn void_method_without_exceptions_cannot_raise() {
    let mut processor = Processor::new(&SERVICE, Counter::default());
    processor
        .register("ping", |_: &Counter, _| Err(Box::new(oops("nope"))))
        .unwrap();
    let (mut wire, mut server) = connect();

    wire.call("ping", 1, &Payload::new(&EMPTY));

    assert!(matches!(
        server.process(&processor),
        Err(ProcessError::Undeclared { .. })
    ));
    assert!(wire.nothing_replied());
}

#[test]
fn void_methods_reply_with_an_empty_result() {
    let processor = processor();
    let (mut wire, mut server) = connect();

    wire.call("ping", 5, &Payload::new(&EMPTY));
    wire.call("store", 6, &Payload::new(&STORE_ARGS).with("value", 10).unwrap());
    server.process(&processor).unwrap();
    server.process(&processor).unwrap();

    let (envelope, result) = wire.reply(&EMPTY);
    assert_eq!(envelope.sequence_number, 5);
    assert!(result.is_empty());

    let (envelope, result) = wire.reply(&STORE_RESULT);
    assert_eq!(envelope.sequence_number, 6);
    assert!(result.is_empty());
}

#[test]
fn value_returned_by_a_void_method_is_dropped() {
    let mut processor = Processor::new(&SERVICE, Counter::default());
    processor
        .register("ping", |_: &Counter, _| Ok(Some(Value::I32(1))))
        .unwrap();
    let (mut wire, mut server) = connect();

    wire.call("ping", 1, &Payload::new(&EMPTY));
    server.process(&processor).unwrap();

    let (_, result) = wire.reply(&EMPTY);
    assert!(result.is_empty());
}

#[test]
fn value_of_the_wrong_type_is_a_payload_error() {
    let mut processor = Processor::new(&SERVICE, Counter::default());
    processor
        .register("div", |_: &Counter, _| Ok(Some(Value::String("two".into()))))
        .unwrap();
    let (mut wire, mut server) = connect();

    wire.call("div", 1, &div_args(4, 2));

    assert!(matches!(
        server.process(&processor),
        Err(ProcessError::Payload { ref method, source: PayloadError::TypeMismatch { .. } })
            if method == "div"
    ));
    assert!(wire.nothing_replied());
}

#[test]
fn missing_handler_consumes_the_call_without_reply() {
    let mut processor = Processor::new(&SERVICE, Counter::default());
    processor
        .register("ping", |counter: &Counter, _| {
            counter.hit();
            Ok(None)
        })
        .unwrap();
    let (mut wire, mut server) = connect();

    wire.call("div", 1, &div_args(1, 1));
    wire.call("ping", 2, &Payload::new(&EMPTY));

    assert!(matches!(
        server.process(&processor),
        Err(ProcessError::HandlerNotRegistered(ref method)) if method == "div"
    ));
    assert!(wire.nothing_replied());

    server.process(&processor).unwrap();
    let (envelope, _) = wire.reply(&EMPTY);
    assert_eq!(envelope.name, "ping");
    assert_eq!(processor.context().count(), 1);
}

#[test]
fn non_call_messages_are_dispatched_as_calls() {
    let processor = processor();
    let (mut wire, mut server) = connect();

    wire.send("ping", MessageType::Oneway, 3, &Payload::new(&EMPTY));
    server.process(&processor).unwrap();

    let (envelope, _) = wire.reply(&EMPTY);
    assert_eq!(envelope, MessageIdentifier::new("ping", MessageType::Reply, 3));
    assert_eq!(processor.context().count(), 1);
}

#[test]
fn decode_and_execute_can_run_separately() {
    let processor = processor();
    let (mut wire, mut server) = connect();

    wire.call("div", 12, &div_args(10, 5));

    let inbound = processor.decode(&mut server.iprot).unwrap();
    assert_eq!(inbound.method(), "div");
    assert_eq!(inbound.sequence_id(), 12);

    let Inbound::Call {
        mut result,
        invocation,
        ..
    } = inbound
    else {
        panic!("expected a decoded call");
    };
    assert_eq!(invocation.method(), "div");
    assert_eq!(invocation.args(), &div_args(10, 5));

    processor.execute(invocation, &mut result).unwrap();
    assert_eq!(result.get("success"), Some(&Value::I32(2)));
    assert_eq!(processor.context().count(), 1);
}

#[test]
fn closed_input_is_a_disconnect() {
    let processor = processor();
    let (wire, mut server) = connect();
    drop(wire);

    let err = server.process(&processor).unwrap_err();
    assert!(err.is_disconnect());
}
