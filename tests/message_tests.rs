use thrum::message::{
    APPLICATION_EXCEPTION_SCHEMA, ApplicationException, ApplicationExceptionKind, MessageType,
    UserException,
};
use thrum::payload::{FieldSpec, FieldType, Payload, PayloadSchema, Value};
use thrum::protocol::loopback;
use thrum::protocol::{OutputProtocol, TType};

#[test]
fn message_type_codes() {
    assert_eq!(MessageType::Call.value(), 1);
    assert_eq!(MessageType::Reply.value(), 2);
    assert_eq!(MessageType::Exception.value(), 3);
    assert_eq!(MessageType::Oneway.value(), 4);

    assert_eq!(MessageType::try_from(2u8).unwrap(), MessageType::Reply);
    assert!(MessageType::try_from(0u8).is_err());
    assert!(MessageType::try_from(5u8).is_err());

    assert!(MessageType::Reply.is_response());
    assert!(MessageType::Exception.is_response());
    assert!(!MessageType::Call.is_response());
    assert!(!MessageType::Oneway.is_response());

    assert_eq!(MessageType::Oneway.to_string(), "ONEWAY");
}

#[test]
fn wire_type_codes() {
    assert_eq!(TType::Stop.value(), 0);
    assert_eq!(TType::I08.value(), 3);
    assert_eq!(TType::String.value(), 11);
    assert_eq!(TType::Utf16.value(), 17);
    assert_eq!(TType::try_from(15u8).unwrap(), TType::List);
    assert!(TType::try_from(5u8).is_err());
    assert_eq!(TType::I08.to_string(), "BYTE");
}

#[test]
fn application_exception_kind_codes() {
    use ApplicationExceptionKind::*;

    let expected = [
        (Unknown, 0),
        (UnknownMethod, 1),
        (InvalidMessageType, 2),
        (WrongMethodName, 3),
        (BadSequenceId, 4),
        (MissingResult, 5),
        (InternalError, 6),
        (ProtocolError, 7),
    ];
    for (kind, code) in expected {
        assert_eq!(kind.code(), code);
        assert_eq!(ApplicationExceptionKind::from(code), kind);
    }

    // Codes nobody knows still decode
    assert_eq!(ApplicationExceptionKind::from(42), Unknown);
}

#[test]
fn application_exception_default_texts() {
    let describe = |kind| ApplicationException::new(kind).describe().to_string();

    assert_eq!(describe(ApplicationExceptionKind::UnknownMethod), "Unknown method");
    assert_eq!(
        describe(ApplicationExceptionKind::InvalidMessageType),
        "Invalid message type"
    );
    assert_eq!(
        describe(ApplicationExceptionKind::WrongMethodName),
        "Wrong method name"
    );
    assert_eq!(describe(ApplicationExceptionKind::BadSequenceId), "Bad sequence ID");
    assert_eq!(describe(ApplicationExceptionKind::MissingResult), "Missing result");

    for kind in [
        ApplicationExceptionKind::Unknown,
        ApplicationExceptionKind::InternalError,
        ApplicationExceptionKind::ProtocolError,
    ] {
        assert_eq!(describe(kind), "Default (unknown) ApplicationException");
    }
}

#[test]
fn application_exception_message_overrides_default() {
    let exception =
        ApplicationException::with_message(ApplicationExceptionKind::BadSequenceId, "seqid 9");
    assert_eq!(exception.message(), Some("seqid 9"));
    assert_eq!(exception.describe(), "seqid 9");
    assert_eq!(exception.to_string(), "seqid 9");

    // An empty message counts as no message
    let exception = ApplicationException::with_message(ApplicationExceptionKind::MissingResult, "");
    assert_eq!(exception.message(), None);
    assert_eq!(exception.describe(), "Missing result");
}

#[test]
fn application_exception_round_trips() {
    for exception in [
        ApplicationException::new(ApplicationExceptionKind::UnknownMethod),
        ApplicationException::with_message(ApplicationExceptionKind::InternalError, "boom"),
    ] {
        let (mut output, mut input) = loopback::pipe();
        exception.write(&mut output).unwrap();
        output.flush().unwrap();

        assert_eq!(ApplicationException::read(&mut input).unwrap(), exception);
    }
}

#[test]
fn application_exception_payload_shape() {
    let payload =
        ApplicationException::with_message(ApplicationExceptionKind::WrongMethodName, "nope")
            .to_payload();

    assert!(payload.schema().is(&APPLICATION_EXCEPTION_SCHEMA));
    assert_eq!(payload.get("message"), Some(&Value::String("nope".into())));
    assert_eq!(payload.get("type"), Some(&Value::I32(3)));

    // Missing type decodes as `Unknown`
    let bare = Payload::new(&APPLICATION_EXCEPTION_SCHEMA);
    assert_eq!(
        ApplicationException::from_payload(&bare).kind(),
        ApplicationExceptionKind::Unknown
    );

    let unknown_code = Payload::new(&APPLICATION_EXCEPTION_SCHEMA)
        .with("type", 99)
        .unwrap();
    assert_eq!(
        ApplicationException::from_payload(&unknown_code).kind(),
        ApplicationExceptionKind::Unknown
    );
}

static OOPS_FIELDS: [FieldSpec; 1] = [FieldSpec::new(1, "why", FieldType::String)];
static OOPS: PayloadSchema = PayloadSchema::new("Oops", &OOPS_FIELDS);
static OTHER: PayloadSchema = PayloadSchema::new("Other", &OOPS_FIELDS);

#[test]
fn user_exception_carries_its_kind() {
    let exception = UserException::new(Payload::new(&OOPS).with("why", "because").unwrap());

    assert!(exception.kind().is(&OOPS));
    assert!(exception.is(&OOPS));
    assert!(!exception.is(&OTHER));
    assert_eq!(exception.get("why").and_then(Value::as_str), Some("because"));
    assert_eq!(exception.to_string(), "Oops(why=\"because\")");

    // Survives boxing as a handler error
    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(exception.clone());
    let recovered = boxed.downcast::<UserException>().unwrap();
    assert_eq!(*recovered, exception);
}
