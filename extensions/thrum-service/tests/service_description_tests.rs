use thrum::payload::{FieldSpec, FieldType, PayloadSchema, SchemaError};
use thrum_service::{MethodDescriptor, ServiceDescription, ServiceError, thrum_method_id};

static PAIR_FIELDS: [FieldSpec; 2] = [
    FieldSpec::new(1, "a", FieldType::I32),
    FieldSpec::new(2, "b", FieldType::I32),
];
static PAIR_ARGS: PayloadSchema = PayloadSchema::new("pair_args", &PAIR_FIELDS);

static I32_RESULT_FIELDS: [FieldSpec; 1] = [FieldSpec::success(FieldType::I32)];
static I32_RESULT: PayloadSchema = PayloadSchema::new("i32_result", &I32_RESULT_FIELDS);

static EMPTY: PayloadSchema = PayloadSchema::new("empty", &[]);

static BAD_ARGS_FIELDS: [FieldSpec; 1] = [FieldSpec::new(0, "oops", FieldType::I32)];
static BAD_ARGS: PayloadSchema = PayloadSchema::new("bad_args", &BAD_ARGS_FIELDS);

static ADD: MethodDescriptor = MethodDescriptor::new("add", &PAIR_ARGS, &I32_RESULT);
static SUB: MethodDescriptor = MethodDescriptor::new("sub", &PAIR_ARGS, &I32_RESULT);
static PING: MethodDescriptor = MethodDescriptor::new("ping", &EMPTY, &EMPTY);

#[test]
fn methods_are_found_by_name_and_id() {
    let service = ServiceDescription::new("Calc", [ADD, SUB, PING]).unwrap();

    assert_eq!(service.name(), "Calc");
    assert_eq!(service.len(), 3);
    assert!(service.contains("add"));
    assert!(!service.contains("mul"));
    assert!(service.method("mul").is_none());

    let add = service.method("add").unwrap();
    assert_eq!(add.name, "add");
    assert!(add.args.is(&PAIR_ARGS));
    assert_eq!(add.id(), thrum_method_id!("add"));

    let by_id = service.method_by_id(thrum_method_id!("sub")).unwrap();
    assert_eq!(by_id.name, "sub");
}

#[test]
fn method_names_follow_declaration_order() {
    let service = ServiceDescription::new("Calc", [PING, SUB, ADD]).unwrap();

    let names: Vec<&str> = service.method_names().collect();
    assert_eq!(names, ["ping", "sub", "add"]);

    let ids: Vec<u64> = service.methods().map(MethodDescriptor::id).collect();
    assert_eq!(ids, [PING.id(), SUB.id(), ADD.id()]);
}

#[test]
fn void_methods_have_no_success_slot() {
    assert!(PING.is_void());
    assert!(!ADD.is_void());
}

#[test]
fn fresh_payloads_come_from_the_method_schemas() {
    let service = ServiceDescription::new("Calc", [ADD]).unwrap();

    let args = service.new_args("add").unwrap();
    assert!(args.schema().is(&PAIR_ARGS));
    assert!(args.is_empty());

    let result = service.new_result("add").unwrap();
    assert!(result.schema().is(&I32_RESULT));

    assert!(service.new_args("sub").is_none());
}

#[test]
fn duplicate_methods_are_rejected() {
    let err = ServiceDescription::new("Calc", [ADD, PING, ADD]).unwrap_err();

    assert_eq!(
        err,
        ServiceError::DuplicateMethod {
            service: "Calc".to_string(),
            method: "add",
        }
    );
}

#[test]
fn malformed_schemas_are_rejected_at_load() {
    let bad = MethodDescriptor::new("bad", &BAD_ARGS, &EMPTY);
    let err = ServiceDescription::new("Calc", [ADD, bad]).unwrap_err();

    assert_eq!(
        err,
        ServiceError::Schema {
            service: "Calc".to_string(),
            method: "bad",
            source: SchemaError::ReservedFieldId {
                schema: "bad_args",
                field: "oops",
            },
        }
    );

    // A request schema is not a valid result schema
    let swapped = MethodDescriptor::new("swapped", &EMPTY, &PAIR_ARGS);
    assert!(matches!(
        ServiceDescription::new("Calc", [swapped]),
        Err(ServiceError::Schema {
            source: SchemaError::PlainResultField { .. },
            ..
        })
    ));
}

#[test]
fn method_ids_are_stable_compile_time_constants() {
    const ADD_ID: u64 = thrum_method_id!("add");

    assert_eq!(ADD_ID, ADD.id());
    assert_ne!(thrum_method_id!("add"), thrum_method_id!("sub"));
    assert_eq!(thrum_service::method_id_hash("ping"), PING.id());
}

#[test]
fn empty_service_is_allowed() {
    let service = ServiceDescription::new("Nothing", Vec::<MethodDescriptor>::new()).unwrap();

    assert!(service.is_empty());
    assert_eq!(service.method_names().count(), 0);
}
