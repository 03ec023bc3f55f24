use calculator_service::{CALCULATOR_WSDL, DIRECTORY_WSDL};
use mock_transport::{Deadline, MockTransport};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wsdyn_core::{DynamicProxy, InvokeError, TransportError};

mod mock_transport;

fn calculator(transport: MockTransport) -> DynamicProxy<wsdyn_core::client::Online<MockTransport>> {
    DynamicProxy::new(CALCULATOR_WSDL, transport).expect("Failed to parse description")
}

fn directory(transport: MockTransport) -> DynamicProxy<wsdyn_core::client::Online<MockTransport>> {
    DynamicProxy::new(DIRECTORY_WSDL, transport).expect("Failed to parse description")
}

#[tokio::test]
async fn test_invoke_add() {
    let proxy = calculator(MockTransport::summing());

    let result = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap();

    assert_eq!(result, json!(5));
}

#[tokio::test]
async fn test_arguments_reach_transport_in_declared_order() {
    let proxy = calculator(MockTransport::summing());

    proxy
        .invoke("Calculator", "Add", vec![json!(7), json!(-1)])
        .await
        .unwrap();

    let calls = proxy.transport().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].service, "Calculator");
    assert_eq!(calls[0].operation.name, "Add");
    assert_eq!(
        calls[0].arguments,
        vec![("a".to_string(), json!(7)), ("b".to_string(), json!(-1))]
    );
}

#[tokio::test]
async fn test_unknown_operation() {
    let proxy = calculator(MockTransport::summing());

    let err = proxy
        .invoke("Calculator", "Subtract", vec![json!(1), json!(2)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InvokeError::OperationNotFound { ref service, ref operation }
            if service == "Calculator" && operation == "Subtract"
    ));
    assert!(proxy.transport().calls().is_empty());
}

#[tokio::test]
async fn test_unknown_service() {
    let proxy = calculator(MockTransport::summing());

    let err = proxy
        .invoke("Calc", "Add", vec![json!(1), json!(2)])
        .await
        .unwrap_err();

    assert!(matches!(err, InvokeError::ServiceNotFound(ref name) if name == "Calc"));
}

#[tokio::test]
async fn test_arity_mismatch() {
    let proxy = calculator(MockTransport::summing());

    let err = proxy
        .invoke("Calculator", "Add", vec![json!(2)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InvokeError::ArityMismatch {
            expected: 2,
            got: 1
        }
    ));
    assert!(proxy.transport().calls().is_empty());

    let err = proxy
        .invoke("Calculator", "Add", vec![json!(1), json!(2), json!(3)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvokeError::ArityMismatch {
            expected: 2,
            got: 3
        }
    ));
}

#[tokio::test]
async fn test_type_mismatch() {
    let proxy = calculator(MockTransport::summing());

    let err = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!("three")])
        .await
        .unwrap_err();

    match err {
        InvokeError::TypeMismatch {
            parameter,
            expected,
            actual,
        } => {
            assert_eq!(parameter, "b");
            assert_eq!(expected, "int");
            assert_eq!(actual, "string");
        }
        other => panic!("Expected TypeMismatch, got {other:?}"),
    }
    assert!(proxy.transport().calls().is_empty());
}

#[tokio::test]
async fn test_int_out_of_range() {
    let proxy = calculator(MockTransport::summing());

    let err = proxy
        .invoke("Calculator", "Add", vec![json!(i64::MAX), json!(1)])
        .await
        .unwrap_err();

    assert!(matches!(err, InvokeError::TypeMismatch { ref parameter, .. } if parameter == "a"));
}

#[tokio::test]
async fn test_textual_result_is_coerced() {
    // Text based transports hand back strings
    let proxy = calculator(MockTransport::returning(json!("5")));

    let result = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap();

    assert_eq!(result, json!(5));
}

#[tokio::test]
async fn test_result_decode_error() {
    let proxy = calculator(MockTransport::returning(json!("five")));

    let err = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InvokeError::ResultDecodeError { ref operation, ref expected, .. }
            if operation == "Add" && expected == "int"
    ));
}

#[tokio::test]
async fn test_echo_round_trip() {
    let proxy = directory(MockTransport::echo());

    let result = proxy
        .invoke("Math", "Multiply", vec![json!(1.5), json!(2.0)])
        .await
        .unwrap();

    assert_eq!(result, json!(1.5));
}

#[tokio::test]
async fn test_nested_type_mismatch_reports_path() {
    let proxy = directory(MockTransport::returning(json!(null)));

    let person = json!({
        "name": "Ada",
        "age": 36,
        "addresses": [
            { "street": "Main St", "zip": "12345" },
            { "street": "Side St", "zip": 12345 }
        ]
    });

    let err = proxy
        .invoke("People", "SavePerson", vec![person])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InvokeError::TypeMismatch { ref parameter, .. } if parameter == "person.addresses[1].zip"
    ));
}

#[tokio::test]
async fn test_missing_and_unknown_fields() {
    let proxy = directory(MockTransport::returning(json!(null)));

    let err = proxy
        .invoke("People", "SavePerson", vec![json!({ "name": "Ada" })])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvokeError::TypeMismatch { ref parameter, .. } if parameter == "person.age"
    ));

    let err = proxy
        .invoke(
            "People",
            "SavePerson",
            vec![json!({ "name": "Ada", "age": 36, "nickname": "Countess" })],
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvokeError::TypeMismatch { ref parameter, .. } if parameter == "person.nickname"
    ));
}

#[tokio::test]
async fn test_complex_arguments_are_arranged() {
    let proxy = directory(MockTransport::returning(json!(null)));

    let result = proxy
        .invoke(
            "People",
            "SavePerson",
            vec![json!({ "age": 36, "email": null, "name": "Ada" })],
        )
        .await
        .unwrap();

    // Void operations always yield null
    assert_eq!(result, json!(null));

    let calls = proxy.transport().calls();
    let person = calls[0].argument("person").unwrap().as_object().unwrap();
    let keys: Vec<_> = person.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "age", "email"]);
}

#[tokio::test]
async fn test_optional_parameter_accepts_null() {
    let proxy = directory(MockTransport::returning(json!([])));

    let result = proxy
        .invoke("People", "FindPeople", vec![json!("A"), json!(null)])
        .await
        .unwrap();

    assert_eq!(result, json!([]));

    let err = proxy
        .invoke("People", "FindPeople", vec![json!(null), json!(null)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvokeError::TypeMismatch { ref parameter, ref actual, .. }
            if parameter == "prefix" && actual == "null"
    ));
}

#[tokio::test]
async fn test_array_result_is_coerced() {
    // A single repeated element decodes as an object, not as a one element array
    let proxy = directory(MockTransport::returning(json!({
        "name": "Ada",
        "age": "36",
        "addresses": { "street": "Main St", "zip": "12345" }
    })));

    let result = proxy
        .invoke("People", "FindPeople", vec![json!("A"), json!("Active")])
        .await
        .unwrap();

    assert_eq!(
        result,
        json!([{
            "name": "Ada",
            "age": 36,
            "addresses": [{ "street": "Main St", "zip": "12345" }]
        }])
    );
}

#[tokio::test]
async fn test_transport_failures_are_preserved() {
    let proxy = calculator(MockTransport::failing(|| TransportError::Fault {
        code: "soap:Server".to_string(),
        message: "Division by zero".to_string(),
    }));

    let err = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InvokeError::Transport(TransportError::Fault { ref message, .. }) if message == "Division by zero"
    ));
    // No retries
    assert_eq!(proxy.transport().calls().len(), 1);
}

#[tokio::test]
async fn test_cancellation_is_distinct() {
    let proxy = calculator(MockTransport::failing(|| TransportError::Cancelled));

    let err = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap_err();

    assert!(matches!(err, InvokeError::Transport(TransportError::Cancelled)));
}

#[tokio::test]
async fn test_timeout_is_distinct() {
    let transport = Deadline {
        inner: MockTransport::summing().with_delay(Duration::from_secs(5)),
        timeout: Duration::from_millis(20),
    };
    let proxy = DynamicProxy::new(CALCULATOR_WSDL, transport).unwrap();

    let err = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap_err();

    assert!(matches!(err, InvokeError::Transport(TransportError::Timeout)));
}

#[tokio::test]
async fn test_concurrent_invocations() {
    let proxy = Arc::new(calculator(
        MockTransport::summing().with_delay(Duration::from_millis(10)),
    ));

    let handles: Vec<_> = (0..16)
        .map(|n| {
            let proxy = Arc::clone(&proxy);
            tokio::spawn(async move {
                proxy
                    .invoke("Calculator", "Add", vec![json!(n), json!(n)])
                    .await
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result, json!(2 * n));
    }

    assert_eq!(proxy.transport().calls().len(), 16);
    assert_eq!(proxy.list_operations("Calculator").unwrap(), vec!["Add"]);
}

#[tokio::test]
async fn test_offline_round_trip() {
    let proxy = calculator(MockTransport::summing());
    let offline = proxy.into_offline();

    assert_eq!(offline.list_operations("Calculator").unwrap(), vec!["Add"]);

    let online = offline.with_transport(MockTransport::summing());
    let result = online
        .invoke("Calculator", "Add", vec![json!(20), json!(22)])
        .await
        .unwrap();
    assert_eq!(result, json!(42));
}
