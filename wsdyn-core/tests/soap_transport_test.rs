use calculator_service::{CALCULATOR_WSDL, DIRECTORY_WSDL};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use wsdyn_core::{DynamicProxy, InvokeError, SoapHttpTransport, TransportError};

const ADD_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <AddResponse xmlns="http://tempuri.org/">
      <AddResult>5</AddResult>
    </AddResponse>
  </soap:Body>
</soap:Envelope>"#;

const SERVER_FAULT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <soap:Fault>
      <faultcode>soap:Server</faultcode>
      <faultstring>Arithmetic overflow</faultstring>
    </soap:Fault>
  </soap:Body>
</soap:Envelope>"#;

const FIND_PEOPLE_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <FindPeopleResponse xmlns="http://tempuri.org/">
      <FindPeopleResult>
        <name>Ada</name>
        <age>36</age>
      </FindPeopleResult>
      <FindPeopleResult>
        <name>Alan</name>
        <age>41</age>
        <addresses><street>Main St</street><zip>12345</zip></addresses>
      </FindPeopleResult>
    </FindPeopleResponse>
  </soap:Body>
</soap:Envelope>"#;

const PING_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope">
  <env:Body>
    <PingResponse xmlns="http://tempuri.org/"><PingResult>true</PingResult></PingResponse>
  </env:Body>
</env:Envelope>"#;

fn transport(server: &MockServer) -> SoapHttpTransport {
    SoapHttpTransport::new().with_endpoint(server.url("/service.asmx"))
}

#[tokio::test]
async fn test_add_over_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/service.asmx")
                .header("content-type", "text/xml; charset=utf-8")
                .header("SOAPAction", "\"http://tempuri.org/Add\"")
                .body_contains("<m:Add><m:a>2</m:a><m:b>3</m:b></m:Add>");
            then.status(200)
                .header("content-type", "text/xml; charset=utf-8")
                .body(ADD_RESPONSE);
        })
        .await;

    let proxy = DynamicProxy::new(CALCULATOR_WSDL, transport(&server)).unwrap();
    let result = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result, json!(5));
}

#[tokio::test]
async fn test_soap_fault() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/service.asmx");
            then.status(500).body(SERVER_FAULT);
        })
        .await;

    let proxy = DynamicProxy::new(CALCULATOR_WSDL, transport(&server)).unwrap();
    let err = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap_err();

    match err {
        InvokeError::Transport(TransportError::Fault { code, message }) => {
            assert_eq!(code, "soap:Server");
            assert_eq!(message, "Arithmetic overflow");
        }
        other => panic!("Expected a fault, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/service.asmx");
            then.status(503).body("Service Unavailable");
        })
        .await;

    let proxy = DynamicProxy::new(CALCULATOR_WSDL, transport(&server)).unwrap();
    let err = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InvokeError::Transport(TransportError::Status { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/service.asmx");
            then.status(200)
                .delay(Duration::from_secs(5))
                .body(ADD_RESPONSE);
        })
        .await;

    let transport = transport(&server).with_timeout(Duration::from_millis(100));
    let proxy = DynamicProxy::new(CALCULATOR_WSDL, transport).unwrap();
    let err = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap_err();

    assert!(matches!(err, InvokeError::Transport(TransportError::Timeout)));
}

#[tokio::test]
async fn test_array_of_complex_results() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/service.asmx")
                .header("SOAPAction", "\"http://tempuri.org/FindPeople\"")
                .body_contains("<m:prefix>A</m:prefix>")
                .body_contains(r#"<m:status xsi:nil="true"/>"#);
            then.status(200).body(FIND_PEOPLE_RESPONSE);
        })
        .await;

    let proxy = DynamicProxy::new(DIRECTORY_WSDL, transport(&server)).unwrap();
    let result = proxy
        .invoke("People", "FindPeople", vec![json!("A"), json!(null)])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        result,
        json!([
            { "name": "Ada", "age": 36 },
            {
                "name": "Alan",
                "age": 41,
                "addresses": [{ "street": "Main St", "zip": "12345" }]
            }
        ])
    );
}

#[tokio::test]
async fn test_soap12_action_parameter() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/service.asmx").header(
                "content-type",
                "application/soap+xml; charset=utf-8; action=\"http://tempuri.org/Ping\"",
            );
            then.status(200).body(PING_RESPONSE);
        })
        .await;

    let proxy = DynamicProxy::new(DIRECTORY_WSDL, transport(&server)).unwrap();
    let result = proxy.invoke("Health", "Ping", vec![]).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result, json!(true));
}

#[tokio::test]
async fn test_connection_refused() {
    // Nothing listens on the discard port
    let transport = SoapHttpTransport::new().with_endpoint("http://127.0.0.1:9/service.asmx");
    let proxy = DynamicProxy::new(CALCULATOR_WSDL, transport).unwrap();

    let err = proxy
        .invoke("Calculator", "Add", vec![json!(2), json!(3)])
        .await
        .unwrap_err();

    assert!(matches!(err, InvokeError::Transport(TransportError::Request(_))));
}

#[tokio::test]
async fn test_rpc_result_is_picked_by_part_name() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/service.asmx")
                .header("SOAPAction", "\"urn:math#Multiply\"")
                .body_contains("<m:Multiply><x>1.5</x><y>4.0</y></m:Multiply>");
            then.status(200).body(
                r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <m:MultiplyResponse xmlns:m="urn:math">
      <trace>computed in 2ms</trace>
      <product>6</product>
    </m:MultiplyResponse>
  </soap:Body>
</soap:Envelope>"#,
            );
        })
        .await;

    let proxy = DynamicProxy::new(DIRECTORY_WSDL, transport(&server)).unwrap();
    let result = proxy
        .invoke("Math", "Multiply", vec![json!(1.5), json!(4.0)])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result, json!(6.0));
}
