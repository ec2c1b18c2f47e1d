// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

use hmac::{Hmac, Mac};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use sha2::Sha256;
use shadowserver_api::{
    blocking::ApiClient, ApiCredentials, DateRange, ReportQuery, ReportsDownloadRequest,
    ReportsListRequest, ReportsStatsRequest, ShadowserverError, Sort,
};

const KEY: &str = "test-key";
const SECRET: &str = "test-secret";

fn create_test_client(server: &ServerGuard) -> ApiClient {
    let credentials = ApiCredentials::new(&server.url(), KEY, SECRET).expect("valid credentials");
    ApiClient::new(credentials).expect("Failed to create client")
}

fn hmac_hex(data: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[test]
fn test_ping_signature_covers_exact_body() {
    let mut server = Server::new();
    let body = r#"{"apikey":"test-key"}"#;

    let m = server
        .mock("POST", "/test/ping")
        .match_header("HMAC2", hmac_hex(body).as_str())
        .match_body(Matcher::Exact(body.into()))
        .with_status(200)
        .with_body(r#"{"pong":"2024-05-01 12:00:00"}"#)
        .expect(1)
        .create();

    let client = create_test_client(&server);
    let pong = client.ping().unwrap();
    assert_eq!(pong["pong"], "2024-05-01 12:00:00");
    m.assert();
}

#[test]
fn test_query_signature_covers_exact_body() {
    let mut server = Server::new();
    let body = r#"{"query":{"asn":"64496"},"sort":"descending","page":"1","date":"2024-05-01:now","limit":"10","apikey":"test-key"}"#;

    let m = server
        .mock("POST", "/reports/query")
        .match_header("HMAC2", hmac_hex(body).as_str())
        .match_body(Matcher::Exact(body.into()))
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create();

    let client = create_test_client(&server);
    let query = ReportQuery::new([("asn", "64496")])
        .with_sort(Sort::Descending)
        .with_date(DateRange::between("2024-05-01", "now").unwrap())
        .with_limit(Some(10));
    let rows: Vec<_> = client.reports_query(query).collect::<Result<_, _>>().unwrap();
    assert!(rows.is_empty());
    m.assert();
}

#[test]
fn test_key_info_unwraps_single_entry() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/key/info")
        .with_status(200)
        .with_body(r#"[{"id": "abc"}]"#)
        .create();

    let client = create_test_client(&server);
    let info = client.key_info().unwrap();
    assert_eq!(Value::Object(info), json!({"id": "abc"}));
}

#[test]
fn test_key_info_rejects_other_shapes() {
    for body in ["[]", r#"[{"id": "a"}, {"id": "b"}]"#] {
        let mut server = Server::new();
        let _m = server
            .mock("POST", "/key/info")
            .with_status(200)
            .with_body(body)
            .create();

        let client = create_test_client(&server);
        match client.key_info() {
            Err(ShadowserverError::UnexpectedShape { endpoint, .. }) => {
                assert_eq!(endpoint, "key/info")
            }
            other => panic!("unexpected result for {body}: {other:?}"),
        }
    }
}

#[test]
fn test_subscribed_and_types() {
    let mut server = Server::new();
    let _s = server
        .mock("POST", "/reports/subscribed")
        .with_status(200)
        .with_body(r#"["germany", "asn-64496"]"#)
        .create();
    let _t = server
        .mock("POST", "/reports/types")
        .with_status(200)
        .with_body(r#"{"types": []}"#)
        .create();

    let client = create_test_client(&server);
    assert_eq!(
        client.reports_subscribed().unwrap(),
        vec!["germany".to_string(), "asn-64496".to_string()]
    );
    assert!(matches!(
        client.reports_types(),
        Err(ShadowserverError::UnexpectedShape { .. })
    ));
}

#[test]
fn test_reports_list_sends_filters() {
    let mut server = Server::new();
    let m = server
        .mock("POST", "/reports/list")
        .match_body(Matcher::Json(json!({
            "reports": ["germany"],
            "limit": 2,
            "date": "2024-05-01",
            "type": "scan_ftp",
            "apikey": KEY,
        })))
        .with_status(200)
        .with_body(r#"[{"id": "r1", "file": "a.csv"}, {"id": "r2", "file": "b.csv"}]"#)
        .expect(1)
        .create();

    let client = create_test_client(&server);
    let request = ReportsListRequest::new()
        .with_report("germany")
        .with_limit(2)
        .with_date(DateRange::since("2024-05-01").unwrap())
        .with_type("scan_ftp");
    let reports = client.reports_list(&request).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1]["id"], "r2");
    m.assert();
}

#[test]
fn test_invalid_date_issues_no_request() {
    let mut server = Server::new();
    let m = server.mock("POST", Matcher::Any).expect(0).create();

    let client = create_test_client(&server);
    let result = DateRange::since("01/05/2024")
        .and_then(|date| client.reports_list(&ReportsListRequest::new().with_date(date)));
    assert!(matches!(result, Err(ShadowserverError::InvalidParameter(_))));

    let result = DateRange::between("2024-05-01", "later")
        .and_then(|date| client.reports_stats(&ReportsStatsRequest::new().with_date(date)));
    assert!(matches!(result, Err(ShadowserverError::InvalidParameter(_))));

    m.assert();
}

#[test]
fn test_download_stringifies_limit() {
    let mut server = Server::new();
    let m = server
        .mock("POST", "/reports/download")
        .match_body(Matcher::Json(json!({
            "id": "r1",
            "report": "germany",
            "limit": "5",
            "apikey": KEY,
        })))
        .with_status(200)
        .with_body(r#"[{"ip": "192.0.2.1"}]"#)
        .create();

    let client = create_test_client(&server);
    let request = ReportsDownloadRequest::new("r1")
        .with_report("germany")
        .with_limit(5);
    let rows = client.reports_download(&request).unwrap();
    assert_eq!(rows.len(), 1);
    m.assert();
}

#[test]
fn test_stats_returns_rows() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/reports/stats")
        .with_status(200)
        .with_body(r#"[["2024-05-01", "scan_ftp", 12], ["2024-05-02", "scan_ftp", 7]]"#)
        .create();

    let client = create_test_client(&server);
    let stats = client
        .reports_stats(&ReportsStatsRequest::new().with_type("scan_ftp"))
        .unwrap();
    assert_eq!(
        stats,
        vec![
            json!(["2024-05-01", "scan_ftp", 12]),
            json!(["2024-05-02", "scan_ftp", 7])
        ]
    );
}

#[test]
fn test_device_info_rejects_unknown_key_without_request() {
    let mut server = Server::new();
    let m = server.mock("POST", Matcher::Any).expect(0).create();

    let client = create_test_client(&server);
    let result = client.reports_device_info([("bogus", "1")]);
    assert!(matches!(result, Err(ShadowserverError::InvalidParameter(_))));
    m.assert();
}

#[test]
fn test_device_info_and_schema() {
    let mut server = Server::new();
    let d = server
        .mock("POST", "/reports/device-info")
        .match_body(Matcher::PartialJson(json!({"query": {"ip": "192.0.2.1"}})))
        .with_status(200)
        .with_body(r#"{"vendor": "acme"}"#)
        .create();
    let s = server
        .mock("POST", "/reports/schema")
        .match_body(Matcher::PartialJson(json!({"type": "scan_http"})))
        .with_status(200)
        .with_body(r#"{"fields": ["ip", "port"]}"#)
        .create();

    let client = create_test_client(&server);
    let info = client.reports_device_info([("ip", "192.0.2.1")]).unwrap();
    assert_eq!(info["vendor"], "acme");
    let schema = client.reports_schema("scan_http").unwrap();
    assert_eq!(schema["fields"], json!(["ip", "port"]));
    d.assert();
    s.assert();
}

#[test]
fn test_pagination_until_empty_page() {
    let mut server = Server::new();
    let p1 = server
        .mock("POST", "/reports/query")
        .match_body(Matcher::PartialJson(json!({"page": "1"})))
        .with_status(200)
        .with_body(r#"[{"row": 1}, {"row": 2}]"#)
        .expect(1)
        .create();
    let p2 = server
        .mock("POST", "/reports/query")
        .match_body(Matcher::PartialJson(json!({"page": "2"})))
        .with_status(200)
        .with_body(r#"[{"row": 3}]"#)
        .expect(1)
        .create();
    let p3 = server
        .mock("POST", "/reports/query")
        .match_body(Matcher::PartialJson(json!({"page": "3"})))
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create();

    let client = create_test_client(&server);
    let rows: Vec<_> = client
        .reports_query(ReportQuery::new([("asn", "64496")]))
        .collect::<Result<_, _>>()
        .unwrap();
    let rows: Vec<Value> = rows.into_iter().map(Value::Object).collect();
    assert_eq!(rows, vec![json!({"row": 1}), json!({"row": 2}), json!({"row": 3})]);

    p1.assert();
    p2.assert();
    p3.assert();
}

#[test]
fn test_pagination_disabled_issues_one_request() {
    let mut server = Server::new();
    let m = server
        .mock("POST", "/reports/query")
        .with_status(200)
        .with_body(r#"[{"row": 1}, {"row": 2}]"#)
        .expect(1)
        .create();

    let client = create_test_client(&server);
    let query = ReportQuery::new([("asn", "64496")]).with_pagination(false);
    let rows: Vec<_> = client.reports_query(query).collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 2);
    m.assert();
}

#[test]
fn test_query_is_lazy() {
    let mut server = Server::new();
    let p1 = server
        .mock("POST", "/reports/query")
        .match_body(Matcher::PartialJson(json!({"page": "1"})))
        .with_status(200)
        .with_body(r#"[{"row": 1}, {"row": 2}]"#)
        .expect(1)
        .create();
    let p2 = server
        .mock("POST", "/reports/query")
        .match_body(Matcher::PartialJson(json!({"page": "2"})))
        .expect(0)
        .create();

    let client = create_test_client(&server);
    let mut rows = client.reports_query(ReportQuery::new([("asn", "64496")]));
    assert_eq!(rows.page(), 1);
    let first = rows.next().unwrap().unwrap();
    assert_eq!(first["row"], 1);
    assert_eq!(rows.page(), 2);
    drop(rows);

    p1.assert();
    p2.assert();
}

#[test]
fn test_query_by_page() {
    let mut server = Server::new();
    let _p1 = server
        .mock("POST", "/reports/query")
        .match_body(Matcher::PartialJson(json!({"page": "1"})))
        .with_status(200)
        .with_body(r#"[{"row": 1}, {"row": 2}]"#)
        .create();
    let _p2 = server
        .mock("POST", "/reports/query")
        .match_body(Matcher::PartialJson(json!({"page": "2"})))
        .with_status(200)
        .with_body("[]")
        .create();

    let client = create_test_client(&server);
    let mut rows = client.reports_query(ReportQuery::new([("asn", "64496")]));
    assert_eq!(rows.next_page().unwrap().unwrap().len(), 2);
    assert!(rows.next_page().unwrap().unwrap().is_empty());
    assert!(rows.next_page().is_none());
    assert!(rows.next().is_none());
}

#[test]
fn test_query_failure_mid_stream_keeps_earlier_rows() {
    let mut server = Server::new();
    let _p1 = server
        .mock("POST", "/reports/query")
        .match_body(Matcher::PartialJson(json!({"page": "1"})))
        .with_status(200)
        .with_body(r#"[{"row": 1}]"#)
        .create();
    let p2 = server
        .mock("POST", "/reports/query")
        .match_body(Matcher::PartialJson(json!({"page": "2"})))
        .with_status(500)
        .with_body("boom")
        .expect(1)
        .create();

    let client = create_test_client(&server);
    let mut rows = client.reports_query(ReportQuery::new([("asn", "64496")]));
    assert_eq!(rows.next().unwrap().unwrap()["row"], 1);
    match rows.next() {
        Some(Err(ShadowserverError::InvalidRequest { message, .. })) => assert_eq!(message, "boom"),
        other => panic!("unexpected item: {other:?}"),
    }
    assert!(rows.next().is_none());
    p2.assert();
}

#[test]
fn test_error_field_becomes_invalid_request() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/test/ping")
        .with_status(401)
        .with_body(r#"{"error": "bad key"}"#)
        .create();

    let client = create_test_client(&server);
    let err = client.ping().unwrap_err();
    assert!(err.is_invalid_request());
    assert!(!err.is_no_supported_report_filter());
    match err {
        ShadowserverError::InvalidRequest { message, .. } => assert_eq!(message, "bad key"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_no_supported_report_filter() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/reports/query")
        .with_status(400)
        .with_body("No supported report filters found for user")
        .create();

    let client = create_test_client(&server);
    let err = client
        .reports_query(ReportQuery::new([("city", "Berlin")]))
        .next()
        .unwrap()
        .unwrap_err();
    assert!(err.is_no_supported_report_filter());
    assert!(err.is_invalid_request());
    match err {
        ShadowserverError::InvalidRequest { message, .. } => {
            assert_eq!(message, "No supported report filters found for user")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_ok_status_with_garbage_body() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/test/ping")
        .with_status(200)
        .with_body("not json")
        .create();

    let client = create_test_client(&server);
    match client.ping() {
        Err(ShadowserverError::InvalidResponse(text)) => assert_eq!(text, "not json"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_generic_call_passes_value_through() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/reports/custom")
        .match_body(Matcher::Json(json!({"x": 1, "apikey": KEY})))
        .with_status(200)
        .with_body("[1, 2, 3]")
        .create();

    let client = create_test_client(&server);
    let value = client.call("reports/custom", &json!({"x": 1})).unwrap();
    assert_eq!(value, json!([1, 2, 3]));
}

#[test]
fn test_generic_call_overrides_caller_apikey() {
    let mut server = Server::new();
    let body = r#"{"apikey":"test-key","x":1}"#;
    let m = server
        .mock("POST", "/reports/custom")
        .match_header("HMAC2", hmac_hex(body).as_str())
        .match_body(Matcher::Exact(body.into()))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create();

    let client = create_test_client(&server);
    client
        .call("reports/custom", &json!({"apikey": "someone-else", "x": 1}))
        .unwrap();
    m.assert();

    assert!(matches!(
        client.call("reports/custom", &json!(["not", "an", "object"])),
        Err(ShadowserverError::InvalidParameter(_))
    ));
}
