#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API: &str = "/sdk/vim25/8.0.1.0";
pub const SESSION_ID: &str = "52c1e0b3-session";
pub const USERNAME: &str = "monitor@vsphere.local";
pub const PASSWORD: &str = "s3cret";

fn moref(kind: &str, value: &str) -> Value {
    json!({"_typeName": "ManagedObjectReference", "type": kind, "value": value})
}

pub async fn mount_service_content(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("{API}/ServiceInstance/ServiceInstance/content")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_typeName": "ServiceContent",
            "rootFolder": moref("Folder", "group-d1"),
            "sessionManager": moref("SessionManager", "SessionManager"),
            "searchIndex": moref("SearchIndex", "SearchIndex"),
            "about": {"fullName": "VMware vCenter Server 8.0.2", "apiVersion": "8.0.2.0"}
        })))
        .mount(server)
        .await;
}

/// Service content, a successful login and a logout that must be called
/// exactly once.
pub async fn mount_session(server: &MockServer) {
    mount_service_content(server).await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/SessionManager/SessionManager/Login")))
        .and(body_json(json!({"userName": USERNAME, "password": PASSWORD})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("vmware-api-session-id", SESSION_ID)
                .set_body_json(json!({"_typeName": "UserSession", "userName": USERNAME})),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/SessionManager/SessionManager/Logout")))
        .and(header("vmware-api-session-id", SESSION_ID))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_property(server: &MockServer, object: &str, property: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{API}/{object}/{property}")))
        .and(header("vmware-api-session-id", SESSION_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_guest(server: &MockServer, uuid: &str, name: &str, power_state: &str) {
    Mock::given(method("POST"))
        .and(path(format!("{API}/SearchIndex/SearchIndex/FindByUuid")))
        .and(header("vmware-api-session-id", SESSION_ID))
        .and(body_json(json!({"uuid": uuid, "vmSearch": true, "instanceUuid": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(moref("VirtualMachine", "vm-42")))
        .mount(server)
        .await;
    mount_property(server, "VirtualMachine/vm-42", "name", json!(name)).await;
    mount_property(
        server,
        "VirtualMachine/vm-42",
        "runtime",
        json!({"_typeName": "VirtualMachineRuntimeInfo", "connectionState": "connected", "powerState": power_state}),
    )
    .await;
}

pub fn sensor(name: &str, sensor_type: &str, reading: i64, modifier: i32, health: &str) -> Value {
    json!({
        "_typeName": "HostNumericSensorInfo",
        "name": name,
        "healthState": {"_typeName": "ElementDescription", "label": health, "summary": "", "key": health},
        "currentReading": reading,
        "unitModifier": modifier,
        "baseUnits": "C",
        "rateUnits": null,
        "sensorType": sensor_type
    })
}

pub async fn mount_host(server: &MockServer, dns_name: &str, name: &str, sensors: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path(format!("{API}/SearchIndex/SearchIndex/FindByDnsName")))
        .and(header("vmware-api-session-id", SESSION_ID))
        .and(body_json(json!({"dnsName": dns_name, "vmSearch": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(moref("HostSystem", "host-12")))
        .mount(server)
        .await;
    mount_property(server, "HostSystem/host-12", "name", json!(name)).await;
    mount_property(
        server,
        "HostSystem/host-12",
        "summary",
        json!({"_typeName": "HostListSummary", "hardware": {"vendor": "Dell Inc.", "model": "PowerEdge R640"}}),
    )
    .await;
    mount_property(
        server,
        "HostSystem/host-12",
        "runtime",
        json!({
            "_typeName": "HostRuntimeInfo",
            "connectionState": "connected",
            "healthSystemRuntime": {
                "systemHealthInfo": {"numericSensorInfo": sensors}
            }
        }),
    )
    .await;
}
