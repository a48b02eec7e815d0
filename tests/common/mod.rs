//! Shared fixtures for controller tests

use serde_json::json;

use skylight::client::{
    characteristic_type, service_type, RawAccessory, RawCharacteristic, RawService,
};
use skylight::mock::MockAccessoryClient;
use skylight::{Controller, WindowMapping};

pub fn characteristic(iid: u64, tag: &str, value: serde_json::Value) -> RawCharacteristic {
    RawCharacteristic {
        iid,
        characteristic_type: tag.to_string(),
        value,
    }
}

pub fn info_service(serial: &str) -> RawService {
    RawService {
        iid: 1,
        service_type: service_type::ACCESSORY_INFORMATION.to_string(),
        characteristics: vec![characteristic(
            2,
            characteristic_type::SERIAL_NUMBER,
            json!(serial),
        )],
    }
}

fn positioned_service(tag: &str, label: &str, current: u8, target: u8) -> RawService {
    RawService {
        iid: 10,
        service_type: tag.to_string(),
        characteristics: vec![
            characteristic(11, characteristic_type::NAME, json!(label)),
            characteristic(12, characteristic_type::CURRENT_POSITION, json!(current)),
            characteristic(13, characteristic_type::TARGET_POSITION, json!(target)),
        ],
    }
}

/// Accessory with a window service. The target-position characteristic
/// always has iid 13.
pub fn window_accessory(aid: u64, serial: &str, current: u8, target: u8) -> RawAccessory {
    RawAccessory {
        aid,
        services: vec![
            info_service(serial),
            positioned_service(service_type::WINDOW, "Roof Window", current, target),
        ],
    }
}

/// Accessory with a window-covering service, same layout as
/// `window_accessory`
pub fn covering_accessory(aid: u64, serial: &str, current: u8, target: u8) -> RawAccessory {
    RawAccessory {
        aid,
        services: vec![
            info_service(serial),
            positioned_service(service_type::WINDOW_COVERING, "Blind", current, target),
        ],
    }
}

#[allow(dead_code)]
pub fn sensor_accessory(aid: u64, celsius: f64, humidity: f64, co2: f64) -> RawAccessory {
    RawAccessory {
        aid,
        services: vec![
            RawService {
                iid: 20,
                service_type: service_type::TEMPERATURE_SENSOR.to_string(),
                characteristics: vec![characteristic(
                    21,
                    characteristic_type::CURRENT_TEMPERATURE,
                    json!(celsius),
                )],
            },
            RawService {
                iid: 30,
                service_type: service_type::HUMIDITY_SENSOR.to_string(),
                characteristics: vec![characteristic(
                    31,
                    characteristic_type::CURRENT_RELATIVE_HUMIDITY,
                    json!(humidity),
                )],
            },
            RawService {
                iid: 40,
                service_type: service_type::CARBON_DIOXIDE_SENSOR.to_string(),
                characteristics: vec![characteristic(
                    41,
                    characteristic_type::CARBON_DIOXIDE_LEVEL,
                    json!(co2),
                )],
            },
        ],
    }
}

#[allow(dead_code)]
pub fn mapping(serial: &str, name: &str, code: &str) -> WindowMapping {
    WindowMapping {
        serial_number: serial.to_string(),
        name: name.to_string(),
        code: code.to_string(),
    }
}

/// Controller over a mock client, returning a handle for assertions
pub fn controller_with(
    accessories: Vec<RawAccessory>,
    mappings: Vec<WindowMapping>,
) -> (Controller, MockAccessoryClient) {
    let client = MockAccessoryClient::new().with_accessories(accessories);
    let handle = client.clone();
    (Controller::new(Box::new(client), mappings), handle)
}
