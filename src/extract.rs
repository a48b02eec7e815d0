//! Entity extraction: raw accessory records into the domain model

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::client::{characteristic_type, service_type, RawAccessory, RawService};
use crate::model::{SensorReading, WindowInfo, WindowKind, WindowMapping};

/// Index mappings by serial number.
///
/// Rebuilt on every extraction pass so mapping edits take effect
/// immediately without invalidation logic elsewhere.
pub fn map_by_serial(mappings: &[WindowMapping]) -> HashMap<&str, &WindowMapping> {
    mappings
        .iter()
        .map(|mapping| (mapping.serial_number.as_str(), mapping))
        .collect()
}

/// Convert a raw accessory list into a sensor snapshot and window list.
///
/// Services that are neither sensors nor windows are skipped;
/// accessories may expose arbitrary capabilities. Window order follows
/// accessory/service enumeration order.
pub fn extract(
    accessories: &[RawAccessory],
    mappings: &[WindowMapping],
) -> (SensorReading, Vec<WindowInfo>) {
    let by_serial = map_by_serial(mappings);

    let mut reading = SensorReading::default();
    let mut windows = Vec::new();

    for accessory in accessories {
        for service in &accessory.services {
            match service.service_type.as_str() {
                service_type::TEMPERATURE_SENSOR => {
                    if let Some(celsius) =
                        read_value(service, characteristic_type::CURRENT_TEMPERATURE)
                    {
                        reading.temperature_f = celsius_to_fahrenheit(celsius);
                    }
                }
                service_type::HUMIDITY_SENSOR => {
                    if let Some(humidity) =
                        read_value(service, characteristic_type::CURRENT_RELATIVE_HUMIDITY)
                    {
                        reading.relative_humidity = humidity;
                    }
                }
                service_type::CARBON_DIOXIDE_SENSOR => {
                    if let Some(co2) =
                        read_value(service, characteristic_type::CARBON_DIOXIDE_LEVEL)
                    {
                        reading.co2_ppm = co2;
                    }
                }
                service_type::WINDOW => {
                    if let Some(info) =
                        extract_window(accessory, service, WindowKind::Window, &by_serial)
                    {
                        windows.push(info);
                    }
                }
                service_type::WINDOW_COVERING => {
                    if let Some(info) =
                        extract_window(accessory, service, WindowKind::Blind, &by_serial)
                    {
                        windows.push(info);
                    }
                }
                _ => {}
            }
        }
    }

    debug!(
        windows = windows.len(),
        accessories = accessories.len(),
        "extraction complete"
    );

    (reading, windows)
}

fn extract_window(
    accessory: &RawAccessory,
    service: &RawService,
    kind: WindowKind,
    by_serial: &HashMap<&str, &WindowMapping>,
) -> Option<WindowInfo> {
    let Some(target) = service.characteristic_of_type(characteristic_type::TARGET_POSITION) else {
        warn!(
            accessory = accessory.aid,
            service = service.iid,
            "window service has no target-position characteristic, skipping"
        );
        return None;
    };

    let serial_number = accessory.serial_number().unwrap_or_default().to_string();

    let type_label = service
        .characteristic_of_type(characteristic_type::NAME)
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string();

    let current_position = service
        .characteristic_of_type(characteristic_type::CURRENT_POSITION)
        .and_then(|c| c.as_position())
        .unwrap_or_default();

    Some(WindowInfo {
        accessory_id: accessory.aid,
        serial_number: serial_number.clone(),
        type_label,
        kind,
        current_position,
        target_position: target.as_position().unwrap_or_default(),
        target_position_iid: target.iid,
        mapping: by_serial.get(serial_number.as_str()).map(|m| (*m).clone()),
    })
}

fn read_value(service: &RawService, tag: &str) -> Option<f64> {
    service.characteristic_of_type(tag).and_then(|c| c.as_f64())
}

fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RawCharacteristic;
    use serde_json::json;

    fn characteristic(iid: u64, tag: &str, value: serde_json::Value) -> RawCharacteristic {
        RawCharacteristic {
            iid,
            characteristic_type: tag.to_string(),
            value,
        }
    }

    fn info_service(serial: &str) -> RawService {
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

    fn window_service(tag: &str, current: u8, target: u8) -> RawService {
        RawService {
            iid: 10,
            service_type: tag.to_string(),
            characteristics: vec![
                characteristic(11, characteristic_type::NAME, json!("Roof Window")),
                characteristic(12, characteristic_type::CURRENT_POSITION, json!(current)),
                characteristic(13, characteristic_type::TARGET_POSITION, json!(target)),
            ],
        }
    }

    fn mapping(serial: &str, name: &str, code: &str) -> WindowMapping {
        WindowMapping {
            serial_number: serial.to_string(),
            name: name.to_string(),
            code: code.to_string(),
        }
    }

    #[test]
    fn extracts_windows_and_blinds_in_order() {
        let accessories = vec![
            RawAccessory {
                aid: 1,
                services: vec![info_service("A1"), window_service(service_type::WINDOW, 20, 40)],
            },
            RawAccessory {
                aid: 2,
                services: vec![
                    info_service("B2"),
                    window_service(service_type::WINDOW_COVERING, 50, 60),
                ],
            },
        ];

        let (_, windows) = extract(&accessories, &[]);

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].serial_number, "A1");
        assert_eq!(windows[0].kind, WindowKind::Window);
        assert_eq!(windows[0].current_position, 20);
        assert_eq!(windows[0].target_position, 40);
        assert_eq!(windows[0].target_position_iid, 13);
        assert_eq!(windows[1].serial_number, "B2");
        assert_eq!(windows[1].kind, WindowKind::Blind);
        assert_eq!(windows[1].target_position, 60);
    }

    #[test]
    fn attaches_mapping_by_serial() {
        let accessories = vec![RawAccessory {
            aid: 1,
            services: vec![info_service("A1"), window_service(service_type::WINDOW, 0, 0)],
        }];
        let mappings = vec![mapping("A1", "Living Room", "liv"), mapping("Z9", "Attic", "att")];

        let (_, windows) = extract(&accessories, &mappings);

        assert_eq!(windows.len(), 1);
        let attached = windows[0].mapping.as_ref().expect("mapping attached");
        assert_eq!(attached.name, "Living Room");
        assert_eq!(windows[0].friendly_name(), "Living Room");
    }

    #[test]
    fn missing_mapping_is_not_an_error() {
        let accessories = vec![RawAccessory {
            aid: 1,
            services: vec![info_service("A1"), window_service(service_type::WINDOW, 0, 0)],
        }];

        let (_, windows) = extract(&accessories, &[mapping("Z9", "Attic", "att")]);

        assert!(windows[0].mapping.is_none());
        assert_eq!(windows[0].friendly_name(), "A1");
    }

    #[test]
    fn reads_sensors_with_last_writer_wins() {
        let sensor = |celsius: f64| RawService {
            iid: 20,
            service_type: service_type::TEMPERATURE_SENSOR.to_string(),
            characteristics: vec![characteristic(
                21,
                characteristic_type::CURRENT_TEMPERATURE,
                json!(celsius),
            )],
        };

        let accessories = vec![
            RawAccessory {
                aid: 1,
                services: vec![sensor(10.0)],
            },
            RawAccessory {
                aid: 2,
                services: vec![
                    sensor(20.0),
                    RawService {
                        iid: 30,
                        service_type: service_type::HUMIDITY_SENSOR.to_string(),
                        characteristics: vec![characteristic(
                            31,
                            characteristic_type::CURRENT_RELATIVE_HUMIDITY,
                            json!(55.5),
                        )],
                    },
                    RawService {
                        iid: 40,
                        service_type: service_type::CARBON_DIOXIDE_SENSOR.to_string(),
                        characteristics: vec![characteristic(
                            41,
                            characteristic_type::CARBON_DIOXIDE_LEVEL,
                            json!(612.0),
                        )],
                    },
                ],
            },
        ];

        let (reading, _) = extract(&accessories, &[]);

        // 20C, the later reading, wins over 10C.
        assert_eq!(reading.temperature_f, 68.0);
        assert_eq!(reading.relative_humidity, 55.5);
        assert_eq!(reading.co2_ppm, 612.0);
    }

    #[test]
    fn unknown_services_are_skipped() {
        let accessories = vec![RawAccessory {
            aid: 1,
            services: vec![
                info_service("A1"),
                RawService {
                    iid: 50,
                    service_type: "43".to_string(), // lightbulb
                    characteristics: vec![],
                },
            ],
        }];

        let (reading, windows) = extract(&accessories, &[]);

        assert!(windows.is_empty());
        assert_eq!(reading.temperature_f, 0.0);
    }

    #[test]
    fn window_without_target_position_is_skipped() {
        let accessories = vec![RawAccessory {
            aid: 1,
            services: vec![
                info_service("A1"),
                RawService {
                    iid: 10,
                    service_type: service_type::WINDOW.to_string(),
                    characteristics: vec![characteristic(
                        12,
                        characteristic_type::CURRENT_POSITION,
                        json!(20),
                    )],
                },
            ],
        }];

        let (_, windows) = extract(&accessories, &[]);
        assert!(windows.is_empty());
    }

    #[test]
    fn index_is_keyed_by_exact_serial() {
        let mappings = vec![mapping("A1", "x", "y")];
        let index = map_by_serial(&mappings);

        assert!(index.contains_key("A1"));
        assert!(!index.contains_key("a1"));
    }
}
