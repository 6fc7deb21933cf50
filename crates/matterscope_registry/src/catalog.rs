//! Built-in catalog of standard Matter clusters, capabilities, and device
//! types.
//!
//! Ids follow the Matter Application Cluster and Device Library
//! specifications. The catalog is intentionally a curated subset: entries are
//! added as the comparison UX grows to cover them, and telemetry referencing
//! anything outside the catalog is skipped rather than rejected.

use crate::CapabilityDef;
use crate::CategoryKey;
use crate::ClusterMetadata;
use crate::DeviceTypeMetadata;

/// Standard application clusters.
pub static CLUSTERS: &[ClusterMetadata] = &[
    ClusterMetadata {
        id: 0x0003,
        name: "Identify",
        category: CategoryKey::Automation,
        mandatory_attributes: &["IdentifyTime"],
        mandatory_commands: &["Identify"],
    },
    ClusterMetadata {
        id: 0x0004,
        name: "Groups",
        category: CategoryKey::Automation,
        mandatory_attributes: &[],
        mandatory_commands: &["AddGroup", "RemoveGroup"],
    },
    ClusterMetadata {
        id: 0x0062,
        name: "Scenes Management",
        category: CategoryKey::Automation,
        mandatory_attributes: &[],
        mandatory_commands: &["RecallScene"],
    },
    ClusterMetadata {
        id: 0x0006,
        name: "On/Off",
        category: CategoryKey::Controls,
        mandatory_attributes: &["OnOff"],
        mandatory_commands: &["On", "Off", "Toggle"],
    },
    ClusterMetadata {
        id: 0x0008,
        name: "Level Control",
        category: CategoryKey::Controls,
        mandatory_attributes: &["CurrentLevel"],
        mandatory_commands: &["MoveToLevel"],
    },
    ClusterMetadata {
        id: 0x0300,
        name: "Color Control",
        category: CategoryKey::Controls,
        mandatory_attributes: &["ColorMode"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x0102,
        name: "Window Covering",
        category: CategoryKey::Controls,
        mandatory_attributes: &["CurrentPositionLiftPercent100ths"],
        mandatory_commands: &["UpOrOpen", "DownOrClose"],
    },
    ClusterMetadata {
        id: 0x0045,
        name: "Boolean State",
        category: CategoryKey::Sensors,
        mandatory_attributes: &["StateValue"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x0406,
        name: "Occupancy Sensing",
        category: CategoryKey::Sensors,
        mandatory_attributes: &["Occupancy"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x0402,
        name: "Temperature Measurement",
        category: CategoryKey::Sensors,
        mandatory_attributes: &["MeasuredValue"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x0405,
        name: "Relative Humidity Measurement",
        category: CategoryKey::Sensors,
        mandatory_attributes: &["MeasuredValue"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x0400,
        name: "Illuminance Measurement",
        category: CategoryKey::Sensors,
        mandatory_attributes: &["MeasuredValue"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x0101,
        name: "Door Lock",
        category: CategoryKey::Security,
        mandatory_attributes: &["LockState"],
        mandatory_commands: &["LockDoor", "UnlockDoor"],
    },
    ClusterMetadata {
        id: 0x005C,
        name: "Smoke CO Alarm",
        category: CategoryKey::Security,
        mandatory_attributes: &["SmokeState"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x0201,
        name: "Thermostat",
        category: CategoryKey::Comfort,
        mandatory_attributes: &["LocalTemperature"],
        mandatory_commands: &["SetpointRaiseLower"],
    },
    ClusterMetadata {
        id: 0x0202,
        name: "Fan Control",
        category: CategoryKey::Comfort,
        mandatory_attributes: &["FanMode"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x005B,
        name: "Air Quality",
        category: CategoryKey::Monitoring,
        mandatory_attributes: &["AirQuality"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x0090,
        name: "Electrical Power Measurement",
        category: CategoryKey::Monitoring,
        mandatory_attributes: &["ActivePower"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x0091,
        name: "Electrical Energy Measurement",
        category: CategoryKey::Monitoring,
        mandatory_attributes: &["CumulativeEnergyImported"],
        mandatory_commands: &[],
    },
    ClusterMetadata {
        id: 0x0506,
        name: "Media Playback",
        category: CategoryKey::Media,
        mandatory_attributes: &["CurrentState"],
        mandatory_commands: &["Play", "Pause"],
    },
    ClusterMetadata {
        id: 0x050B,
        name: "Audio Output",
        category: CategoryKey::Media,
        mandatory_attributes: &["OutputList"],
        mandatory_commands: &[],
    },
];

/// Capabilities surfaced in comparison tables, each backed by one cluster.
pub static CAPABILITIES: &[CapabilityDef] = &[
    CapabilityDef {
        key: "on_off",
        label: "On/Off",
        emoji: "💡",
        category: CategoryKey::Controls,
        cluster: 0x0006,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "dimming",
        label: "Dimming",
        emoji: "🎚️",
        category: CategoryKey::Controls,
        cluster: 0x0008,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "color_temperature",
        label: "Color Temperature",
        emoji: "🔆",
        category: CategoryKey::Controls,
        cluster: 0x0300,
        required_attributes: &["ColorTemperatureMireds"],
        required_commands: &["MoveToColorTemperature"],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "color",
        label: "Color",
        emoji: "🌈",
        category: CategoryKey::Controls,
        cluster: 0x0300,
        required_attributes: &["CurrentHue", "CurrentSaturation"],
        required_commands: &["MoveToHue"],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "covering_position",
        label: "Covering Position",
        emoji: "🪟",
        category: CategoryKey::Controls,
        cluster: 0x0102,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "contact",
        label: "Contact",
        emoji: "🚪",
        category: CategoryKey::Sensors,
        cluster: 0x0045,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "occupancy",
        label: "Occupancy",
        emoji: "🏃",
        category: CategoryKey::Sensors,
        cluster: 0x0406,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "temperature",
        label: "Temperature",
        emoji: "🌡️",
        category: CategoryKey::Sensors,
        cluster: 0x0402,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "humidity",
        label: "Humidity",
        emoji: "💧",
        category: CategoryKey::Sensors,
        cluster: 0x0405,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "illuminance",
        label: "Illuminance",
        emoji: "☀️",
        category: CategoryKey::Sensors,
        cluster: 0x0400,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "identify",
        label: "Identify",
        emoji: "📛",
        category: CategoryKey::Automation,
        cluster: 0x0003,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "grouping",
        label: "Groups",
        emoji: "👥",
        category: CategoryKey::Automation,
        cluster: 0x0004,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "scenes",
        label: "Scenes",
        emoji: "🎬",
        category: CategoryKey::Automation,
        cluster: 0x0062,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.3",
    },
    CapabilityDef {
        key: "air_quality",
        label: "Air Quality",
        emoji: "💨",
        category: CategoryKey::Monitoring,
        cluster: 0x005B,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.2",
    },
    CapabilityDef {
        key: "power_monitoring",
        label: "Power Monitoring",
        emoji: "⚡",
        category: CategoryKey::Monitoring,
        cluster: 0x0090,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.3",
    },
    CapabilityDef {
        key: "energy_monitoring",
        label: "Energy Monitoring",
        emoji: "🔋",
        category: CategoryKey::Monitoring,
        cluster: 0x0091,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.3",
    },
    CapabilityDef {
        key: "thermostat",
        label: "Thermostat",
        emoji: "🔥",
        category: CategoryKey::Comfort,
        cluster: 0x0201,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "fan_mode",
        label: "Fan Control",
        emoji: "🌀",
        category: CategoryKey::Comfort,
        cluster: 0x0202,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "lock",
        label: "Door Lock",
        emoji: "🔒",
        category: CategoryKey::Security,
        cluster: 0x0101,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "smoke_alarm",
        label: "Smoke Alarm",
        emoji: "🚨",
        category: CategoryKey::Security,
        cluster: 0x005C,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.2",
    },
    CapabilityDef {
        key: "media_playback",
        label: "Media Playback",
        emoji: "🎵",
        category: CategoryKey::Media,
        cluster: 0x0506,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
    CapabilityDef {
        key: "audio_output",
        label: "Audio Output",
        emoji: "🔊",
        category: CategoryKey::Media,
        cluster: 0x050B,
        required_attributes: &[],
        required_commands: &[],
        spec_version: "1.0",
    },
];

/// Standard device types and their capability requirements.
pub static DEVICE_TYPES: &[DeviceTypeMetadata] = &[
    // Device Type ID: 0x0100 (256 decimal)
    DeviceTypeMetadata {
        id: 0x0100,
        name: "On/Off Light",
        display_category: CategoryKey::Controls,
        spec_version: "1.0",
        mandatory_capabilities: &["on_off", "identify"],
        optional_capabilities: &["grouping", "scenes"],
    },
    // Device Type ID: 0x0101 (257 decimal)
    DeviceTypeMetadata {
        id: 0x0101,
        name: "Dimmable Light",
        display_category: CategoryKey::Controls,
        spec_version: "1.0",
        mandatory_capabilities: &["on_off", "dimming", "identify"],
        optional_capabilities: &["grouping", "scenes"],
    },
    // Device Type ID: 0x010C (268 decimal)
    DeviceTypeMetadata {
        id: 0x010C,
        name: "Color Temperature Light",
        display_category: CategoryKey::Controls,
        spec_version: "1.0",
        mandatory_capabilities: &["on_off", "dimming", "color_temperature"],
        optional_capabilities: &["grouping", "scenes"],
    },
    // Device Type ID: 0x010D (269 decimal)
    DeviceTypeMetadata {
        id: 0x010D,
        name: "Extended Color Light",
        display_category: CategoryKey::Controls,
        spec_version: "1.0",
        mandatory_capabilities: &["on_off", "dimming", "color_temperature", "color"],
        optional_capabilities: &["grouping", "scenes"],
    },
    // Device Type ID: 0x010A (266 decimal)
    DeviceTypeMetadata {
        id: 0x010A,
        name: "On/Off Plug-in Unit",
        display_category: CategoryKey::Controls,
        spec_version: "1.0",
        mandatory_capabilities: &["on_off"],
        optional_capabilities: &["power_monitoring", "energy_monitoring"],
    },
    // Device Type ID: 0x0202 (514 decimal)
    DeviceTypeMetadata {
        id: 0x0202,
        name: "Window Covering",
        display_category: CategoryKey::Controls,
        spec_version: "1.0",
        mandatory_capabilities: &["covering_position"],
        optional_capabilities: &["identify"],
    },
    // Device Type ID: 0x0015 (21 decimal)
    DeviceTypeMetadata {
        id: 0x0015,
        name: "Contact Sensor",
        display_category: CategoryKey::Sensors,
        spec_version: "1.0",
        mandatory_capabilities: &["contact"],
        optional_capabilities: &["identify"],
    },
    // Device Type ID: 0x0107 (263 decimal)
    DeviceTypeMetadata {
        id: 0x0107,
        name: "Occupancy Sensor",
        display_category: CategoryKey::Sensors,
        spec_version: "1.0",
        mandatory_capabilities: &["occupancy"],
        optional_capabilities: &["illuminance"],
    },
    // Device Type ID: 0x0302 (770 decimal)
    DeviceTypeMetadata {
        id: 0x0302,
        name: "Temperature Sensor",
        display_category: CategoryKey::Sensors,
        spec_version: "1.0",
        mandatory_capabilities: &["temperature"],
        optional_capabilities: &[],
    },
    // Device Type ID: 0x0307 (775 decimal)
    DeviceTypeMetadata {
        id: 0x0307,
        name: "Humidity Sensor",
        display_category: CategoryKey::Sensors,
        spec_version: "1.0",
        mandatory_capabilities: &["humidity"],
        optional_capabilities: &[],
    },
    // Device Type ID: 0x000A (10 decimal)
    DeviceTypeMetadata {
        id: 0x000A,
        name: "Door Lock",
        display_category: CategoryKey::Security,
        spec_version: "1.0",
        mandatory_capabilities: &["lock"],
        optional_capabilities: &["identify"],
    },
    // Device Type ID: 0x0076 (118 decimal)
    DeviceTypeMetadata {
        id: 0x0076,
        name: "Smoke/CO Alarm",
        display_category: CategoryKey::Security,
        spec_version: "1.2",
        mandatory_capabilities: &["smoke_alarm"],
        optional_capabilities: &[],
    },
    // Device Type ID: 0x0301 (769 decimal)
    DeviceTypeMetadata {
        id: 0x0301,
        name: "Thermostat",
        display_category: CategoryKey::Comfort,
        spec_version: "1.0",
        mandatory_capabilities: &["thermostat"],
        optional_capabilities: &["fan_mode", "humidity"],
    },
    // Device Type ID: 0x002B (43 decimal)
    DeviceTypeMetadata {
        id: 0x002B,
        name: "Fan",
        display_category: CategoryKey::Comfort,
        spec_version: "1.2",
        mandatory_capabilities: &["fan_mode"],
        optional_capabilities: &[],
    },
    // Device Type ID: 0x002C (44 decimal)
    DeviceTypeMetadata {
        id: 0x002C,
        name: "Air Quality Sensor",
        display_category: CategoryKey::Monitoring,
        spec_version: "1.2",
        mandatory_capabilities: &["air_quality"],
        optional_capabilities: &["temperature", "humidity"],
    },
    // Device Type ID: 0x0022 (34 decimal)
    DeviceTypeMetadata {
        id: 0x0022,
        name: "Speaker",
        display_category: CategoryKey::Media,
        spec_version: "1.0",
        mandatory_capabilities: &["on_off", "dimming"],
        optional_capabilities: &["media_playback", "audio_output"],
    },
];
