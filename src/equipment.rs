//! Stock equipment table.

use crate::catalog::{DeviceCategory, DeviceDefinition, Port, PortKind};

pub const POWER_STRIP_ID: &str = "pwr-strip";
pub const XDJ_XZ_ID: &str = "xdj-xz";
pub const XDJ_RX3_ID: &str = "xdj-rx3";
pub const TRAKTOR_S4_ID: &str = "traktor-s4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpeakerSize {
    Eight,
    Ten,
    Twelve,
    Fifteen,
    Eighteen,
    Column,
}

impl SpeakerSize {
    fn inches(self) -> &'static str {
        match self {
            Self::Eight => "8",
            Self::Ten => "10",
            Self::Twelve => "12",
            Self::Fifteen => "15",
            Self::Eighteen => "18",
            Self::Column => "column",
        }
    }
}

fn device(
    id: &str,
    model: &str,
    manufacturer: &str,
    category: DeviceCategory,
    size: (f64, f64, f64),
    description: &str,
) -> DeviceDefinition {
    let (width, height, rear_height) = size;
    DeviceDefinition {
        id: id.to_string(),
        model: model.to_string(),
        manufacturer: manufacturer.to_string(),
        category,
        width,
        height,
        rear_height: Some(rear_height),
        description: description.to_string(),
        subwoofer: None,
        turntable: None,
        front_ports: Vec::new(),
        back_ports: Vec::new(),
    }
}

fn speaker(id: &str, model: &str, manufacturer: &str, size: SpeakerSize, sub: bool) -> DeviceDefinition {
    let (width, height) = match (sub, size) {
        (true, SpeakerSize::Twelve) => (400.0, 450.0),
        (true, SpeakerSize::Fifteen) => (500.0, 550.0),
        (true, SpeakerSize::Eighteen) => (600.0, 650.0),
        (false, SpeakerSize::Eight) => (250.0, 400.0),
        (false, SpeakerSize::Ten) => (300.0, 500.0),
        (false, SpeakerSize::Twelve) => (360.0, 600.0),
        (false, SpeakerSize::Fifteen) => (430.0, 700.0),
        (false, SpeakerSize::Column) => (350.0, 800.0),
        _ => (350.0, 600.0),
    };

    let description = if sub {
        format!("{}-inch Active Subwoofer.", size.inches())
    } else {
        format!("{}-inch Powered PA Speaker.", size.inches())
    };

    let mut def = device(id, model, manufacturer, DeviceCategory::Speaker, (width, height, height), &description);
    def.subwoofer = Some(sub);

    def.front_ports = if size == SpeakerSize::Column {
        (0..6)
            .map(|i| Port::new(&format!("driver-{}", i), PortKind::Visual, width / 2.0, 100.0 + 90.0 * i as f64))
            .chain(std::iter::once(Port::new("sub-base", PortKind::Visual, width / 2.0, height - 150.0)))
            .collect()
    } else if sub {
        vec![Port::labeled("woofer", PortKind::Visual, width / 2.0, height / 2.0, &format!("{}\" SUB", size.inches()))]
    } else {
        vec![
            Port::new("woofer", PortKind::Visual, width / 2.0, height - width / 2.0 - 20.0),
            Port::new("tweeter", PortKind::Visual, width / 2.0, height / 4.0),
        ]
    };

    def.back_ports = vec![
        Port::labeled("ac", PortKind::Power, width / 2.0 - 20.0, height - 50.0, "AC IN"),
        Port::labeled("vol", PortKind::Visual, width - 60.0, 100.0, "GAIN"),
    ];
    if sub {
        def.back_ports.extend([
            Port::labeled("xlr-in-l", PortKind::Xlr, 60.0, 100.0, "IN L"),
            Port::labeled("xlr-in-r", PortKind::Xlr, 110.0, 100.0, "IN R"),
            Port::labeled("xlr-out-l", PortKind::Xlr, 60.0, 160.0, "OUT L"),
            Port::labeled("xlr-out-r", PortKind::Xlr, 110.0, 160.0, "OUT R"),
        ]);
    } else {
        def.back_ports.extend([
            Port::labeled("xlr-in-1", PortKind::Xlr, 60.0, 100.0, "IN 1"),
            Port::labeled("xlr-in-2", PortKind::Xlr, 60.0, 150.0, "IN 2"),
            Port::labeled("xlr-out", PortKind::Xlr, 60.0, 200.0, "THRU"),
        ]);
    }
    def
}

fn cdj_3000() -> DeviceDefinition {
    let mut d = device(
        "cdj-3000",
        "CDJ-3000",
        "Pioneer DJ",
        DeviceCategory::Player,
        (329.0, 453.0, 120.0),
        "Professional DJ Multi Player with 9-inch touch screen.",
    );
    d.front_ports = vec![
        Port::labeled("screen", PortKind::Visual, 20.0, 20.0, "TOUCH DISPLAY"),
        Port::labeled("jog", PortKind::Visual, 164.5, 280.0, "VINYL MODE"),
        Port::labeled("usb", PortKind::Data, 280.0, 30.0, "USB"),
    ];
    d.back_ports = vec![
        Port::labeled("pwr", PortKind::Power, 20.0, 60.0, "AC IN"),
        Port::labeled("rca", PortKind::Rca, 100.0, 60.0, "AUDIO OUT"),
        Port::labeled("digital", PortKind::Rca, 140.0, 60.0, "DIGITAL"),
        Port::labeled("link", PortKind::Data, 200.0, 60.0, "LINK"),
    ];
    d
}

fn djm_900() -> DeviceDefinition {
    let mut d = device(
        "djm-900",
        "DJM-900NXS2",
        "Pioneer DJ",
        DeviceCategory::Mixer,
        (333.0, 414.0, 120.0),
        "4-channel professional mixer with 64-bit mixing processor.",
    );
    d.front_ports = (1..=4)
        .map(|ch| Port::labeled(&format!("fader{}", ch), PortKind::Visual, 45.0 + 60.0 * (ch - 1) as f64, 280.0, &format!("CH{}", ch)))
        .collect();
    d.back_ports = vec![
        Port::labeled("xlr-out-l", PortKind::Xlr, 40.0, 70.0, "MAIN L"),
        Port::labeled("xlr-out-r", PortKind::Xlr, 80.0, 70.0, "MAIN R"),
        Port::labeled("ac-in", PortKind::Power, 280.0, 70.0, "AC"),
    ];
    d.back_ports.extend((1..=4).map(|ch| {
        Port::labeled(&format!("rca-in-{}", ch), PortKind::Rca, 40.0 + 60.0 * (ch - 1) as f64, 30.0, &format!("CH{}", ch))
    }));
    d
}

fn sl_1200() -> DeviceDefinition {
    let mut d = device(
        "sl-1200",
        "SL-1210MK7",
        "Technics",
        DeviceCategory::Player,
        (453.0, 353.0, 100.0),
        "Direct Drive Turntable.",
    );
    d.turntable = Some(true);
    d.front_ports = vec![Port::labeled("platter", PortKind::Visual, 226.0, 176.0, "PLATTER")];
    d.back_ports = vec![
        Port::labeled("rca-out", PortKind::Rca, 200.0, 50.0, "PHONO"),
        Port::labeled("gnd", PortKind::Ground, 230.0, 50.0, "GND"),
        Port::labeled("ac", PortKind::Power, 50.0, 50.0, "AC"),
    ];
    d
}

fn xdj_xz() -> DeviceDefinition {
    let mut d = device(XDJ_XZ_ID, "XDJ-XZ", "Pioneer DJ", DeviceCategory::AllInOne, (878.0, 466.0, 140.0), "Professional All-in-One.");
    d.front_ports = vec![
        Port::labeled("jog-1", PortKind::Visual, 180.0, 280.0, "DECK 1"),
        Port::labeled("jog-2", PortKind::Visual, 700.0, 280.0, "DECK 2"),
    ];
    d.back_ports = vec![
        Port::new("ac", PortKind::Power, 50.0, 80.0),
        Port::labeled("rca-in-3", PortKind::Rca, 300.0, 80.0, "CH3"),
        Port::labeled("rca-in-4", PortKind::Rca, 350.0, 80.0, "CH4"),
        Port::labeled("xlr-out-l", PortKind::Xlr, 600.0, 80.0, "MAIN L"),
        Port::labeled("xlr-out-r", PortKind::Xlr, 640.0, 80.0, "MAIN R"),
    ];
    d
}

fn xdj_rx3() -> DeviceDefinition {
    let mut d = device(XDJ_RX3_ID, "XDJ-RX3", "Pioneer DJ", DeviceCategory::AllInOne, (728.0, 469.0, 140.0), "2-Channel All-in-One.");
    d.front_ports = vec![Port::new("jog-1", PortKind::Visual, 150.0, 300.0)];
    d.back_ports = vec![
        Port::new("ac", PortKind::Power, 40.0, 80.0),
        Port::new("rca-in-1", PortKind::Rca, 200.0, 80.0),
        Port::new("rca-in-2", PortKind::Rca, 240.0, 80.0),
        Port::labeled("xlr-out-l", PortKind::Xlr, 400.0, 80.0, "MAIN L"),
        Port::labeled("xlr-out-r", PortKind::Xlr, 440.0, 80.0, "MAIN R"),
    ];
    d
}

fn traktor_s4() -> DeviceDefinition {
    let mut d = device(
        TRAKTOR_S4_ID,
        "Kontrol S4 MK3",
        "Native Instruments",
        DeviceCategory::Controller,
        (542.0, 339.0, 100.0),
        "4-Channel DJ Controller.",
    );
    d.front_ports = vec![
        Port::new("jog-1", PortKind::Visual, 130.0, 200.0),
        Port::new("jog-2", PortKind::Visual, 412.0, 200.0),
    ];
    d.back_ports = vec![Port::labeled("usb", PortKind::Data, 40.0, 50.0, "USB")];
    d.back_ports.extend((1..=4).map(|ch| Port::new(&format!("rca-in-{}", ch), PortKind::Rca, 120.0 + 40.0 * (ch - 1) as f64, 50.0)));
    d.back_ports.extend([
        Port::labeled("xlr-out-l", PortKind::Xlr, 350.0, 50.0, "MAIN L"),
        Port::labeled("xlr-out-r", PortKind::Xlr, 380.0, 50.0, "MAIN R"),
        Port::new("ac", PortKind::Power, 500.0, 50.0),
    ]);
    d
}

fn hd25() -> DeviceDefinition {
    let mut d = device(
        "senn-hd25",
        "HD-25",
        "Sennheiser",
        DeviceCategory::Accessory,
        (180.0, 180.0, 50.0),
        "Industry Standard Monitoring Headphones.",
    );
    d.front_ports = vec![Port::labeled("cups", PortKind::Visual, 90.0, 90.0, "PHONES")];
    d
}

fn power_strip() -> DeviceDefinition {
    let mut d = device(
        POWER_STRIP_ID,
        "Power Strip",
        "Generic",
        DeviceCategory::Accessory,
        (400.0, 60.0, 60.0),
        "6-Way Power Distribution Unit.",
    );
    d.front_ports = vec![Port::labeled("switch", PortKind::Visual, 30.0, 20.0, "I/O")];
    d.back_ports = vec![Port::labeled("ac-in", PortKind::Power, 380.0, 30.0, "MAINS")];
    d.back_ports.extend((1..=6).map(|n| Port::new(&format!("ac-{}", n), PortKind::Power, 50.0 * n as f64, 30.0)));
    d
}

/// Every device the engine ships with, in catalog order.
pub fn stock_devices() -> Vec<DeviceDefinition> {
    use SpeakerSize::*;

    let mut devices = vec![cdj_3000(), djm_900(), sl_1200(), xdj_xz(), xdj_rx3(), traktor_s4(), hd25(), power_strip()];

    let speakers: &[(&str, &str, &str, SpeakerSize, bool)] = &[
        ("jbl-irx112", "IRX112BT", "JBL", Twelve, false),
        ("jbl-irx115", "IRX115", "JBL", Fifteen, false),
        ("jbl-eon710", "EON710", "JBL", Ten, false),
        ("jbl-eon715", "EON715", "JBL", Fifteen, false),
        ("jbl-prx815xlf", "PRX815XLF", "JBL", Fifteen, true),
        ("jbl-prx818xlf", "PRX818XLF", "JBL", Eighteen, true),
        ("jbl-srx818sp", "SRX818SP", "JBL", Eighteen, true),
        ("jbl-prx908", "PRX908", "JBL", Eight, false),
        ("jbl-prx915", "PRX915", "JBL", Fifteen, false),
        ("jbl-eon712", "EON712", "JBL", Twelve, false),
        ("qsc-cp12", "CP12", "QSC", Twelve, false),
        ("qsc-k12-2", "K12.2", "QSC", Twelve, false),
        ("qsc-k10-2", "K10.2", "QSC", Ten, false),
        ("qsc-cp8", "CP8", "QSC", Eight, false),
        ("qsc-k8-2", "K8.2", "QSC", Eight, false),
        ("qsc-cp15", "CP15", "QSC", Fifteen, false),
        ("qsc-kw153", "KW153", "QSC", Fifteen, false),
        ("qsc-ks118", "KS118", "QSC", Eighteen, true),
        ("qsc-ks112", "KS112", "QSC", Twelve, true),
        ("ev-zlx12p", "ZLX-12P", "Electro-Voice", Twelve, false),
        ("ev-zlx15p", "ZLX-15P", "Electro-Voice", Fifteen, false),
        ("ev-elx200-12p", "ELX200-12P", "Electro-Voice", Twelve, false),
        ("ev-elx200-15p", "ELX200-15P", "Electro-Voice", Fifteen, false),
        ("ev-ekx12p", "EKX-12P", "Electro-Voice", Twelve, false),
        ("ev-ekx15p", "EKX-15P", "Electro-Voice", Fifteen, false),
        ("ev-etx12p", "ETX-12P", "Electro-Voice", Twelve, false),
        ("ev-evolve50", "Evolve 50", "Electro-Voice", Column, false),
        ("ev-elx200-18sp", "ELX200-18SP", "Electro-Voice", Eighteen, true),
        ("ev-etx18sp", "ETX-18SP", "Electro-Voice", Eighteen, true),
        ("yam-dbr12", "DBR12", "Yamaha", Twelve, false),
        ("yam-dbr10", "DBR10", "Yamaha", Ten, false),
        ("yam-dbr15", "DBR15", "Yamaha", Fifteen, false),
        ("yam-dxr12", "DXR12mkII", "Yamaha", Twelve, false),
        ("yam-dxr10", "DXR10mkII", "Yamaha", Ten, false),
        ("yam-dzr12", "DZR12", "Yamaha", Twelve, false),
        ("yam-dzr10", "DZR10", "Yamaha", Ten, false),
        ("yam-dxs18", "DXS18", "Yamaha", Eighteen, true),
        ("yam-dxs12", "DXS12mkII", "Yamaha", Twelve, true),
        ("rcf-art912", "ART 912-A", "RCF", Twelve, false),
        ("rcf-art915", "ART 915-A", "RCF", Fifteen, false),
        ("rcf-evox12", "EVOX 12", "RCF", Column, false),
        ("rcf-sub8004", "SUB 8004-AS II", "RCF", Eighteen, true),
        ("wharf-delta18", "Delta 18A", "Wharfedale", Eighteen, true),
        ("wharf-titan18", "Titan 18A", "Wharfedale", Eighteen, true),
        ("wharf-evp18s", "EVP-18S", "Wharfedale", Eighteen, true),
        ("ld-sub18", "SUB 18DF", "LD Systems", Eighteen, true),
        ("ld-maui28", "MAUI 28 G2 Sub", "LD Systems", Twelve, true),
        ("bose-f1", "F1 Subwoofer", "Bose", Twelve, true),
        ("bose-l1", "L1 Pro Sub1", "Bose", Twelve, true),
    ];

    devices.extend(
        speakers
            .iter()
            .map(|&(id, model, manufacturer, size, sub)| speaker(id, model, manufacturer, size, sub)),
    );
    devices
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique() {
        let devices = stock_devices();
        let ids: HashSet<_> = devices.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), devices.len());
    }

    #[test]
    fn test_port_ids_unique_per_device() {
        for d in stock_devices() {
            let mut seen = HashSet::new();
            for p in d.front_ports.iter().chain(d.back_ports.iter()) {
                assert!(seen.insert(p.id.clone()), "{} has duplicate port {}", d.id, p.id);
            }
        }
    }

    #[test]
    fn test_strip_has_six_outlets() {
        let strip = stock_devices().into_iter().find(|d| d.id == POWER_STRIP_ID).unwrap();
        let outlets = strip.back_ports.iter().filter(|p| p.id.starts_with("ac-") && p.id != "ac-in").count();
        assert_eq!(outlets, 6);
    }
}
