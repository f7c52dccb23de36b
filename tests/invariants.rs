//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use boothforge_core::{
    analyze_setup, auto_arrange, calculate_cable_geometry, generate_cables, generate_manifest,
    config::{LayoutConfig, ViewConfig},
    readiness::MISSING_HUB,
    Cable, CableKind, Catalog, Face, ManifestCategory, OmissionKind, PlacedItem, Point, ReadinessStatus,
};

fn item(id: &str, device: &str, x: f64) -> PlacedItem {
    PlacedItem::new(id, device, x, 0.0)
}

fn endpoints(cables: &[Cable]) -> Vec<(String, String, Option<(String, String)>)> {
    cables
        .iter()
        .map(|c| {
            (
                c.from.instance_id.clone(),
                c.from.port_id.clone(),
                c.to.as_ref().map(|t| (t.instance_id.clone(), t.port_id.clone())),
            )
        })
        .collect()
}

fn target(c: &Cable) -> Option<(&str, &str)> {
    c.to.as_ref().map(|t| (t.instance_id.as_str(), t.port_id.as_str()))
}

#[test]
fn invariant_no_hub_is_incomplete() {
    let catalog = Catalog::builtin();
    let booths: Vec<Vec<PlacedItem>> = vec![
        vec![item("a", "cdj-3000", 0.0)],
        vec![item("a", "qsc-k12-2", 0.0), item("b", "qsc-ks118", 100.0)],
        vec![item("a", "senn-hd25", 0.0), item("b", "pwr-strip", 0.0), item("c", "sl-1200", 0.0)],
        vec![item("a", "not-in-catalog", 0.0)],
    ];

    for booth in booths {
        let result = analyze_setup(&booth, &catalog);
        assert_eq!(result.status, ReadinessStatus::Incomplete);
        assert!(result.missing.iter().any(|m| m == MISSING_HUB));
    }
}

#[test]
fn invariant_empty_booth() {
    let result = analyze_setup(&[], &Catalog::builtin());
    assert_eq!(result.status, ReadinessStatus::Empty);
    assert!(result.capabilities.is_empty());
    assert!(result.missing.is_empty());
}

#[test]
fn invariant_topology_order_stable() {
    let catalog = Catalog::builtin();
    let shuffled = vec![
        item("top-b", "qsc-k12-2", 1400.0),
        item("deck-b", "cdj-3000", 900.0),
        item("mixer", "djm-900", 500.0),
        item("sub", "qsc-ks118", 1800.0),
        item("deck-a", "cdj-3000", 100.0),
        item("top-a", "qsc-k12-2", -400.0),
    ];
    let mut sorted = shuffled.clone();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let audio = |items: &[PlacedItem]| {
        let cables = generate_cables(items, &catalog).output;
        let mut ends = endpoints(&cables.into_iter().filter(|c| c.kind == CableKind::Audio).collect::<Vec<_>>());
        ends.sort();
        ends
    };
    assert_eq!(audio(&shuffled), audio(&sorted));
}

#[test]
fn invariant_geometry_pure() {
    let cases = [
        (Point::new(0.0, 0.0), Point::new(300.0, 40.0), 0),
        (Point::new(500.0, 200.0), Point::new(10.0, 0.0), 5),
        (Point::new(50.0, 0.0), Point::new(52.0, 400.0), 2),
        (Point::new(50.0, 0.0), Point::new(60.0, 10.0), 11),
    ];
    for (start, end, lane) in cases {
        let first = calculate_cable_geometry(start, end, lane);
        let second = calculate_cable_geometry(start, end, lane);
        assert_eq!(first, second);
        assert_eq!(first.to_svg(), second.to_svg());
    }
}

#[test]
fn invariant_mixer_channels_follow_players() {
    let catalog = Catalog::builtin();
    let mut items = vec![item("mixer", "djm-900", 1000.0)];
    items.extend((0..4).map(|n| item(&format!("p{}", n), "cdj-3000", n as f64 * 200.0)));

    let feeds = |items: &[PlacedItem]| {
        let outcome = generate_cables(items, &catalog);
        let feeds: Vec<(String, String)> = outcome
            .output
            .iter()
            .filter(|c| c.kind == CableKind::Audio && c.from.instance_id.starts_with('p'))
            .filter_map(|c| target(c).map(|(_, port)| (c.from.instance_id.clone(), port.to_string())))
            .collect();
        (feeds, outcome.count(OmissionKind::CapacityExceeded))
    };

    let (four, over) = feeds(&items);
    assert_eq!(
        four,
        vec![
            ("p0".to_string(), "rca-in-1".to_string()),
            ("p1".to_string(), "rca-in-2".to_string()),
            ("p2".to_string(), "rca-in-3".to_string()),
            ("p3".to_string(), "rca-in-4".to_string()),
        ]
    );
    assert_eq!(over, 0);

    items.push(item("p4", "cdj-3000", 900.0));
    let (five, over) = feeds(&items);
    assert_eq!(five, four);
    assert_eq!(over, 1);
}

#[test]
fn invariant_subs_and_tops_wiring() {
    let catalog = Catalog::builtin();
    let items = vec![
        item("mixer", "djm-900", 800.0),
        item("sub-1", "qsc-ks118", 1200.0),
        item("sub-0", "qsc-ks118", 0.0),
        item("top-1", "qsc-k12-2", 1300.0),
        item("top-0", "qsc-k12-2", 100.0),
    ];
    let cables = generate_cables(&items, &catalog).output;
    let audio: Vec<_> = cables.iter().filter(|c| c.kind == CableKind::Audio).collect();
    let wiring: Vec<_> = audio
        .iter()
        .map(|c| (c.from.instance_id.as_str(), c.from.port_id.as_str(), target(c)))
        .collect();

    assert_eq!(
        wiring,
        vec![
            ("mixer", "xlr-out-l", Some(("sub-0", "xlr-in-l"))),
            ("mixer", "xlr-out-r", Some(("sub-1", "xlr-in-r"))),
            ("sub-0", "xlr-out-l", Some(("top-0", "xlr-in-1"))),
            ("sub-1", "xlr-out-r", Some(("top-1", "xlr-in-1"))),
        ]
    );
}

#[test]
fn invariant_power_strip_capacity() {
    let catalog = Catalog::builtin();
    let mut items = vec![item("strip", "pwr-strip", 0.0)];
    items.extend((0..3).map(|n| item(&format!("d{}", n), "cdj-3000", n as f64 * 100.0)));

    let power = |items: &[PlacedItem]| -> Vec<Cable> {
        generate_cables(items, &catalog)
            .output
            .into_iter()
            .filter(|c| c.kind == CableKind::Power)
            .collect()
    };

    let cables = power(&items);
    let outlets: Vec<_> = cables
        .iter()
        .filter(|c| c.from.instance_id != "strip")
        .map(|c| target(c))
        .collect();
    assert_eq!(outlets, vec![Some(("strip", "ac-1")), Some(("strip", "ac-2")), Some(("strip", "ac-3"))]);

    let inlet = cables.iter().find(|c| c.from.instance_id == "strip").unwrap();
    assert_eq!(inlet.from.port_id, "ac-in");
    assert!(inlet.is_dangling());

    items.extend((3..7).map(|n| item(&format!("d{}", n), "cdj-3000", n as f64 * 100.0)));
    let cables = power(&items);
    let seventh = cables.iter().find(|c| c.from.instance_id == "d6").unwrap();
    assert!(seventh.is_dangling());
    let sixth = cables.iter().find(|c| c.from.instance_id == "d5").unwrap();
    assert_eq!(target(sixth), Some(("strip", "ac-6")));
}

#[test]
fn invariant_manifest_groups_identical_models() {
    let catalog = Catalog::builtin();
    for n in 1..6 {
        let items: Vec<_> = (0..n).map(|i| item(&format!("t{}", i), "qsc-k12-2", i as f64)).collect();
        let rows = generate_manifest(&items, &[], &catalog);
        let devices: Vec<_> = rows.iter().filter(|r| r.category == ManifestCategory::Device).collect();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].quantity, n);
    }
}

#[test]
fn invariant_hub_centered_regardless_of_order() {
    let catalog = Catalog::builtin();
    let layout = LayoutConfig::default();
    let view = ViewConfig::default();
    let base = vec![
        item("deck-a", "cdj-3000", 50.0),
        item("mixer", "djm-900", 3000.0),
        item("top", "qsc-k12-2", -200.0),
        item("sub", "qsc-ks118", 10.0),
        item("phones", "senn-hd25", 70.0),
    ];

    for rotation in 0..base.len() {
        let mut items = base.clone();
        items.rotate_left(rotation);
        let arranged = auto_arrange(&items, &catalog, Face::Front, &layout, &view).items;
        let mixer = arranged.iter().find(|i| i.instance_id == "mixer").unwrap();
        let width = catalog.get("djm-900").unwrap().width;
        assert_eq!(mixer.x + width / 2.0, layout.center_x);
    }
}

#[test]
fn invariant_cable_ids_deterministic() {
    let catalog = Catalog::builtin();
    let items = vec![item("mixer", "djm-900", 0.0), item("tt", "sl-1200", 200.0), item("top", "qsc-k12-2", 400.0)];
    let a = generate_cables(&items, &catalog).output;
    let b = generate_cables(&items, &catalog).output;
    assert_eq!(a, b);
    assert!(a.iter().all(|c| c.id.starts_with("cab-")));
}

#[cfg(feature = "test-hooks")]
#[test]
fn invariant_readiness_recomputed_on_every_mutation() {
    use boothforge_core::session::get_readiness_call_count;
    use boothforge_core::BoothSession;

    let mut session = BoothSession::default();
    let before = get_readiness_call_count();

    let deck = session.add_item("cdj-3000").unwrap().instance_id.clone();
    session.add_item("djm-900").unwrap();
    session.move_item(&deck, 10.0, 20.0).unwrap();
    session.remove_item(&deck).unwrap();

    assert!(get_readiness_call_count() - before >= 4);
}
