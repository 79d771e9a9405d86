//! End-to-end generation from in-memory templates.

use descent::template::TemplateBlock;
use descent::{
    ConfigError, GenerateError, GenerationConfig, LoadError, MARKER_BLOCK, MemorySource,
    NoSolutionReason, Piece, PieceRole, Template, TemplateId, generate,
};
use descent_base::math::{AxisBox, GridPoint};
use itertools::Itertools as _;
use pretty_assertions::assert_eq;
use rand::SeedableRng as _;
use rand_xoshiro::Xoshiro256Plus;
use rstest::rstest;

fn region(min: [i32; 3], max: [i32; 3]) -> AxisBox {
    AxisBox::new(min, max).unwrap()
}

/// A one-cube corridor piece open on all sides.
fn hall() -> Template {
    let cube = region([0, 0, 0], [0, 0, 0]);
    let mut template = Template::new("hall", cube, vec![cube]);
    template.blocks.push(TemplateBlock {
        position: [0, 0, 0],
        block: "air".into(),
    });
    template
}

/// A 5×3×5 room with a doorway in the middle of each wall and a stone floor.
fn room(name: &str) -> Template {
    let mut template = Template::new(
        name,
        region([0, 0, 0], [4, 2, 4]),
        vec![
            region([0, 1, 2], [0, 1, 2]),
            region([4, 1, 2], [4, 1, 2]),
            region([2, 1, 0], [2, 1, 0]),
            region([2, 1, 4], [2, 1, 4]),
        ],
    );
    for (x, z) in (0..5).cartesian_product(0..5) {
        template.blocks.push(TemplateBlock {
            position: [x, 0, z],
            block: "stone".into(),
        });
    }
    template
}

fn templates() -> MemorySource {
    [hall(), room("start"), room("end"), room("vault"), room("cellar")]
        .into_iter()
        .collect()
}

fn config() -> GenerationConfig {
    let mut config = GenerationConfig::new(
        "start",
        "end",
        ["vault".into(), "cellar".into()],
        ["hall".into()],
        5,
        [3, 1, 3],
    );
    config.rooms[1].weight = 2;
    config
}

fn rng(seed: u64) -> Xoshiro256Plus {
    Xoshiro256Plus::seed_from_u64(seed)
}

/// Returns whether every piece can be reached from every other through connected
/// openings.
fn all_connected(pieces: &[&Piece]) -> bool {
    let mut reached = vec![false; pieces.len()];
    let mut stack = vec![0];
    reached[0] = true;
    while let Some(i) = stack.pop() {
        for (j, other) in pieces.iter().enumerate() {
            let touching = pieces[i]
                .openings()
                .iter()
                .any(|a| other.openings().iter().any(|b| a.is_connected(b)));
            if !reached[j] && touching {
                reached[j] = true;
                stack.push(j);
            }
        }
    }
    reached.into_iter().all(|r| r)
}

#[test]
fn generates_connected_dungeon() {
    let dungeon = generate(&config(), &mut templates(), &mut rng(1)).unwrap();

    assert_eq!(dungeon.rooms.len(), 5);
    assert_eq!(dungeon.start().template().as_str(), "start");
    assert_eq!(dungeon.end().template().as_str(), "end");
    assert_eq!(dungeon.report.tree_edges, 4);
    assert_eq!(
        dungeon.report.corridor_expansions.len(),
        dungeon.report.tree_edges + dungeon.report.back_edges
    );

    let everything: Vec<&Piece> = dungeon.rooms.iter().chain(&dungeon.corridors).collect();
    for (a, b) in everything.iter().tuple_combinations() {
        assert!(!a.bounds().intersects(b.bounds()), "{a:?} overlaps {b:?}");
    }
    assert!(all_connected(&everything));

    let bounds = dungeon.structure.bounds().unwrap();
    assert!(bounds.min().y >= 0);
    assert_eq!(dungeon.structure.block(GridPoint::origin()), Some(MARKER_BLOCK));
    for piece in &everything {
        assert!(piece.bounds().min().y >= 0);
    }

    let roles: Vec<PieceRole> = dungeon
        .structure
        .placements()
        .iter()
        .map(|p| p.role)
        .collect();
    assert_eq!(
        roles[..5].to_vec(),
        vec![
            PieceRole::Room,
            PieceRole::Room,
            PieceRole::Room,
            PieceRole::Start,
            PieceRole::End,
        ]
    );
    assert_eq!(roles.len(), 5 + dungeon.corridors.len());
    assert!(roles[5..].iter().all(|&r| r == PieceRole::Corridor));
}

#[test]
fn same_seed_same_dungeon() {
    let run = |seed| {
        let dungeon = generate(&config(), &mut templates(), &mut rng(seed)).unwrap();
        serde_json::to_string(&dungeon.structure).unwrap()
    };
    assert_eq!(run(42), run(42));
    assert_eq!(run(7), run(7));
}

#[test]
fn rotated_rooms() {
    let mut config = config();
    config.rotate_rooms = true;
    config.number_of_rooms = 6;
    for seed in 0..3 {
        let dungeon = generate(&config, &mut templates(), &mut rng(seed)).unwrap();
        let everything: Vec<&Piece> = dungeon.rooms.iter().chain(&dungeon.corridors).collect();
        assert!(all_connected(&everything), "seed {seed}");
    }
}

#[test]
fn two_rooms() {
    let mut config = config();
    config.number_of_rooms = 2;
    config.rooms.clear();
    let dungeon = generate(&config, &mut templates(), &mut rng(3)).unwrap();
    assert_eq!(dungeon.rooms.len(), 2);
    assert_eq!(dungeon.report.tree_edges, 1);
    assert!(!dungeon.corridors.is_empty());
}

#[test]
fn invalid_config() {
    let mut config = config();
    config.number_of_rooms = 1;
    assert!(matches!(
        generate(&config, &mut templates(), &mut rng(0)),
        Err(GenerateError::Config(ConfigError::TooFewRooms(1)))
    ));
}

#[test]
fn missing_template() {
    let mut config = config();
    config.paths.push("ladder".into());
    match generate(&config, &mut templates(), &mut rng(0)) {
        Err(GenerateError::Load(LoadError::NotFound(id))) => {
            assert_eq!(id, TemplateId::from("ladder"));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn template_without_dungeon_region() {
    let mut source = templates();
    let mut broken = room("vault");
    broken.dungeon = None;
    source.insert(broken);
    assert!(matches!(
        generate(&config(), &mut source, &mut rng(0)),
        Err(GenerateError::MissingDungeonRegion(id)) if id.as_str() == "vault"
    ));
}

#[test]
fn room_without_openings() {
    let mut source = templates();
    let mut sealed = room("cellar");
    sealed.openings.clear();
    source.insert(sealed);
    assert!(matches!(
        generate(&config(), &mut source, &mut rng(0)),
        Err(GenerateError::NoOpenings(id)) if id.as_str() == "cellar"
    ));
}

#[test]
fn malformed_openings_are_counted() {
    let mut source = templates();
    let mut odd = room("vault");
    odd.openings.push(region([2, 1, 2], [2, 1, 2]));
    source.insert(odd);
    let dungeon = generate(&config(), &mut source, &mut rng(5)).unwrap();
    assert_eq!(dungeon.report.malformed_openings, 1);
}

#[test]
fn no_corridor_pieces() {
    let mut config = config();
    config.paths.clear();
    config.placement_attempts = 2;
    match generate(&config, &mut templates(), &mut rng(0)) {
        Err(GenerateError::NoSolution {
            attempts,
            pairs,
            last,
        }) => {
            assert_eq!(attempts, 2);
            assert_eq!(pairs, config.opening_attempts);
            assert!(matches!(
                last.reason,
                NoSolutionReason::Exhausted { .. } | NoSolutionReason::Unreachable
            ));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[rstest]
#[case(1, 1)]
#[case(4, 4)]
#[case(100, 16)]
fn opening_attempts_limit_pairs_tried(#[case] opening_attempts: u32, #[case] expected: u32) {
    let mut config = config();
    config.paths.clear();
    config.placement_attempts = 1;
    config.opening_attempts = opening_attempts;
    match generate(&config, &mut templates(), &mut rng(3)) {
        Err(GenerateError::NoSolution {
            attempts, pairs, ..
        }) => {
            assert_eq!((attempts, pairs), (1, expected));
        }
        other => panic!("unexpected result {other:?}"),
    }
}
