use wordgrid_core::{
    Command, Direction, Effect, EntityKind, Event, Grid, GridSize, Position, RuleTarget, Sentence,
};
use wordgrid_world::{self as world, query, World};

use EntityKind::*;

fn grid(rows: u32, columns: u32, cells: &[(EntityKind, u32, u32)]) -> Grid {
    let mut grid = Grid::new("test", GridSize::new(rows, columns));
    for &(kind, row, column) in cells {
        grid.place(kind, Position::new(row, column))
            .expect("cell lies inside the grid");
    }
    grid
}

fn start(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::settle(world, &mut events).expect("turn settles");
    events
}

fn turn(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    world::settle(world, &mut events).expect("turn settles");
    events
}

fn positions_of(world: &World, kind: EntityKind) -> Vec<Position> {
    query::entities(world)
        .iter()
        .filter(|entity| entity.kind() == kind)
        .map(|entity| entity.position())
        .collect()
}

fn layout(world: &World) -> Vec<(EntityKind, Position)> {
    query::entities(world)
        .iter()
        .map(|entity| (entity.kind(), entity.position()))
        .collect()
}

fn sentence(subject: EntityKind, effect: Effect) -> Sentence {
    Sentence::new(subject, RuleTarget::Effect(effect))
}

const BABA_IS_YOU: [(EntityKind, u32, u32); 3] = [(TextBaba, 0, 0), (Is, 0, 1), (You, 0, 2)];

fn with_baba_is_you(rest: &[(EntityKind, u32, u32)]) -> Vec<(EntityKind, u32, u32)> {
    BABA_IS_YOU.iter().chain(rest).copied().collect()
}

#[test]
fn startup_derives_the_player() {
    let mut world = World::new(grid(3, 3, &with_baba_is_you(&[(Baba, 2, 1)])));

    let events = start(&mut world);

    assert_eq!(
        events,
        vec![
            Event::RulesDerived {
                sentences: vec![sentence(Baba, Effect::You)],
            },
            Event::Settled {
                player: Some(Baba),
                game_over: false,
            },
        ]
    );
    assert_eq!(query::player(&world), Some(Baba));
    assert_eq!(query::active_rules(&world).len(), 1);
}

#[test]
fn directional_input_moves_every_player_entity() {
    let mut world = World::new(grid(
        4,
        4,
        &with_baba_is_you(&[(Baba, 2, 1), (Baba, 3, 0), (Rock, 3, 1)]),
    ));
    let _ = start(&mut world);

    let events = turn(&mut world, Command::Right);

    assert_eq!(
        events.first(),
        Some(&Event::PlayerMoved {
            kind: Baba,
            direction: Direction::Right,
            moved: 2,
        })
    );
    assert_eq!(
        positions_of(&world, Baba),
        vec![Position::new(2, 2), Position::new(3, 1)]
    );
    assert_eq!(
        positions_of(&world, Rock),
        vec![Position::new(3, 1)],
        "rocks are not pushable without a sentence"
    );
}

#[test]
fn moving_against_the_boundary_is_a_no_op() {
    let mut world = World::new(grid(3, 3, &with_baba_is_you(&[(Baba, 2, 0)])));
    let _ = start(&mut world);

    let events = turn(&mut world, Command::Left);

    assert_eq!(
        events.first(),
        Some(&Event::PlayerMoved {
            kind: Baba,
            direction: Direction::Left,
            moved: 0,
        })
    );
    assert_eq!(positions_of(&world, Baba), vec![Position::new(2, 0)]);
}

#[test]
fn words_are_always_pushable() {
    let mut world = World::new(grid(
        4,
        4,
        &with_baba_is_you(&[(Baba, 2, 0), (TextRock, 2, 1)]),
    ));
    let _ = start(&mut world);

    let _ = turn(&mut world, Command::Right);

    assert_eq!(positions_of(&world, Baba), vec![Position::new(2, 1)]);
    assert_eq!(positions_of(&world, TextRock), vec![Position::new(2, 2)]);
}

#[test]
fn word_on_the_edge_blocks_the_player() {
    let mut world = World::new(grid(3, 3, &with_baba_is_you(&[(Baba, 1, 1)])));
    let _ = start(&mut world);

    let _ = turn(&mut world, Command::Up);

    assert_eq!(positions_of(&world, Baba), vec![Position::new(1, 1)]);
    assert_eq!(positions_of(&world, Is), vec![Position::new(0, 1)]);
    assert_eq!(query::player(&world), Some(Baba));
}

#[test]
fn pushing_the_operator_out_of_line_breaks_the_sentence() {
    let mut world = World::new(grid(
        4,
        4,
        &[(TextBaba, 1, 0), (Is, 1, 1), (You, 1, 2), (Baba, 2, 1)],
    ));
    let _ = start(&mut world);
    assert_eq!(query::player(&world), Some(Baba));

    let _ = turn(&mut world, Command::Up);

    assert_eq!(positions_of(&world, Baba), vec![Position::new(1, 1)]);
    assert_eq!(positions_of(&world, Is), vec![Position::new(0, 1)]);
    assert_eq!(query::player(&world), None);
    assert!(query::sentences(&world).is_empty());

    let events = turn(&mut world, Command::Down);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::PlayerMoved { .. })));
    assert_eq!(positions_of(&world, Baba), vec![Position::new(1, 1)]);
}

#[test]
fn stop_blocks_the_player() {
    let mut world = World::new(grid(
        4,
        4,
        &with_baba_is_you(&[
            (TextWall, 1, 0),
            (Is, 1, 1),
            (Stop, 1, 2),
            (Baba, 3, 0),
            (Wall, 3, 1),
        ]),
    ));
    let _ = start(&mut world);

    let _ = turn(&mut world, Command::Right);

    assert_eq!(positions_of(&world, Baba), vec![Position::new(3, 0)]);
    assert_eq!(positions_of(&world, Wall), vec![Position::new(3, 1)]);
}

fn push_chain(wall_column: u32) -> World {
    World::new(grid(
        6,
        8,
        &with_baba_is_you(&[
            (TextRock, 1, 0),
            (Is, 1, 1),
            (Push, 1, 2),
            (TextWall, 2, 0),
            (Is, 2, 1),
            (Stop, 2, 2),
            (Baba, 4, 0),
            (Rock, 4, 1),
            (Rock, 4, 2),
            (Rock, 4, 3),
            (Wall, 4, wall_column),
        ]),
    ))
}

#[test]
fn blocked_push_chain_does_not_move() {
    let mut world = push_chain(4);
    let _ = start(&mut world);
    let before = layout(&world);

    let _ = turn(&mut world, Command::Right);

    assert_eq!(layout(&world), before);
}

#[test]
fn push_chain_with_room_moves_as_one() {
    let mut world = push_chain(5);
    let _ = start(&mut world);

    let _ = turn(&mut world, Command::Right);

    assert_eq!(positions_of(&world, Baba), vec![Position::new(4, 1)]);
    assert_eq!(
        positions_of(&world, Rock),
        vec![Position::new(4, 2), Position::new(4, 3), Position::new(4, 4)]
    );
    assert_eq!(positions_of(&world, Wall), vec![Position::new(4, 5)]);
}

fn words_against_a_wall(words: &[EntityKind]) -> World {
    let mut cells = with_baba_is_you(&[
        (TextWall, 1, 0),
        (Is, 1, 1),
        (Stop, 1, 2),
        (Baba, 3, 0),
    ]);
    let mut column = 1;
    for &word in words {
        cells.push((word, 3, column));
        column += 1;
    }
    cells.push((Wall, 3, column));
    World::new(grid(5, 5, &cells))
}

#[test]
fn word_pushed_into_a_wall_does_not_move() {
    let mut world = words_against_a_wall(&[TextRock]);
    let _ = start(&mut world);
    let before = layout(&world);

    let _ = turn(&mut world, Command::Right);

    assert_eq!(positions_of(&world, Baba), vec![Position::new(3, 0)]);
    assert_eq!(layout(&world), before);
}

#[test]
fn blocked_chain_of_words_does_not_move() {
    let mut world = words_against_a_wall(&[TextRock, TextFlag]);
    let _ = start(&mut world);
    let before = layout(&world);

    let _ = turn(&mut world, Command::Right);

    assert_eq!(layout(&world), before);
    assert_eq!(query::player(&world), Some(Baba));
}

#[test]
fn kill_removes_the_victim_and_keeps_the_killer() {
    let mut world = World::new(grid(
        5,
        5,
        &with_baba_is_you(&[
            (TextLava, 2, 0),
            (Is, 2, 1),
            (Kill, 2, 2),
            (Baba, 4, 0),
            (Lava, 4, 1),
        ]),
    ));
    let _ = start(&mut world);

    let _ = turn(&mut world, Command::Right);

    assert!(positions_of(&world, Baba).is_empty());
    assert_eq!(positions_of(&world, Lava), vec![Position::new(4, 1)]);
}

#[test]
fn sink_destroys_both_entities() {
    let mut world = World::new(grid(
        5,
        6,
        &with_baba_is_you(&[
            (TextWater, 2, 0),
            (Is, 2, 1),
            (Sink, 2, 2),
            (Baba, 4, 0),
            (Water, 4, 1),
            (Water, 4, 4),
        ]),
    ));
    let _ = start(&mut world);

    let _ = turn(&mut world, Command::Right);

    assert!(positions_of(&world, Baba).is_empty());
    assert_eq!(
        positions_of(&world, Water),
        vec![Position::new(4, 4)],
        "water alone on its cell survives"
    );
}

#[test]
fn killing_the_operator_takes_control_away() {
    let mut world = World::new(grid(
        5,
        5,
        &with_baba_is_you(&[
            (TextLava, 2, 0),
            (Is, 2, 1),
            (Kill, 2, 2),
            (Lava, 0, 1),
            (Baba, 4, 1),
        ]),
    ));

    let _ = start(&mut world);
    assert_eq!(
        positions_of(&world, Is),
        vec![Position::new(2, 1)],
        "lava killed the first operator"
    );
    assert_eq!(query::player(&world), Some(Baba));

    let _ = turn(&mut world, Command::Right);
    assert_eq!(positions_of(&world, Baba), vec![Position::new(4, 2)]);
    assert_eq!(query::player(&world), None);
    assert_eq!(query::sentences(&world), &[sentence(Lava, Effect::Kill)]);

    let events = turn(&mut world, Command::Right);
    assert_eq!(positions_of(&world, Baba), vec![Position::new(4, 2)]);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::PlayerMoved { .. })));
}

#[test]
fn reaching_a_win_ends_the_game() {
    let mut world = World::new(grid(
        4,
        4,
        &with_baba_is_you(&[
            (TextFlag, 1, 0),
            (Is, 1, 1),
            (Win, 1, 2),
            (Baba, 3, 0),
            (Flag, 3, 1),
        ]),
    ));
    let _ = start(&mut world);
    assert!(!query::is_game_over(&world));

    let events = turn(&mut world, Command::Right);

    assert!(events.contains(&Event::GameWon));
    assert_eq!(
        events.last(),
        Some(&Event::Settled {
            player: Some(Baba),
            game_over: true,
        })
    );

    let frozen = query::grid(&world).clone();
    let events = turn(&mut world, Command::Left);
    assert_eq!(
        events,
        vec![Event::Settled {
            player: Some(Baba),
            game_over: true,
        }]
    );
    assert_eq!(query::grid(&world), &frozen);

    let _ = turn(&mut world, Command::Reset);
    assert_eq!(query::grid(&world), &frozen, "the finished game is inert");
}

#[test]
fn player_that_is_win_wins_at_once() {
    let mut world = World::new(grid(
        3,
        3,
        &with_baba_is_you(&[(TextBaba, 1, 0), (Is, 1, 1), (Win, 1, 2), (Baba, 2, 2)]),
    ));

    let events = start(&mut world);

    assert!(events.contains(&Event::GameWon));
    assert!(query::is_game_over(&world));
}

#[test]
fn transform_changes_kind_and_reset_restores_it() {
    let initial = grid(
        4,
        4,
        &with_baba_is_you(&[
            (TextRock, 1, 0),
            (Is, 1, 1),
            (TextFlag, 1, 2),
            (Baba, 3, 0),
            (Rock, 3, 3),
        ]),
    );
    let mut world = World::new(initial.clone());
    let _ = start(&mut world);
    assert_eq!(positions_of(&world, Flag), vec![Position::new(3, 3)]);
    assert!(positions_of(&world, Rock).is_empty());

    let _ = turn(&mut world, Command::Right);
    let mut events = Vec::new();
    world::apply(&mut world, Command::Reset, &mut events);

    assert_eq!(events, vec![Event::GridReset]);
    assert_eq!(query::grid(&world), &initial);
}

#[test]
fn sentence_targeting_is_turns_entities_into_words() {
    let mut world = World::new(grid(
        4,
        4,
        &with_baba_is_you(&[
            (TextRock, 1, 0),
            (Is, 1, 1),
            (Is, 1, 2),
            (Rock, 3, 3),
        ]),
    ));

    let _ = start(&mut world);

    assert_eq!(
        query::entities_at(&world, Position::new(3, 3))
            .map(|entity| entity.kind())
            .collect::<Vec<_>>(),
        vec![Is]
    );
}

#[test]
fn save_is_delegated_and_quit_ends_the_game() {
    let mut world = World::new(grid(3, 3, &with_baba_is_you(&[(Baba, 2, 1)])));
    let _ = start(&mut world);
    let before = query::grid(&world).clone();

    let events = turn(&mut world, Command::Save);
    assert_eq!(events.first(), Some(&Event::SaveRequested));
    assert_eq!(query::grid(&world), &before);

    let events = turn(&mut world, Command::Quit);
    assert_eq!(
        events,
        vec![
            Event::QuitRequested,
            Event::Settled {
                player: Some(Baba),
                game_over: true,
            },
        ]
    );
    assert!(query::is_game_over(&world));
}

#[test]
fn none_command_still_runs_a_turn() {
    let mut world = World::new(grid(3, 3, &with_baba_is_you(&[(Baba, 2, 1)])));
    let _ = start(&mut world);

    let events = turn(&mut world, Command::None);

    assert_eq!(
        events,
        vec![
            Event::RulesDerived {
                sentences: vec![sentence(Baba, Effect::You)],
            },
            Event::Settled {
                player: Some(Baba),
                game_over: false,
            },
        ]
    );
    assert_eq!(query::level_name(&world), "test");
    assert_eq!(query::size(&world), GridSize::new(3, 3));
}
