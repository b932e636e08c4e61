#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that reads the sentences spelled out on the grid.

use wordgrid_core::{Direction, Entity, EntityKind, Position, Sentence};

/// Scans every `is` word and appends the sentences it completes to `out`.
///
/// Each `is` is read twice: left to right (subject on its left, target on its
/// right) and top to bottom (subject above, target below). Both readings may
/// contribute. Sentences are appended in entity order, horizontal reading
/// first, and duplicates are kept.
pub fn derive(entities: &[Entity], out: &mut Vec<Sentence>) {
    let first = out.len();
    for operator in entities.iter().filter(|entity| entity.kind() == EntityKind::Is) {
        let cell = operator.position();
        for (before, after) in [
            (Direction::Left, Direction::Right),
            (Direction::Up, Direction::Down),
        ] {
            if let Some(sentence) = read(entities, cell, before, after) {
                out.push(sentence);
            }
        }
    }

    for sentence in &out[first..] {
        log::debug!("derived `{sentence}`");
    }
}

fn read(
    entities: &[Entity],
    operator: Position,
    before: Direction,
    after: Direction,
) -> Option<Sentence> {
    let subject = word_at(entities, operator.offset(before)?, |entity| {
        entity.kind().noun()
    })?;
    let target = word_at(entities, operator.offset(after)?, |entity| {
        entity.kind().rule_target()
    })?;
    Some(Sentence::new(subject, target))
}

fn word_at<T>(
    entities: &[Entity],
    cell: Position,
    meaning: impl Fn(&Entity) -> Option<T>,
) -> Option<T> {
    entities
        .iter()
        .filter(|entity| entity.position() == cell)
        .find_map(meaning)
}
