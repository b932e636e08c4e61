#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the word grid engine.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! world, and the pure rule systems. Adapters submit [`Command`] values decoded
//! from player input, the world executes them via its `apply` entry point,
//! settles the grid by deriving and running rules, and then reports what
//! happened through [`Event`] values. The grid itself is described by
//! [`Grid`] and [`Entity`], whose kinds double as the words players push around
//! to spell out "X IS Y" sentences.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Player-facing commands accepted by the world.
///
/// Adapters map every key press they observe onto one of these values;
/// unrecognised input maps to [`Command::None`], which is a valid no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Moves every entity controlled by the player one cell up.
    Up,
    /// Moves every entity controlled by the player one cell down.
    Down,
    /// Moves every entity controlled by the player one cell left.
    Left,
    /// Moves every entity controlled by the player one cell right.
    Right,
    /// Restores the grid to the snapshot captured when the level was loaded.
    Reset,
    /// Requests that the current grid be written to a save file.
    Save,
    /// Ends the game immediately without evaluating rules.
    Quit,
    /// Input that carries no action.
    None,
}

impl Command {
    /// Direction of travel requested by the command, if it is a movement command.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::Reset | Self::Save | Self::Quit | Self::None => None,
        }
    }
}

/// Events broadcast by the world after processing commands or settling a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player's entities attempted a step.
    PlayerMoved {
        /// Kind currently controlled by the player.
        kind: EntityKind,
        /// Direction of the attempted step.
        direction: Direction,
        /// Number of entities that actually moved; boundary moves are skipped.
        moved: usize,
    },
    /// Announces that the grid was restored to its load-time snapshot.
    GridReset,
    /// Requests that an adapter persist the current grid.
    SaveRequested,
    /// Announces that the player quit the game.
    QuitRequested,
    /// Reports the sentences spelled out on the grid during the turn, in scan order.
    RulesDerived {
        /// Derived sentences, duplicates included.
        sentences: Vec<Sentence>,
    },
    /// Announces that a win condition was met during the turn.
    GameWon,
    /// Signals that the turn finished and the grid is stable.
    Settled {
        /// Kind controlled by the player after the turn, if any.
        player: Option<EntityKind>,
        /// Whether the game reached its terminal state.
        game_over: bool,
    },
}

/// Cardinal movement directions plus the absence of motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
    /// No motion.
    #[default]
    None,
}

impl Direction {
    /// The four directions that actually displace an entity.
    pub const CARDINAL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit offset expressed as `(row delta, column delta)`.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::None => (0, 0),
        }
    }

    /// Direction that undoes a step in `self`.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: u32,
    column: u32,
}

impl Position {
    /// Creates a new cell position.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Position reached by stepping once in `direction`.
    ///
    /// Returns `None` when the step would produce a negative coordinate.
    /// Upper bounds are not checked here; see [`GridSize::contains`].
    #[must_use]
    pub fn offset(self, direction: Direction) -> Option<Self> {
        let (row_delta, column_delta) = direction.offset();
        Some(Self {
            row: self.row.checked_add_signed(row_delta)?,
            column: self.column.checked_add_signed(column_delta)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(column {}, row {})", self.column, self.row)
    }
}

/// Dimensions of a grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    rows: u32,
    columns: u32,
}

impl GridSize {
    /// Creates a new size descriptor.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the position lies within `[0, rows) x [0, columns)`.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.column < self.columns
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// Every kind of entity that can occupy the grid.
///
/// Kinds fall into three families: concrete objects (`Rock` .. `Baba`), noun
/// words naming those objects (`TextRock` .. `TextBaba`), and the remaining
/// words (`You` .. `Sink`, `Is`, `Best`). Only words take part in sentences.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A rock.
    Rock,
    /// A wall segment.
    Wall,
    /// A flag.
    Flag,
    /// A metal block.
    Metal,
    /// A patch of grass.
    Grass,
    /// A water tile.
    Water,
    /// A lava tile.
    Lava,
    /// The default player avatar.
    Baba,
    /// The word "rock".
    TextRock,
    /// The word "wall".
    TextWall,
    /// The word "flag".
    TextFlag,
    /// The word "metal".
    TextMetal,
    /// The word "grass".
    TextGrass,
    /// The word "water".
    TextWater,
    /// The word "lava".
    TextLava,
    /// The word "baba".
    TextBaba,
    /// The word "you".
    You,
    /// The word "stop".
    Stop,
    /// The word "push".
    Push,
    /// The word "win".
    Win,
    /// The word "kill".
    Kill,
    /// The word "sink".
    Sink,
    /// The operator word "is".
    Is,
    /// The word "best"; pushable but never part of a sentence.
    #[serde(rename = "text_best")]
    Best,
}

const KIND_NAMES: [(EntityKind, &str); 24] = [
    (EntityKind::Rock, "rock"),
    (EntityKind::Wall, "wall"),
    (EntityKind::Flag, "flag"),
    (EntityKind::Metal, "metal"),
    (EntityKind::Grass, "grass"),
    (EntityKind::Water, "water"),
    (EntityKind::Lava, "lava"),
    (EntityKind::Baba, "baba"),
    (EntityKind::TextRock, "text_rock"),
    (EntityKind::TextWall, "text_wall"),
    (EntityKind::TextFlag, "text_flag"),
    (EntityKind::TextMetal, "text_metal"),
    (EntityKind::TextGrass, "text_grass"),
    (EntityKind::TextWater, "text_water"),
    (EntityKind::TextLava, "text_lava"),
    (EntityKind::TextBaba, "text_baba"),
    (EntityKind::You, "you"),
    (EntityKind::Stop, "stop"),
    (EntityKind::Push, "push"),
    (EntityKind::Win, "win"),
    (EntityKind::Kill, "kill"),
    (EntityKind::Sink, "sink"),
    (EntityKind::Is, "is"),
    (EntityKind::Best, "text_best"),
];

impl EntityKind {
    /// Every entity kind in declaration order.
    pub const ALL: [EntityKind; 24] = [
        Self::Rock,
        Self::Wall,
        Self::Flag,
        Self::Metal,
        Self::Grass,
        Self::Water,
        Self::Lava,
        Self::Baba,
        Self::TextRock,
        Self::TextWall,
        Self::TextFlag,
        Self::TextMetal,
        Self::TextGrass,
        Self::TextWater,
        Self::TextLava,
        Self::TextBaba,
        Self::You,
        Self::Stop,
        Self::Push,
        Self::Win,
        Self::Kill,
        Self::Sink,
        Self::Is,
        Self::Best,
    ];

    /// The concrete kinds that can be the subject of a sentence.
    pub const CONCRETE: [EntityKind; 8] = [
        Self::Rock,
        Self::Wall,
        Self::Flag,
        Self::Metal,
        Self::Grass,
        Self::Water,
        Self::Lava,
        Self::Baba,
    ];

    /// Name used for the kind in level and save files.
    #[must_use]
    pub fn name(self) -> &'static str {
        KIND_NAMES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or("", |(_, name)| *name)
    }

    /// Looks up a kind by its file name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        KIND_NAMES
            .iter()
            .find(|(_, candidate)| *candidate == name)
            .map(|(kind, _)| *kind)
    }

    /// Reports whether the kind is a physical object rather than a word.
    #[must_use]
    pub const fn is_concrete(self) -> bool {
        matches!(
            self,
            Self::Rock
                | Self::Wall
                | Self::Flag
                | Self::Metal
                | Self::Grass
                | Self::Water
                | Self::Lava
                | Self::Baba
        )
    }

    /// Reports whether the kind is a word.
    #[must_use]
    pub const fn is_word(self) -> bool {
        !self.is_concrete()
    }

    /// Concrete kind named by a noun word, if `self` is one.
    #[must_use]
    pub const fn noun(self) -> Option<Self> {
        match self {
            Self::TextRock => Some(Self::Rock),
            Self::TextWall => Some(Self::Wall),
            Self::TextFlag => Some(Self::Flag),
            Self::TextMetal => Some(Self::Metal),
            Self::TextGrass => Some(Self::Grass),
            Self::TextWater => Some(Self::Water),
            Self::TextLava => Some(Self::Lava),
            Self::TextBaba => Some(Self::Baba),
            _ => None,
        }
    }

    /// Effect named by a property word, if `self` is one.
    #[must_use]
    pub const fn effect(self) -> Option<Effect> {
        match self {
            Self::You => Some(Effect::You),
            Self::Stop => Some(Effect::Stop),
            Self::Push => Some(Effect::Push),
            Self::Win => Some(Effect::Win),
            Self::Kill => Some(Effect::Kill),
            Self::Sink => Some(Effect::Sink),
            _ => None,
        }
    }

    /// What the word means when it stands to the right of (or below) an `is`.
    ///
    /// Noun words name a transformation into their concrete kind, property
    /// words name an effect, and `is` itself names a transformation into the
    /// `is` word. Concrete kinds and `text_best` mean nothing.
    #[must_use]
    pub const fn rule_target(self) -> Option<RuleTarget> {
        if let Some(noun) = self.noun() {
            return Some(RuleTarget::Become(noun));
        }
        if let Some(effect) = self.effect() {
            return Some(RuleTarget::Effect(effect));
        }
        match self {
            Self::Is => Some(RuleTarget::Become(Self::Is)),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a name does not match any entity kind.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown entity kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| UnknownKind(name.to_owned()))
    }
}

/// Gameplay verbs that a sentence can grant to a concrete kind.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// The kind is controlled by the player.
    You,
    /// The kind blocks entry into its cell.
    Stop,
    /// The kind is shoved along by anything moving into it.
    Push,
    /// Reaching the kind ends the game.
    Win,
    /// The kind destroys anything else sharing its cell.
    Kill,
    /// The kind destroys anything sharing its cell, and itself with it.
    Sink,
}

impl Effect {
    /// Every effect in declaration order.
    pub const ALL: [Effect; 6] = [
        Self::You,
        Self::Stop,
        Self::Push,
        Self::Win,
        Self::Kill,
        Self::Sink,
    ];

    /// Word used to spell the effect on the grid.
    #[must_use]
    pub const fn word(self) -> EntityKind {
        match self {
            Self::You => EntityKind::You,
            Self::Stop => EntityKind::Stop,
            Self::Push => EntityKind::Push,
            Self::Win => EntityKind::Win,
            Self::Kill => EntityKind::Kill,
            Self::Sink => EntityKind::Sink,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word().name())
    }
}

/// Right-hand side of a sentence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RuleTarget {
    /// Grants an effect to the subject.
    Effect(Effect),
    /// Turns every subject entity into another kind.
    Become(EntityKind),
}

impl RuleTarget {
    /// Every meaningful target, in the order the word kinds are declared.
    pub fn all() -> impl Iterator<Item = RuleTarget> {
        EntityKind::ALL.into_iter().filter_map(EntityKind::rule_target)
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Effect(effect) => effect.fmt(f),
            Self::Become(kind) => kind.fmt(f),
        }
    }
}

/// A "subject IS target" relation spelled out on the grid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Sentence {
    /// Concrete kind the sentence talks about.
    pub subject: EntityKind,
    /// What the subject is declared to be.
    pub target: RuleTarget,
}

impl Sentence {
    /// Creates a new sentence.
    #[must_use]
    pub const fn new(subject: EntityKind, target: RuleTarget) -> Self {
        Self { subject, target }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is {}", self.subject, self.target)
    }
}

/// A single occupant of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Entity {
    kind: EntityKind,
    position: Position,
    direction: Direction,
    held: bool,
}

impl Entity {
    /// Creates a stationary entity.
    #[must_use]
    pub const fn new(kind: EntityKind, position: Position) -> Self {
        Self {
            kind,
            position,
            direction: Direction::None,
            held: false,
        }
    }

    /// Kind of the entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Cell currently occupied by the entity.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Direction of the entity's last step this turn.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Reports whether the entity stepped this turn.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.direction != Direction::None
    }

    /// Reports whether the entity's motion was undone this turn.
    ///
    /// A held entity is back on the cell it started from and is neither a
    /// mover nor revertible until directions are reset.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }

    /// Reports whether the entity moved into its current cell this turn.
    #[must_use]
    pub fn is_entering(&self) -> bool {
        self.has_moved() && !self.held
    }

    /// Replaces the kind of the entity.
    pub fn set_kind(&mut self, kind: EntityKind) {
        self.kind = kind;
    }

    /// Reports whether a step in `direction` keeps the entity inside `size`.
    #[must_use]
    pub fn can_move(&self, direction: Direction, size: GridSize) -> bool {
        self.position
            .offset(direction)
            .is_some_and(|next| size.contains(next))
    }

    /// Steps the entity once in `direction` and records the direction.
    ///
    /// Callers validate the step with [`Entity::can_move`] first. A step that
    /// would produce a negative coordinate leaves the position untouched.
    pub fn step(&mut self, direction: Direction) {
        self.direction = direction;
        if let Some(next) = self.position.offset(direction) {
            self.position = next;
        }
    }

    /// Undoes the entity's last step and holds it in place for the turn.
    pub fn revert(&mut self) {
        self.step(self.direction.opposite());
        self.held = true;
    }

    /// Clears the per-turn motion state.
    pub fn reset_direction(&mut self) {
        self.direction = Direction::None;
        self.held = false;
    }
}

/// Error returned when an entity would be placed outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("position {position} lies outside the {size} grid")]
pub struct OutOfBounds {
    /// Rejected position.
    pub position: Position,
    /// Size of the grid the entity was placed into.
    pub size: GridSize,
}

/// A level: its name, its size and every entity on it in load order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    level_name: String,
    size: GridSize,
    entities: Vec<Entity>,
}

impl Grid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new(level_name: impl Into<String>, size: GridSize) -> Self {
        Self {
            level_name: level_name.into(),
            size,
            entities: Vec::new(),
        }
    }

    /// Appends a stationary entity, rejecting positions outside the grid.
    pub fn place(&mut self, kind: EntityKind, position: Position) -> Result<(), OutOfBounds> {
        if !self.size.contains(position) {
            return Err(OutOfBounds {
                position,
                size: self.size,
            });
        }
        self.entities.push(Entity::new(kind, position));
        Ok(())
    }

    /// Name of the level the grid was loaded from.
    #[must_use]
    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Entities in load order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Mutable access to the entity collection.
    pub fn entities_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.entities
    }

    /// Clears the per-turn motion state of every entity.
    pub fn reset_directions(&mut self) {
        for entity in &mut self.entities {
            entity.reset_direction();
        }
    }
}
