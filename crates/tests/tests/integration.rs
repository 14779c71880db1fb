//! Integration tests for end-to-end CodeBots execution.
//!
//! These tests verify the full pipeline:
//! Source → Parse → Place → Execute turns → Declare → Score

use std::collections::HashSet;

use codebots_runtime::{Declaration, Direction, MatchConfig, Position};
use codebots_tests::{play, TestHarness};
use codebots_vm::{BotId, LockKey, Var};

const NORTH: i64 = 0;
const EAST: i64 = 1;

fn flag(name: &str) -> Declaration {
    Declaration::Flag(name.to_string())
}

/// Two idle bots keep their own flags and score one point each.
#[test]
fn test_idle_bots_score_their_own_flags() {
    let config = MatchConfig::default()
        .with_copies(1)
        .with_turns(1)
        .with_games(1)
        .with_seed(5);

    let scores = play(&[("A", ""), ("B", "")], &config);

    assert_eq!(scores.len(), 2);
    assert!(scores.contains(&(flag("A"), 1)));
    assert!(scores.contains(&(flag("B"), 1)));
}

/// A Move dispatched through If moves on every turn and wraps at the edge.
#[test]
fn test_mover_wraps_around_grid() {
    let mut harness = TestHarness::new(5, 3, 2, 1);
    let id = harness.add_bot("runner", "Move\nIf D==D #0 #0", 0, 1, EAST);

    harness.run_turns(3);
    assert_eq!(harness.position(id), Position::new(3, 1));

    harness.run_turns(2);
    assert_eq!(harness.position(id), Position::new(0, 1));

    harness.run_turns(2);
    assert_eq!(harness.position(id), Position::new(2, 1));
}

/// The same mover placed by the game's own placement.
#[test]
fn test_populated_mover_steps_from_spawn() {
    let config = MatchConfig::default().with_program_length(2).with_copies(1);
    let sources = [("runner", "Move\nIf D==D #0 #0")];
    let mut harness = TestHarness::populate(&sources, &config, 8);

    let world = harness.world();
    assert_eq!((world.width(), world.height()), (2, 3));
    assert_eq!(world.len(), 1);

    let id = BotId(0);
    let start = harness.position(id);
    assert_eq!(start, Position::new(0, 0));

    let direction = Direction::from_variable(harness.variable(id, Var::D));
    let expected = start.step(direction, 2, 3);

    harness.run_turns(1);
    assert_eq!(harness.position(id), expected);

    harness.run_turns(1);
    assert_eq!(harness.position(id), expected.step(direction, 2, 3));
}

/// A Block token absorbs exactly one write and is untouched by reads.
#[test]
fn test_block_absorbs_one_write() {
    let mut harness = TestHarness::new(4, 4, 4, 2);
    let guard = harness.add_bot("guard", "Block A\nCopy A B", 1, 0, NORTH);
    let attacker = harness.add_bot("attacker", "Copy 3 *A", 0, 0, EAST);
    let key = LockKey::Variable(Var::A);

    harness.act(guard);
    assert_eq!(harness.world().bot(guard).lock_count(key), 1);

    // Reading A leaves the token in place
    harness.act(guard);
    assert_eq!(harness.world().bot(guard).lock_count(key), 1);

    harness.act(attacker);
    assert_eq!(harness.variable(guard, Var::A), 0);
    assert_eq!(harness.world().bot(guard).lock_count(key), 0);

    harness.set_variable(attacker, Var::C, 0);
    harness.act(attacker);
    assert_eq!(harness.variable(guard, Var::A), 3);
}

/// Branches that lead back to themselves end the turn instead of looping.
#[test]
fn test_if_cycles_terminate() {
    let mut harness = TestHarness::new(4, 4, 3, 3);
    let looper = harness.add_bot("looper", "If A==0 #0 #0", 0, 0, NORTH);
    let cycler = harness.add_bot(
        "cycler",
        "If A==0 #1 #1\nIf B==0 #2 #2\nIf C==C #0 #0",
        2,
        2,
        NORTH,
    );

    harness.run_turns(4);

    assert_eq!(harness.variable(looper, Var::C), 1);
    assert_eq!(harness.variable(cycler, Var::C), 1);
    assert_eq!(harness.position(looper), Position::new(0, 0));
}

/// Copy-heavy play never grows or shrinks a program.
#[test]
fn test_program_length_is_invariant() {
    let config = MatchConfig::default().with_program_length(6).with_copies(8);
    let sources = [
        ("spreader", "Copy #E *#E\nCopy #0 *#A\nMove\nCopy E D"),
        ("wanderer", "Move\nCopy E D\nCopy *#E #E"),
        ("sitter", "Block #0\nCopy #2 *#0"),
    ];
    let mut harness = TestHarness::populate(&sources, &config, 13);

    for _ in 0..50 {
        harness.run_turns(4);
        for bot in harness.world().bots() {
            assert_eq!(bot.program().len(), 6);
        }
    }
}

/// No two bots ever share a cell.
#[test]
fn test_moves_never_stack_bots() {
    let config = MatchConfig::default().with_program_length(4).with_copies(10);
    let sources = [("north", "Move\nCopy E D"), ("south", "Copy E D\nMove\nMove")];
    let mut harness = TestHarness::populate(&sources, &config, 21);
    let population = harness.world().len();

    for _ in 0..100 {
        harness.run_turns(1);
        let cells: HashSet<Position> = harness
            .world()
            .bots()
            .iter()
            .map(|bot| bot.position())
            .collect();
        assert_eq!(cells.len(), population);
    }
}

/// `**` reaches the bot the opponent is facing.
#[test]
fn test_double_star_writes_two_hops_away() {
    let mut harness = TestHarness::new(6, 2, 4, 4);
    let writer = harness.add_bot("writer", "Copy 3 **A\nCopy #3 **#0", 0, 0, EAST);
    let middle = harness.add_bot("middle", "", 1, 0, EAST);
    let far = harness.add_bot("far", "", 2, 0, NORTH);

    harness.act(writer);
    assert_eq!(harness.variable(far, Var::A), 3);
    assert_eq!(harness.variable(middle, Var::A), 0);

    harness.act(writer);
    let far_bot = harness.world().bot(far);
    assert_eq!(far_bot.line(0).flag_name(), Some("writer"));
    assert_eq!(harness.world().bot(middle).line(0).flag_name(), Some("middle"));
}

/// A broken chain writes nothing.
#[test]
fn test_double_star_without_second_hop_is_noop() {
    let mut harness = TestHarness::new(6, 2, 4, 4);
    let writer = harness.add_bot("writer", "Copy 3 **A", 0, 0, EAST);
    let middle = harness.add_bot("middle", "", 1, 0, NORTH);

    harness.act(writer);
    assert_eq!(harness.variable(middle, Var::A), 0);
    assert_eq!(harness.variable(writer, Var::A), 0);
    assert_eq!(harness.variable(writer, Var::C), 1);
}

/// Overwriting an opponent's lines with your Flag converts its declaration.
#[test]
fn test_flag_infection_converts_declaration() {
    let mut harness = TestHarness::new(4, 4, 4, 6);
    let attacker = harness.add_bot(
        "red",
        "Copy #3 *#0\nCopy #3 *#1\nCopy #3 *#2",
        0,
        0,
        EAST,
    );
    let victim = harness.add_bot("blue", "", 1, 0, NORTH);

    harness.run_turns(1);
    assert_eq!(harness.world().bot(victim).declare_flag(), flag("blue"));

    harness.run_turns(1);
    assert_eq!(harness.world().bot(victim).declare_flag(), Declaration::Tie);

    harness.run_turns(1);
    assert_eq!(harness.world().bot(victim).declare_flag(), flag("red"));

    let scores = harness.scores();
    assert_eq!(scores.flag("red"), 2);
    assert_eq!(scores.flag("blue"), 0);
    assert_eq!(harness.world().bot(attacker).declare_flag(), flag("red"));
}

/// A seeded match replays exactly.
#[test]
fn test_seeded_match_is_reproducible() {
    let config = MatchConfig::default()
        .with_program_length(8)
        .with_copies(6)
        .with_turns(300)
        .with_games(3)
        .with_seed(99);
    let sources = [
        ("hunter", "If *#0=#3 #2 #1\nCopy #3 *#E\nMove\nFlag\nCopy E D"),
        ("blocker", "Block #E\nCopy E D\nMove"),
    ];

    let first = play(&sources, &config);
    let second = play(&sources, &config);

    assert_eq!(first, second);
    let total: u64 = first.iter().map(|(_, score)| score).sum();
    assert_eq!(total, 36);
}
