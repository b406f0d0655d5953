use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use isolation_engine::{
    AlphaBetaSearch, Board, GameState, Heuristic, MinimaxSearch, Move, Player, SearchClock,
    Strategy, Unlimited,
};
use proptest::prelude::*;
use proptest::strategy::Strategy as _;

const THRESHOLD: Duration = Duration::from_millis(10);

struct Node {
    value: f64,
    children: Vec<usize>,
    winner: Option<Player>,
}

#[derive(Default)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn leaf(&mut self, value: f64) -> usize {
        self.branch(value, vec![])
    }

    fn branch(&mut self, value: f64, children: Vec<usize>) -> usize {
        self.nodes.push(Node {
            value,
            children,
            winner: None,
        });
        self.nodes.len() - 1
    }

    fn won_by(&mut self, player: Player) -> usize {
        let idx = self.leaf(0.0);
        self.nodes[idx].winner = Some(player);
        idx
    }

    fn leaves(&mut self, values: &[f64]) -> Vec<usize> {
        values.iter().map(|&v| self.leaf(v)).collect()
    }

    fn add(&mut self, shape: &Shape) -> usize {
        match shape {
            Shape::Leaf(value) => self.leaf(f64::from(*value)),
            Shape::Won(player) => self.won_by(*player),
            Shape::Branch(value, children) => {
                let children = children.iter().map(|child| self.add(child)).collect();
                self.branch(f64::from(*value), children)
            }
        }
    }

    fn build(shape: &Shape) -> TreeState {
        let mut tree = Tree::default();
        let root = tree.add(shape);
        tree.root(root)
    }

    fn root(self, root: usize) -> TreeState {
        TreeState {
            tree: Rc::new(self),
            node: root,
            ply: 0,
            active: Player::First,
            counters: Rc::default(),
        }
    }
}

/// Blueprint of a game tree; node values are heuristic scores for the first player.
#[derive(Debug, Clone)]
enum Shape {
    Leaf(i32),
    Won(Player),
    Branch(i32, Vec<Shape>),
}

#[derive(Default)]
struct Counters {
    forecasts: Cell<usize>,
    deepest: Cell<usize>,
    evaluations: Cell<usize>,
}

/// Synthetic game: move `(0, i)` goes to the `i`-th child of the current node.
#[derive(Clone)]
struct TreeState {
    tree: Rc<Tree>,
    node: usize,
    ply: usize,
    active: Player,
    counters: Rc<Counters>,
}

impl TreeState {
    fn current(&self) -> &Node {
        &self.tree.nodes[self.node]
    }

    fn forecasts(&self) -> usize {
        self.counters.forecasts.get()
    }
}

impl GameState for TreeState {
    fn active_player(&self) -> Player {
        self.active
    }

    fn legal_moves(&self) -> Vec<Move> {
        (0..self.current().children.len() as i32).map(|i| Move(0, i)).collect()
    }

    fn forecast(&self, mv: Move) -> Self {
        let counters = &self.counters;
        counters.forecasts.set(counters.forecasts.get() + 1);
        counters.deepest.set(counters.deepest.get().max(self.ply + 1));
        Self {
            tree: Rc::clone(&self.tree),
            node: self.current().children[mv.col() as usize],
            ply: self.ply + 1,
            active: self.active.opponent(),
            counters: Rc::clone(&self.counters),
        }
    }

    fn is_winner(&self, player: Player) -> bool {
        self.current().winner == Some(player)
    }

    fn is_loser(&self, player: Player) -> bool {
        self.current().winner == Some(player.opponent())
    }
}

fn score(state: &TreeState, player: Player) -> f64 {
    let evaluations = &state.counters.evaluations;
    evaluations.set(evaluations.get() + 1);
    if state.is_loser(player) {
        f64::NEG_INFINITY
    } else if state.is_winner(player) {
        f64::INFINITY
    } else {
        state.current().value
    }
}

type Score = fn(&TreeState, Player) -> f64;

fn minimax(depth: u32) -> MinimaxSearch<Score> {
    MinimaxSearch::new(score as Score, depth, THRESHOLD)
}

fn alphabeta() -> AlphaBetaSearch<Score> {
    AlphaBetaSearch::new(score as Score, THRESHOLD)
}

/// Reports plenty of time for the first `checks` queries, then none.
fn budget(checks: usize) -> impl Fn() -> Duration {
    let calls = Cell::new(0);
    move || {
        calls.set(calls.get() + 1);
        if calls.get() <= checks {
            Duration::from_secs(1)
        } else {
            Duration::ZERO
        }
    }
}

fn expired() -> Duration {
    Duration::ZERO
}

// 3 moves of 3 replies each; minimax value 3 via the first move
fn textbook_tree() -> TreeState {
    let mut tree = Tree::default();
    let a = tree.leaves(&[3.0, 12.0, 8.0]);
    let b = tree.leaves(&[2.0, 4.0, 6.0]);
    let c = tree.leaves(&[14.0, 5.0, 2.0]);
    let children = vec![tree.branch(0.0, a), tree.branch(0.0, b), tree.branch(0.0, c)];
    let root = tree.branch(0.0, children);
    tree.root(root)
}

fn complete(depth: u32, branching: usize) -> Shape {
    match depth {
        0 => Shape::Leaf(1),
        _ => Shape::Branch(0, vec![complete(depth - 1, branching); branching]),
    }
}

fn arb_subtree(depth: u32) -> BoxedStrategy<Shape> {
    let leaf = prop_oneof![
        8 => (-50i32..=50).prop_map(Shape::Leaf),
        1 => Just(Shape::Won(Player::First)),
        1 => Just(Shape::Won(Player::Second)),
    ];
    if depth == 0 {
        return leaf.boxed();
    }
    let branch = (-50i32..=50, prop::collection::vec(arb_subtree(depth - 1), 1..=4))
        .prop_map(|(value, children)| Shape::Branch(value, children));
    prop_oneof![1 => leaf, 4 => branch].boxed()
}

/// Ragged trees 1 to 4 plies deep with 1 to 4 moves per node; the root always has moves.
fn arb_tree() -> impl proptest::strategy::Strategy<Value = Shape> {
    (1u32..=4).prop_flat_map(|depth| {
        prop::collection::vec(arb_subtree(depth - 1), 1..=4)
            .prop_map(|children| Shape::Branch(0, children))
    })
}

#[test]
fn no_legal_moves_returns_sentinel_without_searching() {
    let mut tree = Tree::default();
    let root = tree.leaf(1.0);
    let state = tree.root(root);
    let timer = || -> Duration { panic!("timer consulted for a finished game") };

    assert_eq!(minimax(3).choose_move(&state, &timer), Move::NONE);
    assert_eq!(alphabeta().choose_move(&state, &timer), Move::NONE);
    assert_eq!(state.counters.evaluations.get(), 0);
    assert_eq!(state.forecasts(), 0);
}

#[test]
fn fixed_depth_never_forecasts_past_its_depth() {
    for depth in 1..=3 {
        let state = Tree::build(&complete(5, 2));
        minimax(depth).choose_move(&state, &Unlimited);
        assert_eq!(state.counters.deepest.get(), depth as usize);
    }
}

#[test]
fn pruning_keeps_the_choice_and_visits_fewer_nodes() {
    let state = textbook_tree();
    let full = minimax(2).choose_move(&state, &Unlimited);
    let full_forecasts = state.forecasts();

    let state = textbook_tree();
    let clock = SearchClock::new(&Unlimited, THRESHOLD);
    let pruned = alphabeta()
        .alphabeta(&state, 2, f64::NEG_INFINITY, f64::INFINITY, &clock)
        .unwrap();

    assert_eq!(full, Move(0, 0));
    assert_eq!(pruned, Move(0, 0));
    assert_eq!(full_forecasts, 12);
    assert_eq!(state.forecasts(), 10);
}

#[test]
fn node_count_matches_positions_searched() {
    let state = textbook_tree();
    let clock = SearchClock::new(&Unlimited, THRESHOLD);
    minimax(2).minimax(&state, 2, &clock).unwrap();
    assert_eq!(clock.nodes(), 12);
    assert_eq!(clock.nodes() as usize, state.forecasts());

    let state = textbook_tree();
    let clock = SearchClock::new(&Unlimited, THRESHOLD);
    alphabeta()
        .alphabeta(&state, 2, f64::NEG_INFINITY, f64::INFINITY, &clock)
        .unwrap();
    assert_eq!(clock.nodes(), 10);
    assert_eq!(clock.nodes() as usize, state.forecasts());
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn pruning_never_changes_the_minimax_value(shape in arb_tree(), depth in 1u32..=4) {
        let clock = SearchClock::new(&Unlimited, THRESHOLD);

        let state = Tree::build(&shape);
        let full = minimax(depth).minimax(&state, depth, &clock).unwrap();
        let full_forecasts = state.forecasts();

        let state = Tree::build(&shape);
        let pruned = alphabeta()
            .alphabeta(&state, depth, f64::NEG_INFINITY, f64::INFINITY, &clock)
            .unwrap();
        let pruned_forecasts = state.forecasts();

        let search = minimax(depth);
        let value = |mv: Move| {
            search
                .min_value(&state.forecast(mv), depth - 1, Player::First, &clock)
                .unwrap()
        };
        let root_value = search.max_value(&state, depth, Player::First, &clock).unwrap();

        prop_assert_eq!(value(full), root_value);
        prop_assert_eq!(value(pruned), root_value);
        prop_assert!(
            pruned_forecasts <= full_forecasts,
            "alpha-beta forecast {} positions, minimax {}",
            pruned_forecasts,
            full_forecasts
        );
    }
}

#[test]
fn immediate_timeout_plays_first_move_without_forecasting() {
    let state = textbook_tree();
    assert_eq!(minimax(2).choose_move(&state, &expired), Move(0, 0));
    assert_eq!(alphabeta().choose_move(&state, &expired), Move(0, 0));
    assert_eq!(state.forecasts(), 0);
    assert_eq!(state.counters.evaluations.get(), 0);
}

#[test]
fn timeout_unwinds_the_whole_search() {
    // best move is the last one, but the clock runs out before it is reached
    let mut tree = Tree::default();
    let children = tree.leaves(&[1.0, 2.0, 3.0]);
    let root = tree.branch(0.0, children);
    let state = tree.root(root);

    let timer = budget(4);
    let clock = SearchClock::new(&timer, THRESHOLD);
    assert!(minimax(1).minimax(&state, 1, &clock).is_err());

    let timer = budget(4);
    assert_eq!(minimax(1).choose_move(&state, &timer), Move(0, 0));
    let timer = budget(usize::MAX);
    assert_eq!(minimax(1).choose_move(&state, &timer), Move(0, 2));
}

#[test]
fn ties_go_to_the_earlier_move() {
    let mut tree = Tree::default();
    let children = tree.leaves(&[7.0, 7.0]);
    let root = tree.branch(0.0, children);
    let state = tree.root(root);

    assert_eq!(minimax(1).choose_move(&state, &Unlimited), Move(0, 0));
    assert_eq!(
        alphabeta().with_max_depth(3).choose_move(&state, &Unlimited),
        Move(0, 0)
    );
}

#[test]
fn a_won_position_beats_any_sibling() {
    let mut tree = Tree::default();
    let replies = tree.leaves(&[100.0, 200.0]);
    let strong = tree.branch(1000.0, replies);
    let won = tree.won_by(Player::First);
    let root = tree.branch(0.0, vec![strong, won]);
    let state = tree.root(root);

    for depth in 1..=3 {
        assert_eq!(minimax(depth).choose_move(&state, &Unlimited), Move(0, 1));
        assert_eq!(
            alphabeta().with_max_depth(depth).choose_move(&state, &Unlimited),
            Move(0, 1)
        );
    }
}

// depth 1 prefers the first move, depth 2 sees its refutation
fn deepening_tree() -> TreeState {
    let mut tree = Tree::default();
    let a_replies = tree.leaves(&[-1.0, 20.0]);
    let b_replies = tree.leaves(&[4.0, 6.0]);
    let a = tree.branch(10.0, a_replies);
    let b = tree.branch(5.0, b_replies);
    let root = tree.branch(0.0, vec![a, b]);
    tree.root(root)
}

#[test]
fn deeper_iterations_replace_shallower_results() {
    let state = deepening_tree();
    assert_eq!(alphabeta().with_max_depth(1).choose_move(&state, &Unlimited), Move(0, 0));
    assert_eq!(alphabeta().with_max_depth(2).choose_move(&state, &Unlimited), Move(0, 1));
}

#[test]
fn deepening_keeps_the_last_completed_depth() {
    // depth 1 takes 5 clock checks, depth 2 another 9
    let state = deepening_tree();
    assert_eq!(alphabeta().choose_move(&state, &budget(5)), Move(0, 0));
    assert_eq!(alphabeta().choose_move(&state, &budget(13)), Move(0, 0));
    assert_eq!(alphabeta().choose_move(&state, &budget(14)), Move(0, 1));
}

#[test]
fn deepening_falls_back_when_depth_one_is_cut_short() {
    let mut tree = Tree::default();
    let children = tree.leaves(&[1.0, 9.0]);
    let root = tree.branch(0.0, children);
    let state = tree.root(root);

    assert_eq!(alphabeta().choose_move(&state, &budget(4)), Move(0, 0));
    assert_eq!(alphabeta().choose_move(&state, &budget(5)), Move(0, 1));
}

#[test]
fn zero_depth_root_searches_one_ply() {
    let clock = SearchClock::new(&Unlimited, THRESHOLD);

    let state = deepening_tree();
    let shallow = alphabeta()
        .alphabeta(&state, 0, f64::NEG_INFINITY, f64::INFINITY, &clock)
        .unwrap();
    let shallow_forecasts = state.forecasts();

    let state = deepening_tree();
    let one_ply = alphabeta()
        .alphabeta(&state, 1, f64::NEG_INFINITY, f64::INFINITY, &clock)
        .unwrap();

    assert_eq!(shallow, one_ply);
    assert_eq!(shallow_forecasts, state.forecasts());
    assert_eq!(shallow_forecasts, 2);
}

#[test]
fn finds_the_trapping_move_on_a_real_board() {
    // second player sits in the corner with (2, 1) as its only exit
    let board = Board::from_moves(&[Move(5, 4), Move(1, 2), Move(3, 3), Move(0, 0)]).unwrap();
    assert_eq!(board.legal_moves_for(Player::Second), vec![Move(2, 1)]);
    assert_ne!(board.legal_moves()[0], Move(2, 1));

    let minimax = MinimaxSearch::new(Heuristic::Aggressive, 1, THRESHOLD);
    assert_eq!(minimax.choose_move(&board, &Unlimited), Move(2, 1));

    let alphabeta = AlphaBetaSearch::new(Heuristic::Blended, THRESHOLD).with_max_depth(3);
    assert_eq!(alphabeta.choose_move(&board, &Unlimited), Move(2, 1));
}
