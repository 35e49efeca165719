use snakepilot_game::{
    AgentConfig, Body, BodyProvider, Board, Cell, CellSet, Controller, Direction, FoodProvider,
    Game, GameConfig, GridProvider, MoveOutcome, Outcome, Regime, Snake, trajectory,
};

/// Minimal front end: fixed board, scripted food list.
struct ScriptedWorld {
    board: Board,
    snake: Snake,
    food: Vec<Cell>,
}

impl GridProvider for ScriptedWorld {
    fn size(&self) -> i32 {
        self.board.size()
    }

    fn cells(&self) -> &CellSet {
        self.board.cells()
    }
}

impl BodyProvider for ScriptedWorld {
    fn body(&self) -> &Body {
        self.snake.body()
    }

    fn pending_growth(&self) -> u32 {
        self.snake.pending_growth()
    }

    fn growth_per_food(&self) -> u32 {
        1
    }

    fn apply_move(&mut self, direction: Direction, open: &mut CellSet) -> MoveOutcome {
        self.snake.apply_move(direction, open)
    }
}

impl FoodProvider for ScriptedWorld {
    fn food(&self) -> Option<Cell> {
        self.food.last().copied()
    }

    fn relocate(&mut self, _body: &Body) -> bool {
        self.food.pop();
        !self.food.is_empty()
    }
}

fn small_game(seed: u64) -> GameConfig {
    GameConfig {
        size: 10,
        growth: 2,
        seed,
        max_moves: Some(1_500),
    }
}

#[test]
fn two_leg_plan_reaches_food_and_closes_the_cycle() {
    let world = ScriptedWorld {
        board: Board::square(5),
        snake: Snake::spawn(Cell::new(2, 2)),
        food: vec![Cell::new(2, 4)],
    };
    let mut controller = Controller::default();
    let first = controller.get_move(&world).unwrap();
    assert_eq!(controller.regime(), Regime::Feeding);

    let mut moves = controller.plan().directions();
    moves.rotate_right(1);
    assert_eq!(moves[0], first);
    let cells: Vec<Cell> = trajectory(Cell::new(2, 2), moves.iter().copied()).collect();
    assert!(cells.contains(&Cell::new(2, 4)));
    assert_eq!(cells.last(), Some(&Cell::new(2, 2)));
}

#[test]
fn scripted_world_is_fed_in_order() {
    let mut world = ScriptedWorld {
        board: Board::square(6),
        snake: Snake::spawn(Cell::new(3, 3)),
        food: vec![Cell::new(5, 5), Cell::new(0, 5), Cell::new(0, 0)],
    };
    let mut controller = Controller::new(AgentConfig::default().with_safety_check(true));
    let mut eaten = 0;
    for _ in 0..200 {
        let direction = controller.get_move(&world).unwrap();
        let mut open = world.open_cells(world.body());
        let moved = world.apply_move(direction, &mut open);
        assert!(moved.safe, "{direction} into {}", moved.head);
        if Some(moved.head) == world.food() {
            eaten += 1;
            world.snake.eat(1);
            let body = world.body().clone();
            if !world.relocate(&body) {
                break;
            }
        }
    }
    assert_eq!(eaten, 3);
}

#[test]
fn full_games_are_deterministic_per_seed() {
    for seed in 1..=3 {
        let run = || {
            let mut game = Game::new(small_game(seed)).unwrap();
            let summary = game.play(&mut Controller::default());
            (summary.outcome, summary.score, summary.moves, game.snake().clone())
        };
        assert_eq!(run(), run(), "seed {seed}");
    }
}

#[test]
fn summaries_echo_the_configuration() {
    let config = small_game(9);
    let mut game = Game::new(config.clone()).unwrap();
    let summary = game.play(&mut Controller::default());
    assert_eq!(summary.seed, 9);
    assert_eq!(summary.size, 10);
    assert_eq!(summary.growth, 2);
    assert_eq!(summary.max_score, config.max_score());
    assert!(summary.score >= 1);
    assert!(summary.score <= summary.max_score);
    assert!(summary.moves <= 1_500);
    if summary.outcome == Outcome::MoveLimit {
        assert_eq!(summary.moves, 1_500);
    }
    assert!(summary.total_decision >= summary.smoothed_decision);

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"outcome\""));
}
