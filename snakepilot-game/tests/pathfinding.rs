use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use snakepilot_game::trail::{chase_tail, retrace};
use snakepilot_game::{Body, Cell, CellSet, Direction, find_path, is_safe, trajectory};
use std::collections::{HashMap, VecDeque};

fn random_board(rng: &mut ChaCha20Rng, size: i32, blocked: f64) -> Vec<Cell> {
    let mut cells = Vec::new();
    for x in 0..size {
        for y in 0..size {
            if !rng.gen_bool(blocked) {
                cells.push(Cell::new(x, y));
            }
        }
    }
    cells
}

fn bfs_distance(source: Cell, destination: Cell, traversable: &CellSet) -> Option<usize> {
    let mut distance = HashMap::from([(source, 0_usize)]);
    let mut queue = VecDeque::from([source]);
    while let Some(cell) = queue.pop_front() {
        let here = distance[&cell];
        if cell == destination {
            return Some(here);
        }
        for direction in Direction::ALL {
            let next = cell + direction;
            if traversable.contains(&next) && !distance.contains_key(&next) {
                distance.insert(next, here + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

fn body(cells: &[(i32, i32)]) -> Body {
    cells.iter().map(|&(x, y)| Cell::new(x, y)).collect()
}

fn open_board(size: i32, body: &Body) -> CellSet {
    (0..size)
        .flat_map(|x| (0..size).map(move |y| Cell::new(x, y)))
        .filter(|cell| !body.contains(cell))
        .collect()
}

#[test]
fn path_length_matches_breadth_first_search() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let mut reachable = 0;
    for _ in 0..200 {
        let cells = random_board(&mut rng, 10, 0.25);
        if cells.len() < 2 {
            continue;
        }
        let source = cells[rng.gen_range(0..cells.len())];
        let destination = cells[rng.gen_range(0..cells.len())];
        let traversable: CellSet = cells.into_iter().collect();

        match (
            bfs_distance(source, destination, &traversable),
            find_path(source, destination, &traversable),
        ) {
            (Some(expected), Ok(path)) => {
                assert_eq!(path.len(), expected, "{source} -> {destination}");
                reachable += 1;
            }
            (None, Err(err)) => {
                assert_eq!((err.from, err.to), (source, destination));
            }
            (expected, found) => {
                panic!("{source} -> {destination}: bfs {expected:?}, search {found:?}")
            }
        }
    }
    assert!(reachable > 50);
}

#[test]
fn paths_stay_on_traversable_cells() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for _ in 0..100 {
        let cells = random_board(&mut rng, 12, 0.2);
        if cells.len() < 2 {
            continue;
        }
        let source = cells[rng.gen_range(0..cells.len())];
        let destination = cells[rng.gen_range(0..cells.len())];
        let traversable: CellSet = cells.into_iter().collect();
        if let Ok(path) = find_path(source, destination, &traversable) {
            let visited: Vec<Cell> = trajectory(source, path).collect();
            assert!(visited.iter().all(|cell| traversable.contains(cell)));
            assert_eq!(visited.last().copied().unwrap_or(source), destination);
        }
    }
}

#[test]
fn retrace_revisits_the_body_in_vacating_order() {
    let snake = body(&[(1, 1), (2, 1), (3, 1), (3, 2), (3, 3), (2, 3), (1, 3)]);
    let moves = retrace(&snake);
    assert_eq!(moves.len(), snake.len() - 1);
    let tail = Cell::new(1, 3);
    let visited: Vec<Cell> = trajectory(tail, moves.iter().copied()).collect();
    let expected: Vec<Cell> = snake.iter().rev().skip(1).copied().collect();
    assert_eq!(visited, expected);
}

#[test]
fn tail_chase_replays_without_collision() {
    for cells in [
        vec![(1, 1), (2, 1), (3, 1), (3, 2), (3, 3), (2, 3), (1, 3)],
        vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (4, 1), (3, 1), (2, 1)],
        vec![(2, 2), (2, 3)],
    ] {
        let snake = body(&cells);
        let open = open_board(6, &snake);
        let plan = chase_tail(&snake, &open).unwrap();
        let approach = plan.len() - retrace(&snake).len();
        let head = snake[0];
        let visited: Vec<Cell> = trajectory(head, plan.iter().copied()).collect();
        assert!(visited[..approach - 1].iter().all(|cell| open.contains(cell)));
        assert_eq!(visited[approach - 1], snake[snake.len() - 1]);
        assert!(is_safe(plan.iter().copied(), &snake, 0, &open), "{cells:?}");
    }
}
