//! Per-tick decision state machine.
//!
//! The controller owns the committed plan, the behavioural regime, and the
//! recovery markers. Each call to [`Controller::get_move`] runs loop
//! detection, loop-breaking patches, the panic check, the two-leg search and
//! the tail-following fallback in that order, then emits the next planned
//! move and rotates it to the back of the plan.
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::config::AgentConfig;
use crate::geometry::{Cell, Direction};
use crate::patch;
use crate::plan::{self, Plan};
use crate::simulate::{self, Collision};
use crate::snake::Body;
use crate::trail;
use crate::World;

pub mod legs;
pub use legs::{LegFailure, LegRequest, SearchOrder, two_leg_search};

/// Behavioural mode of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// The committed plan leads to the current food.
    Feeding,
    /// No feeding plan; searching every tick.
    Recovering,
    /// Repetition detected; stalling and rerouting with patches.
    LoopBreaking,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Feeding => "feeding",
            Self::Recovering => "recovering",
            Self::LoopBreaking => "loop-breaking",
        })
    }
}

/// Where an unsafe plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStage {
    Padding,
    Pull,
    Feeding,
    Fallback,
}

impl fmt::Display for PlanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Padding => "padded",
            Self::Pull => "pulled",
            Self::Feeding => "feeding",
            Self::Fallback => "fallback",
        })
    }
}

/// Terminal failure for the current tick; the game ends.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AgentFailure {
    #[error("{stage} plan is unsafe: {collision}")]
    UnsafePlan {
        stage: PlanStage,
        collision: Collision,
    },
    #[error("no move available")]
    NoMove,
}

/// Decision state for one game.
#[derive(Debug, Clone)]
pub struct Controller {
    config: AgentConfig,
    plan: Plan,
    regime: Regime,
    search_order: SearchOrder,
    last_recovery_head: Option<Cell>,
    last_recovery_food: Option<Cell>,
    seen_bodies: HashSet<Vec<Cell>>,
    tick: u64,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

impl Controller {
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            plan: Plan::new(),
            regime: Regime::Recovering,
            search_order: SearchOrder::default(),
            last_recovery_head: None,
            last_recovery_food: None,
            seen_bodies: HashSet::new(),
            tick: 0,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub const fn regime(&self) -> Regime {
        self.regime
    }

    #[must_use]
    pub const fn plan(&self) -> &Plan {
        &self.plan
    }

    #[must_use]
    pub const fn search_order(&self) -> SearchOrder {
        self.search_order
    }

    /// Head and food recorded at the last feeding-plan adoption.
    #[must_use]
    pub const fn recovery_markers(&self) -> (Option<Cell>, Option<Cell>) {
        (self.last_recovery_head, self.last_recovery_food)
    }

    /// Number of decisions taken so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Decide the next move.
    ///
    /// # Errors
    ///
    /// Returns [`AgentFailure::UnsafePlan`] when an adopted plan or patch fails
    /// the safety replay, and [`AgentFailure::NoMove`] when nothing is planned.
    pub fn get_move<W: World + ?Sized>(&mut self, world: &W) -> Result<Direction, AgentFailure> {
        let tick = self.tick;
        self.tick += 1;

        let body = world.body();
        let (Some(&head), Some(&tail)) = (body.front(), body.back()) else {
            return Err(AgentFailure::NoMove);
        };
        let food = world.food();

        self.detect_loop(body, head, tail);
        if self.regime == Regime::LoopBreaking {
            self.break_loop(world, head, food, tick)?;
        }

        if food != self.last_recovery_food && self.regime != Regime::Recovering {
            debug!("tick {tick}: food changed to {food:?}, recovering");
            self.set_regime(Regime::Recovering);
        }

        if self.regime != Regime::Feeding
            && let Some(food) = food
        {
            self.recover(world, head, food, tick)?;
        }

        if self.plan.is_empty() {
            self.tail_fallback(world, tick)?;
        }

        self.plan
            .advance()
            .map(|planned| planned.direction)
            .ok_or(AgentFailure::NoMove)
    }

    fn set_regime(&mut self, regime: Regime) {
        if self.regime != regime {
            debug!("regime {} -> {}", self.regime, regime);
            self.regime = regime;
        }
    }

    /// Enter `LoopBreaking` when the head is back at the last recovery head
    /// or the next move steps onto the tail.
    ///
    /// The panic check runs right after the patches, so once the food has
    /// moved away from the last recovery food the regime only lasts for that
    /// tick's patches. The seen-body set then only matters while the same food
    /// stays out of reach.
    fn detect_loop(&mut self, body: &Body, head: Cell, tail: Cell) {
        let stagnant = self.last_recovery_head == Some(head)
            || self.plan.front().is_some_and(|next| head + next == tail);
        if !stagnant {
            return;
        }
        if self.regime != Regime::LoopBreaking {
            self.set_regime(Regime::LoopBreaking);
            return;
        }
        let snapshot: Vec<Cell> = body.iter().copied().collect();
        if self.seen_bodies.contains(&snapshot) {
            debug!("repeated body configuration, dropping plan");
            self.plan.clear();
        }
        self.seen_bodies.insert(snapshot);
    }

    fn break_loop<W: World + ?Sized>(
        &mut self,
        world: &W,
        head: Cell,
        food: Option<Cell>,
        tick: u64,
    ) -> Result<(), AgentFailure> {
        let mut open = world.open_cells(world.body());
        if let Some(food) = food {
            open.remove(&food);
        }

        let before = self.config.safety_check.then(|| self.plan.clone());
        if patch::pad_in_place(head, &mut self.plan, &open, tick) {
            debug!("tick {tick}: padded plan to {} moves", self.plan.len());
            self.verify(world, PlanStage::Padding, before.as_ref())?;
        }

        let before = self.config.safety_check.then(|| self.plan.clone());
        if patch::pull_in_place(head, &mut self.plan, &open, tick) {
            debug!("tick {tick}: pulled plan into free space");
            self.verify(world, PlanStage::Pull, before.as_ref())?;
        }
        Ok(())
    }

    fn recover<W: World + ?Sized>(
        &mut self,
        world: &W,
        head: Cell,
        food: Cell,
        tick: u64,
    ) -> Result<(), AgentFailure> {
        let body = world.body();
        let open = world.open_cells(body);
        let min_length = world.pending_growth() as usize + world.growth_per_food() as usize;
        let request = LegRequest {
            open: &open,
            body,
            food,
            min_length,
            order: self.search_order,
        };

        match two_leg_search(&request) {
            Ok(path) => {
                let before = self.config.safety_check.then(|| self.plan.clone());
                self.plan.replace(&path, tick);
                self.set_regime(Regime::Feeding);
                self.last_recovery_head = Some(head);
                self.last_recovery_food = Some(food);
                debug!("tick {tick}: feeding plan {}", self.plan);
                self.verify(world, PlanStage::Feeding, before.as_ref())
            }
            Err(failure) => {
                if matches!(failure, LegFailure::FirstLeg(_)) && self.config.toggle_search_order {
                    self.search_order = self.search_order.toggled();
                }
                debug!("tick {tick}: {failure}");
                Ok(())
            }
        }
    }

    /// Chase the tail, then walk the trail it vacates. When the tail is out
    /// of reach the bare retrace is adopted only if it replays cleanly.
    fn tail_fallback<W: World + ?Sized>(
        &mut self,
        world: &W,
        tick: u64,
    ) -> Result<(), AgentFailure> {
        let body = world.body();
        let open = world.open_cells(body);
        match trail::chase_tail(body, &open) {
            Ok(path) if !path.is_empty() => {
                self.plan.replace(&path, tick);
                debug!("tick {tick}: following tail {}", self.plan);
                self.verify(world, PlanStage::Fallback, None)
            }
            _ => {
                let retrace = trail::retrace(body);
                if simulate::is_safe(retrace.iter().copied(), body, world.pending_growth(), &open) {
                    self.plan.replace(&retrace, tick);
                    debug!("tick {tick}: retracing body {}", self.plan);
                }
                Ok(())
            }
        }
    }

    fn verify<W: World + ?Sized>(
        &self,
        world: &W,
        stage: PlanStage,
        before: Option<&Plan>,
    ) -> Result<(), AgentFailure> {
        if !self.config.safety_check {
            return Ok(());
        }
        let body = world.body();
        let open = world.open_cells(body);
        simulate::check(
            self.plan.iter().map(|planned| planned.direction),
            body,
            world.pending_growth(),
            &open,
        )
        .map_err(|collision| {
            warn!("{stage} plan collides: {collision}");
            if let (Some(before), Some(&head)) = (before, body.front()) {
                for (step, (old, new)) in plan::divergence(head, before, &self.plan)
                    .into_iter()
                    .enumerate()
                {
                    debug!("  step {step}: {old:?} -> {new:?}");
                }
            }
            AgentFailure::UnsafePlan { stage, collision }
        })
    }
}
