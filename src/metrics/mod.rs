// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Post-processing of solutions: feasibility, quality metrics and reports.
//!
//! Costs follow the usual MAPF conventions. The cost of one agent is the
//! time step after which it never leaves its final state again; the
//! sum-of-loss instead counts every step that is not spent resting on the
//! final state.

use std::io::{self, Write};

use tracing::{info, warn};

use crate::engine::{AgentId, Solution};
use crate::error::SolutionError;
use crate::instance::Instance;
use crate::memo::{Configuration, DistanceOracle, StateId, StateSpace, UNREACHABLE};

/// Verify that `solution` is a valid plan for `instance`.
///
/// Checks the shape of every configuration, the start, each agent's moves
/// and goal-stage bookkeeping, collisions under the selected conflict model,
/// and that the final configuration reaches `threshold` goal-stage advances
/// (every goal when `None`).
pub fn check_solution(
    space: &mut StateSpace,
    instance: &Instance,
    solution: &Solution,
    threshold: Option<usize>,
    allow_following: bool,
) -> Result<(), SolutionError> {
    let n = instance.n;
    let Some(first) = solution.first() else {
        return Err(SolutionError::Empty);
    };
    for (step, config) in solution.iter().enumerate() {
        if config.len() != n {
            return Err(SolutionError::WrongSize {
                step,
                expected: n,
                found: config.len(),
            });
        }
    }

    for agent in 0..n {
        if space.pose(first[agent]) != space.pose(instance.starts[agent]) {
            return Err(SolutionError::WrongStart { agent });
        }
        let expected = space.goal_stage(instance.starts[agent]);
        let found = space.goal_stage(first[agent]);
        if expected != found {
            return Err(SolutionError::WrongGoalStage {
                agent,
                step: 0,
                expected,
                found,
            });
        }
    }
    check_vertex_conflicts(space, first, 0)?;

    for step in 1..solution.len() {
        let (prev, next) = (&solution[step - 1], &solution[step]);
        for agent in 0..n {
            check_move(space, instance, agent, step, prev[agent], next[agent])?;
        }
        check_vertex_conflicts(space, next, step)?;
        check_moving_conflicts(space, prev, next, step, allow_following)?;
    }

    let threshold = threshold.unwrap_or_else(|| instance.total_goals());
    let last = &solution[solution.len() - 1];
    let reached = last.goals_reached(space);
    if reached < threshold {
        return Err(SolutionError::GoalsNotReached { reached, threshold });
    }
    Ok(())
}

fn check_move(
    space: &mut StateSpace,
    instance: &Instance,
    agent: AgentId,
    step: usize,
    from: StateId,
    to: StateId,
) -> Result<(), SolutionError> {
    let pose = space.pose(to);
    let stays = space.pose(from) == pose;
    let neighbors = space.neighbors(from).to_vec();
    if !stays && !neighbors.iter().any(|&u| space.pose(u) == pose) {
        return Err(SolutionError::InvalidTransition { agent, step });
    }

    let expected = instance.next_goal_stage(space, agent, pose, space.goal_stage(from));
    let found = space.goal_stage(to);
    if expected != found {
        return Err(SolutionError::WrongGoalStage {
            agent,
            step,
            expected,
            found,
        });
    }
    Ok(())
}

fn check_vertex_conflicts(
    space: &StateSpace,
    config: &Configuration,
    step: usize,
) -> Result<(), SolutionError> {
    let mut holder = vec![None; space.graph().size()];
    for (agent, s) in config.iter().enumerate() {
        let v = space.vertex(s);
        if let Some(first) = holder[v] {
            return Err(SolutionError::VertexConflict {
                first,
                second: agent,
                step,
            });
        }
        holder[v] = Some(agent);
    }
    Ok(())
}

fn check_moving_conflicts(
    space: &StateSpace,
    prev: &Configuration,
    next: &Configuration,
    step: usize,
    allow_following: bool,
) -> Result<(), SolutionError> {
    let mut was_at = vec![None; space.graph().size()];
    for (agent, s) in prev.iter().enumerate() {
        was_at[space.vertex(s)] = Some(agent);
    }

    for (agent, s) in next.iter().enumerate() {
        let Some(other) = was_at[space.vertex(s)] else {
            continue;
        };
        if other == agent {
            continue;
        }
        if !allow_following {
            return Err(SolutionError::FollowingConflict {
                follower: agent,
                leader: other,
                step,
            });
        }
        if space.vertex(next[other]) == space.vertex(prev[agent]) {
            return Err(SolutionError::SwapConflict {
                first: agent.min(other),
                second: agent.max(other),
                step,
            });
        }
    }
    Ok(())
}

/// [`check_solution`] as a predicate, logging the first problem found.
pub fn is_feasible_solution(
    space: &mut StateSpace,
    instance: &Instance,
    solution: &Solution,
    threshold: Option<usize>,
    allow_following: bool,
) -> bool {
    match check_solution(space, instance, solution, threshold, allow_following) {
        Ok(()) => true,
        Err(err) => {
            warn!("infeasible solution: {}", err);
            false
        }
    }
}

/// Number of steps; 0 for an empty solution.
pub fn makespan(solution: &Solution) -> usize {
    solution.len().saturating_sub(1)
}

/// Steps until agent `i` reaches the state it keeps to the end.
pub fn path_cost(solution: &Solution, i: AgentId) -> usize {
    let Some(last) = solution.last() else {
        return 0;
    };
    let goal = last[i];
    let mut c = solution.len();
    while c > 0 && solution[c - 1][i] == goal {
        c -= 1;
    }
    c
}

pub fn sum_of_costs(solution: &Solution) -> usize {
    let n = solution.first().map_or(0, Configuration::len);
    (0..n).map(|i| path_cost(solution, i)).sum()
}

/// Steps that are not spent resting on the final state.
pub fn sum_of_loss(solution: &Solution) -> usize {
    let Some(last) = solution.last() else {
        return 0;
    };
    let mut cost = 0;
    for i in 0..last.len() {
        for t in 1..solution.len() {
            if solution[t - 1][i] != solution[t][i] || solution[t][i] != last[i] {
                cost += 1;
            }
        }
    }
    cost
}

/// Shortest possible length of agent `i`'s tour through its remaining goals,
/// ignoring other agents. [`UNREACHABLE`] if some leg cannot be travelled.
pub fn tour_lower_bound(
    space: &mut StateSpace,
    instance: &Instance,
    distances: &mut DistanceOracle,
    i: AgentId,
) -> u32 {
    let goals = &instance.goal_sequences[i];
    let start = instance.starts[i];
    let first_stage = space.goal_stage(start);
    if first_stage >= goals.len() {
        return 0;
    }

    let mut total = distances.get(space, i, start);
    for &goal in &goals[first_stage..goals.len() - 1] {
        if total == UNREACHABLE {
            break;
        }
        let from = space.with_stage(goal, space.goal_stage(goal) + 1);
        total = match distances.get(space, i, from) {
            UNREACHABLE => UNREACHABLE,
            d => total.saturating_add(d),
        };
    }
    total
}

pub fn makespan_lower_bound(
    space: &mut StateSpace,
    instance: &Instance,
    distances: &mut DistanceOracle,
) -> u32 {
    (0..instance.n)
        .map(|i| tour_lower_bound(space, instance, distances, i))
        .max()
        .unwrap_or(0)
}

pub fn sum_of_costs_lower_bound(
    space: &mut StateSpace,
    instance: &Instance,
    distances: &mut DistanceOracle,
) -> u64 {
    (0..instance.n)
        .map(|i| tour_lower_bound(space, instance, distances, i) as u64)
        .sum()
}

/// Log the quality of a solution.
pub fn log_stats(
    space: &mut StateSpace,
    instance: &Instance,
    solution: &Solution,
    comp_time_ms: u64,
) {
    let mut distances = DistanceOracle::new(instance);
    let makespan_lb = makespan_lower_bound(space, instance, &mut distances);
    let sum_of_costs_lb = sum_of_costs_lower_bound(space, instance, &mut distances);
    info!(
        solved = !solution.is_empty(),
        comp_time_ms,
        makespan = makespan(solution),
        makespan_lb,
        sum_of_costs = sum_of_costs(solution),
        sum_of_costs_lb,
        sum_of_loss = sum_of_loss(solution),
        "solution quality"
    );
}

/// Run details recorded in a report.
#[derive(Debug, Clone, Default)]
pub struct RunInfo {
    pub map_name: String,
    pub solver: String,
    pub comp_time_ms: u64,
    pub seed: u64,
    /// Leave out the per-step configurations.
    pub log_short: bool,
}

fn format_state(space: &StateSpace, s: StateId) -> String {
    let v = space.graph().vertex(space.vertex(s));
    let orientation = space.orientation(s);
    if orientation.is_oriented() {
        format!("({},{},{})", v.x, v.y, orientation)
    } else {
        format!("({},{})", v.x, v.y)
    }
}

/// Write a plain `key=value` report of a run.
pub fn write_log<W: Write>(
    mut out: W,
    space: &mut StateSpace,
    instance: &Instance,
    solution: &Solution,
    run: &RunInfo,
) -> io::Result<()> {
    let mut distances = DistanceOracle::new(instance);
    let soc_lb = sum_of_costs_lower_bound(space, instance, &mut distances);
    let makespan_lb = makespan_lower_bound(space, instance, &mut distances);

    writeln!(out, "agents={}", instance.n)?;
    writeln!(out, "map_file={}", run.map_name)?;
    writeln!(out, "solver={}", run.solver)?;
    writeln!(out, "solved={}", u8::from(!solution.is_empty()))?;
    writeln!(out, "soc={}", sum_of_costs(solution))?;
    writeln!(out, "soc_lb={}", soc_lb)?;
    writeln!(out, "makespan={}", makespan(solution))?;
    writeln!(out, "makespan_lb={}", makespan_lb)?;
    writeln!(out, "sum_of_loss={}", sum_of_loss(solution))?;
    writeln!(out, "sum_of_loss_lb={}", soc_lb)?;
    writeln!(out, "comp_time={}", run.comp_time_ms)?;
    writeln!(out, "seed={}", run.seed)?;
    if run.log_short {
        return Ok(());
    }

    write!(out, "starts=")?;
    for s in instance.starts.iter() {
        write!(out, "{},", format_state(space, s))?;
    }
    writeln!(out)?;

    write!(out, "goals=")?;
    for goals in &instance.goal_sequences {
        let tour: Vec<String> = goals.iter().map(|&g| format_state(space, g)).collect();
        write!(out, "{},", tour.join(">"))?;
    }
    writeln!(out)?;

    writeln!(out, "solution=")?;
    for (t, config) in solution.iter().enumerate() {
        write!(out, "{}:", t)?;
        for s in config.iter() {
            write!(out, "{},", format_state(space, s))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
