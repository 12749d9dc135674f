// NfvPlace: Learning-Based Placement of Virtual Network Function Chains
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Learning
//!
//! This module contains the reinforcement-learning heuristic, which searches the placement space
//! directly. It is built from the following parts, leaves first:
//!
//! - **Value Function** ([`ValueFunction`]): Capability interface of the action-value function
//!   approximator, with `predict` and `train`. [`LinearValueFunction`] is a small implementation
//!   that needs no external learner. Any approximator satisfying the interface can be plugged in.
//!
//! - **Replay Memory** ([`ReplayMemory`]): Fixed-capacity ring buffer of [`Transition`]s. When it
//!   is full, the oldest transition is evicted first.
//!
//! - **Agent** ([`Agent`]): Owns the value function, the replay memory and the random number
//!   generator. It selects actions epsilon-greedily among the legal actions, stores transitions,
//!   and periodically trains the value function on a random mini-batch towards the one-step
//!   target.
//!
//! - **Episode** ([`run_episode`]): Drives the interaction of the environment and the agent, from
//!   an initial placement to one of the terminal [`EpisodeState`]s.
//!
//! - **Placement Learner** ([`PlacementLearner`]): Repeats the episode for a number of training
//!   iterations, and finishes with one greedy reasoning episode, whose outcome is reported.

mod agent;
mod approximator;
mod episode;
mod learner;
mod replay;

pub use agent::Agent;
pub use approximator::{LinearValueFunction, TrainingSample, ValueFunction};
pub use episode::{run_episode, EpisodeOutcome, EpisodeState};
pub use learner::{PlacementLearner, PlacementResult};
pub use replay::{ReplayMemory, Transition};
